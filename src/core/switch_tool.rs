// Presence check for the GPU switching tool

use std::env;
use std::ffi::OsString;

use crate::core::command::{CommandRunner, ExecutionError};
use crate::error::Result;

/// Switching tool shipped by SUSE (suse-prime) and Ubuntu (nvidia-prime)
pub const SWITCH_TOOL: &str = "prime-select";

/// Checks whether `tool` is on the host's PATH. Inside a sandbox the
/// lookup is relayed to the host, since the sandbox PATH is not the host's.
pub fn has_switch_tool(runner: &dyn CommandRunner, sandboxed: bool, tool: &str) -> Result<bool> {
    if !sandboxed {
        return Ok(find_on_path(tool, env::var_os("PATH")));
    }

    match runner.execute(&["which", tool], true) {
        Ok(_) => Ok(true),
        Err(ExecutionError::Failed { .. }) => {
            log::debug!("{} not found on host PATH", tool);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Looks `tool` up in a PATH-style list of directories
fn find_on_path(tool: &str, path: Option<OsString>) -> bool {
    let cwd = env::current_dir().unwrap_or_default();
    match which::which_in(tool, path, cwd) {
        Ok(found) => {
            log::debug!("{} found at {}", tool, found.display());
            true
        }
        Err(_) => {
            log::debug!("{} not found on PATH", tool);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::testing::{Scripted, ScriptedRunner};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn bin_dir_with(tool: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(tool);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        dir
    }

    #[test]
    fn tool_found_without_a_which_binary() {
        // The directory holds prime-select and nothing else, no `which`
        let bin = bin_dir_with(SWITCH_TOOL);
        assert!(find_on_path(SWITCH_TOOL, Some(bin.path().as_os_str().to_os_string())));
    }

    #[test]
    fn tool_absent_from_path() {
        let bin = bin_dir_with("nvidia-smi");
        assert!(!find_on_path(SWITCH_TOOL, Some(bin.path().as_os_str().to_os_string())));
        assert!(!find_on_path(SWITCH_TOOL, None));
    }

    #[test]
    fn host_lookup_does_not_run_commands() {
        let runner = ScriptedRunner::new();
        has_switch_tool(&runner, false, SWITCH_TOOL).unwrap();
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn sandboxed_tool_on_host_path_is_present() {
        let runner = ScriptedRunner::new()
            .on("which prime-select", Scripted::Stdout("/usr/sbin/prime-select\n".to_string()));
        assert!(has_switch_tool(&runner, true, SWITCH_TOOL).unwrap());
    }

    #[test]
    fn sandboxed_nonzero_exit_means_absent() {
        let runner = ScriptedRunner::new().on("which prime-select", Scripted::Exit(1));
        assert!(!has_switch_tool(&runner, true, SWITCH_TOOL).unwrap());
    }

    #[test]
    fn sandboxed_missing_which_propagates() {
        let runner = ScriptedRunner::new();
        assert!(has_switch_tool(&runner, true, SWITCH_TOOL).is_err());
    }
}
