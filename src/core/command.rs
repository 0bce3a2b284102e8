// Command execution for the Optimus capability probe
//
// Every external program the probe needs (cat, lspci, and which when
// sandboxed) goes through a CommandRunner. Inside a Flatpak sandbox the
// command is relayed to the host with `flatpak-spawn --host`.

use std::io;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::core::context::ExecutionContext;

/// Prefix that re-executes a command on the host from inside Flatpak
pub const SANDBOX_ESCAPE: [&str; 2] = ["flatpak-spawn", "--host"];

/// Failure to run an external command
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("no command given")]
    EmptyCommand,

    #[error("command not found: `{command}`")]
    NotFound { command: String },

    #[error("`{command}` exited with {}", describe_status(.status))]
    Failed { command: String, status: Option<i32> },

    #[error("failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

/// Output of a finished (or detached) command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    /// Exit code; `None` when the process was started detached
    pub status: Option<i32>,
}

impl CommandOutput {
    /// Standard output decoded as UTF-8, invalid sequences replaced
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Runs external commands on behalf of the probe
pub trait CommandRunner {
    /// Runs `args` (program first). With `capture_output` the call blocks
    /// until the child exits and returns its stdout; without it the child
    /// is started and left running.
    fn execute(&self, args: &[&str], capture_output: bool) -> Result<CommandOutput, ExecutionError>;

    /// Runs `args` to completion and returns its stdout as text
    fn read_stdout(&self, args: &[&str]) -> Result<String, ExecutionError> {
        self.execute(args, true).map(|output| output.stdout_text())
    }
}

/// Runs commands as real OS processes
#[derive(Debug, Clone, Copy)]
pub struct HostCommandRunner {
    sandboxed: bool,
}

impl HostCommandRunner {
    pub fn new(sandboxed: bool) -> Self {
        Self { sandboxed }
    }

    pub fn for_context(context: &ExecutionContext) -> Self {
        Self::new(context.sandboxed)
    }

    /// The argument list actually handed to the OS
    pub fn command_line(&self, args: &[&str]) -> Vec<String> {
        let prefix: &[&str] = if self.sandboxed { &SANDBOX_ESCAPE } else { &[] };
        prefix.iter().chain(args.iter()).map(|s| s.to_string()).collect()
    }
}

impl CommandRunner for HostCommandRunner {
    fn execute(
        &self,
        args: &[&str],
        capture_output: bool,
    ) -> Result<CommandOutput, ExecutionError> {
        if args.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        let line = self.command_line(args);
        let command = line.join(" ");
        log::debug!("Running `{}`", command);

        let mut cmd = Command::new(&line[0]);
        cmd.args(&line[1..]);

        let spawn_error = |e: io::Error| match e.kind() {
            io::ErrorKind::NotFound => ExecutionError::NotFound { command: command.clone() },
            _ => ExecutionError::Io { command: command.clone(), source: e },
        };

        if !capture_output {
            cmd.stdin(Stdio::null()).stdout(Stdio::null());
            cmd.spawn().map_err(spawn_error)?;
            return Ok(CommandOutput::default());
        }

        let output = cmd.stderr(Stdio::null()).output().map_err(spawn_error)?;
        if !output.status.success() {
            return Err(ExecutionError::Failed {
                command,
                status: output.status.code(),
            });
        }

        Ok(CommandOutput {
            stdout: output.stdout,
            status: output.status.code(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted stand-in for the host runner.

    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;

    /// What a scripted command does when invoked
    #[derive(Debug, Clone)]
    pub enum Scripted {
        Stdout(String),
        Exit(i32),
        Missing,
    }

    /// Answers commands from a script. `cat <path>` falls back to reading
    /// the file so tests can point the probe at a temporary sysfs tree.
    #[derive(Default)]
    pub struct ScriptedRunner {
        script: HashMap<String, Scripted>,
        pub calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on(mut self, command: &str, reply: Scripted) -> Self {
            self.script.insert(command.to_string(), reply);
            self
        }

        pub fn calls_starting_with(&self, program: &str) -> usize {
            self.calls.borrow().iter().filter(|c| c.starts_with(program)).count()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn execute(
            &self,
            args: &[&str],
            _capture_output: bool,
        ) -> Result<CommandOutput, ExecutionError> {
            let command = args.join(" ");
            self.calls.borrow_mut().push(command.clone());

            let reply = match self.script.get(&command) {
                Some(reply) => reply.clone(),
                None if args.len() == 2 && args[0] == "cat" => match fs::read_to_string(args[1]) {
                    Ok(text) => Scripted::Stdout(text),
                    Err(_) => Scripted::Exit(1),
                },
                None => Scripted::Missing,
            };

            match reply {
                Scripted::Stdout(text) => Ok(CommandOutput {
                    stdout: text.into_bytes(),
                    status: Some(0),
                }),
                Scripted::Exit(code) => Err(ExecutionError::Failed {
                    command,
                    status: Some(code),
                }),
                Scripted::Missing => Err(ExecutionError::NotFound { command }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandboxed_runner_prepends_escape_prefix() {
        let runner = HostCommandRunner::new(true);
        assert_eq!(
            runner.command_line(&["lspci", "-d", "10de:1e07"]),
            vec!["flatpak-spawn", "--host", "lspci", "-d", "10de:1e07"]
        );
    }

    #[test]
    fn host_runner_passes_arguments_through() {
        let runner = HostCommandRunner::new(false);
        assert_eq!(
            runner.command_line(&["cat", "/etc/os-release"]),
            vec!["cat", "/etc/os-release"]
        );
    }

    #[test]
    fn empty_command_is_rejected() {
        let runner = HostCommandRunner::new(false);
        assert!(matches!(runner.execute(&[], true), Err(ExecutionError::EmptyCommand)));
    }

    #[test]
    fn missing_binary_is_reported_as_not_found() {
        let runner = HostCommandRunner::new(false);
        let err = runner
            .execute(&["optimus-probe-no-such-binary"], true)
            .unwrap_err();
        assert!(matches!(err, ExecutionError::NotFound { .. }));
    }

    #[test]
    fn nonzero_exit_carries_command_and_status() {
        let runner = HostCommandRunner::new(false);
        match runner.execute(&["sh", "-c", "exit 3"], true) {
            Err(ExecutionError::Failed { command, status }) => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(status, Some(3));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn captured_output_is_returned() {
        let runner = HostCommandRunner::new(false);
        let text = runner.read_stdout(&["echo", "PCI_CLASS=30000"]).unwrap();
        assert_eq!(text.trim_end(), "PCI_CLASS=30000");
    }

    #[test]
    fn detached_run_does_not_capture() {
        let runner = HostCommandRunner::new(false);
        let output = runner.execute(&["true"], false).unwrap();
        assert!(output.stdout.is_empty());
        assert_eq!(output.status, None);
    }
}
