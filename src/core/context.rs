// Execution context for the Optimus capability probe
//
// Everything the probe needs to know from the process environment is
// read here once, at startup, and passed around explicitly afterwards.

use std::env;
use std::fmt;

use serde::Serialize;

/// Set by the Flatpak runtime inside every sandboxed app
pub const SANDBOX_MARKER_VAR: &str = "FLATPAK_ID";

/// Session type exported by the login manager
pub const SESSION_TYPE_VAR: &str = "XDG_SESSION_TYPE";

/// The display server the current session runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayServer {
    X11,
    Wayland,
    Unknown,
}

impl DisplayServer {
    /// Maps an `XDG_SESSION_TYPE` value onto a display server
    pub fn from_session_type(value: Option<&str>) -> Self {
        match value {
            Some("x11") => DisplayServer::X11,
            Some("wayland") => DisplayServer::Wayland,
            _ => DisplayServer::Unknown,
        }
    }
}

impl fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DisplayServer::X11 => write!(f, "X11"),
            DisplayServer::Wayland => write!(f, "Wayland"),
            DisplayServer::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Environment-derived facts about where the probe is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionContext {
    /// Running inside a Flatpak sandbox; host commands need `flatpak-spawn`
    pub sandboxed: bool,
    pub display_server: DisplayServer,
}

impl ExecutionContext {
    /// Reads the context from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the context from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_type = lookup(SESSION_TYPE_VAR);

        ExecutionContext {
            sandboxed: lookup(SANDBOX_MARKER_VAR).is_some(),
            display_server: DisplayServer::from_session_type(session_type.as_deref()),
        }
    }

    /// A context for running directly on the host
    pub fn host() -> Self {
        ExecutionContext {
            sandboxed: false,
            display_server: DisplayServer::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn context_from(vars: &[(&str, &str)]) -> ExecutionContext {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExecutionContext::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn flatpak_marker_means_sandboxed() {
        let ctx = context_from(&[(SANDBOX_MARKER_VAR, "io.github.optimus")]);
        assert!(ctx.sandboxed);

        let ctx = context_from(&[]);
        assert!(!ctx.sandboxed);
    }

    #[test]
    fn session_type_maps_to_display_server() {
        let display_server =
            |value: &str| context_from(&[(SESSION_TYPE_VAR, value)]).display_server;

        assert_eq!(display_server("x11"), DisplayServer::X11);
        assert_eq!(display_server("wayland"), DisplayServer::Wayland);
        assert_eq!(display_server("tty"), DisplayServer::Unknown);
        assert_eq!(display_server("X11"), DisplayServer::Unknown);
        assert_eq!(context_from(&[]).display_server, DisplayServer::Unknown);
    }
}
