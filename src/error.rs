// Error types for the Optimus capability probe

use thiserror::Error;

use crate::core::command::ExecutionError;

/// Errors surfaced by the probe to its caller
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("not yet supported: {0}")]
    Unsupported(String),
}

/// Result type alias for the probe
pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// Create an unsupported-operation error
    pub fn unsupported<S: Into<String>>(what: S) -> Self {
        ProbeError::Unsupported(what.into())
    }
}
