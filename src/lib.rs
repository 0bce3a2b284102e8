// Optimus capability probe
//
// Checks whether a Linux host can run NVIDIA Optimus GPU switching:
// sandbox context, display server, distribution and NVIDIA GPU presence

pub mod error;
pub use error::{ProbeError, Result};

// Command execution, environment and the support decision
pub mod core;

// PCI scanning and GPU classification
pub mod gpu;

// User interface
pub mod ui;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging; `RUST_LOG` overrides the given default level
pub fn init_logging(default_level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}
