// Terminal UI module for the Optimus capability probe
//
// A pastel ratatui dashboard showing each capability check, the NVIDIA
// GPUs found on the bus and a console feed of what the probe did

pub mod colors;
pub mod tui;

use std::io;

use crate::core::config::ProbeConfig;
use crate::core::context::ExecutionContext;

/// Runs the ratatui-based UI
pub fn run_tui(context: ExecutionContext, config: ProbeConfig) -> io::Result<()> {
    tui::run_app(context, config)
}
