// Application state management for the TUI

use ratatui::style::Color;

use crate::core::config::ProbeConfig;
use crate::core::context::ExecutionContext;
use crate::core::validator::SystemReport;
use crate::gpu::DetectedGpu;
use crate::ui::colors::PastelColor;

/// Console feed keeps at most this many messages
const MAX_LOG_MESSAGES: usize = 100;

/// A styled log message for the console feed
#[derive(Clone)]
pub struct LogMessage {
    pub timestamp: String,
    pub text: String,
    pub level: LogLevel,
}

/// Log message levels with associated colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get the color for this log level
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Info => PastelColor::Lavender.as_color(),
            LogLevel::Success => PastelColor::Mint.as_color(),
            LogLevel::Warning => PastelColor::Peach.as_color(),
            LogLevel::Error => PastelColor::Pink.as_color(),
        }
    }
}

/// Ratatui app state
pub struct AppState {
    pub title: String,
    pub should_quit: bool,
    pub context: ExecutionContext,
    pub config: ProbeConfig,
    pub report: Option<SystemReport>,
    pub probe_error: Option<String>,
    pub loading_message: Option<String>,
    pub log_messages: Vec<LogMessage>,
    pub selected_gpu_index: usize,
    pub show_gpu_details: bool,
}

impl AppState {
    pub fn new(context: ExecutionContext, config: ProbeConfig) -> Self {
        Self {
            title: "Optimus Probe".to_string(),
            should_quit: false,
            context,
            config,
            report: None,
            probe_error: None,
            loading_message: None,
            log_messages: Vec::new(),
            selected_gpu_index: 0,
            show_gpu_details: false,
        }
    }

    /// Add a log message to the console feed
    pub fn add_log(&mut self, text: &str, level: LogLevel) {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();

        self.log_messages.push(LogMessage {
            timestamp,
            text: text.to_string(),
            level,
        });

        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    /// GPUs from the last successful probe
    pub fn gpus(&self) -> &[DetectedGpu] {
        self.report.as_ref().map(|r| r.gpus.as_slice()).unwrap_or(&[])
    }

    pub fn selected_gpu(&self) -> Option<&DetectedGpu> {
        self.gpus().get(self.selected_gpu_index)
    }

    pub fn select_next_gpu(&mut self) {
        let count = self.gpus().len();
        if count > 0 {
            self.selected_gpu_index = (self.selected_gpu_index + 1) % count;
        }
    }

    pub fn select_previous_gpu(&mut self) {
        let count = self.gpus().len();
        if count > 0 {
            self.selected_gpu_index = (self.selected_gpu_index + count - 1) % count;
        }
    }
}
