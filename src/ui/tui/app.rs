// Main application loop for the TUI

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::command::HostCommandRunner;
use crate::core::config::ProbeConfig;
use crate::core::context::ExecutionContext;
use crate::core::validator::SystemValidator;

use super::input::handle_key_event;
use super::render::ui;
use super::state::{AppState, LogLevel};

/// Run every capability check and feed the findings to the console
pub(super) fn run_probe(app: &mut AppState) {
    app.add_log("Starting capability probe...", LogLevel::Info);

    let runner = HostCommandRunner::for_context(&app.context);
    let validator = SystemValidator::new(&runner, app.context, app.config.clone());

    if app.context.sandboxed {
        app.add_log(
            "Running inside Flatpak, host commands go through flatpak-spawn",
            LogLevel::Info,
        );
    }

    let report = match validator.report() {
        Ok(report) => report,
        Err(e) => {
            app.add_log(&format!("Probe failed: {}", e), LogLevel::Error);
            app.probe_error = Some(e.to_string());
            app.report = None;
            return;
        }
    };

    app.add_log(&format!("Distribution: {}", report.distribution), LogLevel::Info);
    if report.gpus.is_empty() {
        app.add_log("No NVIDIA GPU found on the PCI bus", LogLevel::Warning);
    }
    for gpu in &report.gpus {
        app.add_log(
            &format!("NVIDIA GPU found: {} ({})", gpu.model_name, gpu.descriptor.bus_slot),
            LogLevel::Success,
        );
    }
    if !report.verdict.switch_tool_present {
        app.add_log(&format!("{} is not installed", app.config.switch_tool), LogLevel::Warning);
    }

    if report.supported {
        app.add_log("This system supports GPU switching", LogLevel::Success);
    } else {
        app.add_log("This system does not support GPU switching", LogLevel::Warning);
    }

    app.probe_error = None;
    app.selected_gpu_index = 0;
    app.show_gpu_details = false;
    app.report = Some(report);
}

/// Run the ratatui app
pub fn run_app(context: ExecutionContext, config: ProbeConfig) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(context, config);
    app.add_log("Welcome to Optimus Probe", LogLevel::Info);

    // Probe once on startup, showing the overlay while commands run
    app.loading_message = Some("Probing system...".to_string());
    terminal.draw(|f| ui(f, &app))?;
    run_probe(&mut app);
    app.loading_message = None;
    app.add_log("Press 'g' for GPU details, 'r' to probe again, 'q' to quit.", LogLevel::Info);

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let result = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &app)) {
            break Err(e);
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key.code, key.modifiers) {
                        app.loading_message = Some("Probing system...".to_string());
                        if let Err(e) = terminal.draw(|f| ui(f, &app)) {
                            break Err(e);
                        }
                        run_probe(&mut app);
                        app.loading_message = None;
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        if app.should_quit {
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}
