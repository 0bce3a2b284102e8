// Input handling for the TUI

use crossterm::event::{KeyCode, KeyModifiers};

use super::state::{AppState, LogLevel};

/// Handles key events for the application. Returns true when the user
/// asked for the probe to run again.
pub fn handle_key_event(app: &mut AppState, key_code: KeyCode, modifiers: KeyModifiers) -> bool {
    match key_code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Esc => {
            if app.show_gpu_details {
                app.show_gpu_details = false;
                app.add_log("Returning to main dashboard view", LogLevel::Info);
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Up if app.show_gpu_details => app.select_previous_gpu(),
        KeyCode::Down if app.show_gpu_details => app.select_next_gpu(),
        KeyCode::Char('g') => {
            if app.gpus().is_empty() {
                app.add_log("No NVIDIA GPUs detected to show details for.", LogLevel::Warning);
            } else {
                app.show_gpu_details = !app.show_gpu_details;
                app.add_log(
                    if app.show_gpu_details {
                        "Showing detailed GPU information (Use ↑/↓ to navigate, Esc to go back)"
                    } else {
                        "Returning to main dashboard view"
                    },
                    LogLevel::Info,
                );
            }
        }
        KeyCode::Char('r') => return true,
        _ => {}
    }

    false
}
