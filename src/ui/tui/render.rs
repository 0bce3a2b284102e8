// UI rendering functions for the TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::state::AppState;
use crate::ui::colors::{PastelColor, Theme};

/// Main UI render function
pub fn ui(f: &mut Frame, app: &AppState) {
    let theme = Theme::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(8), // Console log
            Constraint::Length(3), // Footer
        ])
        .split(f.size());

    render_title(f, app, chunks[0], &theme);

    if app.show_gpu_details && !app.gpus().is_empty() {
        render_gpu_details(f, app, chunks[1], &theme);
    } else {
        render_dashboard(f, app, chunks[1], &theme);
    }

    render_console(f, app, chunks[2]);
    render_footer(f, app, chunks[3], &theme);

    if let Some(message) = app.loading_message.as_ref() {
        render_loading_overlay(f, message, &theme);
    }
}

fn bordered(title: &str, color: PastelColor) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            title,
            Style::default().fg(color.as_color()).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(color.as_color()))
}

/// Render a loading overlay
fn render_loading_overlay(f: &mut Frame, message: &str, theme: &Theme) {
    let area = f.size();
    let overlay_height = 3;
    let overlay_width = (message.len() as u16 + 10).min(area.width);

    let x = area.width.saturating_sub(overlay_width) / 2;
    let y = area.height.saturating_sub(overlay_height) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height.min(area.height));

    let overlay = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(theme.primary.as_color()).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.accent.as_color())),
    )
    .alignment(Alignment::Center);

    f.render_widget(Clear, overlay_area);
    f.render_widget(overlay, overlay_area);
}

/// Render the title bar
fn render_title(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let heading = format!(" ✨ {} ✨ ", app.title);
    let title = Paragraph::new(Line::from(Span::styled(
        "NVIDIA Optimus Switching Readiness",
        Style::default().fg(theme.accent.as_color()).add_modifier(Modifier::BOLD),
    )))
    .block(bordered(&heading, theme.primary))
    .alignment(Alignment::Center);

    f.render_widget(title, area);
}

/// Render the main dashboard with the checks and GPU summary
fn render_dashboard(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_checks(f, app, chunks[0], theme);
    render_gpu_summary(f, app, chunks[1], theme);
}

fn check_line<'a>(label: &'a str, passed: bool, detail: String, theme: &Theme) -> Line<'a> {
    let mark = if passed { "✔ " } else { "✘ " };
    let bold = Style::default().add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled(mark, bold.fg(theme.check_color(passed))),
        Span::styled(label, bold.fg(theme.text.as_color())),
        Span::styled(detail, Style::default().fg(theme.text.as_color())),
    ])
}

/// Render the capability checks panel
fn render_checks(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let label_style = Style::default().fg(theme.text.as_color()).add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(theme.text.as_color());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Display server: ", label_style),
            Span::styled(app.context.display_server.to_string(), value_style),
        ]),
        Line::from(vec![
            Span::styled("Sandboxed: ", label_style),
            Span::styled(if app.context.sandboxed { "Flatpak" } else { "No" }, value_style),
        ]),
        Line::from(""),
    ];

    match (&app.report, &app.probe_error) {
        (Some(report), _) => {
            let verdict = report.verdict;
            lines.push(check_line(
                "Distribution: ",
                verdict.distro_supported,
                report.distribution.to_string(),
                theme,
            ));
            lines.push(check_line(
                "NVIDIA GPU: ",
                verdict.gpu_present,
                format!("{} found", report.gpus.len()),
                theme,
            ));
            lines.push(check_line(
                "Switching tool: ",
                verdict.switch_tool_present,
                app.config.switch_tool.clone(),
                theme,
            ));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                if report.supported { "System supported" } else { "System NOT supported" },
                Style::default()
                    .fg(theme.check_color(report.supported))
                    .add_modifier(Modifier::BOLD),
            )));
        }
        (None, Some(error)) => {
            lines.push(Line::from(Span::styled(
                format!("Probe failed: {}", error),
                Style::default().fg(theme.error.as_color()),
            )));
        }
        (None, None) => {
            lines.push(Line::from(Span::styled(
                "Probing...",
                Style::default().fg(theme.muted.as_color()),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(bordered(" Capability Checks ", theme.secondary))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Render the NVIDIA GPU list
fn render_gpu_summary(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let gpus = app.gpus();

    let items: Vec<ListItem> = if gpus.is_empty() {
        vec![ListItem::new(Span::styled(
            "No NVIDIA GPU detected",
            Style::default().fg(theme.muted.as_color()),
        ))]
    } else {
        gpus.iter()
            .map(|gpu| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        gpu.model_name.as_str(),
                        Style::default().fg(theme.text.as_color()).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {} [{}]", gpu.descriptor.bus_slot, gpu.descriptor.pci_id()),
                        Style::default().fg(theme.muted.as_color()),
                    )),
                ])
            })
            .collect()
    };

    f.render_widget(List::new(items).block(bordered(" NVIDIA GPUs ", theme.accent)), area);
}

/// Render details of the selected GPU
fn render_gpu_details(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let Some(gpu) = app.selected_gpu() else {
        return;
    };

    let label_style = Style::default().fg(theme.text.as_color()).add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(theme.text.as_color());
    let field = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, label_style), Span::styled(value, value_style)])
    };

    let lines = vec![
        field("Model: ", gpu.model_name.clone()),
        field("Bus slot: ", gpu.descriptor.bus_slot.clone()),
        field("Vendor ID: ", gpu.descriptor.vendor_id.clone()),
        field("Device ID: ", gpu.descriptor.device_id.clone()),
        field("Class: ", gpu.descriptor.pci_class.clone()),
    ];

    let title = format!(" GPU {} of {} ", app.selected_gpu_index + 1, app.gpus().len());
    let paragraph = Paragraph::new(lines)
        .block(bordered(&title, theme.accent))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Render the console feed
fn render_console(f: &mut Frame, app: &AppState, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.log_messages.len().saturating_sub(visible);

    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .skip(skip)
        .map(|msg| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", msg.timestamp),
                    Style::default().fg(PastelColor::Gray.as_color()),
                ),
                Span::styled(msg.text.as_str(), Style::default().fg(msg.level.color())),
            ]))
        })
        .collect();

    f.render_widget(List::new(log_items).block(bordered(" Console ", PastelColor::Gray)), area);
}

/// Render the footer with key hints
fn render_footer(f: &mut Frame, app: &AppState, area: Rect, theme: &Theme) {
    let key_style = Style::default().fg(theme.accent.as_color()).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(theme.text.as_color());

    let mut help_text = vec![
        Span::styled("r", key_style),
        Span::styled(" probe again | ", text_style),
    ];

    if app.show_gpu_details {
        help_text.extend(vec![
            Span::styled("↑/↓", key_style),
            Span::styled(" change GPU | ", text_style),
            Span::styled("Esc", key_style),
            Span::styled(" back | ", text_style),
        ]);
    } else if !app.gpus().is_empty() {
        help_text.extend(vec![
            Span::styled("g", key_style),
            Span::styled(" GPU details | ", text_style),
        ]);
    }

    help_text.extend(vec![Span::styled("q", key_style), Span::styled("uit", text_style)]);

    let paragraph = Paragraph::new(Line::from(help_text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(PastelColor::Gray.as_color())),
        )
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
