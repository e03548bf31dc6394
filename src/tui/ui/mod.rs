//! # TUI UI Components
//!
//! Ratatui-based UI rendering for each screen.

mod chat;
mod help;
mod reminders;

pub use chat::render_chat;
pub use help::render_help;
pub use reminders::render_reminders;

use crate::tui::app::{InputMode, InputPurpose};
use crate::tui::{App, Screen};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

/// Main render function - dispatches to screen-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Input line
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Chat => render_chat(frame, app, chunks[1]),
        Screen::Reminders => render_reminders(frame, app, chunks[1]),
        Screen::Help => render_help(frame, app, chunks[1]),
    }

    render_input(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

/// Render the tab bar
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .map(|s| {
            let style = if *s == app.current_screen {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(format!("[{}] {}", s.key(), s.title())).style(style)
        })
        .collect();

    let title = match &app.plant_name {
        Some(name) => format!(" 🌱 Greenthumb | {name} "),
        None => " 🌱 Greenthumb ".to_string(),
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(
            Screen::all()
                .iter()
                .position(|s| *s == app.current_screen)
                .unwrap_or(0),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow));

    frame.render_widget(tabs, area);
}

/// Render the input line. Disabled while a call is outstanding.
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let (title, text, style) = if let Some(label) = &app.pending {
        (
            " Working ".to_string(),
            format!("⏳ {label}"),
            Style::default().fg(Color::DarkGray),
        )
    } else if app.listening.is_some() {
        (
            " 🎙️ Listening ".to_string(),
            app.input_buffer.clone(),
            Style::default().fg(Color::Magenta),
        )
    } else if app.input_mode == InputMode::Editing {
        (
            format!(" {} ", app.input_purpose.label()),
            format!("{}▏", app.input_buffer),
            Style::default().fg(Color::Cyan),
        )
    } else {
        (
            format!(" {} ", InputPurpose::Message.label()),
            "Press i to ask a question, p to choose a photo".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let photo_status = if app.image_selected {
        Span::styled("● Photo", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ No photo", Style::default().fg(Color::Yellow))
    };

    let mode_status = match app.input_mode {
        InputMode::Normal => Span::raw(""),
        InputMode::Editing => Span::styled(
            " [EDITING] ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    };

    let help_hint = Span::styled(" q:Quit ?:Help ", Style::default().fg(Color::DarkGray));

    // Error or status message
    let message = if let Some(err) = &app.error_message {
        Span::styled(format!(" {err} "), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.status_message {
        Span::styled(format!(" {status} "), Style::default().fg(Color::Green))
    } else {
        Span::raw("")
    };

    let status_line = Line::from(vec![
        photo_status,
        Span::raw(" | "),
        mode_status,
        message,
        Span::raw(" "),
        help_hint,
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

/// Helper to create a block with title
pub fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
}
