//! # Chat UI
//!
//! Conversation turns, newest at the bottom, plus the watering alerts raised
//! since startup.

use crate::features::conversation::Role;
use crate::tui::ui::titled_block;
use crate::tui::App;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

/// Render the chat screen
pub fn render_chat(frame: &mut Frame, app: &App, area: Rect) {
    let alert_height = if app.alerts.is_empty() {
        0
    } else {
        (app.alerts.len().min(3) + 2) as u16
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(alert_height), Constraint::Min(0)])
        .split(area);

    if alert_height > 0 {
        render_alerts(frame, app, chunks[0]);
    }
    render_messages(frame, app, chunks[1]);
}

fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .alerts
        .iter()
        .rev()
        .take(3)
        .map(|a| Line::from(Span::styled(a.clone(), Style::default().fg(Color::LightBlue))))
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(titled_block("Watering")),
        area,
    );
}

fn render_messages(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if app.messages.is_empty() {
        let hint = if app.image_selected {
            "Photo ready. Press f to identify it."
        } else {
            "Press p and enter the path of a plant photo to get started."
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    }

    for message in &app.messages {
        let (label, color) = match message.role {
            Role::User => ("You", Color::Cyan),
            Role::Model => ("Greenthumb", Color::Green),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for text_line in message.text.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        lines.push(Line::from(""));
    }

    // Keep the newest turn in view unless the user scrolled up
    let inner_height = area.height.saturating_sub(2);
    let total = lines.len() as u16;
    let bottom = total.saturating_sub(inner_height);
    let offset = bottom.saturating_sub(app.chat_scroll);

    let title = match &app.plant_name {
        Some(name) => format!("Chat about {name}"),
        None => "Chat".to_string(),
    };

    let paragraph = Paragraph::new(lines)
        .block(titled_block(&title))
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));

    frame.render_widget(paragraph, area);
}
