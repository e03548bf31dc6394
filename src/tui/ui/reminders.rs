//! # Reminders UI
//!
//! Watering reminders sorted by next watering date, due ones highlighted.

use crate::tui::ui::titled_block;
use crate::tui::App;
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

/// Render the reminders screen
pub fn render_reminders(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    if app.reminders.is_empty() {
        let paragraph = Paragraph::new("No watering reminders yet. Identify a plant, then press w.")
            .style(Style::default().fg(Color::DarkGray))
            .block(titled_block("Reminders"));
        frame.render_widget(paragraph, chunks[0]);
    } else {
        let items: Vec<ListItem> = app
            .reminders
            .iter()
            .map(|row| {
                let (marker, style) = if row.due {
                    ("💧 ", Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD))
                } else {
                    ("   ", Style::default().fg(Color::White))
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(row.summary.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(titled_block(&format!("Reminders ({})", app.reminders.len())))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(app.selected_index));
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    let hint = Paragraph::new("j/k: Select   d: Delete   r: Reload and check due   w: Remind for current plant")
        .style(Style::default().fg(Color::DarkGray))
        .block(titled_block("Actions"));
    frame.render_widget(hint, chunks[1]);
}
