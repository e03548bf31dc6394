//! # Help UI
//!
//! Keybindings and usage help.

use crate::tui::ui::titled_block;
use crate::tui::App;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Render the help screen
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_keybindings(frame, chunks[0]);
    render_capabilities(frame, app, chunks[1]);
}

fn render_keybindings(frame: &mut Frame, area: Rect) {
    let keybindings = vec![
        (
            "General",
            vec![
                ("q", "Quit application"),
                ("Ctrl+c", "Force quit"),
                ("1 / 2 / ?", "Chat / Reminders / Help"),
                ("Esc", "Cancel input or stop listening"),
            ],
        ),
        (
            "Plant",
            vec![
                ("p", "Choose a photo by path"),
                ("f", "Identify the photo"),
                ("i / Enter", "Ask a question"),
                ("v", "Ask by voice (audio file)"),
                ("w", "Set watering reminder"),
                ("s", "Share care guide"),
                ("x", "Start over"),
            ],
        ),
        (
            "Reminders",
            vec![
                ("j / Down", "Move down"),
                ("k / Up", "Move up"),
                ("d", "Delete reminder"),
                ("r", "Reload and check due"),
            ],
        ),
        (
            "Text Input",
            vec![
                ("Enter", "Submit input"),
                ("Esc", "Cancel input"),
                ("Backspace", "Delete character"),
            ],
        ),
    ];

    let mut lines = vec![];

    for (section, bindings) in keybindings {
        lines.push(Line::from(vec![Span::styled(
            section,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )]));

        for (key, desc) in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<15}"), Style::default().fg(Color::Cyan)),
                Span::raw(desc),
            ]));
        }

        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(titled_block("Keybindings"))
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn render_capabilities(frame: &mut Frame, app: &App, area: Rect) {
    let on_off = |enabled: bool, hint: &'static str| -> Span<'static> {
        if enabled {
            Span::styled("on", Style::default().fg(Color::Green))
        } else {
            Span::styled(hint, Style::default().fg(Color::DarkGray))
        }
    };

    let lines = vec![
        Line::from(Span::styled(
            "How it works",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from("  1. Choose a photo of your plant"),
        Line::from("  2. Identify it to get care instructions"),
        Line::from("  3. Ask follow-up questions about it"),
        Line::from("  4. Set a watering reminder"),
        Line::from(""),
        Line::from("  Reminders alert when a watering is within a day,"),
        Line::from("  each time they are loaded."),
        Line::from(""),
        Line::from(Span::styled(
            "Optional features",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("  Voice input: "),
            on_off(app.has_voice, "off (set OPENAI_API_KEY)"),
        ]),
        Line::from(vec![
            Span::raw("  Sharing:     "),
            on_off(app.can_share, "unavailable (set SHARE_DIR, identify a plant)"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("Greenthumb v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(titled_block("Guide"))
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}
