//! # TUI Event Handling
//!
//! Keyboard input, tick events, and results coming back from assistant calls
//! that run in the background.

use crate::features::speech::TranscriptEvent;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// TUI events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick for periodic updates
    Tick,
    /// A background call finished: status text or user-facing error
    Done(Result<String, String>),
    /// Voice capture progress
    Transcript(TranscriptEvent),
}

/// Event handler that combines keyboard, tick, and background events
pub struct EventHandler {
    /// Event receiver
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate: Duration) -> (Self, mpsc::UnboundedSender<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();

        // Spawn keyboard event handler
        let key_tx = tx.clone();
        std::thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) => {
                        if key_tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => {
                        if key_tx.send(Event::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            } else if key_tx.send(Event::Tick).is_err() {
                break;
            }
        });

        (EventHandler { rx }, tx)
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// No action
    None,
    /// Quit the application
    Quit,
    /// Switch to screen
    SwitchScreen(crate::tui::Screen),
    /// Move selection up
    Up,
    /// Move selection down
    Down,
    /// Scroll the chat
    PageUp,
    PageDown,
    /// Go back / Cancel / stop listening
    Back,
    /// Type a question
    StartMessageInput,
    /// Enter a photo path
    ChoosePhoto,
    /// Identify the chosen photo
    Identify,
    /// Enter a watering interval
    StartReminderInput,
    /// Share the care guide
    Share,
    /// Enter an audio file path
    Listen,
    /// Delete the selected reminder
    Delete,
    /// Reload reminders and alert for due ones
    Refresh,
    /// Start over with a new plant
    Reset,
    /// Submit text input
    SubmitInput,
    /// Cancel text input
    CancelInput,
    /// Character input
    Char(char),
    /// Backspace
    Backspace,
}

/// Map a key event to an action
pub fn map_key_event(key: KeyEvent, in_edit_mode: bool) -> KeyAction {
    if in_edit_mode {
        // In edit mode, handle text input
        match key.code {
            KeyCode::Esc => KeyAction::CancelInput,
            KeyCode::Enter => KeyAction::SubmitInput,
            KeyCode::Backspace => KeyAction::Backspace,
            KeyCode::Char(c) => KeyAction::Char(c),
            _ => KeyAction::None,
        }
    } else {
        // Normal mode navigation
        match (key.code, key.modifiers) {
            // Quit
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

            // Screen switching
            (KeyCode::Char('1'), KeyModifiers::NONE) => {
                KeyAction::SwitchScreen(crate::tui::Screen::Chat)
            }
            (KeyCode::Char('2'), KeyModifiers::NONE) => {
                KeyAction::SwitchScreen(crate::tui::Screen::Reminders)
            }
            (KeyCode::Char('?'), _) => KeyAction::SwitchScreen(crate::tui::Screen::Help),

            // Navigation
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Up,
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Down,
            (KeyCode::PageUp, _) => KeyAction::PageUp,
            (KeyCode::PageDown, _) => KeyAction::PageDown,
            (KeyCode::Esc, _) => KeyAction::Back,

            // Plant actions
            (KeyCode::Char('i'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
                KeyAction::StartMessageInput
            }
            (KeyCode::Char('p'), KeyModifiers::NONE) => KeyAction::ChoosePhoto,
            (KeyCode::Char('f'), KeyModifiers::NONE) => KeyAction::Identify,
            (KeyCode::Char('w'), KeyModifiers::NONE) => KeyAction::StartReminderInput,
            (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Share,
            (KeyCode::Char('v'), KeyModifiers::NONE) => KeyAction::Listen,
            (KeyCode::Char('x'), KeyModifiers::NONE) => KeyAction::Reset,

            // Reminder list
            (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Refresh,
            (KeyCode::Char('d'), KeyModifiers::NONE) | (KeyCode::Delete, _) => KeyAction::Delete,

            _ => KeyAction::None,
        }
    }
}
