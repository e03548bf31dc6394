//! # TUI Application Core
//!
//! Main application state and screen navigation. The assistant itself lives
//! behind a lock in the binary; `App` keeps a snapshot of what to draw plus
//! the input line and the pending flag.

use crate::assistant::PlantAssistant;
use crate::features::conversation::ChatMessage;
use crate::features::speech::{CaptureHandle, Transcript, TranscriptEvent};

/// Available screens in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Reminders,
    Help,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Chat => "Plant Chat",
            Screen::Reminders => "Watering Reminders",
            Screen::Help => "Help",
        }
    }

    pub fn key(&self) -> char {
        match self {
            Screen::Chat => '1',
            Screen::Reminders => '2',
            Screen::Help => '?',
        }
    }

    pub fn all() -> &'static [Screen] {
        &[Screen::Chat, Screen::Reminders, Screen::Help]
    }
}

/// Input mode for text entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Purpose of the current input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPurpose {
    /// Question for the assistant
    #[default]
    Message,
    /// Path to a plant photo
    ImagePath,
    /// Watering interval in days
    Interval,
    /// Path to a recorded question
    AudioPath,
}

impl InputPurpose {
    pub fn label(&self) -> &'static str {
        match self {
            InputPurpose::Message => "Ask",
            InputPurpose::ImagePath => "Photo path",
            InputPurpose::Interval => "Water every (days)",
            InputPurpose::AudioPath => "Audio file",
        }
    }
}

/// One reminder row, pre-rendered at sync time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRow {
    pub plant_name: String,
    pub summary: String,
    pub due: bool,
}

/// Main application state
pub struct App {
    /// Current screen
    pub current_screen: Screen,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Purpose of the current input
    pub input_purpose: InputPurpose,
    /// Input buffer for text entry
    pub input_buffer: String,
    /// What the outstanding call is doing; input is ignored while set
    pub pending: Option<String>,
    /// Voice capture in progress
    pub listening: Option<CaptureHandle>,
    /// Running transcript while listening
    pub transcript: Transcript,
    /// Conversation turns
    pub messages: Vec<ChatMessage>,
    /// Identified plant, if any
    pub plant_name: Option<String>,
    pub image_selected: bool,
    pub can_share: bool,
    pub has_voice: bool,
    pub reminders: Vec<ReminderRow>,
    /// Selected index for the reminder list
    pub selected_index: usize,
    /// Lines scrolled up from the bottom of the chat
    pub chat_scroll: u16,
    /// Error message to display
    pub error_message: Option<String>,
    /// Status message to display
    pub status_message: Option<String>,
    /// Watering alerts raised since startup, newest last
    pub alerts: Vec<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        App {
            current_screen: Screen::Chat,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_purpose: InputPurpose::default(),
            input_buffer: String::new(),
            pending: None,
            listening: None,
            transcript: Transcript::default(),
            messages: Vec::new(),
            plant_name: None,
            image_selected: false,
            can_share: false,
            has_voice: false,
            reminders: Vec::new(),
            selected_index: 0,
            chat_scroll: 0,
            error_message: None,
            status_message: None,
            alerts: Vec::new(),
        }
    }

    /// Copy everything drawable out of the assistant
    pub fn sync(&mut self, assistant: &PlantAssistant) {
        let now = assistant.now();
        self.messages = assistant.messages().to_vec();
        self.plant_name = assistant.plant_name().map(str::to_string);
        self.image_selected = assistant.has_image();
        self.can_share = assistant.can_share();
        self.has_voice = assistant.has_voice();
        self.reminders = assistant
            .reminders()
            .iter()
            .map(|r| ReminderRow {
                plant_name: r.plant_name().to_string(),
                summary: r.describe(now),
                due: crate::features::reminders::is_due(r, now),
            })
            .collect();
        if self.selected_index >= self.reminders.len() {
            self.selected_index = self.reminders.len().saturating_sub(1);
        }
    }

    /// Switch to a different screen
    pub fn switch_screen(&mut self, screen: Screen) {
        self.current_screen = screen;
        self.selected_index = 0;
        self.stop_editing();
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.listening.is_some()
    }

    /// Mark a call as outstanding
    pub fn start_pending(&mut self, label: impl Into<String>) {
        self.pending = Some(label.into());
        self.clear_error();
        self.clear_status();
    }

    /// Record how the outstanding call ended
    pub fn finish_pending(&mut self, result: Result<String, String>) {
        self.pending = None;
        match result {
            Ok(status) if status.is_empty() => {}
            Ok(status) => self.status_message = Some(status),
            Err(e) => self.error_message = Some(e),
        }
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn push_alerts(&mut self, alerts: Vec<String>) {
        if let Some(last) = alerts.last() {
            self.status_message = Some(last.clone());
        }
        self.alerts.extend(alerts);
    }

    // ------------------------------------------------------------------
    // Voice
    // ------------------------------------------------------------------

    pub fn start_listening(&mut self, handle: CaptureHandle) {
        self.listening = Some(handle);
        self.transcript = Transcript::default();
        self.input_mode = InputMode::Normal;
        self.input_purpose = InputPurpose::Message;
        self.input_buffer.clear();
        self.clear_error();
        self.status_message = Some("Listening... Esc to stop".to_string());
    }

    pub fn stop_listening(&mut self) {
        if let Some(handle) = &self.listening {
            handle.stop();
        }
    }

    /// Interim text goes to the input line; once the capture ends the
    /// committed text is left there as an editable question
    pub fn apply_transcript(&mut self, event: TranscriptEvent) {
        self.transcript.apply(&event);
        match event {
            TranscriptEvent::Interim(_) | TranscriptEvent::Final(_) => {
                self.input_buffer = self.transcript.display();
            }
            TranscriptEvent::Error(message) => {
                self.error_message = Some(format!("Voice input failed: {message}"));
            }
            TranscriptEvent::End => {
                self.listening = None;
                self.input_buffer = self.transcript.committed().to_string();
                if self.input_buffer.is_empty() {
                    self.status_message = Some("I didn't catch anything.".to_string());
                } else {
                    self.input_mode = InputMode::Editing;
                    self.input_purpose = InputPurpose::Message;
                    self.status_message = Some("Enter to send, Esc to discard".to_string());
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.reminders.len() {
            self.selected_index += 1;
        }
    }

    pub fn selected_reminder(&self) -> Option<&ReminderRow> {
        self.reminders.get(self.selected_index)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    // ------------------------------------------------------------------
    // Text input
    // ------------------------------------------------------------------

    pub fn start_input(&mut self, purpose: InputPurpose) {
        self.input_mode = InputMode::Editing;
        self.input_purpose = purpose;
        self.input_buffer.clear();
        self.clear_error();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn input_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Take the input line and leave editing mode
    pub fn take_input(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.input_buffer).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::speech::TranscriptStream;

    #[test]
    fn test_pending_round_trip() {
        let mut app = App::new();
        app.error_message = Some("old".to_string());

        app.start_pending("Identifying...");
        assert!(app.is_busy());
        assert!(app.error_message.is_none());

        app.finish_pending(Err("⚠️ The model did not answer in time".to_string()));
        assert!(!app.is_busy());
        assert_eq!(
            app.error_message.as_deref(),
            Some("⚠️ The model did not answer in time")
        );
    }

    #[test]
    fn test_take_input_trims_and_leaves_editing() {
        let mut app = App::new();
        app.start_input(InputPurpose::Interval);
        for c in " 14 ".chars() {
            app.input_char(c);
        }
        app.input_backspace();

        assert_eq!(app.take_input(), "14");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn test_transcript_fills_input_line() {
        let (_sender, stream) = TranscriptStream::channel(1);
        let mut app = App::new();
        app.start_listening(stream.handle());

        app.apply_transcript(TranscriptEvent::Interim("should I".into()));
        assert_eq!(app.input_buffer, "should I");

        app.apply_transcript(TranscriptEvent::Final("Should I prune it?".into()));
        app.apply_transcript(TranscriptEvent::End);
        assert!(app.listening.is_none());
        assert_eq!(app.input_buffer, "Should I prune it?");
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.input_purpose, InputPurpose::Message);
    }

    #[test]
    fn test_stop_listening_signals_capture() {
        let (_sender, stream) = TranscriptStream::channel(1);
        let handle = stream.handle();
        let mut app = App::new();
        app.start_listening(handle.clone());

        app.stop_listening();
        app.stop_listening();
        assert!(handle.is_stopped());

        app.apply_transcript(TranscriptEvent::End);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("I didn't catch anything."));
    }

    #[test]
    fn test_reminder_selection_bounds() {
        let mut app = App::new();
        app.reminders = vec![
            ReminderRow {
                plant_name: "Fern".to_string(),
                summary: String::new(),
                due: false,
            },
            ReminderRow {
                plant_name: "Cactus".to_string(),
                summary: String::new(),
                due: true,
            },
        ];

        app.select_previous();
        assert_eq!(app.selected_index, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_reminder().unwrap().plant_name, "Cactus");
    }
}
