//! # Features
//!
//! Each feature lives in its own module with a version header. Optional
//! features (speech, share) are switched on by configuration.

pub mod conversation;
pub mod identification;
pub mod model;
pub mod reminders;
pub mod share;
pub mod speech;

// Conversation
pub use conversation::{ChatMessage, ConversationSession, Role, SessionState};
// Identification
pub use identification::{extract_plant_name, Identification, IdentificationFlow};
// Model
pub use model::{GeminiClient, ImageInput, ModelChat, PlantModel};
// Reminders
pub use reminders::{
    parse_interval, Alert, DerivedReminder, LogAlert, QueuedAlert, Reminder, ReminderCheck,
    ReminderScheduler, ReminderStore,
};
// Share
pub use share::{FileShare, SharePayload, ShareTarget};
// Speech
pub use speech::{
    CaptureHandle, SpeechCapture, Transcript, TranscriptEvent, TranscriptStream, WhisperCapture,
    WhisperTranscriber,
};
