// Core layer - config, clock, input errors, file helpers
pub mod core;

// Storage layer - key/value backends
pub mod storage;

// Features layer - all feature modules
pub mod features;

// Application layer
pub mod assistant;
pub mod commands;

// TUI layer - terminal user interface (optional feature)
#[cfg(feature = "tui")]
pub mod tui;

pub use assistant::PlantAssistant;
pub use core::Config;

// Re-export feature items used by the binaries
pub use features::{
    // Conversation
    ChatMessage, Role,
    // Identification
    Identification,
    // Model
    GeminiClient, ImageInput,
    // Reminders
    DerivedReminder, LogAlert, QueuedAlert, ReminderStore,
    // Speech
    TranscriptEvent,
};
