//! # Conversation Feature
//!
//! Ordered chat turns plus the model-side session handle for the plant that
//! is currently being discussed.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Seed new sessions with the identification exchange
//! - 1.0.0: Initial release with optimistic send and rollback on failure

pub mod message;
pub mod session;

pub use message::{ChatMessage, Role};
pub use session::{ConversationSession, SessionState};
