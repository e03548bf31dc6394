//! # TUI Module
//!
//! Terminal user interface for the plant assistant.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial TUI implementation with chat, reminders and help screens

pub mod app;
pub mod event;
pub mod ui;

pub use app::{App, Screen};
pub use event::{Event, EventHandler};
