//! # Core Module
//!
//! Configuration, clock, input errors and file helpers shared by every feature.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add clock module so reminder math can be pinned in tests
//! - 1.0.0: Initial creation with config, error and file_utils modules

pub mod clock;
pub mod config;
pub mod error;
pub mod file_utils;

// Re-export commonly used items
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::FixedClock;
pub use config::Config;
pub use error::{as_input_error, user_message, InputError};
