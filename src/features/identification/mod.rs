//! # Identification Feature
//!
//! Turns a plant photo into an identified plant name plus care text, and
//! starts a conversation scoped to that plant.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod extract;
pub mod flow;
pub mod prompt;

pub use extract::extract_plant_name;
pub use flow::{Identification, IdentificationFlow};
