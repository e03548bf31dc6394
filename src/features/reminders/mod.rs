//! # Reminders Feature
//!
//! Recurring watering reminders keyed by plant name, persisted as one
//! serialized record set, with a due-date check that alerts on load.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Accept epoch-millisecond start dates written by older clients
//! - 1.0.0: Initial release with store, derived due dates and load-time alerts

pub mod scheduler;
pub mod store;

pub use scheduler::{is_due, Alert, LogAlert, QueuedAlert, ReminderCheck, ReminderScheduler};
pub use store::{
    coerce_interval, next_watering_date, parse_interval, DerivedReminder, Reminder,
    ReminderStore, DAY_MS, REMINDERS_KEY,
};
