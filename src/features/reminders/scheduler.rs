//! # Feature: Watering Alerts
//!
//! Checks reminders every time the set is loaded and raises a one-shot alert
//! for each plant whose next watering falls within a day of now. Nothing is
//! remembered between loads, so reopening the app inside the window alerts
//! again.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use super::store::{DerivedReminder, ReminderStore};

/// Destination for watering alerts. Implementations must return quickly.
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str) -> Result<()>;
}

/// Writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn alert(&self, message: &str) -> Result<()> {
        info!("{message}");
        Ok(())
    }
}

/// Collects alerts for a front-end to show on its next redraw
#[derive(Debug, Default, Clone)]
pub struct QueuedAlert {
    queue: Arc<Mutex<Vec<String>>>,
}

impl QueuedAlert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued message, oldest first
    pub fn drain(&self) -> Vec<String> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }
}

impl Alert for QueuedAlert {
    fn alert(&self, message: &str) -> Result<()> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| anyhow!("alert queue lock poisoned"))?;
        queue.push(message.to_string());
        Ok(())
    }
}

/// True when `now` is within `[next - 1 day, next + 1 day)`
pub fn is_due(reminder: &DerivedReminder, now: DateTime<Utc>) -> bool {
    let window = Duration::days(1);
    let next = reminder.next_watering_date;
    now >= next - window && now < next + window
}

pub fn due_message(plant_name: &str) -> String {
    format!("💧 Time to water your {plant_name}!")
}

/// Result of one load-and-check pass
#[derive(Debug, Clone, Default)]
pub struct ReminderCheck {
    pub reminders: Vec<DerivedReminder>,
    /// Plants an alert was raised for during this pass
    pub alerted: Vec<String>,
}

pub struct ReminderScheduler {
    alert: Arc<dyn Alert>,
}

impl ReminderScheduler {
    pub fn new(alert: Arc<dyn Alert>) -> Self {
        Self { alert }
    }

    /// Load the reminder set and alert for everything due
    pub fn check(&self, store: &ReminderStore) -> ReminderCheck {
        let reminders = store.load();
        let alerted = self.notify_due(&reminders, store.now());
        ReminderCheck { reminders, alerted }
    }

    /// Alert once for each due reminder in `reminders`.
    ///
    /// Alert failures are logged and skipped; they never abort the pass.
    pub fn notify_due(&self, reminders: &[DerivedReminder], now: DateTime<Utc>) -> Vec<String> {
        let mut alerted = Vec::new();

        for reminder in reminders.iter().filter(|r| is_due(r, now)) {
            let name = reminder.plant_name();
            debug!(
                "Reminder for '{name}' is due ({})",
                reminder.next_watering_date.format("%Y-%m-%d %H:%M")
            );

            match self.alert.alert(&due_message(name)) {
                Ok(()) => alerted.push(name.to_string()),
                Err(e) => warn!("Failed to deliver watering alert for '{name}': {e}"),
            }
        }

        alerted
    }
}
