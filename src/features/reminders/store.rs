//! # Feature: Reminder Store
//!
//! Owns the watering reminders. The whole set lives under a single storage
//! key and is rewritten on every mutation; storage is the source of truth and
//! nothing is cached between calls. Next watering dates are derived on every
//! read so they always move forward relative to "now".
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Storage read errors fail save/delete instead of reading as empty; calendar-day labels
//! - 1.1.0: Accept epoch-millisecond start dates, discard sets with invalid records
//! - 1.0.0: Initial release with save/delete/load and derived due dates

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::core::{Clock, InputError, SystemClock};
use crate::storage::KeyValueStore;

/// Storage key holding the serialized reminder set
pub const REMINDERS_KEY: &str = "plantReminders";

/// Milliseconds in one day
pub const DAY_MS: i64 = 86_400_000;

/// A recurring watering schedule for one named plant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    plant_name: String,
    interval: NonZeroU32,
    #[serde(with = "start_date_format")]
    start_date: DateTime<Utc>,
}

impl Reminder {
    /// Build a reminder, coercing a non-positive interval to one day
    pub fn new(plant_name: impl Into<String>, interval_days: i64, start_date: DateTime<Utc>) -> Self {
        Self {
            plant_name: plant_name.into(),
            interval: coerce_interval(interval_days),
            start_date,
        }
    }

    pub fn plant_name(&self) -> &str {
        &self.plant_name
    }

    pub fn interval_days(&self) -> u32 {
        self.interval.get()
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }
}

/// A reminder plus its next watering date, computed against a given "now".
/// Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedReminder {
    pub reminder: Reminder,
    pub next_watering_date: DateTime<Utc>,
}

impl DerivedReminder {
    pub fn derive(reminder: Reminder, now: DateTime<Utc>) -> Self {
        let next_watering_date =
            next_watering_date(reminder.start_date, reminder.interval, now);
        Self {
            reminder,
            next_watering_date,
        }
    }

    pub fn plant_name(&self) -> &str {
        self.reminder.plant_name()
    }

    pub fn interval_days(&self) -> u32 {
        self.reminder.interval_days()
    }

    /// Calendar days between today and the next watering day
    pub fn days_until(&self, now: DateTime<Utc>) -> i64 {
        (self.next_watering_date.date_naive() - now.date_naive()).num_days()
    }

    /// One-line summary for reminder lists
    pub fn describe(&self, now: DateTime<Utc>) -> String {
        let every = match self.interval_days() {
            1 => "every day".to_string(),
            n => format!("every {n} days"),
        };
        let when = match self.days_until(now) {
            i64::MIN..=0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {n} days"),
        };
        format!(
            "{}: {every}, next on {} ({when})",
            self.plant_name(),
            self.next_watering_date.format("%a %d %b")
        )
    }
}

/// First watering date strictly after `now` on the `interval`-day grid
/// anchored at `start`.
///
/// ```text
/// intervalsPassed  = floor((now - start) / period)
/// nextWateringDate = start + (intervalsPassed + 1) * period
/// ```
pub fn next_watering_date(
    start: DateTime<Utc>,
    interval: NonZeroU32,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let period = i64::from(interval.get()) * DAY_MS;
    let elapsed = (now - start).num_milliseconds();
    let intervals_passed = elapsed.div_euclid(period);

    intervals_passed
        .checked_add(1)
        .and_then(|steps| steps.checked_mul(period))
        .and_then(|offset| start.checked_add_signed(Duration::milliseconds(offset)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Clamp a raw interval into the valid range; anything below one day becomes one
pub fn coerce_interval(raw_days: i64) -> NonZeroU32 {
    let clamped = raw_days.clamp(1, i64::from(u32::MAX));
    NonZeroU32::new(clamped as u32).unwrap_or(NonZeroU32::MIN)
}

/// Parse free-form interval input the way a number field would: leading
/// integer wins, anything unusable becomes one day.
pub fn parse_interval(input: &str) -> NonZeroU32 {
    let trimmed = input.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    match leading.parse::<i64>() {
        Ok(value) => coerce_interval(sign * value),
        // Overflowing digit runs are still "a big positive number"
        Err(_) if !leading.is_empty() && sign > 0 => coerce_interval(i64::MAX),
        Err(_) => NonZeroU32::MIN,
    }
}

/// Handles reading and writing the reminder set
#[derive(Clone)]
pub struct ReminderStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ReminderStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub fn with_system_clock(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::new(storage, Arc::new(SystemClock))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// All reminders with fresh next watering dates, soonest first.
    ///
    /// Never fails: unreadable or corrupted data yields an empty list.
    pub fn load(&self) -> Vec<DerivedReminder> {
        let now = self.clock.now();
        let records = self.read_records().unwrap_or_else(|e| {
            error!("Failed to read reminders from storage: {e}");
            Vec::new()
        });
        derive_sorted(records, now)
    }

    /// The derived reminder for one plant, if any
    pub fn get(&self, plant_name: &str) -> Option<DerivedReminder> {
        let name = plant_name.trim();
        self.load().into_iter().find(|r| r.plant_name() == name)
    }

    /// Create or replace the reminder for `plant_name`, starting now
    pub fn save(&self, plant_name: &str, interval_days: i64) -> Result<Vec<DerivedReminder>> {
        let name = plant_name.trim();
        if name.is_empty() {
            return Err(InputError::MissingPlantName.into());
        }

        let now = self.clock.now();
        let reminder = Reminder::new(name, interval_days, now);

        let mut records = self.read_records()?;
        let replaced = records.iter().any(|r| r.plant_name == name);
        records.retain(|r| r.plant_name != name);
        records.push(reminder);
        self.write_records(&records)?;

        info!(
            "{} watering reminder for '{}' every {} day(s)",
            if replaced { "Replaced" } else { "Saved" },
            name,
            coerce_interval(interval_days)
        );

        Ok(derive_sorted(records, now))
    }

    /// Remove the reminder for `plant_name`. Unknown names are a no-op.
    pub fn delete(&self, plant_name: &str) -> Result<()> {
        let name = plant_name.trim();
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| r.plant_name != name);

        if records.len() == before {
            debug!("No reminder for '{name}' to delete");
            return Ok(());
        }

        self.write_records(&records)?;
        info!("Deleted watering reminder for '{name}'");
        Ok(())
    }

    /// Raw records as stored. Backend errors propagate; a corrupted set is
    /// discarded and reads as empty.
    fn read_records(&self) -> Result<Vec<Reminder>> {
        let Some(raw) = self.storage.get(REMINDERS_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Reminder>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("Discarding corrupted reminder data: {e}");
                if let Err(e) = self.storage.remove(REMINDERS_KEY) {
                    warn!("Failed to clear corrupted reminder data: {e}");
                }
                Ok(Vec::new())
            }
        }
    }

    fn write_records(&self, records: &[Reminder]) -> Result<()> {
        let serialized = serde_json::to_string(records)?;
        self.storage.set(REMINDERS_KEY, &serialized)
    }
}

fn derive_sorted(records: Vec<Reminder>, now: DateTime<Utc>) -> Vec<DerivedReminder> {
    let mut derived: Vec<DerivedReminder> = records
        .into_iter()
        .map(|r| DerivedReminder::derive(r, now))
        .collect();
    derived.sort_by_key(|r| r.next_watering_date);
    derived
}

/// RFC 3339 on write; RFC 3339 or epoch milliseconds on read
mod start_date_format {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Millis(i64),
    }

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match RawDate::deserialize(deserializer)? {
            RawDate::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(D::Error::custom),
            RawDate::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
        }
    }
}
