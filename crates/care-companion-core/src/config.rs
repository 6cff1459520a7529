//! Core runtime configuration.
//!
//! Resolved once when the app is opened and then shared by every screen controller.
//! All fields have defaults, so an empty JSON object (or no config at all) yields the
//! behaviour the app ships with.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Calendar event settings used when a reminder is pushed to the device calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalendarSettings {
    /// Minutes between "now" and the event start
    pub lead_time_minutes: u32,
    /// Event length in minutes
    pub duration_minutes: u32,
    /// Alarm offsets, in minutes before the event start
    pub alarm_offsets_minutes: Vec<u32>,
    /// Event location label
    pub location: String,
    /// Time zone name handed to the calendar provider
    pub time_zone: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            lead_time_minutes: 5,
            duration_minutes: 30,
            alarm_offsets_minutes: vec![2, 15, 60],
            location: "Health App Reminder".into(),
            time_zone: "GMT".into(),
        }
    }
}

/// A number offered by the emergency call chooser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyNumber {
    pub number: String,
    pub label: String,
}

impl EmergencyNumber {
    pub fn new(number: &str, label: &str) -> Self {
        Self {
            number: number.into(),
            label: label.into(),
        }
    }

    /// Label shown on the chooser button, e.g. "911 (US Emergency)".
    pub fn display(&self) -> String {
        format!("{} ({})", self.number, self.label)
    }
}

/// Core configuration resolved at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// Simulated round trip before the chat bot answers
    pub chat_reply_delay_ms: u64,
    pub calendar: CalendarSettings,
    /// Reminders a fresh install starts with
    pub default_reminders: Vec<String>,
    pub emergency_numbers: Vec<EmergencyNumber>,
    /// Maps search opened by the "Field Visit" action
    pub maps_search_url: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            chat_reply_delay_ms: 1000,
            calendar: CalendarSettings::default(),
            default_reminders: vec![
                "Take morning vitamins".into(),
                "Measure blood pressure".into(),
            ],
            emergency_numbers: vec![
                EmergencyNumber::new("911", "US Emergency"),
                EmergencyNumber::new("112", "International"),
            ],
            maps_search_url: "https://www.google.com/maps/search/hospitals+near+me".into(),
        }
    }
}

impl CoreConfig {
    /// Parse and validate a JSON config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: CoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that would make a screen misbehave.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.calendar.duration_minutes == 0 {
            return Err(ConfigError::Invalid(
                "calendar.duration_minutes must be greater than zero".into(),
            ));
        }
        if self.calendar.lead_time_minutes == 0 {
            return Err(ConfigError::Invalid(
                "calendar.lead_time_minutes must be greater than zero".into(),
            ));
        }
        if self.calendar.alarm_offsets_minutes.is_empty() {
            return Err(ConfigError::Invalid(
                "calendar.alarm_offsets_minutes cannot be empty".into(),
            ));
        }
        if self.emergency_numbers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one emergency number is required".into(),
            ));
        }
        if self
            .emergency_numbers
            .iter()
            .any(|n| n.number.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "emergency numbers cannot be blank".into(),
            ));
        }
        if self.maps_search_url.trim().is_empty() {
            return Err(ConfigError::Invalid("maps_search_url cannot be empty".into()));
        }
        Ok(())
    }

    pub fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_delay_ms)
    }
}
