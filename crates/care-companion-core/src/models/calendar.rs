//! Calendar models exchanged with the device calendar provider.

use chrono::{DateTime, Duration, Utc};

use crate::config::CalendarSettings;

/// Result of asking the OS for calendar access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// A calendar reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarInfo {
    pub id: String,
    pub title: String,
    pub allows_modifications: bool,
    /// `None` when the platform does not report visibility; treated as visible
    pub is_visible: Option<bool>,
}

impl CalendarInfo {
    /// Check if reminders may be written to this calendar.
    pub fn accepts_reminders(&self) -> bool {
        self.allows_modifications && self.is_visible != Some(false)
    }
}

/// Event availability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Busy,
    Free,
}

/// An alarm relative to the event start. Negative offsets fire before the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub relative_offset_minutes: i64,
}

impl Alarm {
    pub fn minutes_before(minutes: u32) -> Self {
        Self {
            relative_offset_minutes: -i64::from(minutes),
        }
    }
}

/// Everything the provider needs to create a reminder event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub time_zone: String,
    pub alarms: Vec<Alarm>,
    pub location: String,
    pub notes: String,
    pub availability: Availability,
}

impl EventDetails {
    /// Build the event for a reminder created at `now`.
    pub fn for_reminder(text: &str, now: DateTime<Utc>, settings: &CalendarSettings) -> Self {
        let start = now + Duration::minutes(i64::from(settings.lead_time_minutes));
        let end = start + Duration::minutes(i64::from(settings.duration_minutes));

        Self {
            title: text.to_string(),
            start,
            end,
            time_zone: settings.time_zone.clone(),
            alarms: settings
                .alarm_offsets_minutes
                .iter()
                .map(|m| Alarm::minutes_before(*m))
                .collect(),
            location: settings.location.clone(),
            notes: format!("Health reminder: {}", text),
            availability: Availability::Busy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_timing_and_alarms() {
        let now = Utc::now();
        let event = EventDetails::for_reminder("Measure blood pressure", now, &CalendarSettings::default());

        assert_eq!(event.start - now, Duration::minutes(5));
        assert_eq!(event.end - event.start, Duration::minutes(30));
        assert_eq!(
            event.alarms,
            vec![
                Alarm { relative_offset_minutes: -2 },
                Alarm { relative_offset_minutes: -15 },
                Alarm { relative_offset_minutes: -60 },
            ]
        );
        assert_eq!(event.title, "Measure blood pressure");
        assert_eq!(event.notes, "Health reminder: Measure blood pressure");
        assert_eq!(event.location, "Health App Reminder");
        assert_eq!(event.availability, Availability::Busy);
    }

    #[test]
    fn test_calendar_selection_rule() {
        let mut cal = CalendarInfo {
            id: "1".into(),
            title: "Home".into(),
            allows_modifications: true,
            is_visible: None,
        };
        assert!(cal.accepts_reminders());

        cal.is_visible = Some(false);
        assert!(!cal.accepts_reminders());

        cal.is_visible = Some(true);
        cal.allows_modifications = false;
        assert!(!cal.accepts_reminders());
    }
}
