//! Pushing reminders to the device calendar.
//!
//! One linear attempt per reminder: permission → pick calendar → create event.
//! Each step either moves on or ends the attempt; nothing is retried.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::Alert;
use crate::capabilities::{CalendarError, CalendarProvider};
use crate::config::CalendarSettings;
use crate::models::{EventDetails, PermissionStatus};

/// How a calendar attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarOutcome {
    Scheduled {
        event_id: String,
        calendar_title: String,
    },
    PermissionDenied,
    NoCalendar,
    /// The provider answered without an event id
    NotCreated,
    Failed(String),
    /// The screen went away before the attempt finished
    Cancelled,
}

impl CalendarOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, CalendarOutcome::Scheduled { .. })
    }

    /// The alert describing this outcome for reminder `text`.
    ///
    /// `NotCreated` and `Cancelled` have none.
    pub fn alert(&self, text: &str) -> Option<Alert> {
        let alert = match self {
            CalendarOutcome::Scheduled { .. } => Alert::new(
                "Reminder Set!",
                format!(
                    "\"{}\" was added to your calendar with notifications! You'll get alerts before it's time.",
                    text
                ),
            ),
            CalendarOutcome::PermissionDenied => Alert::new(
                "Permission required",
                "Please allow calendar access to get real notifications for your reminders.",
            ),
            CalendarOutcome::NoCalendar => Alert::new(
                "No Calendar Found",
                "Please make sure you have a calendar app installed (Google Calendar, Apple Calendar, etc.)",
            ),
            CalendarOutcome::Failed(_) => Alert::new(
                "Calendar Error",
                "Couldn't add to calendar. Make sure you have a calendar app installed and try again.",
            ),
            CalendarOutcome::NotCreated | CalendarOutcome::Cancelled => return None,
        };
        Some(alert)
    }
}

/// Notice shown when a reminder was kept locally but not put on the calendar.
pub fn local_only_notice() -> Alert {
    Alert::new(
        "Local Reminder Added",
        "Added to your app reminders. Enable calendar access for notifications.",
    )
}

/// Creates calendar events for reminders.
#[derive(Clone)]
pub struct ReminderScheduler {
    provider: Arc<dyn CalendarProvider>,
    settings: CalendarSettings,
}

impl ReminderScheduler {
    pub fn new(provider: Arc<dyn CalendarProvider>, settings: CalendarSettings) -> Self {
        Self { provider, settings }
    }

    /// Try to put `text` on the calendar, starting the event relative to `now`.
    pub async fn schedule(
        &self,
        text: &str,
        now: DateTime<Utc>,
        token: &CancellationToken,
    ) -> CalendarOutcome {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!("calendar integration cancelled");
                CalendarOutcome::Cancelled
            }
            outcome = self.attempt(text, now) => outcome,
        }
    }

    async fn attempt(&self, text: &str, now: DateTime<Utc>) -> CalendarOutcome {
        info!("starting calendar integration");

        match self.provider.request_permission().await {
            Ok(PermissionStatus::Granted) => {}
            Ok(status) => {
                warn!(?status, "calendar permission not granted");
                return CalendarOutcome::PermissionDenied;
            }
            Err(CalendarError::PermissionDenied) => return CalendarOutcome::PermissionDenied,
            Err(e) => return Self::failed(e),
        }

        let calendars = match self.provider.calendars().await {
            Ok(calendars) => calendars,
            Err(CalendarError::PermissionDenied) => return CalendarOutcome::PermissionDenied,
            Err(e) => return Self::failed(e),
        };
        info!(count = calendars.len(), "available calendars");

        let Some(calendar) = calendars.into_iter().find(|c| c.accepts_reminders()) else {
            warn!("no writable, visible calendar");
            return CalendarOutcome::NoCalendar;
        };
        info!(calendar = %calendar.title, "using calendar");

        let event = EventDetails::for_reminder(text, now, &self.settings);
        match self.provider.create_event(&calendar.id, &event).await {
            Ok(event_id) if !event_id.is_empty() => {
                info!(%event_id, "calendar event created");
                CalendarOutcome::Scheduled {
                    event_id,
                    calendar_title: calendar.title,
                }
            }
            Ok(_) => {
                warn!("calendar provider returned no event id");
                CalendarOutcome::NotCreated
            }
            Err(CalendarError::NoWritableCalendar) => CalendarOutcome::NoCalendar,
            Err(e) => Self::failed(e),
        }
    }

    fn failed(e: CalendarError) -> CalendarOutcome {
        error!(error = %e, "calendar integration failed");
        CalendarOutcome::Failed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::InMemoryCalendar;
    use crate::models::CalendarInfo;

    fn scheduler(calendar: InMemoryCalendar) -> (Arc<InMemoryCalendar>, ReminderScheduler) {
        let calendar = Arc::new(calendar);
        let scheduler = ReminderScheduler::new(calendar.clone(), CalendarSettings::default());
        (calendar, scheduler)
    }

    fn info(id: &str, writable: bool, visible: Option<bool>) -> CalendarInfo {
        CalendarInfo {
            id: id.into(),
            title: format!("Calendar {}", id),
            allows_modifications: writable,
            is_visible: visible,
        }
    }

    #[tokio::test]
    async fn test_schedules_on_first_writable_visible_calendar() {
        let (calendar, scheduler) = scheduler(InMemoryCalendar::new(
            PermissionStatus::Granted,
            vec![
                info("ro", false, Some(true)),
                info("hidden", true, Some(false)),
                info("ok", true, None),
                info("later", true, Some(true)),
            ],
        ));

        let outcome = scheduler
            .schedule("Stretch", Utc::now(), &CancellationToken::new())
            .await;

        assert!(outcome.is_scheduled());
        let events = calendar.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "ok");
        assert_eq!(events[0].1.title, "Stretch");
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let (calendar, scheduler) = scheduler(InMemoryCalendar::new(PermissionStatus::Denied, vec![]));

        let outcome = scheduler
            .schedule("Stretch", Utc::now(), &CancellationToken::new())
            .await;

        assert_eq!(outcome, CalendarOutcome::PermissionDenied);
        assert_eq!(outcome.alert("Stretch").unwrap().title, "Permission required");
        assert!(calendar.events().is_empty());
    }

    #[tokio::test]
    async fn test_no_suitable_calendar() {
        let (_, scheduler) = scheduler(InMemoryCalendar::new(
            PermissionStatus::Granted,
            vec![info("ro", false, Some(true))],
        ));

        let outcome = scheduler
            .schedule("Stretch", Utc::now(), &CancellationToken::new())
            .await;

        assert_eq!(outcome, CalendarOutcome::NoCalendar);
        assert_eq!(outcome.alert("Stretch").unwrap().title, "No Calendar Found");
    }

    #[tokio::test]
    async fn test_creation_failure() {
        let (_, scheduler) = scheduler(InMemoryCalendar::granted().with_failing_creation());

        let outcome = scheduler
            .schedule("Stretch", Utc::now(), &CancellationToken::new())
            .await;

        assert!(matches!(outcome, CalendarOutcome::Failed(_)));
        assert_eq!(outcome.alert("Stretch").unwrap().title, "Calendar Error");
    }

    #[tokio::test]
    async fn test_empty_event_id_is_silent() {
        let (_, scheduler) = scheduler(InMemoryCalendar::granted().with_empty_event_ids());

        let outcome = scheduler
            .schedule("Stretch", Utc::now(), &CancellationToken::new())
            .await;

        assert_eq!(outcome, CalendarOutcome::NotCreated);
        assert!(!outcome.is_scheduled());
        assert!(outcome.alert("Stretch").is_none());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (calendar, scheduler) = scheduler(InMemoryCalendar::granted());
        let token = CancellationToken::new();
        token.cancel();

        let outcome = scheduler.schedule("Stretch", Utc::now(), &token).await;

        assert_eq!(outcome, CalendarOutcome::Cancelled);
        assert!(outcome.alert("Stretch").is_none());
        assert!(calendar.events().is_empty());
    }

    #[test]
    fn test_scheduled_alert_quotes_reminder() {
        let outcome = CalendarOutcome::Scheduled {
            event_id: "e1".into(),
            calendar_title: "Personal".into(),
        };
        let alert = outcome.alert("Take vitamins").unwrap();
        assert_eq!(alert.title, "Reminder Set!");
        assert!(alert.message.starts_with("\"Take vitamins\" was added"));
    }
}
