//! Home screen: reminder list, emergency call, field visit.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::{
    local_only_notice, Alert, CalendarOutcome, ChoiceStyle, Decision, Dialog, DialogChoice,
    ReminderScheduler, ScreenError, ScreenLifetime, ScreenResult,
};
use crate::capabilities::{dial_url, CalendarProvider, LinkOpener};
use crate::config::CoreConfig;
use crate::models::ReminderList;
use crate::store::RecordStore;

/// Result of submitting the "add reminder" field.
#[derive(Debug)]
pub enum AddReminder {
    /// Reminder appended; run `task` to try the calendar.
    Added {
        text: String,
        /// Set when the list could not be written to storage
        save_alert: Option<Alert>,
        task: CalendarTask,
    },
    Rejected(Alert),
}

/// A calendar attempt for one freshly added reminder, bound to the home screen's lifetime.
pub struct CalendarTask {
    text: String,
    scheduler: ReminderScheduler,
    token: CancellationToken,
}

impl std::fmt::Debug for CalendarTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarTask")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl CalendarTask {
    /// Run the attempt and return the alerts to show, in order.
    ///
    /// The reminder itself is never rolled back: a failed attempt adds the
    /// "Local Reminder Added" notice after the failure alert.
    pub async fn run(self) -> (CalendarOutcome, Vec<Alert>) {
        let outcome = self.scheduler.schedule(&self.text, Utc::now(), &self.token).await;

        let mut alerts = Vec::new();
        if outcome == CalendarOutcome::Cancelled {
            return (outcome, alerts);
        }
        alerts.extend(outcome.alert(&self.text));
        if !outcome.is_scheduled() {
            alerts.push(local_only_notice());
        }
        (outcome, alerts)
    }
}

/// Home screen controller.
pub struct HomeScreen {
    records: RecordStore,
    config: Arc<CoreConfig>,
    scheduler: ReminderScheduler,
    links: Arc<dyn LinkOpener>,
    reminders: ReminderList,
    pending_delete: Option<usize>,
    lifetime: ScreenLifetime,
}

impl HomeScreen {
    /// Mount the screen, reading the saved reminder list.
    ///
    /// A fresh install gets the configured default reminders. An unreadable list is logged
    /// and replaced by the defaults as well.
    pub fn mount(
        records: RecordStore,
        config: Arc<CoreConfig>,
        calendar: Arc<dyn CalendarProvider>,
        links: Arc<dyn LinkOpener>,
    ) -> Self {
        let reminders = match records.load_reminders() {
            Ok(Some(list)) => list,
            Ok(None) => ReminderList::new(config.default_reminders.clone()),
            Err(e) => {
                error!(error = %e, "failed to load reminders");
                ReminderList::new(config.default_reminders.clone())
            }
        };

        Self {
            scheduler: ReminderScheduler::new(calendar, config.calendar.clone()),
            records,
            config,
            links,
            reminders,
            pending_delete: None,
            lifetime: ScreenLifetime::new(),
        }
    }

    pub fn reminders(&self) -> &ReminderList {
        &self.reminders
    }

    pub fn is_mounted(&self) -> bool {
        self.lifetime.is_mounted()
    }

    /// Unmount the screen; calendar attempts still in flight are dropped.
    pub fn unmount(&self) {
        self.lifetime.unmount();
    }

    /// Append a reminder and persist the list.
    ///
    /// Blank text is rejected with a validation alert and nothing changes.
    pub fn add_reminder(&mut self, text: &str) -> AddReminder {
        let added = match self.reminders.add(text) {
            Ok(added) => added.to_string(),
            Err(_) => {
                return AddReminder::Rejected(Alert::new(
                    "Empty Field",
                    "Please enter a reminder before adding.",
                ));
            }
        };
        info!(count = self.reminders.len(), "reminder added");

        AddReminder::Added {
            save_alert: self.persist(),
            task: self.calendar_task(&added),
            text: added,
        }
    }

    /// Add a reminder and wait for its calendar attempt. Returns every alert to show, in order.
    pub async fn submit_reminder(&mut self, text: &str) -> Vec<Alert> {
        match self.add_reminder(text) {
            AddReminder::Rejected(alert) => vec![alert],
            AddReminder::Added {
                save_alert, task, ..
            } => {
                let mut alerts: Vec<Alert> = save_alert.into_iter().collect();
                let (_, calendar_alerts) = task.run().await;
                alerts.extend(calendar_alerts);
                alerts
            }
        }
    }

    /// Calendar attempt for `text`, cancelled when this screen unmounts.
    pub fn calendar_task(&self, text: &str) -> CalendarTask {
        CalendarTask {
            text: text.to_string(),
            scheduler: self.scheduler.clone(),
            token: self.lifetime.child_token(),
        }
    }

    /// Ask before deleting the reminder at `index`.
    pub fn request_delete(&mut self, index: usize) -> ScreenResult<Dialog> {
        self.reminders
            .check_index(index)
            .map_err(|_| ScreenError::IndexOutOfRange {
                index,
                len: self.reminders.len(),
            })?;
        self.pending_delete = Some(index);

        Ok(Dialog::confirm_destructive(
            "Delete Reminder",
            "Are you sure you want to delete this reminder?",
            "Delete",
        ))
    }

    /// Apply the user's answer to the pending delete.
    ///
    /// Returns the removed text on confirm, `None` on cancel, plus an alert if saving failed.
    pub fn resolve_delete(
        &mut self,
        decision: Decision,
    ) -> ScreenResult<(Option<String>, Option<Alert>)> {
        let index = self.pending_delete.take().ok_or(ScreenError::NothingPending)?;
        if decision == Decision::Cancel {
            return Ok((None, None));
        }

        let removed = self
            .reminders
            .remove(index)
            .map_err(|_| ScreenError::IndexOutOfRange {
                index,
                len: self.reminders.len(),
            })?;
        info!(count = self.reminders.len(), "reminder deleted");
        Ok((Some(removed), self.persist()))
    }

    /// Chooser listing the configured emergency numbers plus Cancel.
    pub fn emergency_dialog(&self) -> Dialog {
        let mut choices: Vec<DialogChoice> = self
            .config
            .emergency_numbers
            .iter()
            .map(|n| DialogChoice::new(n.display(), ChoiceStyle::Default))
            .collect();
        choices.push(DialogChoice::cancel());

        Dialog {
            title: "Emergency Services".into(),
            message: "Which emergency number would you like to call?".into(),
            choices,
        }
    }

    /// Open the dialer for one of the configured emergency numbers.
    pub fn call_emergency(&self, number: &str) -> ScreenResult<Option<Alert>> {
        if !self
            .config
            .emergency_numbers
            .iter()
            .any(|n| n.number == number)
        {
            return Err(ScreenError::UnknownNumber(number.to_string()));
        }

        info!(number, "opening dialer");
        Ok(self.open(&dial_url(number), "Could not open the phone dialer."))
    }

    /// Open the maps search for nearby hospitals.
    pub fn open_field_visit(&self) -> Option<Alert> {
        info!("opening maps");
        self.open(&self.config.maps_search_url, "Could not open Maps.")
    }

    fn open(&self, url: &str, failure: &str) -> Option<Alert> {
        match self.links.open_url(url) {
            Ok(()) => None,
            Err(e) => {
                warn!(url, error = %e, "could not open link");
                Some(Alert::new("Error", failure))
            }
        }
    }

    fn persist(&self) -> Option<Alert> {
        match self.records.save_reminders(&self.reminders) {
            Ok(()) => None,
            Err(e) => {
                error!(error = %e, "failed to save reminders");
                Some(Alert::new("Error", "Could not save your reminders."))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{InMemoryCalendar, RecordingLinkOpener};
    use crate::models::PermissionStatus;
    use crate::store::MemoryStore;

    struct Fixture {
        backend: Arc<MemoryStore>,
        calendar: Arc<InMemoryCalendar>,
        links: Arc<RecordingLinkOpener>,
    }

    impl Fixture {
        fn new(calendar: InMemoryCalendar) -> Self {
            Self {
                backend: Arc::new(MemoryStore::new()),
                calendar: Arc::new(calendar),
                links: Arc::new(RecordingLinkOpener::new().without_scheme("tel")),
            }
        }

        fn mount(&self) -> HomeScreen {
            HomeScreen::mount(
                RecordStore::new(self.backend.clone()),
                Arc::new(CoreConfig::default()),
                self.calendar.clone(),
                self.links.clone(),
            )
        }

        fn stored(&self) -> Option<ReminderList> {
            RecordStore::new(self.backend.clone()).load_reminders().unwrap()
        }
    }

    #[test]
    fn test_fresh_install_has_default_reminders() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let screen = fixture.mount();
        assert_eq!(
            screen.reminders().items(),
            &["Take morning vitamins".to_string(), "Measure blood pressure".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_schedules_and_persists() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let mut screen = fixture.mount();

        let alerts = screen.submit_reminder("  Walk 20 minutes ").await;

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Reminder Set!");
        assert_eq!(screen.reminders().get(2), Some("Walk 20 minutes"));
        assert_eq!(fixture.stored().unwrap().len(), 3);
        assert_eq!(fixture.calendar.events().len(), 1);
    }

    #[tokio::test]
    async fn test_calendar_failure_keeps_reminder() {
        let fixture = Fixture::new(InMemoryCalendar::new(PermissionStatus::Denied, vec![]));
        let mut screen = fixture.mount();

        let alerts = screen.submit_reminder("Walk").await;

        let titles: Vec<_> = alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Permission required", "Local Reminder Added"]);
        assert_eq!(screen.reminders().items().last().map(String::as_str), Some("Walk"));
        assert_eq!(fixture.stored().unwrap().items().last().map(String::as_str), Some("Walk"));
    }

    #[tokio::test]
    async fn test_missing_event_id_only_shows_local_notice() {
        let fixture = Fixture::new(InMemoryCalendar::granted().with_empty_event_ids());
        let mut screen = fixture.mount();

        let alerts = screen.submit_reminder("Walk").await;

        assert_eq!(alerts, vec![local_only_notice()]);
        assert_eq!(screen.reminders().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_reminder_rejected() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let mut screen = fixture.mount();

        let alerts = screen.submit_reminder("   ").await;

        assert_eq!(alerts, vec![Alert::new("Empty Field", "Please enter a reminder before adding.")]);
        assert_eq!(screen.reminders().len(), 2);
        assert!(fixture.stored().is_none());
        assert!(fixture.calendar.events().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_still_keeps_reminder() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        fixture.backend.fail_writes(true);
        let mut screen = fixture.mount();

        let alerts = screen.submit_reminder("Walk").await;

        assert_eq!(alerts[0].message, "Could not save your reminders.");
        assert_eq!(alerts[1].title, "Reminder Set!");
        assert_eq!(screen.reminders().len(), 3);
    }

    #[tokio::test]
    async fn test_unmount_drops_calendar_attempt() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let mut screen = fixture.mount();

        let AddReminder::Added { task, .. } = screen.add_reminder("Walk") else {
            panic!("reminder should be accepted");
        };
        screen.unmount();

        let (outcome, alerts) = task.run().await;
        assert_eq!(outcome, CalendarOutcome::Cancelled);
        assert!(alerts.is_empty());
        // The local add already happened
        assert_eq!(fixture.stored().unwrap().len(), 3);
        assert!(fixture.calendar.events().is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let mut screen = fixture.mount();

        let dialog = screen.request_delete(0).unwrap();
        assert_eq!(dialog.title, "Delete Reminder");

        let (removed, alert) = screen.resolve_delete(Decision::Cancel).unwrap();
        assert_eq!(removed, None);
        assert!(alert.is_none());
        assert_eq!(screen.reminders().len(), 2);

        screen.request_delete(0).unwrap();
        let (removed, _) = screen.resolve_delete(Decision::Confirm).unwrap();
        assert_eq!(removed.as_deref(), Some("Take morning vitamins"));
        assert_eq!(
            fixture.stored().unwrap().items(),
            &["Measure blood pressure".to_string()]
        );
    }

    #[test]
    fn test_delete_errors() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let mut screen = fixture.mount();

        assert_eq!(
            screen.request_delete(5).unwrap_err(),
            ScreenError::IndexOutOfRange { index: 5, len: 2 }
        );
        assert_eq!(
            screen.resolve_delete(Decision::Confirm).unwrap_err(),
            ScreenError::NothingPending
        );
    }

    #[test]
    fn test_emergency_dialog_and_dialer_failure() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let screen = fixture.mount();

        let labels: Vec<_> = screen
            .emergency_dialog()
            .choices
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["911 (US Emergency)", "112 (International)", "Cancel"]);

        // The fixture's opener has no dialer
        let alert = screen.call_emergency("911").unwrap();
        assert_eq!(alert.unwrap().message, "Could not open the phone dialer.");

        assert!(screen.call_emergency("999").is_err());
    }

    #[test]
    fn test_field_visit_opens_maps() {
        let fixture = Fixture::new(InMemoryCalendar::granted());
        let screen = fixture.mount();

        assert!(screen.open_field_visit().is_none());
        assert_eq!(
            fixture.links.opened(),
            vec!["https://www.google.com/maps/search/hospitals+near+me".to_string()]
        );
    }
}
