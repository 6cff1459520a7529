//! Care Companion Core Library
//!
//! Local-first core for a health reminder and symptom chat app. The native shell renders
//! screens; everything else (screen state, validation, persistence, calendar and dialer calls,
//! the scripted chat bot) lives here.
//!
//! # Architecture
//!
//! ```text
//!   Login ──► Home ──┬──► Chat      (SymptomMatcher, delayed reply)
//!                    │
//!                    └──► Profile   (profile + medications, edit/view)
//!
//!   Home reminders ──► RecordStore ──► KeyValueStore (SQLite)
//!         │
//!         └──► ReminderScheduler ──► CalendarProvider (device calendar)
//! ```
//!
//! # Core Principle
//!
//! **The reminder list is the source of truth.** A reminder is kept even when the calendar
//! integration fails; the user is told it is local only.
//!
//! # Modules
//!
//! - [`store`]: key-value persistence (SQLite, in-memory) and typed documents
//! - [`models`]: domain types (ReminderList, Profile, Medication, ChatMessage, calendar events)
//! - [`matcher`]: symptom matcher and delayed chat responder
//! - [`capabilities`]: ports for the device calendar and URL opener
//! - [`screens`]: screen controllers, alerts, navigation
//! - [`config`]: runtime configuration
//! - [`logging`]: tracing subscriber setup

pub mod capabilities;
pub mod config;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod screens;
pub mod store;

// Re-export commonly used types
pub use capabilities::{CalendarProvider, LinkOpener};
pub use config::CoreConfig;
pub use matcher::{ChatResponder, SymptomMatcher};
pub use models::{
    ChatMessage, Medication, MedicationField, MedicationStatus, Profile, ProfileField,
    ReminderList,
};
pub use screens::{ChatScreen, HomeScreen, LoginScreen, Navigator, ProfileScreen, Screen};
pub use store::{KeyValueStore, MemoryStore, RecordStore, SqliteStore};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use capabilities::{CalendarResult, LinkError};
use models::{Availability, CalendarInfo, EventDetails, PermissionStatus};
use screens::{AddReminder, Alert, Decision, Dialog, LoginOutcome};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CareCompanionError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<store::StoreError> for CareCompanionError {
    fn from(e: store::StoreError) -> Self {
        CareCompanionError::StorageError(e.to_string())
    }
}

impl From<config::ConfigError> for CareCompanionError {
    fn from(e: config::ConfigError) -> Self {
        CareCompanionError::ConfigError(e.to_string())
    }
}

impl From<screens::ScreenError> for CareCompanionError {
    fn from(e: screens::ScreenError) -> Self {
        CareCompanionError::InvalidInput(e.to_string())
    }
}

impl From<screens::NavigationError> for CareCompanionError {
    fn from(e: screens::NavigationError) -> Self {
        CareCompanionError::InvalidInput(e.to_string())
    }
}

impl From<models::UnknownField> for CareCompanionError {
    fn from(e: models::UnknownField) -> Self {
        CareCompanionError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CareCompanionError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CareCompanionError::InternalError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the log subscriber. Returns false if one was already installed.
#[uniffi::export]
pub fn init_logging(filter: String) -> bool {
    logging::init_logging(&filter)
}

/// Open or create the app store at the given path.
#[uniffi::export]
pub fn open_app(
    path: String,
    config_json: Option<String>,
) -> Result<Arc<CareCompanionApp>, CareCompanionError> {
    let config = match config_json {
        Some(json) => CoreConfig::from_json(&json)?,
        None => CoreConfig::default(),
    };
    let store = SqliteStore::open(&path)?;
    Ok(CareCompanionApp::new(Arc::new(store), config))
}

/// Open the app over an in-memory store (for testing and previews).
#[uniffi::export]
pub fn open_app_in_memory() -> Result<Arc<CareCompanionApp>, CareCompanionError> {
    let store = SqliteStore::open_in_memory()?;
    Ok(CareCompanionApp::new(Arc::new(store), CoreConfig::default()))
}

// =========================================================================
// Foreign Capabilities
// =========================================================================

/// Device calendar, implemented by the native shell.
#[uniffi::export(with_foreign)]
pub trait CalendarBridge: Send + Sync {
    fn request_permission(&self) -> FfiPermissionStatus;

    fn calendars(&self) -> Vec<FfiCalendar>;

    /// Create the event; `None` if the platform saved nothing.
    fn create_event(&self, calendar_id: String, event: FfiEventDetails) -> Option<String>;
}

/// URL opener (dialer, maps), implemented by the native shell.
#[uniffi::export(with_foreign)]
pub trait LinkBridge: Send + Sync {
    /// Returns false if no app could open the URL.
    fn open_url(&self, url: String) -> bool;
}

struct ForeignCalendar(Arc<dyn CalendarBridge>);

#[async_trait]
impl CalendarProvider for ForeignCalendar {
    async fn request_permission(&self) -> CalendarResult<PermissionStatus> {
        Ok(self.0.request_permission().into())
    }

    async fn calendars(&self) -> CalendarResult<Vec<CalendarInfo>> {
        Ok(self.0.calendars().into_iter().map(Into::into).collect())
    }

    async fn create_event(&self, calendar_id: &str, event: &EventDetails) -> CalendarResult<String> {
        Ok(self
            .0
            .create_event(calendar_id.to_string(), event.into())
            .unwrap_or_default())
    }
}

struct ForeignLinks(Arc<dyn LinkBridge>);

impl LinkOpener for ForeignLinks {
    fn open_url(&self, url: &str) -> Result<(), LinkError> {
        if self.0.open_url(url.to_string()) {
            Ok(())
        } else {
            Err(LinkError::Unsupported(url.to_string()))
        }
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// App-wide state shared by all screens.
#[derive(uniffi::Object)]
pub struct CareCompanionApp {
    records: RecordStore,
    config: Arc<CoreConfig>,
    responder: Arc<ChatResponder>,
    navigator: Mutex<Navigator>,
    mounted: Mutex<Vec<MountedScreen>>,
}

/// A handle given to the shell, remembered so that leaving its screen unmounts it.
enum MountedScreen {
    Home(Weak<HomeHandle>),
    Profile(Weak<ProfileHandle>),
    Chat(Weak<ChatHandle>),
}

impl MountedScreen {
    fn screen(&self) -> Screen {
        match self {
            MountedScreen::Home(_) => Screen::Home,
            MountedScreen::Profile(_) => Screen::Profile,
            MountedScreen::Chat(_) => Screen::Chat,
        }
    }

    fn unmount(&self) {
        // A handle the shell already dropped has unmounted itself
        match self {
            MountedScreen::Home(h) => {
                if let Some(h) = h.upgrade() {
                    let _ = h.close();
                }
            }
            MountedScreen::Profile(h) => {
                if let Some(h) = h.upgrade() {
                    let _ = h.close();
                }
            }
            MountedScreen::Chat(h) => {
                if let Some(h) = h.upgrade() {
                    let _ = h.close();
                }
            }
        }
    }
}

impl CareCompanionApp {
    /// Build the app over any backend. Used by the factories and by Rust callers.
    pub fn new(backend: Arc<dyn KeyValueStore>, config: CoreConfig) -> Arc<Self> {
        Arc::new(Self {
            records: RecordStore::new(backend),
            responder: Arc::new(ChatResponder::from_config(&config)),
            config: Arc::new(config),
            navigator: Mutex::new(Navigator::new()),
            mounted: Mutex::new(Vec::new()),
        })
    }

    fn navigate(&self, to: Screen) -> Result<(), CareCompanionError> {
        self.navigator.lock()?.push(to)?;
        Ok(())
    }

    /// Remember `handle`, unmounting any earlier handle for the same screen.
    fn track(&self, handle: MountedScreen) -> Result<(), CareCompanionError> {
        let mut mounted = self.mounted.lock()?;
        let screen = handle.screen();
        mounted.retain(|m| {
            if m.screen() == screen {
                m.unmount();
                false
            } else {
                true
            }
        });
        mounted.push(handle);
        Ok(())
    }

    fn unmount_screen(&self, screen: Screen) -> Result<(), CareCompanionError> {
        self.mounted.lock()?.retain(|m| {
            if m.screen() == screen {
                m.unmount();
                false
            } else {
                true
            }
        });
        Ok(())
    }
}

#[uniffi::export]
impl CareCompanionApp {
    /// Route of the screen on top of the back stack.
    pub fn current_screen(&self) -> Result<String, CareCompanionError> {
        Ok(self.navigator.lock()?.current().route().to_string())
    }

    /// Pop the back stack and return the new current route.
    ///
    /// The handle of the screen being left is unmounted, so its pending chat reply or calendar
    /// attempt is dropped.
    pub fn go_back(&self) -> Result<String, CareCompanionError> {
        let (left, current) = {
            let mut navigator = self.navigator.lock()?;
            let left = navigator.current();
            match navigator.back() {
                Some(current) => (Some(left), current),
                None => (None, left),
            }
        };
        if let Some(left) = left {
            self.unmount_screen(left)?;
        }
        Ok(current.route().to_string())
    }

    /// Check the login form and move to the home screen when it passes.
    pub fn login(
        &self,
        identifier: String,
        secret: String,
    ) -> Result<FfiLoginOutcome, CareCompanionError> {
        match screens::validate_login(&identifier, &secret) {
            LoginOutcome::Navigate(screen) => {
                self.navigate(screen)?;
                Ok(FfiLoginOutcome {
                    accepted: true,
                    alert: None,
                })
            }
            LoginOutcome::Rejected(alert) => Ok(FfiLoginOutcome {
                accepted: false,
                alert: Some(alert.into()),
            }),
        }
    }

    /// Mount the home screen controller. The user must be on the home screen.
    pub fn open_home(
        &self,
        calendar: Arc<dyn CalendarBridge>,
        links: Arc<dyn LinkBridge>,
    ) -> Result<Arc<HomeHandle>, CareCompanionError> {
        let current = self.navigator.lock()?.current();
        if current != Screen::Home {
            return Err(CareCompanionError::InvalidInput(format!(
                "home screen is not current (at {})",
                current
            )));
        }

        let screen = HomeScreen::mount(
            self.records.clone(),
            self.config.clone(),
            Arc::new(ForeignCalendar(calendar)),
            Arc::new(ForeignLinks(links)),
        );
        let handle = Arc::new(HomeHandle {
            screen: Mutex::new(screen),
        });
        self.track(MountedScreen::Home(Arc::downgrade(&handle)))?;
        Ok(handle)
    }

    /// Navigate to the profile screen and mount its controller.
    pub fn open_profile(&self) -> Result<Arc<ProfileHandle>, CareCompanionError> {
        self.navigate(Screen::Profile)?;
        let handle = Arc::new(ProfileHandle {
            screen: Mutex::new(ProfileScreen::mount(self.records.clone())),
        });
        self.track(MountedScreen::Profile(Arc::downgrade(&handle)))?;
        Ok(handle)
    }

    /// Navigate to the chat screen and mount its controller.
    pub fn open_chat(&self) -> Result<Arc<ChatHandle>, CareCompanionError> {
        self.navigate(Screen::Chat)?;
        let handle = Arc::new(ChatHandle {
            screen: Mutex::new(ChatScreen::mount(self.responder.clone())),
        });
        self.track(MountedScreen::Chat(Arc::downgrade(&handle)))?;
        Ok(handle)
    }
}

// =========================================================================
// Screen Handles
// =========================================================================

/// Home screen exported to the shell.
#[derive(uniffi::Object)]
pub struct HomeHandle {
    screen: Mutex<HomeScreen>,
}

#[uniffi::export(async_runtime = "tokio")]
impl HomeHandle {
    pub fn reminders(&self) -> Result<Vec<String>, CareCompanionError> {
        Ok(self.screen.lock()?.reminders().items().to_vec())
    }

    /// Add a reminder, then try the calendar. Returns the alerts to show, in order.
    pub async fn add_reminder(&self, text: String) -> Result<Vec<FfiAlert>, CareCompanionError> {
        let added = {
            let mut screen = self.screen.lock()?;
            screen.add_reminder(&text)
        };

        let (mut alerts, task) = match added {
            AddReminder::Rejected(alert) => return Ok(vec![alert.into()]),
            AddReminder::Added {
                save_alert, task, ..
            } => (save_alert.into_iter().collect::<Vec<Alert>>(), task),
        };

        let (_, calendar_alerts) = task.run().await;
        alerts.extend(calendar_alerts);
        Ok(alerts.into_iter().map(Into::into).collect())
    }

    pub fn request_delete(&self, index: u32) -> Result<FfiDialog, CareCompanionError> {
        let dialog = self.screen.lock()?.request_delete(index as usize)?;
        Ok(dialog.into())
    }

    /// Answer the pending delete. Returns an alert if the list could not be saved.
    pub fn resolve_delete(&self, confirmed: bool) -> Result<Option<FfiAlert>, CareCompanionError> {
        let (_, alert) = self.screen.lock()?.resolve_delete(Decision::from(confirmed))?;
        Ok(alert.map(Into::into))
    }

    pub fn emergency_dialog(&self) -> Result<FfiDialog, CareCompanionError> {
        Ok(self.screen.lock()?.emergency_dialog().into())
    }

    pub fn call_emergency(&self, number: String) -> Result<Option<FfiAlert>, CareCompanionError> {
        let alert = self.screen.lock()?.call_emergency(&number)?;
        Ok(alert.map(Into::into))
    }

    pub fn open_field_visit(&self) -> Result<Option<FfiAlert>, CareCompanionError> {
        Ok(self.screen.lock()?.open_field_visit().map(Into::into))
    }

    pub fn is_open(&self) -> Result<bool, CareCompanionError> {
        Ok(self.screen.lock()?.is_mounted())
    }

    pub fn close(&self) -> Result<(), CareCompanionError> {
        self.screen.lock()?.unmount();
        Ok(())
    }
}

/// Profile screen exported to the shell.
#[derive(uniffi::Object)]
pub struct ProfileHandle {
    screen: Mutex<ProfileScreen>,
}

#[uniffi::export]
impl ProfileHandle {
    pub fn view(&self) -> Result<FfiProfileView, CareCompanionError> {
        let screen = self.screen.lock()?;
        Ok(FfiProfileView {
            profile: screen.profile().clone().into(),
            medications: screen.medications().iter().cloned().map(Into::into).collect(),
            editing: screen.is_editing(),
            is_new_user: screen.is_new_user(),
            title: screen.title().to_string(),
            full_name: screen.full_name_display(),
            greeting: screen.preferred_name_display().to_string(),
        })
    }

    /// Set a profile field by its key, e.g. "firstName".
    pub fn set_field(&self, field: String, value: String) -> Result<(), CareCompanionError> {
        let field: ProfileField = field.parse()?;
        self.screen.lock()?.set_field(field, value)?;
        Ok(())
    }

    /// Edit/Save toggle.
    pub fn toggle_edit(&self) -> Result<Option<FfiAlert>, CareCompanionError> {
        Ok(self.screen.lock()?.toggle_edit().map(Into::into))
    }

    pub fn add_medication(&self) -> Result<u32, CareCompanionError> {
        Ok(self.screen.lock()?.add_medication()? as u32)
    }

    /// Set a medication field by its key, e.g. "dosage".
    pub fn update_medication(
        &self,
        index: u32,
        field: String,
        value: String,
    ) -> Result<(), CareCompanionError> {
        let field: MedicationField = field.parse()?;
        self.screen
            .lock()?
            .update_medication(index as usize, field, value)?;
        Ok(())
    }

    pub fn toggle_medication_status(&self, index: u32) -> Result<(), CareCompanionError> {
        self.screen
            .lock()?
            .toggle_medication_status(index as usize)?;
        Ok(())
    }

    pub fn request_delete_medication(&self, index: u32) -> Result<FfiDialog, CareCompanionError> {
        let dialog = self
            .screen
            .lock()?
            .request_delete_medication(index as usize)?;
        Ok(dialog.into())
    }

    pub fn request_clear_profile(&self) -> Result<FfiDialog, CareCompanionError> {
        Ok(self.screen.lock()?.request_clear_profile().into())
    }

    pub fn resolve_pending(&self, confirmed: bool) -> Result<Option<FfiAlert>, CareCompanionError> {
        let alert = self
            .screen
            .lock()?
            .resolve_pending(Decision::from(confirmed))?;
        Ok(alert.map(Into::into))
    }

    pub fn close(&self) -> Result<(), CareCompanionError> {
        self.screen.lock()?.unmount();
        Ok(())
    }
}

/// Chat screen exported to the shell.
#[derive(uniffi::Object)]
pub struct ChatHandle {
    screen: Mutex<ChatScreen>,
}

#[uniffi::export(async_runtime = "tokio")]
impl ChatHandle {
    pub fn messages(&self) -> Result<Vec<FfiChatMessage>, CareCompanionError> {
        let screen = self.screen.lock()?;
        Ok(screen.messages().iter().map(Into::into).collect())
    }

    /// Send a message and wait for the bot. Returns the full conversation afterwards.
    pub async fn send_message(
        &self,
        text: String,
    ) -> Result<Vec<FfiChatMessage>, CareCompanionError> {
        let pending = {
            let mut screen = self.screen.lock()?;
            screen.send(&text)
        };

        if let Some(pending) = pending {
            if let Some(reply) = pending.resolve().await {
                let mut screen = self.screen.lock()?;
                screen.receive_reply(reply);
            }
        }
        self.messages()
    }

    pub fn is_open(&self) -> Result<bool, CareCompanionError> {
        Ok(self.screen.lock()?.is_mounted())
    }

    /// Close the chat; a reply still on its way is discarded.
    pub fn close(&self) -> Result<(), CareCompanionError> {
        self.screen.lock()?.unmount();
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe alert.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAlert {
    pub title: String,
    pub message: String,
}

impl From<Alert> for FfiAlert {
    fn from(alert: Alert) -> Self {
        Self {
            title: alert.title,
            message: alert.message,
        }
    }
}

/// FFI-safe dialog. The shell renders `choices` in order.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDialog {
    pub title: String,
    pub message: String,
    pub choices: Vec<String>,
}

impl From<Dialog> for FfiDialog {
    fn from(dialog: Dialog) -> Self {
        Self {
            title: dialog.title,
            message: dialog.message,
            choices: dialog.choices.into_iter().map(|c| c.label).collect(),
        }
    }
}

/// FFI-safe login result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLoginOutcome {
    pub accepted: bool,
    pub alert: Option<FfiAlert>,
}

/// FFI-safe calendar permission status.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiPermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl From<FfiPermissionStatus> for PermissionStatus {
    fn from(status: FfiPermissionStatus) -> Self {
        match status {
            FfiPermissionStatus::Granted => PermissionStatus::Granted,
            FfiPermissionStatus::Denied => PermissionStatus::Denied,
            FfiPermissionStatus::Undetermined => PermissionStatus::Undetermined,
        }
    }
}

/// FFI-safe calendar description.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalendar {
    pub id: String,
    pub title: String,
    pub allows_modifications: bool,
    pub is_visible: Option<bool>,
}

impl From<FfiCalendar> for CalendarInfo {
    fn from(calendar: FfiCalendar) -> Self {
        CalendarInfo {
            id: calendar.id,
            title: calendar.title,
            allows_modifications: calendar.allows_modifications,
            is_visible: calendar.is_visible,
        }
    }
}

/// FFI-safe calendar event. Times are milliseconds since the Unix epoch.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEventDetails {
    pub title: String,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    pub time_zone: String,
    /// Negative: minutes before the start
    pub alarm_offsets_minutes: Vec<i64>,
    pub location: String,
    pub notes: String,
    pub busy: bool,
}

impl From<&EventDetails> for FfiEventDetails {
    fn from(event: &EventDetails) -> Self {
        Self {
            title: event.title.clone(),
            start_epoch_ms: epoch_ms(event.start),
            end_epoch_ms: epoch_ms(event.end),
            time_zone: event.time_zone.clone(),
            alarm_offsets_minutes: event
                .alarms
                .iter()
                .map(|a| a.relative_offset_minutes)
                .collect(),
            location: event.location.clone(),
            notes: event.notes.clone(),
            busy: event.availability == Availability::Busy,
        }
    }
}

fn epoch_ms(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

/// FFI-safe profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProfile {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub preferred_name: String,
    pub age: String,
    pub gender: String,
    pub birth_date: String,
    pub email: String,
    pub phone: String,
}

impl From<Profile> for FfiProfile {
    fn from(profile: Profile) -> Self {
        Self {
            first_name: profile.first_name,
            middle_name: profile.middle_name,
            last_name: profile.last_name,
            preferred_name: profile.preferred_name,
            age: profile.age,
            gender: profile.gender,
            birth_date: profile.birth_date,
            email: profile.email,
            phone: profile.phone,
        }
    }
}

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub name: String,
    pub prescriber: String,
    pub dosage: String,
    pub frequency: String,
    /// "active" or "inactive"
    pub status: String,
}

impl From<Medication> for FfiMedication {
    fn from(medication: Medication) -> Self {
        Self {
            status: medication.status.as_str().to_string(),
            name: medication.name,
            prescriber: medication.prescriber,
            dosage: medication.dosage,
            frequency: medication.frequency,
        }
    }
}

/// FFI-safe snapshot of the profile screen.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProfileView {
    pub profile: FfiProfile,
    pub medications: Vec<FfiMedication>,
    pub editing: bool,
    pub is_new_user: bool,
    pub title: String,
    pub full_name: String,
    /// Preferred name, or a prompt to enter one
    pub greeting: String,
}

/// FFI-safe chat message.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChatMessage {
    pub id: i64,
    pub text: String,
    pub from_user: bool,
}

impl From<&ChatMessage> for FfiChatMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            text: message.text.clone(),
            from_user: message.is_from_user(),
        }
    }
}
