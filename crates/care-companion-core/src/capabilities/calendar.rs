//! Calendar capability.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CalendarInfo, EventDetails, PermissionStatus};

/// Calendar provider errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("Calendar permission denied")]
    PermissionDenied,

    #[error("No writable calendar available")]
    NoWritableCalendar,

    #[error("Calendar provider error: {0}")]
    Provider(String),
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Device calendar, as exposed by the OS.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Ask the user for calendar access.
    async fn request_permission(&self) -> CalendarResult<PermissionStatus>;

    /// List calendars on the device.
    async fn calendars(&self) -> CalendarResult<Vec<CalendarInfo>>;

    /// Create an event and return its provider id.
    async fn create_event(&self, calendar_id: &str, event: &EventDetails) -> CalendarResult<String>;
}

/// Calendar held in memory. Records every created event.
pub struct InMemoryCalendar {
    permission: PermissionStatus,
    calendars: Vec<CalendarInfo>,
    fail_creation: bool,
    empty_ids: bool,
    events: Mutex<Vec<(String, EventDetails)>>,
}

impl InMemoryCalendar {
    pub fn new(permission: PermissionStatus, calendars: Vec<CalendarInfo>) -> Self {
        Self {
            permission,
            calendars,
            fail_creation: false,
            empty_ids: false,
            events: Mutex::new(Vec::new()),
        }
    }

    /// A granted calendar with a single writable, visible calendar.
    pub fn granted() -> Self {
        Self::new(
            PermissionStatus::Granted,
            vec![CalendarInfo {
                id: "default".into(),
                title: "Personal".into(),
                allows_modifications: true,
                is_visible: Some(true),
            }],
        )
    }

    /// Make `create_event` fail.
    pub fn with_failing_creation(mut self) -> Self {
        self.fail_creation = true;
        self
    }

    /// Answer `create_event` with an empty id, as some platforms do when nothing was saved.
    pub fn with_empty_event_ids(mut self) -> Self {
        self.empty_ids = true;
        self
    }

    /// Events created so far, with the id of the calendar each went to.
    pub fn events(&self) -> Vec<(String, EventDetails)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CalendarProvider for InMemoryCalendar {
    async fn request_permission(&self) -> CalendarResult<PermissionStatus> {
        Ok(self.permission)
    }

    async fn calendars(&self) -> CalendarResult<Vec<CalendarInfo>> {
        if self.permission != PermissionStatus::Granted {
            return Err(CalendarError::PermissionDenied);
        }
        Ok(self.calendars.clone())
    }

    async fn create_event(&self, calendar_id: &str, event: &EventDetails) -> CalendarResult<String> {
        if self.fail_creation {
            return Err(CalendarError::Provider("event store rejected the event".into()));
        }
        if self.empty_ids {
            return Ok(String::new());
        }
        if !self.calendars.iter().any(|c| c.id == calendar_id) {
            return Err(CalendarError::Provider(format!("unknown calendar {}", calendar_id)));
        }

        let mut events = self
            .events
            .lock()
            .map_err(|e| CalendarError::Provider(format!("Lock poisoned: {}", e)))?;
        events.push((calendar_id.to_string(), event.clone()));
        Ok(uuid::Uuid::new_v4().to_string())
    }
}
