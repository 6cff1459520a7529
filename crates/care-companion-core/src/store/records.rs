//! Typed access to the app's persisted documents.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{KeyValueStore, StoreError, StoreResult};
use crate::models::{Medication, Profile, ReminderList};

/// Key of the reminder list document.
pub const TASKS_KEY: &str = "tasks";
/// Key of the profile document.
pub const PROFILE_KEY: &str = "patientProfile";
/// Key of the medication list, stored beside the profile.
pub const MEDICATIONS_KEY: &str = "patientMedications";

/// JSON document store shared by all screens.
///
/// Cheap to clone; every clone writes to the same backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn load_reminders(&self) -> StoreResult<Option<ReminderList>> {
        self.read(TASKS_KEY)
    }

    pub fn save_reminders(&self, reminders: &ReminderList) -> StoreResult<()> {
        self.write(TASKS_KEY, reminders)
    }

    pub fn load_profile(&self) -> StoreResult<Option<Profile>> {
        self.read(PROFILE_KEY)
    }

    pub fn save_profile(&self, profile: &Profile) -> StoreResult<()> {
        self.write(PROFILE_KEY, profile)
    }

    pub fn load_medications(&self) -> StoreResult<Option<Vec<Medication>>> {
        self.read(MEDICATIONS_KEY)
    }

    pub fn save_medications(&self, medications: &[Medication]) -> StoreResult<()> {
        self.write(MEDICATIONS_KEY, medications)
    }

    /// Remove both profile documents. Both removals are attempted; the first error wins.
    pub fn clear_profile(&self) -> StoreResult<()> {
        let profile = self.backend.remove(PROFILE_KEY);
        let medications = self.backend.remove(MEDICATIONS_KEY);
        profile.and(medications)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.backend.get(key)? else {
            debug!(key, "no stored record");
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            warn!(key, error = %e, "stored record could not be decoded");
            StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }
}
