//! Profile screen: personal details and medication records.
//!
//! The screen is either editing or viewing. Leaving edit mode is a save: it only succeeds
//! once first and last name are filled, and then writes the profile and the medication list
//! one after the other. There is no transaction across the two documents.

use tracing::{error, info};

use super::{Alert, Decision, Dialog, ScreenError, ScreenLifetime, ScreenResult};
use crate::models::{Medication, MedicationField, Profile, ProfileField};
use crate::store::RecordStore;

/// Placeholder shown for an empty field in view mode.
pub const NOT_PROVIDED: &str = "Not provided";

/// Placeholder shown for an empty medication field in view mode.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    Editing,
    Viewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    DeleteMedication(usize),
    ClearProfile,
}

/// Profile screen controller.
pub struct ProfileScreen {
    records: RecordStore,
    profile: Profile,
    medications: Vec<Medication>,
    mode: ProfileMode,
    is_new_user: bool,
    pending: Option<PendingAction>,
    lifetime: ScreenLifetime,
}

impl ProfileScreen {
    /// Mount the screen from storage.
    ///
    /// With no saved profile the screen opens as a new user in edit mode. A saved profile
    /// with either name filled opens in view mode.
    pub fn mount(records: RecordStore) -> Self {
        let mut screen = Self {
            records,
            profile: Profile::default(),
            medications: Vec::new(),
            mode: ProfileMode::Editing,
            is_new_user: true,
            pending: None,
            lifetime: ScreenLifetime::new(),
        };

        match screen.records.load_profile() {
            Ok(Some(profile)) => {
                screen.is_new_user = false;
                if profile.has_any_name() {
                    screen.mode = ProfileMode::Viewing;
                }
                screen.profile = profile;
            }
            Ok(None) => {}
            Err(e) => error!(error = %e, "failed to load profile"),
        }

        match screen.records.load_medications() {
            Ok(Some(medications)) => screen.medications = medications,
            Ok(None) => {}
            Err(e) => error!(error = %e, "failed to load medications"),
        }

        screen
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn mode(&self) -> ProfileMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == ProfileMode::Editing
    }

    pub fn is_new_user(&self) -> bool {
        self.is_new_user
    }

    pub fn is_mounted(&self) -> bool {
        self.lifetime.is_mounted()
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }

    pub fn title(&self) -> &'static str {
        if self.is_new_user {
            "Create Your Profile"
        } else {
            "Your Profile"
        }
    }

    /// Label of the edit/save toggle.
    pub fn toggle_label(&self) -> &'static str {
        match self.mode {
            ProfileMode::Editing => "Save",
            ProfileMode::Viewing => "Edit",
        }
    }

    pub fn shows_welcome(&self) -> bool {
        self.is_new_user && self.is_editing()
    }

    /// "Clear All Profile Data" is only offered once something was saved.
    pub fn can_clear(&self) -> bool {
        !self.is_new_user
    }

    /// Text shown for `field` in view mode.
    pub fn display_value(&self, field: ProfileField) -> &str {
        match self.profile.get(field) {
            "" => NOT_PROVIDED,
            value => value,
        }
    }

    /// Text shown for `field` of the medication at `index` in view mode.
    pub fn medication_display(&self, index: usize, field: MedicationField) -> ScreenResult<&str> {
        let medication = self
            .medications
            .get(index)
            .ok_or(ScreenError::IndexOutOfRange {
                index,
                len: self.medications.len(),
            })?;
        Ok(match medication.get(field) {
            "" => NOT_SPECIFIED,
            value => value,
        })
    }

    /// Header greeting in view mode.
    pub fn preferred_name_display(&self) -> &str {
        match self.profile.preferred_name.as_str() {
            "" => "Please enter your name",
            name => name,
        }
    }

    pub fn full_name_display(&self) -> String {
        self.profile
            .full_name()
            .unwrap_or_else(|| "Your full name will appear here".to_string())
    }

    /// Edit/Save button. From view mode, enter edit mode; from edit mode, save.
    pub fn toggle_edit(&mut self) -> Option<Alert> {
        match self.mode {
            ProfileMode::Viewing => {
                self.mode = ProfileMode::Editing;
                self.pending = None;
                None
            }
            ProfileMode::Editing => Some(self.save()),
        }
    }

    /// Validate and persist. Stays in edit mode unless both writes succeed.
    pub fn save(&mut self) -> Alert {
        if !self.profile.is_complete() {
            return Alert::new(
                "Missing Information",
                "Please enter at least your first and last name.",
            );
        }

        let written = self
            .records
            .save_profile(&self.profile)
            .and_then(|_| self.records.save_medications(&self.medications));
        if let Err(e) = written {
            error!(error = %e, "failed to save profile");
            return Alert::new("Error", "Failed to save profile");
        }

        info!(medications = self.medications.len(), "profile saved");
        self.mode = ProfileMode::Viewing;
        self.is_new_user = false;
        self.pending = None;
        Alert::new("Success", "Profile saved successfully!")
    }

    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) -> ScreenResult<()> {
        self.require_editing()?;
        self.profile.set(field, value.into());
        Ok(())
    }

    /// Append an empty, active medication and return its index.
    pub fn add_medication(&mut self) -> ScreenResult<usize> {
        self.require_editing()?;
        self.medications.push(Medication::new());
        Ok(self.medications.len() - 1)
    }

    pub fn update_medication(
        &mut self,
        index: usize,
        field: MedicationField,
        value: impl Into<String>,
    ) -> ScreenResult<()> {
        self.require_editing()?;
        self.medication_mut(index)?.set(field, value.into());
        Ok(())
    }

    pub fn toggle_medication_status(&mut self, index: usize) -> ScreenResult<()> {
        self.require_editing()?;
        self.medication_mut(index)?.toggle_status();
        Ok(())
    }

    /// Ask before deleting the medication at `index`.
    pub fn request_delete_medication(&mut self, index: usize) -> ScreenResult<Dialog> {
        self.require_editing()?;
        self.medication_mut(index)?;
        self.pending = Some(PendingAction::DeleteMedication(index));

        Ok(Dialog::confirm_destructive(
            "Delete Medication",
            "Are you sure you want to delete this medication?",
            "Delete",
        ))
    }

    /// Ask before wiping the profile and medications.
    pub fn request_clear_profile(&mut self) -> Dialog {
        self.pending = Some(PendingAction::ClearProfile);

        Dialog::confirm_destructive(
            "Clear Profile",
            "Are you sure you want to clear all your profile information?",
            "Clear",
        )
    }

    /// Apply the user's answer to the pending confirmation.
    ///
    /// Returns an alert only if clearing stored data failed.
    pub fn resolve_pending(&mut self, decision: Decision) -> ScreenResult<Option<Alert>> {
        let pending = self.pending.take().ok_or(ScreenError::NothingPending)?;
        if decision == Decision::Cancel {
            return Ok(None);
        }

        match pending {
            PendingAction::DeleteMedication(index) => {
                self.require_editing()?;
                self.medication_mut(index)?;
                self.medications.remove(index);
                Ok(None)
            }
            PendingAction::ClearProfile => Ok(self.clear()),
        }
    }

    fn clear(&mut self) -> Option<Alert> {
        self.profile = Profile::default();
        self.medications.clear();
        self.mode = ProfileMode::Editing;

        match self.records.clear_profile() {
            Ok(()) => {
                info!("profile cleared");
                None
            }
            Err(e) => {
                error!(error = %e, "failed to clear stored profile");
                Some(Alert::new("Error", "Could not clear saved profile data."))
            }
        }
    }

    fn require_editing(&self) -> ScreenResult<()> {
        if !self.is_editing() {
            return Err(ScreenError::NotEditing);
        }
        Ok(())
    }

    fn medication_mut(&mut self, index: usize) -> ScreenResult<&mut Medication> {
        let len = self.medications.len();
        self.medications
            .get_mut(index)
            .ok_or(ScreenError::IndexOutOfRange { index, len })
    }
}
