//! Patient profile and medication models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for an unrecognised field key coming from the UI layer.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

/// The patient's own profile. Every field is free text.
///
/// Persisted with camelCase keys; fields absent from an older document decode as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
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

/// Editable profile fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    MiddleName,
    LastName,
    PreferredName,
    Age,
    Gender,
    BirthDate,
    Email,
    Phone,
}

impl ProfileField {
    pub const ALL: [ProfileField; 9] = [
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::MiddleName,
        ProfileField::PreferredName,
        ProfileField::Age,
        ProfileField::Gender,
        ProfileField::BirthDate,
        ProfileField::Email,
        ProfileField::Phone,
    ];

    /// Key used in the persisted document and by the UI layer.
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "firstName",
            ProfileField::MiddleName => "middleName",
            ProfileField::LastName => "lastName",
            ProfileField::PreferredName => "preferredName",
            ProfileField::Age => "age",
            ProfileField::Gender => "gender",
            ProfileField::BirthDate => "birthDate",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "First Name",
            ProfileField::MiddleName => "Middle Name",
            ProfileField::LastName => "Last Name",
            ProfileField::PreferredName => "Preferred Name",
            ProfileField::Age => "Age",
            ProfileField::Gender => "Gender",
            ProfileField::BirthDate => "Birth Date",
            ProfileField::Email => "Email",
            ProfileField::Phone => "Phone",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "Enter your first name",
            ProfileField::MiddleName => "Optional",
            ProfileField::LastName => "Enter your last name",
            ProfileField::PreferredName => "Enter preferred name",
            ProfileField::Age => "Your age",
            ProfileField::Gender => "Your gender identity",
            ProfileField::BirthDate => "YYYY-MM-DD",
            ProfileField::Email => "your.email@example.com",
            ProfileField::Phone => "(xxx) xxx-xxxx",
        }
    }

    /// First and last name must be filled before a profile can be saved.
    pub fn is_required(&self) -> bool {
        matches!(self, ProfileField::FirstName | ProfileField::LastName)
    }
}

impl FromStr for ProfileField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileField::ALL
            .iter()
            .copied()
            .find(|f| f.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Profile {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.first_name,
            ProfileField::MiddleName => &self.middle_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::PreferredName => &self.preferred_name,
            ProfileField::Age => &self.age,
            ProfileField::Gender => &self.gender,
            ProfileField::BirthDate => &self.birth_date,
            ProfileField::Email => &self.email,
            ProfileField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::FirstName => &mut self.first_name,
            ProfileField::MiddleName => &mut self.middle_name,
            ProfileField::LastName => &mut self.last_name,
            ProfileField::PreferredName => &mut self.preferred_name,
            ProfileField::Age => &mut self.age,
            ProfileField::Gender => &mut self.gender,
            ProfileField::BirthDate => &mut self.birth_date,
            ProfileField::Email => &mut self.email,
            ProfileField::Phone => &mut self.phone,
        };
        *slot = value;
    }

    /// Check the required fields (first and last name) are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }

    /// Check if either name has been entered at all.
    pub fn has_any_name(&self) -> bool {
        !self.first_name.is_empty() || !self.last_name.is_empty()
    }

    /// "First Last" once both are present.
    pub fn full_name(&self) -> Option<String> {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return None;
        }
        Some(format!("{} {}", self.first_name, self.last_name))
    }
}

/// Whether the patient is still taking a medication.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    #[default]
    Active,
    Inactive,
}

impl MedicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Active => "active",
            MedicationStatus::Inactive => "inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            MedicationStatus::Active => MedicationStatus::Inactive,
            MedicationStatus::Inactive => MedicationStatus::Active,
        }
    }
}

/// A medication record on the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Medication {
    pub name: String,
    /// Doctor or healthcare provider
    pub prescriber: String,
    /// e.g. "500mg"
    pub dosage: String,
    /// e.g. "Once daily"
    pub frequency: String,
    pub status: MedicationStatus,
}

/// Editable text fields of a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MedicationField {
    Name,
    Prescriber,
    Dosage,
    Frequency,
}

impl MedicationField {
    pub const ALL: [MedicationField; 4] = [
        MedicationField::Name,
        MedicationField::Prescriber,
        MedicationField::Dosage,
        MedicationField::Frequency,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MedicationField::Name => "name",
            MedicationField::Prescriber => "prescriber",
            MedicationField::Dosage => "dosage",
            MedicationField::Frequency => "frequency",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            MedicationField::Name => "Medication name",
            MedicationField::Prescriber => "Doctor or healthcare provider",
            MedicationField::Dosage => "e.g., 500mg",
            MedicationField::Frequency => "e.g., Once daily",
        }
    }
}

impl FromStr for MedicationField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MedicationField::ALL
            .iter()
            .copied()
            .find(|f| f.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl Medication {
    /// Create an empty, active medication.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: MedicationField) -> &str {
        match field {
            MedicationField::Name => &self.name,
            MedicationField::Prescriber => &self.prescriber,
            MedicationField::Dosage => &self.dosage,
            MedicationField::Frequency => &self.frequency,
        }
    }

    pub fn set(&mut self, field: MedicationField, value: String) {
        let slot = match field {
            MedicationField::Name => &mut self.name,
            MedicationField::Prescriber => &mut self.prescriber,
            MedicationField::Dosage => &mut self.dosage,
            MedicationField::Frequency => &mut self.frequency,
        };
        *slot = value;
    }

    pub fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    pub fn is_active(&self) -> bool {
        self.status == MedicationStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_completeness() {
        let mut profile = Profile::default();
        assert!(!profile.is_complete());
        assert!(!profile.has_any_name());

        profile.set(ProfileField::FirstName, "Ada".into());
        assert!(profile.has_any_name());
        assert!(!profile.is_complete());

        profile.set(ProfileField::LastName, "   ".into());
        assert!(!profile.is_complete());

        profile.set(ProfileField::LastName, "Lovelace".into());
        assert!(profile.is_complete());
        assert_eq!(profile.full_name(), Some("Ada Lovelace".into()));
    }

    #[test]
    fn test_profile_camel_case_document() {
        let mut profile = Profile::default();
        profile.first_name = "Ada".into();
        profile.birth_date = "1815-12-10".into();

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["birthDate"], "1815-12-10");
    }

    #[test]
    fn test_profile_missing_fields_default_to_empty() {
        let profile: Profile = serde_json::from_str(r#"{"firstName":"Ada"}"#).unwrap();
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.phone, "");
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in ProfileField::ALL {
            assert_eq!(field.key().parse::<ProfileField>().unwrap(), field);
        }
        assert!("nickname".parse::<ProfileField>().is_err());
        assert_eq!("dosage".parse::<MedicationField>().unwrap(), MedicationField::Dosage);
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = ProfileField::ALL
            .iter()
            .filter(|f| f.is_required())
            .collect();
        assert_eq!(required, vec![&ProfileField::FirstName, &ProfileField::LastName]);
    }

    #[test]
    fn test_new_medication_is_active() {
        let mut med = Medication::new();
        assert!(med.is_active());
        assert_eq!(med.name, "");

        med.toggle_status();
        assert_eq!(med.status, MedicationStatus::Inactive);
        med.toggle_status();
        assert!(med.is_active());
    }

    #[test]
    fn test_medication_status_serialized_lowercase() {
        let mut med = Medication::new();
        med.set(MedicationField::Name, "Metformin".into());
        med.status = MedicationStatus::Inactive;

        let json = serde_json::to_value(&med).unwrap();
        assert_eq!(json["status"], "inactive");
        assert_eq!(json["name"], "Metformin");

        let back: Medication = serde_json::from_value(json).unwrap();
        assert_eq!(back, med);
    }
}
