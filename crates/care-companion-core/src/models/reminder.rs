//! Reminder list model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reminder list errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReminderError {
    #[error("Reminder text cannot be empty")]
    Empty,

    #[error("No reminder at index {index} (list has {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered list of reminder texts. Persisted as a plain JSON array of strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ReminderList {
    items: Vec<String>,
}

impl ReminderList {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    /// Append a reminder. Surrounding whitespace is trimmed; blank text is rejected.
    pub fn add(&mut self, text: &str) -> Result<&str, ReminderError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ReminderError::Empty);
        }
        self.items.push(trimmed.to_string());
        Ok(self.items.last().map(String::as_str).unwrap_or_default())
    }

    /// Remove the reminder at `index`, keeping the order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<String, ReminderError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    pub fn check_index(&self, index: usize) -> Result<(), ReminderError> {
        if index >= self.items.len() {
            return Err(ReminderError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims() {
        let mut list = ReminderList::default();
        assert_eq!(list.add("  Drink water ").unwrap(), "Drink water");
        assert_eq!(list.items(), &["Drink water".to_string()]);
    }

    #[test]
    fn test_add_rejects_blank() {
        let mut list = ReminderList::new(vec!["a".into()]);
        assert_eq!(list.add("   \t"), Err(ReminderError::Empty));
        assert_eq!(list.add(""), Err(ReminderError::Empty));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut list = ReminderList::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(list.remove(1).unwrap(), "b");
        assert_eq!(list.items(), &["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list = ReminderList::new(vec!["a".into()]);
        assert_eq!(
            list.remove(3),
            Err(ReminderError::OutOfRange { index: 3, len: 1 })
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let list = ReminderList::new(vec!["Take morning vitamins".into()]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["Take morning vitamins"]"#);
    }
}
