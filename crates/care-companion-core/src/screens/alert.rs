//! User-facing alerts and confirmation dialogs.

/// A blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Button styling hint for a dialog choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    Default,
    Cancel,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogChoice {
    pub label: String,
    pub style: ChoiceStyle,
}

impl DialogChoice {
    pub fn new(label: impl Into<String>, style: ChoiceStyle) -> Self {
        Self {
            label: label.into(),
            style,
        }
    }

    pub fn cancel() -> Self {
        Self::new("Cancel", ChoiceStyle::Cancel)
    }
}

/// A dialog that waits for the user to pick one of `choices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub choices: Vec<DialogChoice>,
}

impl Dialog {
    /// Cancel / destructive confirmation, e.g. "Delete".
    pub fn confirm_destructive(
        title: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            choices: vec![
                DialogChoice::cancel(),
                DialogChoice::new(action, ChoiceStyle::Destructive),
            ],
        }
    }
}

/// The user's answer to a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Decision::Confirm
        } else {
            Decision::Cancel
        }
    }
}
