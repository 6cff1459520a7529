//! Login gate.
//!
//! There is no credential check: any non-empty identifier and secret get through.

use super::{Alert, Screen};

/// What the login button did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Navigate(Screen),
    Rejected(Alert),
}

/// Login form state.
#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    identifier: String,
    secret: String,
    secret_visible: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.secret = secret.into();
    }

    pub fn toggle_secret_visibility(&mut self) {
        self.secret_visible = !self.secret_visible;
    }

    pub fn is_secret_visible(&self) -> bool {
        self.secret_visible
    }

    /// Accessibility label of the show/hide button.
    pub fn visibility_label(&self) -> &'static str {
        if self.secret_visible {
            "Hide password"
        } else {
            "Show password"
        }
    }

    pub fn submit(&self) -> LoginOutcome {
        validate_login(&self.identifier, &self.secret)
    }
}

/// Both fields must be non-empty; nothing else is checked.
pub fn validate_login(identifier: &str, secret: &str) -> LoginOutcome {
    if identifier.is_empty() || secret.is_empty() {
        return LoginOutcome::Rejected(Alert::new(
            "Login",
            "Please enter email and password",
        ));
    }
    LoginOutcome::Navigate(Screen::Home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        let mut screen = LoginScreen::new();
        assert!(matches!(screen.submit(), LoginOutcome::Rejected(_)));

        screen.set_identifier("me@example.com");
        assert!(matches!(screen.submit(), LoginOutcome::Rejected(_)));

        screen.set_secret("hunter2");
        assert_eq!(screen.submit(), LoginOutcome::Navigate(Screen::Home));
    }

    #[test]
    fn test_secret_visibility_toggle() {
        let mut screen = LoginScreen::new();
        assert!(!screen.is_secret_visible());
        assert_eq!(screen.visibility_label(), "Show password");

        screen.toggle_secret_visibility();
        assert!(screen.is_secret_visible());
        assert_eq!(screen.visibility_label(), "Hide password");
    }
}
