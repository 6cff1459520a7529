//! Screen navigation.

use std::fmt;

use thiserror::Error;

/// The four screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Home,
    Chat,
    Profile,
}

impl Screen {
    pub fn route(&self) -> &'static str {
        match self {
            Screen::Login => "/",
            Screen::Home => "/ChatIntroScreen",
            Screen::Chat => "/chat",
            Screen::Profile => "/profile",
        }
    }

    /// Screens reachable from this one by an explicit forward transition.
    pub fn destinations(&self) -> &'static [Screen] {
        match self {
            Screen::Login => &[Screen::Home],
            Screen::Home => &[Screen::Chat, Screen::Profile],
            Screen::Chat | Screen::Profile => &[],
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Cannot navigate from {from} to {to}")]
pub struct NavigationError {
    pub from: Screen,
    pub to: Screen,
}

/// Back stack of screens. Starts at [`Screen::Login`].
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Login],
        }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Login)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push `to` if it is reachable from the current screen.
    pub fn push(&mut self, to: Screen) -> Result<Screen, NavigationError> {
        let from = self.current();
        if !from.destinations().contains(&to) {
            return Err(NavigationError { from, to });
        }
        self.stack.push(to);
        Ok(to)
    }

    /// Pop the current screen. At the root this is a no-op returning `None`.
    pub fn back(&mut self) -> Option<Screen> {
        if self.stack.len() <= 1 {
            return None;
        }
        self.stack.pop();
        Some(self.current())
    }
}
