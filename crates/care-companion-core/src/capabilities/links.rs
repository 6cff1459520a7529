//! URL-scheme capability used for the phone dialer and the maps app.

use std::sync::Mutex;

use thiserror::Error;

/// Link opening errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    #[error("No app can handle {0}")]
    Unsupported(String),

    #[error("Link provider error: {0}")]
    Provider(String),
}

/// Opens URLs with whatever app the OS routes them to (`tel:` to the dialer, `https:` to maps).
pub trait LinkOpener: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), LinkError>;
}

/// `tel:` URL for a phone number.
pub fn dial_url(number: &str) -> String {
    format!("tel:{}", number)
}

/// Link opener that only records what it was asked to open.
#[derive(Default)]
pub struct RecordingLinkOpener {
    opened: Mutex<Vec<String>>,
    unsupported_schemes: Vec<String>,
}

impl RecordingLinkOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse URLs with this scheme, e.g. `"tel"` on a device without a dialer.
    pub fn without_scheme(mut self, scheme: &str) -> Self {
        self.unsupported_schemes.push(scheme.to_string());
        self
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl LinkOpener for RecordingLinkOpener {
    fn open_url(&self, url: &str) -> Result<(), LinkError> {
        let scheme = url.split(':').next().unwrap_or_default();
        if self.unsupported_schemes.iter().any(|s| s == scheme) {
            return Err(LinkError::Unsupported(url.to_string()));
        }
        self.opened
            .lock()
            .map_err(|e| LinkError::Provider(format!("Lock poisoned: {}", e)))?
            .push(url.to_string());
        Ok(())
    }
}
