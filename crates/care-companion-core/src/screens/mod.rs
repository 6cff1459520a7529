//! Screen controllers.
//!
//! Each controller owns its screen's state, talks to the [`RecordStore`](crate::store::RecordStore)
//! and capability ports, and reports every failure as an [`Alert`] instead of an error.
//! Only caller mistakes (bad indices, edits outside edit mode) surface as [`ScreenError`].

mod alert;
mod chat;
mod home;
mod lifetime;
mod login;
mod navigation;
mod profile;
mod scheduler;

pub use alert::*;
pub use chat::*;
pub use home::*;
pub use lifetime::*;
pub use login::*;
pub use navigation::*;
pub use profile::*;
pub use scheduler::*;

use thiserror::Error;

/// Misuse of a screen controller by the UI layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenError {
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Screen is not in edit mode")]
    NotEditing,

    #[error("No confirmation is pending")]
    NothingPending,

    #[error("Unknown emergency number: {0}")]
    UnknownNumber(String),
}

pub type ScreenResult<T> = Result<T, ScreenError>;
