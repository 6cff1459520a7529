//! Domain models for the care companion app.

mod calendar;
mod chat;
mod profile;
mod reminder;

pub use calendar::*;
pub use chat::*;
pub use profile::*;
pub use reminder::*;
