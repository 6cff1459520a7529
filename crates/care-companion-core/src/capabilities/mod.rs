//! Device capability ports.
//!
//! These traits are the boundary between the core and OS services (calendar, dialer, maps).
//! The native shell implements them; the in-memory versions here back tests and previews.

mod calendar;
mod links;

pub use calendar::*;
pub use links::*;
