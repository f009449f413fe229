//! Domain models for the activity feed.
//!
//! - [`Event`]: an activity record as stored, stamped with local time and date.
//! - [`Day`]: selects one of the two retained buckets, `today` or `yesterday`.
//! - [`CreateEventInput`]: what producers submit; the store assigns the stamps.
//!
//! The remaining types are the response bodies of the HTTP API.

mod day;
mod event;

pub use day::*;
pub use event::*;
