//! Domain layer for user profiles

pub mod activity;
pub mod query;

pub use activity::{ActivityPage, ProfileOverview, RECENT_PREVIEW};
pub use query::{ActivityFilter, ActivityQuery};
