//! # User Profile (qv-04)
//!
//! Voter profiles and their activity feeds: the profile header (name, polls
//! created, polls voted on) and the list of polls a user created or voted
//! on.
//!
//! ## Activity Feed
//!
//! | Parameter | Values | Omitted when |
//! |-----------|--------|--------------|
//! | `filter` | `active`, `inactive`, `created`, `participated` | no filter |
//! | `search` | poll title substring | blank |
//! | `worldID` | another user's world id | own profile |
//!
//! A profile overview shows the first [`RECENT_PREVIEW`] activities; a failed
//! activity fetch does not hide the profile header.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Activity queries, pages and the profile overview
//! - `ports/` - `UserProfileGateway`
//! - `adapters/` - In-memory user store
//! - `application/` - `ProfileService`

pub mod adapters;
pub mod application;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::InMemoryUserDirectory;
pub use application::ProfileService;
pub use domain::{ActivityFilter, ActivityPage, ActivityQuery, ProfileOverview, RECENT_PREVIEW};
pub use error::{ProfileError, ProfileResult};
pub use ports::UserProfileGateway;
