//! # Poll Directory (qv-03)
//!
//! Everything around a poll that is not casting a vote: browsing the feed,
//! drafting and publishing polls, deleting them and reading results.
//!
//! ## Feed Paging
//!
//! ```text
//! FeedPreset + PollFilters + search
//!         │
//!         ↓
//!   PollListQuery ── same filters? ──yes──→ keep loaded pages
//!         │ no
//!         ↓
//!   PollFeed::new (page 0) ── load_more ──→ GET /poll?page=N
//!                                   ↑              │
//!                                   └── has_more ──┘
//! ```
//!
//! | Rule | Value |
//! |------|-------|
//! | Page size | 10 |
//! | Default sort | `endDate` ascending |
//! | Total pages | `ceil(total / limit)`, at least 1 |
//! | Late page of old filters | dropped |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Queries, feed accumulation, draft validation, relative time
//! - `ports/` - `PollDirectoryGateway`
//! - `adapters/` - In-memory directory
//! - `application/` - `PollDirectory` service

pub mod adapters;
pub mod application;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::InMemoryPollDirectory;
pub use application::PollDirectory;
pub use domain::{
    relative_time, DraftViolation, FeedPreset, PollDraft, PollFeed, PollFilters, PollListQuery,
    PollPage, RelativeTime, SortBy, SortOrder, DEFAULT_PAGE_SIZE,
};
pub use error::{DirectoryError, DirectoryResult};
pub use ports::PollDirectoryGateway;
