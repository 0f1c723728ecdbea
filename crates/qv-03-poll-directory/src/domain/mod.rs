//! Domain layer for the poll directory

pub mod draft;
pub mod feed;
pub mod query;
pub mod time;

pub use draft::{DraftViolation, PollDraft};
pub use feed::{PollFeed, PollPage};
pub use query::{FeedPreset, PollFilters, PollListQuery, SortBy, SortOrder, DEFAULT_PAGE_SIZE};
pub use time::{relative_time, RelativeTime};
