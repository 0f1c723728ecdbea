//! # Poll Feed
//!
//! Accumulates pages of `GET /poll` for "load more" scrolling. Changing the
//! filters or the search term starts over at page 1.

use super::query::PollListQuery;
use serde::Serialize;
use shared_types::PollDetails;
use tracing::debug;

/// One page as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollPage {
    pub polls: Vec<PollDetails>,
    /// Matching polls across all pages.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollFeed {
    query: PollListQuery,
    polls: Vec<PollDetails>,
    loaded_page: u32,
    total: u64,
}

impl PollFeed {
    pub fn new(query: PollListQuery) -> Self {
        Self {
            query: query.with_page(1),
            polls: Vec::new(),
            loaded_page: 0,
            total: 0,
        }
    }

    /// Switch to `query`. Loaded pages are dropped unless only the page
    /// number differs.
    pub fn reset(&mut self, query: PollListQuery) {
        if self.query.same_filters(&query) {
            return;
        }
        debug!(?query, "feed filters changed, starting over");
        *self = Self::new(query);
    }

    pub fn query(&self) -> &PollListQuery {
        &self.query
    }

    pub fn polls(&self) -> &[PollDetails] {
        &self.polls
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn loaded_page(&self) -> u32 {
        self.loaded_page
    }

    /// `ceil(total / limit)`, at least 1.
    pub fn total_pages(&self) -> u32 {
        let limit = u64::from(self.query.limit.max(1));
        if self.total == 0 {
            return 1;
        }
        u32::try_from(self.total.div_ceil(limit)).unwrap_or(u32::MAX)
    }

    pub fn has_more(&self) -> bool {
        self.loaded_page < self.total_pages()
    }

    /// Request for the next page, `None` once everything is loaded.
    pub fn next_request(&self) -> Option<PollListQuery> {
        if self.loaded_page == 0 || self.has_more() {
            Some(self.query.with_page(self.loaded_page + 1))
        } else {
            None
        }
    }

    /// Append a fetched page.
    ///
    /// Returns `false` (and changes nothing) for a page of other filters or
    /// one that is not the next in sequence.
    pub fn apply_page(&mut self, request: &PollListQuery, page: PollPage) -> bool {
        if !request.same_filters(&self.query) || request.page != self.loaded_page + 1 {
            debug!(page = request.page, loaded = self.loaded_page, "ignoring out-of-sequence page");
            return false;
        }
        self.polls.extend(page.polls);
        self.total = page.total;
        self.loaded_page = request.page;
        true
    }
}
