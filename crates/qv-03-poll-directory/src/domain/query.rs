//! # Poll List Query
//!
//! Filters, sorting and paging for `GET /poll`, plus the feed presets and
//! live/finished toggles that produce them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Polls per page unless overridden.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    CreationDate,
    #[default]
    EndDate,
    ParticipantCount,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::CreationDate => "creationDate",
            SortBy::EndDate => "endDate",
            SortBy::ParticipantCount => "participantCount",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toggles from the filter sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollFilters {
    pub live_polls: bool,
    pub finished_polls: bool,
    pub polls_voted: bool,
    pub polls_created: bool,
}

impl PollFilters {
    /// `isActive` parameter: set only when exactly one of live/finished is on.
    pub fn is_active_filter(&self) -> Option<bool> {
        match (self.live_polls, self.finished_polls) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

/// Feed tabs of the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPreset {
    #[default]
    All,
    /// Most participants first.
    Trending,
    /// Newest first.
    Recent,
    /// Polls the user voted on.
    Voted,
}

/// Query parameters of `GET /poll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub is_active: Option<bool>,
    pub user_voted: Option<bool>,
    pub user_created: Option<bool>,
    pub search: Option<String>,
}

impl Default for PollListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: None,
            is_active: None,
            user_voted: None,
            user_created: None,
            search: None,
        }
    }
}

impl PollListQuery {
    /// Query for a feed tab with the filter sheet and search box applied.
    pub fn for_feed(preset: FeedPreset, filters: &PollFilters, search: Option<&str>) -> Self {
        let mut query = Self {
            is_active: filters.is_active_filter(),
            user_voted: filters.polls_voted.then_some(true),
            user_created: filters.polls_created.then_some(true),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            ..Self::default()
        };

        match preset {
            FeedPreset::All => {}
            FeedPreset::Trending => {
                query.sort_by = Some(SortBy::ParticipantCount);
                query.sort_order = Some(SortOrder::Desc);
            }
            FeedPreset::Recent => {
                query.sort_by = Some(SortBy::CreationDate);
                query.sort_order = Some(SortOrder::Desc);
            }
            FeedPreset::Voted => query.user_voted = Some(true),
        }
        query
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn effective_sort_by(&self) -> SortBy {
        self.sort_by.unwrap_or_default()
    }

    pub fn effective_sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }

    /// Same filters, ignoring the page number.
    pub fn same_filters(&self, other: &Self) -> bool {
        self.with_page(1) == other.with_page(1)
    }

    /// Query-string pairs in a stable order. Unset filters are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.max(1).to_string()),
            ("sortBy", self.effective_sort_by().to_string()),
            ("sortOrder", self.effective_sort_order().to_string()),
        ];

        if let Some(active) = self.is_active {
            pairs.push(("isActive", active.to_string()));
        }
        if let Some(voted) = self.user_voted {
            pairs.push(("userVoted", voted.to_string()));
        }
        if let Some(created) = self.user_created {
            pairs.push(("userCreated", created.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}
