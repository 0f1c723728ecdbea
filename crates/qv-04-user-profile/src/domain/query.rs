//! Activity feed queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-side activity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityFilter {
    /// Polls still open for votes.
    Active,
    /// Polls that have ended.
    Inactive,
    /// Polls the user authored.
    Created,
    /// Polls the user voted on.
    Participated,
}

impl ActivityFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityFilter::Active => "active",
            ActivityFilter::Inactive => "inactive",
            ActivityFilter::Created => "created",
            ActivityFilter::Participated => "participated",
        }
    }
}

impl fmt::Display for ActivityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ActivityFilter::Active),
            "inactive" => Ok(ActivityFilter::Inactive),
            "created" => Ok(ActivityFilter::Created),
            "participated" => Ok(ActivityFilter::Participated),
            other => Err(format!("unknown activity filter: {other}")),
        }
    }
}

/// `GET /user/getUserActivities` parameters.
///
/// `world_id: None` asks for the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub world_id: Option<String>,
    pub filter: Option<ActivityFilter>,
    pub search: Option<String>,
}

impl ActivityQuery {
    pub fn for_user(world_id: impl Into<String>) -> Self {
        Self {
            world_id: Some(world_id.into()),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: ActivityFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Search term with surrounding whitespace removed; blank means none.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Query string pairs. Unset parameters are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = self.filter {
            pairs.push(("filter", filter.as_str().to_string()));
        }
        if let Some(search) = self.search_term() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(world_id) = self.world_id.as_deref().filter(|w| !w.is_empty()) {
            pairs.push(("worldID", world_id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_pairs() {
        assert!(ActivityQuery::default().to_query_pairs().is_empty());
        assert!(ActivityQuery::default()
            .with_search("   ")
            .to_query_pairs()
            .is_empty());
    }

    #[test]
    fn test_full_query_pairs() {
        let query = ActivityQuery::for_user("0xabc")
            .with_filter(ActivityFilter::Participated)
            .with_search(" bridge ");

        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("filter", "participated".to_string()),
                ("search", "bridge".to_string()),
                ("worldID", "0xabc".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("Created".parse(), Ok(ActivityFilter::Created));
        assert!("finished".parse::<ActivityFilter>().is_err());
    }
}
