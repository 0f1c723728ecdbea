//! # Poll Draft
//!
//! Poll creation form state and its validation rules.
//!
//! | Field | Rule |
//! |-------|------|
//! | title | required, 8..=90 chars |
//! | description | required, at most 1400 chars |
//! | tags | 1..=5, each non-empty |
//! | options | at least 2, each non-empty, at most 30 chars, unique |
//! | start / end | required, end after start |
//!
//! Validation reports every violation at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::CreatePollRequest;
use std::collections::HashSet;
use std::fmt;

pub const TITLE_MIN_CHARS: usize = 8;
pub const TITLE_MAX_CHARS: usize = 90;
pub const DESCRIPTION_MAX_CHARS: usize = 1400;
pub const MAX_TAGS: usize = 5;
pub const TAG_MIN_CHARS: usize = 3;
pub const TAG_MAX_CHARS: usize = 20;
pub const MIN_OPTIONS: usize = 2;
pub const OPTION_MAX_CHARS: usize = 30;

/// A broken draft rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DraftViolation {
    TitleMissing,
    TitleTooShort { chars: usize },
    TitleTooLong { chars: usize },
    DescriptionMissing,
    DescriptionTooLong { chars: usize },
    NoTags,
    TooManyTags { count: usize },
    EmptyTag { index: usize },
    TagsTooShort { tags: Vec<String> },
    TooFewOptions { count: usize },
    EmptyOption { index: usize },
    OptionTooLong { index: usize, chars: usize },
    DuplicateOption { label: String },
    StartMissing,
    EndMissing,
    EndNotAfterStart,
}

impl fmt::Display for DraftViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftViolation::TitleMissing => write!(f, "Poll question is required"),
            DraftViolation::TitleTooShort { chars } => {
                write!(f, "Poll question too short ({chars}/{TITLE_MAX_CHARS}, min {TITLE_MIN_CHARS})")
            }
            DraftViolation::TitleTooLong { chars } => {
                write!(f, "{chars}/{TITLE_MAX_CHARS} Max character limit reached")
            }
            DraftViolation::DescriptionMissing => write!(f, "Description is required"),
            DraftViolation::DescriptionTooLong { chars } => {
                write!(f, "{chars}/{DESCRIPTION_MAX_CHARS} Max character limit reached")
            }
            DraftViolation::NoTags => write!(f, "At least one tag is required"),
            DraftViolation::TooManyTags { count } => {
                write!(f, "{count}/{MAX_TAGS} Max tag limit reached")
            }
            DraftViolation::EmptyTag { index } => write!(f, "Tag {} cannot be empty", index + 1),
            DraftViolation::TagsTooShort { tags } => write!(
                f,
                "Tags \"{}\" must be at least {TAG_MIN_CHARS} characters",
                tags.join(", ")
            ),
            DraftViolation::TooFewOptions { count } => {
                write!(f, "At least {MIN_OPTIONS} options are required (got {count})")
            }
            DraftViolation::EmptyOption { index } => {
                write!(f, "Option {} cannot be empty", index + 1)
            }
            DraftViolation::OptionTooLong { index, chars } => write!(
                f,
                "Option {}: {chars}/{OPTION_MAX_CHARS} Max character limit reached",
                index + 1
            ),
            DraftViolation::DuplicateOption { label } => {
                write!(f, "Option \"{label}\" appears more than once")
            }
            DraftViolation::StartMissing => write!(f, "Start date is required"),
            DraftViolation::EndMissing => write!(f, "End date is required"),
            DraftViolation::EndNotAfterStart => write!(f, "End date must be after start date"),
        }
    }
}

/// Poll creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub options: Vec<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub is_anonymous: Option<bool>,
}

impl PollDraft {
    /// Add tags typed into the tag box.
    ///
    /// Input is split on commas and whitespace and lower-cased. Duplicates,
    /// tags over 20 chars and tags past the limit of 5 are skipped. If any
    /// piece is shorter than 3 chars nothing is added.
    ///
    /// Returns the number of tags added.
    pub fn add_tags(&mut self, input: &str) -> Result<usize, DraftViolation> {
        let pieces: Vec<String> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let short: Vec<String> = pieces
            .iter()
            .filter(|t| t.chars().count() < TAG_MIN_CHARS)
            .cloned()
            .collect();
        if !short.is_empty() {
            return Err(DraftViolation::TagsTooShort { tags: short });
        }

        let before = self.tags.len();
        for tag in pieces {
            if self.tags.len() >= MAX_TAGS {
                break;
            }
            if tag.chars().count() <= TAG_MAX_CHARS && !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        Ok(self.tags.len() - before)
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Every broken rule, in field order. Empty when the draft is valid.
    pub fn violations(&self) -> Vec<DraftViolation> {
        let mut out = Vec::new();

        let title_chars = self.title.chars().count();
        if self.title.is_empty() {
            out.push(DraftViolation::TitleMissing);
        } else if title_chars > TITLE_MAX_CHARS {
            out.push(DraftViolation::TitleTooLong { chars: title_chars });
        } else if title_chars < TITLE_MIN_CHARS {
            out.push(DraftViolation::TitleTooShort { chars: title_chars });
        }

        let description_chars = self.description.chars().count();
        if self.description.is_empty() {
            out.push(DraftViolation::DescriptionMissing);
        } else if description_chars > DESCRIPTION_MAX_CHARS {
            out.push(DraftViolation::DescriptionTooLong {
                chars: description_chars,
            });
        }

        if self.tags.is_empty() {
            out.push(DraftViolation::NoTags);
        } else if self.tags.len() > MAX_TAGS {
            out.push(DraftViolation::TooManyTags {
                count: self.tags.len(),
            });
        }
        for (index, tag) in self.tags.iter().enumerate() {
            if tag.is_empty() {
                out.push(DraftViolation::EmptyTag { index });
            }
        }

        if self.options.len() < MIN_OPTIONS {
            out.push(DraftViolation::TooFewOptions {
                count: self.options.len(),
            });
        }
        let mut seen = HashSet::new();
        for (index, option) in self.options.iter().enumerate() {
            let chars = option.chars().count();
            if option.is_empty() {
                out.push(DraftViolation::EmptyOption { index });
            } else if chars > OPTION_MAX_CHARS {
                out.push(DraftViolation::OptionTooLong { index, chars });
            }
            // Labels double as legacy option ids and must not collide.
            if !option.is_empty() && !seen.insert(option.trim()) {
                out.push(DraftViolation::DuplicateOption {
                    label: option.trim().to_string(),
                });
            }
        }

        match (self.start, self.end) {
            (None, None) => {
                out.push(DraftViolation::StartMissing);
                out.push(DraftViolation::EndMissing);
            }
            (None, Some(_)) => out.push(DraftViolation::StartMissing),
            (Some(_), None) => out.push(DraftViolation::EndMissing),
            (Some(start), Some(end)) if end <= start => {
                out.push(DraftViolation::EndNotAfterStart)
            }
            (Some(_), Some(_)) => {}
        }

        out
    }

    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }

    /// Validated `POST /poll` body.
    pub fn to_request(&self) -> Result<CreatePollRequest, Vec<DraftViolation>> {
        let violations = self.violations();
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(violations);
        };
        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(CreatePollRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            options: self.options.clone(),
            start_date: start,
            end_date: end,
            tags: self.tags.clone(),
            is_anonymous: self.is_anonymous,
        })
    }
}
