//! Command-line arguments.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use qv_02_voting_session::ReseedPolicy;
use qv_03_poll_directory::{FeedPreset, PollFilters};
use qv_04_user_profile::{ActivityFilter, ActivityQuery};

/// Browse polls and cast quadratic votes from the terminal
#[derive(Parser, Debug)]
#[command(name = "qv", version)]
#[command(about = "Command-line client for the quadratic-vote backend")]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "QV_BACKEND_URL", default_value = qv_api_client::DEFAULT_BACKEND_URL)]
    pub backend: String,

    /// Session token sent as a bearer token
    #[arg(long, env = "QV_AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "QV_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List polls
    Polls(PollsArgs),
    /// Show one poll with its results
    Show {
        poll_id: u64,
    },
    /// Allocate voting power and submit a vote
    Vote(VoteArgs),
    /// Create a poll
    Create(CreateArgs),
    /// Delete a poll
    Delete {
        poll_id: u64,
    },
    /// Show a profile and its recent activity
    Profile {
        /// World id of another user; defaults to you
        world_id: Option<String>,
    },
    /// List a user's activity
    Activities(ActivitiesArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    #[default]
    All,
    Trending,
    Recent,
    Voted,
}

impl From<Preset> for FeedPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::All => FeedPreset::All,
            Preset::Trending => FeedPreset::Trending,
            Preset::Recent => FeedPreset::Recent,
            Preset::Voted => FeedPreset::Voted,
        }
    }
}

#[derive(Args, Debug)]
pub struct PollsArgs {
    #[arg(long, value_enum, default_value_t = Preset::All)]
    pub preset: Preset,

    /// Only polls still accepting votes
    #[arg(long)]
    pub live: bool,

    /// Only polls past their end date
    #[arg(long)]
    pub finished: bool,

    /// Only polls you voted on
    #[arg(long)]
    pub voted: bool,

    /// Only polls you created
    #[arg(long)]
    pub mine: bool,

    /// Search in title and description
    #[arg(long, short)]
    pub search: Option<String>,

    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

impl PollsArgs {
    pub fn filters(&self) -> PollFilters {
        PollFilters {
            live_polls: self.live,
            finished_polls: self.finished,
            polls_voted: self.voted,
            polls_created: self.mine,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Reseed {
    #[default]
    PreserveEdits,
    Always,
}

impl From<Reseed> for ReseedPolicy {
    fn from(reseed: Reseed) -> Self {
        match reseed {
            Reseed::PreserveEdits => ReseedPolicy::PreserveEdits,
            Reseed::Always => ReseedPolicy::Always,
        }
    }
}

#[derive(Args, Debug)]
pub struct VoteArgs {
    pub poll_id: u64,

    /// Percentage for an option, by label or id: `--set "Yes=60"`
    #[arg(long = "set", value_parser = parse_assignment)]
    pub assignments: Vec<Assignment>,

    /// Print the allocation and gate without submitting
    #[arg(long)]
    pub dry_run: bool,

    /// Retries for loading the prior vote
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    #[arg(long, value_enum, default_value_t = Reseed::PreserveEdits)]
    pub reseed: Reseed,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Poll question
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Option label, repeat for each option
    #[arg(long = "option", required = true)]
    pub options: Vec<String>,

    /// Tags, comma or space separated
    #[arg(long, default_value = "")]
    pub tags: String,

    /// Start time (RFC 3339), defaults to now
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Voting window length in hours
    #[arg(long, default_value_t = 72)]
    pub hours: i64,

    #[arg(long)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Activity {
    Active,
    Inactive,
    Created,
    Participated,
}

impl From<Activity> for ActivityFilter {
    fn from(activity: Activity) -> Self {
        match activity {
            Activity::Active => ActivityFilter::Active,
            Activity::Inactive => ActivityFilter::Inactive,
            Activity::Created => ActivityFilter::Created,
            Activity::Participated => ActivityFilter::Participated,
        }
    }
}

#[derive(Args, Debug)]
pub struct ActivitiesArgs {
    /// World id of another user; defaults to you
    #[arg(long)]
    pub user: Option<String>,

    #[arg(long, value_enum)]
    pub filter: Option<Activity>,

    /// Search in poll titles
    #[arg(long, short)]
    pub search: Option<String>,
}

impl ActivitiesArgs {
    pub fn query(&self) -> ActivityQuery {
        ActivityQuery {
            world_id: self.user.clone(),
            filter: self.filter.map(ActivityFilter::from),
            search: self.search.clone(),
        }
    }
}

/// One `--set` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub option: String,
    pub percentage: i32,
}

pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (option, percentage) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected OPTION=PERCENT, got {raw:?}"))?;
    let option = option.trim();
    if option.is_empty() {
        return Err(format!("missing option name in {raw:?}"));
    }
    let percentage = percentage
        .trim()
        .trim_end_matches('%')
        .parse::<i32>()
        .map_err(|e| format!("bad percentage in {raw:?}: {e}"))?;
    Ok(Assignment {
        option: option.to_string(),
        percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Yes=60").unwrap(),
            Assignment {
                option: "Yes".into(),
                percentage: 60
            }
        );
        assert_eq!(parse_assignment("a = b=25%").unwrap().option, "a = b");
        assert!(parse_assignment("Yes").is_err());
        assert!(parse_assignment("=5").is_err());
        assert!(parse_assignment("Yes=lots").is_err());
    }

    #[test]
    fn test_vote_subcommand() {
        let cli = Cli::try_parse_from([
            "qv", "--backend", "http://qv.local", "vote", "7", "--set", "A=60", "--set", "B=20",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Command::Vote(args) => {
                assert_eq!(args.poll_id, 7);
                assert_eq!(args.assignments.len(), 2);
                assert!(args.dry_run);
                assert_eq!(args.reseed, Reseed::PreserveEdits);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_activities_subcommand() {
        let cli = Cli::try_parse_from([
            "qv", "activities", "--user", "0xana", "--filter", "participated", "-s", "bridge",
        ])
        .unwrap();
        let Command::Activities(args) = cli.command else {
            panic!("expected activities");
        };
        let query = args.query();
        assert_eq!(query.world_id.as_deref(), Some("0xana"));
        assert_eq!(query.filter, Some(ActivityFilter::Participated));
        assert_eq!(query.search_term(), Some("bridge"));

        let cli = Cli::try_parse_from(["qv", "profile"]).unwrap();
        assert!(matches!(cli.command, Command::Profile { world_id: None }));
    }

    #[test]
    fn test_polls_filters() {
        let cli = Cli::try_parse_from(["qv", "polls", "--preset", "trending", "--live", "-s", "dao"])
            .unwrap();
        let Command::Polls(args) = cli.command else {
            panic!("expected polls");
        };
        assert_eq!(args.preset, Preset::Trending);
        assert_eq!(args.filters().is_active_filter(), Some(true));
        assert_eq!(args.search.as_deref(), Some("dao"));
    }
}
