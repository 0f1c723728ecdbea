//! Subcommand implementations.
//!
//! Each command is generic over the gateway ports so it runs the same
//! against the HTTP client and the in-memory adapters.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use qv_01_allocation::Allocation;
use qv_02_voting_session::{
    PollApiGateway, SessionConfig, SubmitGate, SubmitReceipt, VotingSession, VotingSessionApi,
};
use qv_03_poll_directory::{
    PollDirectory, PollDirectoryGateway, PollDraft, PollFeed, PollListQuery,
};
use qv_04_user_profile::{ActivityPage, ProfileOverview, ProfileService, UserProfileGateway};
use qv_telemetry::log_event;
use shared_types::{PollDetails, PollId};
use std::sync::Arc;

use crate::args::{ActivitiesArgs, Assignment, CreateArgs, PollsArgs, VoteArgs};

/// Load `args.pages` pages of the feed.
pub async fn list_polls<G: PollDirectoryGateway>(
    directory: &PollDirectory<G>,
    args: &PollsArgs,
) -> Result<PollFeed> {
    let query = PollListQuery::for_feed(args.preset.into(), &args.filters(), args.search.as_deref());
    log_event!(debug, "cli", "listing polls", pages = args.pages);

    let mut feed = directory.load(query).await.context("loading polls")?;
    for _ in 1..args.pages {
        if !directory.load_more().await.context("loading more polls")? {
            break;
        }
        feed = directory.feed();
    }
    Ok(feed)
}

/// Index of the option named by `name`, matched by id first, then by label
/// ignoring case.
pub fn resolve_option(allocation: &Allocation, name: &str) -> Option<usize> {
    let entries = allocation.entries();
    entries
        .iter()
        .position(|e| e.option().id.as_str() == name)
        .or_else(|| {
            entries
                .iter()
                .position(|e| e.option().label.eq_ignore_ascii_case(name))
        })
}

/// Outcome of `vote`: the final allocation, its gate and the receipt when a
/// vote was sent.
#[derive(Debug)]
pub struct VoteOutcome {
    pub allocation: Allocation,
    pub gate: SubmitGate,
    pub receipt: Option<SubmitReceipt>,
}

/// Hydrate the poll, apply `--set` assignments and submit unless dry-run.
pub async fn vote<G: PollApiGateway + 'static>(gateway: Arc<G>, args: &VoteArgs) -> Result<VoteOutcome> {
    let config = SessionConfig {
        prior_vote_retries: args.retries,
        reseed_policy: args.reseed.into(),
        ..SessionConfig::default()
    };
    let session = VotingSession::with_system_clock(gateway, config)?;
    let poll_id = PollId(args.poll_id);

    session.open(poll_id).await.with_context(|| format!("opening poll {poll_id}"))?;
    apply_assignments(&session, &args.assignments)?;

    let gate = session.gate();
    let allocation = session
        .allocation()
        .ok_or_else(|| anyhow!("poll {poll_id} has no allocation"))?;

    if args.dry_run || args.assignments.is_empty() {
        return Ok(VoteOutcome {
            allocation,
            gate,
            receipt: None,
        });
    }

    let receipt = session.submit().await.context("submitting vote")?;
    log_event!(
        info,
        "cli",
        "vote submitted",
        poll_id = %receipt.poll_id,
        action = %receipt.action
    );
    Ok(VoteOutcome {
        allocation: session.allocation().unwrap_or(allocation),
        gate: session.gate(),
        receipt: Some(receipt),
    })
}

fn apply_assignments<S: VotingSessionApi + ?Sized>(
    session: &S,
    assignments: &[Assignment],
) -> Result<()> {
    for assignment in assignments {
        let allocation = session
            .allocation()
            .ok_or_else(|| anyhow!("allocation not loaded"))?;
        let index = resolve_option(&allocation, &assignment.option).ok_or_else(|| {
            let known: Vec<&str> = allocation
                .entries()
                .iter()
                .map(|e| e.option().label.as_str())
                .collect();
            anyhow!(
                "unknown option {:?}, expected one of: {}",
                assignment.option,
                known.join(", ")
            )
        })?;
        session.set_percentage(index, assignment.percentage)?;
    }
    Ok(())
}

/// Draft from the `create` arguments.
pub fn build_draft(args: &CreateArgs, now: DateTime<Utc>) -> Result<PollDraft> {
    if args.hours <= 0 {
        bail!("--hours must be positive");
    }
    let start = args.start.unwrap_or(now);
    let end = Duration::try_hours(args.hours)
        .and_then(|window| start.checked_add_signed(window))
        .ok_or_else(|| anyhow!("--hours {} is out of range", args.hours))?;
    let mut draft = PollDraft {
        title: args.title.trim().to_string(),
        description: args.description.trim().to_string(),
        options: args.options.iter().map(|o| o.trim().to_string()).collect(),
        start: Some(start),
        end: Some(end),
        is_anonymous: args.anonymous.then_some(true),
        ..PollDraft::default()
    };
    draft
        .add_tags(&args.tags)
        .map_err(|violation| anyhow!("{violation}"))?;
    Ok(draft)
}

pub async fn create<G: PollDirectoryGateway>(
    directory: &PollDirectory<G>,
    args: &CreateArgs,
) -> Result<PollDetails> {
    let draft = build_draft(args, Utc::now())?;
    let created = directory.create_poll(&draft).await?;
    Ok(created)
}

/// Profile header and recent activity of `world_id`, or of the caller.
pub async fn profile<G: UserProfileGateway>(
    profiles: &ProfileService<G>,
    world_id: Option<&str>,
) -> Result<ProfileOverview> {
    let who = world_id.unwrap_or("me");
    profiles
        .overview(world_id)
        .await
        .with_context(|| format!("loading profile of {who}"))
}

pub async fn activities<G: UserProfileGateway>(
    profiles: &ProfileService<G>,
    args: &ActivitiesArgs,
) -> Result<ActivityPage> {
    let query = args.query();
    log_event!(debug, "cli", "listing activities", filter = ?query.filter);
    profiles
        .activities(&query)
        .await
        .context("loading activities")
}
