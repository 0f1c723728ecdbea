//! Plain-text rendering of polls, allocations and results.

use chrono::{DateTime, Utc};
use qv_01_allocation::Allocation;
use qv_02_voting_session::{SubmitGate, SubmitReceipt};
use qv_03_poll_directory::{relative_time, PollFeed};
use qv_04_user_profile::{ActivityPage, ProfileOverview};
use shared_types::{PollDetails, PollResults, UserActivity};
use std::fmt::Write;

/// One feed row: id, title, time left (or since end) and participants.
pub fn poll_line(poll: &PollDetails, now: DateTime<Utc>) -> String {
    let when = relative_time(poll.schedule.end, now, true);
    let status = if when.is_passed { "ended" } else { "live" };
    let voted = if poll.has_voted == Some(true) { " ✓" } else { "" };
    format!(
        "#{:<5} {:<40} {:>5} {:>14}  {} voters{voted}",
        poll.poll_id.to_string(),
        truncate(&poll.title, 40),
        status,
        when.text,
        poll.participant_count,
    )
}

pub fn feed(feed: &PollFeed, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for poll in feed.polls() {
        let _ = writeln!(out, "{}", poll_line(poll, now));
    }
    let _ = write!(
        out,
        "page {}/{} · {} polls",
        feed.loaded_page().max(1),
        feed.total_pages(),
        feed.total()
    );
    out
}

pub fn poll_details(poll: &PollDetails, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", poll.poll_id, poll.title);
    if !poll.description.is_empty() {
        let _ = writeln!(out, "{}", poll.description);
    }
    if let Some(author) = &poll.author {
        let _ = writeln!(out, "by {}", author.name);
    }
    if !poll.tags.is_empty() {
        let _ = writeln!(out, "tags: {}", poll.tags.join(", "));
    }
    let start = relative_time(poll.schedule.start, now, false);
    let start = if start.is_passed {
        format!("started {} ago", start.text)
    } else {
        format!("starts in {}", start.text)
    };
    let end = relative_time(poll.schedule.end, now, true);
    let ended = if end.is_passed { "ended " } else { "" };
    let _ = write!(out, "{start} · {ended}{}", end.text);
    out
}

pub fn allocation(allocation: &Allocation) -> String {
    let mut out = String::new();
    for (index, entry) in allocation.entries().iter().enumerate() {
        let lock = if allocation.is_option_locked(index) {
            "  (locked)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:>2}. {:<30} {:>3}%  weight {:>6.2}{lock}",
            index + 1,
            truncate(&entry.option().label, 30),
            entry.percentage(),
            entry.weight(),
        );
    }

    let total = allocation.total_percentage();
    if allocation.is_over_budget() {
        let _ = write!(out, "total {total}% ({}% over budget)", total - 100);
    } else {
        let _ = write!(out, "total {total}% ({}% left)", allocation.remaining_budget());
    }
    out
}

pub fn gate(gate: &SubmitGate) -> String {
    if gate.is_enabled() {
        return format!("ready to {} vote", gate.action());
    }
    let reasons: Vec<String> = gate.blockers().iter().map(ToString::to_string).collect();
    format!("cannot submit: {}", reasons.join("; "))
}

pub fn receipt(receipt: &SubmitReceipt) -> String {
    let vote = receipt
        .vote_id
        .as_ref()
        .map(|id| format!(" (vote {id})"))
        .unwrap_or_default();
    format!(
        "vote {}d for poll #{}{vote}",
        receipt.action, receipt.poll_id
    )
}

pub fn results(results: &PollResults) -> String {
    let mut out = String::new();
    for tally in &results.tallies {
        let bar_len = (tally.share_percent / 5.0).round() as usize;
        let _ = writeln!(
            out,
            "{:<30} {:>8.2} votes {:>6.1}%  {}",
            truncate(&tally.option.label, 30),
            tally.votes,
            tally.share_percent,
            "█".repeat(bar_len.min(20)),
        );
    }
    let _ = write!(out, "total {:.2} votes", results.total_votes);
    out
}

/// Header, counters and the recent-activity preview.
pub fn profile(overview: &ProfileOverview, now: DateTime<Utc>) -> String {
    let profile = &overview.profile;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", profile.display_name(), profile.world_id);
    let _ = writeln!(
        out,
        "{} polls created · {} polls participated",
        profile.polls_created, profile.polls_participated
    );
    let _ = writeln!(out);

    if let Some(error) = &overview.activities_error {
        let _ = write!(out, "recent activity unavailable: {error}");
        return out;
    }
    if overview.recent.is_empty() {
        let _ = write!(out, "no activity yet");
        return out;
    }
    let _ = writeln!(out, "recent activity");
    for activity in &overview.recent {
        let _ = writeln!(out, "{}", activity_line(activity, now));
    }
    if overview.has_more() {
        let hint = if overview.is_own_profile {
            "qv activities".to_string()
        } else {
            format!("qv activities --user {}", profile.world_id)
        };
        let _ = writeln!(out, "view all {} with `{hint}`", overview.total_activities);
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn activities(page: &ActivityPage, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for activity in &page.activities {
        let _ = writeln!(out, "{}", activity_line(activity, now));
    }
    let _ = write!(out, "{} activities", page.total);
    out
}

fn activity_line(activity: &UserActivity, now: DateTime<Utc>) -> String {
    format!("{:<8} {}", activity.kind, poll_line(&activity.to_poll_card(), now))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use qv_02_voting_session::GateInput;
    use shared_types::{
        ActivityKind, Author, OptionId, PollId, PollOption, PollSchedule, UserProfile, VoteAction,
        WeightDistribution,
    };
    use std::collections::BTreeMap;

    fn options() -> Vec<PollOption> {
        vec![PollOption::from_label("A"), PollOption::from_label("B")]
    }

    #[test]
    fn test_allocation_shows_weights_and_budget() {
        let allocation = Allocation::seed(&options(), None).set_percentage(0, 60);
        let text = super::allocation(&allocation);

        assert!(text.contains(" 60%  weight   7.75"));
        assert!(text.ends_with("total 60% (40% left)"));
    }

    #[test]
    fn test_over_budget_marks_locked_rows() {
        let labels = [
            PollOption::from_label("A"),
            PollOption::from_label("B"),
            PollOption::from_label("C"),
        ];
        let over = Allocation::seed(&labels, None)
            .set_percentage(0, 80)
            .set_percentage(1, 30);

        let text = super::allocation(&over);
        assert_eq!(text.matches("(locked)").count(), 1);
        assert!(text.ends_with("total 110% (10% over budget)"));

        let fixed = over.set_percentage(1, 20);
        assert!(!super::allocation(&fixed).contains("locked"));
    }

    #[test]
    fn test_gate_text() {
        let empty = Allocation::seed(&options(), None);
        let blocked = SubmitGate::evaluate(GateInput {
            allocation: Some(&empty),
            prior: None,
            is_loading: false,
            poll_active: true,
        });
        assert!(gate(&blocked).starts_with("cannot submit: nothing allocated"));

        let ready = empty.set_percentage(1, 10);
        let open = SubmitGate::evaluate(GateInput {
            allocation: Some(&ready),
            prior: None,
            is_loading: false,
            poll_active: true,
        });
        assert_eq!(gate(&open), "ready to create vote");
    }

    #[test]
    fn test_receipt_text() {
        let receipt = SubmitReceipt {
            poll_id: PollId(7),
            action: VoteAction::Update,
            vote_id: Some(shared_types::VoteId::new("v1")),
            weight_distribution: WeightDistribution::new(),
            submitted_at: Utc::now(),
        };
        assert_eq!(super::receipt(&receipt), "vote updated for poll #7 (vote v1)");
    }

    #[test]
    fn test_results_bars() {
        let totals: BTreeMap<OptionId, f64> = [(OptionId::new("A"), 3.0)].into_iter().collect();
        let results = PollResults::from_totals(&options(), &totals, 3.0);
        let text = super::results(&results);

        assert!(text.contains(&"█".repeat(20)));
        assert!(text.ends_with("total 3.00 votes"));
    }

    #[test]
    fn test_poll_line_status() {
        let now = Utc::now();
        let poll = PollDetails {
            poll_id: PollId(3),
            title: "A rather long poll question that will not fit the column".into(),
            description: String::new(),
            options: options(),
            tags: vec![],
            schedule: PollSchedule::new(now - Duration::days(2), now - Duration::hours(3)),
            author: None,
            participant_count: 12,
            is_anonymous: false,
            created_at: None,
            has_voted: Some(true),
        };
        let line = poll_line(&poll, now);

        assert!(line.contains("ended"));
        assert!(line.contains("3h 0m ago"));
        assert!(line.contains('…'));
        assert!(line.ends_with("12 voters ✓"));
    }

    fn activity(id: u64, kind: ActivityKind, now: DateTime<Utc>) -> UserActivity {
        UserActivity {
            id: format!("act-{id}"),
            kind,
            poll_id: PollId(id),
            poll_title: format!("Poll {id}"),
            poll_description: String::new(),
            created_at: now - Duration::days(1),
            end_date: now + Duration::days(1),
            voters_participated: 4,
            author: Author {
                name: "ana".into(),
                world_id: None,
                profile_picture: None,
            },
        }
    }

    fn overview(now: DateTime<Utc>) -> ProfileOverview {
        ProfileOverview {
            profile: UserProfile {
                world_id: "0xana".into(),
                name: Some("ana".into()),
                profile_picture: None,
                polls_created: 3,
                polls_participated: 5,
            },
            recent: vec![
                activity(1, ActivityKind::Voted, now),
                activity(2, ActivityKind::Created, now),
            ],
            total_activities: 6,
            is_own_profile: false,
            activities_error: None,
        }
    }

    #[test]
    fn test_profile_lists_recent_and_points_to_the_rest() {
        let now = Utc::now();
        let text = profile(&overview(now), now);

        assert!(text.starts_with("@ana (0xana)\n3 polls created · 5 polls participated"));
        assert!(text.contains("voted    #1"));
        assert!(text.contains("created  #2"));
        assert!(text.ends_with("view all 6 with `qv activities --user 0xana`"));
    }

    #[test]
    fn test_profile_keeps_header_when_activities_fail() {
        let now = Utc::now();
        let mut broken = overview(now);
        broken.recent.clear();
        broken.total_activities = 0;
        broken.activities_error = Some("backend returned 502".into());

        let text = profile(&broken, now);
        assert!(text.starts_with("@ana"));
        assert!(text.ends_with("recent activity unavailable: backend returned 502"));
    }

    #[test]
    fn test_activities_footer_counts_total() {
        let now = Utc::now();
        let page = ActivityPage::new(vec![activity(9, ActivityKind::Voted, now)], Some(12));
        let text = activities(&page, now);

        assert!(text.contains("#9"));
        assert!(text.contains("live"));
        assert!(text.ends_with("12 activities"));
    }
}
