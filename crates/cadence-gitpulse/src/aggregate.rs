//! Per-day aggregation of mined commits into [`CommitStats`].

use std::collections::BTreeMap;

use cadence_core::{CommitStats, TimelineEntry};
use chrono::{DateTime, NaiveDate};

use crate::classify::classify_messages;
use crate::mining::CommitRecord;

/// Bucket commits by UTC calendar day and build the analyzer's input record.
///
/// The timeline is sorted by date and only contains active days, so
/// `activeDays == timeline.len()`, the timeline counts sum to
/// `totalCommits`, and `maxCommitsInADay <= totalCommits`. Commits whose
/// timestamp cannot be represented as a date are dropped.
///
/// # Examples
///
/// ```
/// use cadence_gitpulse::aggregate::aggregate;
/// use cadence_gitpulse::mining::CommitRecord;
///
/// let commit = |ts: i64, msg: &str| CommitRecord {
///     hash: "0000000".into(),
///     author: "alice".into(),
///     timestamp: ts,
///     message: msg.into(),
/// };
/// let commits = vec![
///     commit(1_704_067_200, "feat: init"),         // 2024-01-01
///     commit(1_704_070_800, "fix: typo in docs"),  // 2024-01-01
///     commit(1_704_844_800, "docs: usage"),        // 2024-01-10
/// ];
/// let stats = aggregate(&commits, false);
/// assert_eq!(stats.total_commits, 3);
/// assert_eq!(stats.active_days, 2);
/// assert_eq!(stats.max_commits_in_a_day, 2);
/// ```
pub fn aggregate(commits: &[CommitRecord], ai_generated: bool) -> CommitStats {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let mut messages = Vec::with_capacity(commits.len());

    for commit in commits {
        let Some(date) = DateTime::from_timestamp(commit.timestamp, 0).map(|dt| dt.date_naive())
        else {
            tracing::debug!(hash = %commit.hash, timestamp = commit.timestamp, "skipping commit with out-of-range timestamp");
            continue;
        };
        *per_day.entry(date).or_default() += 1;
        messages.push(commit.message.as_str());
    }

    let timeline: Vec<TimelineEntry> = per_day
        .into_iter()
        .map(|(date, commits)| TimelineEntry { date, commits })
        .collect();

    CommitStats {
        total_commits: timeline.iter().map(|e| e.commits).sum(),
        active_days: timeline.len() as u32,
        max_commits_in_a_day: timeline.iter().map(|e| e.commits).max().unwrap_or(0),
        commit_message_pattern: classify_messages(&messages),
        timeline,
        ai_generated,
    }
}

#[cfg(test)]
mod tests {
    use cadence_core::MessagePattern;

    use super::*;

    const DAY: i64 = 86_400;
    // 2024-01-01T00:00:00Z
    const BASE: i64 = 1_704_067_200;

    fn commit(timestamp: i64, message: &str) -> CommitRecord {
        CommitRecord {
            hash: format!("{timestamp:08x}"),
            author: "alice".into(),
            timestamp,
            message: message.into(),
        }
    }

    #[test]
    fn empty_history_gives_zero_stats() {
        let stats = aggregate(&[], false);
        assert_eq!(stats.total_commits, 0);
        assert_eq!(stats.active_days, 0);
        assert_eq!(stats.max_commits_in_a_day, 0);
        assert!(stats.timeline.is_empty());
        assert_eq!(stats.commit_message_pattern, MessagePattern::Varied);
    }

    #[test]
    fn timeline_is_sorted_and_sums_to_total() {
        // Newest first, the order mine_history returns.
        let commits = vec![
            commit(BASE + 9 * DAY + 60, "update"),
            commit(BASE + 9 * DAY, "wip"),
            commit(BASE + 3 * DAY, "fix"),
            commit(BASE + 10, "initial commit"),
        ];
        let stats = aggregate(&commits, false);

        let dates: Vec<String> = stats.timeline.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-04", "2024-01-10"]);
        assert_eq!(stats.total_commits, 4);
        assert_eq!(stats.active_days, 3);
        assert_eq!(stats.max_commits_in_a_day, 2);
        let sum: u32 = stats.timeline.iter().map(|e| e.commits).sum();
        assert_eq!(sum, stats.total_commits);
        assert_eq!(stats.commit_message_pattern, MessagePattern::ShortGeneric);
    }

    #[test]
    fn days_split_on_utc_midnight() {
        let commits = vec![commit(BASE - 1, "feat: late"), commit(BASE, "feat: early")];
        let stats = aggregate(&commits, false);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.timeline[0].date.to_string(), "2023-12-31");
    }

    #[test]
    fn ai_generated_flag_is_carried() {
        let stats = aggregate(&[commit(BASE, "feat: add cli")], true);
        assert!(stats.ai_generated);
        assert_eq!(stats.commit_message_pattern, MessagePattern::Conventional);
    }

    #[test]
    fn out_of_range_timestamps_are_dropped() {
        let stats = aggregate(&[commit(i64::MAX, "feat: x"), commit(BASE, "feat: y")], false);
        assert_eq!(stats.total_commits, 1);
        assert_eq!(stats.active_days, 1);
    }
}
