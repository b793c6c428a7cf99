use std::path::Path;

use cadence_core::MessagePattern;
use cadence_gitpulse::aggregate::aggregate;
use cadence_gitpulse::mining::{mine_history, MiningOptions};
use git2::{Oid, Repository, Signature, Time};

const DAY: i64 = 86_400;

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Commit an empty tree at `timestamp` on top of `parents`.
fn commit_at(repo: &Repository, timestamp: i64, message: &str, parents: &[Oid]) -> Oid {
    let sig = Signature::new("Test Author", "test@example.com", &Time::new(timestamp, 0)).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent_commits: Vec<_> = parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
    let parent_refs: Vec<_> = parent_commits.iter().collect();
    repo.commit(None, &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

fn point_head(repo: &Repository, oid: Oid) {
    repo.reference("refs/heads/main", oid, true, "test").unwrap();
    repo.set_head("refs/heads/main").unwrap();
}

fn init_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap()
}

#[test]
fn mines_commits_newest_first_with_subject_lines() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let t = now() - 10 * DAY;

    let a = commit_at(&repo, t, "feat: scaffold project\n\nlong body", &[]);
    let b = commit_at(&repo, t + DAY, "fix: handle empty input", &[a]);
    let c = commit_at(&repo, t + 2 * DAY, "docs: describe usage", &[b]);
    point_head(&repo, c);

    let commits = mine_history(dir.path(), &MiningOptions::default()).unwrap();
    assert_eq!(commits.len(), 3);
    assert_eq!(commits[0].message, "docs: describe usage");
    assert_eq!(commits[2].message, "feat: scaffold project");
    assert_eq!(commits[0].author, "Test Author");
    assert_eq!(commits[0].hash.len(), 8);
}

#[test]
fn window_excludes_old_commits() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let old = commit_at(&repo, now() - 400 * DAY, "feat: ancient history", &[]);
    let recent = commit_at(&repo, now() - DAY, "feat: recent work", &[old]);
    point_head(&repo, recent);

    let opts = MiningOptions {
        since_days: 30,
        ..MiningOptions::default()
    };
    let commits = mine_history(dir.path(), &opts).unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "feat: recent work");
}

#[test]
fn merge_commits_are_skipped_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let t = now() - 5 * DAY;
    let root = commit_at(&repo, t, "feat: root", &[]);
    let left = commit_at(&repo, t + 60, "feat: left", &[root]);
    let right = commit_at(&repo, t + 120, "feat: right", &[root]);
    let merge = commit_at(&repo, t + 180, "Merge branch 'right'", &[left, right]);
    point_head(&repo, merge);

    let commits = mine_history(dir.path(), &MiningOptions::default()).unwrap();
    assert_eq!(commits.len(), 3);
    assert!(commits.iter().all(|c| !c.message.starts_with("Merge")));

    let with_merges = MiningOptions {
        skip_merges: false,
        ..MiningOptions::default()
    };
    let commits = mine_history(dir.path(), &with_merges).unwrap();
    assert_eq!(commits.len(), 4);
}

#[test]
fn named_branch_is_walked() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let t = now() - 3 * DAY;
    let a = commit_at(&repo, t, "feat: base", &[]);
    point_head(&repo, a);
    let b = commit_at(&repo, t + 60, "feat: topic work", &[a]);
    repo.reference("refs/heads/topic", b, true, "test").unwrap();

    let opts = MiningOptions {
        branch: Some("topic".into()),
        ..MiningOptions::default()
    };
    let commits = mine_history(dir.path(), &opts).unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].message, "feat: topic work");
}

#[test]
fn mined_history_aggregates_into_consistent_stats() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let t = now() - 20 * DAY;

    let mut parent = commit_at(&repo, t, "update", &[]);
    for i in 1..6 {
        parent = commit_at(&repo, t + 5 * DAY + i * 60, "wip", &[parent]);
    }
    point_head(&repo, parent);

    let commits = mine_history(dir.path(), &MiningOptions::default()).unwrap();
    let stats = aggregate(&commits, false);

    assert_eq!(stats.total_commits, 6);
    assert!(stats.active_days >= 2);
    assert!(stats.max_commits_in_a_day <= stats.total_commits);
    assert_eq!(stats.active_days as usize, stats.timeline.len());
    let sum: u32 = stats.timeline.iter().map(|e| e.commits).sum();
    assert_eq!(sum, 6);
    assert!(stats.timeline.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(stats.commit_message_pattern, MessagePattern::ShortGeneric);
}
