//! Git history extraction via git2.
//!
//! Walks commit history from a repository and records author, timestamp
//! and subject line for every commit inside the mining window.

use std::path::Path;

use cadence_core::{CadenceError, HistoryConfig};
use git2::{Repository, Sort};

/// Raw commit data extracted from git history.
///
/// # Examples
///
/// ```
/// use cadence_gitpulse::mining::CommitRecord;
///
/// let record = CommitRecord {
///     hash: "abc12345".into(),
///     author: "alice".into(),
///     timestamp: 1700000000,
///     message: "fix: auth bug".into(),
/// };
/// assert_eq!(record.author, "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Short commit hash.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Unix timestamp of the commit.
    pub timestamp: i64,
    /// First line of commit message.
    pub message: String,
}

/// Options for history mining.
///
/// # Examples
///
/// ```
/// use cadence_gitpulse::mining::MiningOptions;
///
/// let opts = MiningOptions::default();
/// assert_eq!(opts.since_days, 365);
/// assert!(opts.skip_merges);
/// ```
#[derive(Debug, Clone)]
pub struct MiningOptions {
    /// Only include commits from the last N days (default: 365).
    pub since_days: u64,
    /// Branch to walk (default: HEAD).
    pub branch: Option<String>,
    /// Ignore commits with more than one parent (default: true).
    pub skip_merges: bool,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self::from(&HistoryConfig::default())
    }
}

impl From<&HistoryConfig> for MiningOptions {
    fn from(config: &HistoryConfig) -> Self {
        Self {
            since_days: config.since_days,
            branch: config.branch.clone(),
            skip_merges: config.skip_merges,
        }
    }
}

/// Mine commit history from a git repository.
///
/// Returns commits in reverse chronological order (newest first), stopping
/// at the first commit older than `since_days`.
///
/// # Errors
///
/// Returns [`CadenceError::Git`] if the repository cannot be opened or walked.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use cadence_gitpulse::mining::{mine_history, MiningOptions};
///
/// let commits = mine_history(Path::new("."), &MiningOptions::default()).unwrap();
/// for c in &commits {
///     println!("{}: {} ({})", c.hash, c.message, c.author);
/// }
/// ```
pub fn mine_history(
    repo_path: &Path,
    options: &MiningOptions,
) -> Result<Vec<CommitRecord>, CadenceError> {
    let repo = Repository::discover(repo_path)
        .map_err(|e| CadenceError::Git(format!("failed to open repository: {e}")))?;

    let mut revwalk = repo
        .revwalk()
        .map_err(|e| CadenceError::Git(format!("failed to create revwalk: {e}")))?;

    revwalk.set_sorting(Sort::TIME).ok();

    if let Some(ref branch) = options.branch {
        let reference = repo
            .resolve_reference_from_short_name(branch)
            .map_err(|e| CadenceError::Git(format!("failed to resolve branch '{branch}': {e}")))?;
        let oid = reference
            .target()
            .ok_or_else(|| CadenceError::Git("branch has no target".into()))?;
        revwalk
            .push(oid)
            .map_err(|e| CadenceError::Git(format!("failed to push oid: {e}")))?;
    } else {
        revwalk
            .push_head()
            .map_err(|e| CadenceError::Git(format!("failed to push HEAD: {e}")))?;
    }

    let cutoff = compute_cutoff(options.since_days);
    let mut commits = Vec::new();
    let mut merges_skipped = 0usize;

    for oid_result in revwalk {
        let oid = oid_result.map_err(|e| CadenceError::Git(format!("revwalk error: {e}")))?;

        let commit = repo
            .find_commit(oid)
            .map_err(|e| CadenceError::Git(format!("failed to find commit: {e}")))?;

        let timestamp = commit.time().seconds();
        if timestamp < cutoff {
            break;
        }

        if options.skip_merges && commit.parent_count() > 1 {
            merges_skipped += 1;
            continue;
        }

        let hash = oid.to_string();
        commits.push(CommitRecord {
            hash: hash[..hash.len().min(8)].to_string(),
            author: commit.author().name().unwrap_or("unknown").to_string(),
            timestamp,
            message: commit
                .message()
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string(),
        });
    }

    tracing::debug!(
        commits = commits.len(),
        merges_skipped,
        since_days = options.since_days,
        "mined git history"
    );

    Ok(commits)
}

fn compute_cutoff(since_days: u64) -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    let days = i64::try_from(since_days).unwrap_or(i64::MAX);
    now.saturating_sub(days.saturating_mul(86400))
}
