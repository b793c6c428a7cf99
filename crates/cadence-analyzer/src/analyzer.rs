//! Heuristic scoring of commit activity.
//!
//! A [`CommitStats`] record is turned into a 0–100 confidence score that the
//! history reflects steady, hand-written development, plus a list of flags
//! naming the patterns that lowered it. Scoring and flags are deterministic;
//! only the prose summary depends on the configured [`TextSummarizer`].

use std::sync::Arc;
use std::time::Duration;

use cadence_core::{AnalysisResult, CadenceConfig, CadenceError, CommitStats, MessagePattern};

use crate::summarizer::{LlmSummarizer, StatsSummaryPayload, TextSummarizer};

pub const FLAG_NO_ACTIVITY: &str = "No commit activity detected";
pub const FLAG_SINGLE_DAY_SPIKE: &str = "Unusually high activity on a single day";
pub const FLAG_CONCENTRATED: &str = "Most commits concentrated in very few days";
pub const FLAG_LOW_QUALITY_MESSAGES: &str = "Low-quality commit messages";

pub const NO_ACTIVITY_SUMMARY: &str =
    "No commit history was found for this project, so development activity could not be evaluated.";
pub const FALLBACK_SUMMARY: &str = "Analysis completed with heuristic scoring.";

const SPIKE_DAY_COMMITS: u32 = 15;
const SPIKE_RATIO_THRESHOLD: f64 = 0.5;
const SPIKE_PENALTY_WEIGHT: f64 = 40.0;
const CONCENTRATED_MAX_DAYS: u32 = 2;
const CONCENTRATED_MIN_COMMITS: u32 = 10;
const FEW_DAYS: u32 = 2;
const FEW_DAYS_PENALTY: f64 = 20.0;
const SOME_DAYS: u32 = 5;
const SOME_DAYS_PENALTY: f64 = 10.0;
const GENERIC_MESSAGES_PENALTY: f64 = 15.0;
const MIN_COMMITS: u32 = 3;
const FEW_COMMITS_PENALTY: f64 = 20.0;
const CONVENTIONAL_BONUS: f64 = 10.0;

/// Metrics derived once from a stats record and shared by the heuristics.
///
/// # Examples
///
/// ```
/// use cadence_core::CommitStats;
/// use cadence_analyzer::DerivedMetrics;
///
/// let stats = CommitStats { total_commits: 16, active_days: 2, max_commits_in_a_day: 15, ..Default::default() };
/// let m = DerivedMetrics::from_stats(&stats);
/// assert_eq!(m.avg_commits_per_day, 8.0);
/// assert_eq!(m.spike_ratio, 0.9375);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    /// Commits per active day; the raw total when there are no active days.
    pub avg_commits_per_day: f64,
    /// Share of all commits made on the busiest day.
    pub spike_ratio: f64,
}

impl DerivedMetrics {
    pub fn from_stats(stats: &CommitStats) -> Self {
        let total = f64::from(stats.total_commits);
        let avg_commits_per_day = if stats.active_days > 0 {
            total / f64::from(stats.active_days)
        } else {
            total
        };
        let spike_ratio = if stats.total_commits > 0 {
            f64::from(stats.max_commits_in_a_day) / total
        } else {
            0.0
        };
        Self {
            avg_commits_per_day,
            spike_ratio,
        }
    }
}

/// Synthetic messages in conventional style are scored as a bonus and
/// exempt from the message-quality flag. Generic synthetic messages get no
/// matching treatment.
fn is_synthetic_conventional(stats: &CommitStats) -> bool {
    stats.ai_generated && stats.commit_message_pattern == MessagePattern::Conventional
}

/// Flags for the patterns present in `stats`, in detection order.
///
/// # Examples
///
/// ```
/// use cadence_core::{CommitStats, MessagePattern};
/// use cadence_analyzer::detect_flags;
///
/// let stats = CommitStats {
///     total_commits: 12,
///     active_days: 1,
///     max_commits_in_a_day: 12,
///     commit_message_pattern: MessagePattern::ShortGeneric,
///     ..Default::default()
/// };
/// assert_eq!(
///     detect_flags(&stats),
///     vec![
///         "Unusually high activity on a single day",
///         "Most commits concentrated in very few days",
///         "Low-quality commit messages",
///     ]
/// );
/// ```
pub fn detect_flags(stats: &CommitStats) -> Vec<String> {
    if stats.total_commits == 0 {
        return vec![FLAG_NO_ACTIVITY.to_string()];
    }

    let metrics = DerivedMetrics::from_stats(stats);
    let mut flags = Vec::new();

    if stats.max_commits_in_a_day >= SPIKE_DAY_COMMITS
        || metrics.spike_ratio > SPIKE_RATIO_THRESHOLD
    {
        flags.push(FLAG_SINGLE_DAY_SPIKE.to_string());
    }
    if stats.active_days <= CONCENTRATED_MAX_DAYS && stats.total_commits > CONCENTRATED_MIN_COMMITS
    {
        flags.push(FLAG_CONCENTRATED.to_string());
    }
    if stats.commit_message_pattern == MessagePattern::ShortGeneric {
        flags.push(FLAG_LOW_QUALITY_MESSAGES.to_string());
    }

    if is_synthetic_conventional(stats) {
        flags.retain(|f| f != FLAG_LOW_QUALITY_MESSAGES);
    }

    flags
}

/// Confidence score in `0..=100`; zero when there is no activity at all.
///
/// # Examples
///
/// ```
/// use cadence_core::CommitStats;
/// use cadence_analyzer::compute_score;
///
/// let stats = CommitStats { total_commits: 12, active_days: 4, ..Default::default() };
/// assert_eq!(compute_score(&stats), 90);
/// ```
pub fn compute_score(stats: &CommitStats) -> u8 {
    if stats.total_commits == 0 {
        return 0;
    }

    let metrics = DerivedMetrics::from_stats(stats);
    let mut score = 100.0;

    score -= (metrics.spike_ratio * SPIKE_PENALTY_WEIGHT).round();

    if stats.active_days <= FEW_DAYS {
        score -= FEW_DAYS_PENALTY;
    } else if stats.active_days <= SOME_DAYS {
        score -= SOME_DAYS_PENALTY;
    }

    if stats.commit_message_pattern == MessagePattern::ShortGeneric {
        score -= GENERIC_MESSAGES_PENALTY;
    }
    if stats.total_commits < MIN_COMMITS {
        score -= FEW_COMMITS_PENALTY;
    }
    if is_synthetic_conventional(stats) {
        score += CONVENTIONAL_BONUS;
    }

    score.round().clamp(0.0, 100.0) as u8
}

/// Scores commit activity and attaches a prose summary.
///
/// The analyzer holds no per-call state and can be shared across tasks.
///
/// # Examples
///
/// ```
/// use cadence_core::CommitStats;
/// use cadence_analyzer::CommitStatsAnalyzer;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let analyzer = CommitStatsAnalyzer::without_summarizer();
/// let result = rt.block_on(analyzer.analyze(&CommitStats::default()));
/// assert_eq!(result.confidence_score, 0);
/// assert_eq!(result.flags, vec!["No commit activity detected"]);
/// ```
#[derive(Clone)]
pub struct CommitStatsAnalyzer {
    summarizer: Option<Arc<dyn TextSummarizer>>,
    summary_timeout: Duration,
}

impl CommitStatsAnalyzer {
    /// Analyzer that asks `summarizer` for prose, giving up after `summary_timeout`.
    pub fn new(summarizer: Arc<dyn TextSummarizer>, summary_timeout: Duration) -> Self {
        Self {
            summarizer: Some(summarizer),
            summary_timeout,
        }
    }

    /// Analyzer that always uses the fixed fallback summary.
    pub fn without_summarizer() -> Self {
        Self {
            summarizer: None,
            summary_timeout: Duration::ZERO,
        }
    }

    /// Compose an analyzer from configuration.
    ///
    /// With `summary.enabled` the analyzer uses an [`LlmSummarizer`] for the
    /// configured provider; otherwise no summarizer is attached.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Llm`] if the HTTP client cannot be built.
    pub fn from_config(config: &CadenceConfig) -> Result<Self, CadenceError> {
        if !config.summary.enabled {
            return Ok(Self::without_summarizer());
        }
        if config.summary.timeout_secs == 0 {
            tracing::debug!("summary timeout is 0s, summarizer disabled");
            return Ok(Self::without_summarizer());
        }
        let timeout = Duration::from_secs(config.summary.timeout_secs);
        let summarizer = LlmSummarizer::from_config(&config.llm, timeout)?;
        Ok(Self::new(Arc::new(summarizer), timeout))
    }

    /// Whether a summarizer is attached.
    pub fn has_summarizer(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Score `stats`, detect flags, and attach a summary.
    ///
    /// Never fails: summarizer problems are logged and replaced by
    /// [`FALLBACK_SUMMARY`].
    pub async fn analyze(&self, stats: &CommitStats) -> AnalysisResult {
        if stats.total_commits == 0 {
            return AnalysisResult {
                confidence_score: 0,
                flags: vec![FLAG_NO_ACTIVITY.to_string()],
                ai_summary: NO_ACTIVITY_SUMMARY.to_string(),
                timeline: stats.timeline.clone(),
            };
        }

        let metrics = DerivedMetrics::from_stats(stats);
        let flags = detect_flags(stats);
        let confidence_score = compute_score(stats);

        let payload = StatsSummaryPayload {
            total_commits: stats.total_commits,
            active_days: stats.active_days,
            max_commits_in_a_day: stats.max_commits_in_a_day,
            avg_commits_per_day: metrics.avg_commits_per_day,
            commit_message_pattern: stats.commit_message_pattern.clone(),
            flags: flags.clone(),
        };
        let ai_summary = self.summarize(&payload).await;

        AnalysisResult {
            confidence_score,
            flags,
            ai_summary,
            timeline: stats.timeline.clone(),
        }
    }

    async fn summarize(&self, payload: &StatsSummaryPayload) -> String {
        let Some(summarizer) = &self.summarizer else {
            tracing::debug!("summarizer disabled, using fallback summary");
            return FALLBACK_SUMMARY.to_string();
        };

        let outcome =
            match tokio::time::timeout(self.summary_timeout, summarizer.summarize(payload)).await {
                Ok(result) => result,
                Err(_) => Err(CadenceError::Timeout(self.summary_timeout.as_secs())),
            };

        match outcome {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("summarizer returned empty text, using fallback summary");
                FALLBACK_SUMMARY.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "summarizer failed, using fallback summary");
                FALLBACK_SUMMARY.to_string()
            }
        }
    }
}
