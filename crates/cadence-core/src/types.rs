use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CadenceError;

/// Aggregated commit statistics for one analysis window.
///
/// Missing keys and explicit `null` values deserialize to their zero-value
/// defaults, so the analyzer always works on a fully-populated record.
///
/// # Examples
///
/// ```
/// use cadence_core::{CommitStats, MessagePattern};
///
/// let stats = CommitStats::from_json(r#"{"totalCommits": 4, "activeDays": null}"#).unwrap();
/// assert_eq!(stats.total_commits, 4);
/// assert_eq!(stats.active_days, 0);
/// assert_eq!(stats.commit_message_pattern, MessagePattern::Varied);
/// assert!(!stats.ai_generated);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStats {
    /// Total commits observed in the window.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_commits: u32,
    /// Distinct calendar days with at least one commit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub active_days: u32,
    /// Commit count of the single busiest day.
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_commits_in_a_day: u32,
    /// Classification of the commit messages in the window.
    #[serde(default, deserialize_with = "null_as_default")]
    pub commit_message_pattern: MessagePattern,
    /// One entry per active day, ordered by date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: Vec<TimelineEntry>,
    /// Whether the commit messages were synthetically produced.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_generated: bool,
}

impl CommitStats {
    /// Parse a stats record from JSON, substituting defaults for absent fields.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Serialization`] if the input is not a JSON
    /// object of the expected shape.
    pub fn from_json(content: &str) -> Result<Self, CadenceError> {
        Ok(serde_json::from_str(content)?)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Commit count for a single calendar day.
///
/// # Examples
///
/// ```
/// use cadence_core::TimelineEntry;
///
/// let entry: TimelineEntry = serde_json::from_str(r#"{"date":"2024-01-10","commits":15}"#).unwrap();
/// assert_eq!(entry.date.to_string(), "2024-01-10");
/// assert_eq!(entry.commits, 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Calendar day (ISO 8601).
    pub date: NaiveDate,
    /// Commits made on that day.
    #[serde(default)]
    pub commits: u32,
}

/// Classification label for a window's commit messages.
///
/// Three labels carry meaning for scoring; any other label is kept verbatim
/// in [`MessagePattern::Other`].
///
/// # Examples
///
/// ```
/// use cadence_core::MessagePattern;
///
/// let p: MessagePattern = "professional conventional commits".into();
/// assert_eq!(p, MessagePattern::Conventional);
/// assert_eq!(MessagePattern::ShortGeneric.as_str(), "mostly short generic messages");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessagePattern {
    /// Mostly terse, uninformative messages ("update", "wip", ...).
    ShortGeneric,
    /// A mix of message styles.
    #[default]
    Varied,
    /// Consistent `type(scope): description` messages.
    Conventional,
    /// Any other label supplied by an upstream classifier.
    Other(String),
}

impl MessagePattern {
    /// The label string for this pattern.
    pub fn as_str(&self) -> &str {
        match self {
            MessagePattern::ShortGeneric => "mostly short generic messages",
            MessagePattern::Varied => "varied messages",
            MessagePattern::Conventional => "professional conventional commits",
            MessagePattern::Other(label) => label,
        }
    }
}

impl From<String> for MessagePattern {
    fn from(label: String) -> Self {
        match label.as_str() {
            "mostly short generic messages" => MessagePattern::ShortGeneric,
            "varied messages" => MessagePattern::Varied,
            "professional conventional commits" => MessagePattern::Conventional,
            _ => MessagePattern::Other(label),
        }
    }
}

impl From<&str> for MessagePattern {
    fn from(label: &str) -> Self {
        MessagePattern::from(label.to_string())
    }
}

impl From<MessagePattern> for String {
    fn from(pattern: MessagePattern) -> Self {
        match pattern {
            MessagePattern::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score, flags and summary produced for one [`CommitStats`] record.
///
/// # Examples
///
/// ```
/// use cadence_core::AnalysisResult;
///
/// let result = AnalysisResult {
///     confidence_score: 90,
///     flags: vec![],
///     ai_summary: "Steady activity.".into(),
///     timeline: vec![],
/// };
/// let json = serde_json::to_value(&result).unwrap();
/// assert_eq!(json["confidenceScore"], 90);
/// assert_eq!(json["aiSummary"], "Steady activity.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Heuristic confidence (0–100) that the activity is genuine and steady.
    pub confidence_score: u8,
    /// Detected anomalies, in detection order.
    pub flags: Vec<String>,
    /// Short natural-language assessment. Never empty.
    pub ai_summary: String,
    /// The input timeline, unchanged.
    pub timeline: Vec<TimelineEntry>,
}

/// Output format for CLI results.
///
/// # Examples
///
/// ```
/// use cadence_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
