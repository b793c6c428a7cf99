//! Commit-activity analysis: heuristic scoring, anomaly flags, and an
//! optional natural-language summary.
//!
//! [`CommitStatsAnalyzer`] is the entry point. The summary comes from a
//! [`TextSummarizer`](summarizer::TextSummarizer) chosen by the caller;
//! [`LlmSummarizer`](summarizer::LlmSummarizer) talks to any
//! OpenAI-compatible chat completions endpoint.

pub mod analyzer;
pub mod llm;
pub mod prompt;
pub mod summarizer;

pub use analyzer::{compute_score, detect_flags, CommitStatsAnalyzer, DerivedMetrics};
pub use summarizer::{LlmSummarizer, StatsSummaryPayload, TextSummarizer};
