//! Git history aggregation for commit-activity analysis.
//!
//! Mines commit history using git2, classifies the style of the commit
//! messages, and buckets commits per calendar day into the
//! [`CommitStats`](cadence_core::CommitStats) record the analyzer consumes.

pub mod aggregate;
pub mod classify;
pub mod mining;
