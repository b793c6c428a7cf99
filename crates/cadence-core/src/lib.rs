//! Core types, configuration, and error handling for Cadence.
//!
//! This crate provides the shared foundation used by the other Cadence crates:
//! - [`CadenceError`]: unified error type using `thiserror`
//! - [`CadenceConfig`]: configuration loaded from `.cadence.toml`
//! - Shared types: [`CommitStats`], [`TimelineEntry`], [`MessagePattern`],
//!   [`AnalysisResult`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{CadenceConfig, HistoryConfig, LlmConfig, SummaryConfig};
pub use error::CadenceError;
pub use types::{AnalysisResult, CommitStats, MessagePattern, OutputFormat, TimelineEntry};
