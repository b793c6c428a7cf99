//! Natural-language summaries of analysis results.

use std::time::Duration;

use async_trait::async_trait;
use cadence_core::{CadenceError, LlmConfig, MessagePattern};
use serde::Serialize;

use crate::llm::{ChatMessage, LlmClient, Role};
use crate::prompt;

/// Statistics and flags handed to a [`TextSummarizer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummaryPayload {
    pub total_commits: u32,
    pub active_days: u32,
    pub max_commits_in_a_day: u32,
    pub avg_commits_per_day: f64,
    pub commit_message_pattern: MessagePattern,
    pub flags: Vec<String>,
}

/// Turns analysis statistics into a short prose assessment.
///
/// Implemented by [`LlmSummarizer`] and by test doubles. Callers treat any
/// error as "no summary available".
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    async fn summarize(&self, payload: &StatsSummaryPayload) -> Result<String, CadenceError>;
}

/// [`TextSummarizer`] backed by an OpenAI-compatible chat endpoint.
pub struct LlmSummarizer {
    client: LlmClient,
}

impl LlmSummarizer {
    const TEMPERATURE: f32 = 0.3;

    /// Wrap an existing client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Build a client from configuration with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Llm`] if the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig, timeout: Duration) -> Result<Self, CadenceError> {
        Ok(Self::new(LlmClient::new(config, timeout)?))
    }
}

#[async_trait]
impl TextSummarizer for LlmSummarizer {
    async fn summarize(&self, payload: &StatsSummaryPayload) -> Result<String, CadenceError> {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: prompt::build_system_prompt(),
            },
            ChatMessage {
                role: Role::User,
                content: prompt::build_summary_prompt(payload)?,
            },
        ];

        let response = self.client.chat(messages, Self::TEMPERATURE).await?;
        prompt::clean_summary(&response).ok_or_else(|| {
            CadenceError::Llm(format!("empty summary from model '{}'", self.client.model()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_camel_case() {
        let payload = StatsSummaryPayload {
            total_commits: 12,
            active_days: 4,
            max_commits_in_a_day: 5,
            avg_commits_per_day: 3.0,
            commit_message_pattern: MessagePattern::Varied,
            flags: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["totalCommits"], 12);
        assert_eq!(json["maxCommitsInADay"], 5);
        assert_eq!(json["avgCommitsPerDay"], 3.0);
        assert_eq!(json["commitMessagePattern"], "varied messages");
        assert!(json["flags"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let config = LlmConfig {
            provider: "ollama".into(),
            base_url: Some("http://127.0.0.1:9".into()),
            ..LlmConfig::default()
        };
        let summarizer = LlmSummarizer::from_config(&config, Duration::from_secs(2)).unwrap();
        let payload = StatsSummaryPayload {
            total_commits: 1,
            active_days: 1,
            max_commits_in_a_day: 1,
            avg_commits_per_day: 1.0,
            commit_message_pattern: MessagePattern::Varied,
            flags: vec![],
        };
        assert!(summarizer.summarize(&payload).await.is_err());
    }
}
