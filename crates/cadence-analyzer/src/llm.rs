use std::time::Duration;

use cadence_core::{CadenceError, LlmConfig};
use serde::Serialize;

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use cadence_analyzer::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Summarize these statistics".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use cadence_analyzer::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes an OpenAI-compatible
/// `chat/completions` endpoint. Hosted providers are reached at their own
/// endpoint with their own key; see [`LlmConfig::chat_completions_url`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cadence_core::LlmConfig;
/// use cadence_analyzer::llm::LlmClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = LlmClient::new(&config, Duration::from_secs(8)).unwrap();
/// assert_eq!(client.model(), "gpt-4o-mini");
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl LlmClient {
    /// Create a new LLM client whose requests give up after `timeout`.
    ///
    /// The API key is resolved once, from the config or the provider's
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig, timeout: Duration) -> Result<Self, CadenceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CadenceError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
            api_key: config.resolve_api_key(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> Result<String, CadenceError> {
        self.config.chat_completions_url().ok_or_else(|| {
            CadenceError::Config(format!(
                "provider '{}' has no default endpoint (set llm.base_url)",
                self.config.provider
            ))
        })
    }

    /// Send a chat completion request and return the text response.
    ///
    /// Posts the given messages and sampling temperature to the provider's
    /// chat completions endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Config`] when the provider has no known
    /// endpoint and no `base_url`, or when a hosted provider has no API key.
    /// Returns [`CadenceError::Llm`] on HTTP errors or response parsing
    /// failures.
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<String, CadenceError> {
        let url = self.endpoint()?;

        // Self-hosted endpoints commonly run without auth.
        if self.api_key.is_none() && self.config.base_url.is_none() {
            if let Some(env_var) = self.config.api_key_env_var() {
                return Err(CadenceError::Config(format!(
                    "no API key for provider '{}' (set {env_var} or llm.api_key)",
                    self.config.provider
                )));
            }
        }

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": temperature,
        });

        let mut request = self.client.post(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }
        request = request.header("Content-Type", "application/json");

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| CadenceError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(CadenceError::Llm(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CadenceError::Llm(format!("failed to parse response: {e}")))?;

        extract_content(&response_body)
    }
}

fn extract_content(response_body: &serde_json::Value) -> Result<String, CadenceError> {
    response_body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| CadenceError::Llm(format!("unexpected response structure: {response_body}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeout() -> Duration {
        Duration::from_secs(1)
    }

    #[test]
    fn model_returns_config_model() {
        let config = LlmConfig {
            model: "llama3.1".into(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config, timeout()).unwrap();
        assert_eq!(client.model(), "llama3.1");
    }

    #[test]
    fn chat_message_serializes() {
        let msg = ChatMessage {
            role: Role::System,
            content: "hello".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Steady work."}}]
        });
        assert_eq!(extract_content(&body).unwrap(), "Steady work.");
    }

    #[test]
    fn malformed_body_is_an_llm_error() {
        let body = serde_json::json!({"error": {"message": "nope"}});
        let err = extract_content(&body).unwrap_err();
        assert!(matches!(err, CadenceError::Llm(_)));
    }

    #[test]
    fn anthropic_key_goes_to_anthropic() {
        let config = LlmConfig {
            provider: "anthropic".into(),
            api_key: Some("sk-ant-test".into()),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config, timeout()).unwrap();
        assert_eq!(client.api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(
            client.endpoint().unwrap(),
            "https://api.anthropic.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn unknown_provider_without_base_url_fails_before_sending() {
        let config = LlmConfig {
            provider: "mystery".into(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config, timeout()).unwrap();
        assert!(client.api_key.is_none());
        let err = client.chat(Vec::new(), 0.2).await.unwrap_err();
        assert!(matches!(err, CadenceError::Config(msg) if msg.contains("llm.base_url")));
    }

    #[tokio::test]
    async fn missing_key_for_hosted_endpoint_fails_before_sending() {
        let mut client = LlmClient::new(&LlmConfig::default(), timeout()).unwrap();
        // Ignore any OPENAI_API_KEY in the environment.
        client.api_key = None;
        let err = client.chat(Vec::new(), 0.2).await.unwrap_err();
        assert!(matches!(err, CadenceError::Config(_)));
    }
}
