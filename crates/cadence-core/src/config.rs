use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CadenceError;

/// Top-level configuration loaded from `.cadence.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
///
/// # Examples
///
/// ```
/// use cadence_core::CadenceConfig;
///
/// let config = CadenceConfig::default();
/// assert!(config.summary.enabled);
/// assert_eq!(config.history.since_days, 365);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// LLM provider settings used by the summarizer.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Natural-language summary settings.
    #[serde(default)]
    pub summary: SummaryConfig,
    /// Git history mining settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl CadenceConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::FileNotFound`] if `path` does not exist,
    /// [`CadenceError::Io`] if it cannot be read, or [`CadenceError::Toml`]
    /// if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cadence_core::CadenceConfig;
    /// use std::path::Path;
    ///
    /// let config = CadenceConfig::from_file(Path::new(".cadence.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, CadenceError> {
        if !path.exists() {
            return Err(CadenceError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_core::CadenceConfig;
    ///
    /// let toml = r#"
    /// [summary]
    /// timeout_secs = 3
    /// "#;
    /// let config = CadenceConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.summary.timeout_secs, 3);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CadenceError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// LLM provider configuration.
///
/// # Examples
///
/// ```
/// use cadence_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. `"openai"`, `"anthropic"`, `"ollama"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Environment variable consulted when `api_key` is not set.
    ///
    /// Only hosted providers have one; self-hosted providers never pick up
    /// a key from the environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_core::LlmConfig;
    ///
    /// let config = LlmConfig { provider: "anthropic".into(), ..LlmConfig::default() };
    /// assert_eq!(config.api_key_env_var(), Some("ANTHROPIC_API_KEY"));
    /// ```
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self.provider.as_str() {
            "openai" => Some("OPENAI_API_KEY"),
            "anthropic" => Some("ANTHROPIC_API_KEY"),
            "gemini" => Some("GEMINI_API_KEY"),
            _ => None,
        }
    }

    /// OpenAI-compatible base URL the provider serves when `base_url` is unset.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self.provider.as_str() {
            "openai" => Some("https://api.openai.com/v1"),
            "anthropic" => Some("https://api.anthropic.com/v1"),
            "gemini" => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            "ollama" => Some("http://localhost:11434/v1"),
            _ => None,
        }
    }

    /// Full chat completions URL for this provider.
    ///
    /// A custom `base_url` is a server root and gets `/v1/chat/completions`
    /// appended. Without one, the provider's own endpoint is used; unknown
    /// providers have none.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_core::LlmConfig;
    ///
    /// let config = LlmConfig { provider: "anthropic".into(), ..LlmConfig::default() };
    /// assert_eq!(
    ///     config.chat_completions_url().as_deref(),
    ///     Some("https://api.anthropic.com/v1/chat/completions")
    /// );
    /// ```
    pub fn chat_completions_url(&self) -> Option<String> {
        match &self.base_url {
            Some(base) => Some(format!("{}/v1/chat/completions", base.trim_end_matches('/'))),
            None => self
                .default_base_url()
                .map(|base| format!("{base}/chat/completions")),
        }
    }

    /// The configured API key, falling back to the provider's env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| {
                self.api_key_env_var()
                    .and_then(|var| std::env::var(var).ok())
            })
            .filter(|k| !k.trim().is_empty())
    }
}

/// Natural-language summary configuration.
///
/// # Examples
///
/// ```
/// use cadence_core::SummaryConfig;
///
/// let config = SummaryConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.timeout_secs, 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Request a summary from the LLM at all (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Upper bound on the summarizer call, in seconds (default: 8).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    8
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Git history mining configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Only include commits from the last N days (default: 365).
    #[serde(default = "default_since_days")]
    pub since_days: u64,
    /// Branch to walk (default: HEAD).
    pub branch: Option<String>,
    /// Ignore merge commits (default: true).
    #[serde(default = "default_skip_merges")]
    pub skip_merges: bool,
}

fn default_since_days() -> u64 {
    365
}

fn default_skip_merges() -> bool {
    true
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            since_days: default_since_days(),
            branch: None,
            skip_merges: default_skip_merges(),
        }
    }
}
