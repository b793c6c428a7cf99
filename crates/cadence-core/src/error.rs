use std::path::PathBuf;

/// Errors that can occur across Cadence.
///
/// Library crates use this type directly; the binary converts to
/// `miette` diagnostics at the boundary. The analyzer itself never
/// returns one: summarizer errors are recovered inside it.
///
/// # Examples
///
/// ```
/// use cadence_core::CadenceError;
///
/// let err = CadenceError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CadenceError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    #[diagnostic(help("run cadence inside a git repository, or pass --repo"))]
    Git(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// An operation did not finish within its deadline.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CadenceError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = CadenceError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn timeout_shows_seconds() {
        let err = CadenceError::Timeout(8);
        assert_eq!(err.to_string(), "timed out after 8s");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = CadenceError::FileNotFound(PathBuf::from("/tmp/stats.json"));
        assert!(err.to_string().contains("/tmp/stats.json"));
    }
}
