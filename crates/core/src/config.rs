use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/query";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Channel selection for reaching the answering engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChannelConfig {
    /// JSON over HTTP POST
    Http {
        /// Query endpoint (e.g. "http://localhost:8000/api/query")
        #[serde(default = "default_endpoint")]
        endpoint: String,
        /// Request timeout in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
        /// Health route; derived from the endpoint when absent
        #[serde(default)]
        health_endpoint: Option<String>,
    },
    /// Scripted replies for demos and tests
    Mock {
        /// TOML file with `[[responses]]`
        #[serde(default)]
        responses_file: Option<PathBuf>,
        /// Artificial latency before each reply
        #[serde(default)]
        latency_ms: u64,
    },
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig::Http { endpoint: default_endpoint(), timeout_ms: default_timeout_ms(), health_endpoint: None }
    }
}

impl ChannelConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ChannelConfig::Http { .. } => "http",
            ChannelConfig::Mock { .. } => "mock",
        }
    }

    /// Health route for the HTTP channel.
    ///
    /// `http://host:8000/api/query` becomes `http://host:8000/api/health`.
    pub fn health_endpoint(&self) -> Option<String> {
        match self {
            ChannelConfig::Http { health_endpoint: Some(url), .. } => Some(url.clone()),
            ChannelConfig::Http { endpoint, .. } => {
                let base = endpoint.trim_end_matches('/');
                match base.rsplit_once('/') {
                    Some((prefix, _)) if prefix.contains("://") => Some(format!("{}/health", prefix)),
                    _ => Some(format!("{}/health", base)),
                }
            }
            ChannelConfig::Mock { .. } => None,
        }
    }

    /// Replace the endpoint, switching to HTTP if needed
    pub fn with_endpoint(self, endpoint: impl Into<String>) -> Self {
        match self {
            ChannelConfig::Http { timeout_ms, .. } => {
                ChannelConfig::Http { endpoint: endpoint.into(), timeout_ms, health_endpoint: None }
            }
            ChannelConfig::Mock { .. } => {
                ChannelConfig::Http { endpoint: endpoint.into(), timeout_ms: default_timeout_ms(), health_endpoint: None }
            }
        }
    }
}

/// Conversation copy shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub title: String,
    pub subtitle: String,
    /// Seeded as the first bot entry
    pub welcome_message: String,
    /// Fixed text of every failed bot entry
    pub error_message: String,
    pub placeholder: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title: "CDP Support Assistant".to_string(),
            subtitle: "Ask how-to questions about Segment, mParticle, Lytics, and Zeotap".to_string(),
            welcome_message: "Hi there! I'm your CDP Support Assistant. I can help you with how-to questions about \
                              Segment, mParticle, Lytics, and Zeotap. What would you like to know?"
                .to_string(),
            error_message: "Sorry, I encountered an error processing your question. Please try again.".to_string(),
            placeholder: "Ask a question about CDPs...".to_string(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive for stderr output
    pub level: String,
    /// "pretty", "json" or "compact"
    pub format: String,
    pub file: FileLoggingConfig,
    pub privacy: PrivacyLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
            file: FileLoggingConfig::default(),
            privacy: PrivacyLoggingConfig::default(),
        }
    }
}

/// `[logging.file]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub level: String,
    /// Log directory; `~/.cdpchat/logs` when absent
    pub directory: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: "debug".to_string(), directory: None }
    }
}

/// `[logging.privacy]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyLoggingConfig {
    /// Include query text in logs
    pub log_queries: bool,
    pub truncate_length: usize,
}

impl Default for PrivacyLoggingConfig {
    fn default() -> Self {
        Self { log_queries: false, truncate_length: 80 }
    }
}

/// Root configuration structure for cdpchat.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)
            .map_err(|e| crate::Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// Returns whether the file was found.
    pub fn load_or_default(path: &Path) -> Result<(Self, bool)> {
        if path.exists() { Ok((Self::from_file(path)?, true)) } else { Ok((Self::default(), false)) }
    }

    /// Override the channel endpoint (from the command line)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self> {
        self.channel = self.channel.with_endpoint(endpoint);
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        use crate::Error;

        if let ChannelConfig::Http { endpoint, timeout_ms, health_endpoint } = &self.channel {
            if !is_http_url(endpoint) {
                return Err(Error::Config(ConfigError::InvalidEndpoint(endpoint.clone()).to_string()));
            }
            if let Some(url) = health_endpoint
                && !is_http_url(url)
            {
                return Err(Error::Config(ConfigError::InvalidEndpoint(url.clone()).to_string()));
            }
            if *timeout_ms == 0 {
                return Err(Error::Config(ConfigError::ZeroTimeout.to_string()));
            }
        }

        if self.chat.welcome_message.trim().is_empty() {
            return Err(Error::Config(ConfigError::EmptyMessage("welcome_message").to_string()));
        }
        if self.chat.error_message.trim().is_empty() {
            return Err(Error::Config(ConfigError::EmptyMessage("error_message").to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# cdpchat configuration

# How to reach the answering engine
[channel]
# Channel type: "http" or "mock"
kind = "http"
# Query endpoint; receives POST {"query": "..."}
endpoint = "http://localhost:8000/api/query"
# Request timeout in milliseconds
timeout_ms = 30000
# Health route (optional, defaults to the endpoint's sibling /health)
# health_endpoint = "http://localhost:8000/api/health"

# Scripted replies instead of a live engine:
# [channel]
# kind = "mock"
# responses_file = "mock_responses.toml"
# latency_ms = 500

[chat]
title = "CDP Support Assistant"
subtitle = "Ask how-to questions about Segment, mParticle, Lytics, and Zeotap"
# welcome_message = "Hi there! ..."
error_message = "Sorry, I encountered an error processing your question. Please try again."
placeholder = "Ask a question about CDPs..."

[logging]
level = "warn"
# Output format: "pretty", "json" or "compact"
format = "compact"

[logging.file]
enabled = false
level = "debug"

[logging.privacy]
# Include query text in log lines
log_queries = false
truncate_length = 80
"#
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url.strip_prefix("http://").or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.is_empty())
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Endpoint is not an http(s) URL
    #[error("invalid endpoint (expected http:// or https:// URL): {0}")]
    InvalidEndpoint(String),

    /// Zero timeout would fail every request
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    /// Required message is blank
    #[error("chat.{0} must not be empty")]
    EmptyMessage(&'static str),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.channel.kind(), "http");
        assert_eq!(config.chat.title, "CDP Support Assistant");
        assert!(config.chat.error_message.starts_with("Sorry"));
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_example_parses() {
        let config = Config::from_toml_str(Config::example()).unwrap();
        assert_eq!(
            config.channel,
            ChannelConfig::Http {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                timeout_ms: 30000,
                health_endpoint: None
            }
        );
        assert_eq!(config.chat.placeholder, "Ask a question about CDPs...");
        assert!(!config.logging.file.enabled);
        assert!(!config.logging.privacy.log_queries);
    }

    #[test]
    fn test_config_empty_string_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_mock_channel() {
        let toml = r#"
[channel]
kind = "mock"
responses_file = "replies.toml"
latency_ms = 500
"#;

        let config = Config::from_toml_str(toml).unwrap();
        match config.channel {
            ChannelConfig::Mock { responses_file, latency_ms } => {
                assert_eq!(responses_file, Some(PathBuf::from("replies.toml")));
                assert_eq!(latency_ms, 500);
            }
            _ => panic!("Expected mock channel"),
        }
    }

    #[test]
    fn test_config_partial_chat_section() {
        let toml = r#"
[chat]
title = "Docs Helper"
"#;

        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.chat.title, "Docs Helper");
        assert_eq!(config.chat.error_message, ChatConfig::default().error_message);
    }

    #[test]
    fn test_config_rejects_non_http_endpoint() {
        let toml = r#"
[channel]
kind = "http"
endpoint = "ftp://example.com/query"
"#;

        let result = Config::from_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("invalid endpoint"));
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let toml = r#"
[channel]
kind = "http"
timeout_ms = 0
"#;

        let result = Config::from_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_config_rejects_blank_error_message() {
        let toml = r#"
[chat]
error_message = "   "
"#;

        let result = Config::from_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("chat.error_message must not be empty"));
    }

    #[test]
    fn test_config_rejects_unknown_section() {
        let result = Config::from_toml_str("[profiles.default]\nname = \"x\"\n");
        assert!(result.unwrap_err().to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_health_endpoint_derivation() {
        let channel = ChannelConfig::default();
        assert_eq!(channel.health_endpoint().as_deref(), Some("http://localhost:8000/api/health"));

        let channel = ChannelConfig::Http {
            endpoint: "http://localhost:8000/api/query".to_string(),
            timeout_ms: 10,
            health_endpoint: Some("http://localhost:9000/status".to_string()),
        };
        assert_eq!(channel.health_endpoint().as_deref(), Some("http://localhost:9000/status"));

        let channel = ChannelConfig::Mock { responses_file: None, latency_ms: 0 };
        assert!(channel.health_endpoint().is_none());
    }

    #[test]
    fn test_with_endpoint_override() {
        let config = Config::default().with_endpoint("https://answers.example.com/api/query").unwrap();
        match &config.channel {
            ChannelConfig::Http { endpoint, timeout_ms, .. } => {
                assert_eq!(endpoint, "https://answers.example.com/api/query");
                assert_eq!(*timeout_ms, DEFAULT_TIMEOUT_MS);
            }
            _ => panic!("Expected HTTP channel"),
        }

        assert!(Config::default().with_endpoint("not a url").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chat]\nsubtitle = \"From file\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.chat.subtitle, "From file");

        let (loaded, found) = Config::load_or_default(file.path()).unwrap();
        assert!(found);
        assert_eq!(loaded.chat.subtitle, "From file");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (config, found) = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert!(!found);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidEndpoint("x".to_string());
        assert_eq!(err.to_string(), "invalid endpoint (expected http:// or https:// URL): x");

        let err = ConfigError::ZeroTimeout;
        assert_eq!(err.to_string(), "timeout_ms must be greater than zero");

        let err = ConfigError::EmptyMessage("welcome_message");
        assert_eq!(err.to_string(), "chat.welcome_message must not be empty");

        let err = ConfigError::TomlParse("parse error".to_string());
        assert_eq!(err.to_string(), "TOML parse error: parse error");
    }
}
