//! Logging setup on top of the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `CDPCHAT_LOG`: Filter directive (like `RUST_LOG`), e.g., `cdpchat_agent=debug`
//! - `CDPCHAT_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `CDPCHAT_LOG_DIR`: Directory for the rolling log file (default `~/.cdpchat/logs`)
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "compact"
//!
//! [logging.file]
//! enabled = false
//! level = "debug"
//!
//! [logging.privacy]
//! log_queries = false
//! truncate_length = 80
//! ```
//!
//! The interactive chat owns the terminal, so it turns the stderr layer off and
//! relies on the file layer alone.
//!
//! # Example
//!
//! ```no_run
//! use cdpchat_core::logging;
//!
//! let _guard = logging::init_logging(logging::LoggingConfig::default())?;
//! # Ok::<(), cdpchat_core::Error>(())
//! ```

use crate::Error;
use crate::config::LoggingConfig as ConfigLoggingConfig;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    #[default]
    Compact,
}

impl LogFormat {
    /// All available log formats.
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Privacy configuration for user text in logs.
#[derive(Debug, Clone, Default)]
pub struct PrivacyConfig {
    /// Include query text in log events.
    pub log_queries: bool,
    /// Maximum length before text is truncated.
    pub truncate_length: usize,
}

/// File sink settings.
#[derive(Debug, Clone)]
pub struct FileSink {
    pub level: String,
    pub directory: Option<PathBuf>,
}

/// Runtime logging configuration, bridged from the `[logging]` config section.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive for stderr output.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// Whether to write to stderr at all.
    pub stderr: bool,
    /// Rolling JSON file output.
    pub file: Option<FileSink>,
    pub privacy: PrivacyConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
            stderr: true,
            file: None,
            privacy: PrivacyConfig { log_queries: false, truncate_length: 80 },
        }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        let format = LogFormat::parse_str(&config.format).unwrap_or_default();

        Self {
            level: config.level,
            format,
            stderr: true,
            file: if config.file.enabled {
                Some(FileSink { level: config.file.level, directory: config.file.directory })
            } else {
                None
            },
            privacy: PrivacyConfig {
                log_queries: config.privacy.log_queries,
                truncate_length: config.privacy.truncate_length,
            },
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable the stderr layer.
    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    pub fn with_file(mut self, sink: FileSink) -> Self {
        self.file = Some(sink);
        self
    }

    pub fn with_privacy(mut self, config: PrivacyConfig) -> Self {
        self.privacy = config;
        self
    }

    /// Whether any layer would be installed.
    pub fn is_enabled(&self) -> bool {
        self.stderr || self.file.is_some()
    }

    /// Build an EnvFilter from this config and environment variables.
    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var("CDPCHAT_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Environment overrides config; pretty on a TTY only when asked for.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("CDPCHAT_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if self.format == LogFormat::Pretty && !Self::is_tty() { LogFormat::Compact } else { self.format }
    }

    fn log_dir(sink: &FileSink) -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("CDPCHAT_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }
        if let Some(dir) = &sink.directory {
            return Ok(dir.clone());
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Logging("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".cdpchat").join("logs"))
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns the file writer's guard when file logging is on; it must be held for
/// as long as the process logs, or buffered lines are lost.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>, Error> {
    if !config.is_enabled() {
        return Ok(None);
    }

    let stderr_layer = if config.stderr {
        let filter = config.build_env_filter();
        let layer = match config.detect_format() {
            LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).with_filter(filter).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(io::stderr).with_filter(filter).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).with_filter(filter).boxed(),
        };
        Some(layer)
    } else {
        None
    };

    let mut guard = None;
    let file_layer = match &config.file {
        Some(sink) => {
            let log_dir = LoggingConfig::log_dir(sink)?;
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| Error::Logging(format!("Failed to create log directory: {}", e)))?;

            let file_appender = tracing_appender::rolling::daily(log_dir, "cdpchat.log");
            let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker_guard);

            let filter = EnvFilter::try_new(&sink.level).unwrap_or_else(|_| EnvFilter::new("debug"));
            Some(fmt::layer().json().with_writer(non_blocking).with_filter(filter).boxed())
        }
        None => None,
    };

    Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(guard)
}

/// Prepare user text for a log field according to privacy settings.
pub fn redact_query(content: &str, privacy: &PrivacyConfig) -> String {
    if !privacy.log_queries {
        return format!("[REDACTED {} chars]", content.chars().count());
    }

    let total = content.chars().count();
    if total <= privacy.truncate_length {
        return content.to_string();
    }

    let mut truncated = content.chars().take(privacy.truncate_length).collect::<String>();
    truncated.push_str("...");
    truncated.push_str(&format!(" ({} total chars)", total));
    truncated
}
