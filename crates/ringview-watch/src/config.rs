//! Configuration loading for the watcher.
//!
//! The config file is YAML. Every section and field is optional; missing
//! values fall back to the defaults below.
//!
//! ```yaml
//! source:
//!   snapshot_path: "event-queue.json"
//! poll:
//!   interval_ms: 1000
//!   max_polls: 0        # 0 = run until Ctrl-C
//!   start_after: 41     # omit to bootstrap from scratch
//! logging:
//!   level: "info"
//!   format: "text"      # or "json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level watcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WatchConfig {
    /// Where snapshots come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Poll loop timing and starting cursor.
    #[serde(default)]
    pub poll: PollConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WatchConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `RINGVIEW_SNAPSHOT_PATH` overrides `source.snapshot_path`
    /// - `RINGVIEW_POLL_INTERVAL_MS` overrides `poll.interval_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override file values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override file values from `lookup`, keyed by environment variable
    /// name. A non-numeric interval is ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("RINGVIEW_SNAPSHOT_PATH") {
            self.source.snapshot_path = PathBuf::from(val);
        }
        if let Some(ms) =
            lookup("RINGVIEW_POLL_INTERVAL_MS").and_then(|val| val.trim().parse().ok())
        {
            self.poll.interval_ms = ms;
        }
    }
}

/// Snapshot source settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// JSON file holding the latest decoded snapshot.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PollConfig {
    /// Milliseconds between snapshot refreshes.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Stop after this many polls. Zero means unbounded.
    #[serde(default)]
    pub max_polls: u64,

    /// Resume after this sequence number instead of bootstrapping.
    #[serde(default)]
    pub start_after: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_polls: 0,
            start_after: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("event-queue.json")
}

const fn default_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_owned()
}
