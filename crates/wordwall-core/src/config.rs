//! Configuration loading and typed config structures for wordwall.
//!
//! The configuration lives in `wordwall-config.yaml` in the working
//! directory. Every field has a default, so a missing file or a partial
//! file is fine. Environment variables are applied on top of the file so
//! deployments can tweak the display without editing YAML:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PORT` | `server.port` |
//! | `WORD_COUNT` | `words.capacity` |
//! | `WORD_TIMEOUT` | `words.timeout_secs` |
//! | `WORDS_FILE` | `words.words_file` |
//! | `VIDEO_PATH` | `display.video_path` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

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

    /// A value is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level wordwall configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WallConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: HttpConfig,

    /// Active word buffer and rotation settings.
    #[serde(default)]
    pub words: WordsConfig,

    /// Pass-through settings for the display frontend.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WallConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.resolve()
    }

    /// Read the YAML file as-is, without environment overrides or
    /// validation. A missing file yields the defaults.
    ///
    /// Lets the binary pick up `logging.level` before logging is
    /// initialized; follow with [`resolve`](Self::resolve).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// or [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a value is out of range.
    pub fn resolve(mut self) -> Result<Self, ConfigError> {
        self.apply_env_overrides();
        self.validate()?;
        Ok(self)
    }

    /// Override fields from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override fields from an arbitrary variable lookup.
    ///
    /// Numeric values that fail to parse, or are zero, are ignored with a
    /// warning and the current value is kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|v| parse_positive("PORT", &v)) {
            self.server.port = port;
        }
        if let Some(count) = lookup("WORD_COUNT").and_then(|v| parse_positive("WORD_COUNT", &v)) {
            self.words.capacity = count;
        }
        if let Some(secs) = lookup("WORD_TIMEOUT").and_then(|v| parse_positive("WORD_TIMEOUT", &v))
        {
            self.words.timeout_secs = secs;
        }
        if let Some(file) = lookup("WORDS_FILE") {
            self.words.words_file = PathBuf::from(file);
        }
        if let Some(path) = lookup("VIDEO_PATH") {
            self.display.video_path = path;
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `words.capacity` or
    /// `words.timeout_secs` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.words.capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "words.capacity must be at least 1".to_owned(),
            });
        }
        if self.words.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: "words.timeout_secs must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

fn parse_positive<T>(name: &str, raw: &str) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Some(value),
        _ => {
            warn!(variable = name, value = raw, "Ignoring invalid environment override");
            None
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Active word buffer and rotation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordsConfig {
    /// Number of simultaneously visible words.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Seconds before a word is rotated out, and the maximum long-poll wait.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Newline-delimited predefined word list.
    #[serde(default = "default_words_file")]
    pub words_file: PathBuf,

    /// Seed for replacement picks. Random when absent.
    #[serde(default)]
    pub rotation_seed: Option<u64>,
}

impl WordsConfig {
    /// The rotation and long-poll timeout.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            timeout_secs: default_timeout_secs(),
            words_file: default_words_file(),
            rotation_seed: None,
        }
    }
}

/// Settings passed through to the display frontend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Path of the background video.
    #[serde(default = "default_video_path")]
    pub video_path: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            video_path: default_video_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    3001
}

const fn default_capacity() -> usize {
    4
}

const fn default_timeout_secs() -> u64 {
    12
}

fn default_words_file() -> PathBuf {
    PathBuf::from("predefined.txt")
}

fn default_video_path() -> String {
    "/videos/background.mp4".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
