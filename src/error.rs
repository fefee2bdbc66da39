//! Error types for Study Vibes
//!
//! All modules use `VibesResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Study Vibes operations
pub type VibesResult<T> = Result<T, VibesError>;

/// All errors that can occur in Study Vibes
#[derive(Error, Debug)]
pub enum VibesError {
    // Player errors
    #[error("mpv not found. Install it from https://mpv.io or your package manager")]
    MpvNotFound,

    #[error("Player did not become ready after {attempts} attempts")]
    PlayerTimeout { attempts: u32 },

    #[error("Player IPC error: {0}")]
    PlayerIpc(String),

    // Catalog errors
    #[error("Unknown mood: {0}")]
    MoodNotFound(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Unknown configuration key: {0}")]
    ConfigKeyUnknown(String),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Cache errors
    #[error("Failed to create cache store {name}: {reason}")]
    CacheStoreCreate { name: String, reason: String },

    // Network errors
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl VibesError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the application keeps running with a fallback when this
    /// error occurs. Per-request network failures degrade; everything
    /// else surfaces.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MpvNotFound => Some("Install mpv and make sure it is on your PATH"),
            Self::PlayerTimeout { .. } => {
                Some("Retry, or check network connectivity and any firewall blocking the player")
            }
            Self::MoodNotFound(_) => Some("Run: vibes moods"),
            _ => None,
        }
    }
}
