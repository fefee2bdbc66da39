//! Configuration schema for Study Vibes
//!
//! Configuration is stored at `~/.config/study-vibes/config.toml`

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Player (mpv) settings
    pub player: PlayerConfig,

    /// Remote asset locations
    pub assets: AssetsConfig,

    /// Cache settings
    pub cache: CacheConfig,

    /// Interactive session settings
    pub session: SessionConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// External player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Player binary to spawn
    pub binary: String,

    /// Interval between readiness polls in milliseconds
    pub ready_poll_ms: u64,

    /// Bounded attempt count for the readiness poll
    pub ready_max_attempts: u32,

    /// Delay before autoplay after a playlist load, in milliseconds
    /// (lets the player settle)
    pub autoplay_delay_ms: u64,

    /// Extra arguments passed to the player binary
    pub extra_args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
            ready_poll_ms: 100,
            ready_max_attempts: 50,
            autoplay_delay_ms: 1000,
            extra_args: vec![],
        }
    }
}

/// Remote asset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Base URL the shell assets are served from
    pub base_url: String,

    /// Stylesheet URL on a network-first host
    pub fonts_url: String,

    /// Player bootstrap script URL (never served stale)
    pub bootstrap_url: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://studyvibes.app".to_string(),
            fonts_url:
                "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600&display=swap"
                    .to_string(),
            bootstrap_url: "https://www.youtube.com/iframe_api".to_string(),
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the offline asset cache (default: true)
    pub enabled: bool,

    /// Auto-remove dynamic entries older than N days (0 = disabled)
    pub gc_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gc_days: 30,
        }
    }
}

/// Interactive session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Show the time-of-day greeting on start
    pub greeting: bool,

    /// Start in audio-only mode regardless of persisted settings
    pub force_audio_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: true,
            force_audio_only: false,
        }
    }
}
