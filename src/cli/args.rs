//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Study Vibes Radio
///
/// Mood-based ambient music for studying, played through mpv with
/// curated playlists, a sleep timer, and an offline asset cache.
#[derive(Parser, Debug)]
#[command(name = "vibes")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VIBES_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a listening session
    Play(PlayArgs),

    /// List available moods
    Moods,

    /// Check player and cache health
    Status,

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Manage the offline asset cache
    Cache(CacheArgs),
}

/// Arguments for the play command
#[derive(Parser, Debug, Default)]
pub struct PlayArgs {
    /// Mood to tune in to (defaults to the last one used)
    pub mood: Option<String>,

    /// Audio only, lowest quality stream
    #[arg(short, long)]
    pub audio_only: bool,

    /// Arm a sleep timer in minutes before starting
    #[arg(short, long, value_name = "MINUTES")]
    pub timer: Option<u32>,

    /// Skip the offline asset cache for this session
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., player.binary)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cached stores and entry counts
    Status,

    /// Fetch and cache the application shell
    Warm,

    /// Remove dynamic entries past the retention window
    Gc {
        /// Remove entries older than N days (default: from config)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Remove all cached assets
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
