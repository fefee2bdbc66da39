//! Player runtime abstraction
//!
//! Provides a trait for the external playback widget so the adapter can be
//! driven against mpv in production and a recording mock in tests.

use crate::error::VibesResult;
use async_trait::async_trait;

/// Playback quality tier. The lowest tier approximates an audio-only
/// experience when the video surface is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// Player default quality
    Default,
    /// Lowest available quality
    Lowest,
}

/// Raw events pushed by the external player. Forwarded verbatim to the
/// adapter's registered listener.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// Playing/paused flipped
    StateChanged { playing: bool },
    /// Transient buffering signal; not separately tracked
    Buffering,
    /// Playlist position changed
    TrackChanged { index: usize },
    /// Now-playing title changed
    TitleChanged { title: String },
    /// Player error with its native error code
    Error { code: i32, message: String },
    /// Player process exited
    Exited,
}

/// Abstract playback runtime interface
///
/// Implemented by [`super::MpvRuntime`] in production; tests substitute a
/// recording mock.
#[async_trait]
pub trait PlayerRuntime: Send + Sync {
    /// Check if the player binary is available on this system
    async fn is_available(&self) -> bool;

    /// Spawn the player process (does not wait for readiness)
    async fn launch(&mut self) -> VibesResult<()>;

    /// One readiness poll attempt. `Ok(true)` once the player accepts
    /// commands.
    async fn connect(&mut self) -> VibesResult<bool>;

    /// Load a playlist by external id, starting at the given track index
    async fn load_playlist(&self, playlist_id: &str, start_index: usize) -> VibesResult<()>;

    /// Set the paused flag (play = unpause; idempotent)
    async fn set_paused(&self, paused: bool) -> VibesResult<()>;

    /// Skip to the next track
    async fn next(&self) -> VibesResult<()>;

    /// Go back to the previous track
    async fn previous(&self) -> VibesResult<()>;

    /// Set volume 0-100
    async fn set_volume(&self, volume: u8) -> VibesResult<()>;

    /// Set the mute flag
    async fn set_muted(&self, muted: bool) -> VibesResult<()>;

    /// Select a playback quality tier
    async fn set_quality(&self, tier: QualityTier) -> VibesResult<()>;

    /// Stop the player process and release its resources
    async fn shutdown(&mut self) -> VibesResult<()>;

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &'static str;
}
