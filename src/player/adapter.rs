//! Player adapter
//!
//! Normalizes the external player's asynchronous readiness behind a
//! synchronous-looking control surface. Commands issued before the player
//! signals readiness return `Ok(false)` and are logged, never surfaced as
//! user errors. The adapter owns a local state mirror that may lag the
//! player's authoritative state; `get_state` never fails.

use crate::error::{VibesError, VibesResult};
use crate::player::runtime::{PlayerRuntime, QualityTier, RuntimeEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Readiness state machine. Buffering is a widget-signaled transient inside
/// `Ready`, not separately tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Best-known playback state, mirroring (but possibly lagging) the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    /// Volume 0-100
    pub volume: u8,
    /// Explicit mute flag
    pub muted: bool,
    /// Whether playback is running
    pub playing: bool,
    /// Current track index in the loaded playlist
    pub track_index: usize,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            volume: 50,
            muted: false,
            playing: false,
            track_index: 0,
        }
    }
}

impl PlayerState {
    /// Volume 0 reports as muted regardless of the explicit flag. The two
    /// fields are tracked separately and can disagree.
    pub fn is_effectively_muted(&self) -> bool {
        self.muted || self.volume == 0
    }
}

/// Known player error codes, as reported by the external widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerErrorCode {
    InvalidPlaylist,
    Html5Error,
    NotFound,
    EmbedNotAllowed,
    Unknown(i32),
}

impl PlayerErrorCode {
    pub fn from_raw(code: i32) -> Self {
        match code {
            2 => Self::InvalidPlaylist,
            5 => Self::Html5Error,
            100 => Self::NotFound,
            101 | 150 => Self::EmbedNotAllowed,
            other => Self::Unknown(other),
        }
    }

    /// Short text shown in the track-info line
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidPlaylist => "Invalid playlist ID",
            Self::Html5Error => "Player error",
            Self::NotFound => "Video not found",
            Self::EmbedNotAllowed => "Video cannot be embedded",
            Self::Unknown(_) => "Unknown player error",
        }
    }
}

/// Events forwarded to the registered listener
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Player finished bootstrapping and accepts commands
    Ready,
    /// Mirror updated from a widget state change
    StateChanged(PlayerState),
    /// A playlist was loaded
    PlaylistChanged { playlist_id: String },
    /// Now-playing title
    TrackInfo { title: String },
    /// Widget-reported error
    Error(PlayerErrorCode),
    /// Player process went away
    Exited,
}

/// Wraps the external playback runtime
pub struct Player {
    runtime: Box<dyn PlayerRuntime>,
    ready: ReadyState,
    state: PlayerState,
    current_playlist: Option<String>,
    listener: Option<mpsc::UnboundedSender<PlayerEvent>>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl Player {
    pub fn new(runtime: Box<dyn PlayerRuntime>, poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            runtime,
            ready: ReadyState::Uninitialized,
            state: PlayerState::default(),
            current_playlist: None,
            listener: None,
            poll_interval,
            max_attempts,
        }
    }

    /// Register the listener for player events. At most one listener is
    /// active; the last registration wins.
    pub fn set_listener(&mut self, tx: mpsc::UnboundedSender<PlayerEvent>) {
        self.listener = Some(tx);
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(tx) = &self.listener {
            let _ = tx.send(event);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready == ReadyState::Ready
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready
    }

    /// Launch the player and poll for readiness on a fixed interval up to
    /// the bounded attempt count.
    pub async fn initialize(&mut self) -> VibesResult<()> {
        if self.is_ready() {
            return Ok(());
        }

        if !self.runtime.is_available().await {
            return Err(VibesError::MpvNotFound);
        }

        self.ready = ReadyState::Initializing;
        self.runtime.launch().await?;

        for attempt in 1..=self.max_attempts {
            if self.runtime.connect().await? {
                info!(
                    "{} ready after {} attempt(s)",
                    self.runtime.runtime_name(),
                    attempt
                );
                self.ready = ReadyState::Ready;
                // Replay the mirror volume the way the widget's onReady
                // handler does
                self.runtime.set_volume(self.state.volume).await?;
                self.emit(PlayerEvent::Ready);
                return Ok(());
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        self.ready = ReadyState::Uninitialized;
        let _ = self.runtime.shutdown().await;
        Err(VibesError::PlayerTimeout {
            attempts: self.max_attempts,
        })
    }

    /// Load a playlist. `Ok(false)` when the player is not ready.
    pub async fn load_playlist(&mut self, playlist_id: &str, start_index: usize) -> VibesResult<bool> {
        if !self.is_ready() {
            warn!("load_playlist before player ready, ignoring");
            return Ok(false);
        }

        self.runtime.load_playlist(playlist_id, start_index).await?;
        self.current_playlist = Some(playlist_id.to_string());
        self.state.track_index = start_index;
        self.emit(PlayerEvent::PlaylistChanged {
            playlist_id: playlist_id.to_string(),
        });
        Ok(true)
    }

    pub async fn play(&mut self) -> VibesResult<bool> {
        if !self.is_ready() {
            debug!("play before player ready, ignoring");
            return Ok(false);
        }
        self.runtime.set_paused(false).await?;
        self.state.playing = true;
        Ok(true)
    }

    pub async fn pause(&mut self) -> VibesResult<bool> {
        if !self.is_ready() {
            debug!("pause before player ready, ignoring");
            return Ok(false);
        }
        self.runtime.set_paused(true).await?;
        self.state.playing = false;
        Ok(true)
    }

    pub async fn toggle_play_pause(&mut self) -> VibesResult<bool> {
        if self.state.playing {
            self.pause().await
        } else {
            self.play().await
        }
    }

    pub async fn next_track(&mut self) -> VibesResult<bool> {
        if !self.is_ready() {
            debug!("next_track before player ready, ignoring");
            return Ok(false);
        }
        self.runtime.next().await?;
        self.state.track_index += 1;
        Ok(true)
    }

    pub async fn previous_track(&mut self) -> VibesResult<bool> {
        if !self.is_ready() {
            debug!("previous_track before player ready, ignoring");
            return Ok(false);
        }
        self.runtime.previous().await?;
        self.state.track_index = self.state.track_index.saturating_sub(1);
        Ok(true)
    }

    /// Set volume, clamped to [0, 100]. Updates the mirror even before
    /// readiness so the value is replayed on `initialize`.
    pub async fn set_volume(&mut self, volume: u8) -> VibesResult<bool> {
        let clamped = volume.min(100);
        self.state.volume = clamped;

        if !self.is_ready() {
            debug!("set_volume before player ready, stored for replay");
            return Ok(false);
        }
        self.runtime.set_volume(clamped).await?;
        Ok(true)
    }

    pub async fn set_muted(&mut self, muted: bool) -> VibesResult<bool> {
        if !self.is_ready() {
            debug!("set_muted before player ready, ignoring");
            return Ok(false);
        }
        self.runtime.set_muted(muted).await?;
        self.state.muted = muted;
        Ok(true)
    }

    pub async fn toggle_mute(&mut self) -> VibesResult<bool> {
        let target = !self.state.muted;
        self.set_muted(target).await
    }

    pub async fn set_playback_quality(&mut self, tier: QualityTier) -> VibesResult<bool> {
        if !self.is_ready() {
            debug!("set_playback_quality before player ready, ignoring");
            return Ok(false);
        }
        self.runtime.set_quality(tier).await?;
        Ok(true)
    }

    /// Best-known state. While not ready this is the cached local mirror.
    pub fn get_state(&self) -> PlayerState {
        self.state
    }

    pub fn current_playlist(&self) -> Option<&str> {
        self.current_playlist.as_deref()
    }

    /// Fold a raw runtime event into the mirror and forward it to the
    /// listener.
    pub fn on_runtime_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::StateChanged { playing } => {
                self.state.playing = playing;
                self.emit(PlayerEvent::StateChanged(self.state));
            }
            RuntimeEvent::Buffering => {
                // Transient; surfaced as a state ping without a mode change
                self.emit(PlayerEvent::StateChanged(self.state));
            }
            RuntimeEvent::TrackChanged { index } => {
                self.state.track_index = index;
                self.emit(PlayerEvent::StateChanged(self.state));
            }
            RuntimeEvent::TitleChanged { title } => {
                self.emit(PlayerEvent::TrackInfo { title });
            }
            RuntimeEvent::Error { code, message } => {
                warn!("Player error {code}: {message}");
                self.emit(PlayerEvent::Error(PlayerErrorCode::from_raw(code)));
            }
            RuntimeEvent::Exited => {
                self.ready = ReadyState::Uninitialized;
                self.state.playing = false;
                self.emit(PlayerEvent::Exited);
            }
        }
    }

    /// Release the player process.
    pub async fn destroy(&mut self) -> VibesResult<()> {
        self.ready = ReadyState::Uninitialized;
        self.current_playlist = None;
        self.runtime.shutdown().await
    }
}
