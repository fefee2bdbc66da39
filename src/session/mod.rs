//! Interactive listening session
//!
//! Owns the player, the sleep timer, and the keyboard loop. One session
//! per process; it restores the terminal and shuts the player down on
//! every exit path.

mod screen;

pub use screen::{Frame, Screen};

use crate::cache::{CacheRequest, CacheWorker, ResourceKind, WorkerMessage, WorkerPhase};
use crate::catalog::{self, Mood, MOODS};
use crate::config::schema::Config;
use crate::error::{VibesError, VibesResult};
use crate::player::{Player, PlayerEvent, QualityTier, RuntimeEvent};
use crate::settings::{SettingsStore, UserSettings};
use crate::timer::{SleepTimer, TimerEvent};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Volume change applied per keypress
const VOLUME_STEP: u8 = 5;

/// Sleep timer presets cycled by the timer key, in minutes
const TIMER_PRESETS: [u32; 5] = [0, 15, 30, 45, 60];

/// Options collected from the play command
#[derive(Debug, Default)]
pub struct SessionOptions {
    /// Mood key to start with; persisted mood when absent
    pub mood: Option<String>,
    /// Force audio-only on or off for this session
    pub audio_only: Option<bool>,
    /// Start with a sleep timer armed, in minutes
    pub timer_minutes: Option<u32>,
    /// Skip the offline asset cache entirely
    pub no_cache: bool,
}

/// Commands produced by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    TogglePlayback,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleAudioOnly,
    CycleTimer,
    SelectMood(usize),
    ToggleHelp,
    DismissHelp,
    Quit,
}

/// Map a key event to a session command. Release/repeat events are
/// ignored so terminals with enhanced key reporting don't double-fire.
fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Char(' ') => Some(Command::TogglePlayback),
        KeyCode::Right => Some(Command::NextTrack),
        KeyCode::Left => Some(Command::PreviousTrack),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::VolumeUp),
        KeyCode::Char('-') => Some(Command::VolumeDown),
        KeyCode::Char('m') => Some(Command::ToggleMute),
        KeyCode::Char('a') => Some(Command::ToggleAudioOnly),
        KeyCode::Char('t') => Some(Command::CycleTimer),
        KeyCode::Char('?') => Some(Command::ToggleHelp),
        KeyCode::Esc => Some(Command::DismissHelp),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char(c) => c
            .to_digit(10)
            .map(|d| d as usize)
            .filter(|d| (1..=MOODS.len()).contains(d))
            .map(|d| Command::SelectMood(d - 1)),
        _ => None,
    }
}

/// Next sleep timer preset in the cycle
fn next_timer_minutes(current: u32) -> u32 {
    let pos = TIMER_PRESETS.iter().position(|&m| m == current).unwrap_or(0);
    TIMER_PRESETS[(pos + 1) % TIMER_PRESETS.len()]
}

/// Time-of-day greeting shown before the session starts
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        18..=21 => "Good evening",
        _ => "Burning the midnight oil",
    }
}

pub struct Session {
    config: Config,
    store: SettingsStore,
    settings: UserSettings,
    player: Player,
    runtime_rx: Option<mpsc::UnboundedReceiver<RuntimeEvent>>,
    cache: Option<Arc<CacheWorker>>,
    mood: &'static Mood,
    timer: Option<SleepTimer>,
    timer_minutes: u32,
    timer_remaining: Option<Duration>,
    track_title: Option<String>,
    status: Option<String>,
    show_help: bool,
    autoplay_at: Option<tokio::time::Instant>,
}

impl Session {
    /// Wire up a session from configuration and persisted settings
    pub async fn new(
        config: Config,
        store: SettingsStore,
        player: Player,
        runtime_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
        options: SessionOptions,
    ) -> VibesResult<Self> {
        let mut settings = store.load().await;
        if let Some(volume) = store.load_volume().await {
            settings.volume = volume;
        }

        let mood = match &options.mood {
            Some(key) => {
                catalog::resolve(key).ok_or_else(|| VibesError::MoodNotFound(key.clone()))?
            }
            None => catalog::resolve(&settings.mood).unwrap_or_else(catalog::default_mood),
        };
        settings.mood = mood.key.to_string();

        if let Some(audio_only) = options.audio_only {
            settings.audio_only = audio_only;
        }

        let cache = if options.no_cache || !config.cache.enabled {
            None
        } else {
            let mut worker = CacheWorker::new(
                crate::config::ConfigManager::cache_root(),
                Arc::new(crate::cache::HttpFetcher::new()?),
                crate::cache::RoutingTable::new(&config.assets),
            );
            // Single controller per machine; an old claim means a stale
            // version, so take over right away
            if worker.try_activate().await? == WorkerPhase::Waiting {
                worker.on_message(WorkerMessage::SkipWaiting).await?;
            }
            Some(Arc::new(worker))
        };

        let timer_minutes = options.timer_minutes.unwrap_or(0);

        Ok(Self {
            config,
            store,
            settings,
            player,
            runtime_rx: Some(runtime_rx),
            cache,
            mood,
            timer: None,
            timer_minutes,
            timer_remaining: None,
            track_title: None,
            status: None,
            show_help: false,
            autoplay_at: None,
        })
    }

    pub fn mood(&self) -> &'static Mood {
        self.mood
    }

    /// Run the session to completion. Initializes the player, enters raw
    /// mode, and pumps events until quit.
    pub async fn run(&mut self) -> VibesResult<()> {
        let mut runtime_rx = self
            .runtime_rx
            .take()
            .ok_or_else(|| VibesError::Internal("session already ran".to_string()))?;
        let (player_tx, mut player_rx) = mpsc::unbounded_channel();
        self.player.set_listener(player_tx);

        self.player.initialize().await?;
        self.apply_settings().await?;
        self.tune_to(self.mood, false).await?;

        let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
        if self.timer_minutes > 0 {
            self.arm_timer(self.timer_minutes, &timer_tx);
        }

        enable_raw_mode().map_err(|e| VibesError::io("entering raw mode", e))?;
        let mut screen = Screen::new();
        let mut keys = EventStream::new();
        self.redraw(&mut screen);

        let result = loop {
            let far_future = tokio::time::Instant::now() + Duration::from_secs(86_400);
            let autoplay_deadline = self.autoplay_at.unwrap_or(far_future);

            tokio::select! {
                maybe_event = keys.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if let Some(command) = map_key(&key) {
                                if command == Command::Quit {
                                    break Ok(());
                                }
                                if let Err(e) = self.dispatch(command, &timer_tx).await {
                                    break Err(e);
                                }
                            }
                        }
                        Some(Ok(_)) => {} // resize etc, redraw below
                        Some(Err(e)) => break Err(VibesError::io("reading terminal events", e)),
                        None => break Ok(()),
                    }
                }
                Some(event) = player_rx.recv() => {
                    if !self.on_player_event(event) {
                        break Ok(());
                    }
                }
                Some(event) = runtime_rx.recv() => {
                    self.player.on_runtime_event(event);
                }
                Some(event) = timer_rx.recv() => {
                    if let Err(e) = self.on_timer_event(event).await {
                        break Err(e);
                    }
                }
                _ = tokio::time::sleep_until(autoplay_deadline), if self.autoplay_at.is_some() => {
                    self.autoplay_at = None;
                    if self.player.is_ready() {
                        if let Err(e) = self.player.play().await {
                            break Err(e);
                        }
                    }
                }
            }

            self.redraw(&mut screen);
        };

        let _ = screen.restore();
        let _ = disable_raw_mode();
        self.shutdown().await;
        result
    }

    /// Replay persisted volume and quality onto the player
    async fn apply_settings(&mut self) -> VibesResult<()> {
        self.player.set_volume(self.settings.volume).await?;
        let audio_only = self.settings.audio_only || self.config.session.force_audio_only;
        if audio_only {
            self.settings.audio_only = true;
            self.player.set_playback_quality(QualityTier::Lowest).await?;
        }
        Ok(())
    }

    /// Switch to a mood: load its playlist, schedule autoplay, and warm
    /// its background asset
    async fn tune_to(&mut self, mood: &'static Mood, persist: bool) -> VibesResult<()> {
        self.mood = mood;
        self.track_title = None;

        let loaded = self.player.load_playlist(mood.playlist_id, 0).await?;
        if loaded {
            let delay = Duration::from_millis(self.config.player.autoplay_delay_ms);
            self.autoplay_at = Some(tokio::time::Instant::now() + delay);
        } else {
            debug!("Player not ready, playlist for {} deferred", mood.key);
        }

        self.prefetch_background(mood);

        if persist {
            self.settings.mood = mood.key.to_string();
            self.persist_settings().await;
        }
        Ok(())
    }

    /// Fetch the mood's background loop through the cache so it is warm
    /// for the shell. Failures fall back to the accent gradient and are
    /// not surfaced.
    fn prefetch_background(&self, mood: &'static Mood) {
        let Some(cache) = self.cache.clone() else {
            return;
        };
        let base = self.config.assets.base_url.trim_end_matches('/').to_string();
        let url = format!("{base}/bg/{}", mood.background);
        let gradient = mood.fallback_gradient;
        tokio::spawn(async move {
            let request = CacheRequest::get(url.clone(), ResourceKind::Video);
            match cache.handle(&request).await {
                Ok(resp) if resp.ok() && !resp.body.is_empty() => {
                    debug!("Background {url} warm ({} bytes)", resp.body.len());
                }
                _ => {
                    debug!(
                        "Background {url} unavailable, gradient {} -> {}",
                        gradient.0, gradient.1
                    );
                }
            }
        });
    }

    async fn dispatch(
        &mut self,
        command: Command,
        timer_tx: &mpsc::UnboundedSender<TimerEvent>,
    ) -> VibesResult<()> {
        if self.show_help && !matches!(command, Command::ToggleHelp | Command::DismissHelp) {
            // Any key closes the overlay first
            self.show_help = false;
        }

        match command {
            Command::TogglePlayback => {
                self.player.toggle_play_pause().await?;
                self.autoplay_at = None;
            }
            Command::NextTrack => {
                self.player.next_track().await?;
            }
            Command::PreviousTrack => {
                self.player.previous_track().await?;
            }
            Command::VolumeUp => self.change_volume(VOLUME_STEP as i16).await?,
            Command::VolumeDown => self.change_volume(-(VOLUME_STEP as i16)).await?,
            Command::ToggleMute => {
                self.player.toggle_mute().await?;
            }
            Command::ToggleAudioOnly => {
                self.settings.audio_only = !self.settings.audio_only;
                let tier = if self.settings.audio_only {
                    QualityTier::Lowest
                } else {
                    QualityTier::Default
                };
                self.player.set_playback_quality(tier).await?;
                self.persist_settings().await;
            }
            Command::CycleTimer => {
                self.timer_minutes = next_timer_minutes(self.timer_minutes);
                if self.timer_minutes == 0 {
                    self.timer = None;
                    self.timer_remaining = None;
                    self.status = Some("sleep timer off".to_string());
                } else {
                    self.arm_timer(self.timer_minutes, timer_tx);
                    self.status = Some(format!("sleep in {} min", self.timer_minutes));
                }
            }
            Command::SelectMood(index) => {
                if let Some(mood) = MOODS.get(index) {
                    if mood.key != self.mood.key {
                        self.tune_to(mood, true).await?;
                    }
                }
            }
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::DismissHelp => self.show_help = false,
            Command::Quit => unreachable!("quit handled by the event loop"),
        }
        Ok(())
    }

    async fn change_volume(&mut self, delta: i16) -> VibesResult<()> {
        let current = i16::from(self.player.get_state().volume);
        let target = (current + delta).clamp(0, 100) as u8;
        self.player.set_volume(target).await?;
        self.settings.volume = target;
        self.persist_settings().await;
        Ok(())
    }

    /// Replace any running timer; the previous one is cancelled on drop
    fn arm_timer(&mut self, minutes: u32, timer_tx: &mpsc::UnboundedSender<TimerEvent>) {
        let duration = Duration::from_secs(u64::from(minutes) * 60);
        self.timer = Some(SleepTimer::start(duration, timer_tx.clone()));
        self.timer_remaining = Some(duration);
    }

    async fn on_timer_event(&mut self, event: TimerEvent) -> VibesResult<()> {
        match event {
            TimerEvent::Tick { remaining } => {
                self.timer_remaining = Some(remaining);
            }
            TimerEvent::Expired => {
                info!("Sleep timer expired, pausing playback");
                self.player.pause().await?;
                self.timer = None;
                self.timer_minutes = 0;
                self.timer_remaining = None;
                self.status = Some("sleep timer done, playback paused".to_string());
            }
        }
        Ok(())
    }

    /// Returns false when the session should end
    fn on_player_event(&mut self, event: PlayerEvent) -> bool {
        match event {
            PlayerEvent::Ready => {
                self.status = None;
            }
            PlayerEvent::StateChanged(_) => {}
            PlayerEvent::PlaylistChanged { playlist_id } => {
                debug!("Playlist changed to {playlist_id}");
            }
            PlayerEvent::TrackInfo { title } => {
                self.track_title = Some(title);
            }
            PlayerEvent::Error(code) => {
                warn!("Player error: {}", code.message());
                self.status = Some(code.message().to_string());
            }
            PlayerEvent::Exited => {
                return false;
            }
        }
        true
    }

    fn redraw(&mut self, screen: &mut Screen) {
        let state = self.player.get_state();
        let frame = Frame {
            mood: self.mood,
            player: &state,
            ready: self.player.is_ready(),
            track_title: self.track_title.as_deref(),
            audio_only: self.settings.audio_only,
            timer_remaining: self.timer_remaining,
            timer_minutes: self.timer_minutes,
            status_line: self.status.as_deref(),
            show_help: self.show_help,
        };
        if let Err(e) = screen.draw(&frame) {
            debug!("Screen draw failed: {e}");
        }
    }

    async fn persist_settings(&mut self) {
        if let Err(e) = self.store.save(&self.settings).await {
            warn!("Failed to persist settings: {e}");
        }
        if let Err(e) = self.store.save_volume(self.settings.volume).await {
            warn!("Failed to persist volume: {e}");
        }
    }

    async fn shutdown(&mut self) {
        self.timer = None;
        self.persist_settings().await;
        if let Err(e) = self.player.destroy().await {
            warn!("Player shutdown: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerRuntime;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Always-connectable runtime recording the calls it receives
    struct StubRuntime {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl StubRuntime {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    #[async_trait]
    impl PlayerRuntime for StubRuntime {
        async fn is_available(&self) -> bool {
            true
        }

        async fn launch(&mut self) -> VibesResult<()> {
            Ok(())
        }

        async fn connect(&mut self) -> VibesResult<bool> {
            Ok(true)
        }

        async fn load_playlist(&self, playlist_id: &str, start_index: usize) -> VibesResult<()> {
            self.record(format!("load:{playlist_id}:{start_index}"));
            Ok(())
        }

        async fn set_paused(&self, paused: bool) -> VibesResult<()> {
            self.record(format!("pause:{paused}"));
            Ok(())
        }

        async fn next(&self) -> VibesResult<()> {
            Ok(())
        }

        async fn previous(&self) -> VibesResult<()> {
            Ok(())
        }

        async fn set_volume(&self, volume: u8) -> VibesResult<()> {
            self.record(format!("volume:{volume}"));
            Ok(())
        }

        async fn set_muted(&self, _muted: bool) -> VibesResult<()> {
            Ok(())
        }

        async fn set_quality(&self, _tier: QualityTier) -> VibesResult<()> {
            Ok(())
        }

        async fn shutdown(&mut self) -> VibesResult<()> {
            Ok(())
        }

        fn runtime_name(&self) -> &'static str {
            "stub"
        }
    }

    async fn session_over_stub(
        temp: &TempDir,
    ) -> (Session, Arc<Mutex<Vec<String>>>) {
        let store = SettingsStore::with_dir(temp.path().to_path_buf());
        let (stub, calls) = StubRuntime::new();
        let player = Player::new(Box::new(stub), Duration::from_millis(1), 5);
        let (_runtime_tx, runtime_rx) = mpsc::unbounded_channel();
        let session = Session::new(
            Config::default(),
            store,
            player,
            runtime_rx,
            SessionOptions {
                no_cache: true,
                ..SessionOptions::default()
            },
        )
        .await
        .unwrap();
        (session, calls)
    }

    fn loads(calls: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with("load:"))
            .cloned()
            .collect()
    }

    #[test]
    fn keymap_core_bindings() {
        assert_eq!(
            map_key(&press(KeyCode::Char(' '))),
            Some(Command::TogglePlayback)
        );
        assert_eq!(map_key(&press(KeyCode::Right)), Some(Command::NextTrack));
        assert_eq!(map_key(&press(KeyCode::Left)), Some(Command::PreviousTrack));
        assert_eq!(map_key(&press(KeyCode::Char('m'))), Some(Command::ToggleMute));
        assert_eq!(map_key(&press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('?'))), Some(Command::ToggleHelp));
        assert_eq!(map_key(&press(KeyCode::Esc)), Some(Command::DismissHelp));
    }

    #[test]
    fn keymap_volume_accepts_equals() {
        assert_eq!(map_key(&press(KeyCode::Char('+'))), Some(Command::VolumeUp));
        assert_eq!(map_key(&press(KeyCode::Char('='))), Some(Command::VolumeUp));
        assert_eq!(map_key(&press(KeyCode::Char('-'))), Some(Command::VolumeDown));
    }

    #[test]
    fn keymap_mood_digits() {
        assert_eq!(map_key(&press(KeyCode::Char('1'))), Some(Command::SelectMood(0)));
        assert_eq!(map_key(&press(KeyCode::Char('5'))), Some(Command::SelectMood(4)));
        assert_eq!(map_key(&press(KeyCode::Char('6'))), None);
        assert_eq!(map_key(&press(KeyCode::Char('0'))), None);
    }

    #[test]
    fn keymap_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&key), Some(Command::Quit));
    }

    #[test]
    fn keymap_ignores_release_events() {
        let mut key = press(KeyCode::Char(' '));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(&key), None);
    }

    #[test]
    fn timer_presets_cycle() {
        assert_eq!(next_timer_minutes(0), 15);
        assert_eq!(next_timer_minutes(15), 30);
        assert_eq!(next_timer_minutes(30), 45);
        assert_eq!(next_timer_minutes(45), 60);
        assert_eq!(next_timer_minutes(60), 0);
        // Unknown values restart the cycle
        assert_eq!(next_timer_minutes(7), 15);
    }

    #[tokio::test]
    async fn select_mood_switches_persists_and_schedules_autoplay() {
        let temp = TempDir::new().unwrap();
        let (mut session, calls) = session_over_stub(&temp).await;
        session.player.initialize().await.unwrap();
        let (timer_tx, _timer_rx) = mpsc::unbounded_channel();

        assert_eq!(session.mood().key, "lofi");
        session
            .dispatch(Command::SelectMood(4), &timer_tx)
            .await
            .unwrap();

        assert_eq!(session.mood().key, "jazz");
        assert_eq!(loads(&calls).len(), 1);
        // Playback starts only after the settle delay
        assert!(session.autoplay_at.is_some());

        let persisted = SettingsStore::with_dir(temp.path().to_path_buf())
            .load()
            .await;
        assert_eq!(persisted.mood, "jazz");
    }

    #[tokio::test]
    async fn select_mood_before_ready_defers_playlist_load() {
        let temp = TempDir::new().unwrap();
        let (mut session, calls) = session_over_stub(&temp).await;
        let (timer_tx, _timer_rx) = mpsc::unbounded_channel();

        session
            .dispatch(Command::SelectMood(4), &timer_tx)
            .await
            .unwrap();

        // The indicator and persisted key move; the load waits for ready
        assert_eq!(session.mood().key, "jazz");
        assert!(loads(&calls).is_empty());
        assert!(session.autoplay_at.is_none());

        let persisted = SettingsStore::with_dir(temp.path().to_path_buf())
            .load()
            .await;
        assert_eq!(persisted.mood, "jazz");
    }

    #[tokio::test]
    async fn reselecting_active_mood_does_not_reload() {
        let temp = TempDir::new().unwrap();
        let (mut session, calls) = session_over_stub(&temp).await;
        session.player.initialize().await.unwrap();
        let (timer_tx, _timer_rx) = mpsc::unbounded_channel();

        session
            .dispatch(Command::SelectMood(0), &timer_tx)
            .await
            .unwrap();

        assert_eq!(session.mood().key, "lofi");
        assert!(loads(&calls).is_empty());
        assert!(session.autoplay_at.is_none());
    }

    #[test]
    fn greeting_by_hour() {
        assert_eq!(greeting(6), "Good morning");
        assert_eq!(greeting(13), "Good afternoon");
        assert_eq!(greeting(19), "Good evening");
        assert_eq!(greeting(23), "Burning the midnight oil");
        assert_eq!(greeting(2), "Burning the midnight oil");
    }
}
