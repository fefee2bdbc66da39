//! mpv-backed player runtime
//!
//! Spawns mpv idle with a JSON IPC socket and drives it with
//! `set_property`/`loadfile` commands. Property observation is push-based:
//! after connecting we register `observe_property` for pause, core-idle,
//! playlist-pos, and media-title, and mpv sends a `property-change` event
//! whenever a value changes. The reader task forwards those to the adapter
//! as [`RuntimeEvent`]s.

use crate::config::schema::PlayerConfig;
use crate::config::ConfigManager;
use crate::error::{VibesError, VibesResult};
use crate::player::runtime::{PlayerRuntime, QualityTier, RuntimeEvent};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::UnixStream;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

const OBS_PAUSE: u64 = 1;
const OBS_CORE_IDLE: u64 = 2;
const OBS_PLAYLIST_POS: u64 = 3;
const OBS_MEDIA_TITLE: u64 = 4;

/// Player runtime driving an external mpv process over JSON IPC
pub struct MpvRuntime {
    binary: String,
    extra_args: Vec<String>,
    socket_path: PathBuf,
    child: Option<Child>,
    writer: Option<Arc<Mutex<OwnedWriteHalf>>>,
    event_tx: mpsc::UnboundedSender<RuntimeEvent>,
    reader_task: Option<tokio::task::JoinHandle<()>>,
}

impl MpvRuntime {
    /// Create a new mpv runtime. Events observed from the player are
    /// forwarded on `event_tx`.
    pub fn new(config: &PlayerConfig, event_tx: mpsc::UnboundedSender<RuntimeEvent>) -> Self {
        let socket_path =
            ConfigManager::runtime_dir().join(format!("study-vibes-{}.sock", std::process::id()));

        Self {
            binary: config.binary.clone(),
            extra_args: config.extra_args.clone(),
            socket_path,
            child: None,
            writer: None,
            event_tx,
            reader_task: None,
        }
    }

    /// Send one IPC command line to mpv
    async fn command(&self, args: Value) -> VibesResult<()> {
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| VibesError::PlayerIpc("not connected".to_string()))?;

        let mut line = json!({ "command": args }).to_string();
        line.push('\n');
        debug!("mpv ipc: {}", line.trim_end());

        let mut guard = writer.lock().await;
        guard
            .write_all(line.as_bytes())
            .await
            .map_err(|e| VibesError::PlayerIpc(format!("write failed: {e}")))
    }

    async fn set_property(&self, name: &str, value: Value) -> VibesResult<()> {
        self.command(json!(["set_property", name, value])).await
    }

    /// Register property observation after a fresh connection
    async fn observe_properties(&self) -> VibesResult<()> {
        self.command(json!(["observe_property", OBS_PAUSE, "pause"]))
            .await?;
        self.command(json!(["observe_property", OBS_CORE_IDLE, "core-idle"]))
            .await?;
        self.command(json!(["observe_property", OBS_PLAYLIST_POS, "playlist-pos"]))
            .await?;
        self.command(json!(["observe_property", OBS_MEDIA_TITLE, "media-title"]))
            .await
    }
}

#[async_trait]
impl PlayerRuntime for MpvRuntime {
    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn launch(&mut self) -> VibesResult<()> {
        // Stale socket from a previous crash would make connect succeed
        // against nothing
        let _ = tokio::fs::remove_file(&self.socket_path).await;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--idle=yes")
            .arg(format!("--input-ipc-server={}", self.socket_path.display()))
            .arg("--no-terminal")
            .arg("--really-quiet")
            .arg("--force-window=no")
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        debug!("Spawning player: {} {:?}", self.binary, self.extra_args);

        let child = cmd
            .spawn()
            .map_err(|e| VibesError::command_failed(self.binary.clone(), e))?;
        self.child = Some(child);
        Ok(())
    }

    async fn connect(&mut self) -> VibesResult<bool> {
        let stream = match UnixStream::connect(&self.socket_path).await {
            Ok(s) => s,
            Err(_) => return Ok(false),
        };

        let (read_half, write_half) = stream.into_split();
        self.writer = Some(Arc::new(Mutex::new(write_half)));

        let event_tx = self.event_tx.clone();
        let task = tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(event) = parse_ipc_line(&line) {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
            let _ = event_tx.send(RuntimeEvent::Exited);
        });
        self.reader_task = Some(task);

        self.observe_properties().await?;
        Ok(true)
    }

    async fn load_playlist(&self, playlist_id: &str, start_index: usize) -> VibesResult<()> {
        let url = format!("https://www.youtube.com/playlist?list={playlist_id}");
        self.command(json!(["loadfile", url, "replace"])).await?;
        if start_index > 0 {
            self.set_property("playlist-pos", json!(start_index)).await?;
        }
        Ok(())
    }

    async fn set_paused(&self, paused: bool) -> VibesResult<()> {
        self.set_property("pause", json!(paused)).await
    }

    async fn next(&self) -> VibesResult<()> {
        self.command(json!(["playlist-next", "weak"])).await
    }

    async fn previous(&self) -> VibesResult<()> {
        self.command(json!(["playlist-prev", "weak"])).await
    }

    async fn set_volume(&self, volume: u8) -> VibesResult<()> {
        self.set_property("volume", json!(volume)).await
    }

    async fn set_muted(&self, muted: bool) -> VibesResult<()> {
        self.set_property("mute", json!(muted)).await
    }

    async fn set_quality(&self, tier: QualityTier) -> VibesResult<()> {
        let (format, vid) = match tier {
            QualityTier::Default => ("bestvideo[height<=?1080]+bestaudio/best", "auto"),
            QualityTier::Lowest => ("worst[height<=240]/bestaudio", "no"),
        };
        self.set_property("ytdl-format", json!(format)).await?;
        // Takes effect immediately, format applies from the next load
        self.set_property("vid", json!(vid)).await
    }

    async fn shutdown(&mut self) -> VibesResult<()> {
        if self.writer.is_some() {
            let _ = self.command(json!(["quit"])).await;
        }
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
        if let Some(mut child) = self.child.take() {
            let _ = child.kill().await;
        }
        let _ = tokio::fs::remove_file(&self.socket_path).await;
        self.writer = None;
        Ok(())
    }

    fn runtime_name(&self) -> &'static str {
        "mpv"
    }
}

/// Parse one IPC line from mpv into a runtime event.
///
/// Command responses (`{"error": ...}` with a request id) carry nothing the
/// adapter tracks; failures are logged and dropped.
fn parse_ipc_line(line: &str) -> Option<RuntimeEvent> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(_) => return None,
    };

    let event = value.get("event").and_then(Value::as_str);

    match event {
        Some("property-change") => {
            let id = value.get("id").and_then(Value::as_u64)?;
            let data = value.get("data");
            match id {
                OBS_PAUSE => {
                    let paused = data.and_then(Value::as_bool)?;
                    Some(RuntimeEvent::StateChanged { playing: !paused })
                }
                OBS_CORE_IDLE => {
                    // core-idle flips true while the demuxer stalls
                    if data.and_then(Value::as_bool) == Some(true) {
                        Some(RuntimeEvent::Buffering)
                    } else {
                        None
                    }
                }
                OBS_PLAYLIST_POS => {
                    let index = data.and_then(Value::as_u64)?;
                    Some(RuntimeEvent::TrackChanged {
                        index: index as usize,
                    })
                }
                OBS_MEDIA_TITLE => {
                    let title = data.and_then(Value::as_str)?.trim();
                    if title.is_empty() {
                        None
                    } else {
                        Some(RuntimeEvent::TitleChanged {
                            title: title.to_string(),
                        })
                    }
                }
                _ => None,
            }
        }
        Some("end-file") => {
            let reason = value.get("reason").and_then(Value::as_str).unwrap_or("");
            if reason == "error" {
                let message = value
                    .get("file_error")
                    .and_then(Value::as_str)
                    .unwrap_or("playback failed")
                    .to_string();
                Some(RuntimeEvent::Error { code: -1, message })
            } else {
                None
            }
        }
        Some(_) => None,
        None => {
            if let Some(err) = value.get("error").and_then(Value::as_str) {
                if err != "success" {
                    warn!("mpv command failed: {err}");
                }
            }
            None
        }
    }
}

impl Drop for MpvRuntime {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
