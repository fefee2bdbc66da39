//! Play command - start an interactive listening session

use crate::cli::args::PlayArgs;
use crate::config::schema::Config;
use crate::error::VibesResult;
use crate::player::{MpvRuntime, Player};
use crate::session::{greeting, Session, SessionOptions};
use crate::settings::SettingsStore;
use crate::ui::{self, UiContext};
use chrono::{Local, Timelike};
use std::time::Duration;
use tokio::sync::mpsc;

/// Execute the play command
pub async fn execute(args: PlayArgs, config: &Config) -> VibesResult<()> {
    let ctx = UiContext::detect();

    if config.session.greeting {
        ui::intro(
            &ctx,
            &format!("{}! Study Vibes Radio", greeting(Local::now().hour())),
        );
    }

    let (runtime_tx, runtime_rx) = mpsc::unbounded_channel();
    let runtime = MpvRuntime::new(&config.player, runtime_tx);
    let player = Player::new(
        Box::new(runtime),
        Duration::from_millis(config.player.ready_poll_ms),
        config.player.ready_max_attempts,
    );

    let options = SessionOptions {
        mood: args.mood,
        audio_only: args.audio_only.then_some(true),
        timer_minutes: args.timer,
        no_cache: args.no_cache,
    };

    let mut session = Session::new(
        config.clone(),
        SettingsStore::new(),
        player,
        runtime_rx,
        options,
    )
    .await?;

    match session.run().await {
        Ok(()) => {
            ui::outro_success(&ctx, "Stay focused");
            Ok(())
        }
        Err(e) if e.is_degradable() => {
            ui::outro_warn(&ctx, &e.to_string());
            Ok(())
        }
        Err(e) => Err(e),
    }
}
