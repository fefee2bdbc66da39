//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::schema::Config;
use crate::config::ConfigManager;
use crate::error::{VibesError, VibesResult};
use crate::ui::{self, UiContext};

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> VibesResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config),
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) {
    let toml =
        toml::to_string_pretty(config).unwrap_or_else(|_| "Error serializing config".to_string());
    println!("{}", toml);
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> VibesResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    let config = Config::default();
    manager.save(&config).await?;

    ui::step_ok(
        &ctx,
        &format!("Configuration initialized at {}", path.display()),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> VibesResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    // Parse dot-separated key path
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => config.general.log_format = value.to_string(),

        ["player", "binary"] => config.player.binary = value.to_string(),
        ["player", "ready_poll_ms"] => config.player.ready_poll_ms = parse_u64(value)?,
        ["player", "ready_max_attempts"] => config.player.ready_max_attempts = parse_u32(value)?,
        ["player", "autoplay_delay_ms"] => config.player.autoplay_delay_ms = parse_u64(value)?,

        ["assets", "base_url"] => config.assets.base_url = value.to_string(),
        ["assets", "fonts_url"] => config.assets.fonts_url = value.to_string(),
        ["assets", "bootstrap_url"] => config.assets.bootstrap_url = value.to_string(),

        ["cache", "enabled"] => config.cache.enabled = parse_bool(value)?,
        ["cache", "gc_days"] => config.cache.gc_days = parse_u32(value)?,

        ["session", "greeting"] => config.session.greeting = parse_bool(value)?,
        ["session", "force_audio_only"] => config.session.force_audio_only = parse_bool(value)?,

        _ => {
            ui::remark(&ctx, "Valid keys:");
            print_valid_keys();
            return Err(VibesError::ConfigKeyUnknown(key.to_string()));
        }
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

fn parse_bool(value: &str) -> VibesResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(VibesError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u32(value: &str) -> VibesResult<u32> {
    value
        .parse()
        .map_err(|_| VibesError::User(format!("Invalid number: {}", value)))
}

fn parse_u64(value: &str) -> VibesResult<u64> {
    value
        .parse()
        .map_err(|_| VibesError::User(format!("Invalid number: {}", value)))
}

fn print_valid_keys() {
    let keys = [
        "general.verbose",
        "general.log_format",
        "player.binary",
        "player.ready_poll_ms",
        "player.ready_max_attempts",
        "player.autoplay_delay_ms",
        "assets.base_url",
        "assets.fonts_url",
        "assets.bootstrap_url",
        "cache.enabled",
        "cache.gc_days",
        "session.greeting",
        "session.force_audio_only",
    ];

    for key in keys {
        eprintln!("  {}", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(parse_u32("50").unwrap(), 50);
        assert_eq!(parse_u64("1000").unwrap(), 1000);
        assert!(parse_u32("fast").is_err());
    }
}
