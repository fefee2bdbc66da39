//! Status command - check player and cache health

use crate::cache::{self, CacheStore, DYNAMIC_STORE, STATIC_STORE};
use crate::config::schema::Config;
use crate::config::ConfigManager;
use crate::error::VibesResult;
use console::{style, Emoji};
use std::process::Stdio;
use tokio::process::Command;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static WARN: Emoji<'_, '_> = Emoji("⚠ ", "[WARN] ");

/// Execute the status command
pub async fn execute(config: &Config) -> VibesResult<()> {
    println!("{}", style("Study Vibes Status").bold().magenta());
    println!();

    let mut all_ok = true;

    println!("{}", style("Player:").bold());
    all_ok &= check_mpv(&config.player.binary).await;

    println!();
    println!("{}", style("Configuration:").bold());
    let config_path = ConfigManager::default_config_path();
    if config_path.exists() {
        println!("  {} {}", CHECK, config_path.display());
    } else {
        println!(
            "  {} {} - Run: vibes config init",
            WARN,
            style("Using defaults (no config file)").yellow()
        );
    }

    println!();
    println!("{}", style("Offline cache:").bold());
    if config.cache.enabled {
        show_cache_summary().await?;
    } else {
        println!("  {} {}", WARN, style("Disabled in config").yellow());
    }

    println!();
    if all_ok {
        println!("{}", style("Ready to play").green().bold());
    } else {
        println!(
            "{}",
            style("Some checks failed - see above for details")
                .yellow()
                .bold()
        );
    }

    Ok(())
}

async fn check_mpv(binary: &str) -> bool {
    let result = Command::new(binary)
        .arg("--version")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("unknown")
                .to_string();
            println!("  {} {}", CHECK, version);
            true
        }
        Ok(_) => {
            println!(
                "  {} {} exited with an error",
                CROSS,
                style(binary).red()
            );
            false
        }
        Err(_) => {
            println!(
                "  {} {} - Install mpv and make sure it is on your PATH",
                CROSS,
                style(format!("{} not found", binary)).red()
            );
            false
        }
    }
}

async fn show_cache_summary() -> VibesResult<()> {
    let root = ConfigManager::cache_root();

    for name in [STATIC_STORE, DYNAMIC_STORE] {
        let store = CacheStore::open(&root, name);
        let entries = store.entries().await?;
        let bytes: u64 = entries.iter().map(|e| e.size_bytes).sum();
        if entries.is_empty() {
            println!("  {} {}: empty - Run: vibes cache warm", WARN, name);
        } else {
            println!(
                "  {} {}: {} entries, {}",
                CHECK,
                name,
                entries.len(),
                format_bytes(bytes)
            );
        }
    }

    match cache::controller_version(&root).await {
        Some(version) => println!("  {} controller: {}", CHECK, version),
        None => println!("  {} controller: not claimed", WARN),
    }

    Ok(())
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
