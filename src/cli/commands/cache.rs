//! Cache command - manage the offline asset cache

use crate::cache::{
    CacheStore, CacheWorker, HttpFetcher, ResponseSnapshot, RoutingTable, DYNAMIC_STORE,
    STATIC_STORE,
};
use crate::cli::args::{CacheAction, CacheArgs};
use crate::cli::commands::status::format_bytes;
use crate::config::schema::Config;
use crate::config::ConfigManager;
use crate::error::VibesResult;
use crate::ui::{self, UiContext, WarmProgress};
use chrono::Utc;
use console::style;
use std::sync::Arc;
use tracing::debug;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> VibesResult<()> {
    match args.action {
        CacheAction::Status => show_status().await,
        CacheAction::Warm => warm(config).await,
        CacheAction::Gc { days } => gc(config, days).await,
        CacheAction::Clear { yes } => clear(config, yes).await,
    }
}

async fn show_status() -> VibesResult<()> {
    let root = ConfigManager::cache_root();
    let mut any = false;

    for name in [STATIC_STORE, DYNAMIC_STORE] {
        let store = CacheStore::open(&root, name);
        let entries = store.entries().await?;
        if entries.is_empty() {
            continue;
        }
        any = true;

        println!("{}", style(name).bold());
        println!("{:<60} {:>10} {:<17}", "URL", "SIZE", "STORED");
        println!("{}", "-".repeat(89));
        for entry in &entries {
            let url = ui::shorten(&entry.url, 58);
            println!(
                "{:<60} {:>10} {:<17}",
                url,
                format_bytes(entry.size_bytes),
                entry.stored_at.format("%Y-%m-%d %H:%M")
            );
        }
        println!();
    }

    if !any {
        println!("Cache is empty. Run: vibes cache warm");
    }

    Ok(())
}

/// Fetch every shell asset into the static store, showing progress
async fn warm(config: &Config) -> VibesResult<()> {
    let ctx = UiContext::detect();
    let table = RoutingTable::new(&config.assets);
    let fetcher = HttpFetcher::new()?;
    let store = CacheStore::open(&ConfigManager::cache_root(), STATIC_STORE);

    let total = table.shell_urls().len();
    let progress = WarmProgress::new(&ctx, total as u64);
    let mut cached = 0;

    for url in table.shell_urls() {
        progress.on_asset(url);
        match fetcher_get(&fetcher, url).await {
            Some(snapshot) => {
                store.put(&snapshot).await?;
                cached += 1;
            }
            None => debug!("Skipping {url}"),
        }
    }
    progress.finish();

    if cached == total {
        ui::step_ok(&ctx, &format!("Cached {} shell assets", cached));
    } else {
        ui::step_warn_hint(
            &ctx,
            &format!("Cached {} of {} shell assets", cached, total),
            "Unreached assets fall back to the network",
        );
    }
    Ok(())
}

async fn fetcher_get(fetcher: &HttpFetcher, url: &str) -> Option<ResponseSnapshot> {
    use crate::cache::Fetcher;
    match fetcher.fetch(url).await {
        Ok(resp) if resp.ok() => Some(ResponseSnapshot {
            url: url.to_string(),
            status: resp.status,
            content_type: resp.content_type,
            body: resp.body,
        }),
        Ok(resp) => {
            debug!("{url} returned status {}", resp.status);
            None
        }
        Err(e) => {
            debug!("{url}: {e}");
            None
        }
    }
}

async fn gc(config: &Config, days_override: Option<u32>) -> VibesResult<()> {
    let ctx = UiContext::detect();
    let gc_days = days_override.unwrap_or(config.cache.gc_days);

    if gc_days == 0 {
        println!("Cache GC is disabled (gc_days = 0)");
        return Ok(());
    }

    let store = CacheStore::open(&ConfigManager::cache_root(), DYNAMIC_STORE);
    let cutoff = Utc::now() - chrono::Duration::days(i64::from(gc_days));
    let stale = store
        .entries()
        .await?
        .into_iter()
        .filter(|e| e.stored_at < cutoff)
        .count();

    if stale == 0 {
        println!("No cached entries older than {} days.", gc_days);
        return Ok(());
    }

    let removed = store.remove_older_than(gc_days).await?;
    ui::step_ok(&ctx, &format!("Removed {} stale entries", removed));
    Ok(())
}

async fn clear(config: &Config, yes: bool) -> VibesResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let root = ConfigManager::cache_root();

    let mut total = 0;
    for name in [STATIC_STORE, DYNAMIC_STORE] {
        total += CacheStore::open(&root, name).entries().await?.len();
    }
    if total == 0 {
        println!("Cache is already empty.");
        return Ok(());
    }

    if !ui::confirm(
        &ctx,
        &format!("Remove {} cached entries?", total),
        false,
    )
    .await?
    {
        println!("Aborted.");
        return Ok(());
    }

    let mut worker = CacheWorker::new(
        root,
        Arc::new(HttpFetcher::new()?),
        RoutingTable::new(&config.assets),
    );
    worker.clear().await?;
    ui::step_ok(&ctx, &format!("Cleared {} entries", total));
    Ok(())
}
