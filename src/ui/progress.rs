//! Progress indicators with CI fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};

/// Seeding progress for cache warm-up.
///
/// Shows an indicatif bar counting cached assets in interactive mode, or
/// plain text in CI.
pub struct WarmProgress {
    bar: Option<ProgressBar>,
}

impl WarmProgress {
    pub fn new(ctx: &UiContext, total: u64) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {spinner:.magenta} Caching shell  {bar:20.magenta/dim} {pos}/{len} {msg:.dim}")
                    .unwrap()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                    .progress_chars("━╸─"),
            );
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Caching {} shell assets...", total);
            None
        };
        Self { bar }
    }

    pub fn on_asset(&self, url: &str) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
            bar.set_message(shorten(url, 50));
        } else {
            println!("  {}", url);
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

/// Truncate to at most `max` characters with a `...` tail. Counts chars,
/// not bytes, so multibyte URLs never split inside a code point.
pub fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
