//! Moods command - list the catalog

use crate::catalog::MOODS;
use crate::error::VibesResult;
use crate::settings::SettingsStore;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the moods command
pub async fn execute() -> VibesResult<()> {
    let ctx = UiContext::detect();
    let current = SettingsStore::new().load().await.mood;

    println!("{}", style("Available moods").bold());
    println!();

    for mood in MOODS {
        let marker = if mood.key == current {
            style("●").green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {} {:<10} {}",
            marker,
            mood.icon,
            style(mood.key).bold(),
            style(mood.description).dim()
        );
    }

    println!();
    ui::remark(&ctx, "Run: vibes play <mood>");
    Ok(())
}
