//! Mood catalog
//!
//! Static table mapping each study mood to its curated playlist, background
//! loop, and accent colors. Immutable, defined at startup.

use console::Color;

/// Key of the mood selected when nothing is persisted or the persisted
/// key is unknown.
pub const DEFAULT_MOOD: &str = "lofi";

/// A named ambience preset bundling a playlist, background, and color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mood {
    /// Unique key, used in settings and on the CLI
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Accent color (hex, as themed in the shell assets)
    pub accent: &'static str,
    /// Nearest terminal color for the accent
    pub terminal_color: Color,
    /// Icon glyph
    pub icon: &'static str,
    /// External playlist identifier
    pub playlist_id: &'static str,
    /// Background loop asset filename (under `bg/`)
    pub background: &'static str,
    /// Fallback gradient stops, used when the background asset fails
    pub fallback_gradient: (&'static str, &'static str),
}

/// All moods, in display order.
pub const MOODS: &[Mood] = &[
    Mood {
        key: "lofi",
        name: "Lo-Fi Hip Hop",
        description: "Chill beats to study/relax to",
        accent: "#6366f1",
        terminal_color: Color::Blue,
        icon: "🎵",
        playlist_id: "PLOzDu-MXXLliO9fBNZOQTBDddoA3FzZUo",
        background: "lofi.mp4",
        fallback_gradient: ("#667eea", "#764ba2"),
    },
    Mood {
        key: "classical",
        name: "Classical Focus",
        description: "Timeless compositions for deep work",
        accent: "#8b5cf6",
        terminal_color: Color::Magenta,
        icon: "🎼",
        playlist_id: "PL2788304DC59DBEB4",
        background: "classical.mp4",
        fallback_gradient: ("#f093fb", "#f5576c"),
    },
    Mood {
        key: "synth",
        name: "Synthwave",
        description: "Retro electronic vibes",
        accent: "#ec4899",
        terminal_color: Color::Red,
        icon: "🌆",
        playlist_id: "PLOtNYlNIGer0jmWpFtTWqMkfP56iuZg1w",
        background: "synth.mp4",
        fallback_gradient: ("#4facfe", "#00f2fe"),
    },
    Mood {
        key: "nature",
        name: "Nature Sounds",
        description: "Forest, rain, and ocean ambience",
        accent: "#10b981",
        terminal_color: Color::Green,
        icon: "🌿",
        playlist_id: "PL1F7117E03613D657",
        background: "nature.mp4",
        fallback_gradient: ("#43e97b", "#38f9d7"),
    },
    Mood {
        key: "jazz",
        name: "Smooth Jazz",
        description: "Mellow jazz for concentration",
        accent: "#f59e0b",
        terminal_color: Color::Yellow,
        icon: "🎷",
        playlist_id: "PL-Ib9oOPR7OHKLBFVkiq0F0rppCZ7YFLp",
        background: "jazz.mp4",
        fallback_gradient: ("#fa709a", "#fee140"),
    },
];

/// Look up a mood by key.
pub fn resolve(key: &str) -> Option<&'static Mood> {
    MOODS.iter().find(|m| m.key == key)
}

/// The default mood. The table always contains it.
pub fn default_mood() -> &'static Mood {
    resolve(DEFAULT_MOOD).expect("default mood present in catalog")
}
