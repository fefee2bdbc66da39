//! Study Vibes Radio
//!
//! Mood-based ambient music for studying. Curated playlists play through
//! mpv, with a sleep timer, persisted listening settings, and an offline
//! cache for the app's shell assets.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod player;
pub mod session;
pub mod settings;
pub mod timer;
pub mod ui;

pub use error::{VibesError, VibesResult};
