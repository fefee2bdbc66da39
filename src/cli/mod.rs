//! CLI argument parsing and command dispatch

mod args;
pub mod commands;

pub use args::{CacheAction, CacheArgs, Cli, Commands, ConfigAction, ConfigArgs, PlayArgs};
