//! UI module for consistent CLI output
//!
//! Uses `cliclack` for interactive prompts with automatic fallback to
//! plain output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use study_vibes::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect();
//!
//! ui::intro(&ctx, "Study Vibes Radio");
//! ui::step_ok(&ctx, "Shell assets cached");
//! ui::outro_success(&ctx, "Done");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{intro, outro_success, outro_warn, remark, step_ok, step_warn_hint};
pub use progress::{shorten, WarmProgress};
pub use prompts::confirm;
pub use theme::{init_theme, VibesTheme};
