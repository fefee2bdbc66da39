//! Player module
//!
//! Wraps the external playback widget (mpv) behind a readiness-aware
//! adapter:
//! - the [`PlayerRuntime`] trait is the seam to the external process;
//! - [`MpvRuntime`] drives mpv over its JSON IPC socket;
//! - [`Player`] owns the state mirror and the readiness state machine.

mod adapter;
mod mpv;
mod runtime;

pub use adapter::{Player, PlayerErrorCode, PlayerEvent, PlayerState, ReadyState};
pub use mpv::MpvRuntime;
pub use runtime::{PlayerRuntime, QualityTier, RuntimeEvent};
