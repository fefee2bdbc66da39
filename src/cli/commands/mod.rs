//! CLI command implementations

pub mod cache;
pub mod config;
pub mod moods;
pub mod play;
pub mod status;

pub use cache::execute as cache;
pub use config::execute as config;
pub use moods::execute as moods;
pub use play::execute as play;
pub use status::execute as status;
