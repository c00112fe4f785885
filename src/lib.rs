//! Tone Match Server Library
//!
//! Gear catalog storage and the matching engine that adapts a recorded
//! reference tone to a different guitar and amplifier.

pub mod config;
pub mod gear_store;
pub mod matching;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use gear_store::{GearStore, InMemoryGearStore, SqliteGearStore, WritableGearStore};
pub use matching::{MatchError, MatchPreview, MatchPreviewService, MatchRequest, Registries};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
