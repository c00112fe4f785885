mod import;
mod memory_store;
mod models;
mod schema;
mod store;
mod trait_def;
mod validation;

pub use import::{GearBundle, ImportSummary};
pub use memory_store::InMemoryGearStore;
pub use models::*;
pub use schema::GEAR_VERSIONED_SCHEMAS;
pub use store::SqliteGearStore;
pub use trait_def::{GearStore, WritableGearStore};
pub use validation::{
    validate_amp, validate_guitar, validate_song, validate_tone, ValidationError,
    ValidationResult,
};
