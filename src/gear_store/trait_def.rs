//! GearStore trait definition.
//!
//! The matching engine only needs a narrow read capability, so the read side
//! and the write side (used by seeding/CRUD tooling) are separate traits.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Amp, Guitar, Song, Tone, ToneRecord};

/// Read-only access to gear records.
#[async_trait]
pub trait GearStore: Send + Sync {
    /// Get a tone by ID, joined with its reference guitar and amp.
    async fn get_tone(&self, id: &str) -> Result<Option<ToneRecord>>;

    /// Get a guitar by ID.
    async fn get_guitar(&self, id: &str) -> Result<Option<Guitar>>;

    /// Get an amp by ID.
    async fn get_amp(&self, id: &str) -> Result<Option<Amp>>;
}

/// Extension trait for stores that accept typed inserts.
pub trait WritableGearStore: GearStore {
    fn insert_song(&self, song: &Song) -> Result<()>;

    fn insert_guitar(&self, guitar: &Guitar) -> Result<()>;

    fn insert_amp(&self, amp: &Amp) -> Result<()>;

    /// Insert a tone. The song and any referenced gear must already exist.
    fn insert_tone(&self, tone: &Tone) -> Result<()>;
}
