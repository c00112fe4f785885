//! Bulk seeding of a gear store from a JSON bundle.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use super::models::{Amp, Guitar, Song, Tone};
use super::trait_def::WritableGearStore;
use super::validation::{validate_amp, validate_guitar, validate_song, validate_tone};

/// A set of records to load in one go.
#[derive(Debug, Default, Deserialize)]
pub struct GearBundle {
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub guitars: Vec<Guitar>,
    #[serde(default)]
    pub amps: Vec<Amp>,
    #[serde(default)]
    pub tones: Vec<Tone>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub songs: usize,
    pub guitars: usize,
    pub amps: usize,
    pub tones: usize,
}

impl GearBundle {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read gear bundle {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse gear bundle {:?}", path))
    }

    /// Validates every record up front so that a bad bundle writes nothing.
    pub fn validate(&self) -> Result<()> {
        for song in &self.songs {
            validate_song(song).with_context(|| format!("Invalid song '{}'", song.id))?;
        }
        for guitar in &self.guitars {
            validate_guitar(guitar).with_context(|| format!("Invalid guitar '{}'", guitar.id))?;
        }
        for amp in &self.amps {
            validate_amp(amp).with_context(|| format!("Invalid amp '{}'", amp.id))?;
        }
        for tone in &self.tones {
            validate_tone(tone).with_context(|| format!("Invalid tone '{}'", tone.id))?;
        }
        Ok(())
    }

    /// Inserts the bundle. Songs and gear go first so that tones can reference them.
    pub fn import_into(&self, store: &dyn WritableGearStore) -> Result<ImportSummary> {
        self.validate()?;

        for song in &self.songs {
            store.insert_song(song)?;
        }
        for guitar in &self.guitars {
            store.insert_guitar(guitar)?;
        }
        for amp in &self.amps {
            store.insert_amp(amp)?;
        }
        for tone in &self.tones {
            store.insert_tone(tone)?;
        }

        let summary = ImportSummary {
            songs: self.songs.len(),
            guitars: self.guitars.len(),
            amps: self.amps.len(),
            tones: self.tones.len(),
        };
        info!(
            "Imported {} songs, {} guitars, {} amps, {} tones",
            summary.songs, summary.guitars, summary.amps, summary.tones
        );
        Ok(summary)
    }
}
