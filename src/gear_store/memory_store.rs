//! In-memory gear store.
//!
//! Holds records in maps behind a `RwLock`. Used wherever a database is not
//! wanted: unit tests of the matching engine and router tests.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::models::{Amp, Guitar, Song, Tone, ToneRecord};
use super::trait_def::{GearStore, WritableGearStore};
use super::validation::{validate_amp, validate_guitar, validate_song, validate_tone};

#[derive(Default)]
struct Records {
    songs: HashMap<String, Song>,
    guitars: HashMap<String, Guitar>,
    amps: HashMap<String, Amp>,
    tones: HashMap<String, Tone>,
}

#[derive(Default)]
pub struct InMemoryGearStore {
    records: RwLock<Records>,
}

impl InMemoryGearStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_records(&self) -> Result<std::sync::RwLockReadGuard<'_, Records>> {
        self.records
            .read()
            .map_err(|_| anyhow!("In-memory gear store lock poisoned"))
    }

    fn write_records(&self) -> Result<std::sync::RwLockWriteGuard<'_, Records>> {
        self.records
            .write()
            .map_err(|_| anyhow!("In-memory gear store lock poisoned"))
    }
}

#[async_trait]
impl GearStore for InMemoryGearStore {
    async fn get_tone(&self, id: &str) -> Result<Option<ToneRecord>> {
        let records = self.read_records()?;
        Ok(records.tones.get(id).map(|tone| ToneRecord {
            reference_guitar: tone
                .reference_guitar_id
                .as_ref()
                .and_then(|gid| records.guitars.get(gid).cloned()),
            reference_amp: tone
                .reference_amp_id
                .as_ref()
                .and_then(|aid| records.amps.get(aid).cloned()),
            tone: tone.clone(),
        }))
    }

    async fn get_guitar(&self, id: &str) -> Result<Option<Guitar>> {
        Ok(self.read_records()?.guitars.get(id).cloned())
    }

    async fn get_amp(&self, id: &str) -> Result<Option<Amp>> {
        Ok(self.read_records()?.amps.get(id).cloned())
    }
}

impl WritableGearStore for InMemoryGearStore {
    fn insert_song(&self, song: &Song) -> Result<()> {
        validate_song(song)?;
        let mut records = self.write_records()?;
        if records.songs.contains_key(&song.id) {
            bail!("Song with id '{}' already exists", song.id);
        }
        records.songs.insert(song.id.clone(), song.clone());
        Ok(())
    }

    fn insert_guitar(&self, guitar: &Guitar) -> Result<()> {
        validate_guitar(guitar)?;
        let mut records = self.write_records()?;
        if records.guitars.contains_key(&guitar.id) {
            bail!("Guitar with id '{}' already exists", guitar.id);
        }
        records.guitars.insert(guitar.id.clone(), guitar.clone());
        Ok(())
    }

    fn insert_amp(&self, amp: &Amp) -> Result<()> {
        validate_amp(amp)?;
        let mut records = self.write_records()?;
        if records.amps.contains_key(&amp.id) {
            bail!("Amp with id '{}' already exists", amp.id);
        }
        records.amps.insert(amp.id.clone(), amp.clone());
        Ok(())
    }

    fn insert_tone(&self, tone: &Tone) -> Result<()> {
        validate_tone(tone)?;
        let mut records = self.write_records()?;
        if records.tones.contains_key(&tone.id) {
            bail!("Tone with id '{}' already exists", tone.id);
        }
        if !records.songs.contains_key(&tone.song_id) {
            bail!("Tone '{}' references unknown song '{}'", tone.id, tone.song_id);
        }
        if let Some(guitar_id) = &tone.reference_guitar_id {
            if !records.guitars.contains_key(guitar_id) {
                bail!("Tone '{}' references unknown guitar '{}'", tone.id, guitar_id);
            }
        }
        if let Some(amp_id) = &tone.reference_amp_id {
            if !records.amps.contains_key(amp_id) {
                bail!("Tone '{}' references unknown amp '{}'", tone.id, amp_id);
            }
        }
        records.tones.insert(tone.id.clone(), tone.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn make_tone(id: &str, song_id: &str) -> Tone {
        Tone {
            id: id.to_string(),
            song_id: song_id.to_string(),
            name: "Verse".to_string(),
            reference_guitar_id: None,
            reference_amp_id: None,
            reference_position: None,
            reference_voice: None,
            base_settings: BTreeMap::new(),
            confidence: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_tone() {
        let store = InMemoryGearStore::new();
        store
            .insert_song(&Song {
                id: "s1".to_string(),
                title: "Title".to_string(),
                artist: "Artist".to_string(),
            })
            .unwrap();
        store.insert_tone(&make_tone("t1", "s1")).unwrap();

        let record = store.get_tone("t1").await.unwrap().unwrap();
        assert_eq!(record.tone.id, "t1");
        assert!(record.reference_guitar.is_none());
        assert!(record.reference_amp.is_none());
    }

    #[test]
    fn test_insert_tone_requires_song() {
        let store = InMemoryGearStore::new();
        let err = store.insert_tone(&make_tone("t1", "missing")).unwrap_err();
        assert!(err.to_string().contains("unknown song"));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemoryGearStore::new();
        assert!(store.get_guitar("x").await.unwrap().is_none());
        assert!(store.get_amp("x").await.unwrap().is_none());
        assert!(store.get_tone("x").await.unwrap().is_none());
    }
}
