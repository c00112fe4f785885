//! SQLite-backed gear store.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use super::models::{Amp, AmpFamily, Guitar, Song, Tone, ToneRecord};
use super::schema::GEAR_VERSIONED_SCHEMAS;
use super::trait_def::{GearStore, WritableGearStore};
use super::validation::{validate_amp, validate_guitar, validate_song, validate_tone};
use crate::sqlite_persistence::migrate_if_needed;

#[derive(Clone)]
pub struct SqliteGearStore {
    conn: Arc<Mutex<Connection>>,
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("Gear database connection mutex poisoned"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("Failed to serialize column value")
}

fn from_json<T: serde::de::DeserializeOwned>(column: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).with_context(|| format!("Malformed JSON in column {}", column))
}

fn from_optional_json<T: serde::de::DeserializeOwned>(
    column: &str,
    text: Option<String>,
) -> Result<Option<T>> {
    text.map(|t| from_json(column, &t)).transpose()
}

// Raw rows are read with rusqlite and decoded afterwards, so that JSON errors
// surface as anyhow errors with the column name attached.

struct GuitarRow {
    id: String,
    brand: String,
    model: String,
    pickups_json: String,
    selector_json: Option<String>,
    controls_json: Option<String>,
    layout_code: Option<String>,
}

impl GuitarRow {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(GuitarRow {
            id: row.get(0)?,
            brand: row.get(1)?,
            model: row.get(2)?,
            pickups_json: row.get(3)?,
            selector_json: row.get(4)?,
            controls_json: row.get(5)?,
            layout_code: row.get(6)?,
        })
    }

    fn decode(self) -> Result<Guitar> {
        Ok(Guitar {
            pickups: from_json("pickups_json", &self.pickups_json)?,
            selector: from_optional_json("selector_json", self.selector_json)?,
            controls: from_optional_json("controls_json", self.controls_json)?,
            id: self.id,
            brand: self.brand,
            model: self.model,
            layout_code: self.layout_code,
        })
    }
}

struct AmpRow {
    id: String,
    brand: String,
    model: String,
    amp_family: Option<String>,
    is_tube: bool,
    channels_json: String,
    controls_json: String,
}

impl AmpRow {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(AmpRow {
            id: row.get(0)?,
            brand: row.get(1)?,
            model: row.get(2)?,
            amp_family: row.get(3)?,
            is_tube: row.get::<_, i64>(4)? != 0,
            channels_json: row.get(5)?,
            controls_json: row.get(6)?,
        })
    }

    fn decode(self) -> Result<Amp> {
        Ok(Amp {
            channels: from_json("channels_json", &self.channels_json)?,
            controls: from_json("controls_json", &self.controls_json)?,
            amp_family: self.amp_family.as_deref().map(AmpFamily::from_db_str),
            id: self.id,
            brand: self.brand,
            model: self.model,
            is_tube: self.is_tube,
        })
    }
}

struct ToneRow {
    id: String,
    song_id: String,
    name: String,
    reference_guitar_id: Option<String>,
    reference_amp_id: Option<String>,
    reference_position: Option<String>,
    reference_voice_json: Option<String>,
    base_settings_json: String,
    confidence_json: Option<String>,
}

impl ToneRow {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(ToneRow {
            id: row.get(0)?,
            song_id: row.get(1)?,
            name: row.get(2)?,
            reference_guitar_id: row.get(3)?,
            reference_amp_id: row.get(4)?,
            reference_position: row.get(5)?,
            reference_voice_json: row.get(6)?,
            base_settings_json: row.get(7)?,
            confidence_json: row.get(8)?,
        })
    }

    fn decode(self) -> Result<Tone> {
        Ok(Tone {
            reference_voice: from_optional_json("reference_voice_json", self.reference_voice_json)?,
            base_settings: from_json("base_settings_json", &self.base_settings_json)?,
            confidence: from_optional_json("confidence_json", self.confidence_json)?,
            id: self.id,
            song_id: self.song_id,
            name: self.name,
            reference_guitar_id: self.reference_guitar_id,
            reference_amp_id: self.reference_amp_id,
            reference_position: self.reference_position,
        })
    }
}

const GUITAR_COLUMNS: &str =
    "id, brand, model, pickups_json, selector_json, controls_json, layout_code";
const AMP_COLUMNS: &str = "id, brand, model, amp_family, is_tube, channels_json, controls_json";
const TONE_COLUMNS: &str = "id, song_id, name, reference_guitar_id, reference_amp_id, \
     reference_position, reference_voice_json, base_settings_json, confidence_json";

impl SqliteGearStore {
    /// Opens (creating if needed) the gear database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open gear database {:?}", db_path))?;
        Self::init(&mut conn)?;

        let count = |table: &str| -> i64 {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
                .unwrap_or(0)
        };
        info!(
            "Opened gear database: {} songs, {} guitars, {} amps, {} tones",
            count("songs"),
            count("guitars"),
            count("amps"),
            count("tones")
        );

        Ok(SqliteGearStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, used by tests and one-shot CLI runs.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Self::init(&mut conn)?;
        Ok(SqliteGearStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init(conn: &mut Connection) -> Result<()> {
        migrate_if_needed(conn, GEAR_VERSIONED_SCHEMAS)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    fn get_guitar_inner(conn: &Connection, id: &str) -> Result<Option<Guitar>> {
        conn.query_row(
            &format!("SELECT {} FROM guitars WHERE id = ?1", GUITAR_COLUMNS),
            params![id],
            GuitarRow::read,
        )
        .optional()?
        .map(GuitarRow::decode)
        .transpose()
    }

    fn get_amp_inner(conn: &Connection, id: &str) -> Result<Option<Amp>> {
        conn.query_row(
            &format!("SELECT {} FROM amps WHERE id = ?1", AMP_COLUMNS),
            params![id],
            AmpRow::read,
        )
        .optional()?
        .map(AmpRow::decode)
        .transpose()
    }

    fn get_tone_inner(conn: &Connection, id: &str) -> Result<Option<ToneRecord>> {
        let Some(tone) = conn
            .query_row(
                &format!("SELECT {} FROM tones WHERE id = ?1", TONE_COLUMNS),
                params![id],
                ToneRow::read,
            )
            .optional()?
            .map(ToneRow::decode)
            .transpose()?
        else {
            return Ok(None);
        };

        let reference_guitar = match tone.reference_guitar_id.as_deref() {
            Some(guitar_id) => Self::get_guitar_inner(conn, guitar_id)?,
            None => None,
        };
        let reference_amp = match tone.reference_amp_id.as_deref() {
            Some(amp_id) => Self::get_amp_inner(conn, amp_id)?,
            None => None,
        };

        Ok(Some(ToneRecord {
            tone,
            reference_guitar,
            reference_amp,
        }))
    }

    /// Runs a read on the blocking pool with the connection locked.
    async fn read<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = lock(&conn)?;
            f(&guard)
        })
        .await
        .context("Gear store read task failed")?
    }
}

#[async_trait]
impl GearStore for SqliteGearStore {
    async fn get_tone(&self, id: &str) -> Result<Option<ToneRecord>> {
        let id = id.to_string();
        self.read(move |conn| Self::get_tone_inner(conn, &id)).await
    }

    async fn get_guitar(&self, id: &str) -> Result<Option<Guitar>> {
        let id = id.to_string();
        self.read(move |conn| Self::get_guitar_inner(conn, &id)).await
    }

    async fn get_amp(&self, id: &str) -> Result<Option<Amp>> {
        let id = id.to_string();
        self.read(move |conn| Self::get_amp_inner(conn, &id)).await
    }
}

impl WritableGearStore for SqliteGearStore {
    fn insert_song(&self, song: &Song) -> Result<()> {
        validate_song(song)?;
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO songs (id, title, artist) VALUES (?1, ?2, ?3)",
            params![&song.id, &song.title, &song.artist],
        )
        .with_context(|| format!("Failed to insert song '{}'", song.id))?;
        debug!("Inserted song {}", song.id);
        Ok(())
    }

    fn insert_guitar(&self, guitar: &Guitar) -> Result<()> {
        validate_guitar(guitar)?;
        let conn = lock(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO guitars ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                GUITAR_COLUMNS
            ),
            params![
                &guitar.id,
                &guitar.brand,
                &guitar.model,
                to_json(&guitar.pickups)?,
                guitar.selector.as_ref().map(to_json).transpose()?,
                guitar.controls.as_ref().map(to_json).transpose()?,
                &guitar.layout_code,
            ],
        )
        .with_context(|| format!("Failed to insert guitar '{}'", guitar.id))?;
        debug!("Inserted guitar {}", guitar.id);
        Ok(())
    }

    fn insert_amp(&self, amp: &Amp) -> Result<()> {
        validate_amp(amp)?;
        let conn = lock(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO amps ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                AMP_COLUMNS
            ),
            params![
                &amp.id,
                &amp.brand,
                &amp.model,
                amp.amp_family.map(|f| f.to_db_str()),
                amp.is_tube as i64,
                to_json(&amp.channels)?,
                to_json(&amp.controls)?,
            ],
        )
        .with_context(|| format!("Failed to insert amp '{}'", amp.id))?;
        debug!("Inserted amp {}", amp.id);
        Ok(())
    }

    fn insert_tone(&self, tone: &Tone) -> Result<()> {
        validate_tone(tone)?;
        let conn = lock(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO tones ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                TONE_COLUMNS
            ),
            params![
                &tone.id,
                &tone.song_id,
                &tone.name,
                &tone.reference_guitar_id,
                &tone.reference_amp_id,
                &tone.reference_position,
                tone.reference_voice.as_ref().map(to_json).transpose()?,
                to_json(&tone.base_settings)?,
                tone.confidence.as_ref().map(to_json).transpose()?,
            ],
        )
        .with_context(|| format!("Failed to insert tone '{}'", tone.id))?;
        debug!("Inserted tone {}", tone.id);
        Ok(())
    }
}
