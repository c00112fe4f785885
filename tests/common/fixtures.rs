//! Test fixture creation for the gear database

use super::constants::*;
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use tone_match_server::gear_store::{GearBundle, SqliteGearStore};

/// The gear every e2e test starts from.
pub fn test_bundle() -> Result<GearBundle> {
    let bundle = json!({
        "songs": [
            { "id": SONG_1_ID, "title": "Test Song", "artist": "The Test Band" }
        ],
        "guitars": [
            {
                "id": LES_PAUL_ID,
                "brand": "Gibson",
                "model": "Les Paul Standard",
                "pickups": [
                    { "id": "neck", "pickup_type": "humbucker" },
                    { "id": "bridge", "pickup_type": "humbucker" }
                ],
                "selector": {
                    "positions": [
                        { "label": "Rhythm", "active": [{ "pickup_id": "neck" }] },
                        {
                            "label": "Middle",
                            "active": [{ "pickup_id": "neck" }, { "pickup_id": "bridge" }]
                        },
                        { "label": "Treble", "active": [{ "pickup_id": "bridge" }] }
                    ]
                }
            },
            {
                "id": SG_ID,
                "brand": "Gibson",
                "model": "SG Special",
                "layout_code": "HH"
            }
        ],
        "amps": [
            {
                "id": TWIN_ID,
                "brand": "Fender",
                "model": "Twin Reverb",
                "amp_family": "fender",
                "is_tube": true,
                "controls": [
                    { "name": "Volume", "max": 10 },
                    { "name": "Treble", "max": 10 },
                    { "name": "Bass", "max": 10 }
                ]
            },
            {
                "id": JCM800_ID,
                "brand": "Marshall",
                "model": "JCM800",
                "amp_family": "marshall",
                "is_tube": true,
                "controls": [
                    { "name": "Gain", "max": 10 },
                    { "name": "Bass", "max": 10 },
                    { "name": "Middle", "max": 10 },
                    { "name": "Treble", "max": 10 },
                    { "name": "Presence", "max": 10 }
                ]
            },
            {
                "id": PRACTICE_AMP_ID,
                "brand": "Acme",
                "model": "Practice 10",
                "is_tube": false
            }
        ],
        "tones": [
            {
                "id": TONE_SOLO_ID,
                "song_id": SONG_1_ID,
                "name": "Solo",
                "reference_position": "Bridge",
                "reference_voice": {
                    "active": [{ "pickup_id": "bridge", "type": "humbucker" }]
                },
                "base_settings": { "Gain": 7.0, "Bass": 4.0, "Middle": 5.0, "Treble": 6.0 },
                "confidence": TONE_SOLO_CONFIDENCE
            },
            {
                "id": TONE_RHYTHM_ID,
                "song_id": SONG_1_ID,
                "name": "Verse rhythm",
                "reference_guitar_id": LES_PAUL_ID,
                "reference_amp_id": TWIN_ID,
                "reference_position": "Treble",
                "base_settings": { "Volume": 6.0, "Treble": 7.5, "Bass": 3.0 },
                "confidence": "HIGH"
            }
        ]
    });
    Ok(serde_json::from_value(bundle)?)
}

/// Creates a temporary SQLite gear database seeded with `test_bundle`.
/// Returns (temp_dir, db_path)
pub fn create_test_db() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("gear.db");

    let store = SqliteGearStore::new(&db_path)?;
    test_bundle()?.import_into(&store)?;

    Ok((dir, db_path))
}
