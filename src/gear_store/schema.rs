//! SQLite schema definitions for the gear database.
//!
//! Scalar fields get their own columns. Nested structures (pickups, selector,
//! controls, voices, settings) are stored as JSON text.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const GUITARS_TABLE: Table = Table {
    name: "guitars",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("brand", &SqlType::Text, non_null = true),
        sqlite_column!("model", &SqlType::Text, non_null = true),
        sqlite_column!("pickups_json", &SqlType::Text, non_null = true),
        sqlite_column!("selector_json", &SqlType::Text),
        sqlite_column!("controls_json", &SqlType::Text),
        sqlite_column!("layout_code", &SqlType::Text),
    ],
    indices: &[],
};

const AMPS_TABLE: Table = Table {
    name: "amps",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("brand", &SqlType::Text, non_null = true),
        sqlite_column!("model", &SqlType::Text, non_null = true),
        sqlite_column!("amp_family", &SqlType::Text),
        sqlite_column!("is_tube", &SqlType::Integer, non_null = true),
        sqlite_column!("channels_json", &SqlType::Text, non_null = true),
        sqlite_column!("controls_json", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const GUITAR_FK: ForeignKey = ForeignKey {
    foreign_table: "guitars",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const AMP_FK: ForeignKey = ForeignKey {
    foreign_table: "amps",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const TONES_TABLE: Table = Table {
    name: "tones",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "song_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "reference_guitar_id",
            &SqlType::Text,
            foreign_key = Some(&GUITAR_FK)
        ),
        sqlite_column!(
            "reference_amp_id",
            &SqlType::Text,
            foreign_key = Some(&AMP_FK)
        ),
        sqlite_column!("reference_position", &SqlType::Text),
        sqlite_column!("reference_voice_json", &SqlType::Text),
        sqlite_column!("base_settings_json", &SqlType::Text, non_null = true),
        sqlite_column!("confidence_json", &SqlType::Text),
    ],
    indices: &[("idx_tones_song", "song_id")],
};

pub const GEAR_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONGS_TABLE, GUITARS_TABLE, AMPS_TABLE, TONES_TABLE],
    migration: None,
}];
