//! Validation for gear entities.
//!
//! Provides validation functions to ensure data integrity before
//! inserting entities in the gear store.

use super::models::{Amp, Guitar, Song, Tone, ToneConfidence};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error types
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required but was empty")]
    EmptyField { field: &'static str },

    #[error("Field '{field}' must be positive, got {value}")]
    NonPositiveValue { field: &'static str, value: i64 },

    #[error("Field '{field}' is out of range, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{entity_type} with id '{id}' is listed twice")]
    DuplicateId { entity_type: &'static str, id: String },

    #[error("Selector position '{position}' references unknown pickup '{pickup_id}'")]
    UnknownPickup { position: String, pickup_id: String },

    #[error("Selector position '{position}' splits pickup '{pickup_id}' which cannot be split")]
    SplitNotSupported { position: String, pickup_id: String },

    #[error("Invalid layout code '{0}'")]
    InvalidLayoutCode(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

fn require(value: &str, field: &'static str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

/// Validate a song entity
pub fn validate_song(song: &Song) -> ValidationResult<()> {
    require(&song.id, "id")?;
    require(&song.title, "title")?;
    Ok(())
}

/// Validate a guitar entity, including selector wiring.
pub fn validate_guitar(guitar: &Guitar) -> ValidationResult<()> {
    require(&guitar.id, "id")?;
    require(&guitar.brand, "brand")?;
    require(&guitar.model, "model")?;

    let mut seen = HashSet::new();
    for pickup in &guitar.pickups {
        require(&pickup.id, "pickup.id")?;
        if !seen.insert(pickup.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                entity_type: "Pickup",
                id: pickup.id.clone(),
            });
        }
    }

    for (index, position) in guitar.selector_positions().iter().enumerate() {
        let position_name = position
            .display_label()
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index + 1));
        for entry in &position.active {
            let pickup = guitar
                .pickup(&entry.pickup_id)
                .ok_or_else(|| ValidationError::UnknownPickup {
                    position: position_name.clone(),
                    pickup_id: entry.pickup_id.clone(),
                })?;
            if entry.split && !pickup.splittable {
                return Err(ValidationError::SplitNotSupported {
                    position: position_name.clone(),
                    pickup_id: entry.pickup_id.clone(),
                });
            }
        }
    }

    if let Some(code) = &guitar.layout_code {
        let valid = !code.trim().is_empty()
            && code
                .trim()
                .chars()
                .all(|c| "SHPFMLGO".contains(c.to_ascii_uppercase()));
        if !valid {
            return Err(ValidationError::InvalidLayoutCode(code.clone()));
        }
    }
    Ok(())
}

/// Validate an amp entity
pub fn validate_amp(amp: &Amp) -> ValidationResult<()> {
    require(&amp.id, "id")?;
    require(&amp.brand, "brand")?;
    require(&amp.model, "model")?;

    let mut seen = HashSet::new();
    for control in &amp.controls {
        require(&control.name, "control.name")?;
        if control.max == 0 {
            return Err(ValidationError::NonPositiveValue {
                field: "control.max",
                value: 0,
            });
        }
        if !seen.insert(control.name.to_lowercase()) {
            return Err(ValidationError::DuplicateId {
                entity_type: "Control",
                id: control.name.clone(),
            });
        }
    }
    Ok(())
}

/// Validate a tone entity (without foreign key check)
pub fn validate_tone(tone: &Tone) -> ValidationResult<()> {
    require(&tone.id, "id")?;
    require(&tone.song_id, "song_id")?;
    require(&tone.name, "name")?;

    if let Some(ToneConfidence::Score(score)) = tone.confidence {
        if score > 100 {
            return Err(ValidationError::OutOfRange {
                field: "confidence",
                value: score as f64,
            });
        }
    }

    for value in tone.base_settings.values() {
        if !value.is_finite() || *value < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "base_settings",
                value: *value,
            });
        }
    }
    Ok(())
}
