use std::fmt;
use thiserror::Error;

/// Record kinds a match preview reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GearEntity {
    Tone,
    Guitar,
    Amp,
}

impl fmt::Display for GearEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GearEntity::Tone => "Tone",
            GearEntity::Guitar => "Guitar",
            GearEntity::Amp => "Amp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: GearEntity, id: String },

    #[error("Gear store failure: {0:#}")]
    Store(#[source] anyhow::Error),
}
