//! The gear-matching engine.
//!
//! Given a reference tone and a target guitar/amp pair, picks the closest
//! selector position on the target guitar and remaps the recorded amp
//! settings onto the target amp.

pub mod amp_mapper;
mod error;
pub mod position;
mod preview;
pub mod registries;
pub mod scorer;

pub use amp_mapper::{map_controls, AmpMapping, AppliedOffset, ControlBand};
pub use error::{GearEntity, MatchError};
pub use preview::{
    compose_preview, AmpRecommendation, MatchPreview, MatchPreviewService, MatchRequest,
    PickupRecommendation,
};
pub use registries::{EqDelta, FamilyBias, Registries, RegistryOverrides};
pub use scorer::{build_candidates, choose_best, score_candidate, Candidate, Ranking, ScoreDetail};
