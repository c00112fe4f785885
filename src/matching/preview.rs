//! Match preview: the public entry point of the matching engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::amp_mapper::{map_controls, AppliedOffset};
use super::error::{GearEntity, MatchError};
use super::position::normalize_label;
use super::registries::{EqDelta, Registries};
use super::scorer::{build_candidates, choose_best, majority_type, score_candidates};
use crate::gear_store::{Amp, AmpFamily, GearStore, Guitar, PickupVoice, ToneRecord};

/// Confidence assumed for tones without a numeric score.
pub const DEFAULT_BASE_CONFIDENCE: f64 = 70.0;
pub const MIN_CONFIDENCE_HINT: f64 = 10.0;
pub const MAX_CONFIDENCE_HINT: f64 = 95.0;
/// Confidence points lost per unit of pickup type distance.
pub const CONFIDENCE_PER_TYPE_DISTANCE: f64 = 10.0;

/// Number of runner-up candidates listed in the rationale.
const ALTERNATIVES_SHOWN: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRequest {
    pub tone_id: String,
    pub target_guitar_id: String,
    pub target_amp_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRecommendation {
    pub target_position_label: Option<String>,
    pub rationale: Vec<String>,
    #[serde(rename = "expectedEQBias")]
    pub expected_eq_bias: EqDelta,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmpRecommendation {
    pub controls: BTreeMap<String, f64>,
    pub mapping_notes: Vec<String>,
    pub applied_offsets: Vec<AppliedOffset>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPreview {
    pub pickup: PickupRecommendation,
    pub amp: AmpRecommendation,
    pub confidence_hint: u8,
    /// Non-fatal problems found while matching. Nothing reports one yet.
    pub warnings: Vec<String>,
}

/// The voice the tone was recorded with.
///
/// An explicit voice has its pickup types filled from the reference guitar.
/// Without one, the reference guitar's selector position carrying the same
/// label is used.
fn reference_voice(record: &ToneRecord) -> Option<PickupVoice> {
    let guitar = record.reference_guitar.as_ref();
    if let Some(voice) = &record.tone.reference_voice {
        return Some(match guitar {
            Some(guitar) => voice.resolve_types(&guitar.pickups),
            None => voice.clone(),
        });
    }

    let guitar = guitar?;
    let label = normalize_label(record.tone.reference_position.as_deref())?;
    guitar
        .selector_positions()
        .iter()
        .find(|position| {
            normalize_label(position.display_label()).as_deref() == Some(label.as_str())
        })
        .map(|position| PickupVoice::from_position(position, &guitar.pickups))
}

fn confidence_hint(record: &ToneRecord, type_distance: f64) -> u8 {
    let base = record
        .tone
        .confidence
        .and_then(|c| c.numeric())
        .map(f64::from)
        .unwrap_or(DEFAULT_BASE_CONFIDENCE);
    (base - type_distance * CONFIDENCE_PER_TYPE_DISTANCE)
        .round()
        .clamp(MIN_CONFIDENCE_HINT, MAX_CONFIDENCE_HINT) as u8
}

/// Builds a preview from already loaded records. Pure and deterministic.
pub fn compose_preview(
    registries: &Registries,
    record: &ToneRecord,
    target_guitar: &Guitar,
    target_amp: &Amp,
) -> MatchPreview {
    let reference_voice = reference_voice(record);
    let reference_label = record.tone.reference_position.as_deref();

    let candidates = build_candidates(target_guitar);
    let details = score_candidates(
        registries,
        reference_voice.as_ref(),
        reference_label,
        &candidates,
    );
    let ranking = choose_best(details);

    let mut rationale = Vec::new();
    match &ranking.best {
        Some(best) => {
            rationale.push(format!("Chosen {} (score {})", best.label, best.total));
            rationale.extend(best.notes.iter().cloned());
            for alternative in ranking.ranked.iter().skip(1).take(ALTERNATIVES_SHOWN) {
                rationale.push(format!(
                    "Alternative {} (score {})",
                    alternative.label, alternative.total
                ));
            }
        }
        None => rationale.push("No selector positions to choose from".to_string()),
    }

    let best_voice = ranking.best.as_ref().and_then(|b| b.voice.as_ref());
    let type_pair = (
        majority_type(reference_voice.as_ref()),
        majority_type(best_voice),
    );
    let type_distance = registries.type_distance(type_pair.0, type_pair.1);

    let reference_family = record
        .reference_amp
        .as_ref()
        .map_or(AmpFamily::Other, Amp::family);
    let mapping = map_controls(
        registries,
        &record.tone.base_settings,
        &target_amp.controls,
        type_pair,
        reference_family,
        target_amp.family(),
    );

    MatchPreview {
        pickup: PickupRecommendation {
            target_position_label: ranking.best.map(|b| b.label),
            rationale,
            expected_eq_bias: registries.eq_compensation(type_pair.0, type_pair.1),
        },
        amp: AmpRecommendation {
            controls: mapping.controls,
            mapping_notes: mapping.mapping_notes,
            applied_offsets: mapping.applied_offsets,
        },
        confidence_hint: confidence_hint(record, type_distance),
        warnings: Vec::new(),
    }
}

/// Loads gear through a store and composes match previews.
pub struct MatchPreviewService {
    store: Arc<dyn GearStore>,
    registries: Arc<Registries>,
}

impl MatchPreviewService {
    pub fn new(store: Arc<dyn GearStore>, registries: Arc<Registries>) -> Self {
        MatchPreviewService { store, registries }
    }

    pub async fn build_match_preview(
        &self,
        request: &MatchRequest,
    ) -> Result<MatchPreview, MatchError> {
        let (record, guitar, amp) = tokio::try_join!(
            self.store.get_tone(&request.tone_id),
            self.store.get_guitar(&request.target_guitar_id),
            self.store.get_amp(&request.target_amp_id),
        )
        .map_err(MatchError::Store)?;

        let record = record.ok_or_else(|| MatchError::NotFound {
            entity: GearEntity::Tone,
            id: request.tone_id.clone(),
        })?;
        let guitar = guitar.ok_or_else(|| MatchError::NotFound {
            entity: GearEntity::Guitar,
            id: request.target_guitar_id.clone(),
        })?;
        let amp = amp.ok_or_else(|| MatchError::NotFound {
            entity: GearEntity::Amp,
            id: request.target_amp_id.clone(),
        })?;

        let preview = compose_preview(&self.registries, &record, &guitar, &amp);
        info!(
            "Match preview for tone {} on {} / {}: position {:?}, confidence {}",
            record.tone.id,
            guitar.id,
            amp.id,
            preview.pickup.target_position_label,
            preview.confidence_hint
        );
        debug!("Mapped controls: {:?}", preview.amp.controls);
        Ok(preview)
    }
}
