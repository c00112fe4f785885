//! Pickup candidate scoring.
//!
//! Each selector position of the target guitar is a candidate. A candidate's
//! score is a weighted distance to the reference voice: lower is better.

use serde::Serialize;
use tracing::debug;

use super::position::{normalize_label, position_index};
use super::registries::Registries;
use crate::gear_store::{Guitar, PickupType, PickupVoice};

pub const TYPE_WEIGHT: f64 = 3.0;
pub const POSITION_WEIGHT: f64 = 1.5;
pub const SPLIT_WEIGHT: f64 = 0.5;

const TWO_PICKUP_LABELS: &[&str] = &["Neck", "Both", "Bridge"];
const FIVE_WAY_LABELS: &[&str] = &["Neck", "Neck+Middle", "Middle", "Bridge+Middle", "Bridge"];
const SINGLE_PICKUP_LABELS: &[&str] = &["Bridge"];
const FALLBACK_LABEL: &str = "Neck";

/// A selector position of the target guitar.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub label: String,
    /// `None` when the position was synthesized without pickup data.
    pub voice: Option<PickupVoice>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreDetail {
    pub label: String,
    pub voice: Option<PickupVoice>,
    pub type_distance: f64,
    pub pos_distance: f64,
    pub split_penalty: f64,
    pub total: f64,
    /// User-facing explanation of each component.
    pub notes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    pub best: Option<ScoreDetail>,
    /// All candidates, best first.
    pub ranked: Vec<ScoreDetail>,
}

pub(crate) fn majority_type(voice: Option<&PickupVoice>) -> PickupType {
    voice.map_or(PickupType::Other, PickupVoice::majority_type)
}

fn any_split(voice: Option<&PickupVoice>) -> bool {
    voice.is_some_and(PickupVoice::any_split)
}

/// Candidates for a target guitar.
///
/// Structured selector data wins. Without it the layout code decides a
/// conventional set of positions, and with neither a lone neck position is
/// assumed. Synthesized candidates carry no voice.
pub fn build_candidates(guitar: &Guitar) -> Vec<Candidate> {
    let positions = guitar.selector_positions();
    if !positions.is_empty() {
        return positions
            .iter()
            .enumerate()
            .map(|(index, position)| Candidate {
                label: position
                    .display_label()
                    .map(|l| l.trim().to_string())
                    .unwrap_or_else(|| format!("Position {}", index + 1)),
                voice: Some(PickupVoice::from_position(position, &guitar.pickups)),
            })
            .collect();
    }

    let labels = match guitar.layout_code() {
        Some(code) => match code.chars().count() {
            1 => SINGLE_PICKUP_LABELS,
            2 => TWO_PICKUP_LABELS,
            _ => FIVE_WAY_LABELS,
        },
        None => &[FALLBACK_LABEL][..],
    };
    labels
        .iter()
        .map(|label| Candidate {
            label: label.to_string(),
            voice: None,
        })
        .collect()
}

/// Scores one candidate against the reference voice and position.
pub fn score_candidate(
    registries: &Registries,
    reference_voice: Option<&PickupVoice>,
    reference_label: Option<&str>,
    candidate: &Candidate,
) -> ScoreDetail {
    let reference_type = majority_type(reference_voice);
    let candidate_type = majority_type(candidate.voice.as_ref());
    let type_distance = registries.type_distance(reference_type, candidate_type);

    let reference_position = normalize_label(reference_label);
    let candidate_position = normalize_label(Some(&candidate.label));
    let pos_distance = (position_index(reference_position.as_deref())
        - position_index(candidate_position.as_deref()))
    .abs();

    let reference_split = any_split(reference_voice);
    let candidate_split = any_split(candidate.voice.as_ref());
    let split_penalty = if reference_split == candidate_split {
        0.0
    } else {
        1.0
    };

    let total =
        TYPE_WEIGHT * type_distance + POSITION_WEIGHT * pos_distance + SPLIT_WEIGHT * split_penalty;

    let notes = vec![
        format!(
            "Pickup type: reference {} vs {} (distance {})",
            reference_type.to_db_str(),
            candidate_type.to_db_str(),
            type_distance
        ),
        format!(
            "Position: reference {} vs {} (distance {})",
            reference_position.as_deref().unwrap_or("unknown"),
            candidate_position.as_deref().unwrap_or("unknown"),
            pos_distance
        ),
        if split_penalty == 0.0 {
            "Coil split: same as reference".to_string()
        } else {
            format!(
                "Coil split: reference {}, candidate {} (penalty {})",
                split_word(reference_split),
                split_word(candidate_split),
                split_penalty
            )
        },
    ];

    ScoreDetail {
        label: candidate.label.clone(),
        voice: candidate.voice.clone(),
        type_distance,
        pos_distance,
        split_penalty,
        total,
        notes,
    }
}

fn split_word(split: bool) -> &'static str {
    if split {
        "split"
    } else {
        "not split"
    }
}

pub fn score_candidates(
    registries: &Registries,
    reference_voice: Option<&PickupVoice>,
    reference_label: Option<&str>,
    candidates: &[Candidate],
) -> Vec<ScoreDetail> {
    candidates
        .iter()
        .map(|candidate| {
            let detail = score_candidate(registries, reference_voice, reference_label, candidate);
            debug!("Scored candidate '{}': total {}", detail.label, detail.total);
            detail
        })
        .collect()
}

/// Orders details by total, keeping input order between equal totals.
pub fn choose_best(mut details: Vec<ScoreDetail>) -> Ranking {
    details.sort_by(|a, b| a.total.total_cmp(&b.total));
    Ranking {
        best: details.first().cloned(),
        ranked: details,
    }
}
