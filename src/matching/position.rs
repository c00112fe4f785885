//! Selector position labels.
//!
//! Guitars name their selector positions in many ways ("5", "Pos 1",
//! "Rhythm", "Neck/Middle"). Labels are collapsed onto a small canonical
//! vocabulary and an ordinal neck-to-bridge scale so that positions of
//! different guitars can be compared.

pub const NECK: &str = "neck";
pub const NECK_MIDDLE: &str = "neck+middle";
pub const BOTH: &str = "both";
pub const MIDDLE: &str = "middle";
pub const BRIDGE_MIDDLE: &str = "bridge+middle";
pub const BRIDGE: &str = "bridge";

/// Index used for labels outside the canonical vocabulary.
pub const NEUTRAL_POSITION_INDEX: f64 = 2.0;

const CANONICAL_INDEX: &[(&str, f64)] = &[
    (NECK, 0.0),
    (NECK_MIDDLE, 1.0),
    (BOTH, 1.5),
    (MIDDLE, 2.0),
    (BRIDGE_MIDDLE, 3.0),
    (BRIDGE, 4.0),
];

// Keys are in separator-canonical form (see `canonical_form`).
// Five-way numbering follows the Stratocaster convention, 1 at the bridge.
const LABEL_ALIASES: &[(&str, &str)] = &[
    ("1", BRIDGE),
    ("pos1", BRIDGE),
    ("pos 1", BRIDGE),
    ("position 1", BRIDGE),
    ("2", BRIDGE_MIDDLE),
    ("pos2", BRIDGE_MIDDLE),
    ("pos 2", BRIDGE_MIDDLE),
    ("position 2", BRIDGE_MIDDLE),
    ("3", MIDDLE),
    ("pos3", MIDDLE),
    ("pos 3", MIDDLE),
    ("position 3", MIDDLE),
    ("4", NECK_MIDDLE),
    ("pos4", NECK_MIDDLE),
    ("pos 4", NECK_MIDDLE),
    ("position 4", NECK_MIDDLE),
    ("5", NECK),
    ("pos5", NECK),
    ("pos 5", NECK),
    ("position 5", NECK),
    ("up", NECK),
    ("rhythm", NECK),
    ("neck pickup", NECK),
    ("down", BRIDGE),
    ("treble", BRIDGE),
    ("lead", BRIDGE),
    ("bridge pickup", BRIDGE),
    // On a three-way toggle the middle position engages both pickups.
    ("middle", BOTH),
    ("neck+bridge", BOTH),
    ("bridge+neck", BOTH),
    ("middle+neck", NECK_MIDDLE),
    ("middle+bridge", BRIDGE_MIDDLE),
];

/// Lower-cased label with whitespace collapsed and `/`, `&`, `and` and
/// spaced `+` all written as a bare `+`.
fn canonical_form(label: &str) -> String {
    let collapsed = label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let joined = collapsed
        .replace(" and ", "+")
        .replace(['/', '&'], "+");
    joined
        .split('+')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("+")
}

/// Maps a selector label onto the canonical vocabulary.
///
/// Returns `None` for a missing or blank label. Unrecognized labels come back
/// lower-cased and trimmed.
pub fn normalize_label(label: Option<&str>) -> Option<String> {
    let trimmed = label?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let canonical = canonical_form(trimmed);
    if let Some((_, target)) = LABEL_ALIASES.iter().find(|(alias, _)| *alias == canonical) {
        return Some(target.to_string());
    }
    if CANONICAL_INDEX.iter().any(|(name, _)| *name == canonical) {
        return Some(canonical);
    }
    Some(trimmed.to_lowercase())
}

/// Ordinal place of a normalized label on the neck (0) to bridge (4) scale.
pub fn position_index(normalized: Option<&str>) -> f64 {
    normalized
        .and_then(|label| {
            CANONICAL_INDEX
                .iter()
                .find(|(name, _)| *name == label)
                .map(|(_, index)| *index)
        })
        .unwrap_or(NEUTRAL_POSITION_INDEX)
}
