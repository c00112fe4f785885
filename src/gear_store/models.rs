//! Gear catalog models.
//!
//! These are the typed records persisted by the gear store and served by the
//! thin read endpoints. The matching engine only ever reads them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Enumerations
// =============================================================================

/// Physical pickup classification.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupType {
    SingleCoil,
    Humbucker,
    P90,
    Filtertron,
    MiniHumbucker,
    Lipstick,
    GoldFoil,
    #[serde(other)]
    Other,
}

impl PickupType {
    /// Convert from database string representation
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "single_coil" => PickupType::SingleCoil,
            "humbucker" => PickupType::Humbucker,
            "p90" => PickupType::P90,
            "filtertron" => PickupType::Filtertron,
            "mini_humbucker" => PickupType::MiniHumbucker,
            "lipstick" => PickupType::Lipstick,
            "gold_foil" => PickupType::GoldFoil,
            _ => PickupType::Other,
        }
    }

    /// Convert to database string representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PickupType::SingleCoil => "single_coil",
            PickupType::Humbucker => "humbucker",
            PickupType::P90 => "p90",
            PickupType::Filtertron => "filtertron",
            PickupType::MiniHumbucker => "mini_humbucker",
            PickupType::Lipstick => "lipstick",
            PickupType::GoldFoil => "gold_foil",
            PickupType::Other => "other",
        }
    }

    /// Letter used in compact layout codes such as "HSS".
    pub fn layout_letter(&self) -> char {
        match self {
            PickupType::SingleCoil => 'S',
            PickupType::Humbucker => 'H',
            PickupType::P90 => 'P',
            PickupType::Filtertron => 'F',
            PickupType::MiniHumbucker => 'M',
            PickupType::Lipstick => 'L',
            PickupType::GoldFoil => 'G',
            PickupType::Other => 'O',
        }
    }
}

/// How the active pickups of a selector position are wired together.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Series,
    Parallel,
    NotApplicable,
}

/// Coarse amplifier voicing classification.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmpFamily {
    Fender,
    Marshall,
    Vox,
    Orange,
    Blackstar,
    Peavey,
    #[serde(rename = "line6")]
    Line6,
    Boss,
    Modeling,
    SolidState,
    #[serde(other)]
    Other,
}

impl AmpFamily {
    /// Convert from database string representation
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "fender" => AmpFamily::Fender,
            "marshall" => AmpFamily::Marshall,
            "vox" => AmpFamily::Vox,
            "orange" => AmpFamily::Orange,
            "blackstar" => AmpFamily::Blackstar,
            "peavey" => AmpFamily::Peavey,
            "line6" => AmpFamily::Line6,
            "boss" => AmpFamily::Boss,
            "modeling" => AmpFamily::Modeling,
            "solid_state" => AmpFamily::SolidState,
            _ => AmpFamily::Other,
        }
    }

    /// Convert to database string representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AmpFamily::Fender => "fender",
            AmpFamily::Marshall => "marshall",
            AmpFamily::Vox => "vox",
            AmpFamily::Orange => "orange",
            AmpFamily::Blackstar => "blackstar",
            AmpFamily::Peavey => "peavey",
            AmpFamily::Line6 => "line6",
            AmpFamily::Boss => "boss",
            AmpFamily::Modeling => "modeling",
            AmpFamily::SolidState => "solid_state",
            AmpFamily::Other => "other",
        }
    }

    /// Best guess for amps recorded without a family tag.
    ///
    /// Brands that are families on their own map directly; anything else is
    /// `SolidState` when the amp is not a tube amp, `Other` otherwise.
    pub fn infer(brand: &str, is_tube: bool) -> Self {
        let brand = brand.trim().to_lowercase().replace([' ', '-'], "");
        match AmpFamily::from_db_str(&brand) {
            AmpFamily::Other if !is_tube => AmpFamily::SolidState,
            family => family,
        }
    }
}

/// Coarse confidence band used by older tone records.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

/// Declared confidence of a tone record.
///
/// Newer records carry a 0-100 score, older ones a coarse band.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToneConfidence {
    Score(u8),
    Band(ConfidenceBand),
}

impl ToneConfidence {
    /// Numeric confidence, only available for scored records.
    pub fn numeric(&self) -> Option<u8> {
        match self {
            ToneConfidence::Score(score) => Some(*score),
            ToneConfidence::Band(_) => None,
        }
    }
}

// =============================================================================
// Guitar
// =============================================================================

/// A physical pickup mounted on a guitar.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Pickup {
    /// Stable identifier within the guitar, e.g. "neck", "middle", "bridge".
    pub id: String,
    pub pickup_type: PickupType,
    #[serde(default)]
    pub splittable: bool,
}

/// A pickup engaged by a selector position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActiveEntry {
    pub pickup_id: String,
    #[serde(default)]
    pub split: bool,
}

/// One position of a guitar's pickup selector.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SelectorPosition {
    pub name: Option<String>,
    pub label: Option<String>,
    #[serde(default)]
    pub active: Vec<ActiveEntry>,
    pub blend: Option<BlendMode>,
}

impl SelectorPosition {
    pub fn display_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Selector {
    #[serde(default)]
    pub positions: Vec<SelectorPosition>,
}

/// Volume/tone knobs as recorded on the instrument.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct GuitarControls {
    #[serde(default)]
    pub per_pickup: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub master: Vec<String>,
}

/// Guitar entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Guitar {
    pub id: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub pickups: Vec<Pickup>,
    pub selector: Option<Selector>,
    pub controls: Option<GuitarControls>,
    pub layout_code: Option<String>,
}

impl Guitar {
    /// Compact layout code: the stored one, else one letter per recorded pickup.
    pub fn layout_code(&self) -> Option<String> {
        if let Some(code) = self.layout_code.as_deref() {
            let code = code.trim();
            if !code.is_empty() {
                return Some(code.to_uppercase());
            }
        }
        if self.pickups.is_empty() {
            return None;
        }
        Some(
            self.pickups
                .iter()
                .map(|p| p.pickup_type.layout_letter())
                .collect(),
        )
    }

    pub fn pickup(&self, id: &str) -> Option<&Pickup> {
        self.pickups.iter().find(|p| p.id == id)
    }

    /// Selector positions, if the guitar carries structured selector data.
    pub fn selector_positions(&self) -> &[SelectorPosition] {
        self.selector
            .as_ref()
            .map(|s| s.positions.as_slice())
            .unwrap_or(&[])
    }
}

// =============================================================================
// Pickup voice
// =============================================================================

/// A single pickup engaged in a voice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VoicePickup {
    #[serde(alias = "pickupId")]
    pub pickup_id: String,
    #[serde(rename = "type", default)]
    pub pickup_type: Option<PickupType>,
    #[serde(default)]
    pub split: bool,
}

/// Which pickups, in what split state, are active for a selector position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PickupVoice {
    #[serde(default)]
    pub active: Vec<VoicePickup>,
}

impl PickupVoice {
    /// Builds the voice of a selector position from the guitar's pickup list.
    pub fn from_position(position: &SelectorPosition, pickups: &[Pickup]) -> Self {
        let active = position
            .active
            .iter()
            .map(|entry| VoicePickup {
                pickup_id: entry.pickup_id.clone(),
                pickup_type: pickups
                    .iter()
                    .find(|p| p.id == entry.pickup_id)
                    .map(|p| p.pickup_type),
                split: entry.split,
            })
            .collect();
        PickupVoice { active }
    }

    pub fn any_split(&self) -> bool {
        self.active.iter().any(|p| p.split)
    }

    /// Fills pickup types from the owning guitar's pickup list.
    ///
    /// The guitar's record wins over a type tag already present on the voice;
    /// tags are kept for pickups the guitar does not list.
    pub fn resolve_types(&self, pickups: &[Pickup]) -> Self {
        let active = self
            .active
            .iter()
            .map(|vp| VoicePickup {
                pickup_type: pickups
                    .iter()
                    .find(|p| p.id == vp.pickup_id)
                    .map(|p| p.pickup_type)
                    .or(vp.pickup_type),
                ..vp.clone()
            })
            .collect();
        PickupVoice { active }
    }

    /// Most frequent pickup type among the active pickups.
    ///
    /// Ties go to the type encountered first. Untyped entries count as `Other`.
    pub fn majority_type(&self) -> PickupType {
        let mut counts: Vec<(PickupType, usize)> = Vec::new();
        for vp in &self.active {
            let pickup_type = vp.pickup_type.unwrap_or(PickupType::Other);
            match counts.iter_mut().find(|(t, _)| *t == pickup_type) {
                Some((_, count)) => *count += 1,
                None => counts.push((pickup_type, 1)),
            }
        }

        let mut best: Option<(PickupType, usize)> = None;
        for (pickup_type, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((pickup_type, count));
            }
        }
        best.map(|(t, _)| t).unwrap_or(PickupType::Other)
    }
}

// =============================================================================
// Amp
// =============================================================================

/// A knob on the amp's control surface. Minimum is always 0.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AmpControl {
    pub name: String,
    pub max: u8,
}

/// Amp entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Amp {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub amp_family: Option<AmpFamily>,
    #[serde(default)]
    pub is_tube: bool,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub controls: Vec<AmpControl>,
}

impl Amp {
    pub fn family(&self) -> AmpFamily {
        self.amp_family
            .unwrap_or_else(|| AmpFamily::infer(&self.brand, self.is_tube))
    }
}

// =============================================================================
// Song / Tone
// =============================================================================

/// Song entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
}

/// A recorded reference performance for a song.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tone {
    pub id: String,
    pub song_id: String,
    pub name: String,
    pub reference_guitar_id: Option<String>,
    pub reference_amp_id: Option<String>,
    pub reference_position: Option<String>,
    pub reference_voice: Option<PickupVoice>,
    /// Recorded value per named control on the reference amp.
    #[serde(default)]
    pub base_settings: BTreeMap<String, f64>,
    pub confidence: Option<ToneConfidence>,
}

/// A tone joined with the reference gear it was recorded on.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ToneRecord {
    pub tone: Tone,
    pub reference_guitar: Option<Guitar>,
    pub reference_amp: Option<Amp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(entries: &[(&str, Option<PickupType>, bool)]) -> PickupVoice {
        PickupVoice {
            active: entries
                .iter()
                .map(|(id, t, split)| VoicePickup {
                    pickup_id: id.to_string(),
                    pickup_type: *t,
                    split: *split,
                })
                .collect(),
        }
    }

    #[test]
    fn test_pickup_type_db_str_roundtrip() {
        for t in [
            PickupType::SingleCoil,
            PickupType::Humbucker,
            PickupType::P90,
            PickupType::Filtertron,
            PickupType::MiniHumbucker,
            PickupType::Lipstick,
            PickupType::GoldFoil,
            PickupType::Other,
        ] {
            assert_eq!(PickupType::from_db_str(t.to_db_str()), t);
        }
        assert_eq!(PickupType::from_db_str("piezo"), PickupType::Other);
    }

    #[test]
    fn test_unknown_pickup_type_deserializes_as_other() {
        let parsed: PickupType = serde_json::from_str("\"piezo\"").unwrap();
        assert_eq!(parsed, PickupType::Other);
        let parsed: PickupType = serde_json::from_str("\"mini_humbucker\"").unwrap();
        assert_eq!(parsed, PickupType::MiniHumbucker);
    }

    #[test]
    fn test_amp_family_parsing() {
        assert_eq!(AmpFamily::from_db_str("Marshall"), AmpFamily::Marshall);
        assert_eq!(AmpFamily::from_db_str("line6"), AmpFamily::Line6);
        assert_eq!(AmpFamily::from_db_str("mesa"), AmpFamily::Other);
        let parsed: AmpFamily = serde_json::from_str("\"line6\"").unwrap();
        assert_eq!(parsed, AmpFamily::Line6);
        let parsed: AmpFamily = serde_json::from_str("\"friedman\"").unwrap();
        assert_eq!(parsed, AmpFamily::Other);
    }

    #[test]
    fn test_amp_family_inference() {
        assert_eq!(AmpFamily::infer("Fender", true), AmpFamily::Fender);
        assert_eq!(AmpFamily::infer("Line 6", false), AmpFamily::Line6);
        assert_eq!(AmpFamily::infer("Roland", false), AmpFamily::SolidState);
        assert_eq!(AmpFamily::infer("Mesa Boogie", true), AmpFamily::Other);
    }

    #[test]
    fn test_confidence_accepts_score_and_band() {
        let score: ToneConfidence = serde_json::from_str("80").unwrap();
        assert_eq!(score, ToneConfidence::Score(80));
        assert_eq!(score.numeric(), Some(80));

        let band: ToneConfidence = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(band, ToneConfidence::Band(ConfidenceBand::High));
        assert_eq!(band.numeric(), None);
    }

    #[test]
    fn test_layout_code_prefers_stored_code() {
        let guitar = Guitar {
            id: "g".to_string(),
            brand: "Gibson".to_string(),
            model: "SG".to_string(),
            pickups: vec![Pickup {
                id: "bridge".to_string(),
                pickup_type: PickupType::P90,
                splittable: false,
            }],
            selector: None,
            controls: None,
            layout_code: Some("hh".to_string()),
        };
        assert_eq!(guitar.layout_code().as_deref(), Some("HH"));

        let derived = Guitar {
            layout_code: None,
            ..guitar
        };
        assert_eq!(derived.layout_code().as_deref(), Some("P"));
    }

    #[test]
    fn test_majority_type_breaks_ties_by_first_seen() {
        let v = voice(&[
            ("neck", Some(PickupType::SingleCoil), false),
            ("bridge", Some(PickupType::Humbucker), false),
        ]);
        assert_eq!(v.majority_type(), PickupType::SingleCoil);

        let v = voice(&[
            ("neck", Some(PickupType::SingleCoil), false),
            ("middle", Some(PickupType::Humbucker), false),
            ("bridge", Some(PickupType::Humbucker), false),
        ]);
        assert_eq!(v.majority_type(), PickupType::Humbucker);
    }

    #[test]
    fn test_majority_type_of_empty_or_untyped_voice_is_other() {
        assert_eq!(PickupVoice::default().majority_type(), PickupType::Other);
        let v = voice(&[("neck", None, false)]);
        assert_eq!(v.majority_type(), PickupType::Other);
    }

    #[test]
    fn test_resolve_types_prefers_guitar_pickups() {
        let pickups = vec![Pickup {
            id: "bridge".to_string(),
            pickup_type: PickupType::Humbucker,
            splittable: true,
        }];
        let v = voice(&[
            ("bridge", Some(PickupType::SingleCoil), true),
            ("neck", Some(PickupType::P90), false),
            ("middle", None, false),
        ]);
        let resolved = v.resolve_types(&pickups);
        assert_eq!(resolved.active[0].pickup_type, Some(PickupType::Humbucker));
        assert_eq!(resolved.active[1].pickup_type, Some(PickupType::P90));
        assert_eq!(resolved.active[2].pickup_type, None);
        assert!(resolved.any_split());
    }

    #[test]
    fn test_voice_json_uses_type_tag() {
        let json = r#"{"active":[{"pickup_id":"bridge","type":"humbucker","split":false}]}"#;
        let v: PickupVoice = serde_json::from_str(json).unwrap();
        assert_eq!(v.active[0].pickup_type, Some(PickupType::Humbucker));
    }

    #[test]
    fn test_voice_json_accepts_camel_case_pickup_id() {
        let json = r#"{"active":[{"pickupId":"bridge","type":"humbucker","split":false}]}"#;
        let v: PickupVoice = serde_json::from_str(json).unwrap();
        assert_eq!(v.active[0].pickup_id, "bridge");
        assert_eq!(v.active[0].pickup_type, Some(PickupType::Humbucker));
    }
}
