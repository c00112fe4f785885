//! Amplifier control mapping.
//!
//! Every control of the target amp gets a value on the shared 0-10 scale,
//! starting from the reference tone's recorded settings and then nudged for
//! the pickup swap and for the voicing of the target amp family.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::registries::Registries;
use crate::gear_store::{AmpControl, AmpFamily, PickupType};

pub const CONTROL_MIN: f64 = 0.0;
pub const CONTROL_MAX: f64 = 10.0;
/// Value used for controls the reference tone has no setting for.
pub const DEFAULT_CONTROL_VALUE: f64 = 5.0;

/// Tone-stack bands the nudges are expressed in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControlBand {
    Bass,
    Mids,
    Treble,
    Gain,
}

/// Control names (lower-case) that address each band.
const CONTROL_BAND_ALIASES: &[(ControlBand, &[&str])] = &[
    (ControlBand::Bass, &["bass"]),
    (ControlBand::Mids, &["middle", "mids"]),
    (ControlBand::Treble, &["treble"]),
    (ControlBand::Gain, &["gain", "drive"]),
];

impl ControlBand {
    /// The band a control name belongs to, if any.
    pub fn of(control_name: &str) -> Option<ControlBand> {
        let name = control_name.trim().to_lowercase();
        CONTROL_BAND_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.contains(&name.as_str()))
            .map(|(band, _)| *band)
    }

    fn as_str(&self) -> &'static str {
        match self {
            ControlBand::Bass => "bass",
            ControlBand::Mids => "mids",
            ControlBand::Treble => "treble",
            ControlBand::Gain => "gain",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedOffset {
    pub control: String,
    pub delta: f64,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmpMapping {
    pub controls: BTreeMap<String, f64>,
    pub mapping_notes: Vec<String>,
    pub applied_offsets: Vec<AppliedOffset>,
}

fn clamp_control(value: f64) -> f64 {
    value.clamp(CONTROL_MIN, CONTROL_MAX)
}

/// The recorded value for a target control. Only an identical name counts.
fn baseline_value(base_settings: &BTreeMap<String, f64>, control: &str) -> (f64, String) {
    match base_settings.get(control) {
        Some(value) => (*value, format!("{}: {} from reference", control, value)),
        None => (
            DEFAULT_CONTROL_VALUE,
            format!(
                "{}: no reference setting, using {}",
                control, DEFAULT_CONTROL_VALUE
            ),
        ),
    }
}

struct Nudger<'a> {
    target_controls: &'a [AmpControl],
    mapping: AmpMapping,
}

impl Nudger<'_> {
    /// Bumps every target control of `band` by `delta`, once per control.
    fn nudge(&mut self, band: ControlBand, delta: f64, reason: &str) {
        if delta == 0.0 {
            return;
        }
        for control in self.target_controls {
            if ControlBand::of(&control.name) != Some(band) {
                continue;
            }
            let Some(value) = self.mapping.controls.get_mut(&control.name) else {
                continue;
            };
            *value = clamp_control(*value + delta);
            self.mapping.applied_offsets.push(AppliedOffset {
                control: control.name.clone(),
                delta,
                reason: format!("{} ({})", reason, band.as_str()),
            });
        }
    }
}

/// Maps reference settings onto the target amp's controls.
///
/// `type_pair` is (reference pickup type, target pickup type). The target
/// family's voicing bias is applied unless the reference amp is of the same
/// family.
pub fn map_controls(
    registries: &Registries,
    base_settings: &BTreeMap<String, f64>,
    target_controls: &[AmpControl],
    type_pair: (PickupType, PickupType),
    reference_family: AmpFamily,
    target_family: AmpFamily,
) -> AmpMapping {
    let mut mapping = AmpMapping::default();
    for control in target_controls {
        let (value, note) = baseline_value(base_settings, &control.name);
        let clamped = clamp_control(value);
        mapping.mapping_notes.push(note);
        if clamped != value {
            mapping.mapping_notes.push(format!(
                "{}: clamped from {} to {}",
                control.name, value, clamped
            ));
        }
        mapping.controls.insert(control.name.clone(), clamped);
    }

    let mut nudger = Nudger {
        target_controls,
        mapping,
    };

    let (reference_type, target_type) = type_pair;
    let eq = registries.eq_compensation(reference_type, target_type);
    let eq_reason = format!(
        "Pickup EQ compensation {} -> {}",
        reference_type.to_db_str(),
        target_type.to_db_str()
    );
    nudger.nudge(ControlBand::Bass, eq.bass, &eq_reason);
    nudger.nudge(ControlBand::Mids, eq.mids, &eq_reason);
    nudger.nudge(ControlBand::Treble, eq.treble, &eq_reason);

    if reference_family != target_family {
        let bias = registries.family_bias(target_family);
        let bias_reason = format!("Amp family voicing {}", target_family.to_db_str());
        nudger.nudge(ControlBand::Bass, bias.bass, &bias_reason);
        nudger.nudge(ControlBand::Mids, bias.mids, &bias_reason);
        nudger.nudge(ControlBand::Treble, bias.treble, &bias_reason);
        nudger.nudge(ControlBand::Gain, bias.gain, &bias_reason);
    }

    nudger.mapping
}
