//! Hardware vocabulary tables.
//!
//! Hand-curated domain knowledge used by the scorer and the amp mapper. The
//! defaults live in the `const` tables below; deployments can replace single
//! entries through the `[registries]` section of the config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::gear_store::{AmpFamily, PickupType};

/// Distance used for any pair of pickup types missing from the table.
pub const UNRELATED_TYPE_DISTANCE: f64 = 3.0;

/// Acoustically similar pickup families. Lookups are symmetric.
const PICKUP_TYPE_DISTANCES: &[(PickupType, PickupType, f64)] = &[
    (PickupType::Humbucker, PickupType::Filtertron, 1.0),
    (PickupType::Humbucker, PickupType::MiniHumbucker, 1.0),
    (PickupType::SingleCoil, PickupType::P90, 1.0),
    (PickupType::MiniHumbucker, PickupType::Filtertron, 1.0),
    (PickupType::SingleCoil, PickupType::Lipstick, 1.0),
    (PickupType::Lipstick, PickupType::GoldFoil, 1.0),
    (PickupType::SingleCoil, PickupType::GoldFoil, 2.0),
    (PickupType::P90, PickupType::Humbucker, 2.0),
    (PickupType::P90, PickupType::MiniHumbucker, 2.0),
    (PickupType::P90, PickupType::GoldFoil, 2.0),
];

/// Bass/mids/treble nudge, in knob units on the 0-10 scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EqDelta {
    #[serde(default)]
    pub bass: f64,
    #[serde(default)]
    pub mids: f64,
    #[serde(default)]
    pub treble: f64,
}

const HUMBUCKER_TO_SINGLE_COIL: EqDelta = EqDelta {
    bass: 0.5,
    mids: 1.0,
    treble: -1.0,
};

const SINGLE_COIL_TO_HUMBUCKER: EqDelta = EqDelta {
    bass: -0.5,
    mids: -1.0,
    treble: 1.0,
};

/// How a family's knobs read compared to a neutral amp at the same position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyBias {
    #[serde(default)]
    pub bass: f64,
    #[serde(default)]
    pub mids: f64,
    #[serde(default)]
    pub treble: f64,
    #[serde(default)]
    pub gain: f64,
}

const ZERO_BIAS: FamilyBias = FamilyBias {
    bass: 0.0,
    mids: 0.0,
    treble: 0.0,
    gain: 0.0,
};

// Families not listed here (blackstar, peavey, line6, boss, modeling,
// solid_state, other) carry no bias.
const FAMILY_BIASES: &[(AmpFamily, FamilyBias)] = &[
    (
        AmpFamily::Marshall,
        FamilyBias {
            gain: 1.0,
            ..ZERO_BIAS
        },
    ),
    (
        AmpFamily::Fender,
        FamilyBias {
            mids: 0.5,
            ..ZERO_BIAS
        },
    ),
    (
        AmpFamily::Vox,
        FamilyBias {
            treble: -0.5,
            ..ZERO_BIAS
        },
    ),
    (
        AmpFamily::Orange,
        FamilyBias {
            bass: -0.5,
            ..ZERO_BIAS
        },
    ),
];

/// One replaced entry of the pickup distance table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PickupDistanceOverride {
    pub a: PickupType,
    pub b: PickupType,
    pub distance: f64,
}

/// Replacement entries read from the `[registries]` config section.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RegistryOverrides {
    #[serde(default)]
    pub pickup_distances: Vec<PickupDistanceOverride>,
    pub humbucker_to_single_coil: Option<EqDelta>,
    pub single_coil_to_humbucker: Option<EqDelta>,
    /// Keyed by family tag, e.g. `marshall`.
    #[serde(default)]
    pub family_bias: HashMap<String, FamilyBias>,
}

impl RegistryOverrides {
    pub fn is_empty(&self) -> bool {
        self == &RegistryOverrides::default()
    }
}

#[derive(Clone, Debug)]
pub struct Registries {
    pickup_distances: HashMap<(PickupType, PickupType), f64>,
    humbucker_to_single_coil: EqDelta,
    single_coil_to_humbucker: EqDelta,
    family_biases: HashMap<AmpFamily, FamilyBias>,
}

impl Default for Registries {
    fn default() -> Self {
        let mut pickup_distances = HashMap::new();
        for (a, b, distance) in PICKUP_TYPE_DISTANCES {
            pickup_distances.insert((*a, *b), *distance);
            pickup_distances.insert((*b, *a), *distance);
        }
        Registries {
            pickup_distances,
            humbucker_to_single_coil: HUMBUCKER_TO_SINGLE_COIL,
            single_coil_to_humbucker: SINGLE_COIL_TO_HUMBUCKER,
            family_biases: FAMILY_BIASES.iter().copied().collect(),
        }
    }
}

impl Registries {
    /// Default tables with the given entries replaced.
    pub fn with_overrides(overrides: &RegistryOverrides) -> Self {
        let mut registries = Registries::default();
        for entry in &overrides.pickup_distances {
            registries
                .pickup_distances
                .insert((entry.a, entry.b), entry.distance);
            registries
                .pickup_distances
                .insert((entry.b, entry.a), entry.distance);
        }
        if let Some(delta) = overrides.humbucker_to_single_coil {
            registries.humbucker_to_single_coil = delta;
        }
        if let Some(delta) = overrides.single_coil_to_humbucker {
            registries.single_coil_to_humbucker = delta;
        }
        for (tag, bias) in &overrides.family_bias {
            registries
                .family_biases
                .insert(AmpFamily::from_db_str(tag), *bias);
        }
        registries
    }

    /// Dissimilarity of two pickup types: 0 when identical, 3 when unrelated.
    pub fn type_distance(&self, a: PickupType, b: PickupType) -> f64 {
        if a == b {
            return 0.0;
        }
        self.pickup_distances
            .get(&(a, b))
            .copied()
            .unwrap_or(UNRELATED_TYPE_DISTANCE)
    }

    /// EQ correction when moving from `reference` to `target` pickups.
    pub fn eq_compensation(&self, reference: PickupType, target: PickupType) -> EqDelta {
        match (reference, target) {
            (PickupType::Humbucker, PickupType::SingleCoil) => self.humbucker_to_single_coil,
            (PickupType::SingleCoil, PickupType::Humbucker) => self.single_coil_to_humbucker,
            _ => EqDelta::default(),
        }
    }

    pub fn family_bias(&self, family: AmpFamily) -> FamilyBias {
        self.family_biases
            .get(&family)
            .copied()
            .unwrap_or(ZERO_BIAS)
    }
}
