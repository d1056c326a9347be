//! Registry settings value object
//!
//! Tunables that shape creature behaviour. Loaded by
//! `infrastructure::config`; never written into snapshots.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistrySettings {
    // Movement
    /// A single walk of at least this distance leaves the walker tired
    pub walking_tiredness_distance: f64,
    /// A single run of at least this distance leaves the runner warm, sweaty and tired
    pub running_tiredness_distance: f64,
    pub distance_units: String,

    // Creature defaults
    pub default_eye_color: String,
    pub default_person_hair_color: String,

    // Families
    pub max_living_parents: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            walking_tiredness_distance: 5.0,
            running_tiredness_distance: 1.0,
            distance_units: "km".to_string(),
            default_eye_color: "blue".to_string(),
            default_person_hair_color: "brunette".to_string(),
            max_living_parents: 2,
        }
    }
}
