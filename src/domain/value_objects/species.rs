//! Creature species and the capability table derived from them

use serde::{Deserialize, Serialize};

/// The kind of creature
///
/// Capabilities are a pure function of the species; a creature never
/// changes species after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    /// A generic animal with no particular traits
    Animal,
    Bird { can_fly: bool },
    Fish,
    Cat,
    Dog,
    Person,
}

impl Species {
    pub fn is_person(&self) -> bool {
        matches!(self, Species::Person)
    }

    /// Human-readable type label, used when a creature has no name
    pub fn label(&self) -> &'static str {
        match self {
            Species::Animal => "Animal",
            Species::Bird { .. } => "Bird",
            Species::Fish => "Fish",
            Species::Cat => "Cat",
            Species::Dog => "Dog",
            Species::Person => "Person",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        let base = Capabilities::default();
        match *self {
            Species::Animal => base,
            Species::Bird { can_fly } => Capabilities {
                has_tail: true,
                has_feathers: true,
                can_fly,
                lays_eggs: true,
                ..base
            },
            Species::Fish => Capabilities {
                has_tail: true,
                has_scales: true,
                has_gills: true,
                ..base
            },
            Species::Cat => Capabilities {
                leg_count: 4,
                has_tail: true,
                is_fluffy: true,
                has_paws: true,
                is_mammal: true,
                has_hair: true,
                sound: "meow",
                ..base
            },
            Species::Dog => Capabilities {
                leg_count: 4,
                has_tail: true,
                wags_tail: true,
                has_paws: true,
                is_mammal: true,
                has_hair: true,
                sound: "woof",
                ..base
            },
            Species::Person => Capabilities {
                leg_count: 2,
                is_mammal: true,
                has_hair: true,
                can_change_hair_color: true,
                sound: "bla bla bla",
                ..base
            },
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "animal" => Ok(Species::Animal),
            "bird" => Ok(Species::Bird { can_fly: true }),
            "flightless bird" => Ok(Species::Bird { can_fly: false }),
            "fish" => Ok(Species::Fish),
            "cat" => Ok(Species::Cat),
            "dog" => Ok(Species::Dog),
            "person" => Ok(Species::Person),
            other => Err(other.to_string()),
        }
    }
}

/// Per-species traits gating what a creature can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub leg_count: u8,
    pub has_tail: bool,
    pub wags_tail: bool,
    pub is_fluffy: bool,
    pub has_paws: bool,
    pub has_scales: bool,
    pub has_gills: bool,
    pub is_mammal: bool,
    pub has_feathers: bool,
    pub can_fly: bool,
    pub lays_eggs: bool,
    pub has_hair: bool,
    pub can_change_hair_color: bool,
    pub sound: &'static str,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            leg_count: 0,
            has_tail: false,
            wags_tail: false,
            is_fluffy: false,
            has_paws: false,
            has_scales: false,
            has_gills: false,
            is_mammal: false,
            has_feathers: false,
            can_fly: false,
            lays_eggs: false,
            has_hair: false,
            can_change_hair_color: false,
            sound: "silence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_capabilities() {
        let caps = Species::Person.capabilities();
        assert_eq!(caps.leg_count, 2);
        assert!(caps.can_change_hair_color);
        assert!(caps.is_mammal);
    }

    #[test]
    fn test_pets_cannot_change_hair_color() {
        assert!(!Species::Dog.capabilities().can_change_hair_color);
        assert!(!Species::Cat.capabilities().can_change_hair_color);
        assert!(Species::Dog.capabilities().wags_tail);
        assert_eq!(Species::Cat.capabilities().sound, "meow");
    }

    #[test]
    fn test_bird_flight_follows_variant() {
        assert!(Species::Bird { can_fly: true }.capabilities().can_fly);
        assert!(!Species::Bird { can_fly: false }.capabilities().can_fly);
        assert!(Species::Bird { can_fly: false }.capabilities().lays_eggs);
    }

    #[test]
    fn test_species_parsing() {
        assert_eq!("Dog".parse::<Species>(), Ok(Species::Dog));
        assert_eq!(" fish ".parse::<Species>(), Ok(Species::Fish));
        assert!("dragon".parse::<Species>().is_err());
    }
}
