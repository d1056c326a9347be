//! popreg - a hierarchical population registry
//!
//! A [`Universe`] owns worlds, which hold communities, which hold families of
//! people (as parents and children) and animals (as pets). Every relational
//! change goes through the universe so both ends of a relationship stay in
//! step, the family rules hold, and registered callbacks fire.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use popreg::{export, NewCreature, Universe};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut universe = Universe::new();
//! let earth = universe.create_world("Earth")?;
//! let north = universe.new_community(earth, "Northland")?;
//! let smith = universe.new_family(north, "Smith")?;
//! let ann = universe.create_person(
//!     NewCreature::person("Ann").born_on(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()),
//! )?;
//! universe.add_parent(smith, ann)?;
//!
//! export::save_to_path(&universe, "registry.json")?;
//! let restored = export::load_from_path("registry.json")?;
//! assert_eq!(restored.family_population(smith)?, 1);
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::aggregates::Universe;
pub use domain::entities::{Animal, Community, Family, NewCreature, World};
pub use domain::error::{DomainError, DomainResult, ValidationError};
pub use domain::events::{Change, ChangeCallback, ChangeKind, EntityRef};
pub use domain::value_objects::{
    Action, ActionRecord, AnimalId, Capabilities, CommunityId, CreatureId, Emotion, FamilyId,
    Gender, IdCounters, IdKind, IdRegistry, PersonId, RegistrySettings, Species, WorldId,
};
pub use infrastructure::config::RegistryConfig;
pub use infrastructure::export::{self, PersistenceError};
pub use infrastructure::telemetry::init_tracing;
