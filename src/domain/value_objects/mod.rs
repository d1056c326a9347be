//! Value objects - Immutable objects defined by their attributes

mod action;
mod ids;
mod settings;
mod species;
mod traits;

pub use action::{Action, ActionRecord};
pub use ids::*;
pub use settings::RegistrySettings;
pub use species::{Capabilities, Species};
pub use traits::{Emotion, Gender};
