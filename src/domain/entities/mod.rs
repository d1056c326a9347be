//! Domain entities - Core business objects with identity

mod animal;
mod community;
mod family;
mod world;

pub use animal::{Animal, NewCreature};
pub(crate) use animal::today;
pub use community::Community;
pub use family::Family;
pub use world::World;
