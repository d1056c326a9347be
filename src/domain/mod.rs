//! Domain layer - Core registry logic with no I/O
//!
//! This layer contains:
//! - Entities: World, Community, Family and the creature record
//! - Value Objects: ids, species, traits, audit actions, settings
//! - Aggregates: the Universe arena that owns every entity
//! - Events: change notification callbacks
//! - Errors: validation and lookup failures

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod value_objects;
