//! Strongly-typed identifiers and the process-wide identity registry
//!
//! Every entity kind draws its ids from its own monotonically increasing
//! counter. The first id issued is 1; 0 is never issued and stands for
//! "no entity". Ids are never reused, even after the entity is detached.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// The entity kinds that own an id namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdKind {
    Person,
    Family,
    Community,
    World,
    /// Non-person creatures (pets and wild animals)
    Animal,
}

impl IdKind {
    pub const ALL: [IdKind; 5] = [
        IdKind::Person,
        IdKind::Family,
        IdKind::Community,
        IdKind::World,
        IdKind::Animal,
    ];

    fn counter(self) -> &'static AtomicU64 {
        match self {
            IdKind::Person => &PERSON_COUNTER,
            IdKind::Family => &FAMILY_COUNTER,
            IdKind::Community => &COMMUNITY_COUNTER,
            IdKind::World => &WORLD_COUNTER,
            IdKind::Animal => &ANIMAL_COUNTER,
        }
    }
}

static PERSON_COUNTER: AtomicU64 = AtomicU64::new(0);
static FAMILY_COUNTER: AtomicU64 = AtomicU64::new(0);
static COMMUNITY_COUNTER: AtomicU64 = AtomicU64::new(0);
static WORLD_COUNTER: AtomicU64 = AtomicU64::new(0);
static ANIMAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-wide issuer of entity ids
///
/// Counters only move forward. [`IdRegistry::reprime`] is reserved for the
/// snapshot loader, which raises each counter past the ids it restores.
pub struct IdRegistry;

impl IdRegistry {
    /// Exclusive upper bound of every id namespace
    pub const LIMIT: u64 = u64::MAX;

    /// Issue the next id for `kind`, or `None` once the namespace is used up
    pub fn next_id(kind: IdKind) -> Option<u64> {
        kind.counter()
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, advance)
            .ok()
            .and_then(advance)
    }

    /// The last id issued for `kind` (0 if none yet)
    pub fn peek(kind: IdKind) -> u64 {
        kind.counter().load(Ordering::SeqCst)
    }

    /// Raise the counter for `kind` to at least `at_least`; never lowers it
    pub(crate) fn reprime(kind: IdKind, at_least: u64) {
        kind.counter().fetch_max(at_least, Ordering::SeqCst);
    }

    /// Current value of every counter
    pub fn snapshot() -> IdCounters {
        IdCounters {
            person: Self::peek(IdKind::Person),
            family: Self::peek(IdKind::Family),
            community: Self::peek(IdKind::Community),
            world: Self::peek(IdKind::World),
            animal: Self::peek(IdKind::Animal),
        }
    }
}

/// The id after `last`; ids stay below [`IdRegistry::LIMIT`] and never wrap
fn advance(last: u64) -> Option<u64> {
    last.checked_add(1).filter(|&next| next < IdRegistry::LIMIT)
}

/// Recorded values of the identity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub person: u64,
    pub family: u64,
    pub community: u64,
    pub world: u64,
    #[serde(default)]
    pub animal: u64,
}

impl IdCounters {
    pub fn get(&self, kind: IdKind) -> u64 {
        match kind {
            IdKind::Person => self.person,
            IdKind::Family => self.family,
            IdKind::Community => self.community,
            IdKind::World => self.world,
            IdKind::Animal => self.animal,
        }
    }

    pub fn raise(&mut self, kind: IdKind, value: u64) {
        let slot = match kind {
            IdKind::Person => &mut self.person,
            IdKind::Family => &mut self.family,
            IdKind::Community => &mut self.community,
            IdKind::World => &mut self.world,
            IdKind::Animal => &mut self.animal,
        };
        *slot = (*slot).max(value);
    }
}

macro_rules! define_id {
    ($name:ident, $kind:expr) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const KIND: IdKind = $kind;

            /// Allocate a fresh id from the registry
            pub fn next() -> Option<Self> {
                IdRegistry::next_id($kind).map(Self)
            }

            pub fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

define_id!(PersonId, IdKind::Person);
define_id!(FamilyId, IdKind::Family);
define_id!(CommunityId, IdKind::Community);
define_id!(WorldId, IdKind::World);
define_id!(AnimalId, IdKind::Animal);

/// Any creature in the arena: a person or a non-person animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreatureId {
    Person(PersonId),
    Animal(AnimalId),
}

impl From<PersonId> for CreatureId {
    fn from(id: PersonId) -> Self {
        CreatureId::Person(id)
    }
}

impl From<AnimalId> for CreatureId {
    fn from(id: AnimalId) -> Self {
        CreatureId::Animal(id)
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatureId::Person(id) => write!(f, "person#{}", id),
            CreatureId::Animal(id) => write!(f, "animal#{}", id),
        }
    }
}
