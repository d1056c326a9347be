//! Versioned JSON snapshot of the whole registry

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::aggregates::Universe;
use crate::domain::entities::{Animal, Community, Family, World};
use crate::domain::value_objects::{
    CreatureId, FamilyId, IdCounters, IdKind, IdRegistry, RegistrySettings,
};

/// Snapshot layout written by this version of the crate
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Everything needed to rebuild a [`Universe`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    /// Counter values at save time
    pub counters: IdCounters,
    pub worlds: Vec<World>,
    pub communities: Vec<Community>,
    pub families: Vec<Family>,
    pub people: Vec<Animal>,
    pub animals: Vec<Animal>,
}

#[derive(Deserialize)]
struct Header {
    format_version: u32,
}

impl Snapshot {
    pub fn capture(universe: &Universe) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            counters: IdRegistry::snapshot(),
            worlds: universe.worlds.values().cloned().collect(),
            communities: universe.communities.values().cloned().collect(),
            families: universe.families.values().cloned().collect(),
            people: universe.people.values().cloned().collect(),
            animals: universe.animals.values().cloned().collect(),
        }
    }

    /// Rebuild the registry, check its integrity and advance the id counters
    pub fn restore(self, settings: RegistrySettings) -> Result<Universe, PersistenceError> {
        if self.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.format_version,
                supported: FORMAT_VERSION,
            });
        }

        let mut counters = self.counters;
        let mut universe = Universe::with_settings(settings);

        for world in self.worlds {
            let id = world.id();
            counters.raise(IdKind::World, issued(IdKind::World, id.as_u64())?);
            unique(universe.worlds.insert(id, world), "world", id)?;
        }
        for community in self.communities {
            let id = community.id();
            counters.raise(IdKind::Community, issued(IdKind::Community, id.as_u64())?);
            unique(universe.communities.insert(id, community), "community", id)?;
        }
        for family in self.families {
            let id = family.id();
            counters.raise(IdKind::Family, issued(IdKind::Family, id.as_u64())?);
            unique(universe.families.insert(id, family), "family", id)?;
        }
        for person in self.people {
            let id = match person.id() {
                CreatureId::Person(id) if person.is_person() => id,
                other => return Err(corrupt(format!("{} listed among people", other))),
            };
            counters.raise(IdKind::Person, issued(IdKind::Person, id.as_u64())?);
            unique(universe.people.insert(id, person), "person", id)?;
        }
        for animal in self.animals {
            let id = match animal.id() {
                CreatureId::Animal(id) if !animal.is_person() => id,
                other => return Err(corrupt(format!("{} listed among animals", other))),
            };
            counters.raise(IdKind::Animal, issued(IdKind::Animal, id.as_u64())?);
            unique(universe.animals.insert(id, animal), "animal", id)?;
        }

        for kind in IdKind::ALL {
            if counters.get(kind) >= IdRegistry::LIMIT {
                return Err(corrupt(format!("{:?} counter is exhausted", kind)));
            }
        }
        check_integrity(&universe)?;

        for kind in IdKind::ALL {
            IdRegistry::reprime(kind, counters.get(kind));
        }
        debug!(?counters, "id counters reprimed");
        Ok(universe)
    }
}

/// Encode the registry as JSON
pub fn save(universe: &Universe) -> Result<Vec<u8>, PersistenceError> {
    let bytes = serde_json::to_vec_pretty(&Snapshot::capture(universe))?;
    info!(
        bytes = bytes.len(),
        families = universe.families.len(),
        people = universe.people.len(),
        "registry saved"
    );
    Ok(bytes)
}

/// Decode a registry saved by [`save`], under default settings
pub fn load(bytes: &[u8]) -> Result<Universe, PersistenceError> {
    load_with_settings(bytes, RegistrySettings::default())
}

/// Decode a registry saved by [`save`]; settings are never stored in snapshots
pub fn load_with_settings(
    bytes: &[u8],
    settings: RegistrySettings,
) -> Result<Universe, PersistenceError> {
    let header: Header = serde_json::from_slice(bytes)?;
    if header.format_version != FORMAT_VERSION {
        warn!(found = header.format_version, "unsupported snapshot version");
        return Err(PersistenceError::UnsupportedVersion {
            found: header.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let snapshot: Snapshot = serde_json::from_slice(bytes)?;
    let universe = snapshot.restore(settings).map_err(|err| {
        warn!(error = %err, "snapshot rejected");
        err
    })?;
    info!(
        bytes = bytes.len(),
        families = universe.families.len(),
        people = universe.people.len(),
        "registry loaded"
    );
    Ok(universe)
}

fn corrupt(message: String) -> PersistenceError {
    PersistenceError::Corrupt(message)
}

/// Ids on disk must be ones the registry could have issued
fn issued(kind: IdKind, raw: u64) -> Result<u64, PersistenceError> {
    if raw == 0 || raw >= IdRegistry::LIMIT {
        return Err(corrupt(format!("{:?} id {} is out of range", kind, raw)));
    }
    Ok(raw)
}

/// Membership lists never repeat an id
fn distinct<T: Ord + std::fmt::Display>(
    ids: &[T],
    list: &str,
    owner: &str,
) -> Result<(), PersistenceError> {
    let mut seen = BTreeSet::new();
    match ids.iter().find(|id| !seen.insert(*id)) {
        Some(id) => Err(corrupt(format!("{} lists {} {} twice", owner, list, id))),
        None => Ok(()),
    }
}

fn unique<T>(previous: Option<T>, kind: &str, id: impl std::fmt::Display) -> Result<(), PersistenceError> {
    match previous {
        Some(_) => Err(corrupt(format!("duplicate {} {}", kind, id))),
        None => Ok(()),
    }
}

fn lookup<'a, K: Ord + std::fmt::Display, V>(
    map: &'a BTreeMap<K, V>,
    id: &K,
    kind: &str,
    owner: &str,
) -> Result<&'a V, PersistenceError> {
    map.get(id)
        .ok_or_else(|| corrupt(format!("{} references missing {} {}", owner, kind, id)))
}

/// Every reference resolves and every back-link mirrors its forward list
fn check_integrity(universe: &Universe) -> Result<(), PersistenceError> {
    for (&world_id, world) in &universe.worlds {
        let owner = format!("world {}", world_id);
        distinct(world.communities(), "community", &owner)?;
        for community_id in world.communities() {
            let community = lookup(&universe.communities, community_id, "community", &owner)?;
            if community.world_id() != Some(world_id) {
                return Err(corrupt(format!(
                    "community {} does not point back to world {}",
                    community_id, world_id
                )));
            }
        }
    }

    for (&community_id, community) in &universe.communities {
        let owner = format!("community {}", community_id);
        if let Some(world_id) = community.world_id() {
            let world: &World = lookup(&universe.worlds, &world_id, "world", &owner)?;
            if !world.has_community(community_id) {
                return Err(corrupt(format!("{} is not listed by world {}", owner, world_id)));
            }
        }
        distinct(community.families(), "family", &owner)?;
        for family_id in community.families() {
            let family = lookup(&universe.families, family_id, "family", &owner)?;
            if family.community_id() != Some(community_id) {
                return Err(corrupt(format!(
                    "family {} does not point back to community {}",
                    family_id, community_id
                )));
            }
        }
    }

    for (&family_id, family) in &universe.families {
        check_family(universe, family_id, family)?;
    }

    for (&person_id, person) in &universe.people {
        let owner = format!("person {}", person_id);
        if let Some(family_id) = person.family_id() {
            let family: &Family = lookup(&universe.families, &family_id, "family", &owner)?;
            if !family.has_child(person_id) {
                return Err(corrupt(format!("{} is not a child of family {}", owner, family_id)));
            }
        }
        for family_id in person.parent_of_families() {
            let family: &Family = lookup(&universe.families, family_id, "family", &owner)?;
            if !family.has_parent(person_id) {
                return Err(corrupt(format!("{} is not a parent of family {}", owner, family_id)));
            }
        }
    }

    for (&animal_id, animal) in &universe.animals {
        let owner = format!("animal {}", animal_id);
        if let Some(family_id) = animal.family_id() {
            let family: &Family = lookup(&universe.families, &family_id, "family", &owner)?;
            if !family.has_pet(animal_id) {
                return Err(corrupt(format!("{} is not a pet of family {}", owner, family_id)));
            }
        }
    }
    Ok(())
}

fn check_family(universe: &Universe, family_id: FamilyId, family: &Family) -> Result<(), PersistenceError> {
    let owner = format!("family {}", family_id);
    if let Some(community_id) = family.community_id() {
        let community: &Community =
            lookup(&universe.communities, &community_id, "community", &owner)?;
        if !community.has_family(family_id) {
            return Err(corrupt(format!("{} is not listed by community {}", owner, community_id)));
        }
    }

    distinct(family.parents(), "parent", &owner)?;
    distinct(family.children(), "child", &owner)?;
    distinct(family.pets(), "pet", &owner)?;

    let limit = universe.settings.max_living_parents;
    let living = family
        .parents()
        .iter()
        .filter(|parent| universe.people.get(parent).is_some_and(|p| p.is_alive()))
        .count();
    if living > limit {
        return Err(corrupt(format!(
            "{} has {} living parents (limit {})",
            owner, living, limit
        )));
    }

    for person_id in family.parents() {
        let person = lookup(&universe.people, person_id, "person", &owner)?;
        if !person.parent_of_families().contains(&family_id) {
            return Err(corrupt(format!(
                "parent {} of {} has no back-link",
                person_id, owner
            )));
        }
        if family.has_child(*person_id) {
            return Err(corrupt(format!(
                "person {} is both parent and child of {}",
                person_id, owner
            )));
        }
    }
    for person_id in family.children() {
        let person = lookup(&universe.people, person_id, "person", &owner)?;
        if person.family_id() != Some(family_id) {
            return Err(corrupt(format!("child {} of {} has no back-link", person_id, owner)));
        }
        for parent_id in family.parents() {
            let parent = lookup(&universe.people, parent_id, "person", &owner)?;
            match (parent.dob(), person.dob()) {
                (Some(parent_dob), Some(child_dob)) if parent_dob < child_dob => {}
                _ => {
                    return Err(corrupt(format!(
                        "parent {} is not older than child {} in {}",
                        parent_id, person_id, owner
                    )));
                }
            }
        }
    }
    for animal_id in family.pets() {
        let animal = lookup(&universe.animals, animal_id, "animal", &owner)?;
        if animal.family_id() != Some(family_id) {
            return Err(corrupt(format!("pet {} of {} belongs elsewhere", animal_id, owner)));
        }
    }
    Ok(())
}
