//! Universe Aggregate - the arena that owns every entity of the registry
//!
//! Worlds, communities, families and creatures live here keyed by id.
//! Relationships are stored as ids on both ends (forward lists on the
//! container, a back-link on the member) and every mutation that touches a
//! relationship goes through this aggregate root so both ends stay in step.
//!
//! Mutations are split across sibling modules:
//! - `membership`: adding and removing members of containers
//! - `conduct`: attribute changes on creatures and renames
//! - `queries`: read-only navigation and population counts

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::entities::{Animal, Community, Family, NewCreature, World};
use crate::domain::error::{normalize_name, DomainError, DomainResult, ValidationError};
use crate::domain::events::{ChangeCallback, EntityRef, Notifier};
use crate::domain::value_objects::{
    AnimalId, CommunityId, CreatureId, FamilyId, IdKind, PersonId, RegistrySettings, WorldId,
};

fn allocate<T>(id: Option<T>, kind: IdKind) -> DomainResult<T> {
    id.ok_or(DomainError::IdsExhausted(kind))
}

/// The Universe Aggregate Root
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Universe {
    pub(crate) settings: RegistrySettings,
    pub(crate) worlds: BTreeMap<WorldId, World>,
    pub(crate) communities: BTreeMap<CommunityId, Community>,
    pub(crate) families: BTreeMap<FamilyId, Family>,
    pub(crate) people: BTreeMap<PersonId, Animal>,
    pub(crate) animals: BTreeMap<AnimalId, Animal>,
}

impl Universe {
    /// Create an empty universe with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: RegistrySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    // ========================================================================
    // Construction
    // ========================================================================

    pub fn create_world(&mut self, name: &str) -> DomainResult<WorldId> {
        let name = normalize_name(name)?;
        let world = World::new(allocate(WorldId::next(), IdKind::World)?, &name)?;
        let id = world.id();
        info!(world_id = %id, name = %name, "world created");
        self.worlds.insert(id, world);
        Ok(id)
    }

    pub fn create_community(&mut self, name: &str) -> DomainResult<CommunityId> {
        let name = normalize_name(name)?;
        let community = Community::new(allocate(CommunityId::next(), IdKind::Community)?, &name)?;
        let id = community.id();
        info!(community_id = %id, name = %name, "community created");
        self.communities.insert(id, community);
        Ok(id)
    }

    pub fn create_family(&mut self, name: &str) -> DomainResult<FamilyId> {
        let name = normalize_name(name)?;
        let family = Family::new(allocate(FamilyId::next(), IdKind::Family)?, &name)?;
        let id = family.id();
        info!(family_id = %id, name = %name, "family created");
        self.families.insert(id, family);
        Ok(id)
    }

    pub fn create_person(&mut self, params: NewCreature) -> DomainResult<PersonId> {
        let (id, person) = self.build_person(params)?;
        self.insert_person(id, person);
        Ok(id)
    }

    /// Create a non-person creature
    pub fn create_animal(&mut self, params: NewCreature) -> DomainResult<AnimalId> {
        if params.species.is_person() {
            return Err(ValidationError::PersonAsAnimal.into());
        }
        let id = allocate(AnimalId::next(), IdKind::Animal)?;
        let animal = Animal::new(CreatureId::Animal(id), params, &self.settings)?;
        debug!(animal_id = %id, species = %animal.species(), "animal created");
        self.animals.insert(id, animal);
        Ok(id)
    }

    /// Validate and build a person without adding it to the arena
    pub(crate) fn build_person(&self, params: NewCreature) -> DomainResult<(PersonId, Animal)> {
        if !params.species.is_person() {
            return Err(ValidationError::NotAPerson.into());
        }
        if let Some(name) = params.name.as_deref() {
            normalize_name(name)?;
        }
        let id = allocate(PersonId::next(), IdKind::Person)?;
        let person = Animal::new(CreatureId::Person(id), params, &self.settings)?;
        Ok((id, person))
    }

    pub(crate) fn insert_person(&mut self, id: PersonId, person: Animal) {
        info!(person_id = %id, name = %person.display_name(), "person created");
        self.people.insert(id, person);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn world(&self, id: WorldId) -> DomainResult<&World> {
        self.worlds
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("world {}", id)))
    }

    pub fn community(&self, id: CommunityId) -> DomainResult<&Community> {
        self.communities
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("community {}", id)))
    }

    pub fn family(&self, id: FamilyId) -> DomainResult<&Family> {
        self.families
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("family {}", id)))
    }

    pub fn person(&self, id: PersonId) -> DomainResult<&Animal> {
        self.people
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("person {}", id)))
    }

    pub fn animal(&self, id: AnimalId) -> DomainResult<&Animal> {
        self.animals
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("animal {}", id)))
    }

    pub fn creature(&self, id: impl Into<CreatureId>) -> DomainResult<&Animal> {
        match id.into() {
            CreatureId::Person(id) => self.person(id),
            CreatureId::Animal(id) => self.animal(id),
        }
    }

    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.values()
    }

    pub fn communities(&self) -> impl Iterator<Item = &Community> {
        self.communities.values()
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    pub fn people(&self) -> impl Iterator<Item = &Animal> {
        self.people.values()
    }

    pub fn animals(&self) -> impl Iterator<Item = &Animal> {
        self.animals.values()
    }

    pub(crate) fn family_mut(&mut self, id: FamilyId) -> DomainResult<&mut Family> {
        self.families
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("family {}", id)))
    }

    pub(crate) fn community_mut(&mut self, id: CommunityId) -> DomainResult<&mut Community> {
        self.communities
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("community {}", id)))
    }

    pub(crate) fn world_mut(&mut self, id: WorldId) -> DomainResult<&mut World> {
        self.worlds
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("world {}", id)))
    }

    pub(crate) fn person_mut(&mut self, id: PersonId) -> DomainResult<&mut Animal> {
        self.people
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("person {}", id)))
    }

    pub(crate) fn animal_mut(&mut self, id: AnimalId) -> DomainResult<&mut Animal> {
        self.animals
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("animal {}", id)))
    }

    pub(crate) fn creature_mut(&mut self, id: CreatureId) -> DomainResult<&mut Animal> {
        match id {
            CreatureId::Person(id) => self.person_mut(id),
            CreatureId::Animal(id) => self.animal_mut(id),
        }
    }

    // ========================================================================
    // Change notification
    // ========================================================================

    /// Register (or clear, with `None`) the self-changed callback of `entity`
    pub fn set_self_changed(
        &mut self,
        entity: EntityRef,
        callback: Option<ChangeCallback>,
    ) -> DomainResult<()> {
        self.notifier_mut(entity)?.set_self_changed(callback);
        Ok(())
    }

    /// Register (or clear, with `None`) the container-changed callback of `entity`
    pub fn set_container_changed(
        &mut self,
        entity: EntityRef,
        callback: Option<ChangeCallback>,
    ) -> DomainResult<()> {
        self.notifier_mut(entity)?.set_container_changed(callback);
        Ok(())
    }

    pub(crate) fn notifier_mut(&mut self, entity: EntityRef) -> DomainResult<&mut Notifier> {
        Ok(match entity {
            EntityRef::World(id) => self.world_mut(id)?.notifier_mut(),
            EntityRef::Community(id) => self.community_mut(id)?.notifier_mut(),
            EntityRef::Family(id) => self.family_mut(id)?.notifier_mut(),
            EntityRef::Creature(id) => self.creature_mut(id)?.notifier_mut(),
        })
    }

    /// Fire the attribute-change channels of an entity that is known to exist
    pub(crate) fn notify_attributes(&mut self, entity: EntityRef) {
        if let Ok(notifier) = self.notifier_mut(entity) {
            notifier.fire_attributes(entity);
        }
    }

    /// Fire the membership-change channel of a container that is known to exist
    pub(crate) fn notify_members(&mut self, entity: EntityRef) {
        if let Ok(notifier) = self.notifier_mut(entity) {
            notifier.fire_members(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::value_objects::Species;

    #[test]
    fn test_creation_assigns_increasing_ids() {
        let mut universe = Universe::new();
        let a = universe.create_family("Smith").unwrap();
        let b = universe.create_family("Jones").unwrap();
        assert!(b > a);

        let w1 = universe.create_world("Earth").unwrap();
        let w2 = universe.create_world("Mars").unwrap();
        assert!(w2 > w1);
    }

    #[test]
    fn test_blank_names_rejected_without_side_effects() {
        let mut universe = Universe::new();
        let err = universe.create_community("   ").unwrap_err();
        assert_eq!(err, DomainError::Validation(ValidationError::EmptyName));
        assert_eq!(universe.communities().count(), 0);
    }

    #[test]
    fn test_person_and_animal_namespaces_are_separate() {
        let mut universe = Universe::new();
        let ann = universe
            .create_person(
                NewCreature::person("Ann").born_on(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()),
            )
            .unwrap();
        let rex = universe
            .create_animal(NewCreature::animal(Species::Dog).named("Rex"))
            .unwrap();

        assert!(universe.creature(ann).unwrap().is_person());
        assert!(!universe.creature(rex).unwrap().is_person());

        let err = universe
            .create_animal(NewCreature::person("Bob").aged(30))
            .unwrap_err();
        assert_eq!(err, DomainError::Validation(ValidationError::PersonAsAnimal));

        let err = universe
            .create_person(NewCreature::animal(Species::Cat).named("Tom"))
            .unwrap_err();
        assert_eq!(err, DomainError::Validation(ValidationError::NotAPerson));
    }

    #[test]
    fn test_unknown_entity_lookups_are_not_found() {
        let universe = Universe::new();
        assert!(universe.family(FamilyId::from_raw(0)).unwrap_err().is_not_found());
        assert!(universe.person(PersonId::from_raw(0)).unwrap_err().is_not_found());
    }
}
