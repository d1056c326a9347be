//! Membership mutations: children, parents and pets of families, families of
//! communities, communities of worlds
//!
//! Every operation runs all of its checks against the current state before
//! touching anything, so a rejected call leaves the graph untouched and fires
//! no callbacks.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use super::Universe;
use crate::domain::entities::{today, Animal, NewCreature};
use crate::domain::error::{normalize_name, DomainError, DomainResult, ValidationError};
use crate::domain::events::EntityRef;
use crate::domain::value_objects::{
    Action, ActionRecord, AnimalId, CommunityId, CreatureId, FamilyId, Gender, PersonId, WorldId,
};

fn rejected(op: &'static str, err: DomainError) -> DomainError {
    warn!(op, error = %err, "operation rejected");
    err
}

impl Universe {
    // ========================================================================
    // Children
    // ========================================================================

    /// Add `person` as a child of `family`
    ///
    /// # Invariants
    /// - the person is neither a parent nor a child here
    /// - the person is not a child of another family
    /// - the person was born strictly after every recorded parent
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, family_id: FamilyId, person_id: PersonId) -> DomainResult<()> {
        let person = self.person(person_id)?;
        let (dob, current) = (person.dob(), person.family_id());
        self.check_child(family_id, person_id, dob, current)
            .map_err(|err| rejected("add_child", err))?;
        self.link_child(family_id, person_id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, family_id: FamilyId, person_id: PersonId) -> DomainResult<()> {
        let family = self.family(family_id)?;
        self.person(person_id)?;
        if !family.has_child(person_id) {
            return Err(rejected(
                "remove_child",
                DomainError::not_found(format!(
                    "person {} is not a child in family {}",
                    person_id, family_id
                )),
            ));
        }

        let family = self.family_mut(family_id)?;
        family.take_child(person_id);
        let family_name = family.name().to_string();
        self.person_mut(person_id)?.leave_as_child(&family_name);
        info!(family_id = %family_id, person_id = %person_id, "removed child");
        self.notify_members(EntityRef::Family(family_id));
        Ok(())
    }

    /// A new person is born today into `family`
    pub fn gives_birth(
        &mut self,
        family_id: FamilyId,
        name: &str,
        gender: Gender,
    ) -> DomainResult<PersonId> {
        self.family(family_id)?;
        let (id, mut baby) = self.build_person(
            NewCreature::person(name)
                .born_on(today())
                .with_gender(gender),
        )?;
        self.check_child(family_id, id, baby.dob(), None)
            .map_err(|err| rejected("gives_birth", err))?;

        baby.record(ActionRecord::new(Action::WasBorn));
        self.insert_person(id, baby);
        self.link_child(family_id, id)?;
        Ok(id)
    }

    /// Add an existing person as an adopted child
    pub fn adopts_child(&mut self, family_id: FamilyId, person_id: PersonId) -> DomainResult<()> {
        let person = self.person(person_id)?;
        let (dob, current) = (person.dob(), person.family_id());
        self.check_child(family_id, person_id, dob, current)
            .map_err(|err| rejected("adopts_child", err))?;

        self.person_mut(person_id)?
            .record(ActionRecord::new(Action::WasAdopted));
        self.link_child(family_id, person_id)
    }

    fn check_child(
        &self,
        family_id: FamilyId,
        person_id: PersonId,
        dob: Option<NaiveDate>,
        current: Option<FamilyId>,
    ) -> DomainResult<()> {
        let family = self.family(family_id)?;
        if family.has_parent(person_id) {
            return Err(ValidationError::AlreadyParent {
                person: person_id,
                family: family_id,
            }
            .into());
        }
        if family.has_child(person_id) {
            return Err(ValidationError::AlreadyChild {
                person: person_id,
                family: family_id,
            }
            .into());
        }
        if let Some(other) = current {
            return Err(ValidationError::AlreadyChild {
                person: person_id,
                family: other,
            }
            .into());
        }

        let dob = dob.ok_or(ValidationError::UnknownBirthDate(person_id))?;
        for &parent in family.parents() {
            let parent_dob = self
                .person(parent)?
                .dob()
                .ok_or(ValidationError::UnknownBirthDate(parent))?;
            if dob <= parent_dob {
                return Err(ValidationError::ChildNotYounger {
                    person: person_id,
                    parent,
                }
                .into());
            }
        }
        Ok(())
    }

    fn link_child(&mut self, family_id: FamilyId, person_id: PersonId) -> DomainResult<()> {
        let family = self.family_mut(family_id)?;
        family.push_child(person_id);
        let family_name = family.name().to_string();
        self.person_mut(person_id)?
            .join_as_child(family_id, &family_name);
        info!(family_id = %family_id, person_id = %person_id, "added child");
        self.notify_members(EntityRef::Family(family_id));
        Ok(())
    }

    // ========================================================================
    // Parents
    // ========================================================================

    /// Add `person` as a parent of `family`
    ///
    /// # Invariants
    /// - the person is neither a parent nor a child here
    /// - fewer than the configured number of living parents are recorded
    /// - the person was born strictly before every child
    #[instrument(level = "debug", skip(self))]
    pub fn add_parent(&mut self, family_id: FamilyId, person_id: PersonId) -> DomainResult<()> {
        self.check_parent(family_id, person_id)
            .map_err(|err| rejected("add_parent", err))?;

        let family = self.family_mut(family_id)?;
        family.push_parent(person_id);
        let family_name = family.name().to_string();
        self.person_mut(person_id)?
            .join_as_parent(family_id, &family_name);
        info!(family_id = %family_id, person_id = %person_id, "added parent");
        self.notify_members(EntityRef::Family(family_id));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_parent(&mut self, family_id: FamilyId, person_id: PersonId) -> DomainResult<()> {
        let family = self.family(family_id)?;
        self.person(person_id)?;
        if !family.has_parent(person_id) {
            return Err(rejected(
                "remove_parent",
                DomainError::not_found(format!(
                    "person {} is not a parent in family {}",
                    person_id, family_id
                )),
            ));
        }

        let family = self.family_mut(family_id)?;
        family.take_parent(person_id);
        let family_name = family.name().to_string();
        self.person_mut(person_id)?
            .leave_as_parent(family_id, &family_name);
        info!(family_id = %family_id, person_id = %person_id, "removed parent");
        self.notify_members(EntityRef::Family(family_id));
        Ok(())
    }

    fn check_parent(&self, family_id: FamilyId, person_id: PersonId) -> DomainResult<()> {
        let family = self.family(family_id)?;
        let person = self.person(person_id)?;
        if family.has_parent(person_id) {
            return Err(ValidationError::AlreadyParent {
                person: person_id,
                family: family_id,
            }
            .into());
        }
        if family.has_child(person_id) {
            return Err(ValidationError::AlreadyChild {
                person: person_id,
                family: family_id,
            }
            .into());
        }

        let limit = self.settings.max_living_parents;
        if self.alive_parents(family_id)?.len() >= limit {
            return Err(ValidationError::TooManyParents {
                family: family_id,
                limit,
            }
            .into());
        }

        let dob = person
            .dob()
            .ok_or(ValidationError::UnknownBirthDate(person_id))?;
        for &child in family.children() {
            let child_dob = self
                .person(child)?
                .dob()
                .ok_or(ValidationError::UnknownBirthDate(child))?;
            if dob >= child_dob {
                return Err(ValidationError::ParentNotOlder {
                    person: person_id,
                    child,
                }
                .into());
            }
        }
        Ok(())
    }

    // ========================================================================
    // Pets
    // ========================================================================

    /// Tame `creature` into `family`, optionally giving it a new name
    #[instrument(level = "debug", skip(self))]
    pub fn add_pet(
        &mut self,
        family_id: FamilyId,
        creature: impl Into<CreatureId> + std::fmt::Debug,
        name: Option<&str>,
    ) -> DomainResult<()> {
        let (animal_id, name) = self
            .check_pet(family_id, creature.into(), name)
            .map_err(|err| rejected("add_pet", err))?;

        self.family_mut(family_id)?.push_pet(animal_id);
        self.animal_mut(animal_id)?.make_pet(family_id, name);
        info!(family_id = %family_id, animal_id = %animal_id, "added pet");
        self.notify_members(EntityRef::Family(family_id));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_pet(&mut self, family_id: FamilyId, animal_id: AnimalId) -> DomainResult<()> {
        let family = self.family(family_id)?;
        self.animal(animal_id)?;
        if !family.has_pet(animal_id) {
            return Err(rejected(
                "remove_pet",
                DomainError::not_found(format!(
                    "animal {} is not a pet of family {}",
                    animal_id, family_id
                )),
            ));
        }

        self.family_mut(family_id)?.take_pet(animal_id);
        self.animal_mut(animal_id)?.return_to_wild();
        info!(family_id = %family_id, animal_id = %animal_id, "removed pet");
        self.notify_members(EntityRef::Family(family_id));
        Ok(())
    }

    fn check_pet(
        &self,
        family_id: FamilyId,
        creature: CreatureId,
        name: Option<&str>,
    ) -> DomainResult<(AnimalId, Option<String>)> {
        let animal_id = match creature {
            CreatureId::Person(_) => return Err(ValidationError::IsPerson.into()),
            CreatureId::Animal(id) => id,
        };
        let family = self.family(family_id)?;
        let animal: &Animal = self.animal(animal_id)?;

        if let Some(owner) = animal.family_id() {
            return Err(ValidationError::AlreadyPet {
                animal: animal_id,
                family: owner,
            }
            .into());
        }
        if family.has_pet(animal_id) {
            return Err(ValidationError::AlreadyPet {
                animal: animal_id,
                family: family_id,
            }
            .into());
        }

        let name = name.map(normalize_name).transpose()?;
        if name.is_none() && animal.name().is_none() {
            return Err(ValidationError::UnnamedPet.into());
        }
        Ok((animal_id, name))
    }

    // ========================================================================
    // Communities and worlds
    // ========================================================================

    #[instrument(level = "debug", skip(self))]
    pub fn add_family(&mut self, community_id: CommunityId, family_id: FamilyId) -> DomainResult<()> {
        self.community(community_id)?;
        match self.family(family_id)?.community_id() {
            Some(current) if current == community_id => {
                return Err(rejected(
                    "add_family",
                    ValidationError::AlreadyInCommunity {
                        family: family_id,
                        community: community_id,
                    }
                    .into(),
                ));
            }
            Some(other) => {
                return Err(rejected(
                    "add_family",
                    ValidationError::InAnotherCommunity {
                        family: family_id,
                        community: other,
                    }
                    .into(),
                ));
            }
            None => {}
        }

        self.community_mut(community_id)?.push_family(family_id);
        self.family_mut(family_id)?.set_community(Some(community_id));
        info!(community_id = %community_id, family_id = %family_id, "added family");
        self.notify_members(EntityRef::Community(community_id));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_family(&mut self, community_id: CommunityId, family_id: FamilyId) -> DomainResult<()> {
        self.family(family_id)?;
        if !self.community(community_id)?.has_family(family_id) {
            return Err(rejected(
                "remove_family",
                DomainError::not_found(format!(
                    "family {} is not in community {}",
                    family_id, community_id
                )),
            ));
        }

        self.community_mut(community_id)?.take_family(family_id);
        self.family_mut(family_id)?.set_community(None);
        info!(community_id = %community_id, family_id = %family_id, "removed family");
        self.notify_members(EntityRef::Community(community_id));
        Ok(())
    }

    /// Create a family and add it to `community`
    pub fn new_family(&mut self, community_id: CommunityId, name: &str) -> DomainResult<FamilyId> {
        self.community(community_id)?;
        let family_id = self.create_family(name)?;
        self.add_family(community_id, family_id)?;
        Ok(family_id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_community(&mut self, world_id: WorldId, community_id: CommunityId) -> DomainResult<()> {
        self.world(world_id)?;
        match self.community(community_id)?.world_id() {
            Some(current) if current == world_id => {
                return Err(rejected(
                    "add_community",
                    ValidationError::AlreadyInWorld {
                        community: community_id,
                        world: world_id,
                    }
                    .into(),
                ));
            }
            Some(other) => {
                return Err(rejected(
                    "add_community",
                    ValidationError::InAnotherWorld {
                        community: community_id,
                        world: other,
                    }
                    .into(),
                ));
            }
            None => {}
        }

        self.world_mut(world_id)?.push_community(community_id);
        self.community_mut(community_id)?.set_world(Some(world_id));
        info!(world_id = %world_id, community_id = %community_id, "added community");
        self.notify_members(EntityRef::World(world_id));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove_community(&mut self, world_id: WorldId, community_id: CommunityId) -> DomainResult<()> {
        self.community(community_id)?;
        if !self.world(world_id)?.has_community(community_id) {
            return Err(rejected(
                "remove_community",
                DomainError::not_found(format!(
                    "community {} is not in world {}",
                    community_id, world_id
                )),
            ));
        }

        self.world_mut(world_id)?.take_community(community_id);
        self.community_mut(community_id)?.set_world(None);
        info!(world_id = %world_id, community_id = %community_id, "removed community");
        self.notify_members(EntityRef::World(world_id));
        Ok(())
    }

    /// Create a community and add it to `world`
    pub fn new_community(&mut self, world_id: WorldId, name: &str) -> DomainResult<CommunityId> {
        self.world(world_id)?;
        let community_id = self.create_community(name)?;
        self.add_community(world_id, community_id)?;
        Ok(community_id)
    }
}


// ============================================================================
// Community shortcuts: act on a person's family within a community
// ============================================================================

impl Universe {
    /// The family of `person` provided it belongs to `community`
    fn family_within(&self, community_id: CommunityId, person_id: PersonId) -> DomainResult<FamilyId> {
        self.community(community_id)?;
        let family = self.family_of(person_id)?;
        if family.community_id() != Some(community_id) {
            return Err(DomainError::not_found(format!(
                "family of person {} in community {}",
                person_id, community_id
            )));
        }
        Ok(family.id())
    }

    /// Add `sibling` as a child of the family `person` belongs to
    pub fn sibling_add(
        &mut self,
        community_id: CommunityId,
        person_id: PersonId,
        sibling: PersonId,
    ) -> DomainResult<()> {
        if person_id == sibling {
            return Err(rejected("sibling_add", ValidationError::SelfSibling(person_id).into()));
        }
        let family_id = self.family_within(community_id, person_id)?;
        self.add_child(family_id, sibling)
    }

    pub fn sibling_remove(
        &mut self,
        community_id: CommunityId,
        person_id: PersonId,
        sibling: PersonId,
    ) -> DomainResult<()> {
        if person_id == sibling {
            return Err(rejected("sibling_remove", ValidationError::SelfSibling(person_id).into()));
        }
        let family_id = self.family_within(community_id, person_id)?;
        self.remove_child(family_id, sibling)
    }

    pub fn parent_add_for(
        &mut self,
        community_id: CommunityId,
        person_id: PersonId,
        parent: PersonId,
    ) -> DomainResult<()> {
        let family_id = self.family_within(community_id, person_id)?;
        self.add_parent(family_id, parent)
    }

    pub fn parent_remove_for(
        &mut self,
        community_id: CommunityId,
        person_id: PersonId,
        parent: PersonId,
    ) -> DomainResult<()> {
        let family_id = self.family_within(community_id, person_id)?;
        self.remove_parent(family_id, parent)
    }

    /// Tame `animal` into the family of `person`
    pub fn pet_add_for(
        &mut self,
        community_id: CommunityId,
        person_id: PersonId,
        animal: AnimalId,
        name: Option<&str>,
    ) -> DomainResult<()> {
        let family_id = self.family_within(community_id, person_id)?;
        self.add_pet(family_id, animal, name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::events::{Change, ChangeKind};
    use crate::domain::value_objects::Species;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn person(universe: &mut Universe, name: &str, dob: NaiveDate) -> PersonId {
        universe
            .create_person(NewCreature::person(name).born_on(dob))
            .unwrap()
    }

    fn counter(universe: &mut Universe, entity: EntityRef) -> Arc<Mutex<Vec<ChangeKind>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        universe
            .set_container_changed(
                entity,
                Some(Box::new(move |change: &Change| sink.lock().unwrap().push(change.kind))),
            )
            .unwrap();
        log
    }

    #[test]
    fn test_add_then_remove_child_restores_family() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ed = person(&mut universe, "Ed", date(2005, 1, 1));

        universe.add_child(smith, ed).unwrap();
        assert_eq!(universe.family(smith).unwrap().children(), &[ed]);
        assert_eq!(universe.person(ed).unwrap().family_id(), Some(smith));

        universe.remove_child(smith, ed).unwrap();
        assert!(universe.family(smith).unwrap().children().is_empty());
        assert_eq!(universe.person(ed).unwrap().family_id(), None);

        let actions: Vec<Action> = universe
            .person(ed)
            .unwrap()
            .history()
            .iter()
            .map(|r| r.action)
            .collect();
        assert_eq!(actions, vec![Action::AddedToFamily, Action::RemovedFromFamily]);
    }

    #[test]
    fn test_child_must_be_younger_than_every_parent() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let twin = person(&mut universe, "Twin", date(1980, 1, 1));
        let older = person(&mut universe, "Older", date(1970, 1, 1));
        let ed = person(&mut universe, "Ed", date(1980, 1, 2));
        universe.add_parent(smith, ann).unwrap();

        for candidate in [twin, older] {
            let err = universe.add_child(smith, candidate).unwrap_err();
            assert_eq!(
                err,
                DomainError::Validation(ValidationError::ChildNotYounger {
                    person: candidate,
                    parent: ann
                })
            );
        }
        assert!(universe.family(smith).unwrap().children().is_empty());

        universe.add_child(smith, ed).unwrap();
        assert_eq!(universe.family(smith).unwrap().children(), &[ed]);
    }

    #[test]
    fn test_parent_must_be_older_than_every_child() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ed = person(&mut universe, "Ed", date(2005, 1, 1));
        let kid = person(&mut universe, "Kid", date(2010, 1, 1));
        universe.add_child(smith, ed).unwrap();

        let err = universe.add_parent(smith, kid).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation(ValidationError::ParentNotOlder {
                person: kid,
                child: ed
            })
        );
        assert!(universe.person(kid).unwrap().parent_of_families().is_empty());
    }

    #[test]
    fn test_person_cannot_be_parent_and_child_of_same_family() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let ed = person(&mut universe, "Ed", date(2005, 1, 1));
        universe.add_parent(smith, ann).unwrap();
        universe.add_child(smith, ed).unwrap();

        assert!(universe.add_child(smith, ann).unwrap_err().is_validation());
        assert!(universe.add_parent(smith, ed).unwrap_err().is_validation());
        assert!(universe.add_parent(smith, ann).unwrap_err().is_validation());
        assert!(universe.add_child(smith, ed).unwrap_err().is_validation());

        let family = universe.family(smith).unwrap();
        assert_eq!(family.parents(), &[ann]);
        assert_eq!(family.children(), &[ed]);
    }

    #[test]
    fn test_child_belongs_to_one_family_at_a_time() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let jones = universe.create_family("Jones").unwrap();
        let ed = person(&mut universe, "Ed", date(2005, 1, 1));
        universe.add_child(smith, ed).unwrap();

        let err = universe.add_child(jones, ed).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation(ValidationError::AlreadyChild {
                person: ed,
                family: smith
            })
        );
        assert!(universe.family(jones).unwrap().children().is_empty());
    }

    #[test]
    fn test_third_living_parent_rejected_but_dead_parent_replaceable() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let bob = person(&mut universe, "Bob", date(1978, 1, 1));
        let cat = person(&mut universe, "Cat", date(1982, 1, 1));
        universe.add_parent(smith, ann).unwrap();
        universe.add_parent(smith, bob).unwrap();

        let err = universe.add_parent(smith, cat).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation(ValidationError::TooManyParents {
                family: smith,
                limit: 2
            })
        );

        universe.die(bob).unwrap();
        universe.add_parent(smith, cat).unwrap();
        assert_eq!(universe.family(smith).unwrap().parents(), &[ann, bob, cat]);
        assert_eq!(universe.alive_parents(smith).unwrap(), vec![ann, cat]);
    }

    #[test]
    fn test_person_can_parent_several_families() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let jones = universe.create_family("Jones").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        universe.add_parent(smith, ann).unwrap();
        universe.add_parent(jones, ann).unwrap();

        let parent_of = universe.person(ann).unwrap().parent_of_families();
        assert!(parent_of.contains(&smith));
        assert!(parent_of.contains(&jones));

        universe.remove_parent(smith, ann).unwrap();
        let parent_of = universe.person(ann).unwrap().parent_of_families();
        assert!(!parent_of.contains(&smith));
        assert!(parent_of.contains(&jones));
    }

    #[test]
    fn test_removing_absent_members_is_not_found() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let rex = universe
            .create_animal(NewCreature::animal(Species::Dog).named("Rex"))
            .unwrap();

        assert!(universe.remove_child(smith, ann).unwrap_err().is_not_found());
        assert!(universe.remove_parent(smith, ann).unwrap_err().is_not_found());
        assert!(universe.remove_pet(smith, rex).unwrap_err().is_not_found());
    }

    #[test]
    fn test_pet_owned_elsewhere_cannot_be_added() {
        let mut universe = Universe::new();
        let a = universe.create_family("A").unwrap();
        let b = universe.create_family("B").unwrap();
        let rex = universe
            .create_animal(NewCreature::animal(Species::Dog).named("Rex"))
            .unwrap();
        universe.add_pet(b, rex, None).unwrap();

        let err = universe.add_pet(a, rex, Some("Max")).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation(ValidationError::AlreadyPet {
                animal: rex,
                family: b
            })
        );

        let animal = universe.animal(rex).unwrap();
        assert_eq!(animal.family_id(), Some(b));
        assert_eq!(animal.name(), Some("Rex"));
        assert!(universe.family(a).unwrap().pets().is_empty());
        assert_eq!(universe.family(b).unwrap().pets(), &[rex]);
    }

    #[test]
    fn test_pet_add_and_release() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let tom = universe
            .create_animal(NewCreature::animal(Species::Cat))
            .unwrap();

        let err = universe.add_pet(smith, tom, None).unwrap_err();
        assert_eq!(err, DomainError::Validation(ValidationError::UnnamedPet));

        universe.add_pet(smith, tom, Some(" Fluffy ")).unwrap();
        let cat = universe.animal(tom).unwrap();
        assert!(cat.is_pet());
        assert_eq!(cat.name(), Some("Fluffy"));

        universe.remove_pet(smith, tom).unwrap();
        let cat = universe.animal(tom).unwrap();
        assert!(cat.is_wild());
        assert_eq!(cat.family_id(), None);
        assert!(universe.family(smith).unwrap().pets().is_empty());
    }

    #[test]
    fn test_person_cannot_be_a_pet() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let err = universe.add_pet(smith, ann, None).unwrap_err();
        assert_eq!(err, DomainError::Validation(ValidationError::IsPerson));
    }

    #[test]
    fn test_family_joins_one_community_only() {
        let mut universe = Universe::new();
        let north = universe.create_community("Northland").unwrap();
        let south = universe.create_community("Southland").unwrap();
        let smith = universe.create_family("Smith").unwrap();
        universe.add_family(north, smith).unwrap();

        assert_eq!(
            universe.add_family(north, smith).unwrap_err(),
            DomainError::Validation(ValidationError::AlreadyInCommunity {
                family: smith,
                community: north
            })
        );
        assert_eq!(
            universe.add_family(south, smith).unwrap_err(),
            DomainError::Validation(ValidationError::InAnotherCommunity {
                family: smith,
                community: north
            })
        );

        universe.remove_family(north, smith).unwrap();
        assert_eq!(universe.family(smith).unwrap().community_id(), None);
        universe.add_family(south, smith).unwrap();
        assert_eq!(universe.community(south).unwrap().families(), &[smith]);
    }

    #[test]
    fn test_community_joins_one_world_only() {
        let mut universe = Universe::new();
        let earth = universe.create_world("Earth").unwrap();
        let mars = universe.create_world("Mars").unwrap();
        let north = universe.new_community(earth, "Northland").unwrap();

        assert_eq!(universe.community(north).unwrap().world_id(), Some(earth));
        assert!(universe.add_community(mars, north).unwrap_err().is_validation());
        assert!(universe.remove_community(mars, north).unwrap_err().is_not_found());

        universe.remove_community(earth, north).unwrap();
        assert!(universe.world(earth).unwrap().communities().is_empty());
        assert_eq!(universe.community(north).unwrap().world_id(), None);
    }

    #[test]
    fn test_membership_changes_fire_container_callback_once() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let log = counter(&mut universe, EntityRef::Family(smith));

        universe.add_parent(smith, ann).unwrap();
        assert_eq!(*log.lock().unwrap(), vec![ChangeKind::Members]);

        // rejected operations stay silent
        assert!(universe.add_parent(smith, ann).is_err());
        assert_eq!(log.lock().unwrap().len(), 1);

        universe.remove_parent(smith, ann).unwrap();
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_gives_birth_and_adoption_record_history() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let ed = person(&mut universe, "Ed", date(2005, 1, 1));
        universe.add_parent(smith, ann).unwrap();

        let baby = universe.gives_birth(smith, "Junior", Gender::Male).unwrap();
        let junior = universe.person(baby).unwrap();
        assert_eq!(junior.dob(), Some(today()));
        assert_eq!(junior.gender(), Gender::Male);
        assert_eq!(junior.history()[0].action, Action::WasBorn);

        universe.adopts_child(smith, ed).unwrap();
        let adopted = universe.person(ed).unwrap();
        assert_eq!(adopted.history()[0].action, Action::WasAdopted);
        assert_eq!(universe.family(smith).unwrap().children(), &[baby, ed]);
    }

    #[test]
    fn test_failed_birth_adds_nobody() {
        let mut universe = Universe::new();
        let smith = universe.create_family("Smith").unwrap();
        let before = universe.people().count();
        assert!(universe.gives_birth(smith, "  ", Gender::Female).is_err());
        assert_eq!(universe.people().count(), before);
    }

    #[test]
    fn test_community_shortcuts_resolve_family() {
        let mut universe = Universe::new();
        let north = universe.create_community("Northland").unwrap();
        let south = universe.create_community("Southland").unwrap();
        let smith = universe.new_family(north, "Smith").unwrap();
        let ann = person(&mut universe, "Ann", date(1980, 1, 1));
        let ed = person(&mut universe, "Ed", date(2005, 1, 1));
        let sue = person(&mut universe, "Sue", date(2007, 1, 1));
        let bob = person(&mut universe, "Bob", date(1979, 1, 1));
        let rex = universe
            .create_animal(NewCreature::animal(Species::Dog).named("Rex"))
            .unwrap();
        universe.add_child(smith, ed).unwrap();

        universe.sibling_add(north, ed, sue).unwrap();
        universe.parent_add_for(north, ed, ann).unwrap();
        universe.pet_add_for(north, sue, rex, None).unwrap();
        let family = universe.family(smith).unwrap();
        assert_eq!(family.children(), &[ed, sue]);
        assert_eq!(family.parents(), &[ann]);
        assert_eq!(family.pets(), &[rex]);

        assert_eq!(
            universe.sibling_add(north, ed, ed).unwrap_err(),
            DomainError::Validation(ValidationError::SelfSibling(ed))
        );
        assert!(universe.parent_add_for(south, ed, bob).unwrap_err().is_not_found());

        universe.sibling_remove(north, ed, sue).unwrap();
        universe.parent_remove_for(north, ed, ann).unwrap();
        let family = universe.family(smith).unwrap();
        assert_eq!(family.children(), &[ed]);
        assert!(family.parents().is_empty());
    }
}
