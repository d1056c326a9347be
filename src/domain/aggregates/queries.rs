//! Read-only navigation of the graph and population counts

use std::collections::BTreeSet;

use super::Universe;
use crate::domain::entities::{Community, Family, World};
use crate::domain::error::{DomainError, DomainResult, ValidationError};
use crate::domain::events::EntityRef;
use crate::domain::value_objects::{
    AnimalId, CommunityId, CreatureId, FamilyId, Gender, PersonId, WorldId,
};

impl Universe {
    /// The family a creature belongs to
    ///
    /// Children and pets resolve through their own membership link. A person
    /// who is a child nowhere resolves to the first family they parent.
    pub fn family_of(&self, id: impl Into<CreatureId>) -> DomainResult<&Family> {
        let id = id.into();
        let creature = self.creature(id)?;
        let family_id = creature
            .family_id()
            .or_else(|| creature.parent_of_families().iter().next().copied())
            .ok_or_else(|| DomainError::not_found(format!("family of {}", id)))?;
        self.family(family_id)
    }

    /// The community holding a family, or the family of a creature
    pub fn community_of(&self, entity: EntityRef) -> DomainResult<&Community> {
        let family = match entity {
            EntityRef::Family(id) => self.family(id)?,
            EntityRef::Creature(id) => self.family_of(id)?,
            EntityRef::Community(_) | EntityRef::World(_) => {
                return Err(DomainError::not_found(format!("community of {:?}", entity)));
            }
        };
        let community_id = family.community_id().ok_or_else(|| {
            DomainError::not_found(format!("community of family {}", family.id()))
        })?;
        self.community(community_id)
    }

    /// The world holding a community, or the world above a family or creature
    pub fn world_of(&self, entity: EntityRef) -> DomainResult<&World> {
        let community = match entity {
            EntityRef::Community(id) => self.community(id)?,
            EntityRef::World(_) => {
                return Err(DomainError::not_found(format!("world of {:?}", entity)));
            }
            other => self.community_of(other)?,
        };
        let world_id = community.world_id().ok_or_else(|| {
            DomainError::not_found(format!("world of community {}", community.id()))
        })?;
        self.world(world_id)
    }

    /// The family in which `person` is a child
    fn birth_family(&self, person: PersonId) -> DomainResult<&Family> {
        let family = self.family_of(person)?;
        if !family.has_child(person) {
            return Err(ValidationError::NotAChild {
                person,
                family: family.id(),
            }
            .into());
        }
        Ok(family)
    }

    /// The other children of the person's family, in insertion order
    pub fn siblings_of(&self, person: PersonId) -> DomainResult<Vec<PersonId>> {
        Ok(self
            .birth_family(person)?
            .children()
            .iter()
            .copied()
            .filter(|&child| child != person)
            .collect())
    }

    pub fn parents_of(&self, person: PersonId) -> DomainResult<&[PersonId]> {
        Ok(self.birth_family(person)?.parents())
    }

    /// First parent of `person` with the given gender
    pub fn parent_of_gender(&self, person: PersonId, gender: Gender) -> DomainResult<Option<PersonId>> {
        Ok(self
            .parents_of(person)?
            .iter()
            .copied()
            .find(|&parent| {
                self.person(parent)
                    .map(|p| p.gender() == gender)
                    .unwrap_or(false)
            }))
    }

    pub fn mother_of(&self, person: PersonId) -> DomainResult<Option<PersonId>> {
        self.parent_of_gender(person, Gender::Female)
    }

    pub fn father_of(&self, person: PersonId) -> DomainResult<Option<PersonId>> {
        self.parent_of_gender(person, Gender::Male)
    }

    /// Whether two distinct people are children of the same family
    pub fn is_sibling_of(&self, person: PersonId, other: PersonId) -> DomainResult<bool> {
        let family = self.person(person)?.family_id();
        let other_family = self.person(other)?.family_id();
        Ok(person != other && family.is_some() && family == other_family)
    }

    pub fn is_brother_of(&self, person: PersonId, other: PersonId) -> DomainResult<bool> {
        Ok(self.is_sibling_of(person, other)? && self.person(person)?.gender() == Gender::Male)
    }

    pub fn is_sister_of(&self, person: PersonId, other: PersonId) -> DomainResult<bool> {
        Ok(self.is_sibling_of(person, other)? && self.person(person)?.gender() == Gender::Female)
    }

    pub fn child_names(&self, family: FamilyId) -> DomainResult<Vec<String>> {
        self.names_of(self.family(family)?.children())
    }

    pub fn parent_names(&self, family: FamilyId) -> DomainResult<Vec<String>> {
        self.names_of(self.family(family)?.parents())
    }

    /// Ages in whole years, `None` where no birth date is known
    pub fn child_ages(&self, family: FamilyId) -> DomainResult<Vec<Option<u32>>> {
        self.ages_of(self.family(family)?.children())
    }

    pub fn parent_ages(&self, family: FamilyId) -> DomainResult<Vec<Option<u32>>> {
        self.ages_of(self.family(family)?.parents())
    }

    fn names_of(&self, people: &[PersonId]) -> DomainResult<Vec<String>> {
        people
            .iter()
            .map(|&id| self.person(id).map(|p| p.display_name().to_string()))
            .collect()
    }

    fn ages_of(&self, people: &[PersonId]) -> DomainResult<Vec<Option<u32>>> {
        people
            .iter()
            .map(|&id| self.person(id).map(|p| p.age()))
            .collect()
    }

    /// Recorded parents of a family who are still alive
    pub fn alive_parents(&self, family: FamilyId) -> DomainResult<Vec<PersonId>> {
        Ok(self
            .family(family)?
            .parents()
            .iter()
            .copied()
            .filter(|parent| self.people.get(parent).is_some_and(|p| p.is_alive()))
            .collect())
    }

    /// Display names of the family members, children first
    pub fn member_names(&self, family: FamilyId) -> DomainResult<Vec<String>> {
        self.family(family)?
            .member_ids()
            .into_iter()
            .map(|id| self.person(id).map(|p| p.display_name().to_string()))
            .collect()
    }

    /// Surname of a person: the name of their family
    pub fn surname_of(&self, person: PersonId) -> DomainResult<&str> {
        Ok(self.family_of(person)?.name())
    }

    /// Pets of the person's family
    pub fn pets_of(&self, person: PersonId) -> DomainResult<&[AnimalId]> {
        Ok(self.family_of(person)?.pets())
    }

    // ========================================================================
    // Population
    // ========================================================================

    pub fn family_population(&self, family: FamilyId) -> DomainResult<usize> {
        Ok(self.family(family)?.population())
    }

    /// Distinct persons across the community's families
    pub fn community_population(&self, community: CommunityId) -> DomainResult<usize> {
        let mut people = BTreeSet::new();
        for &family in self.community(community)?.families() {
            people.extend(self.family(family)?.member_ids());
        }
        Ok(people.len())
    }

    /// Sum of the community populations of the world
    pub fn world_population(&self, world: WorldId) -> DomainResult<usize> {
        self.world(world)?
            .communities()
            .iter()
            .map(|&community| self.community_population(community))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::domain::entities::NewCreature;
    use crate::domain::value_objects::Species;

    fn born(universe: &mut Universe, name: &str, year: i32, gender: Gender) -> PersonId {
        universe
            .create_person(
                NewCreature::person(name)
                    .born_on(NaiveDate::from_ymd_opt(year, 1, 1).unwrap())
                    .with_gender(gender),
            )
            .unwrap()
    }

    struct Smiths {
        universe: Universe,
        earth: WorldId,
        north: CommunityId,
        smith: FamilyId,
        ann: PersonId,
        bob: PersonId,
        ed: PersonId,
        sue: PersonId,
    }

    fn smiths() -> Smiths {
        let mut universe = Universe::new();
        let earth = universe.create_world("Earth").unwrap();
        let north = universe.new_community(earth, "Northland").unwrap();
        let smith = universe.new_family(north, "Smith").unwrap();
        let ann = born(&mut universe, "Ann", 1980, Gender::Female);
        let bob = born(&mut universe, "Bob", 1978, Gender::Male);
        let ed = born(&mut universe, "Ed", 2005, Gender::Male);
        let sue = born(&mut universe, "Sue", 2008, Gender::Female);
        universe.add_parent(smith, ann).unwrap();
        universe.add_parent(smith, bob).unwrap();
        universe.add_child(smith, ed).unwrap();
        universe.add_child(smith, sue).unwrap();
        Smiths {
            universe,
            earth,
            north,
            smith,
            ann,
            bob,
            ed,
            sue,
        }
    }

    #[test]
    fn test_smith_family_end_to_end() {
        let mut universe = Universe::new();
        let earth = universe.create_world("Earth").unwrap();
        let north = universe.create_community("Northland").unwrap();
        universe.add_community(earth, north).unwrap();
        let smith = universe.create_family("Smith").unwrap();
        universe.add_family(north, smith).unwrap();
        let ann = born(&mut universe, "Ann", 1980, Gender::Female);
        let ed = born(&mut universe, "Ed", 2005, Gender::Male);

        universe.add_parent(smith, ann).unwrap();
        universe.add_child(smith, ed).unwrap();
        assert_eq!(universe.family_population(smith).unwrap(), 2);

        universe.remove_parent(smith, ann).unwrap();
        assert!(universe.family(smith).unwrap().parents().is_empty());
        assert!(!universe
            .person(ann)
            .unwrap()
            .parent_of_families()
            .contains(&smith));
    }

    #[test]
    fn test_navigation_up_the_hierarchy() {
        let s = smiths();
        let u = &s.universe;
        assert_eq!(u.family_of(s.ed).unwrap().id(), s.smith);
        // parents resolve to the family they parent
        assert_eq!(u.family_of(s.ann).unwrap().id(), s.smith);
        assert_eq!(u.community_of(EntityRef::Creature(s.ed.into())).unwrap().id(), s.north);
        assert_eq!(u.world_of(EntityRef::Family(s.smith)).unwrap().id(), s.earth);
        assert_eq!(u.surname_of(s.sue).unwrap(), "Smith");
    }

    #[test]
    fn test_family_queries() {
        let s = smiths();
        let u = &s.universe;
        assert_eq!(u.siblings_of(s.ed).unwrap(), vec![s.sue]);
        assert_eq!(u.parents_of(s.sue).unwrap(), &[s.ann, s.bob]);
        assert_eq!(u.mother_of(s.ed).unwrap(), Some(s.ann));
        assert_eq!(u.father_of(s.ed).unwrap(), Some(s.bob));
        assert_eq!(u.member_names(s.smith).unwrap(), vec!["Ed", "Sue", "Ann", "Bob"]);

        let err = u.siblings_of(s.ann).unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation(ValidationError::NotAChild {
                person: s.ann,
                family: s.smith
            })
        );
    }

    #[test]
    fn test_sibling_checks() {
        let mut s = smiths();
        assert!(s.universe.is_sibling_of(s.ed, s.sue).unwrap());
        assert!(s.universe.is_brother_of(s.ed, s.sue).unwrap());
        assert!(!s.universe.is_sister_of(s.ed, s.sue).unwrap());
        assert!(s.universe.is_sister_of(s.sue, s.ed).unwrap());
        assert!(!s.universe.is_sibling_of(s.ed, s.ed).unwrap());
        // parents are not children of the family
        assert!(!s.universe.is_sibling_of(s.ann, s.bob).unwrap());

        let loner = born(&mut s.universe, "Lone", 1990, Gender::Male);
        let drifter = born(&mut s.universe, "Drift", 1991, Gender::Male);
        assert!(!s.universe.is_sibling_of(loner, drifter).unwrap());
        assert!(!s.universe.is_brother_of(loner, s.ed).unwrap());
    }

    #[test]
    fn test_family_names_and_ages() {
        let mut s = smiths();
        assert_eq!(s.universe.child_names(s.smith).unwrap(), vec!["Ed", "Sue"]);
        assert_eq!(s.universe.parent_names(s.smith).unwrap(), vec!["Ann", "Bob"]);

        let ages = |u: &Universe, ids: &[PersonId]| -> Vec<Option<u32>> {
            ids.iter().map(|&id| u.person(id).unwrap().age()).collect()
        };
        assert_eq!(
            s.universe.child_ages(s.smith).unwrap(),
            ages(&s.universe, &[s.ed, s.sue])
        );
        let parent_ages = s.universe.parent_ages(s.smith).unwrap();
        assert_eq!(parent_ages, ages(&s.universe, &[s.ann, s.bob]));
        assert!(parent_ages[1] > parent_ages[0]);

        let empty = s.universe.create_family("Empty").unwrap();
        assert!(s.universe.child_names(empty).unwrap().is_empty());
        assert!(s.universe.parent_ages(empty).unwrap().is_empty());
    }

    #[test]
    fn test_detached_members_have_no_family() {
        let mut universe = Universe::new();
        let loner = born(&mut universe, "Lone", 1990, Gender::Undisclosed);
        let stray = universe
            .create_animal(NewCreature::animal(Species::Cat))
            .unwrap();
        assert!(universe.family_of(loner).unwrap_err().is_not_found());
        assert!(universe.family_of(stray).unwrap_err().is_not_found());
        assert!(universe
            .community_of(EntityRef::Creature(loner.into()))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_rex_keeps_its_first_family() {
        let mut universe = Universe::new();
        let a = universe.create_family("A").unwrap();
        let b = universe.create_family("B").unwrap();
        let rex = universe
            .create_animal(NewCreature::animal(Species::Dog).named("Rex"))
            .unwrap();
        universe.add_pet(a, rex, None).unwrap();
        assert!(universe.add_pet(b, rex, None).unwrap_err().is_validation());
        assert_eq!(universe.family_of(rex).unwrap().id(), a);
    }

    #[test]
    fn test_community_population_counts_shared_parents_once() {
        let mut s = smiths();
        let jones = s.universe.new_family(s.north, "Jones").unwrap();
        let kim = born(&mut s.universe, "Kim", 2010, Gender::Female);
        s.universe.add_parent(jones, s.ann).unwrap();
        s.universe.add_child(jones, kim).unwrap();

        assert_eq!(s.universe.family_population(s.smith).unwrap(), 4);
        assert_eq!(s.universe.family_population(jones).unwrap(), 2);
        assert_eq!(s.universe.community_population(s.north).unwrap(), 5);
        assert_eq!(s.universe.world_population(s.earth).unwrap(), 5);
    }

    #[test]
    fn test_world_population_sums_communities() {
        let mut s = smiths();
        let south = s.universe.new_community(s.earth, "Southland").unwrap();
        let lee = s.universe.new_family(south, "Lee").unwrap();
        // a parent in both communities is counted in each
        s.universe.add_parent(lee, s.bob).unwrap();
        assert_eq!(s.universe.world_population(s.earth).unwrap(), 5);
    }

    #[test]
    fn test_alive_parents_skip_the_dead() {
        let mut s = smiths();
        s.universe.die(s.bob).unwrap();
        assert_eq!(s.universe.alive_parents(s.smith).unwrap(), vec![s.ann]);
        assert_eq!(s.universe.family(s.smith).unwrap().parents(), &[s.ann, s.bob]);
    }

    proptest! {
        #[test]
        fn test_add_remove_child_restores_state(birth_years in prop::collection::vec(2000i32..2020, 1..6)) {
            let mut universe = Universe::new();
            let family = universe.create_family("Prop").unwrap();
            let parent = born(&mut universe, "Root", 1950, Gender::Female);
            universe.add_parent(family, parent).unwrap();

            let mut kids = Vec::new();
            for (i, year) in birth_years.iter().enumerate() {
                let kid = born(&mut universe, &format!("Kid{}", i), *year, Gender::Undisclosed);
                kids.push(kid);
            }
            let probe = born(&mut universe, "Probe", 2021, Gender::Male);
            for &kid in &kids {
                universe.add_child(family, kid).unwrap();
            }

            let before = universe.family(family).unwrap().clone();
            universe.add_child(family, probe).unwrap();
            universe.remove_child(family, probe).unwrap();

            prop_assert_eq!(universe.family(family).unwrap(), &before);
            prop_assert_eq!(universe.person(probe).unwrap().family_id(), None);
            prop_assert_eq!(universe.family_population(family).unwrap(), kids.len() + 1);
        }

        #[test]
        fn test_population_never_double_counts(families in 1usize..5) {
            let mut universe = Universe::new();
            let community = universe.create_community("Prop").unwrap();
            let shared = born(&mut universe, "Shared", 1950, Gender::Male);
            for i in 0..families {
                let family = universe.new_family(community, &format!("F{}", i)).unwrap();
                universe.add_parent(family, shared).unwrap();
            }
            prop_assert_eq!(universe.community_population(community).unwrap(), 1);
        }
    }
}
