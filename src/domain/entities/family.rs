//! Family entity - parents, children and pets

use serde::{Deserialize, Serialize};

use crate::domain::error::{normalize_name, ValidationError};
use crate::domain::events::Notifier;
use crate::domain::value_objects::{AnimalId, CommunityId, FamilyId, PersonId};

/// A family in a community
///
/// Holds ids only. A person appears at most once across `parents` and
/// `children`; lists keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    id: FamilyId,
    name: String,
    community_id: Option<CommunityId>,
    parents: Vec<PersonId>,
    children: Vec<PersonId>,
    pets: Vec<AnimalId>,
    #[serde(skip)]
    notifier: Notifier,
}

impl Family {
    pub fn new(id: FamilyId, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            community_id: None,
            parents: Vec::new(),
            children: Vec::new(),
            pets: Vec::new(),
            notifier: Notifier::default(),
        })
    }

    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn community_id(&self) -> Option<CommunityId> {
        self.community_id
    }

    pub fn parents(&self) -> &[PersonId] {
        &self.parents
    }

    pub fn children(&self) -> &[PersonId] {
        &self.children
    }

    pub fn pets(&self) -> &[AnimalId] {
        &self.pets
    }

    pub fn has_parent(&self, person: PersonId) -> bool {
        self.parents.contains(&person)
    }

    pub fn has_child(&self, person: PersonId) -> bool {
        self.children.contains(&person)
    }

    pub fn has_pet(&self, animal: AnimalId) -> bool {
        self.pets.contains(&animal)
    }

    /// Children then parents, each person once
    pub fn member_ids(&self) -> Vec<PersonId> {
        let mut members = self.children.clone();
        for parent in &self.parents {
            if !members.contains(parent) {
                members.push(*parent);
            }
        }
        members
    }

    pub fn population(&self) -> usize {
        self.member_ids().len()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub(crate) fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub(crate) fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = normalize_name(name)?;
        Ok(())
    }

    pub(crate) fn set_community(&mut self, community: Option<CommunityId>) {
        self.community_id = community;
    }

    pub(crate) fn push_parent(&mut self, person: PersonId) {
        self.parents.push(person);
    }

    pub(crate) fn push_child(&mut self, person: PersonId) {
        self.children.push(person);
    }

    pub(crate) fn push_pet(&mut self, animal: AnimalId) {
        self.pets.push(animal);
    }

    pub(crate) fn take_parent(&mut self, person: PersonId) -> bool {
        take(&mut self.parents, &person)
    }

    pub(crate) fn take_child(&mut self, person: PersonId) -> bool {
        take(&mut self.children, &person)
    }

    pub(crate) fn take_pet(&mut self, animal: AnimalId) -> bool {
        take(&mut self.pets, &animal)
    }
}

/// Remove the first occurrence of `item`, preserving order
pub(crate) fn take<T: PartialEq>(list: &mut Vec<T>, item: &T) -> bool {
    if let Some(pos) = list.iter().position(|x| x == item) {
        list.remove(pos);
        true
    } else {
        false
    }
}
