//! Community entity - a named group of families

use serde::{Deserialize, Serialize};

use super::family::take;
use crate::domain::error::{normalize_name, ValidationError};
use crate::domain::events::Notifier;
use crate::domain::value_objects::{CommunityId, FamilyId, WorldId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    id: CommunityId,
    name: String,
    world_id: Option<WorldId>,
    families: Vec<FamilyId>,
    #[serde(skip)]
    notifier: Notifier,
}

impl Community {
    pub fn new(id: CommunityId, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            world_id: None,
            families: Vec::new(),
            notifier: Notifier::default(),
        })
    }

    pub fn id(&self) -> CommunityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world_id(&self) -> Option<WorldId> {
        self.world_id
    }

    pub fn families(&self) -> &[FamilyId] {
        &self.families
    }

    pub fn has_family(&self, family: FamilyId) -> bool {
        self.families.contains(&family)
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

    pub(crate) fn set_world(&mut self, world: Option<WorldId>) {
        self.world_id = world;
    }

    pub(crate) fn push_family(&mut self, family: FamilyId) {
        self.families.push(family);
    }

    pub(crate) fn take_family(&mut self, family: FamilyId) -> bool {
        take(&mut self.families, &family)
    }
}
