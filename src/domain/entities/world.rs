//! World entity - the root container of communities

use serde::{Deserialize, Serialize};

use super::family::take;
use crate::domain::error::{normalize_name, ValidationError};
use crate::domain::events::Notifier;
use crate::domain::value_objects::{CommunityId, WorldId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    id: WorldId,
    name: String,
    communities: Vec<CommunityId>,
    #[serde(skip)]
    notifier: Notifier,
}

impl World {
    pub fn new(id: WorldId, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            communities: Vec::new(),
            notifier: Notifier::default(),
        })
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn communities(&self) -> &[CommunityId] {
        &self.communities
    }

    pub fn has_community(&self, community: CommunityId) -> bool {
        self.communities.contains(&community)
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

    pub(crate) fn push_community(&mut self, community: CommunityId) {
        self.communities.push(community);
    }

    pub(crate) fn take_community(&mut self, community: CommunityId) -> bool {
        take(&mut self.communities, &community)
    }
}
