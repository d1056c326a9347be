//! Change notification - single-slot callbacks for the presentation layer
//!
//! Each entity carries a [`Notifier`] with two independent slots:
//! - `self_changed` fires after an attribute of that entity changed
//! - `container_changed` fires so whoever renders the entity's container can
//!   refresh; containers also fire it after adding or removing a member
//!
//! Registering a callback replaces whatever was in the slot. Callbacks are
//! process-local wiring: they are never persisted, never compared, and a
//! cloned entity starts with empty slots.

use crate::domain::value_objects::{CommunityId, CreatureId, FamilyId, WorldId};

/// Reference to any entity in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    World(WorldId),
    Community(CommunityId),
    Family(FamilyId),
    Creature(CreatureId),
}

/// What kind of change happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// An attribute (name, state flag, ...) changed
    Attributes,
    /// A member was added to or removed from a container
    Members,
}

/// Payload passed to a change callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub entity: EntityRef,
    pub kind: ChangeKind,
}

impl Change {
    pub fn attributes(entity: EntityRef) -> Self {
        Self {
            entity,
            kind: ChangeKind::Attributes,
        }
    }

    pub fn members(entity: EntityRef) -> Self {
        Self {
            entity,
            kind: ChangeKind::Members,
        }
    }
}

pub type ChangeCallback = Box<dyn FnMut(&Change) + Send + 'static>;

/// The two callback slots of an entity
#[derive(Default)]
pub struct Notifier {
    self_changed: Option<ChangeCallback>,
    container_changed: Option<ChangeCallback>,
}

impl Notifier {
    pub fn set_self_changed(&mut self, callback: Option<ChangeCallback>) {
        self.self_changed = callback;
    }

    pub fn set_container_changed(&mut self, callback: Option<ChangeCallback>) {
        self.container_changed = callback;
    }

    pub fn has_self_changed(&self) -> bool {
        self.self_changed.is_some()
    }

    pub fn has_container_changed(&self) -> bool {
        self.container_changed.is_some()
    }

    pub(crate) fn fire_self_changed(&mut self, change: &Change) {
        if let Some(callback) = self.self_changed.as_mut() {
            callback(change);
        }
    }

    pub(crate) fn fire_container_changed(&mut self, change: &Change) {
        if let Some(callback) = self.container_changed.as_mut() {
            callback(change);
        }
    }

    /// Attribute change: the entity's own view first, then its container
    pub(crate) fn fire_attributes(&mut self, entity: EntityRef) {
        let change = Change::attributes(entity);
        self.fire_self_changed(&change);
        self.fire_container_changed(&change);
    }

    /// Membership change on a container
    pub(crate) fn fire_members(&mut self, entity: EntityRef) {
        self.fire_container_changed(&Change::members(entity));
    }
}

impl Clone for Notifier {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl PartialEq for Notifier {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("self_changed", &self.self_changed.is_some())
            .field("container_changed", &self.container_changed.is_some())
            .finish()
    }
}
