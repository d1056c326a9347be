//! Domain errors
//!
//! Every rejected operation leaves the graph exactly as it was.

use crate::domain::value_objects::{
    AnimalId, CommunityId, CreatureId, FamilyId, IdKind, PersonId, WorldId,
};

/// A malformed input or a relational rule that would be broken
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name cannot be blank")]
    EmptyName,

    #[error("{0} cannot be blank")]
    Blank(&'static str),

    #[error("specify an age or a date of birth, not both")]
    AgeAndBirthDate,

    #[error("a person needs an age or a date of birth")]
    MissingBirthDate,

    #[error("age {0} does not give a valid date of birth")]
    InvalidAge(u32),

    #[error("{person} is already a parent in family {family}")]
    AlreadyParent { person: PersonId, family: FamilyId },

    #[error("{person} is already a child in family {family}")]
    AlreadyChild { person: PersonId, family: FamilyId },

    #[error("family {family} already has {limit} living parents")]
    TooManyParents { family: FamilyId, limit: usize },

    #[error("{person} is not older than child {child}")]
    ParentNotOlder { person: PersonId, child: PersonId },

    #[error("{person} is not younger than parent {parent}")]
    ChildNotYounger { person: PersonId, parent: PersonId },

    #[error("{0} has no recorded date of birth")]
    UnknownBirthDate(PersonId),

    #[error("a person cannot be a pet")]
    IsPerson,

    #[error("a pet needs a name")]
    UnnamedPet,

    #[error("animal {animal} already belongs to family {family}")]
    AlreadyPet { animal: AnimalId, family: FamilyId },

    #[error("family {family} is already in community {community}")]
    AlreadyInCommunity { family: FamilyId, community: CommunityId },

    #[error("family {family} belongs to another community ({community})")]
    InAnotherCommunity { family: FamilyId, community: CommunityId },

    #[error("community {community} is already in world {world}")]
    AlreadyInWorld { community: CommunityId, world: WorldId },

    #[error("community {community} belongs to another world ({world})")]
    InAnotherWorld { community: CommunityId, world: WorldId },

    #[error("{0} is dead")]
    Dead(CreatureId),

    #[error("{0} cannot change hair color")]
    CannotChangeHairColor(CreatureId),

    #[error("distance must be a non-negative number, got {0}")]
    InvalidDistance(f64),

    #[error("{person} is not a child in family {family}")]
    NotAChild { person: PersonId, family: FamilyId },

    #[error("{0} cannot be their own sibling")]
    SelfSibling(PersonId),

    #[error("use the person constructor to create people")]
    PersonAsAnimal,

    #[error("only people can be created with the person constructor")]
    NotAPerson,
}

/// Errors surfaced by graph operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No {0:?} ids left to issue")]
    IdsExhausted(IdKind),
}

impl DomainError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        DomainError::NotFound(what.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Trim and reject blank names
pub fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}
