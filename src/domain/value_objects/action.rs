//! Audit actions - the append-only history of everything that happened to a creature

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Something a creature did, or that happened to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Renamed,
    ChangedHairColor,
    BecameAPet,
    ReturnedToWild,
    Died,
    ChangedGender,
    Killed,
    GotInjured,
    HealedFromInjury,
    FellDown,
    GotShot,
    ContractedIllness,
    RecoveredFromIllness,
    Walked,
    Ran,
    Washed,
    WasInMud,
    Dried,
    GotTired,
    Rested,
    Spoke,
    GotWarm,
    GotCold,
    Sweated,
    Cooled,
    WasAdopted,
    WasBorn,
    RemovedFromFamily,
    BecameParent,
    RemovedAsParent,
    AddedToFamily,
    Touched,
    TouchedBy,
    Felt,
    Forgave,
    WasForgiven,
}

impl Action {
    /// Phrase used when rendering the history as text
    pub fn phrase(&self) -> &'static str {
        match self {
            Action::Renamed => "was renamed to",
            Action::ChangedHairColor => "changed hair color to",
            Action::BecameAPet => "became a pet",
            Action::ReturnedToWild => "returned to wild",
            Action::Died => "died",
            Action::ChangedGender => "changed gender to",
            Action::Killed => "killed",
            Action::GotInjured => "suffered injury",
            Action::HealedFromInjury => "healed from injury",
            Action::FellDown => "fell down",
            Action::GotShot => "got shot",
            Action::ContractedIllness => "contracted illness",
            Action::RecoveredFromIllness => "recovered from illness",
            Action::Walked => "walked",
            Action::Ran => "ran",
            Action::Washed => "washed",
            Action::WasInMud => "was in mud",
            Action::Dried => "dried off",
            Action::GotTired => "got tired",
            Action::Rested => "rested",
            Action::Spoke => "said:",
            Action::GotWarm => "got warm",
            Action::GotCold => "got cold",
            Action::Sweated => "sweated",
            Action::Cooled => "cooled down, stopped sweating",
            Action::WasAdopted => "was adopted",
            Action::WasBorn => "was born",
            Action::RemovedFromFamily => "was removed from family",
            Action::BecameParent => "became parent in family",
            Action::RemovedAsParent => "was removed as a parent in family",
            Action::AddedToFamily => "was added to family",
            Action::Touched => "touched",
            Action::TouchedBy => "was touched by",
            Action::Felt => "felt",
            Action::Forgave => "forgave",
            Action::WasForgiven => "was forgiven by",
        }
    }
}

/// One entry in a creature's audit history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: Action,
    /// Free-form details, e.g. the new hair colour or the words spoken
    pub details: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActionRecord {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            details: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

impl std::fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.action.phrase())?;
        for detail in &self.details {
            write!(f, " {}", detail)?;
        }
        Ok(())
    }
}
