//! Animal entity - every creature in the registry, people included
//!
//! A person is an animal whose species is [`Species::Person`]. The species
//! decides the capability table; the record itself is shared by all kinds.
//!
//! Methods here validate and mutate a single creature and append to its
//! audit history. Notifications and cross-entity rules live on
//! [`crate::domain::aggregates::Universe`].

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{normalize_name, ValidationError};
use crate::domain::events::Notifier;
use crate::domain::value_objects::{
    Action, ActionRecord, Capabilities, CreatureId, Emotion, FamilyId, Gender, RegistrySettings,
    Species,
};

/// Construction parameters for a creature
#[derive(Debug, Clone, PartialEq)]
pub struct NewCreature {
    pub species: Species,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub dob: Option<NaiveDate>,
    pub gender: Gender,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
    pub healer: bool,
}

impl NewCreature {
    pub fn person(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::animal(Species::Person)
        }
    }

    pub fn animal(species: Species) -> Self {
        Self {
            species,
            name: None,
            age: None,
            dob: None,
            gender: Gender::Undisclosed,
            hair_color: None,
            eye_color: None,
            healer: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn born_on(mut self, dob: NaiveDate) -> Self {
        self.dob = Some(dob);
        self
    }

    pub fn aged(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_hair_color(mut self, color: impl Into<String>) -> Self {
        self.hair_color = Some(color.into());
        self
    }

    pub fn with_eye_color(mut self, color: impl Into<String>) -> Self {
        self.eye_color = Some(color.into());
        self
    }

    pub fn healer(mut self) -> Self {
        self.healer = true;
        self
    }
}

/// A creature in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    id: CreatureId,
    species: Species,
    name: Option<String>,
    dob: Option<NaiveDate>,
    alive: bool,
    wild: bool,
    gender: Gender,
    hair_color: Option<String>,
    eye_color: String,
    healer: bool,

    // Condition
    injured: bool,
    injury: Option<String>,
    ill: bool,
    illness: Option<String>,
    clean: bool,
    wet: bool,
    tired: bool,
    cold: bool,
    sweating: bool,
    emotions: BTreeSet<Emotion>,
    distance_travelled: f64,

    // Conscience (people only)
    criminal: bool,
    forgiven: bool,

    // Membership
    /// Family this creature belongs to as a child or a pet
    family_id: Option<FamilyId>,
    /// Families where this person is a parent
    parent_of: BTreeSet<FamilyId>,

    history: Vec<ActionRecord>,

    #[serde(skip)]
    notifier: Notifier,
}

impl Animal {
    /// Validate `params` and build the creature under `id`
    pub fn new(
        id: CreatureId,
        params: NewCreature,
        settings: &RegistrySettings,
    ) -> Result<Self, ValidationError> {
        let is_person = params.species.is_person();
        match (is_person, id) {
            (true, CreatureId::Animal(_)) => return Err(ValidationError::PersonAsAnimal),
            (false, CreatureId::Person(_)) => return Err(ValidationError::NotAPerson),
            _ => {}
        }

        let name = match params.name.as_deref() {
            Some(name) => Some(normalize_name(name)?),
            None if is_person => return Err(ValidationError::EmptyName),
            None => None,
        };

        let dob = match (params.age, params.dob) {
            (Some(_), Some(_)) => return Err(ValidationError::AgeAndBirthDate),
            (None, Some(dob)) => Some(dob),
            (Some(age), None) => Some(dob_from_age(age, today())?),
            (None, None) if is_person => return Err(ValidationError::MissingBirthDate),
            (None, None) => {
                tracing::debug!(species = %params.species, "creature created without date of birth");
                None
            }
        };

        let hair_color = match params.hair_color {
            Some(color) => Some(non_blank(&color, "hair color")?),
            None if is_person => Some(settings.default_person_hair_color.clone()),
            None => None,
        };
        let eye_color = match params.eye_color {
            Some(color) => non_blank(&color, "eye color")?,
            None => settings.default_eye_color.clone(),
        };

        Ok(Self {
            id,
            species: params.species,
            name,
            dob,
            alive: true,
            wild: !is_person,
            gender: params.gender,
            hair_color,
            eye_color,
            healer: params.healer,
            injured: false,
            injury: None,
            ill: false,
            illness: None,
            clean: true,
            wet: false,
            tired: false,
            cold: false,
            sweating: false,
            emotions: BTreeSet::new(),
            distance_travelled: 0.0,
            criminal: false,
            forgiven: false,
            family_id: None,
            parent_of: BTreeSet::new(),
            history: Vec::new(),
            notifier: Notifier::default(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> CreatureId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn capabilities(&self) -> Capabilities {
        self.species.capabilities()
    }

    pub fn is_person(&self) -> bool {
        self.species.is_person()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name, or the species label for unnamed creatures
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.species.label())
    }

    pub fn dob(&self) -> Option<NaiveDate> {
        self.dob
    }

    /// Whole years since birth, if the birth date is known
    pub fn age(&self) -> Option<u32> {
        self.age_on(today())
    }

    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        self.dob.and_then(|dob| date.years_since(dob))
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_wild(&self) -> bool {
        self.wild
    }

    pub fn is_tame(&self) -> bool {
        !self.wild
    }

    pub fn is_pet(&self) -> bool {
        !self.is_person() && self.is_tame() && self.name.is_some() && self.family_id.is_some()
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn hair_color(&self) -> Option<&str> {
        self.hair_color.as_deref()
    }

    pub fn eye_color(&self) -> &str {
        &self.eye_color
    }

    pub fn has_healing_touch(&self) -> bool {
        self.healer
    }

    pub fn is_injured(&self) -> bool {
        self.injured
    }

    pub fn injury(&self) -> Option<&str> {
        self.injury.as_deref()
    }

    pub fn is_ill(&self) -> bool {
        self.ill
    }

    pub fn illness(&self) -> Option<&str> {
        self.illness.as_deref()
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn is_wet(&self) -> bool {
        self.wet
    }

    pub fn is_tired(&self) -> bool {
        self.tired
    }

    pub fn is_cold(&self) -> bool {
        self.cold
    }

    pub fn is_sweating(&self) -> bool {
        self.sweating
    }

    pub fn emotions(&self) -> &BTreeSet<Emotion> {
        &self.emotions
    }

    pub fn distance_travelled(&self) -> f64 {
        self.distance_travelled
    }

    pub fn is_criminal(&self) -> bool {
        self.criminal
    }

    pub fn is_forgiven(&self) -> bool {
        self.forgiven
    }

    /// Family this creature belongs to as a child or a pet
    pub fn family_id(&self) -> Option<FamilyId> {
        self.family_id
    }

    /// Families where this person is a parent
    pub fn parent_of_families(&self) -> &BTreeSet<FamilyId> {
        &self.parent_of
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn last_action(&self) -> Option<&ActionRecord> {
        self.history.last()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub(crate) fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    // ========================================================================
    // Attribute mutations
    // ========================================================================

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        let name = normalize_name(name)?;
        self.record(ActionRecord::new(Action::Renamed).with_detail(name.clone()));
        self.name = Some(name);
        Ok(())
    }

    pub fn set_gender(&mut self, gender: Gender) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.gender = gender;
        self.record(ActionRecord::new(Action::ChangedGender).with_detail(gender.as_str()));
        Ok(())
    }

    pub fn set_hair_color(&mut self, color: &str) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        if !self.capabilities().can_change_hair_color {
            return Err(ValidationError::CannotChangeHairColor(self.id));
        }
        let color = non_blank(color, "hair color")?;
        self.record(ActionRecord::new(Action::ChangedHairColor).with_detail(color.clone()));
        self.hair_color = Some(color);
        Ok(())
    }

    /// Death is final: there is no way back
    pub fn dies(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.alive = false;
        self.record(ActionRecord::new(Action::Died));
        Ok(())
    }

    pub fn gets_injured(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.injured = true;
        self.record(ActionRecord::new(Action::GotInjured));
        Ok(())
    }

    pub fn falls_down(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.injured = true;
        self.injury = Some("bruising from fall".to_string());
        self.clean = false;
        self.record(ActionRecord::new(Action::FellDown));
        Ok(())
    }

    pub fn gets_shot(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.injured = true;
        self.injury = Some("gunshot wounds".to_string());
        self.record(ActionRecord::new(Action::GotShot));
        Ok(())
    }

    pub fn heals_from_injury(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.injured = false;
        self.injury = None;
        self.record(ActionRecord::new(Action::HealedFromInjury));
        Ok(())
    }

    pub fn contracts_illness(&mut self, illness: &str) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        let illness = non_blank(illness, "illness")?;
        self.ill = true;
        self.record(ActionRecord::new(Action::ContractedIllness).with_detail(illness.clone()));
        self.illness = Some(illness);
        Ok(())
    }

    pub fn recovers_from_illness(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.ill = false;
        self.illness = None;
        self.record(ActionRecord::new(Action::RecoveredFromIllness));
        Ok(())
    }

    pub fn walks(&mut self, distance: f64, settings: &RegistrySettings) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        let distance = valid_distance(distance)?;
        self.distance_travelled = self.total_after(distance)?;
        if distance >= settings.walking_tiredness_distance {
            self.tired = true;
        }
        self.record(
            ActionRecord::new(Action::Walked)
                .with_detail(format!("{} {}", distance, settings.distance_units)),
        );
        Ok(())
    }

    pub fn runs(&mut self, distance: f64, settings: &RegistrySettings) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        let distance = valid_distance(distance)?;
        self.distance_travelled = self.total_after(distance)?;
        if distance >= settings.running_tiredness_distance {
            self.cold = false;
            self.sweating = true;
            self.tired = true;
        }
        self.record(
            ActionRecord::new(Action::Ran)
                .with_detail(format!("{} {}", distance, settings.distance_units)),
        );
        Ok(())
    }

    pub fn washes(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.clean = true;
        self.wet = true;
        self.record(ActionRecord::new(Action::Washed));
        Ok(())
    }

    pub fn went_in_mud(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.clean = false;
        self.record(ActionRecord::new(Action::WasInMud));
        Ok(())
    }

    pub fn dries(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.wet = false;
        self.record(ActionRecord::new(Action::Dried));
        Ok(())
    }

    pub fn gets_tired(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.tired = true;
        self.record(ActionRecord::new(Action::GotTired));
        Ok(())
    }

    /// Resting also stops any sweating
    pub fn rests(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.tired = false;
        self.sweating = false;
        self.record(ActionRecord::new(Action::Rested));
        Ok(())
    }

    pub fn says(&mut self, words: &str) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.record(ActionRecord::new(Action::Spoke).with_detail(words));
        Ok(())
    }

    pub fn gets_warm(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.cold = false;
        self.record(ActionRecord::new(Action::GotWarm));
        Ok(())
    }

    pub fn gets_cold(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.cold = true;
        self.record(ActionRecord::new(Action::GotCold));
        Ok(())
    }

    pub fn sweats(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.sweating = true;
        self.record(ActionRecord::new(Action::Sweated));
        Ok(())
    }

    pub fn cools_down(&mut self) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.sweating = false;
        self.record(ActionRecord::new(Action::Cooled));
        Ok(())
    }

    pub fn feels(&mut self, emotion: Emotion) -> Result<(), ValidationError> {
        self.ensure_alive()?;
        self.emotions.insert(emotion);
        self.record(ActionRecord::new(Action::Felt).with_detail(emotion.as_str()));
        Ok(())
    }

    // ========================================================================
    // Crate-internal hooks used by the aggregate
    // ========================================================================

    /// Distance travelled once `distance` is added; the total must stay finite
    fn total_after(&self, distance: f64) -> Result<f64, ValidationError> {
        let total = self.distance_travelled + distance;
        if total.is_finite() {
            Ok(total)
        } else {
            Err(ValidationError::InvalidDistance(distance))
        }
    }

    pub(crate) fn ensure_alive(&self) -> Result<(), ValidationError> {
        if self.alive {
            Ok(())
        } else {
            Err(ValidationError::Dead(self.id))
        }
    }

    pub(crate) fn record(&mut self, record: ActionRecord) {
        self.history.push(record);
    }

    /// Tame the animal into `family`; the caller has checked ownership
    pub(crate) fn make_pet(&mut self, family: FamilyId, name: Option<String>) {
        self.wild = false;
        if let Some(name) = name {
            self.name = Some(name);
        }
        self.family_id = Some(family);
        self.record(ActionRecord::new(Action::BecameAPet));
    }

    pub(crate) fn return_to_wild(&mut self) {
        self.family_id = None;
        self.wild = true;
        self.record(ActionRecord::new(Action::ReturnedToWild));
    }

    pub(crate) fn join_as_child(&mut self, family: FamilyId, family_name: &str) {
        self.family_id = Some(family);
        self.record(ActionRecord::new(Action::AddedToFamily).with_detail(family_name));
    }

    pub(crate) fn leave_as_child(&mut self, family_name: &str) {
        self.family_id = None;
        self.record(ActionRecord::new(Action::RemovedFromFamily).with_detail(family_name));
    }

    pub(crate) fn join_as_parent(&mut self, family: FamilyId, family_name: &str) {
        self.parent_of.insert(family);
        self.record(ActionRecord::new(Action::BecameParent).with_detail(family_name));
    }

    pub(crate) fn leave_as_parent(&mut self, family: FamilyId, family_name: &str) {
        self.parent_of.remove(&family);
        self.record(ActionRecord::new(Action::RemovedAsParent).with_detail(family_name));
    }

    pub(crate) fn heal_by_touch(&mut self) {
        if self.injured {
            self.injured = false;
            self.injury = None;
            self.record(ActionRecord::new(Action::HealedFromInjury));
        }
        if self.ill {
            self.ill = false;
            self.illness = None;
            self.record(ActionRecord::new(Action::RecoveredFromIllness));
        }
    }

    pub(crate) fn mark_criminal(&mut self) {
        self.criminal = true;
    }

    pub(crate) fn mark_forgiven(&mut self) {
        self.forgiven = true;
    }

    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
        self.record(ActionRecord::new(Action::Died));
    }
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Birth date `age` years before `today`; Feb 29 falls back to Feb 28
fn dob_from_age(age: u32, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let year = i32::try_from(age)
        .ok()
        .and_then(|age| today.year().checked_sub(age))
        .ok_or(ValidationError::InvalidAge(age))?;
    today
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
        .ok_or(ValidationError::InvalidAge(age))
}

fn non_blank(value: &str, what: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(what));
    }
    Ok(trimmed.to_string())
}

fn valid_distance(distance: f64) -> Result<f64, ValidationError> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(distance)
    } else {
        Err(ValidationError::InvalidDistance(distance))
    }
}
