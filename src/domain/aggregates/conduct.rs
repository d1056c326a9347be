//! Attribute changes: what creatures do and what happens to them, plus
//! container renames
//!
//! Each successful call records one history entry (two for the
//! creature-on-creature interactions) and fires the self-changed and then
//! the container-changed callback of every entity whose attributes moved.

use tracing::{debug, info, instrument, warn};

use super::Universe;
use crate::domain::entities::Animal;
use crate::domain::error::{DomainError, DomainResult, ValidationError};
use crate::domain::events::EntityRef;
use crate::domain::value_objects::{
    Action, ActionRecord, CommunityId, CreatureId, Emotion, FamilyId, Gender, PersonId,
    RegistrySettings, WorldId,
};

impl Universe {
    fn update_creature<F>(&mut self, id: CreatureId, op: &'static str, apply: F) -> DomainResult<()>
    where
        F: FnOnce(&mut Animal, &RegistrySettings) -> Result<(), ValidationError>,
    {
        let Universe {
            settings,
            people,
            animals,
            ..
        } = self;
        let creature = match id {
            CreatureId::Person(person) => people.get_mut(&person),
            CreatureId::Animal(animal) => animals.get_mut(&animal),
        }
        .ok_or_else(|| DomainError::not_found(format!("creature {}", id)))?;

        apply(&mut *creature, &*settings).map_err(|err| {
            warn!(creature_id = %id, op, error = %err, "creature update rejected");
            DomainError::from(err)
        })?;
        debug!(creature_id = %id, op, "creature updated");
        creature.notifier_mut().fire_attributes(EntityRef::Creature(id));
        Ok(())
    }

    // ========================================================================
    // Identity and appearance
    // ========================================================================

    pub fn rename(&mut self, id: impl Into<CreatureId>, name: &str) -> DomainResult<()> {
        self.update_creature(id.into(), "rename", |c, _| c.rename(name))
    }

    pub fn set_gender(&mut self, id: impl Into<CreatureId>, gender: Gender) -> DomainResult<()> {
        self.update_creature(id.into(), "set_gender", |c, _| c.set_gender(gender))
    }

    /// Only species with hair may change its colour
    pub fn set_hair_color(&mut self, id: impl Into<CreatureId>, color: &str) -> DomainResult<()> {
        self.update_creature(id.into(), "set_hair_color", |c, _| c.set_hair_color(color))
    }

    // ========================================================================
    // Health
    // ========================================================================

    pub fn die(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        let id = id.into();
        self.update_creature(id, "die", |c, _| c.dies())?;
        info!(creature_id = %id, "creature died");
        Ok(())
    }

    pub fn injure(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "injure", |c, _| c.gets_injured())
    }

    pub fn fall_down(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "fall_down", |c, _| c.falls_down())
    }

    pub fn shoot(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "shoot", |c, _| c.gets_shot())
    }

    pub fn heal(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "heal", |c, _| c.heals_from_injury())
    }

    pub fn contract_illness(&mut self, id: impl Into<CreatureId>, illness: &str) -> DomainResult<()> {
        self.update_creature(id.into(), "contract_illness", |c, _| c.contracts_illness(illness))
    }

    pub fn recover(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "recover", |c, _| c.recovers_from_illness())
    }

    // ========================================================================
    // Movement and body
    // ========================================================================

    /// Walking at least the configured distance in one go tires the walker
    pub fn walk(&mut self, id: impl Into<CreatureId>, distance: f64) -> DomainResult<()> {
        self.update_creature(id.into(), "walk", |c, settings| c.walks(distance, settings))
    }

    /// Running past the configured distance warms, tires and makes one sweat
    pub fn run(&mut self, id: impl Into<CreatureId>, distance: f64) -> DomainResult<()> {
        self.update_creature(id.into(), "run", |c, settings| c.runs(distance, settings))
    }

    pub fn wash(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "wash", |c, _| c.washes())
    }

    pub fn roll_in_mud(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "roll_in_mud", |c, _| c.went_in_mud())
    }

    pub fn dry(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "dry", |c, _| c.dries())
    }

    pub fn tire(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "tire", |c, _| c.gets_tired())
    }

    pub fn rest(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "rest", |c, _| c.rests())
    }

    pub fn say(&mut self, id: impl Into<CreatureId>, words: &str) -> DomainResult<()> {
        self.update_creature(id.into(), "say", |c, _| c.says(words))
    }

    pub fn warm_up(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "warm_up", |c, _| c.gets_warm())
    }

    pub fn chill(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "chill", |c, _| c.gets_cold())
    }

    pub fn sweat(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "sweat", |c, _| c.sweats())
    }

    pub fn cool_down(&mut self, id: impl Into<CreatureId>) -> DomainResult<()> {
        self.update_creature(id.into(), "cool_down", |c, _| c.cools_down())
    }

    pub fn feel(&mut self, id: impl Into<CreatureId>, emotion: Emotion) -> DomainResult<()> {
        self.update_creature(id.into(), "feel", |c, _| c.feels(emotion))
    }

    // ========================================================================
    // Interactions
    // ========================================================================

    /// `killer` kills `victim`
    ///
    /// A person killing another person becomes a criminal. Killing oneself
    /// is allowed and leaves no criminal record.
    #[instrument(level = "debug", skip(self))]
    pub fn kills(
        &mut self,
        killer: impl Into<CreatureId> + std::fmt::Debug,
        victim: impl Into<CreatureId> + std::fmt::Debug,
    ) -> DomainResult<()> {
        let (killer, victim) = (killer.into(), victim.into());
        let (murder, victim_name) = {
            let attacker = self.creature(killer)?;
            let target = self.creature(victim)?;
            attacker
                .ensure_alive()
                .and_then(|_| target.ensure_alive())
                .map_err(|err| {
                    warn!(killer = %killer, victim = %victim, error = %err, "kill rejected");
                    DomainError::from(err)
                })?;
            (
                killer != victim && attacker.is_person() && target.is_person(),
                target.display_name().to_string(),
            )
        };

        self.creature_mut(victim)?.mark_dead();
        let attacker = self.creature_mut(killer)?;
        attacker.record(ActionRecord::new(Action::Killed).with_detail(victim_name));
        if murder {
            attacker.mark_criminal();
        }
        info!(killer = %killer, victim = %victim, murder, "creature killed");

        self.notify_attributes(EntityRef::Creature(victim));
        if killer != victim {
            self.notify_attributes(EntityRef::Creature(killer));
        }
        Ok(())
    }

    /// `toucher` touches `other`; a living healer heals the injuries and
    /// illnesses of whoever it touches, provided they are alive
    #[instrument(level = "debug", skip(self))]
    pub fn touches(
        &mut self,
        toucher: impl Into<CreatureId> + std::fmt::Debug,
        other: impl Into<CreatureId> + std::fmt::Debug,
    ) -> DomainResult<()> {
        let (toucher, other) = (toucher.into(), other.into());
        let (heals, toucher_name, other_name) = {
            let source = self.creature(toucher)?;
            let target = self.creature(other)?;
            source.ensure_alive().map_err(|err| {
                warn!(toucher = %toucher, error = %err, "touch rejected");
                DomainError::from(err)
            })?;
            (
                source.has_healing_touch() && target.is_alive(),
                source.display_name().to_string(),
                target.display_name().to_string(),
            )
        };

        self.creature_mut(toucher)?
            .record(ActionRecord::new(Action::Touched).with_detail(other_name));
        let target = self.creature_mut(other)?;
        target.record(ActionRecord::new(Action::TouchedBy).with_detail(toucher_name));
        if heals {
            target.heal_by_touch();
        }
        debug!(toucher = %toucher, other = %other, heals, "creature touched");

        self.notify_attributes(EntityRef::Creature(toucher));
        if toucher != other {
            self.notify_attributes(EntityRef::Creature(other));
        }
        Ok(())
    }

    /// `forgiver` forgives `sinner`; the dead cannot forgive
    #[instrument(level = "debug", skip(self))]
    pub fn forgives(&mut self, forgiver: PersonId, sinner: PersonId) -> DomainResult<()> {
        let (forgiver_name, sinner_name) = {
            let source = self.person(forgiver)?;
            let target = self.person(sinner)?;
            source.ensure_alive().map_err(|err| {
                warn!(forgiver = %forgiver, error = %err, "forgiveness rejected");
                DomainError::from(err)
            })?;
            (
                source.display_name().to_string(),
                target.display_name().to_string(),
            )
        };

        self.person_mut(forgiver)?
            .record(ActionRecord::new(Action::Forgave).with_detail(sinner_name));
        let target = self.person_mut(sinner)?;
        target.mark_forgiven();
        target.record(ActionRecord::new(Action::WasForgiven).with_detail(forgiver_name));
        info!(forgiver = %forgiver, sinner = %sinner, "person forgiven");

        self.notify_attributes(EntityRef::Creature(forgiver.into()));
        if forgiver != sinner {
            self.notify_attributes(EntityRef::Creature(sinner.into()));
        }
        Ok(())
    }

    // ========================================================================
    // Container renames
    // ========================================================================

    pub fn rename_family(&mut self, id: FamilyId, name: &str) -> DomainResult<()> {
        self.family_mut(id)?.set_name(name)?;
        info!(family_id = %id, name = %name.trim(), "family renamed");
        self.notify_attributes(EntityRef::Family(id));
        Ok(())
    }

    pub fn rename_community(&mut self, id: CommunityId, name: &str) -> DomainResult<()> {
        self.community_mut(id)?.set_name(name)?;
        info!(community_id = %id, name = %name.trim(), "community renamed");
        self.notify_attributes(EntityRef::Community(id));
        Ok(())
    }

    pub fn rename_world(&mut self, id: WorldId, name: &str) -> DomainResult<()> {
        self.world_mut(id)?.set_name(name)?;
        info!(world_id = %id, name = %name.trim(), "world renamed");
        self.notify_attributes(EntityRef::World(id));
        Ok(())
    }
}
