//! Per-combatant ability runtime.
//!
//! An [`AbilityBook`] is created fresh for every combatant at fight start and
//! discarded with it. Nothing here outlives the fight.

use super::error::AbilityError;
use super::types::{Ability, AbilityEffect, TargetKind};
use crate::env::AbilityOracle;
use crate::state::{ClassKind, PrimaryStats, ResourceKind, ResourcePools};
use crate::stats::StatModifiers;

/// Runtime wrapper around one ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveAbility {
    pub ability: Ability,
    pub cooldown_remaining: i32,
    pub times_used: u32,
    /// Set by a use and cleared by the next tick, which it survives untouched.
    #[cfg_attr(feature = "serde", serde(default))]
    used_this_round: bool,
}

impl ActiveAbility {
    pub fn new(ability: Ability) -> Self {
        Self {
            ability,
            cooldown_remaining: 0,
            times_used: 0,
            used_this_round: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0
    }

    fn tick_cooldown(&mut self) {
        if std::mem::take(&mut self.used_this_round) {
            return;
        }
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
        }
    }
}

/// Availability report for one ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityView {
    pub name: String,
    pub description: String,
    pub resource: ResourceKind,
    pub cost: i32,
    pub cooldown_remaining: i32,
    pub is_ready: bool,
    pub can_afford: bool,
    pub can_use: bool,
    pub target: TargetKind,
    pub times_used: u32,
}

/// A successful activation: resources already spent, cooldown started.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityActivation {
    pub ability: Ability,
    /// Effect with stat scaling applied.
    pub effect: AbilityEffect,
}

/// Abilities bound to one combatant's class.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityBook {
    entries: Vec<ActiveAbility>,
}

impl AbilityBook {
    /// Loads every ability of `class` with cooldowns at zero.
    pub fn for_class(class: ClassKind, oracle: &dyn AbilityOracle) -> Self {
        let entries: Vec<ActiveAbility> = oracle
            .abilities_for(class)
            .into_iter()
            .cloned()
            .map(ActiveAbility::new)
            .collect();

        tracing::debug!(%class, count = entries.len(), "loaded class abilities");
        Self { entries }
    }

    pub fn from_abilities(abilities: impl IntoIterator<Item = Ability>) -> Self {
        Self {
            entries: abilities.into_iter().map(ActiveAbility::new).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ActiveAbility> {
        self.entries.iter().find(|e| e.ability.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveAbility> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports readiness and affordability of every ability.
    pub fn available(&self, pools: &ResourcePools) -> Vec<AbilityView> {
        self.entries
            .iter()
            .map(|entry| {
                let ability = &entry.ability;
                let is_ready = entry.is_ready();
                let can_afford = pools.can_afford(ability.resource, ability.cost);
                AbilityView {
                    name: ability.name.clone(),
                    description: ability.description.clone(),
                    resource: ability.resource,
                    cost: ability.cost,
                    cooldown_remaining: entry.cooldown_remaining,
                    is_ready,
                    can_afford,
                    can_use: is_ready && can_afford,
                    target: ability.target,
                    times_used: entry.times_used,
                }
            })
            .collect()
    }

    /// Activates an ability.
    ///
    /// On success the cost is deducted from `pools`, the cooldown is set to the
    /// ability's full cooldown and the scaled effect is returned. On failure
    /// nothing changes.
    pub fn use_ability(
        &mut self,
        name: &str,
        pools: &mut ResourcePools,
        stats: &PrimaryStats,
    ) -> Result<AbilityActivation, AbilityError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.ability.name == name)
            .ok_or_else(|| AbilityError::UnknownAbility(name.to_string()))?;

        if !entry.is_ready() {
            return Err(AbilityError::OnCooldown {
                name: name.to_string(),
                remaining: entry.cooldown_remaining,
            });
        }

        let ability = &entry.ability;
        if !pools.can_afford(ability.resource, ability.cost) {
            return Err(AbilityError::InsufficientResource {
                name: name.to_string(),
                resource: ability.resource,
            });
        }

        pools.spend(ability.resource, ability.cost);
        entry.cooldown_remaining = ability.cooldown;
        entry.times_used += 1;
        entry.used_this_round = true;

        let mods = StatModifiers::from_stats(stats);
        let bonus: i32 = ability.scales_with.iter().map(|s| mods.get(*s)).sum();
        let effect = ability.effect.scaled(bonus, ability.scaling_factor);

        tracing::info!(
            ability = name,
            cost = ability.cost,
            resource = %ability.resource,
            "ability used"
        );

        Ok(AbilityActivation {
            ability: ability.clone(),
            effect,
        })
    }

    /// Decrements every cooldown by one, floored at zero.
    ///
    /// Run once at the end of each round. An ability used during that round
    /// keeps its full cooldown, so a cooldown of N blocks the next N rounds.
    pub fn tick_cooldowns(&mut self) {
        for entry in &mut self.entries {
            entry.tick_cooldown();
        }
    }

    /// Clears every cooldown (resting between fights).
    pub fn reset_cooldowns(&mut self) {
        for entry in &mut self.entries {
            entry.cooldown_remaining = 0;
            entry.used_this_round = false;
        }
    }

    /// Definition plus runtime counters for one ability.
    pub fn info(&self, name: &str) -> Option<&ActiveAbility> {
        self.get(name)
    }
}
