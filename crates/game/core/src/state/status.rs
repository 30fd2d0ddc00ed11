//! Status effect system for combatants.
//!
//! Status effects are timed conditions counted in rounds. Each tick decrements
//! every instance by one; instances are removed once their duration reaches
//! zero. At most one instance per [`StatusEffectKind`] is ever active.

use arrayvec::ArrayVec;

/// Types of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Bleed,
    Poison,
    Burn,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Carried for content completeness, has no mechanic of its own.
    Frost,
    /// Skips the affected combatant's pending action.
    Stun,
    /// Outgoing attack power ×0.75.
    Weakness,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// Outgoing attack power ×1.25.
    StrengthBuff,
    /// Defense ×1.25 during mitigation.
    DefenseBuff,
    /// Heals potency per tick.
    Regeneration,
}

impl StatusEffectKind {
    /// Number of distinct kinds, also the capacity of [`StatusEffects`].
    pub const COUNT: usize = 9;

    /// Returns true for kinds that deal their potency as true damage each tick.
    pub const fn is_damage_over_time(&self) -> bool {
        matches!(self, Self::Bleed | Self::Poison | Self::Burn)
    }
}

/// Which outgoing or incoming value a status modifier applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierTarget {
    Attack,
    Defense,
}

/// A status effect an ability or attack applies on landing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusRider {
    pub kind: StatusEffectKind,
    pub duration: i32,
    pub potency: i32,
}

impl StatusRider {
    pub const fn new(kind: StatusEffectKind, duration: i32, potency: i32) -> Self {
        Self {
            kind,
            duration,
            potency,
        }
    }

    /// Creates the live instance, attributed to `applied_by`.
    pub fn instance(&self, applied_by: impl Into<String>) -> StatusEffectInstance {
        StatusEffectInstance {
            kind: self.kind,
            duration: self.duration,
            potency: self.potency,
            applied_by: applied_by.into(),
        }
    }
}

/// A single active status effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub kind: StatusEffectKind,
    /// Rounds remaining.
    pub duration: i32,
    /// Damage or healing per tick. Unused for pure buffs and debuffs.
    pub potency: i32,
    /// Name of whoever applied the effect, for logging only.
    pub applied_by: String,
}

/// Result of ticking one instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEffect {
    Damage(i32),
    Heal(i32),
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffectInstance, { StatusEffectKind::COUNT }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Adds an effect, or refreshes the existing instance of the same kind.
    ///
    /// Refresh keeps the larger duration and the larger potency. Effects never
    /// stack.
    pub fn add(&mut self, effect: StatusEffectInstance) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.duration = existing.duration.max(effect.duration);
            existing.potency = existing.potency.max(effect.potency);
            return;
        }

        // One slot per kind, so this never exceeds capacity.
        self.effects.push(effect);
    }

    /// Checks if a specific status effect is active.
    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Returns the active instance of a kind.
    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Advances every effect by one round.
    ///
    /// Each instance loses one round of duration, then reports its damage or
    /// healing. Instances at zero or below are removed afterwards, so an effect
    /// applied for N rounds ticks exactly N times.
    pub fn tick(&mut self) -> Vec<(StatusEffectKind, TickEffect)> {
        let mut produced = Vec::new();

        for effect in self.effects.iter_mut() {
            effect.duration -= 1;

            if effect.kind.is_damage_over_time() {
                produced.push((effect.kind, TickEffect::Damage(effect.potency)));
            } else if effect.kind == StatusEffectKind::Regeneration {
                produced.push((effect.kind, TickEffect::Heal(effect.potency)));
            }
        }

        self.effects.retain(|e| {
            let keep = e.duration > 0;
            if !keep {
                tracing::debug!(kind = %e.kind, "status effect expired");
            }
            keep
        });

        produced
    }

    /// Multiplicative modifier from buffs and debuffs for `target`.
    pub fn modifier(&self, target: ModifierTarget) -> f64 {
        self.effects
            .iter()
            .fold(1.0, |acc, e| match (e.kind, target) {
                (StatusEffectKind::Weakness, ModifierTarget::Attack) => acc * 0.75,
                (StatusEffectKind::StrengthBuff, ModifierTarget::Attack) => acc * 1.25,
                (StatusEffectKind::DefenseBuff, ModifierTarget::Defense) => acc * 1.25,
                _ => acc,
            })
    }

    /// Iterate over all active effects.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Comma-separated kind names, or `None` when nothing is active.
    pub fn summary(&self) -> String {
        if self.effects.is_empty() {
            return "None".to_string();
        }
        self.effects
            .iter()
            .map(|e| e.kind.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poison(duration: i32, potency: i32) -> StatusEffectInstance {
        StatusRider::new(StatusEffectKind::Poison, duration, potency).instance("tester")
    }

    #[test]
    fn reapplying_refreshes_with_max() {
        let mut effects = StatusEffects::empty();
        effects.add(poison(5, 7));
        effects.add(poison(2, 3));

        let active = effects.get(StatusEffectKind::Poison).unwrap();
        assert_eq!(active.duration, 5);
        assert_eq!(active.potency, 7);
        assert_eq!(effects.len(), 1);

        effects.add(poison(6, 2));
        let active = effects.get(StatusEffectKind::Poison).unwrap();
        assert_eq!(active.duration, 6);
        assert_eq!(active.potency, 7);
    }

    #[test]
    fn tick_decrements_and_removes_exactly_at_zero() {
        let mut effects = StatusEffects::empty();
        effects.add(poison(3, 4));

        for remaining in [2, 1] {
            let ticks = effects.tick();
            assert_eq!(ticks, vec![(StatusEffectKind::Poison, TickEffect::Damage(4))]);
            assert_eq!(effects.get(StatusEffectKind::Poison).unwrap().duration, remaining);
        }

        let ticks = effects.tick();
        assert_eq!(ticks.len(), 1);
        assert!(!effects.has(StatusEffectKind::Poison));
        assert!(effects.tick().is_empty());
    }

    #[test]
    fn regeneration_reports_healing() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusRider::new(StatusEffectKind::Regeneration, 2, 8).instance("self"));
        assert_eq!(
            effects.tick(),
            vec![(StatusEffectKind::Regeneration, TickEffect::Heal(8))]
        );
    }

    #[test]
    fn buffs_produce_no_tick_but_modify() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusRider::new(StatusEffectKind::Weakness, 2, 0).instance("curse"));
        effects.add(StatusRider::new(StatusEffectKind::DefenseBuff, 2, 0).instance("shield"));

        assert!(effects.tick().is_empty());
        assert_eq!(effects.modifier(ModifierTarget::Attack), 0.75);
        assert_eq!(effects.modifier(ModifierTarget::Defense), 1.25);
        assert_eq!(effects.summary(), "weakness, defense_buff");
    }

    #[test]
    fn every_kind_fits() {
        use StatusEffectKind::*;
        let mut effects = StatusEffects::empty();
        for kind in [
            Bleed, Poison, Burn, Frost, Stun, Weakness, StrengthBuff, DefenseBuff, Regeneration,
        ] {
            effects.add(StatusRider::new(kind, 1, 1).instance("x"));
        }
        assert_eq!(effects.len(), StatusEffectKind::COUNT);
    }
}
