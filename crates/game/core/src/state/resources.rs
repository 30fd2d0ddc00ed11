//! Live resource pools of a combatant.

use crate::state::CharacterSnapshot;

/// Kind of resource an ability spends.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    Stamina,
    Mana,
    Health,
    Souls,
}

/// Current and maximum values for the pools that change during a fight.
///
/// Diverges from the persisted character while the fight runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePools {
    pub health: i32,
    pub max_health: i32,
    pub stamina: i32,
    pub max_stamina: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub souls: i32,
}

impl ResourcePools {
    pub fn from_snapshot(snapshot: &CharacterSnapshot) -> Self {
        Self {
            health: snapshot.health,
            max_health: snapshot.max_health,
            stamina: snapshot.stamina,
            max_stamina: snapshot.max_stamina,
            mana: snapshot.mana,
            max_mana: snapshot.max_mana,
            souls: snapshot.souls,
        }
    }

    pub const fn current(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Stamina => self.stamina,
            ResourceKind::Mana => self.mana,
            ResourceKind::Health => self.health,
            ResourceKind::Souls => self.souls,
        }
    }

    /// Health costs must leave at least one point, everything else may drain
    /// to zero.
    pub const fn can_afford(&self, kind: ResourceKind, cost: i32) -> bool {
        match kind {
            ResourceKind::Health => self.health > cost,
            _ => self.current(kind) >= cost,
        }
    }

    /// Deducts `cost`. Callers check [`Self::can_afford`] first.
    pub fn spend(&mut self, kind: ResourceKind, cost: i32) {
        let pool = match kind {
            ResourceKind::Stamina => &mut self.stamina,
            ResourceKind::Mana => &mut self.mana,
            ResourceKind::Health => &mut self.health,
            ResourceKind::Souls => &mut self.souls,
        };
        *pool = (*pool - cost).max(0);
    }

    /// Adds `amount` capped at the pool maximum. Returns the amount gained.
    pub fn restore(&mut self, kind: ResourceKind, amount: i32) -> i32 {
        let (pool, max) = match kind {
            ResourceKind::Stamina => (&mut self.stamina, self.max_stamina),
            ResourceKind::Mana => (&mut self.mana, self.max_mana),
            ResourceKind::Health => (&mut self.health, self.max_health),
            ResourceKind::Souls => (&mut self.souls, i32::MAX),
        };
        let before = *pool;
        *pool = pool.saturating_add(amount.max(0)).min(max);
        *pool - before
    }

    /// Removes health, floored at zero.
    pub fn lose_health(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    /// Current health as a fraction of maximum.
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        f64::from(self.health) / f64::from(self.max_health)
    }
}
