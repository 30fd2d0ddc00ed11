//! Derived combat statistics.
//!
//! Computed once when a combatant is created and never recomputed during the
//! fight.

use super::modifiers::StatModifiers;
use crate::state::{EquipmentItem, PrimaryStats};

/// Secondary statistics used by hit, damage and turn-order resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack_power: i32,
    pub defense: i32,
    pub accuracy: i32,
    pub evasion: i32,
    pub critical_chance: f64,
    pub critical_damage: f64,
    pub initiative: i32,
    /// Resistance to stagger.
    pub poise: i32,
}

impl CombatStats {
    /// Derives combat stats from primary scores and equipped items.
    ///
    /// Unequipped items in `items` are ignored.
    pub fn derive<'a>(
        stats: &PrimaryStats,
        items: impl IntoIterator<Item = &'a EquipmentItem>,
    ) -> Self {
        let mods = StatModifiers::from_stats(stats);

        let (attack_bonus, defense_bonus) = items
            .into_iter()
            .filter(|item| item.equipped)
            .fold((0, 0), |(atk, def), item| {
                (atk + item.attack_bonus, def + item.defense_bonus)
            });

        let str_mod = mods.str_mod;
        let dex_mod = mods.dex_mod;

        Self {
            attack_power: (10 + str_mod + attack_bonus).max(1),
            defense: (10 + dex_mod + defense_bonus).max(0),
            accuracy: (60 + 3 * dex_mod + 2 * str_mod).max(10),
            evasion: (10 + 4 * dex_mod).max(0),
            critical_chance: (0.05 + 0.01 * f64::from(dex_mod)).clamp(0.01, 0.5),
            critical_damage: (1.5 + 0.1 * f64::from(str_mod)).max(1.0),
            initiative: (10 + dex_mod).max(1),
            poise: (10 + mods.con_mod).max(1),
        }
    }
}
