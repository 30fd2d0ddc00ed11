//! Ability-score modifiers.
//!
//! Formula: modifier = floor((score - 10) / 2), so odd scores below ten round
//! away from zero (9 → -1, 3 → -4).

use crate::state::{PrimaryStats, StatKind};

/// Tabletop modifier for a single score.
pub const fn stat_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Modifiers for all six scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifiers {
    pub str_mod: i32,
    pub dex_mod: i32,
    pub con_mod: i32,
    pub int_mod: i32,
    pub wis_mod: i32,
    pub cha_mod: i32,
}

impl StatModifiers {
    pub const fn from_stats(stats: &PrimaryStats) -> Self {
        Self {
            str_mod: stat_modifier(stats.strength),
            dex_mod: stat_modifier(stats.dexterity),
            con_mod: stat_modifier(stats.constitution),
            int_mod: stat_modifier(stats.intelligence),
            wis_mod: stat_modifier(stats.wisdom),
            cha_mod: stat_modifier(stats.charisma),
        }
    }

    pub const fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Strength => self.str_mod,
            StatKind::Dexterity => self.dex_mod,
            StatKind::Constitution => self.con_mod,
            StatKind::Intelligence => self.int_mod,
            StatKind::Wisdom => self.wis_mod,
            StatKind::Charisma => self.cha_mod,
        }
    }
}
