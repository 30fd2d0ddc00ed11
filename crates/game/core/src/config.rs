//! Tunable combat parameters.
//!
//! Every field defaults to the standard rules, so a TOML file only has to name
//! the values it overrides.

use crate::combat::AttackType;
use crate::state::{StatusEffectKind, StatusRider};

/// Per-action costs and modifiers for the basic combat actions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackProfile {
    pub stamina_cost: i32,
    pub accuracy_modifier: f64,
    pub damage_multiplier: f64,
    /// Added to the attacker's own critical chance.
    pub critical_bonus: f64,
    /// Relative speed, reported to callers but not used for turn order.
    pub speed_modifier: f64,
    pub can_be_parried: bool,
}

impl AttackProfile {
    /// Profile for a non-damaging stance action.
    pub const fn stance(stamina_cost: i32, speed_modifier: f64) -> Self {
        Self {
            stamina_cost,
            accuracy_modifier: 0.0,
            damage_multiplier: 0.0,
            critical_bonus: 0.0,
            speed_modifier,
            can_be_parried: false,
        }
    }
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub light_attack: AttackProfile,
    pub heavy_attack: AttackProfile,
    pub dodge: AttackProfile,
    pub block: AttackProfile,
    pub parry: AttackProfile,

    /// Stamina restored to both combatants at the end of every round.
    pub stamina_regen: i32,

    /// Fraction of defense subtracted from incoming damage.
    pub defense_mitigation: f64,
    /// Multiplier applied to mitigated damage while blocking.
    pub block_factor: f64,

    pub hit_chance_min: f64,
    pub hit_chance_max: f64,

    /// Added to the defender's evasion when rolling a dodge.
    pub dodge_bonus: i32,
    pub parry_base: i32,
    pub parry_initiative_scale: i32,

    /// Status rider applied by heavy attacks that land.
    pub heavy_attack_bleed: StatusRider,
    pub heavy_attack_bleed_chance: f64,

    pub reward_souls_min: i32,
    pub reward_souls_max: i32,
    pub reward_xp_per_level: u32,
}

impl CombatConfig {
    // ===== standard rules =====
    pub const DEFAULT_STAMINA_REGEN: i32 = 10;
    pub const DEFAULT_DEFENSE_MITIGATION: f64 = 0.5;
    pub const DEFAULT_BLOCK_FACTOR: f64 = 0.4;
    pub const DEFAULT_HIT_CHANCE_MIN: f64 = 10.0;
    pub const DEFAULT_HIT_CHANCE_MAX: f64 = 95.0;
    pub const DEFAULT_DODGE_BONUS: i32 = 20;
    pub const DEFAULT_PARRY_BASE: i32 = 30;
    pub const DEFAULT_PARRY_INITIATIVE_SCALE: i32 = 2;
    pub const DEFAULT_HEAVY_BLEED_CHANCE: f64 = 0.3;
    pub const DEFAULT_REWARD_SOULS: (i32, i32) = (50, 150);
    pub const DEFAULT_REWARD_XP_PER_LEVEL: u32 = 100;

    pub fn new() -> Self {
        Self {
            light_attack: AttackProfile {
                stamina_cost: 15,
                accuracy_modifier: 1.1,
                damage_multiplier: 1.0,
                critical_bonus: 0.05,
                speed_modifier: 1.2,
                can_be_parried: true,
            },
            heavy_attack: AttackProfile {
                stamina_cost: 35,
                accuracy_modifier: 0.8,
                damage_multiplier: 2.2,
                critical_bonus: 0.15,
                speed_modifier: 0.7,
                can_be_parried: true,
            },
            dodge: AttackProfile::stance(20, 1.5),
            block: AttackProfile::stance(10, 1.3),
            parry: AttackProfile::stance(25, 1.4),
            stamina_regen: Self::DEFAULT_STAMINA_REGEN,
            defense_mitigation: Self::DEFAULT_DEFENSE_MITIGATION,
            block_factor: Self::DEFAULT_BLOCK_FACTOR,
            hit_chance_min: Self::DEFAULT_HIT_CHANCE_MIN,
            hit_chance_max: Self::DEFAULT_HIT_CHANCE_MAX,
            dodge_bonus: Self::DEFAULT_DODGE_BONUS,
            parry_base: Self::DEFAULT_PARRY_BASE,
            parry_initiative_scale: Self::DEFAULT_PARRY_INITIATIVE_SCALE,
            heavy_attack_bleed: StatusRider::new(StatusEffectKind::Bleed, 3, 5),
            heavy_attack_bleed_chance: Self::DEFAULT_HEAVY_BLEED_CHANCE,
            reward_souls_min: Self::DEFAULT_REWARD_SOULS.0,
            reward_souls_max: Self::DEFAULT_REWARD_SOULS.1,
            reward_xp_per_level: Self::DEFAULT_REWARD_XP_PER_LEVEL,
        }
    }

    /// Returns the profile for a basic action.
    pub fn profile(&self, action: AttackType) -> &AttackProfile {
        match action {
            AttackType::LightAttack => &self.light_attack,
            AttackType::HeavyAttack => &self.heavy_attack,
            AttackType::Dodge => &self.dodge,
            AttackType::Block => &self.block,
            AttackType::Parry => &self.parry,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
