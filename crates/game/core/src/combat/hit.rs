//! Hit, dodge and parry chances.

use crate::config::CombatConfig;

/// Hit chance in percent.
///
/// # Formula
///
/// ```text
/// hit_chance = accuracy × accuracy_modifier - evasion
/// clamped to [hit_chance_min, hit_chance_max]
/// ```
pub fn hit_chance(
    accuracy: i32,
    accuracy_modifier: f64,
    evasion: i32,
    config: &CombatConfig,
) -> f64 {
    let raw = f64::from(accuracy) * accuracy_modifier - f64::from(evasion);
    raw.clamp(config.hit_chance_min, config.hit_chance_max)
}

/// A d100 roll hits when it does not exceed the chance.
pub fn check_hit(chance: f64, roll: i32) -> bool {
    f64::from(roll) <= chance
}

/// Percent chance to evade an attack while dodging: `evasion + dodge_bonus`.
pub fn dodge_chance(evasion: i32, config: &CombatConfig) -> i32 {
    evasion + config.dodge_bonus
}

/// Percent chance to parry: `parry_base + parry_initiative_scale × initiative`.
pub fn parry_chance(initiative: i32, config: &CombatConfig) -> i32 {
    config.parry_base + config.parry_initiative_scale * initiative
}
