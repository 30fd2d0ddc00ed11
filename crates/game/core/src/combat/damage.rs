//! Damage types, resistance and defense mitigation.

use crate::config::CombatConfig;

/// Damage type for resistances.
///
/// Basic attacks are always physical.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    #[default]
    Physical,
    Fire,
    Frost,
    Lightning,
    Poison,
    Dark,
    Holy,
}

/// Scales raw damage by a resistance multiplier, rounding down.
///
/// A multiplier of exactly zero is immunity and yields zero.
pub fn apply_resistance(raw: i32, resistance: f64) -> i32 {
    if resistance <= 0.0 {
        return 0;
    }
    (f64::from(raw) * resistance).floor().max(0.0) as i32
}

/// Reduces damage by defense, then by the block factor when blocking.
///
/// # Formula
///
/// ```text
/// mitigated = max(1, floor(damage - defense × defense_mitigation))
/// if blocking:
///     mitigated = floor(mitigated × block_factor)
/// ```
///
/// `defense` already carries any status modifier.
pub fn mitigate(damage: i32, defense: f64, blocking: bool, config: &CombatConfig) -> i32 {
    let reduced = (f64::from(damage) - defense * config.defense_mitigation).floor();
    let mitigated = reduced.max(1.0) as i32;

    if blocking {
        (f64::from(mitigated) * config.block_factor).floor() as i32
    } else {
        mitigated
    }
}
