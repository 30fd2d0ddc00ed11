//! Enemy action selection.
//!
//! Every policy draws from the injected RNG and gates each choice on the
//! stamina it costs, falling back to [`AttackType::Block`]. Random draws are
//! short-circuited: a branch whose stamina gate fails consumes no roll.

use super::template::{EnemyBehavior, EnemyTemplate};
use crate::combat::AttackType;
use crate::env::RngOracle;

/// Combat readings the AI decides from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AiInputs {
    /// Own health fraction in `[0, 1]`.
    pub own_health: f64,
    pub stamina: i32,
    /// Opponent health fraction in `[0, 1]`.
    pub opponent_health: f64,
}

/// Picks the next action for a templated enemy.
///
/// At or below the template's enrage threshold the berserker policy replaces
/// the assigned behavior.
pub fn choose_action(
    template: &EnemyTemplate,
    inputs: AiInputs,
    rng: &mut (impl RngOracle + ?Sized),
) -> AttackType {
    let behavior = if inputs.own_health <= template.enrage_threshold {
        EnemyBehavior::Berserker
    } else {
        template.behavior
    };

    let action = by_behavior(behavior, inputs, rng);
    tracing::debug!(enemy = %template.name, %behavior, %action, "enemy chose action");
    action
}

/// Dispatches one behavior policy.
pub fn by_behavior(
    behavior: EnemyBehavior,
    inputs: AiInputs,
    rng: &mut (impl RngOracle + ?Sized),
) -> AttackType {
    let AiInputs {
        own_health,
        stamina,
        opponent_health,
    } = inputs;

    match behavior {
        EnemyBehavior::Aggressive => aggressive(stamina, rng),
        EnemyBehavior::Defensive => defensive(stamina, own_health, rng),
        EnemyBehavior::Balanced => balanced(stamina, rng),
        EnemyBehavior::Tactical => {
            if opponent_health < 0.3 {
                aggressive(stamina, rng)
            } else if own_health < 0.4 {
                defensive(stamina, own_health, rng)
            } else {
                balanced(stamina, rng)
            }
        }
        EnemyBehavior::Berserker => berserker(stamina, rng),
        EnemyBehavior::Coward => {
            if own_health < 0.5 {
                if stamina >= 20 && rng.chance(0.6) {
                    AttackType::Dodge
                } else {
                    AttackType::Block
                }
            } else {
                balanced(stamina, rng)
            }
        }
    }
}

/// Generic policy for enemies fought without a template.
///
/// 40% light, 25% heavy, 15% dodge, 10% parry, the rest block. Below 15
/// stamina it always blocks.
pub fn skirmish_action(stamina: i32, rng: &mut (impl RngOracle + ?Sized)) -> AttackType {
    if stamina < 15 {
        return AttackType::Block;
    }

    let roll = rng.unit();
    if roll < 0.4 {
        AttackType::LightAttack
    } else if roll < 0.65 && stamina >= 35 {
        AttackType::HeavyAttack
    } else if roll < 0.8 && stamina >= 20 {
        AttackType::Dodge
    } else if roll < 0.9 && stamina >= 25 {
        AttackType::Parry
    } else {
        AttackType::Block
    }
}

fn aggressive(stamina: i32, rng: &mut (impl RngOracle + ?Sized)) -> AttackType {
    if stamina >= 35 && rng.chance(0.6) {
        AttackType::HeavyAttack
    } else if stamina >= 15 {
        AttackType::LightAttack
    } else {
        AttackType::Block
    }
}

fn defensive(stamina: i32, own_health: f64, rng: &mut (impl RngOracle + ?Sized)) -> AttackType {
    if own_health < 0.3 {
        return if stamina >= 25 && rng.chance(0.5) {
            AttackType::Parry
        } else {
            AttackType::Block
        };
    }

    let roll = rng.unit();
    if roll < 0.3 && stamina >= 25 {
        AttackType::Parry
    } else if roll < 0.5 && stamina >= 10 {
        AttackType::Block
    } else if stamina >= 15 {
        AttackType::LightAttack
    } else {
        AttackType::Block
    }
}

fn balanced(stamina: i32, rng: &mut (impl RngOracle + ?Sized)) -> AttackType {
    if stamina < 15 {
        return AttackType::Block;
    }

    let roll = rng.unit();
    if roll < 0.3 {
        AttackType::LightAttack
    } else if roll < 0.5 && stamina >= 35 {
        AttackType::HeavyAttack
    } else if roll < 0.7 && stamina >= 20 {
        AttackType::Dodge
    } else if roll < 0.85 && stamina >= 25 {
        AttackType::Parry
    } else {
        AttackType::Block
    }
}

fn berserker(stamina: i32, rng: &mut (impl RngOracle + ?Sized)) -> AttackType {
    if stamina >= 35 && rng.chance(0.8) {
        AttackType::HeavyAttack
    } else if stamina >= 15 {
        AttackType::LightAttack
    } else if rng.chance(0.7) {
        AttackType::LightAttack
    } else {
        AttackType::Block
    }
}
