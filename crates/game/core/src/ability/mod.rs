//! Class abilities: static definitions and the per-combatant runtime.
//!
//! - [`Ability`]: immutable catalog entry (cost, cooldown, targeting, effect)
//! - [`AbilityBook`]: cooldown and usage counters for one combatant
//!
//! Scaling: for every stat in `scales_with` the modifiers are summed into a
//! bonus, then damage and healing become
//! `floor(base × (1 + bonus × scaling_factor × 0.1))`.

mod book;
mod error;
mod types;

pub use book::{AbilityActivation, AbilityBook, AbilityView, ActiveAbility};
pub use error::AbilityError;
pub use types::{Ability, AbilityEffect, AbilityFlags, TargetKind};
