//! Combat resolution.
//!
//! - [`Combat`]: the per-fight state machine driven one round at a time
//! - [`Combatant`]: a character snapshot plus live pools, status and stance
//! - `resolve`: single-action resolution (dodge, parry, hit, crit, bleed)
//! - `hit` / `damage`: pure formulas for chances and mitigation
//!
//! All randomness comes from the caller's [`crate::env::RngOracle`].

mod action;
mod combatant;
mod engine;
mod error;
mod resolve;
mod result;

pub mod damage;
pub mod hit;

pub use action::{ActionError, ActionOption, ActionResult, AttackType, PlayerCommand};
pub use combatant::{Combatant, Side, Stance};
pub use damage::{DamageType, apply_resistance, mitigate};
pub use engine::{Combat, Initiative};
pub use error::CombatError;
pub use hit::{check_hit, dodge_chance, hit_chance, parry_chance};
pub use resolve::{resolve_ability, resolve_basic, resolve_command};
pub use result::{CombatLogEntry, CombatOutcome, RoundReport, RoundSummary};
