//! Stat model.
//!
//! ```text
//! [ Primary scores (PrimaryStats) ]
//!      ↓  floor((score - 10) / 2)
//! [ Modifiers (StatModifiers) ]
//!      ↓  + equipped item bonuses
//! [ Combat stats (CombatStats) ]
//! ```
//!
//! Pure functions only, no randomness.

pub mod combat;
pub mod modifiers;

pub use combat::CombatStats;
pub use modifiers::{StatModifiers, stat_modifier};
