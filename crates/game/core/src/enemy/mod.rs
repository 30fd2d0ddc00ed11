//! Enemy templates, level scaling, loot and AI.
//!
//! Templates are static data supplied through [`crate::env::TemplateOracle`].
//! Everything here is a pure function of a template plus the injected RNG.
mod ai;
mod error;
mod factory;
mod loot;
mod template;

pub use ai::{AiInputs, by_behavior, choose_action, skirmish_action};
pub use error::EnemyError;
pub use factory::{ENEMY_MANA, create_enemy, level_multiplier};
pub use loot::{Loot, generate_loot};
pub use template::{
    BossPhase, EnemyBehavior, EnemyTemplate, EnemyTemplateBuilder, EnemyTier, LootDrop, LootTable,
    Resistances, StatChange,
};
