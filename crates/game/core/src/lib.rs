//! Deterministic combat rules shared by content, runtime and tools.
//!
//! `shards-core` defines the canonical combat model (stats, status effects,
//! abilities, enemy AI and the round engine) and exposes pure APIs. All fight
//! state mutation flows through [`combat::Combat`], and every random roll goes
//! through an injected [`env::RngOracle`] so fights replay exactly from a seed.
pub mod ability;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;

pub use ability::{
    Ability, AbilityActivation, AbilityBook, AbilityEffect, AbilityError, AbilityFlags,
    AbilityView, ActiveAbility, TargetKind,
};
pub use combat::{
    ActionError, ActionOption, ActionResult, AttackType, Combat, CombatError, CombatLogEntry,
    CombatOutcome, Combatant, DamageType, Initiative, PlayerCommand, RoundReport, RoundSummary,
    Side, Stance,
};
pub use config::{AttackProfile, CombatConfig};
pub use enemy::{
    AiInputs, BossPhase, EnemyBehavior, EnemyError, EnemyTemplate, EnemyTier, Loot, LootDrop,
    LootTable, Resistances, StatChange, choose_action, create_enemy, generate_loot,
};
pub use env::{
    AbilityOracle, CombatEnv, NarrationContext, Narrator, PcgRng, RngOracle, ScriptedRng,
    TemplateNarrator, TemplateOracle,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use state::{
    CharacterSnapshot, ClassKind, EquipmentItem, Faction, ItemKind, PrimaryStats, Race,
    ResourceKind, ResourcePools, StatKind, StatusEffectInstance, StatusEffectKind, StatusEffects,
    StatusRider,
};
pub use stats::{CombatStats, StatModifiers, stat_modifier};
