//! Static game content and data loaders.
//!
//! This crate houses the built-in catalogs and the tables that surround a
//! fight:
//! - Class abilities ([`AbilityRegistry`])
//! - Enemy templates ([`EnemyRegistry`])
//! - Character creation (stat rolling, racial and class tables, starting gear)
//! - Progression (experience thresholds, level-up growth, resting)
//! - RON/TOML loaders for extra templates and combat tuning
//!
//! Registries implement the shards-core oracle traits, so the combat engine
//! reads them without knowing where the data came from.

pub mod abilities;
pub mod creation;
pub mod enemies;
pub mod progression;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use abilities::{AbilityRegistry, builtin_abilities};
pub use creation::{
    CharacterSpec, CreationError, Resources, StatMethod, apply_racial_modifiers, create_character,
    point_buy, roll_stats, starting_items, starting_resources, validate_name,
};
pub use enemies::{EnemyRegistry, FALLBACK_TEMPLATE, builtin_templates};
pub use progression::{
    LevelProgress, RestKind, Restored, add_experience, add_souls, equip, experience_for_level,
    experience_to_next, rest,
};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, TemplateCatalog, TemplateLoader};
