//! Traits describing read-only combat data.
//!
//! Oracles expose the ability catalog and enemy templates. The [`CombatEnv`]
//! aggregate bundles them with the combat configuration and optional narrator
//! so the engine can resolve a round without knowing where the data lives.
//! Tables are built once and only read afterwards, so one env may be shared
//! by any number of concurrent fights.
mod narrator;
mod rng;

pub use narrator::{NarrationContext, Narrator, TemplateNarrator, narrate};
pub use rng::{PcgRng, RngOracle, ScriptedRng};

use crate::ability::Ability;
use crate::config::CombatConfig;
use crate::enemy::{EnemyError, EnemyTemplate, create_enemy};
use crate::state::{CharacterSnapshot, ClassKind};

/// Static ability definitions grouped by class.
pub trait AbilityOracle: Send + Sync {
    /// Abilities bound to `class`, in catalog order.
    fn abilities_for(&self, class: ClassKind) -> Vec<&Ability>;

    /// Find an ability by name across all classes.
    fn ability(&self, name: &str) -> Option<&Ability> {
        ClassKind::ALL
            .iter()
            .flat_map(|class| self.abilities_for(*class))
            .find(|ability| ability.name == name)
    }
}

impl AbilityOracle for Vec<Ability> {
    fn abilities_for(&self, class: ClassKind) -> Vec<&Ability> {
        self.iter().filter(|a| a.class == class).collect()
    }
}

/// Static enemy templates keyed by identifier (e.g. `hollow_soldier`).
pub trait TemplateOracle: Send + Sync {
    fn template(&self, key: &str) -> Option<&EnemyTemplate>;

    /// Like [`Self::template`], but an unknown key is an error.
    fn require(&self, key: &str) -> Result<&EnemyTemplate, EnemyError> {
        self.template(key)
            .ok_or_else(|| EnemyError::UnknownTemplate(key.to_string()))
    }

    /// Builds a level-scaled enemy from the named template.
    fn create_enemy(
        &self,
        key: &str,
        level_override: Option<u32>,
    ) -> Result<CharacterSnapshot, EnemyError> {
        Ok(create_enemy(self.require(key)?, level_override))
    }
}

/// Aggregates read-only data required by the combat engine.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    config: &'a CombatConfig,
    abilities: &'a dyn AbilityOracle,
    narrator: Option<&'a dyn Narrator>,
}

impl<'a> CombatEnv<'a> {
    pub fn new(config: &'a CombatConfig, abilities: &'a dyn AbilityOracle) -> Self {
        Self {
            config,
            abilities,
            narrator: None,
        }
    }

    #[must_use]
    pub fn with_narrator(mut self, narrator: &'a dyn Narrator) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    pub fn abilities(&self) -> &'a dyn AbilityOracle {
        self.abilities
    }

    pub fn narrator(&self) -> Option<&'a dyn Narrator> {
        self.narrator
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("config", self.config)
            .field("narrator", &self.narrator.is_some())
            .finish()
    }
}
