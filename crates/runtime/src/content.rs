//! Read-only game data shared by every encounter.

use std::path::PathBuf;

use shards_content::{AbilityRegistry, ContentFactory, EnemyRegistry};
use shards_core::{CombatConfig, CombatEnv, Narrator};

use crate::api::{Result, RuntimeError};

/// Combat tuning, the ability catalog, enemy templates and an optional
/// narrator. Built once, then shared behind an `Arc`.
pub struct GameContent {
    config: CombatConfig,
    abilities: AbilityRegistry,
    enemies: EnemyRegistry,
    narrator: Option<Box<dyn Narrator>>,
}

impl GameContent {
    /// Built-in catalogs with default tuning.
    pub fn builtin() -> Self {
        Self {
            config: CombatConfig::default(),
            abilities: AbilityRegistry::builtin().clone(),
            enemies: EnemyRegistry::builtin().clone(),
            narrator: None,
        }
    }

    /// Built-in catalogs extended by `combat.toml` and `enemies.ron` found in
    /// `data_dir`. Missing files keep the defaults.
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let factory = ContentFactory::new(data_dir);
        let config = factory.load_config().map_err(RuntimeError::Content)?;
        let enemies = factory.load_enemies().map_err(RuntimeError::Content)?;

        tracing::info!(
            data_dir = %factory.data_dir().display(),
            templates = enemies.len(),
            "game content loaded"
        );

        Ok(Self {
            config,
            abilities: AbilityRegistry::builtin().clone(),
            enemies,
            narrator: None,
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn abilities(&self) -> &AbilityRegistry {
        &self.abilities
    }

    pub fn enemies(&self) -> &EnemyRegistry {
        &self.enemies
    }

    /// Borrowed view handed to the combat engine.
    pub fn env(&self) -> CombatEnv<'_> {
        let env = CombatEnv::new(&self.config, &self.abilities);
        match &self.narrator {
            Some(narrator) => env.with_narrator(narrator.as_ref()),
            None => env,
        }
    }
}

impl Default for GameContent {
    fn default() -> Self {
        Self::builtin()
    }
}
