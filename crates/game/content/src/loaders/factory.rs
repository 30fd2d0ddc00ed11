//! Content factory that assembles registries from a data directory.

use std::path::{Path, PathBuf};

use shards_core::CombatConfig;

use crate::enemies::EnemyRegistry;
use crate::loaders::{ConfigLoader, LoadResult, TemplateLoader};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// └── enemies.ron
/// ```
///
/// Both files are optional. A missing `combat.toml` means standard rules and a
/// missing `enemies.ron` means only the built-in templates.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "combat.toml";
    pub const TEMPLATES_FILE: &'static str = "enemies.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no combat config, using standard rules");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Built-in templates plus those in `enemies.ron`.
    ///
    /// File templates replace built-ins with the same key.
    pub fn load_enemies(&self) -> LoadResult<EnemyRegistry> {
        let mut registry = EnemyRegistry::builtin().clone();

        let path = self.data_dir.join(Self::TEMPLATES_FILE);
        if path.exists() {
            let extra = TemplateLoader::load(&path)?;
            tracing::info!(count = extra.len(), path = %path.display(), "loaded enemy templates");
            registry.extend(extra);
        }

        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
