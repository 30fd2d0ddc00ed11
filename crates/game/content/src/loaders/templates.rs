//! Enemy template catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shards_core::EnemyTemplate;

use crate::loaders::{LoadResult, read_file};

/// Template catalog structure for RON files, keyed by template identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub templates: BTreeMap<String, EnemyTemplate>,
}

/// Loader for enemy templates from RON files.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load templates from a RON file, sorted by key.
    pub fn load(path: &Path) -> LoadResult<Vec<(String, EnemyTemplate)>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<(String, EnemyTemplate)>> {
        let catalog: TemplateCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template catalog RON: {}", e))?;

        for (key, template) in &catalog.templates {
            if template.level == 0 {
                anyhow::bail!("template {} has level 0", key);
            }
            if template.base_health <= 0 {
                anyhow::bail!("template {} has no health", key);
            }
        }

        Ok(catalog.templates.into_iter().collect())
    }
}
