//! Combat configuration loader.

use std::path::Path;

use shards_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`CombatConfig`] from a TOML file.
    ///
    /// Keys left out of the file keep their standard values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.hit_chance_min > config.hit_chance_max {
            anyhow::bail!(
                "hit_chance_min ({}) exceeds hit_chance_max ({})",
                config.hit_chance_min,
                config.hit_chance_max
            );
        }
        if config.reward_souls_min > config.reward_souls_max {
            anyhow::bail!(
                "reward_souls_min ({}) exceeds reward_souls_max ({})",
                config.reward_souls_min,
                config.reward_souls_max
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_standard_rules() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, CombatConfig::default());
    }

    #[test]
    fn overrides_named_keys_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
stamina_regen = 15
reward_souls_min = 10
reward_souls_max = 20

[heavy_attack_bleed]
kind = "bleed"
duration = 2
potency = 9
"#
        )
        .unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.stamina_regen, 15);
        assert_eq!((config.reward_souls_min, config.reward_souls_max), (10, 20));
        assert_eq!(config.heavy_attack_bleed.potency, 9);
        assert_eq!(config.block_factor, CombatConfig::DEFAULT_BLOCK_FACTOR);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let err = ConfigLoader::parse("hit_chance_min = 99.0\nhit_chance_max = 5.0").unwrap_err();
        assert!(err.to_string().contains("hit_chance_min"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/combat.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/combat.toml"));
    }
}
