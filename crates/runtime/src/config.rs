//! Runtime and simulation settings read from the environment.
use std::env;
use std::path::PathBuf;

use shards_content::{FALLBACK_TEMPLATE, StatMethod};
use shards_core::{ClassKind, PlayerCommand, Race};

/// Settings shared by the registry and its workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Pending commands buffered per encounter.
    pub command_buffer_size: usize,
    /// Round cap for auto-played encounters.
    pub max_rounds: u32,
    /// Directory holding `combat.toml` / `enemies.ron`, if any.
    pub data_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            max_rounds: 100,
            data_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SHARDS_COMMAND_BUFFER` - Commands buffered per encounter (default: 32)
    /// - `SHARDS_MAX_ROUNDS` - Round cap for auto-play (default: 100)
    /// - `SHARDS_DATA_DIR` - Content directory (default: built-in content only)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(size) = read_env::<usize>("SHARDS_COMMAND_BUFFER") {
            config.command_buffer_size = size.max(1);
        }
        if let Some(rounds) = read_env::<u32>("SHARDS_MAX_ROUNDS") {
            config.max_rounds = rounds.max(1);
        }
        if let Some(dir) = read_env::<PathBuf>("SHARDS_DATA_DIR") {
            config.data_dir = Some(dir);
        }

        config
    }
}

/// Settings for the `simulate` binary.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub runtime: RuntimeConfig,
    /// Seed for character rolls and the fight. Random when unset.
    pub seed: Option<u64>,
    pub player_name: String,
    pub race: Race,
    pub class: ClassKind,
    pub stat_method: StatMethod,
    pub enemy: String,
    pub enemy_level: Option<u32>,
    /// Fixed player command. The skirmish policy plays when unset.
    pub player_command: Option<PlayerCommand>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            seed: None,
            player_name: "Test Warrior".to_string(),
            race: Race::Human,
            class: ClassKind::Warrior,
            stat_method: StatMethod::Heroic,
            enemy: FALLBACK_TEMPLATE.to_string(),
            enemy_level: None,
            player_command: None,
        }
    }
}

impl SimulationConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables (plus those of [`RuntimeConfig::from_env`]):
    /// - `SHARDS_SEED` - RNG seed
    /// - `SHARDS_PLAYER_NAME` - Character name (default: Test Warrior)
    /// - `SHARDS_RACE` / `SHARDS_CLASS` - e.g. `elf`, `sorcerer`
    /// - `SHARDS_STAT_METHOD` - `3d6`, `4d6_drop_lowest`, `heroic`
    /// - `SHARDS_ENEMY` / `SHARDS_ENEMY_LEVEL` - Template key and level override
    /// - `SHARDS_PLAYER_ACTION` - e.g. `light_attack` or `ability:Fireball`
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        config.seed = read_env("SHARDS_SEED");
        config.enemy_level = read_env("SHARDS_ENEMY_LEVEL");
        config.player_command = read_env("SHARDS_PLAYER_ACTION");

        if let Ok(name) = env::var("SHARDS_PLAYER_NAME") {
            config.player_name = name;
        }
        if let Some(race) = read_env("SHARDS_RACE") {
            config.race = race;
        }
        if let Some(class) = read_env("SHARDS_CLASS") {
            config.class = class;
        }
        if let Ok(method) = env::var("SHARDS_STAT_METHOD") {
            config.stat_method = StatMethod::from_name(&method);
        }
        if let Ok(enemy) = env::var("SHARDS_ENEMY") {
            config.enemy = enemy;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
