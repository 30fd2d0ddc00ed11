//! Runs one auto-played encounter and prints the combat log.
//!
//! Configured through the environment (see [`SimulationConfig::from_env`]);
//! a `.env` file in the working directory is read first.
use std::sync::Arc;

use anyhow::{Context, Result};
use shards_content::CharacterSpec;
use shards_runtime::{
    CommandProvider, EncounterRegistry, EncounterSpec, FixedCommandProvider, GameContent,
    InMemoryStore, SeededRng, SimulationConfig, SkirmishProvider, logging, register_character,
};

const PLAYER_ID: &str = "player";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    logging::init();

    let config = SimulationConfig::from_env();
    let seed = config.seed.unwrap_or_else(rand::random);

    let content = match &config.runtime.data_dir {
        Some(dir) => GameContent::from_data_dir(dir).context("loading content")?,
        None => GameContent::builtin(),
    };
    let store = Arc::new(InMemoryStore::new());

    let spec = CharacterSpec::new(&config.player_name, config.race, config.class)
        .with_method(config.stat_method);
    let hero = register_character(store.as_ref(), PLAYER_ID, spec, &mut SeededRng::new(seed))
        .context("creating character")?;

    println!(
        "{} the {} {} (level {}) | HP {} | STA {} | MANA {}",
        hero.name, hero.race, hero.class, hero.level, hero.max_health, hero.max_stamina, hero.max_mana
    );

    let registry = EncounterRegistry::new(Arc::new(content), store.clone())
        .with_config(config.runtime.clone());

    let mut encounter = EncounterSpec::against(PLAYER_ID, &config.enemy);
    if let Some(level) = config.enemy_level {
        encounter = encounter.at_level(level);
    }
    let handle = registry.start(encounter, Some(seed)).await?;

    let view = handle.query().await?;
    println!(
        "vs {} (level {}) | HP {} | seed {seed}\n",
        view.enemy.name, view.enemy.level, view.enemy.pools.max_health
    );

    let provider: Box<dyn CommandProvider> = match &config.player_command {
        Some(command) => Box::new(FixedCommandProvider(command.clone())),
        None => Box::new(SkirmishProvider::new(seed.wrapping_add(1))),
    };

    let Some(outcome) = handle
        .play_out(provider.as_ref(), config.runtime.max_rounds)
        .await?
    else {
        println!("No result after {} rounds.", config.runtime.max_rounds);
        registry.shutdown().await?;
        return Ok(());
    };

    for entry in &outcome.combat_log {
        println!("[round {:>2}] {}", entry.round, entry.description);
    }

    println!();
    if outcome.player_won {
        println!(
            "Victory in {} rounds: +{} souls, +{} xp, {} HP left",
            outcome.rounds, outcome.souls_gained, outcome.xp_gained, outcome.player_health
        );
        if !outcome.loot.is_empty() {
            println!("Loot: {}", outcome.loot.join(", "));
        }
        if let Some(progress) = handle.settlement().await?.and_then(|s| s.progress) {
            println!("Level {} ({} xp)", progress.level, progress.experience);
        }
    } else {
        println!("Defeat after {} rounds.", outcome.rounds);
    }

    registry.shutdown().await?;
    Ok(())
}
