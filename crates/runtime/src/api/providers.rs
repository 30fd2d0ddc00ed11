//! Asynchronous abstraction for sourcing the player's command each round.
//!
//! Runtime users plug in [`CommandProvider`] implementations so encounters can
//! run with human input, scripted fixtures, or simple policies.
use std::sync::Mutex;

use async_trait::async_trait;
use shards_core::enemy::skirmish_action;
use shards_core::PlayerCommand;

use super::errors::{Result, RuntimeError};
use crate::rng::SeededRng;
use crate::session::EncounterView;

/// Supplies the player's command for the next round.
#[async_trait]
pub trait CommandProvider: Send + Sync {
    async fn next_command(&self, view: &EncounterView) -> Result<PlayerCommand>;
}

/// Always returns the same command.
#[derive(Clone, Debug)]
pub struct FixedCommandProvider(pub PlayerCommand);

#[async_trait]
impl CommandProvider for FixedCommandProvider {
    async fn next_command(&self, _view: &EncounterView) -> Result<PlayerCommand> {
        Ok(self.0.clone())
    }
}

/// Plays the player with the enemy skirmish policy.
pub struct SkirmishProvider {
    rng: Mutex<SeededRng>,
}

impl SkirmishProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SeededRng::new(seed)),
        }
    }
}

#[async_trait]
impl CommandProvider for SkirmishProvider {
    async fn next_command(&self, view: &EncounterView) -> Result<PlayerCommand> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| RuntimeError::Provider("skirmish rng lock poisoned".into()))?;
        Ok(skirmish_action(view.player.pools.stamina, &mut *rng).into())
    }
}
