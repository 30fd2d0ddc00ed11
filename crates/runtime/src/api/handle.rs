//! Cloneable façade for issuing commands to an encounter worker.
//!
//! [`EncounterHandle`] hides channel plumbing and offers async helpers for
//! stepping one fight or playing it out with a [`CommandProvider`].
use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use shards_core::{AbilityView, ActionOption, CombatOutcome, PlayerCommand, RoundReport};

use super::errors::{Result, RuntimeError};
use super::providers::CommandProvider;
use crate::session::{EncounterView, Settlement};
use crate::workers::Command;

/// Identifier assigned by the registry when an encounter starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncounterId(pub u64);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encounter #{}", self.0)
    }
}

/// Client-facing handle to one running encounter.
#[derive(Clone)]
pub struct EncounterHandle {
    id: EncounterId,
    command_tx: mpsc::Sender<Command>,
}

impl EncounterHandle {
    pub(crate) fn new(id: EncounterId, command_tx: mpsc::Sender<Command>) -> Self {
        Self { id, command_tx }
    }

    pub fn id(&self) -> EncounterId {
        self.id
    }

    /// Resolve one round with the player's command.
    ///
    /// Rounds on the same encounter are applied in the order they arrive.
    pub async fn execute_round(&self, command: impl Into<PlayerCommand>) -> Result<RoundReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::ExecuteRound {
                command: command.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Read-only view of both combatants.
    pub async fn query(&self) -> Result<EncounterView> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Query { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Basic action menu for the player.
    pub async fn available_actions(&self) -> Result<Vec<ActionOption>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::AvailableActions { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Ability menu for the player.
    pub async fn available_abilities(&self) -> Result<Vec<AbilityView>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::AvailableAbilities { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// What the finished fight wrote back, `None` while it is still running.
    pub async fn settlement(&self) -> Result<Option<Settlement>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Settlement { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Retries writing a finished fight after a store error.
    pub async fn retry_settlement(&self) -> Result<Option<Settlement>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::RetrySettlement { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Asks `provider` for a command each round until the fight ends.
    ///
    /// Returns `None` if `max_rounds` rounds pass without a result.
    pub async fn play_out(
        &self,
        provider: &dyn CommandProvider,
        max_rounds: u32,
    ) -> Result<Option<CombatOutcome>> {
        for _ in 0..max_rounds {
            let view = self.query().await?;
            if !view.active {
                break;
            }

            let command = provider.next_command(&view).await?;
            tracing::debug!(encounter = %self.id, command = command.label(), "command chosen");

            if let Some(outcome) = self.execute_round(command).await?.outcome {
                return Ok(Some(outcome));
            }
        }

        Ok(None)
    }
}
