//! Encounter worker that owns one [`CombatSession`].
//!
//! Receives commands from [`EncounterHandle`](crate::EncounterHandle) and
//! applies them strictly in arrival order, so rounds on one encounter never
//! overlap while separate encounters run on separate tasks.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use shards_core::{AbilityView, ActionOption, PlayerCommand, RoundReport};

use crate::api::{EncounterId, Result};
use crate::session::{CombatSession, EncounterView, Settlement};

/// Commands that can be sent to an encounter worker.
pub enum Command {
    /// Resolve one round with the player's command.
    ExecuteRound {
        command: PlayerCommand,
        reply: oneshot::Sender<Result<RoundReport>>,
    },
    /// Snapshot both combatants (read-only).
    Query { reply: oneshot::Sender<EncounterView> },
    AvailableActions {
        reply: oneshot::Sender<Vec<ActionOption>>,
    },
    AvailableAbilities {
        reply: oneshot::Sender<Vec<AbilityView>>,
    },
    Settlement {
        reply: oneshot::Sender<Option<Settlement>>,
    },
    /// Write a settlement that failed on a store error.
    RetrySettlement {
        reply: oneshot::Sender<Result<Option<Settlement>>>,
    },
}

/// Background task that processes commands for one encounter.
pub struct EncounterWorker {
    id: EncounterId,
    session: CombatSession,
    command_rx: mpsc::Receiver<Command>,
    /// Told once, when the session is settled.
    finished_tx: Option<mpsc::UnboundedSender<EncounterId>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl EncounterWorker {
    pub fn new(
        id: EncounterId,
        session: CombatSession,
        command_rx: mpsc::Receiver<Command>,
        finished_tx: mpsc::UnboundedSender<EncounterId>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            session,
            command_rx,
            finished_tx: Some(finished_tx),
            shutdown_rx,
        }
    }

    /// Main worker loop. Ends when every handle is dropped or the registry
    /// shuts down. Commands are never interrupted half-way.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Ok(()) = self.shutdown_rx.changed() => {
                    debug!(encounter = %self.id, "shutdown requested");
                    break;
                }
            }
        }
        debug!(encounter = %self.id, "encounter worker stopped");
    }

    /// Reports a settled session to the registry, before the reply goes out.
    fn notify_if_settled(&mut self) {
        if !self.session.is_settled() {
            return;
        }
        if let Some(finished_tx) = self.finished_tx.take() {
            // The registry may already be gone.
            let _ = finished_tx.send(self.id);
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::ExecuteRound { command, reply } => {
                let result = self.session.execute_round(command);
                if let Err(err) = &result {
                    debug!(encounter = %self.id, error = %err, "round rejected");
                }
                self.notify_if_settled();
                let _ = reply.send(result);
            }
            Command::Query { reply } => {
                let _ = reply.send(self.session.view());
            }
            Command::AvailableActions { reply } => {
                let _ = reply.send(self.session.available_actions());
            }
            Command::AvailableAbilities { reply } => {
                let _ = reply.send(self.session.available_abilities());
            }
            Command::Settlement { reply } => {
                let _ = reply.send(self.session.settlement().cloned());
            }
            Command::RetrySettlement { reply } => {
                let result = self
                    .session
                    .retry_settlement()
                    .map(|settlement| settlement.cloned());
                self.notify_if_settled();
                let _ = reply.send(result);
            }
        }
    }
}
