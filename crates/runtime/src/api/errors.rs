//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from encounter workers, the character store, content
//! loading and the combat engine so callers can bubble them up with
//! consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use shards_content::CreationError;
use shards_core::CombatError;

use super::handle::EncounterId;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("character {0:?} not found")]
    CharacterNotFound(String),

    #[error("character {0:?} already exists")]
    CharacterExists(String),

    #[error("{0} not found")]
    EncounterNotFound(EncounterId),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Creation(#[from] CreationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to load game content")]
    Content(#[source] anyhow::Error),

    #[error("command provider failed: {0}")]
    Provider(String),

    #[error("encounter worker command channel closed")]
    CommandChannelClosed,

    #[error("encounter worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("encounter worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
