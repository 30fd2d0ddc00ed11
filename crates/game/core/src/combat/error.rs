use crate::enemy::EnemyError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};

/// Errors raised by the combat state machine.
///
/// Gameplay failures inside a round never surface here; they become log
/// entries.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("combat already ended after round {}", context.round)]
    AlreadyEnded { context: ErrorContext },

    #[error(transparent)]
    Enemy(#[from] EnemyError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyEnded { .. } => ErrorSeverity::Validation,
            Self::Enemy(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::AlreadyEnded { context } => Some(context),
            Self::Enemy(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyEnded { .. } => "COMBAT_ALREADY_ENDED",
            Self::Enemy(err) => err.error_code(),
        }
    }
}
