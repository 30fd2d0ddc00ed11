use crate::error::{ErrorSeverity, GameError};

/// Errors raised when building enemies.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnemyError {
    /// Indicates a content or configuration bug, not a gameplay outcome.
    #[error("Unknown enemy template: {0}")]
    UnknownTemplate(String),
}

impl GameError for EnemyError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownTemplate(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTemplate(_) => "ENEMY_UNKNOWN_TEMPLATE",
        }
    }
}
