use crate::error::{ErrorSeverity, GameError};
use crate::state::ResourceKind;

/// Errors raised when activating an ability.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("{name} is on cooldown ({remaining} rounds)")]
    OnCooldown { name: String, remaining: i32 },

    #[error("Not enough {resource} for {name}")]
    InsufficientResource { name: String, resource: ResourceKind },

    #[error("{name} requires an equipped weapon")]
    WeaponRequired { name: String },
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownAbility(_) => ErrorSeverity::Validation,
            Self::OnCooldown { .. }
            | Self::InsufficientResource { .. }
            | Self::WeaponRequired { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAbility(_) => "ABILITY_UNKNOWN",
            Self::OnCooldown { .. } => "ABILITY_ON_COOLDOWN",
            Self::InsufficientResource { .. } => "ABILITY_INSUFFICIENT_RESOURCE",
            Self::WeaponRequired { .. } => "ABILITY_WEAPON_REQUIRED",
        }
    }
}
