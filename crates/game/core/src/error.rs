//! Common error infrastructure for shards-core.
//!
//! Domain errors (`AbilityError`, `ActionError`, `EnemyError`, `CombatError`)
//! live beside the modules that raise them. They all implement [`GameError`] so
//! callers can classify failures without matching on every variant.
//!
//! Gameplay failures (cooldowns, empty resource pools, unknown action names) are
//! recoverable and surface as log entries inside a round. Only malformed data,
//! such as an unknown enemy template, should abort the caller.

use crate::combat::Side;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: gameplay outcome, the fight simply continues
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: broken content or configuration, the caller cannot proceed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry next round with the same or an alternative action.
    ///
    /// Examples: ability on cooldown, not enough mana
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown ability name, unparseable action name
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// Content or configuration is broken.
    ///
    /// Examples: enemy template missing from the registry
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error should abort the caller.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where in a fight an error was raised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Round number at the time of the error (0 before the first round).
    pub round: u32,

    /// Side that triggered the error, if any.
    pub side: Option<Side>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(round: u32) -> Self {
        Self { round, side: None }
    }

    /// Attaches a side to this context (builder pattern).
    #[must_use]
    pub const fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }
}

/// Common trait for all shards-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a stable identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
