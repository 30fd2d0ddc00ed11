//! Types downstream clients interact with.
mod errors;
mod handle;
mod providers;

pub use errors::{RepositoryError, Result, RuntimeError};
pub use handle::{EncounterHandle, EncounterId};
pub use providers::{CommandProvider, FixedCommandProvider, SkirmishProvider};
