//! Character persistence.
//!
//! A fight only reads the player at the start and writes rewards at the end,
//! so the store seam is a plain synchronous trait. Implementations must be
//! shareable across encounter tasks.
mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileCharacterStore;
pub use memory::InMemoryStore;
pub use traits::CharacterStore;
