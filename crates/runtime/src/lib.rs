//! Runtime orchestration for deterministic combat encounters.
//!
//! This crate wires shards-core fights to a character store, seeded
//! randomness and tokio worker tasks. Consumers start encounters through
//! [`EncounterRegistry`] and drive them with the cloneable
//! [`EncounterHandle`].
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the types downstream clients interact with
//! - [`registry`] and [`session`] run and settle fights
//! - [`repository`] provides character stores
//! - [`content`], [`rng`], [`config`] and [`logging`] cover the ambient setup
pub mod api;
pub mod characters;
pub mod config;
pub mod content;
pub mod logging;
pub mod registry;
pub mod repository;
pub mod rng;
pub mod session;

mod workers;

pub use api::{
    CommandProvider, EncounterHandle, EncounterId, FixedCommandProvider, Result, RuntimeError,
    SkirmishProvider,
};
pub use characters::{equip_item, register_character, rest_character};
pub use config::{RuntimeConfig, SimulationConfig};
pub use content::GameContent;
pub use registry::EncounterRegistry;
pub use repository::{CharacterStore, FileCharacterStore, InMemoryStore, RepositoryError};
pub use rng::SeededRng;
pub use session::{
    CombatSession, CombatantView, EncounterSpec, EncounterView, EnemySelection, Settlement,
};
