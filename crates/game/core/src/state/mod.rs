//! Plain data carried into and through a fight.
//!
//! [`CharacterSnapshot`] is the persisted record a combatant is built from.
//! [`ResourcePools`] and [`StatusEffects`] are the live, combat-scoped state
//! that mutates round by round.
mod character;
mod resources;
mod status;

pub use character::{
    CharacterSnapshot, ClassKind, EquipmentItem, Faction, ItemKind, PrimaryStats, Race, StatKind,
};
pub use resources::{ResourceKind, ResourcePools};
pub use status::{
    ModifierTarget, StatusEffectInstance, StatusEffectKind, StatusEffects, StatusRider, TickEffect,
};
