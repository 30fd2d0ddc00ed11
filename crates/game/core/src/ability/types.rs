//! Static ability definitions.

use bitflags::bitflags;

use crate::combat::{DamageType, Stance};
use crate::state::{ClassKind, ResourceKind, StatKind, StatusRider};

/// Who an ability is aimed at.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetKind {
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    OnSelf,
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
    Area,
}

impl TargetKind {
    /// True when the ability lands on the opposing side.
    pub const fn is_hostile(&self) -> bool {
        matches!(self, Self::SingleEnemy | Self::AllEnemies | Self::Area)
    }
}

bitflags! {
    /// Behavior switches for an ability.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AbilityFlags: u8 {
        const CAN_CRITICAL    = 1 << 0;
        const IGNORES_DEFENSE = 1 << 1;
        const REQUIRES_WEAPON = 1 << 2;
    }
}

/// What an ability does once it fires.
///
/// Amounts are base values. [`AbilityEffect::scaled`] applies stat scaling to
/// damage and healing; status riders pass through unchanged.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    /// Damages the opponent, optionally applying a status.
    Damage {
        amount: i32,
        damage_type: DamageType,
        rider: Option<StatusRider>,
    },

    /// Heals the user, optionally applying a status to the user.
    Heal {
        amount: i32,
        rider: Option<StatusRider>,
    },

    /// Damages the opponent and heals the user.
    Drain {
        damage: i32,
        heal: i32,
        damage_type: DamageType,
    },

    /// Applies a status to the target without dealing damage.
    Status(StatusRider),

    /// Restores `amount` of another pool; the ability's cost is the input.
    ResourceConversion { into: ResourceKind, amount: i32 },

    /// Puts the user into a defensive stance for the rest of the round.
    StanceShift(Stance),

    /// Defined ability with no mechanic yet.
    Inert,
}

impl AbilityEffect {
    /// Returns the effect with damage and healing scaled.
    ///
    /// `scaled = max(0, floor(base × (1 + bonus × factor × 0.1)))`
    pub fn scaled(&self, bonus: i32, factor: f64) -> Self {
        let scale = |base: i32| -> i32 {
            let value = f64::from(base) * (1.0 + f64::from(bonus) * factor * 0.1);
            (value.floor() as i32).max(0)
        };

        match self {
            Self::Damage {
                amount,
                damage_type,
                rider,
            } => Self::Damage {
                amount: scale(*amount),
                damage_type: *damage_type,
                rider: *rider,
            },
            Self::Heal { amount, rider } => Self::Heal {
                amount: scale(*amount),
                rider: *rider,
            },
            Self::Drain {
                damage,
                heal,
                damage_type,
            } => Self::Drain {
                damage: scale(*damage),
                heal: scale(*heal),
                damage_type: *damage_type,
            },
            other => other.clone(),
        }
    }

    /// Base or scaled damage carried by the effect.
    pub fn damage(&self) -> i32 {
        match self {
            Self::Damage { amount, .. } => *amount,
            Self::Drain { damage, .. } => *damage,
            _ => 0,
        }
    }

    /// Base or scaled healing carried by the effect.
    pub fn healing(&self) -> i32 {
        match self {
            Self::Heal { amount, .. } => *amount,
            Self::Drain { heal, .. } => *heal,
            _ => 0,
        }
    }

    /// Status applied by the effect, if any.
    pub fn rider(&self) -> Option<StatusRider> {
        match self {
            Self::Damage { rider, .. } | Self::Heal { rider, .. } => *rider,
            Self::Status(rider) => Some(*rider),
            _ => None,
        }
    }
}

/// Class ability definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub name: String,
    pub description: String,
    pub class: ClassKind,
    pub resource: ResourceKind,
    pub cost: i32,
    /// Rounds before the ability can be used again.
    pub cooldown: i32,
    pub target: TargetKind,
    pub effect: AbilityEffect,
    pub scales_with: Vec<StatKind>,
    pub scaling_factor: f64,
    pub flags: AbilityFlags,
}

impl Ability {
    pub fn can_critical(&self) -> bool {
        self.flags.contains(AbilityFlags::CAN_CRITICAL)
    }

    pub fn ignores_defense(&self) -> bool {
        self.flags.contains(AbilityFlags::IGNORES_DEFENSE)
    }

    pub fn requires_weapon(&self) -> bool {
        self.flags.contains(AbilityFlags::REQUIRES_WEAPON)
    }
}
