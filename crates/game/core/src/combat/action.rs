//! Basic actions, player commands and per-action outcomes.

use std::str::FromStr;

use crate::config::CombatConfig;
use crate::error::{ErrorSeverity, GameError};

/// The five basic combat actions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackType {
    LightAttack,
    HeavyAttack,
    Dodge,
    Block,
    Parry,
}

impl AttackType {
    pub const ALL: [Self; 5] = [
        Self::LightAttack,
        Self::HeavyAttack,
        Self::Dodge,
        Self::Block,
        Self::Parry,
    ];

    /// True for the two damaging actions.
    pub const fn is_attack(&self) -> bool {
        matches!(self, Self::LightAttack | Self::HeavyAttack)
    }

    /// Parses an action name such as `light_attack`.
    pub fn parse(name: &str) -> Result<Self, ActionError> {
        Self::from_str(name.trim()).map_err(|_| ActionError::InvalidActionType(name.to_string()))
    }

    /// Menu text for this action.
    pub fn describe(&self, config: &CombatConfig) -> String {
        let cost = config.profile(*self).stamina_cost;
        match self {
            Self::LightAttack => {
                format!("Quick attack ({cost} stamina) - Fast, reliable damage")
            }
            Self::HeavyAttack => {
                format!("Powerful attack ({cost} stamina) - High damage, may cause bleed")
            }
            Self::Dodge => format!("Dodge ({cost} stamina) - Evade next attack"),
            Self::Block => format!("Block ({cost} stamina) - Reduce incoming damage by 60%"),
            Self::Parry => format!("Parry ({cost} stamina) - Counter attack if successful"),
        }
    }
}

/// What a combatant does with its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlayerCommand {
    Basic(AttackType),
    UseAbility(String),
}

impl PlayerCommand {
    pub fn ability(name: impl Into<String>) -> Self {
        Self::UseAbility(name.into())
    }

    /// Name shown in the combat log.
    pub fn label(&self) -> &str {
        match self {
            Self::Basic(action) => action.as_ref(),
            Self::UseAbility(name) => name,
        }
    }
}

impl From<AttackType> for PlayerCommand {
    fn from(action: AttackType) -> Self {
        Self::Basic(action)
    }
}

impl FromStr for PlayerCommand {
    type Err = ActionError;

    /// Accepts a basic action name, or `ability:<name>` for an ability.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().split_once(':') {
            Some((prefix, name)) if prefix.eq_ignore_ascii_case("ability") && !name.trim().is_empty() => {
                Ok(Self::UseAbility(name.trim().to_string()))
            }
            _ => AttackType::parse(input).map(Self::Basic),
        }
    }
}

/// Outcome kind of one resolved action.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionResult {
    Hit,
    Critical,
    Miss,
    Dodged,
    Parried,
    /// A stance was taken.
    Braced,
    /// Not enough stamina; nothing was spent.
    Exhausted,
    /// Turn lost to stun.
    Stunned,
    /// Ability use rejected (cooldown, resources, unknown name).
    Failed,
}

/// One row of the action menu.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOption {
    pub action: AttackType,
    pub stamina_cost: i32,
    pub can_use: bool,
    pub description: String,
}

/// Errors raised while interpreting commands.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Invalid action type: {0}")]
    InvalidActionType(String),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidActionType(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidActionType(_) => "ACTION_INVALID_TYPE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip_through_strings() {
        assert_eq!(AttackType::LightAttack.to_string(), "light_attack");
        assert_eq!(AttackType::parse("Heavy_Attack"), Ok(AttackType::HeavyAttack));
        assert_eq!(
            AttackType::parse("cartwheel"),
            Err(ActionError::InvalidActionType("cartwheel".into()))
        );
    }

    #[test]
    fn commands_parse_abilities_and_basics() {
        assert_eq!(
            "parry".parse::<PlayerCommand>(),
            Ok(PlayerCommand::Basic(AttackType::Parry))
        );
        assert_eq!(
            "ability: Fireball".parse::<PlayerCommand>(),
            Ok(PlayerCommand::ability("Fireball"))
        );
        assert!("ability:".parse::<PlayerCommand>().is_err());
        assert_eq!(PlayerCommand::ability("Fireball").label(), "Fireball");
        assert_eq!(PlayerCommand::from(AttackType::Dodge).label(), "dodge");
    }

    #[test]
    fn menu_descriptions_include_cost() {
        let config = CombatConfig::default();
        assert_eq!(
            AttackType::Block.describe(&config),
            "Block (10 stamina) - Reduce incoming damage by 60%"
        );
        assert!(AttackType::HeavyAttack.describe(&config).starts_with("Powerful attack (35"));
    }

    #[test]
    fn result_names_are_snake_case() {
        assert_eq!(ActionResult::Critical.to_string(), "critical");
        assert_eq!(ActionResult::Dodged.as_ref(), "dodged");
    }
}
