//! Round and fight results handed back to callers.

use super::action::ActionResult;
use crate::state::StatusEffectKind;

/// One resolved action in the combat log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLogEntry {
    pub round: u32,
    pub actor: String,
    pub target: String,
    /// Basic action name (`light_attack`) or ability name.
    pub action: String,
    pub result: ActionResult,
    pub damage: i32,
    pub stamina_cost: i32,
    pub status_applied: Option<StatusEffectKind>,
    pub description: String,
}

/// Per-round output.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundSummary {
    pub round: u32,
    /// Human-readable lines in the order they happened.
    pub actions: Vec<String>,
    pub player_status: String,
    pub enemy_status: String,
    pub combat_ended: bool,
    /// Boss phases entered this round, as log lines.
    pub phase_transitions: Vec<String>,
}

/// Final result of a fight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub player_won: bool,
    pub rounds: u32,
    pub player_health: i32,
    pub souls_gained: i32,
    pub xp_gained: u32,
    pub loot: Vec<String>,
    pub combat_log: Vec<CombatLogEntry>,
}

impl CombatOutcome {
    pub fn rewards(&self) -> (i32, u32) {
        (self.souls_gained, self.xp_gained)
    }
}

/// Result of one `execute_round` call. `outcome` is set on the round that
/// ends the fight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    pub summary: RoundSummary,
    pub outcome: Option<CombatOutcome>,
}

impl RoundReport {
    pub fn is_final(&self) -> bool {
        self.outcome.is_some()
    }
}
