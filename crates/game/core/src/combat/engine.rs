//! Round-by-round combat state machine.
//!
//! A [`Combat`] owns both combatants exclusively. Each call to
//! [`Combat::execute_round`] is one atomic step: given the player's command it
//! ticks status effects, lets the enemy AI pick, resolves both actions in
//! initiative order and returns the round report. The engine never blocks;
//! callers serialize rounds per instance.

use super::action::{ActionOption, AttackType, PlayerCommand};
use super::combatant::{Combatant, Side};
use super::error::CombatError;
use super::resolve::{resolve_command, stunned};
use super::result::{CombatLogEntry, CombatOutcome, RoundReport, RoundSummary};
use crate::ability::{AbilityBook, AbilityView};
use crate::config::CombatConfig;
use crate::enemy::{
    AiInputs, EnemyTemplate, choose_action, create_enemy, generate_loot, skirmish_action,
};
use crate::env::{CombatEnv, RngOracle, TemplateOracle};
use crate::error::ErrorContext;
use crate::state::CharacterSnapshot;

/// Initiative rolled once at combat start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Initiative {
    pub player: i32,
    pub enemy: i32,
}

impl Initiative {
    /// Ties go to the player.
    pub const fn player_first(&self) -> bool {
        self.player >= self.enemy
    }
}

/// One fight between a player and an enemy.
#[derive(Clone, Debug)]
pub struct Combat {
    player: Combatant,
    enemy: Combatant,
    round: u32,
    initiative: Initiative,
    log: Vec<CombatLogEntry>,
    outcome: Option<CombatOutcome>,
}

impl Combat {
    /// Starts a fight against an enemy without a template. The enemy uses the
    /// generic skirmish policy and drops no loot.
    pub fn new(
        player: CharacterSnapshot,
        enemy: CharacterSnapshot,
        env: &CombatEnv<'_>,
        rng: &mut (impl RngOracle + ?Sized),
    ) -> Self {
        let player = Self::player_combatant(player, env);
        let enemy = Combatant::new(Side::Enemy, enemy, AbilityBook::default());
        Self::start(player, enemy, rng)
    }

    /// Starts a fight against a level-scaled enemy built from `template`.
    pub fn with_template(
        player: CharacterSnapshot,
        template: &EnemyTemplate,
        level_override: Option<u32>,
        env: &CombatEnv<'_>,
        rng: &mut (impl RngOracle + ?Sized),
    ) -> Self {
        let player = Self::player_combatant(player, env);
        let enemy = Combatant::new(
            Side::Enemy,
            create_enemy(template, level_override),
            AbilityBook::default(),
        )
        .with_template(template.clone());
        Self::start(player, enemy, rng)
    }

    /// Like [`Self::with_template`], looking the template up by key.
    ///
    /// An unknown key is a content bug and the only construction failure.
    pub fn from_oracle(
        player: CharacterSnapshot,
        templates: &dyn TemplateOracle,
        key: &str,
        level_override: Option<u32>,
        env: &CombatEnv<'_>,
        rng: &mut (impl RngOracle + ?Sized),
    ) -> Result<Self, CombatError> {
        let template = templates.require(key)?;
        Ok(Self::with_template(
            player,
            template,
            level_override,
            env,
            rng,
        ))
    }

    fn player_combatant(player: CharacterSnapshot, env: &CombatEnv<'_>) -> Combatant {
        let book = AbilityBook::for_class(player.class, env.abilities());
        Combatant::new(Side::Player, player, book)
    }

    fn start(player: Combatant, enemy: Combatant, rng: &mut (impl RngOracle + ?Sized)) -> Self {
        let initiative = Initiative {
            player: player.stats().initiative + rng.range(1, 20),
            enemy: enemy.stats().initiative + rng.range(1, 20),
        };

        tracing::info!(
            player = player.name(),
            enemy = enemy.name(),
            player_initiative = initiative.player,
            enemy_initiative = initiative.enemy,
            first = if initiative.player_first() { "player" } else { "enemy" },
            "combat started"
        );

        Self {
            player,
            enemy,
            round: 0,
            initiative,
            log: Vec::new(),
            outcome: None,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn initiative(&self) -> Initiative {
        self.initiative
    }

    pub fn is_active(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<&CombatOutcome> {
        self.outcome.as_ref()
    }

    pub fn log(&self) -> &[CombatLogEntry] {
        &self.log
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemy(&self) -> &Combatant {
        &self.enemy
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Acting combatant first, its opponent second.
    fn pair_mut(&mut self, side: Side) -> (&mut Combatant, &mut Combatant) {
        match side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        }
    }

    /// Every basic action with its cost and whether `side` can afford it.
    pub fn available_actions(&self, side: Side, config: &CombatConfig) -> Vec<ActionOption> {
        let stamina = self.combatant(side).stamina();
        AttackType::ALL
            .iter()
            .map(|action| {
                let stamina_cost = config.profile(*action).stamina_cost;
                ActionOption {
                    action: *action,
                    stamina_cost,
                    can_use: stamina >= stamina_cost,
                    description: action.describe(config),
                }
            })
            .collect()
    }

    pub fn available_abilities(&self, side: Side) -> Vec<AbilityView> {
        self.combatant(side).available_abilities()
    }

    /// Runs one round with the player's command.
    ///
    /// Returns [`CombatError::AlreadyEnded`] once the fight is over. Every
    /// other failure (exhaustion, cooldowns, missing resources) is reported as
    /// a log entry and the round still completes.
    pub fn execute_round(
        &mut self,
        command: impl Into<PlayerCommand>,
        env: &CombatEnv<'_>,
        rng: &mut (impl RngOracle + ?Sized),
    ) -> Result<RoundReport, CombatError> {
        if self.outcome.is_some() {
            return Err(CombatError::AlreadyEnded {
                context: ErrorContext::new(self.round),
            });
        }

        let command = command.into();
        self.round += 1;
        let round = self.round;
        tracing::info!(round, "round started");

        let mut lines = self.tick_status_effects();
        if !self.player.is_alive() || !self.enemy.is_alive() {
            tracing::info!(round, "combatant fell to status effects");
            return Ok(self.conclude(lines, Vec::new(), env, rng));
        }

        let enemy_command = PlayerCommand::Basic(self.enemy_action(rng));
        let order = if self.initiative.player_first() {
            [(Side::Player, &command), (Side::Enemy, &enemy_command)]
        } else {
            [(Side::Enemy, &enemy_command), (Side::Player, &command)]
        };

        for (side, command) in order {
            if !self.player.is_alive() || !self.enemy.is_alive() {
                break;
            }

            let (attacker, defender) = self.pair_mut(side);
            let entry = if attacker.is_stunned() {
                stunned(round, attacker, defender, command.label())
            } else {
                resolve_command(round, attacker, defender, command, env, rng)
            };

            tracing::debug!(
                round,
                actor = %entry.actor,
                action = %entry.action,
                result = %entry.result,
                damage = entry.damage,
                "action resolved"
            );
            lines.push(entry.description.clone());
            self.log.push(entry);
        }

        let phases = self.enter_boss_phases();
        lines.extend(phases.iter().cloned());

        let regen = env.config().stamina_regen;
        for combatant in [&mut self.player, &mut self.enemy] {
            combatant.restore_stamina(regen);
            combatant.tick_cooldowns();
            combatant.reset_stance();
        }

        if !self.player.is_alive() || !self.enemy.is_alive() {
            return Ok(self.conclude(lines, phases, env, rng));
        }

        Ok(RoundReport {
            summary: self.summary(lines, phases, false),
            outcome: None,
        })
    }

    fn tick_status_effects(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for combatant in [&mut self.player, &mut self.enemy] {
            for (kind, amount) in combatant.process_status_effects() {
                let line = if amount < 0 {
                    format!("{} recovers {} from {}", combatant.name(), -amount, kind)
                } else {
                    format!("{} takes {} from {}", combatant.name(), amount, kind)
                };
                tracing::debug!(name = combatant.name(), %kind, amount, "status effect ticked");
                lines.push(line);
            }
        }
        lines
    }

    fn enemy_action(&mut self, rng: &mut (impl RngOracle + ?Sized)) -> AttackType {
        let stamina = self.enemy.stamina();
        match self.enemy.template() {
            Some(template) => {
                let inputs = AiInputs {
                    own_health: self.enemy.health_fraction(),
                    stamina,
                    opponent_health: self.player.health_fraction(),
                };
                choose_action(template, inputs, rng)
            }
            None => skirmish_action(stamina, rng),
        }
    }

    fn enter_boss_phases(&mut self) -> Vec<String> {
        if !self.enemy.is_alive() {
            return Vec::new();
        }

        let entered = self.enemy.enter_boss_phases();
        let Some(template) = self.enemy.template() else {
            return Vec::new();
        };

        entered
            .into_iter()
            .map(|number| {
                let phase = &template.boss_phases[number - 1];
                tracing::info!(
                    enemy = self.enemy.name(),
                    phase = number,
                    threshold = phase.hp_threshold,
                    "boss phase entered"
                );
                let mut line = format!("{} enters phase {}!", self.enemy.name(), number);
                if !phase.abilities_unlocked.is_empty() {
                    line.push_str(&format!(
                        " Unlocked: {}.",
                        phase.abilities_unlocked.join(", ")
                    ));
                }
                line
            })
            .collect()
    }

    fn summary(&self, actions: Vec<String>, phases: Vec<String>, ended: bool) -> RoundSummary {
        RoundSummary {
            round: self.round,
            actions,
            player_status: self.player.status_summary(),
            enemy_status: self.enemy.status_summary(),
            combat_ended: ended,
            phase_transitions: phases,
        }
    }

    /// Ends the fight and computes rewards. Only a living player wins.
    fn conclude(
        &mut self,
        lines: Vec<String>,
        phases: Vec<String>,
        env: &CombatEnv<'_>,
        rng: &mut (impl RngOracle + ?Sized),
    ) -> RoundReport {
        let player_won = self.player.is_alive();

        let (souls_gained, xp_gained, loot) = if player_won {
            let config = env.config();
            let level = self.enemy.character().level;
            let souls = rng
                .range(config.reward_souls_min, config.reward_souls_max)
                .saturating_mul(i32::try_from(level).unwrap_or(i32::MAX));
            let xp = config.reward_xp_per_level.saturating_mul(level);
            let loot = self
                .enemy
                .template()
                .map(|template| generate_loot(template, rng).items)
                .unwrap_or_default();
            (souls, xp, loot)
        } else {
            (0, 0, Vec::new())
        };

        let outcome = CombatOutcome {
            player_won,
            rounds: self.round,
            player_health: self.player.health(),
            souls_gained,
            xp_gained,
            loot,
            combat_log: self.log.clone(),
        };

        tracing::info!(
            player_won,
            rounds = self.round,
            souls = souls_gained,
            xp = xp_gained,
            "combat ended"
        );

        self.outcome = Some(outcome.clone());
        RoundReport {
            summary: self.summary(lines, phases, true),
            outcome: Some(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{Ability, AbilityEffect, AbilityFlags, TargetKind};
    use crate::combat::{ActionResult, DamageType};
    use crate::enemy::{BossPhase, LootTable};
    use crate::env::ScriptedRng;
    use crate::state::{ClassKind, PrimaryStats, ResourceKind, StatKind, StatusEffectKind, StatusRider};

    fn snapshot(name: &str, stats: PrimaryStats, health: i32) -> CharacterSnapshot {
        CharacterSnapshot {
            name: name.into(),
            is_player: true,
            level: 1,
            stats,
            health,
            max_health: 100,
            stamina: 100,
            max_stamina: 100,
            mana: 50,
            max_mana: 50,
            ..CharacterSnapshot::default()
        }
    }

    fn hero() -> CharacterSnapshot {
        snapshot("Aria", PrimaryStats::default(), 100)
    }

    struct Fixture {
        config: CombatConfig,
        abilities: Vec<Ability>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                config: CombatConfig::default(),
                abilities: Vec::new(),
            }
        }

        fn env(&self) -> CombatEnv<'_> {
            CombatEnv::new(&self.config, &self.abilities)
        }
    }

    #[test]
    fn initiative_ties_favor_player() {
        let fixture = Fixture::new();
        let mut rng = ScriptedRng::constant(0.0);
        let combat = Combat::new(hero(), snapshot("Soldier", PrimaryStats::default(), 50), &fixture.env(), &mut rng);
        assert_eq!(combat.initiative(), Initiative { player: 11, enemy: 11 });
        assert!(combat.initiative().player_first());
        assert_eq!(combat.round(), 0);
        assert!(combat.is_active());
    }

    #[test]
    fn status_death_skips_actions() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut rng = ScriptedRng::constant(0.0);
        let mut combat = Combat::new(
            snapshot("Aria", PrimaryStats::default(), 3),
            snapshot("Soldier", PrimaryStats::default(), 50),
            &env,
            &mut rng,
        );
        combat
            .combatant_mut(Side::Player)
            .add_status_effect(StatusRider::new(StatusEffectKind::Poison, 3, 5).instance("Soldier"));

        let report = combat
            .execute_round(AttackType::LightAttack, &env, &mut rng)
            .unwrap();
        assert_eq!(report.summary.actions, vec!["Aria takes 5 from poison"]);
        assert!(report.summary.combat_ended);
        assert!(combat.log().is_empty());

        let outcome = report.outcome.unwrap();
        assert!(!outcome.player_won);
        assert_eq!(outcome.rewards(), (0, 0));
        assert_eq!(outcome.player_health, 0);
    }

    #[test]
    fn victory_rewards_scale_with_enemy_level() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut rng = ScriptedRng::constant(0.0);
        let mut enemy = snapshot("Soldier", PrimaryStats::default(), 1);
        enemy.level = 3;
        let mut combat = Combat::new(hero(), enemy, &env, &mut rng);

        let report = combat
            .execute_round(AttackType::LightAttack, &env, &mut rng)
            .unwrap();
        let outcome = report.outcome.expect("enemy should fall in one hit");
        assert!(outcome.player_won);
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.souls_gained, 150);
        assert_eq!(outcome.xp_gained, 300);
        assert!(outcome.loot.is_empty());
        // The enemy never acted.
        assert_eq!(outcome.combat_log.len(), 1);
        assert_eq!(outcome.combat_log[0].result, ActionResult::Critical);
    }

    #[test]
    fn ended_combat_rejects_rounds() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut rng = ScriptedRng::constant(0.0);
        let mut combat = Combat::new(hero(), snapshot("Soldier", PrimaryStats::default(), 1), &env, &mut rng);
        combat
            .execute_round(AttackType::LightAttack, &env, &mut rng)
            .unwrap();

        let err = combat
            .execute_round(AttackType::Block, &env, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            CombatError::AlreadyEnded {
                context: ErrorContext::new(1)
            }
        );
    }

    #[test]
    fn templated_victory_rolls_loot() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let template = EnemyTemplate::builder("Rat")
            .pools(1, 50)
            .loot(LootTable::new((5, 5)).with_guaranteed("Rat Tail"))
            .build();
        let mut rng = ScriptedRng::constant(0.0);
        let mut combat = Combat::with_template(hero(), &template, None, &env, &mut rng);
        assert_eq!(combat.enemy().name(), "Rat (Lv1)");

        let report = combat
            .execute_round(AttackType::LightAttack, &env, &mut rng)
            .unwrap();
        let outcome = report.outcome.unwrap();
        assert!(outcome.player_won);
        assert_eq!(outcome.loot, vec!["Rat Tail"]);
    }

    #[test]
    fn stunned_enemy_loses_its_turn() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut rng = ScriptedRng::constant(0.0);
        let mut combat = Combat::new(hero(), snapshot("Soldier", PrimaryStats::default(), 50), &env, &mut rng);
        combat
            .combatant_mut(Side::Enemy)
            .add_status_effect(StatusRider::new(StatusEffectKind::Stun, 2, 0).instance("Aria"));

        let report = combat.execute_round(AttackType::Block, &env, &mut rng).unwrap();
        assert!(report.outcome.is_none());
        let last = combat.log().last().unwrap();
        assert_eq!(last.result, ActionResult::Stunned);
        assert_eq!(last.actor, "Soldier");
        assert_eq!(combat.enemy().stamina(), 100);
        // 100 - 10 block + 10 regen
        assert_eq!(combat.player().stamina(), 100);
    }

    #[test]
    fn boss_phase_reported_once() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let template = EnemyTemplate::builder("Hollow King")
            .pools(10, 50)
            .phase(BossPhase::at(0.5).unlocks("Soul Storm"))
            .build();
        // initiative 11 vs 11, enemy AI rolls dodge, player hits for 5
        let mut rng = ScriptedRng::constant(0.5);
        let mut combat = Combat::with_template(hero(), &template, None, &env, &mut rng);

        let report = combat
            .execute_round(AttackType::LightAttack, &env, &mut rng)
            .unwrap();
        assert_eq!(combat.enemy().health(), 5);
        assert_eq!(
            report.summary.phase_transitions,
            vec!["Hollow King (Lv1) enters phase 1! Unlocked: Soul Storm."]
        );
        assert_eq!(combat.enemy().unlocked_abilities(), ["Soul Storm"]);

        let report = combat.execute_round(AttackType::Block, &env, &mut rng).unwrap();
        assert!(report.summary.phase_transitions.is_empty());
    }

    #[test]
    fn action_menu_reports_affordability() {
        let fixture = Fixture::new();
        let env = fixture.env();
        let mut rng = ScriptedRng::constant(0.0);
        let mut player = hero();
        player.stamina = 20;
        let combat = Combat::new(player, snapshot("Soldier", PrimaryStats::default(), 50), &env, &mut rng);

        let menu = combat.available_actions(Side::Player, &fixture.config);
        let usable: Vec<(AttackType, bool)> = menu.iter().map(|o| (o.action, o.can_use)).collect();
        assert_eq!(
            usable,
            vec![
                (AttackType::LightAttack, true),
                (AttackType::HeavyAttack, false),
                (AttackType::Dodge, true),
                (AttackType::Block, true),
                (AttackType::Parry, false),
            ]
        );
        assert!(combat.available_abilities(Side::Player).is_empty());
    }

    #[test]
    fn cooldown_one_blocks_the_next_round() {
        let mut fixture = Fixture::new();
        fixture.abilities.push(Ability {
            name: "Fireball".into(),
            description: "Launch a ball of fire at your enemy".into(),
            class: ClassKind::Sorcerer,
            resource: ResourceKind::Mana,
            cost: 30,
            cooldown: 1,
            target: TargetKind::SingleEnemy,
            effect: AbilityEffect::Damage {
                amount: 10,
                damage_type: DamageType::Fire,
                rider: None,
            },
            scales_with: vec![StatKind::Intelligence],
            scaling_factor: 2.0,
            flags: AbilityFlags::IGNORES_DEFENSE,
        });
        let env = fixture.env();

        let mut sorcerer = hero();
        sorcerer.class = ClassKind::Sorcerer;
        sorcerer.mana = 100;
        sorcerer.max_mana = 100;
        let mut rng = ScriptedRng::constant(0.5);
        let mut combat = Combat::new(sorcerer, snapshot("Soldier", PrimaryStats::default(), 100), &env, &mut rng);

        for _ in 0..3 {
            combat
                .execute_round(PlayerCommand::ability("Fireball"), &env, &mut rng)
                .unwrap();
        }

        let casts: Vec<(u32, ActionResult)> = combat
            .log()
            .iter()
            .filter(|entry| entry.action == "Fireball")
            .map(|entry| (entry.round, entry.result))
            .collect();
        assert_eq!(
            casts,
            vec![
                (1, ActionResult::Hit),
                (2, ActionResult::Failed),
                (3, ActionResult::Hit),
            ]
        );
        let failed = combat.log().iter().find(|e| e.result == ActionResult::Failed).unwrap();
        assert_eq!(failed.description, "Fireball is on cooldown (1 rounds)");
        // two casts at 30 mana each
        assert_eq!(combat.player().pools().mana, 40);
    }
}
