//! One player's fight against one enemy, with rewards written back to the
//! character store when it ends.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use shards_content::{LevelProgress, add_experience, add_souls};
use shards_core::{
    AbilityView, ActionOption, Combat, CombatOutcome, Combatant, EnemyTier, EquipmentItem,
    ItemKind, PlayerCommand, ResourcePools, RngOracle, RoundReport, Side, Stance,
};

use crate::api::{Result, RuntimeError};
use crate::content::GameContent;
use crate::repository::CharacterStore;

/// How the enemy is picked when an encounter starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemySelection {
    /// A template by key (`hollow_soldier`).
    Template(String),
    /// Any template whose level window fits the player.
    Random { tier: Option<EnemyTier> },
}

/// Parameters for starting an encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub player_id: String,
    pub enemy: EnemySelection,
    /// Overrides the template's level.
    pub enemy_level: Option<u32>,
}

impl EncounterSpec {
    pub fn against(player_id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            enemy: EnemySelection::Template(template.into()),
            enemy_level: None,
        }
    }

    pub fn random(player_id: impl Into<String>, tier: Option<EnemyTier>) -> Self {
        Self {
            player_id: player_id.into(),
            enemy: EnemySelection::Random { tier },
            enemy_level: None,
        }
    }

    #[must_use]
    pub fn at_level(mut self, level: u32) -> Self {
        self.enemy_level = Some(level);
        self
    }
}

/// Live state of one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantView {
    pub name: String,
    pub level: u32,
    pub pools: ResourcePools,
    pub stance: Stance,
    pub status: String,
}

impl CombatantView {
    fn of(combatant: &Combatant) -> Self {
        Self {
            name: combatant.name().to_string(),
            level: combatant.character().level,
            pools: *combatant.pools(),
            stance: combatant.stance(),
            status: combatant.status_summary(),
        }
    }
}

/// Read-only snapshot of an encounter between rounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterView {
    pub round: u32,
    pub active: bool,
    pub player: CombatantView,
    pub enemy: CombatantView,
}

/// What a finished fight changed on the stored character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub player_won: bool,
    pub souls: i32,
    pub health: i32,
    /// Set only on victory.
    pub progress: Option<LevelProgress>,
    pub loot: Vec<String>,
}

/// Drives one [`Combat`] and settles its outcome against the store.
///
/// Victory adds souls, experience (with level-ups), the net health change and
/// any loot to the stored player. Defeat writes nothing. A settlement that
/// fails on a store error stays pending until [`Self::retry_settlement`]
/// succeeds.
pub struct CombatSession {
    player_id: String,
    combat: Combat,
    starting_health: i32,
    content: Arc<GameContent>,
    store: Arc<dyn CharacterStore>,
    rng: Box<dyn RngOracle>,
    settlement: Option<Settlement>,
    pending: Option<CombatOutcome>,
}

impl CombatSession {
    pub fn start(
        spec: EncounterSpec,
        content: Arc<GameContent>,
        store: Arc<dyn CharacterStore>,
        mut rng: Box<dyn RngOracle>,
    ) -> Result<Self> {
        let player = store
            .load(&spec.player_id)?
            .ok_or_else(|| RuntimeError::CharacterNotFound(spec.player_id.clone()))?;

        let key = match &spec.enemy {
            EnemySelection::Template(key) => key.clone(),
            EnemySelection::Random { tier } => content
                .enemies()
                .random_for_level(player.level, *tier, rng.as_mut())
                .to_string(),
        };

        let starting_health = player.health;
        let combat = Combat::from_oracle(
            player,
            content.enemies(),
            &key,
            spec.enemy_level,
            &content.env(),
            rng.as_mut(),
        )?;

        info!(
            player = %spec.player_id,
            enemy = %key,
            level = combat.enemy().character().level,
            "encounter started"
        );

        Ok(Self {
            player_id: spec.player_id,
            combat,
            starting_health,
            content,
            store,
            rng,
            settlement: None,
            pending: None,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn combat(&self) -> &Combat {
        &self.combat
    }

    pub fn is_finished(&self) -> bool {
        !self.combat.is_active()
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// True once the fight is over and its result has been written.
    pub fn is_settled(&self) -> bool {
        self.settlement.is_some()
    }

    pub fn view(&self) -> EncounterView {
        EncounterView {
            round: self.combat.round(),
            active: self.combat.is_active(),
            player: CombatantView::of(self.combat.player()),
            enemy: CombatantView::of(self.combat.enemy()),
        }
    }

    pub fn available_actions(&self) -> Vec<ActionOption> {
        self.combat
            .available_actions(Side::Player, self.content.config())
    }

    pub fn available_abilities(&self) -> Vec<AbilityView> {
        self.combat.available_abilities(Side::Player)
    }

    /// Resolves one round. The round that ends the fight also settles it.
    ///
    /// A pending settlement is retried first; the round after the end still
    /// fails with [`shards_core::CombatError::AlreadyEnded`].
    pub fn execute_round(&mut self, command: impl Into<PlayerCommand>) -> Result<RoundReport> {
        if self.pending.is_some() {
            self.retry_settlement()?;
        }

        let env = self.content.env();
        let report = self.combat.execute_round(command, &env, self.rng.as_mut())?;

        if let Some(outcome) = &report.outcome {
            self.pending = Some(outcome.clone());
            self.retry_settlement()?;
        }
        Ok(report)
    }

    /// Writes a finished fight whose settlement has not gone through yet.
    ///
    /// Returns the settlement once written, `None` while the fight is still
    /// running.
    pub fn retry_settlement(&mut self) -> Result<Option<&Settlement>> {
        if let Some(outcome) = self.pending.take() {
            if let Err(err) = self.settle(&outcome) {
                tracing::warn!(player = %self.player_id, error = %err, "settlement failed");
                self.pending = Some(outcome);
                return Err(err);
            }
        }
        Ok(self.settlement.as_ref())
    }

    fn settle(&mut self, outcome: &CombatOutcome) -> Result<()> {
        if !outcome.player_won {
            info!(player = %self.player_id, rounds = outcome.rounds, "player defeated");
            self.settlement = Some(Settlement {
                player_won: false,
                souls: 0,
                health: outcome.player_health,
                progress: None,
                loot: Vec::new(),
            });
            return Ok(());
        }

        let mut player = self
            .store
            .load(&self.player_id)?
            .ok_or_else(|| RuntimeError::CharacterNotFound(self.player_id.clone()))?;

        let souls = add_souls(&mut player, outcome.souls_gained);
        let progress = add_experience(&mut player, outcome.xp_gained);

        let delta = outcome.player_health - self.starting_health;
        let health = if progress.leveled_up {
            // A level-up refills health, so carry over only the damage taken.
            player.health + delta.min(0)
        } else {
            player.health + delta
        };
        player.health = health.clamp(0, player.max_health);

        for name in &outcome.loot {
            match player
                .inventory
                .iter_mut()
                .find(|item| item.name == *name && item.kind == ItemKind::Misc)
            {
                Some(item) => item.quantity += 1,
                None => player
                    .inventory
                    .push(EquipmentItem::new(name.clone(), ItemKind::Misc)),
            }
        }

        self.store.save(&self.player_id, &player)?;

        info!(
            player = %self.player_id,
            rounds = outcome.rounds,
            souls_gained = outcome.souls_gained,
            xp_gained = outcome.xp_gained,
            level = progress.level,
            "victory settled"
        );

        self.settlement = Some(Settlement {
            player_won: true,
            souls,
            health: player.health,
            progress: Some(progress),
            loot: outcome.loot.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::repository::{self, InMemoryStore, RepositoryError};
    use crate::rng::SeededRng;
    use shards_content::{CharacterSpec, create_character};
    use shards_core::{AttackType, ClassKind, CombatError, PrimaryStats, Race, ScriptedRng};

    fn fixture() -> (Arc<InMemoryStore>, Arc<GameContent>) {
        let spec = CharacterSpec::new("Test Warrior", Race::Human, ClassKind::Warrior)
            .with_stats(PrimaryStats::uniform(10));
        let hero = create_character(spec, |_| false, &mut ScriptedRng::constant(0.0)).unwrap();
        let store = Arc::new(InMemoryStore::with_character("hero", hero));
        (store, Arc::new(GameContent::builtin()))
    }

    /// Store whose saves can be switched to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryStore,
        fail_saves: AtomicBool,
    }

    impl CharacterStore for FlakyStore {
        fn save(&self, id: &str, character: &shards_core::CharacterSnapshot) -> repository::Result<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(RepositoryError::Io(std::io::Error::other("disk full")));
            }
            self.inner.save(id, character)
        }

        fn load(&self, id: &str) -> repository::Result<Option<shards_core::CharacterSnapshot>> {
            self.inner.load(id)
        }

        fn exists(&self, id: &str) -> bool {
            self.inner.exists(id)
        }

        fn delete(&self, id: &str) -> repository::Result<()> {
            self.inner.delete(id)
        }

        fn list_ids(&self) -> repository::Result<Vec<String>> {
            self.inner.list_ids()
        }
    }

    fn won(player_health: i32, xp_gained: u32) -> CombatOutcome {
        CombatOutcome {
            player_won: true,
            rounds: 4,
            player_health,
            souls_gained: 60,
            xp_gained,
            loot: vec!["Hollow Soldier Shard".into()],
            combat_log: Vec::new(),
        }
    }

    fn session_for(store: Arc<dyn CharacterStore>, content: Arc<GameContent>) -> CombatSession {
        CombatSession::start(
            EncounterSpec::against("hero", "hollow_soldier"),
            content,
            store,
            Box::new(ScriptedRng::constant(0.5)),
        )
        .unwrap()
    }

    #[test]
    fn healing_during_the_fight_is_kept() {
        let (store, content) = fixture();
        let mut hero = store.load("hero").unwrap().unwrap();
        hero.level = 3;
        hero.experience = 300;
        hero.health = 20;
        store.save("hero", &hero).unwrap();

        let mut session = session_for(store.clone(), content);
        session.settle(&won(100, 100)).unwrap();

        let stored = store.load("hero").unwrap().unwrap();
        assert_eq!(stored.level, 3);
        assert_eq!(stored.experience, 400);
        assert_eq!(stored.health, 100);
        assert_eq!(session.settlement().unwrap().health, 100);
        assert_eq!(stored.souls, hero.souls + 60);
    }

    #[test]
    fn level_up_keeps_only_the_damage_taken() {
        let (store, content) = fixture();
        let hero = store.load("hero").unwrap().unwrap();

        let mut session = session_for(store.clone(), content);
        session.settle(&won(hero.health - 30, 100)).unwrap();

        let stored = store.load("hero").unwrap().unwrap();
        assert_eq!(stored.level, 2);
        assert!(stored.max_health > hero.max_health);
        assert_eq!(stored.health, stored.max_health - 30);
        let shard = stored
            .inventory
            .iter()
            .find(|item| item.name == "Hollow Soldier Shard")
            .unwrap();
        assert_eq!((shard.kind, shard.quantity), (ItemKind::Misc, 1));
    }

    #[test]
    fn failed_write_is_retried() {
        let content = Arc::new(GameContent::builtin());
        let store = Arc::new(FlakyStore::default());
        let spec = CharacterSpec::new("Aldric", Race::Human, ClassKind::Warrior)
            .with_stats(PrimaryStats::uniform(30));
        let hero = create_character(spec, |_| false, &mut ScriptedRng::constant(0.0)).unwrap();
        store.save("hero", &hero).unwrap();
        store.fail_saves.store(true, Ordering::SeqCst);

        let mut session = CombatSession::start(
            EncounterSpec::against("hero", "hollow_soldier"),
            content,
            store.clone(),
            Box::new(SeededRng::new(42)),
        )
        .unwrap();

        let mut failure = None;
        for _ in 0..50 {
            match session.execute_round(AttackType::LightAttack) {
                Ok(report) => assert!(report.outcome.is_none(), "champion should not lose"),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        assert!(matches!(failure, Some(RuntimeError::Repository(_))));
        assert!(session.is_finished());
        assert!(!session.is_settled());

        // still failing: the retry reports the store error again
        assert!(matches!(
            session.execute_round(AttackType::LightAttack),
            Err(RuntimeError::Repository(_))
        ));
        assert_eq!(store.load("hero").unwrap(), Some(hero.clone()));

        store.fail_saves.store(false, Ordering::SeqCst);
        let settlement = session.retry_settlement().unwrap().unwrap().clone();
        assert!(settlement.player_won);

        let stored = store.load("hero").unwrap().unwrap();
        assert_eq!(stored.level, 2);
        assert_eq!(stored.souls, settlement.souls);
        assert!(stored.souls > hero.souls);

        // written once, and the fight stays over
        assert!(session.retry_settlement().unwrap().is_some());
        assert_eq!(store.load("hero").unwrap().unwrap().souls, settlement.souls);
        assert!(matches!(
            session.execute_round(AttackType::LightAttack),
            Err(RuntimeError::Combat(CombatError::AlreadyEnded { .. }))
        ));
    }

    #[test]
    fn unknown_player_is_rejected() {
        let (store, content) = fixture();
        let result = CombatSession::start(
            EncounterSpec::against("ghost", "hollow_soldier"),
            content,
            store,
            Box::new(ScriptedRng::constant(0.5)),
        );
        assert!(matches!(result, Err(RuntimeError::CharacterNotFound(id)) if id == "ghost"));
    }

    #[test]
    fn unknown_template_is_a_hard_failure() {
        let (store, content) = fixture();
        let result = CombatSession::start(
            EncounterSpec::against("hero", "dragon_king"),
            content,
            store,
            Box::new(ScriptedRng::constant(0.5)),
        );
        assert!(matches!(result, Err(RuntimeError::Combat(_))));
    }

    #[test]
    fn random_selection_uses_level_window() {
        let (store, content) = fixture();
        let session = CombatSession::start(
            EncounterSpec::random("hero", Some(EnemyTier::Basic)),
            content,
            store,
            Box::new(ScriptedRng::constant(0.0)),
        )
        .unwrap();
        assert_eq!(session.combat().enemy().name(), "Hollow Soldier (Lv1)");
        assert!(session.view().active);
    }

    #[test]
    fn defeat_writes_nothing() {
        let (store, content) = fixture();
        let mut hero = store.load("hero").unwrap().unwrap();
        hero.health = 1;
        store.save("hero", &hero).unwrap();

        let mut session = CombatSession::start(
            EncounterSpec::against("hero", "hollow_soldier").at_level(20),
            content,
            store.clone(),
            Box::new(SeededRng::new(11)),
        )
        .unwrap();

        let mut finished = None;
        for _ in 0..500 {
            let report = session.execute_round(AttackType::LightAttack).unwrap();
            if let Some(outcome) = report.outcome {
                finished = Some(outcome);
                break;
            }
        }

        let outcome = finished.expect("fight should end");
        assert!(!outcome.player_won);
        assert_eq!(outcome.souls_gained, 0);
        assert_eq!(store.load("hero").unwrap(), Some(hero));
        assert!(!session.settlement().unwrap().player_won);
        assert!(matches!(
            session.execute_round(AttackType::Block),
            Err(RuntimeError::Combat(_))
        ));
    }
}
