//! End-to-end encounter scenarios driven through the runtime.

use std::sync::Arc;

use shards_content::{AbilityRegistry, CharacterSpec, StatMethod};
use shards_core::combat::{dodge_chance, resolve_basic};
use shards_core::{
    AbilityBook, AbilityError, ActionResult, AttackType, CharacterSnapshot, ClassKind,
    CombatConfig, CombatEnv, Combatant, PlayerCommand, PrimaryStats, Race, ResourceKind,
    ScriptedRng, Side, Stance, StatusEffectKind, StatusRider,
};
use shards_runtime::{
    CharacterStore, CombatSession, EncounterRegistry, EncounterSpec, FixedCommandProvider,
    GameContent, InMemoryStore, RuntimeError, SeededRng, register_character,
};

fn registry(store: &Arc<InMemoryStore>) -> EncounterRegistry {
    EncounterRegistry::new(Arc::new(GameContent::builtin()), store.clone())
}

fn champion(store: &InMemoryStore, id: &str, name: &str) -> CharacterSnapshot {
    let spec = CharacterSpec::new(name, Race::Human, ClassKind::Warrior)
        .with_stats(PrimaryStats::uniform(30));
    register_character(store, id, spec, &mut SeededRng::new(1)).unwrap()
}

#[tokio::test]
async fn heroic_warrior_fight_ends_within_thirty_rounds() {
    for seed in 1..=8 {
        let store = Arc::new(InMemoryStore::new());
        let spec = CharacterSpec::new("Test Warrior", Race::Human, ClassKind::Warrior)
            .with_method(StatMethod::Heroic);
        let hero = register_character(store.as_ref(), "hero", spec, &mut SeededRng::new(seed))
            .unwrap();

        let registry = registry(&store);
        let handle = registry
            .start(EncounterSpec::against("hero", "hollow_soldier"), Some(seed))
            .await
            .unwrap();

        let provider = FixedCommandProvider(AttackType::LightAttack.into());
        let outcome = handle
            .play_out(&provider, 30)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("seed {seed}: no result within 30 rounds"));

        assert!(outcome.rounds <= 30);
        let stored = store.load("hero").unwrap().unwrap();
        if outcome.player_won {
            assert!(outcome.souls_gained >= 0);
            assert_eq!(outcome.xp_gained, 100);
            assert_eq!(stored.souls, hero.souls + outcome.souls_gained);
            assert_eq!(stored.experience, 100);
            assert_eq!(stored.level, 2);
        } else {
            assert_eq!((outcome.souls_gained, outcome.xp_gained), (0, 0));
            assert_eq!(stored, hero);
        }

        registry.shutdown().await.unwrap();
    }
}

#[test]
fn fireball_without_enough_mana_changes_nothing() {
    let content = Arc::new(GameContent::builtin());
    let store = Arc::new(InMemoryStore::new());

    let spec = CharacterSpec::new("Test Sorcerer", Race::Elf, ClassKind::Sorcerer)
        .with_stats(PrimaryStats::uniform(10));
    let mut sorcerer =
        register_character(store.as_ref(), "mage", spec, &mut ScriptedRng::constant(0.0)).unwrap();
    sorcerer.mana = 29;
    store.save("mage", &sorcerer).unwrap();

    // Directly against the ability book.
    let mut book = AbilityBook::for_class(ClassKind::Sorcerer, AbilityRegistry::builtin());
    let mut pools = shards_core::ResourcePools::from_snapshot(&sorcerer);
    let err = book
        .use_ability("Fireball", &mut pools, &sorcerer.stats)
        .unwrap_err();
    assert!(matches!(
        err,
        AbilityError::InsufficientResource {
            resource: ResourceKind::Mana,
            ..
        }
    ));
    assert_eq!(pools.mana, 29);
    assert_eq!(book.get("Fireball").unwrap().cooldown_remaining, 0);

    // And as a round command.
    let mut session = CombatSession::start(
        EncounterSpec::against("mage", "hollow_soldier"),
        content,
        store,
        Box::new(SeededRng::new(5)),
    )
    .unwrap();
    let report = session
        .execute_round(PlayerCommand::ability("Fireball"))
        .unwrap();

    let failed = session
        .combat()
        .log()
        .iter()
        .find(|entry| entry.action == "Fireball")
        .unwrap();
    assert_eq!(failed.result, ActionResult::Failed);
    assert_eq!(failed.damage, 0);
    assert!(failed.description.contains("mana"));
    assert!(report.summary.actions.iter().any(|line| line.contains("Fireball")));

    assert_eq!(session.combat().player().pools().mana, 29);
    let fireball = session
        .available_abilities()
        .into_iter()
        .find(|view| view.name == "Fireball")
        .unwrap();
    assert_eq!(fireball.cooldown_remaining, 0);
    assert!(!fireball.can_afford);
}

#[test]
fn reapplied_poison_refreshes_and_ticks_thirty_five() {
    let target = CharacterSnapshot {
        name: "Dummy".into(),
        level: 1,
        health: 100,
        max_health: 100,
        stamina: 50,
        max_stamina: 50,
        ..CharacterSnapshot::default()
    };
    let mut dummy = Combatant::new(Side::Enemy, target, AbilityBook::default());
    let poison = StatusRider::new(StatusEffectKind::Poison, 5, 7);

    for _ in 0..3 {
        dummy.add_status_effect(poison.instance("Test"));
        let active = dummy.status().get(StatusEffectKind::Poison).unwrap();
        assert_eq!((active.duration, active.potency), (5, 7));
    }
    assert_eq!(dummy.status().len(), 1);

    let mut total = 0;
    for _ in 0..5 {
        total += dummy
            .process_status_effects()
            .into_iter()
            .map(|(_, amount)| amount)
            .sum::<i32>();
    }

    assert_eq!(total, 35);
    assert_eq!(dummy.health(), 65);
    assert!(dummy.status().is_empty());
}

fn assert_always_dodges(config: &CombatConfig, dexterity: i32, expected_chance: i32) {
    let abilities: Vec<shards_core::Ability> = Vec::new();
    let env = CombatEnv::new(config, &abilities);

    let attacker = CharacterSnapshot {
        name: "Brute".into(),
        stats: PrimaryStats::uniform(18),
        health: 100,
        max_health: 100,
        stamina: 10_000,
        max_stamina: 10_000,
        ..CharacterSnapshot::default()
    };
    let defender = CharacterSnapshot {
        name: "Shade".into(),
        stats: PrimaryStats::new(10, dexterity, 10, 10, 10, 10),
        health: 100,
        max_health: 100,
        stamina: 100,
        max_stamina: 100,
        ..CharacterSnapshot::default()
    };

    let mut attacker = Combatant::new(Side::Player, attacker, AbilityBook::default());
    let mut defender = Combatant::new(Side::Enemy, defender, AbilityBook::default());
    assert_eq!(dodge_chance(defender.stats().evasion, config), expected_chance);

    // 0.999 rolls a 100 on the d100, the worst case for the dodger.
    let mut rng = ScriptedRng::constant(0.999);
    for round in 1..=50 {
        for action in [AttackType::LightAttack, AttackType::HeavyAttack] {
            defender.set_stance(Stance::Dodging);
            let entry = resolve_basic(round, &mut attacker, &mut defender, action, &env, &mut rng);
            assert_eq!(entry.result, ActionResult::Dodged);
            assert_eq!(entry.damage, 0);
        }
    }
    assert_eq!(defender.health(), 100);
}

#[test]
fn guaranteed_dodge_always_evades() {
    // dex 46: evasion 10 + 4 × 18 = 82, plus the default +20 is 102
    let config = CombatConfig::default();
    assert_eq!(config.dodge_bonus, 20);
    assert_always_dodges(&config, 46, 102);

    // dex 40: evasion 70, and a +30 bonus lands exactly on 100
    let config = CombatConfig {
        dodge_bonus: 30,
        ..CombatConfig::default()
    };
    assert_always_dodges(&config, 40, 100);
}

#[tokio::test]
async fn victory_is_written_back_to_the_store() {
    let store = Arc::new(InMemoryStore::new());
    let before = champion(&store, "hero", "Aldric");

    let registry = registry(&store);
    let handle = registry
        .start(EncounterSpec::against("hero", "hollow_soldier"), Some(42))
        .await
        .unwrap();

    let provider = FixedCommandProvider(AttackType::LightAttack.into());
    let outcome = handle.play_out(&provider, 50).await.unwrap().unwrap();
    assert!(outcome.player_won);

    let stored = store.load("hero").unwrap().unwrap();
    assert_eq!(stored.souls, before.souls + outcome.souls_gained);
    assert_eq!(stored.experience, outcome.xp_gained);
    assert_eq!(stored.level, 2);
    let lost = before.health - outcome.player_health;
    assert_eq!(stored.health, stored.max_health - lost);
    for item in &outcome.loot {
        assert!(stored.inventory.iter().any(|owned| &owned.name == item));
    }

    let settlement = handle.settlement().await.unwrap().unwrap();
    assert!(settlement.player_won);
    assert_eq!(settlement.souls, stored.souls);
    assert!(settlement.progress.unwrap().leveled_up);

    let again = handle.execute_round(AttackType::LightAttack).await;
    assert!(matches!(again, Err(RuntimeError::Combat(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn encounters_run_in_parallel() {
    let store = Arc::new(InMemoryStore::new());
    let names = ["Aldric", "Bryn", "Cael", "Dorn", "Eira", "Fen"];
    for (i, name) in names.iter().enumerate() {
        champion(&store, &format!("hero{i}"), name);
    }

    let registry = Arc::new(registry(&store));
    let mut handles = Vec::new();
    for i in 0..names.len() {
        let spec = EncounterSpec::against(format!("hero{i}"), "hollow_soldier");
        handles.push(registry.start(spec, Some(i as u64)).await.unwrap());
    }
    assert_eq!(registry.len().await, names.len());

    let tasks: Vec<_> = handles
        .into_iter()
        .map(|handle| {
            tokio::spawn(async move {
                let provider = FixedCommandProvider(AttackType::LightAttack.into());
                handle.play_out(&provider, 50).await
            })
        })
        .collect();

    for task in tasks {
        let outcome = task.await.unwrap().unwrap().unwrap();
        assert!(outcome.player_won);
    }

    for i in 0..names.len() {
        assert_eq!(store.load(&format!("hero{i}")).unwrap().unwrap().level, 2);
    }
    registry.shutdown().await.unwrap();
    assert!(registry.is_empty().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rounds_on_one_encounter_never_overlap() {
    let store = Arc::new(InMemoryStore::new());
    champion(&store, "hero", "Aldric");

    let registry = registry(&store);
    let handle = registry
        .start(EncounterSpec::against("hero", "hollow_soldier"), Some(3))
        .await
        .unwrap();

    let tasks: Vec<_> = (0..6)
        .map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.execute_round(AttackType::Block).await })
        })
        .collect();

    let mut rounds = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            Ok(report) => rounds.push(report.summary.round),
            Err(err) => assert!(matches!(err, RuntimeError::Combat(_))),
        }
    }

    rounds.sort_unstable();
    let expected: Vec<u32> = (1..=rounds.len() as u32).collect();
    assert_eq!(rounds, expected);
}

#[tokio::test]
async fn abandoned_encounter_writes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let before = champion(&store, "hero", "Aldric");

    let registry = registry(&store);
    let handle = registry
        .start(EncounterSpec::against("hero", "hollow_soldier"), Some(9))
        .await
        .unwrap();
    handle.execute_round(AttackType::Block).await.unwrap();

    registry.abandon(handle.id()).await.unwrap();
    assert!(matches!(
        registry.get(handle.id()).await,
        Err(RuntimeError::EncounterNotFound(_))
    ));

    let result = handle.execute_round(AttackType::LightAttack).await;
    assert!(matches!(
        result,
        Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_))
    ));
    assert_eq!(store.load("hero").unwrap().unwrap(), before);
}

#[tokio::test]
async fn content_directory_extends_the_catalog() {
    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data");
    let content = GameContent::from_data_dir(data_dir).unwrap();
    assert_eq!(content.config(), &CombatConfig::default());
    assert_eq!(content.enemies().len(), 11);

    let store = Arc::new(InMemoryStore::new());
    champion(&store, "hero", "Aldric");
    let registry = EncounterRegistry::new(Arc::new(content), store.clone());

    let handle = registry
        .start(EncounterSpec::against("hero", "giant_rat"), Some(2))
        .await
        .unwrap();
    let view = handle.query().await.unwrap();
    assert_eq!(view.enemy.name, "Giant Rat (Lv1)");
    assert!(view.active);

    let unknown = registry
        .start(EncounterSpec::against("hero", "lich_king"), Some(2))
        .await;
    assert!(matches!(unknown, Err(RuntimeError::Combat(_))));
}

#[tokio::test]
async fn settled_encounters_are_reaped() {
    let store = Arc::new(InMemoryStore::new());
    let names = ["Aldric", "Bryn", "Cael", "Dorn", "Eira"];
    for (i, name) in names.iter().enumerate() {
        champion(&store, &format!("hero{i}"), name);
    }

    let registry = registry(&store);
    let mut handles = Vec::new();
    for i in 0..names.len() {
        let spec = EncounterSpec::against(format!("hero{i}"), "hollow_soldier");
        handles.push(registry.start(spec, Some(100 + i as u64)).await.unwrap());
    }
    assert_eq!(registry.len().await, names.len());

    let provider = FixedCommandProvider(AttackType::LightAttack.into());
    for handle in &handles {
        assert!(handle.play_out(&provider, 50).await.unwrap().is_some());
    }

    assert_eq!(registry.len().await, 0);
    assert!(registry.ids().await.is_empty());
    assert!(matches!(
        registry.get(handles[0].id()).await,
        Err(RuntimeError::EncounterNotFound(_))
    ));

    // a held handle still reads its result
    let settlement = handles[0].settlement().await.unwrap();
    assert!(settlement.is_some());

    registry.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_unfinished_workers() {
    let store = Arc::new(InMemoryStore::new());
    let before = champion(&store, "hero", "Aldric");

    let registry = registry(&store);
    let handle = registry
        .start(EncounterSpec::against("hero", "hollow_soldier"), Some(5))
        .await
        .unwrap();
    handle.execute_round(AttackType::Block).await.unwrap();

    registry.shutdown().await.unwrap();
    assert!(registry.is_empty().await);
    assert!(matches!(
        handle.query().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
    assert_eq!(store.load("hero").unwrap().unwrap(), before);
}
