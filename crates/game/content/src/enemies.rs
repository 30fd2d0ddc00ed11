//! Built-in enemy templates keyed by identifier.

use std::sync::OnceLock;

use shards_core::{
    BossPhase, EnemyBehavior, EnemyTemplate, EnemyTier, LootTable, Resistances, RngOracle,
    TemplateOracle,
};

static BUILTIN: OnceLock<EnemyRegistry> = OnceLock::new();

/// Key every lookup falls back to when no template fits a level.
pub const FALLBACK_TEMPLATE: &str = "hollow_soldier";

/// Enemy templates in catalog order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyRegistry {
    templates: Vec<(String, EnemyTemplate)>,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared catalog of the built-in templates.
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| {
            let mut registry = Self::new();
            registry.extend(builtin_templates());
            tracing::debug!(count = registry.len(), "enemy catalog initialised");
            registry
        })
    }

    /// Adds a template, replacing any existing one with the same key.
    pub fn insert(&mut self, key: impl Into<String>, template: EnemyTemplate) {
        let key = key.into();
        match self.templates.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = template,
            None => self.templates.push((key, template)),
        }
    }

    pub fn extend(&mut self, templates: impl IntoIterator<Item = (String, EnemyTemplate)>) {
        for (key, template) in templates {
            self.insert(key, template);
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template keys, optionally restricted to one tier.
    pub fn list(&self, tier: Option<EnemyTier>) -> Vec<&str> {
        self.templates
            .iter()
            .filter(|(_, t)| tier.is_none_or(|tier| t.tier == tier))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Picks a template whose level sits inside its tier's window around
    /// `player_level`. Falls back to [`FALLBACK_TEMPLATE`] when none fits.
    pub fn random_for_level(
        &self,
        player_level: u32,
        tier: Option<EnemyTier>,
        rng: &mut dyn RngOracle,
    ) -> &str {
        let candidates: Vec<&str> = self
            .templates
            .iter()
            .filter(|(_, t)| tier.is_none_or(|tier| t.tier == tier))
            .filter(|(_, t)| match t.tier.level_window() {
                Some(window) => t.level.abs_diff(player_level) <= window,
                None => true,
            })
            .map(|(key, _)| key.as_str())
            .collect();

        if candidates.is_empty() {
            tracing::debug!(player_level, "no template in level window, using fallback");
            return FALLBACK_TEMPLATE;
        }

        let index = rng.range(0, candidates.len() as i32 - 1) as usize;
        candidates[index]
    }
}

impl TemplateOracle for EnemyRegistry {
    fn template(&self, key: &str) -> Option<&EnemyTemplate> {
        self.templates
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, template)| template)
    }
}

const fn resist(
    physical: f64,
    fire: f64,
    frost: f64,
    lightning: f64,
    poison: f64,
    dark: f64,
    holy: f64,
) -> Resistances {
    Resistances {
        physical,
        fire,
        frost,
        lightning,
        poison,
        dark,
        holy,
    }
}

/// The nine built-in templates, basic enemies through the world boss.
pub fn builtin_templates() -> Vec<(String, EnemyTemplate)> {
    use EnemyBehavior::*;
    use EnemyTier::*;

    let templates = [
        (
            "hollow_soldier",
            EnemyTemplate::builder("Hollow Soldier")
                .tier(Basic)
                .level(1)
                .behavior(Balanced)
                .pools(50, 80)
                .stats(10, 8, 10, 6)
                .resistances(resist(1.0, 1.2, 0.8, 1.0, 0.5, 0.8, 1.5))
                .loot(
                    LootTable::new((10, 25))
                        .with_drop("Rusty Sword", 0.1)
                        .with_drop("Tattered Armor", 0.05)
                        .with_drop("Health Potion", 0.3),
                )
                .build(),
        ),
        (
            "corrupt_wolf",
            EnemyTemplate::builder("Corrupt Wolf")
                .tier(Basic)
                .level(2)
                .behavior(Aggressive)
                .pools(60, 100)
                .stats(12, 14, 8, 4)
                .resistances(resist(0.9, 1.3, 1.0, 1.0, 0.7, 1.2, 1.0))
                .special("bleed_bite")
                .loot(
                    LootTable::new((15, 35))
                        .with_drop("Wolf Pelt", 0.4)
                        .with_drop("Sharp Fang", 0.2),
                )
                .build(),
        ),
        (
            "skeleton_warrior",
            EnemyTemplate::builder("Skeleton Warrior")
                .tier(Basic)
                .level(3)
                .behavior(Defensive)
                .pools(70, 70)
                .stats(11, 10, 8, 5)
                .resistances(resist(0.8, 1.0, 0.5, 1.0, 0.0, 0.7, 1.8))
                .loot(
                    LootTable::new((20, 40))
                        .with_drop("Bone Fragment", 0.5)
                        .with_drop("Ancient Coin", 0.15),
                )
                .build(),
        ),
        (
            "dark_knight",
            EnemyTemplate::builder("Dark Knight")
                .tier(Elite)
                .level(5)
                .behavior(Tactical)
                .pools(150, 120)
                .stats(16, 14, 15, 10)
                .resistances(resist(0.7, 0.9, 1.0, 1.1, 0.6, 0.5, 1.5))
                .special("dark_wave")
                .special("shield_bash")
                .loot(
                    LootTable::new((80, 150))
                        .with_drop("Dark Steel Sword", 0.15)
                        .with_drop("Knight's Shield", 0.1)
                        .with_drop("Greater Health Potion", 0.4)
                        .with_guaranteed("Dark Fragment"),
                )
                .build(),
        ),
        (
            "frost_mage",
            EnemyTemplate::builder("Frost Mage")
                .tier(Elite)
                .level(6)
                .behavior(Tactical)
                .pools(100, 150)
                .stats(8, 12, 10, 18)
                .resistances(resist(1.2, 1.8, 0.3, 1.0, 1.0, 0.9, 1.0))
                .special("frost_bolt")
                .special("ice_shield")
                .special("freeze")
                .loot(
                    LootTable::new((100, 180))
                        .with_drop("Frost Staff", 0.12)
                        .with_drop("Mage Robes", 0.08)
                        .with_drop("Mana Potion", 0.5)
                        .with_guaranteed("Frozen Crystal"),
                )
                .build(),
        ),
        (
            "corrupted_guardian",
            EnemyTemplate::builder("Corrupted Guardian")
                .tier(MiniBoss)
                .level(8)
                .behavior(Defensive)
                .pools(300, 150)
                .stats(18, 10, 20, 12)
                .resistances(resist(0.6, 0.8, 0.8, 1.2, 0.5, 0.7, 1.3))
                .special("ground_slam")
                .special("corrupted_aura")
                .special("regeneration")
                .enrage_at(0.3)
                .loot(
                    LootTable::new((200, 350))
                        .with_drop("Guardian's Greatsword", 0.2)
                        .with_drop("Heavy Armor Set", 0.15)
                        .with_guaranteed("Guardian Soul")
                        .with_guaranteed("Titanite Shard"),
                )
                .build(),
        ),
        (
            "lord_of_cinders",
            EnemyTemplate::builder("Lord of Cinders")
                .tier(Boss)
                .level(10)
                .behavior(Aggressive)
                .pools(500, 200)
                .stats(22, 16, 20, 15)
                .resistances(resist(0.8, 0.3, 1.5, 1.0, 0.6, 0.9, 1.2))
                .special("flame_wave")
                .special("cinder_storm")
                .special("burning_blade")
                .special("resurrection")
                .phase(
                    BossPhase::at(0.5)
                        .unlocks("cinder_storm")
                        .stat_change("strength", 5.0)
                        .stat_change("speed", 2.0),
                )
                .phase(
                    BossPhase::at(0.25)
                        .unlocks("resurrection")
                        .stat_change("strength", 8.0)
                        .stat_change("fire_damage", 50.0),
                )
                .enrage_at(0.15)
                .loot(
                    LootTable::new((800, 1200))
                        .with_drop("Cinder Blade", 0.3)
                        .with_drop("Ashen Crown", 0.2)
                        .with_drop("Fire Gem", 0.4)
                        .with_guaranteed("Lord Soul")
                        .with_guaranteed("Cinder Heart")
                        .with_guaranteed("Boss Key"),
                )
                .build(),
        ),
        (
            "crystal_shard_guardian",
            EnemyTemplate::builder("Crystal Shard Guardian")
                .tier(Boss)
                .level(12)
                .behavior(Tactical)
                .pools(600, 250)
                .stats(20, 18, 22, 20)
                .resistances(resist(0.7, 1.0, 1.0, 0.5, 0.4, 1.3, 0.8))
                .special("crystal_spear")
                .special("shard_barrier")
                .special("reality_distortion")
                .special("summon_minions")
                .phase(
                    BossPhase::at(0.66)
                        .unlocks("shard_barrier")
                        .summons("hollow_soldier")
                        .summons("hollow_soldier"),
                )
                .phase(
                    BossPhase::at(0.33)
                        .unlocks("reality_distortion")
                        .stat_change("all_resistances", -0.2),
                )
                .enrage_at(0.1)
                .loot(
                    LootTable::new((1000, 1500))
                        .with_guaranteed("Crystal Shard")
                        .with_guaranteed("Guardian's Essence")
                        .with_guaranteed("Legendary Weapon Fragment"),
                )
                .build(),
        ),
        (
            "aetherfall_titan",
            EnemyTemplate::builder("Aetherfall Titan")
                .tier(WorldBoss)
                .level(20)
                .behavior(Berserker)
                .pools(2000, 500)
                .stats(30, 15, 35, 25)
                .resistances(resist(0.6, 0.7, 0.7, 0.7, 0.3, 0.8, 0.9))
                .special("titan_slam")
                .special("aether_beam")
                .special("reality_tear")
                .special("earthquake")
                .special("summon_adds")
                .special("enrage")
                .special("phase_shift")
                .phase(BossPhase::at(0.75).unlocks("aether_beam"))
                .phase(
                    BossPhase::at(0.5)
                        .unlocks("reality_tear")
                        .unlocks("summon_adds"),
                )
                .phase(BossPhase::at(0.25).unlocks("phase_shift").unlocks("enrage"))
                .enrage_at(0.1)
                .loot(
                    LootTable::new((3000, 6000))
                        .with_guaranteed("Titan's Heart")
                        .with_guaranteed("Aether Crystal")
                        .with_guaranteed("Legendary Armor Set")
                        .with_guaranteed("Mythic Weapon"),
                )
                .build(),
        ),
    ];

    templates
        .into_iter()
        .map(|(key, template)| (key.to_string(), template))
        .collect()
}
