//! Enemy archetypes.

use std::borrow::Cow;

use crate::combat::DamageType;
use crate::state::PrimaryStats;

/// Enemy difficulty tier.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum EnemyTier {
    #[default]
    Basic,
    Elite,
    MiniBoss,
    Boss,
    WorldBoss,
}

impl EnemyTier {
    /// Souls range used when a template has no loot table of its own.
    pub const fn default_souls(&self) -> (i32, i32) {
        match self {
            Self::Basic => (10, 30),
            Self::Elite => (50, 100),
            Self::MiniBoss => (150, 300),
            Self::Boss => (500, 1000),
            Self::WorldBoss => (2000, 5000),
        }
    }

    /// Largest level gap at which a template of this tier is offered to a
    /// player. `None` means any level.
    pub const fn level_window(&self) -> Option<u32> {
        match self {
            Self::Basic => Some(2),
            Self::Elite => Some(3),
            Self::MiniBoss => Some(5),
            Self::Boss | Self::WorldBoss => None,
        }
    }
}

/// AI behavior pattern.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum EnemyBehavior {
    /// Prefers heavy attacks.
    Aggressive,
    /// Prefers blocking and parrying.
    Defensive,
    /// Mix of all actions.
    #[default]
    Balanced,
    /// Adapts to both combatants' health.
    Tactical,
    /// All-out offense.
    Berserker,
    /// Turtles up when hurt.
    Coward,
}

/// Damage multipliers per type: 0.0 immune, 1.0 normal, above 1.0 weak.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Resistances {
    pub physical: f64,
    pub fire: f64,
    pub frost: f64,
    pub lightning: f64,
    pub poison: f64,
    pub dark: f64,
    pub holy: f64,
}

impl Resistances {
    pub const NEUTRAL: Self = Self {
        physical: 1.0,
        fire: 1.0,
        frost: 1.0,
        lightning: 1.0,
        poison: 1.0,
        dark: 1.0,
        holy: 1.0,
    };

    pub const fn get(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Physical => self.physical,
            DamageType::Fire => self.fire,
            DamageType::Frost => self.frost,
            DamageType::Lightning => self.lightning,
            DamageType::Poison => self.poison,
            DamageType::Dark => self.dark,
            DamageType::Holy => self.holy,
        }
    }
}

impl Default for Resistances {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// One weighted item drop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDrop {
    pub name: String,
    /// Independent drop probability.
    pub chance: f64,
}

impl LootDrop {
    pub fn new(name: impl Into<String>, chance: f64) -> Self {
        Self {
            name: name.into(),
            chance,
        }
    }
}

/// Souls range, random drops and guaranteed drops.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LootTable {
    pub souls: (i32, i32),
    pub items: Vec<LootDrop>,
    pub guaranteed: Vec<String>,
}

impl LootTable {
    pub fn new(souls: (i32, i32)) -> Self {
        Self {
            souls,
            ..Self::default()
        }
    }

    pub fn with_drop(mut self, name: impl Into<String>, chance: f64) -> Self {
        self.items.push(LootDrop::new(name, chance));
        self
    }

    pub fn with_guaranteed(mut self, name: impl Into<String>) -> Self {
        self.guaranteed.push(name.into());
        self
    }
}

/// A named stat adjustment attached to a boss phase.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatChange {
    pub target: String,
    pub amount: f64,
}

/// A boss phase entered once when health first falls to the threshold.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BossPhase {
    pub hp_threshold: f64,
    pub abilities_unlocked: Vec<String>,
    pub stat_changes: Vec<StatChange>,
    pub summons: Vec<String>,
}

impl BossPhase {
    pub fn at(hp_threshold: f64) -> Self {
        Self {
            hp_threshold,
            ..Self::default()
        }
    }

    pub fn unlocks(mut self, ability: impl Into<String>) -> Self {
        self.abilities_unlocked.push(ability.into());
        self
    }

    pub fn stat_change(mut self, target: impl Into<String>, amount: f64) -> Self {
        self.stat_changes.push(StatChange {
            target: target.into(),
            amount,
        });
        self
    }

    pub fn summons(mut self, template: impl Into<String>) -> Self {
        self.summons.push(template.into());
        self
    }
}

/// Static enemy archetype.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub name: String,
    pub tier: EnemyTier,
    pub level: u32,
    pub behavior: EnemyBehavior,
    pub base_health: i32,
    pub base_stamina: i32,
    pub base_stats: PrimaryStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Resistances,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special_abilities: Vec<String>,
    /// Falls back to the tier's default table when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Option<LootTable>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss_phases: Vec<BossPhase>,
    /// Health fraction at or below which the enemy fights as a berserker.
    #[cfg_attr(feature = "serde", serde(default = "default_enrage_threshold"))]
    pub enrage_threshold: f64,
}

#[cfg(feature = "serde")]
fn default_enrage_threshold() -> f64 {
    EnemyTemplate::DEFAULT_ENRAGE_THRESHOLD
}

impl EnemyTemplate {
    pub const DEFAULT_ENRAGE_THRESHOLD: f64 = 0.25;

    /// Non-player wisdom and charisma before level scaling.
    pub const BASE_WISDOM: i32 = 10;
    pub const BASE_CHARISMA: i32 = 5;

    pub fn builder(name: impl Into<String>) -> EnemyTemplateBuilder {
        EnemyTemplateBuilder::new(name)
    }

    /// Loot table, or the tier default when none was given.
    pub fn loot_table(&self) -> Cow<'_, LootTable> {
        match &self.loot {
            Some(table) => Cow::Borrowed(table),
            None => Cow::Owned(LootTable::new(self.tier.default_souls())),
        }
    }
}

/// Builder for [`EnemyTemplate`].
#[derive(Clone, Debug)]
pub struct EnemyTemplateBuilder {
    template: EnemyTemplate,
}

impl EnemyTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            template: EnemyTemplate {
                name: name.into(),
                tier: EnemyTier::Basic,
                level: 1,
                behavior: EnemyBehavior::Balanced,
                base_health: 50,
                base_stamina: 50,
                base_stats: PrimaryStats::new(
                    10,
                    10,
                    10,
                    10,
                    EnemyTemplate::BASE_WISDOM,
                    EnemyTemplate::BASE_CHARISMA,
                ),
                resistances: Resistances::NEUTRAL,
                special_abilities: Vec::new(),
                loot: None,
                boss_phases: Vec::new(),
                enrage_threshold: EnemyTemplate::DEFAULT_ENRAGE_THRESHOLD,
            },
        }
    }

    pub fn tier(mut self, tier: EnemyTier) -> Self {
        self.template.tier = tier;
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.template.level = level;
        self
    }

    pub fn behavior(mut self, behavior: EnemyBehavior) -> Self {
        self.template.behavior = behavior;
        self
    }

    pub fn pools(mut self, health: i32, stamina: i32) -> Self {
        self.template.base_health = health;
        self.template.base_stamina = stamina;
        self
    }

    /// Sets strength, dexterity, constitution and intelligence. Wisdom and
    /// charisma keep the non-player defaults.
    pub fn stats(mut self, strength: i32, dexterity: i32, constitution: i32, intelligence: i32) -> Self {
        let stats = &mut self.template.base_stats;
        stats.strength = strength;
        stats.dexterity = dexterity;
        stats.constitution = constitution;
        stats.intelligence = intelligence;
        self
    }

    pub fn resistances(mut self, resistances: Resistances) -> Self {
        self.template.resistances = resistances;
        self
    }

    pub fn special(mut self, ability: impl Into<String>) -> Self {
        self.template.special_abilities.push(ability.into());
        self
    }

    pub fn loot(mut self, loot: LootTable) -> Self {
        self.template.loot = Some(loot);
        self
    }

    pub fn phase(mut self, phase: BossPhase) -> Self {
        self.template.boss_phases.push(phase);
        self
    }

    pub fn enrage_at(mut self, threshold: f64) -> Self {
        self.template.enrage_threshold = threshold;
        self
    }

    pub fn build(self) -> EnemyTemplate {
        self.template
    }
}
