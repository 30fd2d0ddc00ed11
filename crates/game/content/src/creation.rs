//! Character creation: stat generation, racial and class tables, starting
//! gear.
//!
//! Creation is pure apart from the injected [`RngOracle`]. Name uniqueness is
//! checked through a caller-supplied predicate so the persistence layer stays
//! outside this crate.

use shards_core::{
    CharacterSnapshot, ClassKind, EquipmentItem, ErrorSeverity, Faction, GameError, ItemKind,
    PrimaryStats, Race, RngOracle, StatKind, stat_modifier,
};

pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 50;
pub const POINT_BUY_TOTAL: i32 = 60;
pub const MIN_STAT_VALUE: i32 = 3;
pub const MAX_STAT_VALUE: i32 = 18;
pub const STARTING_SOULS: (i32, i32) = (50, 150);

/// Errors raised while validating a new character.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CreationError {
    #[error("Name must be at least 3 characters long")]
    NameTooShort,

    #[error("Name must be no more than 50 characters long")]
    NameTooLong,

    #[error("Name can only contain letters, spaces, hyphens, and apostrophes")]
    InvalidNameCharacters,

    #[error("Character name '{0}' is already taken")]
    NameTaken(String),

    #[error("Stat {stat} must be between 3 and 18 (got {value})")]
    StatOutOfRange { stat: StatKind, value: i32 },

    #[error("Total stat points must equal 60 (current: {0})")]
    PointBuyTotal(i32),
}

impl GameError for CreationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NameTooShort => "CREATION_NAME_TOO_SHORT",
            Self::NameTooLong => "CREATION_NAME_TOO_LONG",
            Self::InvalidNameCharacters => "CREATION_NAME_INVALID",
            Self::NameTaken(_) => "CREATION_NAME_TAKEN",
            Self::StatOutOfRange { .. } => "CREATION_STAT_OUT_OF_RANGE",
            Self::PointBuyTotal(_) => "CREATION_POINT_BUY_TOTAL",
        }
    }
}

/// How random stats are generated.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatMethod {
    /// Three d6 summed.
    #[strum(serialize = "3d6")]
    #[cfg_attr(feature = "serde", serde(rename = "3d6"))]
    ThreeD6,
    /// Four d6, lowest dropped.
    #[default]
    #[strum(serialize = "4d6_drop_lowest")]
    #[cfg_attr(feature = "serde", serde(rename = "4d6_drop_lowest"))]
    FourD6DropLowest,
    /// Four d6 with ones raised to two, lowest dropped.
    Heroic,
    /// Every score at 10.
    Flat,
}

impl StatMethod {
    /// Parses a method name; unknown names roll flat tens.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::Flat)
    }
}

/// Rolls all six scores, strength through charisma.
pub fn roll_stats(method: StatMethod, rng: &mut dyn RngOracle) -> PrimaryStats {
    let mut stats = PrimaryStats::uniform(10);
    for stat in StatKind::ALL {
        *stats.get_mut(stat) = roll_score(method, rng);
    }
    stats
}

fn roll_score(method: StatMethod, rng: &mut dyn RngOracle) -> i32 {
    match method {
        StatMethod::ThreeD6 => (0..3).map(|_| rng.roll_die(6)).sum(),
        StatMethod::FourD6DropLowest => drop_lowest([0; 4].map(|_| rng.roll_die(6))),
        StatMethod::Heroic => drop_lowest([0; 4].map(|_| rng.roll_die(6).max(2))),
        StatMethod::Flat => 10,
    }
}

fn drop_lowest(rolls: [i32; 4]) -> i32 {
    let lowest = rolls.iter().copied().min().unwrap_or(0);
    rolls.iter().sum::<i32>() - lowest
}

/// Validates a point-buy allocation made before racial modifiers.
pub fn point_buy(stats: PrimaryStats) -> Result<PrimaryStats, CreationError> {
    for stat in StatKind::ALL {
        let value = stats.get(stat);
        if !(MIN_STAT_VALUE..=MAX_STAT_VALUE).contains(&value) {
            return Err(CreationError::StatOutOfRange { stat, value });
        }
    }

    let total = stats.total();
    if total != POINT_BUY_TOTAL {
        return Err(CreationError::PointBuyTotal(total));
    }

    Ok(stats)
}

/// Per-stat racial adjustment.
pub const fn racial_modifiers(race: Race) -> PrimaryStats {
    match race {
        Race::Human => PrimaryStats::uniform(1),
        Race::Elf => PrimaryStats::new(0, 2, 0, 1, 1, 0),
        Race::Dwarf => PrimaryStats::new(1, 0, 2, 0, 1, 0),
        Race::Tiefling => PrimaryStats::new(0, 0, 0, 1, 0, 2),
        Race::Dragonborn => PrimaryStats::new(2, 0, 0, 0, 0, 1),
        Race::Undead => PrimaryStats::new(0, 0, -1, 2, 0, -1),
    }
}

pub fn apply_racial_modifiers(stats: PrimaryStats, race: Race) -> PrimaryStats {
    let delta = racial_modifiers(race);
    let mut out = stats;
    for stat in StatKind::ALL {
        *out.get_mut(stat) += delta.get(stat);
    }
    out
}

/// Stats a class favours, most important first.
pub const fn primary_stats(class: ClassKind) -> [StatKind; 3] {
    use StatKind::*;
    match class {
        ClassKind::Warrior => [Strength, Constitution, Dexterity],
        ClassKind::Sorcerer => [Intelligence, Wisdom, Constitution],
        ClassKind::Rogue => [Dexterity, Charisma, Intelligence],
        ClassKind::Paladin => [Strength, Charisma, Constitution],
        ClassKind::Necromancer => [Intelligence, Wisdom, Charisma],
        ClassKind::Ranger => [Dexterity, Wisdom, Constitution],
    }
}

/// Maximum health, stamina and mana.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resources {
    pub health: i32,
    pub stamina: i32,
    pub mana: i32,
}

/// Class resources before stat adjustments.
pub const fn class_base(class: ClassKind) -> Resources {
    let (health, stamina, mana) = match class {
        ClassKind::Warrior => (120, 120, 50),
        ClassKind::Sorcerer => (70, 70, 150),
        ClassKind::Rogue => (90, 130, 60),
        ClassKind::Paladin => (110, 100, 90),
        ClassKind::Necromancer => (80, 80, 140),
        ClassKind::Ranger => (95, 110, 80),
    };
    Resources {
        health,
        stamina,
        mana,
    }
}

/// Level-one maxima: health +5×CON mod, stamina +3×CON mod,
/// mana +5×INT mod +3×WIS mod.
pub fn starting_resources(class: ClassKind, stats: &PrimaryStats) -> Resources {
    let base = class_base(class);
    let con = stat_modifier(stats.constitution);
    let int = stat_modifier(stats.intelligence);
    let wis = stat_modifier(stats.wisdom);

    Resources {
        health: base.health + con * 5,
        stamina: base.stamina + con * 3,
        mana: base.mana + int * 5 + wis * 3,
    }
}

/// Class starting kit: weapon, armor and one utility item, all unequipped.
pub fn starting_items(class: ClassKind) -> Vec<EquipmentItem> {
    use ItemKind::*;

    let item = |name: &str, kind: ItemKind| EquipmentItem::new(name, kind);
    match class {
        ClassKind::Warrior => vec![
            item("Iron Longsword", Weapon)
                .with_description("A sturdy iron longsword, well-balanced for combat.")
                .with_attack(10),
            item("Leather Armor", Armor)
                .with_description("Basic leather armor providing modest protection.")
                .with_defense(5),
            item("Health Potion", Consumable)
                .with_description("Restores 50 health points.")
                .with_quantity(3),
        ],
        ClassKind::Sorcerer => vec![
            item("Wooden Staff", Weapon)
                .with_description("A simple staff imbued with magical energy.")
                .with_attack(5)
                .with_magic(8),
            item("Cloth Robes", Armor)
                .with_description("Light robes that enhance magical abilities.")
                .with_defense(2)
                .with_magic(5),
            item("Mana Potion", Consumable)
                .with_description("Restores 50 mana points.")
                .with_quantity(5),
        ],
        ClassKind::Rogue => vec![
            item("Steel Dagger", Weapon)
                .with_description("A sharp dagger perfect for quick strikes.")
                .with_attack(8),
            item("Light Leather Armor", Armor)
                .with_description("Lightweight armor for stealth and agility.")
                .with_defense(3),
            item("Lockpick Set", Tool).with_description("A set of tools for opening locks."),
        ],
        ClassKind::Paladin => vec![
            item("Blessed Mace", Weapon)
                .with_description("A mace blessed with holy power.")
                .with_attack(9)
                .with_magic(3),
            item("Chainmail Armor", Armor)
                .with_description("Heavy chainmail providing solid protection.")
                .with_defense(7),
            item("Holy Water", Consumable)
                .with_description("Blessed water that heals and protects.")
                .with_quantity(2),
        ],
        ClassKind::Necromancer => vec![
            item("Bone Staff", Weapon)
                .with_description("A staff crafted from ancient bones.")
                .with_attack(4)
                .with_magic(10),
            item("Dark Robes", Armor)
                .with_description("Robes steeped in necromantic energy.")
                .with_defense(2)
                .with_magic(6),
            item("Soul Gem", QuestItem).with_description("A gem used to capture and store souls."),
        ],
        ClassKind::Ranger => vec![
            item("Hunting Bow", Weapon)
                .with_description("A well-crafted bow for ranged combat.")
                .with_attack(9),
            item("Leather Armor", Armor)
                .with_description("Flexible leather armor for mobility.")
                .with_defense(4),
            item("Arrows", Consumable)
                .with_description("Standard arrows for your bow.")
                .with_quantity(50),
        ],
    }
}

/// Checks length, alphabet and uniqueness of a character name.
pub fn validate_name(name: &str, is_taken: impl Fn(&str) -> bool) -> Result<(), CreationError> {
    let length = name.chars().count();
    if length < MIN_NAME_LENGTH {
        return Err(CreationError::NameTooShort);
    }
    if length > MAX_NAME_LENGTH {
        return Err(CreationError::NameTooLong);
    }
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, ' ' | '\'' | '-'))
    {
        return Err(CreationError::InvalidNameCharacters);
    }
    if is_taken(name) {
        return Err(CreationError::NameTaken(name.to_string()));
    }
    Ok(())
}

/// Everything the player picks at character creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterSpec {
    pub name: String,
    pub race: Race,
    pub class: ClassKind,
    pub faction: Faction,
    /// Pre-allocated stats. Rolled with `method` when absent.
    pub stats: Option<PrimaryStats>,
    pub method: StatMethod,
    pub is_player: bool,
}

impl CharacterSpec {
    pub fn new(name: impl Into<String>, race: Race, class: ClassKind) -> Self {
        Self {
            name: name.into(),
            race,
            class,
            faction: Faction::None,
            stats: None,
            method: StatMethod::default(),
            is_player: true,
        }
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_stats(mut self, stats: PrimaryStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_method(mut self, method: StatMethod) -> Self {
        self.method = method;
        self
    }

    pub fn npc(mut self) -> Self {
        self.is_player = false;
        self
    }
}

/// Builds a level-one character at full resources.
///
/// Rolls stats first (when not supplied), then starting souls.
pub fn create_character(
    spec: CharacterSpec,
    is_taken: impl Fn(&str) -> bool,
    rng: &mut dyn RngOracle,
) -> Result<CharacterSnapshot, CreationError> {
    validate_name(&spec.name, is_taken)?;

    let base = match spec.stats {
        Some(stats) => stats,
        None => roll_stats(spec.method, rng),
    };
    let stats = apply_racial_modifiers(base, spec.race);
    let resources = starting_resources(spec.class, &stats);
    let souls = rng.range(STARTING_SOULS.0, STARTING_SOULS.1);

    tracing::info!(
        name = %spec.name,
        race = %spec.race,
        class = %spec.class,
        "character created"
    );

    Ok(CharacterSnapshot {
        name: spec.name,
        is_player: spec.is_player,
        race: spec.race,
        class: spec.class,
        faction: spec.faction,
        level: 1,
        experience: 0,
        souls,
        stats,
        health: resources.health,
        max_health: resources.health,
        stamina: resources.stamina,
        max_stamina: resources.stamina,
        mana: resources.mana,
        max_mana: resources.mana,
        inventory: starting_items(spec.class),
    })
}
