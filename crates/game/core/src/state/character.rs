//! Character snapshot consumed and produced by combat.
//!
//! The snapshot is owned by the persistence layer. Combat works on an in-memory
//! copy and only hands back rewards and final health.

/// The six primary ability scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryStats {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl PrimaryStats {
    pub const fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// All six scores set to the same value.
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    pub const fn get(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::Strength => self.strength,
            StatKind::Dexterity => self.dexterity,
            StatKind::Constitution => self.constitution,
            StatKind::Intelligence => self.intelligence,
            StatKind::Wisdom => self.wisdom,
            StatKind::Charisma => self.charisma,
        }
    }

    pub fn get_mut(&mut self, stat: StatKind) -> &mut i32 {
        match stat {
            StatKind::Strength => &mut self.strength,
            StatKind::Dexterity => &mut self.dexterity,
            StatKind::Constitution => &mut self.constitution,
            StatKind::Intelligence => &mut self.intelligence,
            StatKind::Wisdom => &mut self.wisdom,
            StatKind::Charisma => &mut self.charisma,
        }
    }

    /// Sum of all six scores.
    pub fn total(&self) -> i32 {
        StatKind::ALL.iter().map(|s| self.get(*s)).sum()
    }

    /// Applies `f` to every score.
    pub fn map(self, mut f: impl FnMut(i32) -> i32) -> Self {
        Self::new(
            f(self.strength),
            f(self.dexterity),
            f(self.constitution),
            f(self.intelligence),
            f(self.wisdom),
            f(self.charisma),
        )
    }
}

impl Default for PrimaryStats {
    fn default() -> Self {
        Self::uniform(10)
    }
}

/// Names a primary stat.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Strength,
        StatKind::Dexterity,
        StatKind::Constitution,
        StatKind::Intelligence,
        StatKind::Wisdom,
        StatKind::Charisma,
    ];
}

/// Character class.
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
pub enum ClassKind {
    #[default]
    Warrior,
    Sorcerer,
    Rogue,
    Paladin,
    Necromancer,
    Ranger,
}

impl ClassKind {
    pub const ALL: [ClassKind; 6] = [
        ClassKind::Warrior,
        ClassKind::Sorcerer,
        ClassKind::Rogue,
        ClassKind::Paladin,
        ClassKind::Necromancer,
        ClassKind::Ranger,
    ];
}

/// Character race (ancestry).
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
pub enum Race {
    #[default]
    Human,
    Elf,
    Dwarf,
    Tiefling,
    Dragonborn,
    /// Also the placeholder race of every spawned enemy.
    Undead,
}

/// Allegiance.
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
pub enum Faction {
    #[default]
    None,
    CrimsonCovenant,
    AetherSeekers,
    IronBrotherhood,
    MoonlitCircle,
    /// Also the placeholder faction of every spawned enemy.
    Shadowborn,
    GoldenOrder,
}

/// Inventory item category.
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
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Tool,
    QuestItem,
    #[default]
    Misc,
}

impl ItemKind {
    /// Only weapons and armor can be equipped.
    pub const fn is_equippable(&self) -> bool {
        matches!(self, Self::Weapon | Self::Armor)
    }
}

/// An inventory item carried by a character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipmentItem {
    pub name: String,
    pub kind: ItemKind,
    pub description: String,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub magic_bonus: i32,
    pub quantity: u32,
    pub equipped: bool,
}

impl EquipmentItem {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            quantity: 1,
            ..Self::default()
        }
    }

    pub fn with_attack(mut self, bonus: i32) -> Self {
        self.attack_bonus = bonus;
        self
    }

    pub fn with_defense(mut self, bonus: i32) -> Self {
        self.defense_bonus = bonus;
        self
    }

    pub fn with_magic(mut self, bonus: i32) -> Self {
        self.magic_bonus = bonus;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn equipped(mut self) -> Self {
        self.equipped = true;
        self
    }
}

/// Read-mostly character record handed to combat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSnapshot {
    pub name: String,
    pub is_player: bool,
    pub race: Race,
    pub class: ClassKind,
    pub faction: Faction,
    pub level: u32,
    pub experience: u32,
    pub souls: i32,
    pub stats: PrimaryStats,
    pub health: i32,
    pub max_health: i32,
    pub stamina: i32,
    pub max_stamina: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub inventory: Vec<EquipmentItem>,
}

impl CharacterSnapshot {
    /// Items currently equipped.
    pub fn equipped(&self) -> impl Iterator<Item = &EquipmentItem> {
        self.inventory.iter().filter(|item| item.equipped)
    }

    /// Sets every pool to its maximum.
    pub fn restore_all(&mut self) {
        self.health = self.max_health;
        self.stamina = self.max_stamina;
        self.mana = self.max_mana;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
