//! Experience, level-ups, resting and inventory upkeep between fights.

use shards_core::{CharacterSnapshot, ClassKind, PrimaryStats};

use crate::creation::starting_resources;

/// Total experience required to reach each level, starting at level 1.
pub const EXPERIENCE_PER_LEVEL: [u32; 25] = [
    0, 100, 300, 600, 1000, 1500, 2100, 2800, 3600, 4500, 5500, 6600, 7800, 9100, 10500, 12000,
    13600, 15300, 17100, 19000, 21000, 23100, 25300, 27600, 30000,
];

pub const MAX_LEVEL: u32 = EXPERIENCE_PER_LEVEL.len() as u32;

pub const HEALTH_PER_LEVEL: i32 = 10;
pub const STAMINA_PER_LEVEL: i32 = 8;
pub const MANA_PER_LEVEL: i32 = 12;

/// Experience needed to reach `level`, if the level exists.
pub fn experience_for_level(level: u32) -> Option<u32> {
    let index = usize::try_from(level.checked_sub(1)?).ok()?;
    EXPERIENCE_PER_LEVEL.get(index).copied()
}

/// Experience still missing for the next level, `None` at the cap.
pub fn experience_to_next(character: &CharacterSnapshot) -> Option<u32> {
    experience_for_level(character.level + 1).map(|t| t.saturating_sub(character.experience))
}

/// Stats gained per level: CON +1 for everyone plus the class growth.
pub const fn level_growth(class: ClassKind) -> PrimaryStats {
    match class {
        ClassKind::Warrior => PrimaryStats::new(2, 0, 2, 0, 0, 0),
        ClassKind::Sorcerer => PrimaryStats::new(0, 0, 1, 2, 1, 0),
        ClassKind::Rogue => PrimaryStats::new(0, 2, 1, 0, 0, 1),
        ClassKind::Paladin => PrimaryStats::new(1, 0, 2, 0, 0, 1),
        ClassKind::Necromancer => PrimaryStats::new(0, 0, 1, 2, 0, 1),
        ClassKind::Ranger => PrimaryStats::new(0, 1, 2, 0, 1, 0),
    }
}

/// Result of [`add_experience`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelProgress {
    pub experience: u32,
    pub leveled_up: bool,
    pub level: u32,
}

/// Adds experience and levels up as many times as the thresholds allow.
pub fn add_experience(character: &mut CharacterSnapshot, amount: u32) -> LevelProgress {
    let old_level = character.level;
    character.experience = character.experience.saturating_add(amount);

    while should_level_up(character) {
        level_up(character);
    }

    let leveled_up = character.level > old_level;
    if leveled_up {
        tracing::info!(
            name = %character.name,
            from = old_level,
            to = character.level,
            "character leveled up"
        );
    }

    LevelProgress {
        experience: character.experience,
        leveled_up,
        level: character.level,
    }
}

fn should_level_up(character: &CharacterSnapshot) -> bool {
    character.level < MAX_LEVEL
        && experience_for_level(character.level + 1)
            .is_some_and(|threshold| character.experience >= threshold)
}

fn level_up(character: &mut CharacterSnapshot) {
    character.level += 1;

    let growth = level_growth(character.class);
    let stats = &mut character.stats;
    stats.strength += growth.strength;
    stats.dexterity += growth.dexterity;
    stats.constitution += growth.constitution;
    stats.intelligence += growth.intelligence;
    stats.wisdom += growth.wisdom;
    stats.charisma += growth.charisma;

    let base = starting_resources(character.class, &character.stats);
    let levels = character.level as i32 - 1;
    character.max_health = base.health + levels * HEALTH_PER_LEVEL;
    character.max_stamina = base.stamina + levels * STAMINA_PER_LEVEL;
    character.max_mana = base.mana + levels * MANA_PER_LEVEL;
    character.restore_all();
}

/// How much a rest restores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestKind {
    #[default]
    Full,
    /// Half of each maximum, capped at the maximum.
    Partial,
}

/// Amounts actually restored by a rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Restored {
    pub health: i32,
    pub stamina: i32,
    pub mana: i32,
}

pub fn rest(character: &mut CharacterSnapshot, kind: RestKind) -> Restored {
    let refill = |current: &mut i32, max: i32| -> i32 {
        let amount = match kind {
            RestKind::Full => max,
            RestKind::Partial => max / 2,
        };
        let before = *current;
        *current = (before + amount).min(max).max(before);
        *current - before
    };

    let restored = Restored {
        health: refill(&mut character.health, character.max_health),
        stamina: refill(&mut character.stamina, character.max_stamina),
        mana: refill(&mut character.mana, character.max_mana),
    };

    tracing::info!(name = %character.name, ?kind, "character rested");
    restored
}

/// Adds (or with a negative amount removes) souls, floored at zero.
pub fn add_souls(character: &mut CharacterSnapshot, amount: i32) -> i32 {
    character.souls = character.souls.saturating_add(amount).max(0);
    character.souls
}

/// Toggles an item's equipped state by name.
///
/// Equipping unequips any other item of the same kind. Returns false when the
/// item is missing or cannot be equipped.
pub fn equip(character: &mut CharacterSnapshot, item_name: &str) -> bool {
    let Some(index) = character
        .inventory
        .iter()
        .position(|item| item.name == item_name)
    else {
        return false;
    };

    let kind = character.inventory[index].kind;
    if !kind.is_equippable() {
        tracing::warn!(item = item_name, %kind, "item cannot be equipped");
        return false;
    }

    let equipping = !character.inventory[index].equipped;
    if equipping {
        for other in character.inventory.iter_mut().filter(|i| i.kind == kind) {
            other.equipped = false;
        }
    }
    character.inventory[index].equipped = equipping;

    tracing::info!(
        item = item_name,
        equipped = equipping,
        "equipment changed"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creation::{CharacterSpec, create_character};
    use shards_core::{ItemKind, Race, ScriptedRng};

    fn warrior() -> CharacterSnapshot {
        let spec = CharacterSpec::new("Test Warrior", Race::Human, ClassKind::Warrior)
            .with_stats(PrimaryStats::uniform(10));
        create_character(spec, |_| false, &mut ScriptedRng::constant(0.0)).unwrap()
    }

    #[test]
    fn thresholds() {
        assert_eq!(experience_for_level(1), Some(0));
        assert_eq!(experience_for_level(2), Some(100));
        assert_eq!(experience_for_level(25), Some(30000));
        assert_eq!(experience_for_level(26), None);
        assert_eq!(experience_for_level(0), None);
    }

    #[test]
    fn below_threshold_keeps_level() {
        let mut hero = warrior();
        let progress = add_experience(&mut hero, 99);
        assert_eq!(
            progress,
            LevelProgress {
                experience: 99,
                leveled_up: false,
                level: 1
            }
        );
        assert_eq!(experience_to_next(&hero), Some(1));
    }

    #[test]
    fn multiple_levels_at_once() {
        let mut hero = warrior();
        hero.health = 1;

        let progress = add_experience(&mut hero, 600);
        assert!(progress.leveled_up);
        assert_eq!(progress.level, 4);

        // 11 + 3 × 2 strength, 11 + 3 × 2 constitution
        assert_eq!(hero.stats.strength, 17);
        assert_eq!(hero.stats.constitution, 17);
        // con 17 → +3: 120 + 15 + 3 × 10
        assert_eq!(hero.max_health, 165);
        assert_eq!(hero.health, hero.max_health);
        assert_eq!(hero.max_stamina, 120 + 9 + 24);
    }

    #[test]
    fn level_cap() {
        let mut hero = warrior();
        let progress = add_experience(&mut hero, 1_000_000);
        assert_eq!(progress.level, MAX_LEVEL);
        assert_eq!(experience_to_next(&hero), None);
    }

    #[test]
    fn partial_rest_restores_half() {
        let mut hero = warrior();
        hero.health = 10;
        hero.stamina = 100;
        hero.mana = 0;

        let restored = rest(&mut hero, RestKind::Partial);
        assert_eq!(
            restored,
            Restored {
                health: 60,
                stamina: 20,
                mana: 25
            }
        );
        assert_eq!((hero.health, hero.stamina, hero.mana), (70, 120, 25));

        let restored = rest(&mut hero, RestKind::Full);
        assert_eq!(restored.health, 50);
        assert_eq!(hero.mana, hero.max_mana);
    }

    #[test]
    fn souls_never_go_negative() {
        let mut hero = warrior();
        assert_eq!(add_souls(&mut hero, 25), 75);
        assert_eq!(add_souls(&mut hero, -500), 0);
    }

    #[test]
    fn equip_swaps_within_kind() {
        let mut hero = warrior();
        hero.inventory
            .push(shards_core::EquipmentItem::new("Rusty Sword", ItemKind::Weapon).with_attack(2));

        assert!(equip(&mut hero, "Iron Longsword"));
        assert!(equip(&mut hero, "Rusty Sword"));
        let equipped: Vec<&str> = hero.equipped().map(|i| i.name.as_str()).collect();
        assert_eq!(equipped, vec!["Rusty Sword"]);

        // toggling again unequips
        assert!(equip(&mut hero, "Rusty Sword"));
        assert!(hero.equipped().next().is_none());
    }

    #[test]
    fn consumables_and_missing_items_cannot_equip() {
        let mut hero = warrior();
        assert!(!equip(&mut hero, "Health Potion"));
        assert!(!equip(&mut hero, "Excalibur"));
    }
}
