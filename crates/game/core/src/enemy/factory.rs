//! Builds level-scaled enemy characters from templates.

use super::template::EnemyTemplate;
use crate::state::{CharacterSnapshot, ClassKind, Faction, Race};

/// Mana given to every spawned enemy.
pub const ENEMY_MANA: i32 = 50;

/// Stat multiplier for an enemy of `level`: `1 + (level - 1) × 0.15`.
pub fn level_multiplier(level: u32) -> f64 {
    1.0 + f64::from(level.saturating_sub(1)) * 0.15
}

/// Creates an enemy character from a template.
///
/// `level_override` of `None` or `Some(0)` keeps the template level. All six
/// stats, health and stamina are multiplied by [`level_multiplier`] and
/// rounded down.
pub fn create_enemy(template: &EnemyTemplate, level_override: Option<u32>) -> CharacterSnapshot {
    let level = level_override
        .filter(|level| *level > 0)
        .unwrap_or(template.level);
    let multiplier = level_multiplier(level);
    let scale = |value: i32| (f64::from(value) * multiplier).floor() as i32;

    let health = scale(template.base_health);
    let stamina = scale(template.base_stamina);

    let enemy = CharacterSnapshot {
        name: format!("{} (Lv{})", template.name, level),
        is_player: false,
        race: Race::Undead,
        class: ClassKind::Warrior,
        faction: Faction::Shadowborn,
        level,
        experience: 0,
        souls: 0,
        stats: template.base_stats.map(scale),
        health,
        max_health: health,
        stamina,
        max_stamina: stamina,
        mana: ENEMY_MANA,
        max_mana: ENEMY_MANA,
        inventory: Vec::new(),
    };

    tracing::info!(enemy = %enemy.name, "created enemy");
    enemy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PrimaryStats;

    fn soldier() -> EnemyTemplate {
        EnemyTemplate::builder("Hollow Soldier")
            .pools(50, 80)
            .stats(10, 8, 10, 6)
            .build()
    }

    #[test]
    fn template_level_keeps_base_values() {
        let enemy = create_enemy(&soldier(), None);
        assert_eq!(enemy.name, "Hollow Soldier (Lv1)");
        assert_eq!(enemy.stats, PrimaryStats::new(10, 8, 10, 6, 10, 5));
        assert_eq!((enemy.health, enemy.max_health), (50, 50));
        assert_eq!((enemy.stamina, enemy.max_stamina), (80, 80));
        assert_eq!((enemy.mana, enemy.max_mana), (50, 50));
        assert!(!enemy.is_player);
        assert_eq!(enemy.race, Race::Undead);
        assert_eq!(enemy.faction, Faction::Shadowborn);
    }

    #[test]
    fn level_override_scales_and_floors() {
        // ×1.6 at level 5
        let enemy = create_enemy(&soldier(), Some(5));
        assert_eq!(enemy.level, 5);
        assert_eq!(enemy.name, "Hollow Soldier (Lv5)");
        assert_eq!(enemy.stats, PrimaryStats::new(16, 12, 16, 9, 16, 8));
        assert_eq!(enemy.max_health, 80);
        assert_eq!(enemy.max_stamina, 128);
        assert_eq!(enemy.max_mana, 50);
    }

    #[test]
    fn zero_override_means_template_level() {
        assert_eq!(create_enemy(&soldier(), Some(0)).level, 1);
    }
}
