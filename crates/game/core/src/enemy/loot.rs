use super::template::EnemyTemplate;
use crate::env::RngOracle;

/// Rolled drops of one defeated enemy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loot {
    pub souls: i32,
    pub items: Vec<String>,
}

/// Rolls loot: souls first, then guaranteed drops, then one independent roll
/// per weighted drop in table order.
pub fn generate_loot(template: &EnemyTemplate, rng: &mut (impl RngOracle + ?Sized)) -> Loot {
    let table = template.loot_table();
    let (min, max) = table.souls;
    let souls = rng.range(min, max);

    let mut items = table.guaranteed.clone();
    for drop in &table.items {
        if rng.chance(drop.chance) {
            items.push(drop.name.clone());
        }
    }

    tracing::debug!(
        enemy = %template.name,
        souls,
        items = items.len(),
        "generated loot"
    );

    Loot { souls, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{EnemyTier, LootTable};
    use crate::env::ScriptedRng;

    fn knight() -> EnemyTemplate {
        EnemyTemplate::builder("Knight")
            .tier(EnemyTier::Elite)
            .loot(
                LootTable::new((80, 150))
                    .with_drop("Knight's Shield", 0.15)
                    .with_drop("Estus Shard", 0.3)
                    .with_guaranteed("Knight's Crest"),
            )
            .build()
    }

    #[test]
    fn guaranteed_first_then_rolled_drops() {
        // souls roll, shield roll (miss), shard roll (hit)
        let mut rng = ScriptedRng::new(vec![0.0, 0.5, 0.2]);
        let loot = generate_loot(&knight(), &mut rng);
        assert_eq!(loot.souls, 80);
        assert_eq!(loot.items, vec!["Knight's Crest", "Estus Shard"]);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn souls_stay_in_range() {
        let mut rng = ScriptedRng::constant(0.999);
        let loot = generate_loot(&knight(), &mut rng);
        assert_eq!(loot.souls, 150);
        assert_eq!(loot.items, vec!["Knight's Crest"]);
    }

    #[test]
    fn tier_default_table_has_no_items() {
        let rat = EnemyTemplate::builder("Rat").build();
        let loot = generate_loot(&rat, &mut ScriptedRng::constant(0.0));
        assert_eq!(loot.souls, 10);
        assert!(loot.items.is_empty());
    }
}
