//! Built-in class ability catalog.
//!
//! Four to five abilities per class, kept in menu order. The catalog is built
//! once on first use and shared read-only afterwards.

use std::sync::OnceLock;

use shards_core::{
    Ability, AbilityEffect, AbilityFlags, AbilityOracle, ClassKind, DamageType, ResourceKind,
    Stance, StatKind, StatusEffectKind, StatusRider, TargetKind,
};

static BUILTIN: OnceLock<AbilityRegistry> = OnceLock::new();

/// Ability definitions grouped by class, in catalog order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbilityRegistry {
    abilities: Vec<Ability>,
}

impl AbilityRegistry {
    pub fn new(abilities: Vec<Ability>) -> Self {
        Self { abilities }
    }

    /// Shared catalog of every class ability.
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| {
            let registry = Self::new(builtin_abilities());
            tracing::debug!(count = registry.len(), "ability catalog initialised");
            registry
        })
    }

    pub fn all(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl AbilityOracle for AbilityRegistry {
    fn abilities_for(&self, class: ClassKind) -> Vec<&Ability> {
        self.abilities.iter().filter(|a| a.class == class).collect()
    }
}

/// Staged ability definition. Abilities can critically hit unless told
/// otherwise and scale at 1.0 when no factor is given.
struct Draft {
    ability: Ability,
}

impl Draft {
    fn new(class: ClassKind, name: &str, description: &str) -> Self {
        Self {
            ability: Ability {
                name: name.to_string(),
                description: description.to_string(),
                class,
                resource: ResourceKind::Stamina,
                cost: 0,
                cooldown: 0,
                target: TargetKind::SingleEnemy,
                effect: AbilityEffect::Inert,
                scales_with: Vec::new(),
                scaling_factor: 1.0,
                flags: AbilityFlags::CAN_CRITICAL,
            },
        }
    }

    fn costs(mut self, resource: ResourceKind, cost: i32, cooldown: i32) -> Self {
        self.ability.resource = resource;
        self.ability.cost = cost;
        self.ability.cooldown = cooldown;
        self
    }

    fn targets(mut self, target: TargetKind) -> Self {
        self.ability.target = target;
        self
    }

    fn effect(mut self, effect: AbilityEffect) -> Self {
        self.ability.effect = effect;
        self
    }

    fn scales(mut self, stats: &[StatKind], factor: f64) -> Self {
        self.ability.scales_with = stats.to_vec();
        self.ability.scaling_factor = factor;
        self
    }

    fn no_critical(mut self) -> Self {
        self.ability.flags.remove(AbilityFlags::CAN_CRITICAL);
        self
    }

    fn ignores_defense(mut self) -> Self {
        self.ability.flags.insert(AbilityFlags::IGNORES_DEFENSE);
        self
    }

    fn requires_weapon(mut self) -> Self {
        self.ability.flags.insert(AbilityFlags::REQUIRES_WEAPON);
        self
    }

    fn build(self) -> Ability {
        self.ability
    }
}

fn damage(amount: i32, damage_type: DamageType) -> AbilityEffect {
    AbilityEffect::Damage {
        amount,
        damage_type,
        rider: None,
    }
}

fn damage_with(
    amount: i32,
    damage_type: DamageType,
    kind: StatusEffectKind,
    duration: i32,
    potency: i32,
) -> AbilityEffect {
    AbilityEffect::Damage {
        amount,
        damage_type,
        rider: Some(StatusRider::new(kind, duration, potency)),
    }
}

fn status(kind: StatusEffectKind, duration: i32, potency: i32) -> AbilityEffect {
    AbilityEffect::Status(StatusRider::new(kind, duration, potency))
}

/// Every class ability, Warrior through Ranger.
pub fn builtin_abilities() -> Vec<Ability> {
    use ClassKind::*;
    use ResourceKind::{Health, Mana, Stamina};
    use StatKind::*;
    use StatusEffectKind as S;
    use TargetKind::*;

    vec![
        // ===== Warrior =====
        Draft::new(Warrior, "Whirlwind Strike", "A powerful spinning attack that hits all nearby enemies")
            .costs(Stamina, 40, 3)
            .targets(AllEnemies)
            .effect(damage(25, DamageType::Physical))
            .scales(&[Strength, Dexterity], 1.5)
            .build(),
        Draft::new(Warrior, "Shield Bash", "Bash an enemy with your shield, dealing damage and stunning them")
            .costs(Stamina, 30, 2)
            .effect(damage_with(20, DamageType::Physical, S::Stun, 1, 0))
            .scales(&[Strength], 1.2)
            .requires_weapon()
            .build(),
        Draft::new(Warrior, "Battle Cry", "Unleash a war cry that boosts your attack power")
            .costs(Stamina, 25, 4)
            .targets(OnSelf)
            .effect(status(S::StrengthBuff, 3, 0))
            .no_critical()
            .build(),
        Draft::new(Warrior, "Execute", "Devastating attack that deals massive damage to low-health enemies")
            .costs(Stamina, 50, 5)
            .effect(damage(60, DamageType::Physical))
            .scales(&[Strength], 2.0)
            .build(),
        // ===== Sorcerer =====
        Draft::new(Sorcerer, "Fireball", "Launch a ball of fire at your enemy")
            .costs(Mana, 30, 1)
            .effect(damage_with(35, DamageType::Fire, S::Burn, 3, 5))
            .scales(&[Intelligence], 2.0)
            .ignores_defense()
            .build(),
        Draft::new(Sorcerer, "Ice Storm", "Summon a storm of ice that damages and slows all enemies")
            .costs(Mana, 50, 4)
            .targets(AllEnemies)
            .effect(damage_with(25, DamageType::Frost, S::Frost, 2, 3))
            .scales(&[Intelligence, Wisdom], 1.8)
            .ignores_defense()
            .build(),
        Draft::new(Sorcerer, "Mana Shield", "Convert mana into a protective barrier")
            .costs(Mana, 40, 3)
            .targets(OnSelf)
            .effect(status(S::DefenseBuff, 3, 0))
            .scales(&[Intelligence], 1.0)
            .no_critical()
            .build(),
        Draft::new(Sorcerer, "Lightning Bolt", "Strike your enemy with a bolt of lightning")
            .costs(Mana, 35, 2)
            .effect(damage(45, DamageType::Lightning))
            .scales(&[Intelligence], 2.2)
            .ignores_defense()
            .build(),
        Draft::new(Sorcerer, "Arcane Regeneration", "Channel arcane energy to restore health over time")
            .costs(Mana, 45, 5)
            .targets(OnSelf)
            .effect(status(S::Regeneration, 5, 8))
            .scales(&[Wisdom], 1.0)
            .no_critical()
            .build(),
        // ===== Rogue =====
        Draft::new(Rogue, "Backstab", "Strike from the shadows for massive critical damage")
            .costs(Stamina, 35, 3)
            .effect(damage(40, DamageType::Physical))
            .scales(&[Dexterity, Strength], 2.5)
            .build(),
        Draft::new(Rogue, "Poison Blade", "Coat your weapon in deadly poison")
            .costs(Stamina, 25, 4)
            .effect(damage_with(15, DamageType::Poison, S::Poison, 5, 7))
            .scales(&[Dexterity], 1.3)
            .build(),
        Draft::new(Rogue, "Shadow Step", "Teleport behind your enemy and gain evasion")
            .costs(Stamina, 30, 3)
            .targets(OnSelf)
            .effect(AbilityEffect::StanceShift(Stance::Dodging))
            .no_critical()
            .build(),
        Draft::new(Rogue, "Fan of Knives", "Throw multiple knives at all enemies")
            .costs(Stamina, 45, 4)
            .targets(AllEnemies)
            .effect(damage_with(20, DamageType::Physical, S::Bleed, 3, 4))
            .scales(&[Dexterity], 1.6)
            .build(),
        // ===== Paladin =====
        Draft::new(Paladin, "Divine Smite", "Channel holy energy into a devastating strike")
            .costs(Mana, 35, 2)
            .effect(damage(40, DamageType::Holy))
            .scales(&[Strength, Charisma], 1.8)
            .build(),
        Draft::new(Paladin, "Lay on Hands", "Heal yourself with divine magic")
            .costs(Mana, 40, 4)
            .targets(OnSelf)
            .effect(AbilityEffect::Heal {
                amount: 50,
                rider: None,
            })
            .scales(&[Charisma, Wisdom], 2.0)
            .no_critical()
            .build(),
        Draft::new(Paladin, "Holy Shield", "Summon a shield of light that protects you")
            .costs(Mana, 30, 5)
            .targets(OnSelf)
            .effect(status(S::DefenseBuff, 4, 0))
            .no_critical()
            .build(),
        Draft::new(Paladin, "Judgement", "Call down holy wrath on all enemies")
            .costs(Mana, 60, 5)
            .targets(AllEnemies)
            .effect(damage(30, DamageType::Holy))
            .scales(&[Strength, Charisma], 1.5)
            .ignores_defense()
            .build(),
        // ===== Necromancer =====
        Draft::new(Necromancer, "Death Bolt", "Fire a bolt of necrotic energy")
            .costs(Mana, 30, 1)
            .effect(damage(35, DamageType::Dark))
            .scales(&[Intelligence], 2.0)
            .ignores_defense()
            .build(),
        Draft::new(Necromancer, "Life Drain", "Drain life from your enemy to heal yourself")
            .costs(Mana, 40, 3)
            .effect(AbilityEffect::Drain {
                damage: 30,
                heal: 20,
                damage_type: DamageType::Dark,
            })
            .scales(&[Intelligence], 1.5)
            .build(),
        Draft::new(Necromancer, "Curse of Weakness", "Curse an enemy, reducing their attack power")
            .costs(Mana, 35, 4)
            .effect(status(S::Weakness, 4, 0))
            .no_critical()
            .build(),
        Draft::new(Necromancer, "Dark Ritual", "Sacrifice health to restore mana")
            .costs(Health, 30, 3)
            .targets(OnSelf)
            .effect(AbilityEffect::ResourceConversion {
                into: Mana,
                amount: 30,
            })
            .no_critical()
            .build(),
        Draft::new(Necromancer, "Plague Cloud", "Summon a cloud of disease that poisons all enemies")
            .costs(Mana, 55, 5)
            .targets(AllEnemies)
            .effect(damage_with(15, DamageType::Poison, S::Poison, 4, 8))
            .scales(&[Intelligence], 1.3)
            .build(),
        // ===== Ranger =====
        Draft::new(Ranger, "Precise Shot", "A carefully aimed shot with increased critical chance")
            .costs(Stamina, 25, 2)
            .effect(damage(35, DamageType::Physical))
            .scales(&[Dexterity], 2.0)
            .build(),
        Draft::new(Ranger, "Multi-Shot", "Fire arrows at all enemies")
            .costs(Stamina, 40, 3)
            .targets(AllEnemies)
            .effect(damage(20, DamageType::Physical))
            .scales(&[Dexterity], 1.5)
            .build(),
        Draft::new(Ranger, "Hunter's Mark", "Mark an enemy, increasing damage dealt to them")
            .costs(Stamina, 20, 4)
            .no_critical()
            .build(),
        Draft::new(Ranger, "Nature's Blessing", "Call upon nature to heal your wounds")
            .costs(Mana, 35, 4)
            .targets(OnSelf)
            .effect(AbilityEffect::Heal {
                amount: 40,
                rider: Some(StatusRider::new(S::Regeneration, 3, 5)),
            })
            .scales(&[Wisdom], 1.5)
            .no_critical()
            .build(),
        Draft::new(Ranger, "Explosive Arrow", "Fire an arrow that explodes on impact")
            .costs(Stamina, 50, 5)
            .targets(Area)
            .effect(damage_with(40, DamageType::Fire, S::Burn, 2, 6))
            .scales(&[Dexterity], 1.8)
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_has_its_abilities() {
        let registry = AbilityRegistry::builtin();
        assert_eq!(registry.len(), 27);

        let counts: Vec<usize> = ClassKind::ALL
            .iter()
            .map(|class| registry.abilities_for(*class).len())
            .collect();
        assert_eq!(counts, vec![4, 5, 4, 4, 5, 5]);
    }

    #[test]
    fn names_are_unique() {
        let registry = AbilityRegistry::builtin();
        let mut names: Vec<&str> = registry.all().iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), registry.len());
    }

    #[test]
    fn fireball_definition() {
        let fireball = AbilityRegistry::builtin()
            .ability("Fireball")
            .expect("fireball exists");

        assert_eq!(fireball.class, ClassKind::Sorcerer);
        assert_eq!(fireball.resource, ResourceKind::Mana);
        assert_eq!(fireball.cost, 30);
        assert_eq!(fireball.cooldown, 1);
        assert!(fireball.ignores_defense());
        assert!(fireball.can_critical());
        assert_eq!(
            fireball.effect.rider(),
            Some(StatusRider::new(StatusEffectKind::Burn, 3, 5))
        );
    }

    #[test]
    fn catalog_order_is_menu_order() {
        let warrior: Vec<&str> = AbilityRegistry::builtin()
            .abilities_for(ClassKind::Warrior)
            .into_iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(
            warrior,
            vec!["Whirlwind Strike", "Shield Bash", "Battle Cry", "Execute"]
        );
    }

    #[test]
    fn stub_mechanics_are_resolved() {
        let registry = AbilityRegistry::builtin();

        let step = registry.ability("Shadow Step").unwrap();
        assert_eq!(step.effect, AbilityEffect::StanceShift(Stance::Dodging));

        let ritual = registry.ability("Dark Ritual").unwrap();
        assert_eq!(ritual.resource, ResourceKind::Health);
        assert!(matches!(
            ritual.effect,
            AbilityEffect::ResourceConversion {
                into: ResourceKind::Mana,
                amount: 30
            }
        ));

        let mark = registry.ability("Hunter's Mark").unwrap();
        assert_eq!(mark.effect, AbilityEffect::Inert);
    }

    #[test]
    fn shield_bash_needs_a_weapon() {
        let bash = AbilityRegistry::builtin().ability("Shield Bash").unwrap();
        assert!(bash.requires_weapon());
        assert_eq!(bash.effect.rider().map(|r| r.kind), Some(StatusEffectKind::Stun));
    }
}
