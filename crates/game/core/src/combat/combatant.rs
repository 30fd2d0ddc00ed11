//! Live combat wrapper around a character snapshot.

use super::damage::{DamageType, apply_resistance, mitigate};
use crate::ability::AbilityBook;
use crate::config::CombatConfig;
use crate::enemy::EnemyTemplate;
use crate::state::{
    CharacterSnapshot, ItemKind, ModifierTarget, ResourceKind, ResourcePools, StatusEffectInstance,
    StatusEffectKind, StatusEffects, TickEffect,
};
use crate::stats::CombatStats;

/// Which side of the fight a combatant is on.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opponent(&self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Defensive stance. Mutually exclusive, cleared at the end of every round.
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
pub enum Stance {
    #[default]
    Open,
    Blocking,
    Dodging,
    Parrying,
}

/// A character in a fight.
///
/// Stats are derived once here and never recomputed.
#[derive(Clone, Debug)]
pub struct Combatant {
    side: Side,
    character: CharacterSnapshot,
    stats: CombatStats,
    pools: ResourcePools,
    status: StatusEffects,
    stance: Stance,
    abilities: AbilityBook,
    template: Option<EnemyTemplate>,
    phases_entered: Vec<bool>,
    unlocked_abilities: Vec<String>,
}

impl Combatant {
    pub fn new(side: Side, character: CharacterSnapshot, abilities: AbilityBook) -> Self {
        let stats = CombatStats::derive(&character.stats, &character.inventory);
        let pools = ResourcePools::from_snapshot(&character);

        tracing::debug!(
            name = %character.name,
            %side,
            attack_power = stats.attack_power,
            defense = stats.defense,
            "combatant ready"
        );

        Self {
            side,
            character,
            stats,
            pools,
            status: StatusEffects::empty(),
            stance: Stance::Open,
            abilities,
            template: None,
            phases_entered: Vec::new(),
            unlocked_abilities: Vec::new(),
        }
    }

    /// Attaches the template that drives AI, resistances, phases and loot.
    #[must_use]
    pub fn with_template(mut self, template: EnemyTemplate) -> Self {
        self.phases_entered = vec![false; template.boss_phases.len()];
        self.template = Some(template);
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn character(&self) -> &CharacterSnapshot {
        &self.character
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn pools(&self) -> &ResourcePools {
        &self.pools
    }

    pub fn pools_mut(&mut self) -> &mut ResourcePools {
        &mut self.pools
    }

    pub fn status(&self) -> &StatusEffects {
        &self.status
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn set_stance(&mut self, stance: Stance) {
        self.stance = stance;
    }

    pub fn abilities(&self) -> &AbilityBook {
        &self.abilities
    }

    pub fn template(&self) -> Option<&EnemyTemplate> {
        self.template.as_ref()
    }

    /// Abilities unlocked by boss phases so far.
    pub fn unlocked_abilities(&self) -> &[String] {
        &self.unlocked_abilities
    }

    pub fn health(&self) -> i32 {
        self.pools.health
    }

    pub fn stamina(&self) -> i32 {
        self.pools.stamina
    }

    pub fn is_alive(&self) -> bool {
        self.pools.health > 0
    }

    pub fn health_fraction(&self) -> f64 {
        self.pools.health_fraction()
    }

    pub fn is_stunned(&self) -> bool {
        self.status.has(StatusEffectKind::Stun)
    }

    /// Spends stamina if there is enough. Returns false and spends nothing
    /// otherwise.
    pub fn consume_stamina(&mut self, amount: i32) -> bool {
        if !self.pools.can_afford(ResourceKind::Stamina, amount) {
            return false;
        }
        self.pools.spend(ResourceKind::Stamina, amount);
        true
    }

    pub fn restore_stamina(&mut self, amount: i32) {
        self.pools.restore(ResourceKind::Stamina, amount);
    }

    /// Damage multiplier for `damage_type` from the attached template.
    pub fn resistance(&self, damage_type: DamageType) -> f64 {
        self.template
            .as_ref()
            .map_or(1.0, |t| t.resistances.get(damage_type))
    }

    /// Applies damage and returns the amount actually dealt.
    ///
    /// True damage skips defense and blocking. Everything else goes through
    /// [`mitigate`] with defense scaled by any defense buff.
    pub fn take_damage(&mut self, damage: i32, true_damage: bool, config: &CombatConfig) -> i32 {
        let actual = if true_damage {
            damage.max(0)
        } else {
            let defense =
                f64::from(self.stats.defense) * self.status.modifier(ModifierTarget::Defense);
            mitigate(damage, defense, self.stance == Stance::Blocking, config)
        };

        self.pools.lose_health(actual);
        actual
    }

    /// Applies typed damage: resistance first, then [`Self::take_damage`].
    ///
    /// An immune target takes nothing, not even the one-point minimum.
    pub fn receive(
        &mut self,
        raw: i32,
        damage_type: DamageType,
        true_damage: bool,
        config: &CombatConfig,
    ) -> i32 {
        let resistance = self.resistance(damage_type);
        if resistance <= 0.0 {
            tracing::debug!(name = %self.character.name, %damage_type, "immune to damage");
            return 0;
        }
        self.take_damage(apply_resistance(raw, resistance), true_damage, config)
    }

    pub fn add_status_effect(&mut self, effect: StatusEffectInstance) {
        tracing::debug!(name = %self.character.name, kind = %effect.kind, "status effect applied");
        self.status.add(effect);
    }

    /// Ticks every status effect and applies its damage or healing.
    ///
    /// Damage-over-time is true damage. Regeneration heals up to max health
    /// and is reported as negative damage.
    pub fn process_status_effects(&mut self) -> Vec<(StatusEffectKind, i32)> {
        self.status
            .tick()
            .into_iter()
            .map(|(kind, effect)| match effect {
                TickEffect::Damage(amount) => {
                    self.pools.lose_health(amount);
                    (kind, amount)
                }
                TickEffect::Heal(amount) => {
                    let gained = self.pools.restore(ResourceKind::Health, amount);
                    (kind, -gained)
                }
            })
            .collect()
    }

    /// Activates an ability. Weapon abilities fail without an equipped weapon
    /// and spend nothing.
    pub(crate) fn use_ability(
        &mut self,
        name: &str,
    ) -> Result<crate::ability::AbilityActivation, crate::ability::AbilityError> {
        let needs_weapon = self
            .abilities
            .get(name)
            .is_some_and(|entry| entry.ability.requires_weapon());
        if needs_weapon && !self.has_weapon() {
            return Err(crate::ability::AbilityError::WeaponRequired {
                name: name.to_string(),
            });
        }

        self.abilities
            .use_ability(name, &mut self.pools, &self.character.stats)
    }

    /// Ability menu. Weapon abilities are unusable while no weapon is equipped.
    pub fn available_abilities(&self) -> Vec<crate::ability::AbilityView> {
        let armed = self.has_weapon();
        let mut views = self.abilities.available(&self.pools);
        for view in &mut views {
            let needs_weapon = self
                .abilities
                .get(&view.name)
                .is_some_and(|entry| entry.ability.requires_weapon());
            if needs_weapon && !armed {
                view.can_use = false;
            }
        }
        views
    }

    pub fn has_weapon(&self) -> bool {
        self.character
            .equipped()
            .any(|item| item.kind == ItemKind::Weapon)
    }

    pub(crate) fn tick_cooldowns(&mut self) {
        self.abilities.tick_cooldowns();
    }

    pub fn reset_stance(&mut self) {
        self.stance = Stance::Open;
    }

    /// Enters every boss phase whose threshold has been reached for the first
    /// time. Returns the 1-based numbers of the phases entered.
    pub(crate) fn enter_boss_phases(&mut self) -> Vec<usize> {
        let fraction = self.pools.health_fraction();
        let Some(template) = self.template.as_ref() else {
            return Vec::new();
        };

        let mut entered = Vec::new();
        for (index, phase) in template.boss_phases.iter().enumerate() {
            if self.phases_entered[index] || fraction > phase.hp_threshold {
                continue;
            }
            self.phases_entered[index] = true;
            self.unlocked_abilities
                .extend(phase.abilities_unlocked.iter().cloned());
            entered.push(index + 1);
        }
        entered
    }

    /// `Name | HP: h/max | Stamina: s/max | Effects: ...`
    pub fn status_summary(&self) -> String {
        format!(
            "{} | HP: {}/{} | Stamina: {}/{} | Effects: {}",
            self.character.name,
            self.pools.health,
            self.pools.max_health,
            self.pools.stamina,
            self.pools.max_stamina,
            self.status.summary()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{BossPhase, Resistances};
    use crate::state::{PrimaryStats, StatusRider};

    fn snapshot(name: &str) -> CharacterSnapshot {
        CharacterSnapshot {
            name: name.into(),
            stats: PrimaryStats::default(),
            health: 100,
            max_health: 100,
            stamina: 50,
            max_stamina: 100,
            mana: 0,
            max_mana: 0,
            ..CharacterSnapshot::default()
        }
    }

    fn combatant() -> Combatant {
        Combatant::new(Side::Player, snapshot("Aria"), AbilityBook::default())
    }

    fn shield_bash() -> crate::ability::Ability {
        use crate::ability::{Ability, AbilityEffect, AbilityFlags, TargetKind};
        use crate::state::{ClassKind, StatKind};

        Ability {
            name: "Shield Bash".into(),
            description: "Bash an enemy with your shield".into(),
            class: ClassKind::Warrior,
            resource: ResourceKind::Stamina,
            cost: 30,
            cooldown: 2,
            target: TargetKind::SingleEnemy,
            effect: AbilityEffect::Damage {
                amount: 20,
                damage_type: DamageType::Physical,
                rider: None,
            },
            scales_with: vec![StatKind::Strength],
            scaling_factor: 1.2,
            flags: AbilityFlags::CAN_CRITICAL | AbilityFlags::REQUIRES_WEAPON,
        }
    }

    #[test]
    fn weapon_abilities_need_an_equipped_weapon() {
        use crate::ability::AbilityError;
        use crate::state::EquipmentItem;

        let mut unarmed = snapshot("Aria");
        unarmed
            .inventory
            .push(EquipmentItem::new("Iron Longsword", ItemKind::Weapon));
        let mut fighter =
            Combatant::new(Side::Player, unarmed, AbilityBook::from_abilities([shield_bash()]));

        let err = fighter.use_ability("Shield Bash").unwrap_err();
        assert_eq!(
            err,
            AbilityError::WeaponRequired {
                name: "Shield Bash".into()
            }
        );
        assert_eq!(err.to_string(), "Shield Bash requires an equipped weapon");
        assert_eq!(fighter.stamina(), 50);
        let menu = fighter.available_abilities();
        assert!(menu[0].is_ready && menu[0].can_afford);
        assert!(!menu[0].can_use);

        let mut armed = snapshot("Aria");
        armed
            .inventory
            .push(EquipmentItem::new("Iron Longsword", ItemKind::Weapon).equipped());
        let mut fighter =
            Combatant::new(Side::Player, armed, AbilityBook::from_abilities([shield_bash()]));
        assert!(fighter.available_abilities()[0].can_use);
        assert!(fighter.use_ability("Shield Bash").is_ok());
        assert_eq!(fighter.stamina(), 20);
    }

    #[test]
    fn blocking_reduces_mitigated_damage() {
        let config = CombatConfig::default();
        let mut target = combatant();
        // defense 10 → 20 - 5 = 15
        assert_eq!(target.take_damage(20, false, &config), 15);
        target.set_stance(Stance::Blocking);
        assert_eq!(target.take_damage(20, false, &config), 6);
        assert_eq!(target.take_damage(20, true, &config), 20);
        assert_eq!(target.health(), 100 - 15 - 6 - 20);
    }

    #[test]
    fn defense_buff_scales_defense() {
        let config = CombatConfig::default();
        let mut target = combatant();
        target.add_status_effect(
            StatusRider::new(StatusEffectKind::DefenseBuff, 3, 0).instance("shrine"),
        );
        // 12.5 × 0.5 = 6.25 → floor(13.75) = 13
        assert_eq!(target.take_damage(20, false, &config), 13);
    }

    #[test]
    fn resistance_applies_before_mitigation() {
        let config = CombatConfig::default();
        let resistances = Resistances {
            physical: 0.5,
            holy: 0.0,
            ..Resistances::NEUTRAL
        };
        let template = EnemyTemplate::builder("Golem")
            .resistances(resistances)
            .build();
        let mut golem =
            Combatant::new(Side::Enemy, snapshot("Golem"), AbilityBook::default())
                .with_template(template);

        assert_eq!(golem.receive(30, DamageType::Physical, false, &config), 10);
        assert_eq!(golem.receive(30, DamageType::Holy, false, &config), 0);
        assert_eq!(golem.receive(30, DamageType::Fire, true, &config), 30);
    }

    #[test]
    fn exhausted_combatant_spends_nothing() {
        let mut fighter = combatant();
        assert!(!fighter.consume_stamina(60));
        assert_eq!(fighter.stamina(), 50);
        assert!(fighter.consume_stamina(50));
        assert_eq!(fighter.stamina(), 0);
        fighter.restore_stamina(500);
        assert_eq!(fighter.stamina(), 100);
    }

    #[test]
    fn regeneration_reports_negative_healing() {
        let mut fighter = combatant();
        fighter.pools_mut().health = 97;
        fighter.add_status_effect(
            StatusRider::new(StatusEffectKind::Regeneration, 2, 5).instance("Aria"),
        );
        fighter.add_status_effect(StatusRider::new(StatusEffectKind::Burn, 1, 4).instance("Imp"));

        let ticks = fighter.process_status_effects();
        assert_eq!(
            ticks,
            vec![
                (StatusEffectKind::Regeneration, -3),
                (StatusEffectKind::Burn, 4)
            ]
        );
        assert_eq!(fighter.health(), 96);
        assert!(!fighter.status().has(StatusEffectKind::Burn));
    }

    #[test]
    fn boss_phases_enter_once() {
        let template = EnemyTemplate::builder("Nameless")
            .phase(BossPhase::at(0.7).unlocks("Mirror Strike"))
            .phase(BossPhase::at(0.3).unlocks("Final Form"))
            .build();
        let mut boss = Combatant::new(Side::Enemy, snapshot("Nameless"), AbilityBook::default())
            .with_template(template);

        assert!(boss.enter_boss_phases().is_empty());
        boss.pools_mut().health = 70;
        assert_eq!(boss.enter_boss_phases(), vec![1]);
        assert!(boss.enter_boss_phases().is_empty());
        boss.pools_mut().health = 10;
        assert_eq!(boss.enter_boss_phases(), vec![2]);
        assert_eq!(boss.unlocked_abilities(), ["Mirror Strike", "Final Form"]);
    }

    #[test]
    fn summary_format() {
        assert_eq!(
            combatant().status_summary(),
            "Aria | HP: 100/100 | Stamina: 50/100 | Effects: None"
        );
    }
}
