//! Resolution of a single action by one combatant against the other.
//!
//! Rolls are drawn in a fixed order so a scripted RNG can force each branch:
//! dodge, parry, hit, critical, then heavy-attack bleed. Abilities roll only
//! for critical hits.

use super::action::{ActionResult, AttackType, PlayerCommand};
use super::combatant::{Combatant, Stance};
use super::damage::DamageType;
use super::hit::{check_hit, dodge_chance, hit_chance, parry_chance};
use super::result::CombatLogEntry;
use crate::ability::{AbilityActivation, AbilityEffect};
use crate::config::AttackProfile;
use crate::env::{CombatEnv, NarrationContext, RngOracle, narrate};
use crate::state::{ModifierTarget, ResourceKind, StatusEffectKind, StatusRider};

/// Identity fields of a log entry, known before the action resolves.
struct Entry {
    round: u32,
    actor: String,
    target: String,
    action: String,
}

impl Entry {
    fn new(round: u32, attacker: &Combatant, defender: &Combatant, action: &str) -> Self {
        Self {
            round,
            actor: attacker.name().to_string(),
            target: defender.name().to_string(),
            action: action.to_string(),
        }
    }

    fn finish(
        self,
        result: ActionResult,
        damage: i32,
        stamina_cost: i32,
        status_applied: Option<StatusEffectKind>,
        description: String,
    ) -> CombatLogEntry {
        CombatLogEntry {
            round: self.round,
            actor: self.actor,
            target: self.target,
            action: self.action,
            result,
            damage,
            stamina_cost,
            status_applied,
            description,
        }
    }
}

/// Resolves a command. Never fails: rejected commands become log entries.
pub fn resolve_command(
    round: u32,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    command: &PlayerCommand,
    env: &CombatEnv<'_>,
    rng: &mut (impl RngOracle + ?Sized),
) -> CombatLogEntry {
    match command {
        PlayerCommand::Basic(action) => resolve_basic(round, attacker, defender, *action, env, rng),
        PlayerCommand::UseAbility(name) => {
            resolve_ability(round, attacker, defender, name, env, rng)
        }
    }
}

/// Entry for a combatant that loses its turn to stun.
pub fn stunned(
    round: u32,
    attacker: &Combatant,
    defender: &Combatant,
    label: &str,
) -> CombatLogEntry {
    let description = format!("{} is stunned and cannot act!", attacker.name());
    Entry::new(round, attacker, defender, label).finish(
        ActionResult::Stunned,
        0,
        0,
        None,
        description,
    )
}

/// Resolves one of the five basic actions.
pub fn resolve_basic(
    round: u32,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    action: AttackType,
    env: &CombatEnv<'_>,
    rng: &mut (impl RngOracle + ?Sized),
) -> CombatLogEntry {
    let profile = *env.config().profile(action);
    let entry = Entry::new(round, attacker, defender, action.as_ref());

    if !attacker.consume_stamina(profile.stamina_cost) {
        let description = format!("{} is too exhausted to act!", attacker.name());
        return entry.finish(ActionResult::Exhausted, 0, 0, None, description);
    }

    let (stance, verb) = match action {
        AttackType::Block => (Stance::Blocking, "raises their guard defensively."),
        AttackType::Dodge => (Stance::Dodging, "prepares to dodge."),
        AttackType::Parry => (Stance::Parrying, "readies a parry."),
        AttackType::LightAttack | AttackType::HeavyAttack => {
            return resolve_attack(entry, attacker, defender, action, &profile, env, rng);
        }
    };

    attacker.set_stance(stance);
    let description = format!("{} {}", attacker.name(), verb);
    entry.finish(
        ActionResult::Braced,
        0,
        profile.stamina_cost,
        None,
        description,
    )
}

fn resolve_attack(
    entry: Entry,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    action: AttackType,
    profile: &AttackProfile,
    env: &CombatEnv<'_>,
    rng: &mut (impl RngOracle + ?Sized),
) -> CombatLogEntry {
    let config = env.config();
    let cost = profile.stamina_cost;

    if defender.stance() == Stance::Dodging
        && rng.roll_d100() <= dodge_chance(defender.stats().evasion, config)
    {
        let description = format!(
            "{} nimbly dodges {}'s attack!",
            defender.name(),
            attacker.name()
        );
        return entry.finish(ActionResult::Dodged, 0, cost, None, description);
    }

    if defender.stance() == Stance::Parrying
        && profile.can_be_parried
        && rng.roll_d100() <= parry_chance(defender.stats().initiative, config)
    {
        let riposte = attacker.stats().attack_power / 2;
        let dealt = attacker.take_damage(riposte, true, config);
        let description = format!(
            "{} parries and ripostes for {} damage!",
            defender.name(),
            dealt
        );
        return entry.finish(ActionResult::Parried, dealt, cost, None, description);
    }

    let chance = hit_chance(
        attacker.stats().accuracy,
        profile.accuracy_modifier,
        defender.stats().evasion,
        config,
    );
    if !check_hit(chance, rng.roll_d100()) {
        let description = format!("{}'s attack misses {}!", attacker.name(), defender.name());
        return entry.finish(ActionResult::Miss, 0, cost, None, description);
    }

    let attack_modifier = attacker.status().modifier(ModifierTarget::Attack);
    let mut damage = (f64::from(attacker.stats().attack_power)
        * profile.damage_multiplier
        * attack_modifier)
        .floor() as i32;

    let critical = rng.chance(attacker.stats().critical_chance + profile.critical_bonus);
    if critical {
        damage = (f64::from(damage) * attacker.stats().critical_damage).floor() as i32;
    }

    let dealt = defender.receive(damage, DamageType::Physical, false, config);

    let mut status_applied = None;
    if action == AttackType::HeavyAttack && rng.chance(config.heavy_attack_bleed_chance) {
        let bleed = config.heavy_attack_bleed;
        defender.add_status_effect(bleed.instance(attacker.name()));
        status_applied = Some(bleed.kind);
    }

    let result = if critical {
        ActionResult::Critical
    } else {
        ActionResult::Hit
    };
    let description = narrate(
        env.narrator(),
        &NarrationContext {
            attacker: attacker.name(),
            defender: defender.name(),
            action: action.as_ref(),
            result,
            damage: dealt,
            status: status_applied,
        },
    );

    entry.finish(result, dealt, cost, status_applied, description)
}

/// Resolves an ability. Abilities skip dodge, parry and the hit roll.
pub fn resolve_ability(
    round: u32,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    name: &str,
    env: &CombatEnv<'_>,
    rng: &mut (impl RngOracle + ?Sized),
) -> CombatLogEntry {
    let entry = Entry::new(round, attacker, defender, name);

    let AbilityActivation { ability, effect } = match attacker.use_ability(name) {
        Ok(activation) => activation,
        Err(err) => {
            tracing::debug!(actor = attacker.name(), ability = name, %err, "ability rejected");
            return entry.finish(ActionResult::Failed, 0, 0, None, err.to_string());
        }
    };

    let config = env.config();
    let stamina_cost = if ability.resource == ResourceKind::Stamina {
        ability.cost
    } else {
        0
    };
    let hostile = ability.target.is_hostile();

    let (result, damage, status, description) = match effect {
        AbilityEffect::Damage {
            amount,
            damage_type,
            rider,
        } => {
            let critical = ability.can_critical() && rng.chance(attacker.stats().critical_chance);
            let amount = if critical {
                critical_amount(amount, attacker)
            } else {
                amount
            };
            let dealt = defender.receive(amount, damage_type, ability.ignores_defense(), config);
            let status = rider.map(|rider| apply_rider(&rider, hostile, attacker, defender));
            let result = if critical {
                ActionResult::Critical
            } else {
                ActionResult::Hit
            };
            let description = narrate(
                env.narrator(),
                &NarrationContext {
                    attacker: attacker.name(),
                    defender: defender.name(),
                    action: name,
                    result,
                    damage: dealt,
                    status,
                },
            );
            (result, dealt, status, description)
        }
        AbilityEffect::Drain {
            damage,
            heal,
            damage_type,
        } => {
            let critical = ability.can_critical() && rng.chance(attacker.stats().critical_chance);
            let damage = if critical {
                critical_amount(damage, attacker)
            } else {
                damage
            };
            let dealt = defender.receive(damage, damage_type, ability.ignores_defense(), config);
            let healed = attacker.pools_mut().restore(ResourceKind::Health, heal);
            let result = if critical {
                ActionResult::Critical
            } else {
                ActionResult::Hit
            };
            let mut description = narrate(
                env.narrator(),
                &NarrationContext {
                    attacker: attacker.name(),
                    defender: defender.name(),
                    action: name,
                    result,
                    damage: dealt,
                    status: None,
                },
            );
            description.push_str(&format!(" {} drains {} health.", attacker.name(), healed));
            (result, dealt, None, description)
        }
        AbilityEffect::Heal { amount, rider } => {
            let healed = attacker.pools_mut().restore(ResourceKind::Health, amount);
            let status = rider.map(|rider| apply_rider(&rider, hostile, attacker, defender));
            let description = format!(
                "{}'s {} restores {} health.",
                attacker.name(),
                name,
                healed
            );
            (ActionResult::Hit, 0, status, description)
        }
        AbilityEffect::Status(rider) => {
            let kind = apply_rider(&rider, hostile, attacker, defender);
            let afflicted = if hostile {
                defender.name()
            } else {
                attacker.name()
            };
            let description = format!(
                "{} uses {}. {} is now afflicted with {}!",
                attacker.name(),
                name,
                afflicted,
                kind
            );
            (ActionResult::Hit, 0, Some(kind), description)
        }
        AbilityEffect::ResourceConversion { into, amount } => {
            let gained = attacker.pools_mut().restore(into, amount);
            let description = format!(
                "{} uses {}, converting {} {} into {} {}.",
                attacker.name(),
                name,
                ability.cost,
                ability.resource,
                gained,
                into
            );
            (ActionResult::Hit, 0, None, description)
        }
        AbilityEffect::StanceShift(stance) => {
            attacker.set_stance(stance);
            let description = format!(
                "{} uses {} and shifts into a {} stance.",
                attacker.name(),
                name,
                stance
            );
            (ActionResult::Braced, 0, None, description)
        }
        AbilityEffect::Inert => {
            let description = format!("{} uses {}.", attacker.name(), name);
            (ActionResult::Hit, 0, None, description)
        }
    };

    entry.finish(result, damage, stamina_cost, status, description)
}

fn critical_amount(amount: i32, attacker: &Combatant) -> i32 {
    (f64::from(amount) * attacker.stats().critical_damage).floor() as i32
}

/// Hostile riders land on the defender, all others on the user.
fn apply_rider(
    rider: &StatusRider,
    hostile: bool,
    attacker: &mut Combatant,
    defender: &mut Combatant,
) -> StatusEffectKind {
    let instance = rider.instance(attacker.name());
    if hostile {
        defender.add_status_effect(instance);
    } else {
        attacker.add_status_effect(instance);
    }
    rider.kind
}
