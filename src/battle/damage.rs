//! Damage calculation - pure functions over an attack context
//!
//! Attack factors are ADDITIVE (1.0 + sum), defense factors are
//! MULTIPLICATIVE (product of 1 - factor). Several named factors are hooks
//! for hero skills and spells that return 0 until those systems exist.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    ATTACK_SKILL_FACTOR_CAP, ATTACK_SKILL_FACTOR_PER_POINT, DEATH_BLOW_BONUS,
    DEFENSE_SKILL_FACTOR_CAP, DEFENSE_SKILL_FACTOR_PER_POINT, DOUBLE_DAMAGE_BONUS,
    LUCKY_STRIKE_BONUS, MELEE_SHOOTER_PENALTY, MINIMUM_DAMAGE, UNLUCKY_STRIKE_PENALTY,
};
use crate::battle::creature::CreatureTrait;
use crate::battle::hex::HexCoord;
use crate::battle::unit::CombatUnit;

/// Everything needed to resolve one attacker-vs-defender interaction
#[derive(Debug, Clone, Copy)]
pub struct AttackContext<'a> {
    pub attacker: &'a CombatUnit,
    pub defender: &'a CombatUnit,
    pub attacker_position: HexCoord,
    pub defender_position: HexCoord,
    pub is_ranged: bool,
    /// Hexes moved before a melee hit, for jousting bonuses
    pub charge_distance: u32,
    // Trigger flags - always false until hero skills and spells are wired in
    pub lucky_strike: bool,
    pub unlucky_strike: bool,
    pub death_blow: bool,
    pub double_damage: bool,
}

impl<'a> AttackContext<'a> {
    pub fn melee(attacker: &'a CombatUnit, defender: &'a CombatUnit, charge_distance: u32) -> Self {
        Self {
            attacker,
            defender,
            attacker_position: attacker.position,
            defender_position: defender.position,
            is_ranged: false,
            charge_distance,
            lucky_strike: false,
            unlucky_strike: false,
            death_blow: false,
            double_damage: false,
        }
    }

    pub fn ranged(attacker: &'a CombatUnit, defender: &'a CombatUnit) -> Self {
        Self {
            attacker,
            defender,
            attacker_position: attacker.position,
            defender_position: defender.position,
            is_ranged: true,
            charge_distance: 0,
            lucky_strike: false,
            unlucky_strike: false,
            death_blow: false,
            double_damage: false,
        }
    }
}

/// Predicted damage and casualty bounds for one attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEstimation {
    pub damage_min: i32,
    pub damage_max: i32,
    pub kills_min: u32,
    pub kills_max: u32,
}

impl DamageEstimation {
    /// Expected damage used by the AI scoring pass
    pub fn average_damage(&self) -> i32 {
        (self.damage_min + self.damage_max) / 2
    }
}

/// Compute the damage and kill range for an attack
pub fn estimate(ctx: &AttackContext) -> DamageEstimation {
    let (mut per_min, mut per_max) = (ctx.attacker.creature.min_damage, ctx.attacker.creature.max_damage);
    if per_min > per_max {
        std::mem::swap(&mut per_min, &mut per_max);
    }
    // Bless/curse would pin the roll to one bound here; identity until spells exist
    let base_min = per_min as i64 * ctx.attacker.count as i64;
    let base_max = per_max as i64 * ctx.attacker.count as i64;

    let attack_total = attack_factor_total(ctx);
    let defense_total = defense_factor_total(ctx);

    let damage_min = scale_damage(base_min, attack_total, defense_total);
    let damage_max = scale_damage(base_max, attack_total, defense_total);

    DamageEstimation {
        damage_min,
        damage_max,
        kills_min: kills_from_damage(damage_min, ctx.defender),
        kills_max: kills_from_damage(damage_max, ctx.defender),
    }
}

fn scale_damage(base: i64, attack_total: f64, defense_total: f64) -> i32 {
    let scaled = (base as f64 * attack_total * defense_total).floor() as i32;
    scaled.max(MINIMUM_DAMAGE)
}

/// Casualties caused by a damage amount, against the defender's current stack
///
/// The single authoritative kill rule; `CombatUnit::take_damage` bookkeeping
/// must always agree with it (fuzzed in tests/damage_properties.rs).
pub fn kills_from_damage(damage: i32, defender: &CombatUnit) -> u32 {
    if damage <= 0 || !defender.is_alive() {
        return 0;
    }
    if damage < defender.first_unit_hp {
        return 0;
    }
    let beyond_lead = (damage - defender.first_unit_hp) / defender.max_health();
    (1 + beyond_lead as u32).min(defender.count)
}

// Attack side: 1.0 + sum of factors

fn attack_factor_total(ctx: &AttackContext) -> f64 {
    let mut total = 1.0;
    total += attack_skill_factor(ctx.attacker.attack(), ctx.defender.defense());
    total += offense_factor(ctx);
    total += bless_factor(ctx);
    total += jousting_factor(ctx);
    total += attack_from_behind_factor(ctx);
    total += hate_factor(ctx);
    if ctx.lucky_strike {
        total += LUCKY_STRIKE_BONUS;
    }
    if ctx.death_blow {
        total += DEATH_BLOW_BONUS;
    }
    if ctx.double_damage {
        total += DOUBLE_DAMAGE_BONUS;
    }
    total
}

fn attack_skill_factor(attack: i32, defense: i32) -> f64 {
    let advantage = (attack - defense).max(0) as f64;
    (advantage * ATTACK_SKILL_FACTOR_PER_POINT).min(ATTACK_SKILL_FACTOR_CAP)
}

/// Offense/archery hero-skill bonus (hero skills not implemented)
fn offense_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

/// Generic bless damage bonus (spells not implemented)
fn bless_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

/// Charge bonus per hex traveled for jousting creatures (not implemented)
fn jousting_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

/// Flanking bonus from facing (facing not tracked on this battlefield)
fn attack_from_behind_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

/// Bonus against hated creature kinds (not implemented)
fn hate_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

// Defense side: product of (1 - factor), each factor clamped to [0, 1]

fn defense_factor_total(ctx: &AttackContext) -> f64 {
    let factors = [
        defense_skill_factor(ctx.attacker.attack(), ctx.defender.defense()),
        armorer_factor(ctx),
        magic_shield_factor(ctx),
        obstacle_factor(ctx),
        range_penalty_factor(ctx),
        if ctx.unlucky_strike {
            UNLUCKY_STRIKE_PENALTY
        } else {
            0.0
        },
    ];
    factors
        .iter()
        .map(|f| 1.0 - f.min(1.0))
        .product()
}

fn defense_skill_factor(attack: i32, defense: i32) -> f64 {
    let advantage = (defense - attack).max(0) as f64;
    (advantage * DEFENSE_SKILL_FACTOR_PER_POINT).min(DEFENSE_SKILL_FACTOR_CAP)
}

/// Armorer hero-skill reduction (hero skills not implemented)
fn armorer_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

/// Magic shield reduction (spells not implemented)
fn magic_shield_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

/// Reduction from shooting over walls or obstacles (sieges not implemented)
fn obstacle_factor(_ctx: &AttackContext) -> f64 {
    0.0
}

/// Shooters fighting hand-to-hand lose half their damage unless they can
/// shoot in melee; distance falloff for ranged attacks is a future hook
fn range_penalty_factor(ctx: &AttackContext) -> f64 {
    if !ctx.is_ranged
        && ctx.attacker.creature.is_shooter()
        && !ctx.attacker.creature.has_trait(CreatureTrait::ShootInMelee)
    {
        return MELEE_SHOOTER_PENALTY;
    }
    0.0
}
