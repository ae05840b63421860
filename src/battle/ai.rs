//! Combat AI - greedy action scoring
//!
//! Evaluates every attack possibility against every living enemy and picks
//! the highest-scoring one. The AI does not plan movement: a melee option
//! against a non-adjacent target is simply not on the table, and a unit
//! with nothing in reach waits.

use crate::battle::actions::BattleAction;
use crate::battle::constants::{AI_KILL_BONUS, AI_SUICIDE_PENALTY};
use crate::battle::creature::CreatureTrait;
use crate::battle::damage::{self, AttackContext};
use crate::battle::engine::BattleEngine;
use crate::battle::unit::{CombatUnit, UnitId};

/// One scored way for the active unit to attack a target
#[derive(Debug, Clone)]
pub struct AttackPossibility {
    pub target: UnitId,
    pub is_ranged: bool,
    /// Expected damage to the target (average of the range)
    pub damage: i32,
    /// Expected damage back from the hypothetical retaliation
    pub retaliation_damage: i32,
    pub kills_target: bool,
    pub attacker_dies: bool,
    pub score: f64,
}

impl AttackPossibility {
    /// Score a hypothetical attack using average damage
    pub fn evaluate(attacker: &CombatUnit, defender: &CombatUnit, is_ranged: bool) -> Self {
        let context = if is_ranged {
            AttackContext::ranged(attacker, defender)
        } else {
            AttackContext::melee(attacker, defender, 0)
        };
        let damage = damage::estimate(&context).average_damage();
        let kills_target = damage >= defender.total_health();

        let mut retaliation_damage = 0;
        let mut attacker_dies = false;
        let would_retaliate = !is_ranged
            && !kills_target
            && defender.retaliations > 0
            && !attacker.creature.has_trait(CreatureTrait::NoMeleeRetaliation);
        if would_retaliate {
            // Predict the counter from the stack the attacker would face
            let mut survivor = defender.clone();
            survivor.take_damage(damage);
            if survivor.is_alive() {
                let back = AttackContext::melee(&survivor, attacker, 0);
                retaliation_damage = damage::estimate(&back).average_damage();
                attacker_dies = retaliation_damage >= attacker.total_health();
            }
        }

        let mut score = f64::from(damage) - f64::from(retaliation_damage);
        if kills_target {
            score += AI_KILL_BONUS;
        }
        if attacker_dies {
            score -= AI_SUICIDE_PENALTY;
        }

        Self {
            target: defender.id,
            is_ranged,
            damage,
            retaliation_damage,
            kills_target,
            attacker_dies,
            score,
        }
    }
}

/// Pick an action for the active unit; None for a dead or unknown unit
pub fn select_action(engine: &BattleEngine, active: UnitId) -> Option<BattleAction> {
    let unit = engine.unit(active)?;
    if !unit.is_alive() {
        return None;
    }

    let enemies = engine.units_for_side(unit.side.opposite());
    let mut best: Option<AttackPossibility> = None;
    for enemy in enemies {
        if unit.can_shoot() {
            consider(&mut best, AttackPossibility::evaluate(unit, enemy, true));
        }
        if unit.position.is_adjacent_to(&enemy.position) {
            consider(&mut best, AttackPossibility::evaluate(unit, enemy, false));
        }
    }

    match best {
        Some(possibility) if possibility.is_ranged => Some(BattleAction::Shoot {
            unit_id: active,
            target: possibility.target,
        }),
        Some(possibility) => Some(BattleAction::Attack {
            unit_id: active,
            target: possibility.target,
            charge_distance: 0,
        }),
        None => Some(BattleAction::Wait { unit_id: active }),
    }
}

/// Keep the strictly-highest score; earlier candidates win ties
fn consider(best: &mut Option<AttackPossibility>, candidate: AttackPossibility) {
    match best {
        Some(current) if candidate.score <= current.score => {}
        _ => *best = Some(candidate),
    }
}
