//! Battle actions and attack results
//!
//! Callers (player input adapter or the AI) submit actions from a closed
//! set; the engine mutates state and reports an AttackResult where one
//! applies.

use serde::{Deserialize, Serialize};

use crate::battle::unit::UnitId;

/// Everything a unit can be told to do on its turn
///
/// Only Attack/Shoot/Wait/Defend are wired to engine behavior; the rest are
/// declared placeholders the engine treats as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleAction {
    Attack {
        unit_id: UnitId,
        target: UnitId,
        /// Hexes traveled before the hit, for jousting bonuses
        charge_distance: u32,
    },
    Shoot {
        unit_id: UnitId,
        target: UnitId,
    },
    Wait {
        unit_id: UnitId,
    },
    Defend {
        unit_id: UnitId,
    },
    Retreat {
        unit_id: UnitId,
    },
    Surrender {
        unit_id: UnitId,
    },
    Spellcast {
        unit_id: UnitId,
    },
    Catapult {
        unit_id: UnitId,
    },
}

impl BattleAction {
    /// The unit this action belongs to
    pub fn unit_id(&self) -> UnitId {
        match *self {
            BattleAction::Attack { unit_id, .. }
            | BattleAction::Shoot { unit_id, .. }
            | BattleAction::Wait { unit_id }
            | BattleAction::Defend { unit_id }
            | BattleAction::Retreat { unit_id }
            | BattleAction::Surrender { unit_id }
            | BattleAction::Spellcast { unit_id }
            | BattleAction::Catapult { unit_id } => unit_id,
        }
    }
}

/// Outcome of one attack, shot, or retaliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub damage: i32,
    pub kills: u32,
    /// Did the defender's whole stack die?
    pub killed: bool,
    pub is_ranged: bool,
    /// Counter-strike triggered by this attack; never nested further
    pub retaliation: Option<Box<AttackResult>>,
}
