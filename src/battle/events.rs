//! Battle event log
//!
//! Round-stamped record of everything that happened, for presentation and
//! replay inspection.

use serde::{Deserialize, Serialize};

use crate::battle::unit::{BattleSide, UnitId};
use crate::core::types::Round;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEventKind {
    BattleStarted,
    RoundStarted {
        round: Round,
    },
    UnitPlaced {
        unit_id: UnitId,
    },
    UnitAttacked {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
        kills: u32,
    },
    UnitShot {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
        kills: u32,
    },
    UnitRetaliated {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
        kills: u32,
    },
    UnitWaited {
        unit_id: UnitId,
    },
    UnitDefended {
        unit_id: UnitId,
    },
    UnitDied {
        unit_id: UnitId,
    },
    BattleEnded {
        winner: Option<BattleSide>,
    },
}

/// One logged event with its round stamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub round: Round,
    pub kind: BattleEventKind,
    pub description: String,
}

/// Append-only log of battle events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: BattleEventKind, description: String, round: Round) {
        self.events.push(BattleEvent {
            round,
            kind,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events from a single round, for presentation
    pub fn for_round(&self, round: Round) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter().filter(move |e| e.round == round)
    }
}
