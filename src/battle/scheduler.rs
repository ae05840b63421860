//! Turn scheduling - who acts when within a round
//!
//! The queue is rebuilt every round and re-sorted on every mutation. Units
//! that wait drop into a later sub-phase of the same round.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::battle::unit::{BattleSide, CombatUnit, UnitId};

/// Sub-phase of a round; lower phases act first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurnPhase {
    Normal = 0,
    /// Waited, still eligible for a morale-triggered bonus turn
    WaitedEligibleForMorale = 1,
    /// Waited after losing morale eligibility (unused until morale exists)
    WaitedNoMorale = 2,
}

/// One pending turn in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnQueueEntry {
    pub unit_id: UnitId,
    pub phase: TurnPhase,
    /// Unit speed at queue-build time
    pub initiative: i32,
    pub side: BattleSide,
    pub slot: u8,
}

impl TurnQueueEntry {
    fn for_unit(unit: &CombatUnit, phase: TurnPhase) -> Self {
        Self {
            unit_id: unit.id,
            phase,
            initiative: unit.initiative(),
            side: unit.side,
            slot: unit.slot,
        }
    }
}

/// Ordered queue of units still to act this round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnScheduler {
    queue: Vec<TurnQueueEntry>,
    /// Side of the most recently dequeued unit, for the tie-break rule
    last_active_side: Option<BattleSide>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the queue from every living unit that has not waited yet
    pub fn build_queue<'a>(&mut self, units: impl IntoIterator<Item = &'a CombatUnit>) {
        self.queue.clear();
        for unit in units {
            if unit.is_alive() && !unit.has_waited {
                self.queue
                    .push(TurnQueueEntry::for_unit(unit, TurnPhase::Normal));
            }
        }
        self.sort();
    }

    fn sort(&mut self) {
        let last = self.last_active_side;
        self.queue.sort_by(|a, b| Self::compare(a, b, last));
    }

    /// Total order: phase, then initiative descending, then slot within a
    /// side; across sides at equal initiative, the side that did not act
    /// last goes first (Attacker as the opening fallback).
    fn compare(a: &TurnQueueEntry, b: &TurnQueueEntry, last: Option<BattleSide>) -> Ordering {
        a.phase
            .cmp(&b.phase)
            .then_with(|| b.initiative.cmp(&a.initiative))
            .then_with(|| {
                if a.side == b.side {
                    a.slot.cmp(&b.slot)
                } else {
                    let first = match last {
                        Some(side) => side.opposite(),
                        None => BattleSide::Attacker,
                    };
                    if a.side == first {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                }
            })
    }

    /// Dequeue the next unit to act; None means the round is over
    pub fn next_unit(&mut self) -> Option<UnitId> {
        if self.queue.is_empty() {
            return None;
        }
        let entry = self.queue.remove(0);
        self.last_active_side = Some(entry.side);
        Some(entry.unit_id)
    }

    pub fn peek_next_unit(&self) -> Option<UnitId> {
        self.queue.first().map(|e| e.unit_id)
    }

    /// Phase of the queue head (mirrors the current sub-phase of the round)
    pub fn current_phase(&self) -> Option<TurnPhase> {
        self.queue.first().map(|e| e.phase)
    }

    /// Postpone a unit into the wait phase of the current round
    ///
    /// The unit keeps its initiative but now acts after every not-yet-acted
    /// normal-phase unit and before units that waited earlier.
    pub fn move_to_wait_phase(&mut self, unit: &mut CombatUnit) {
        self.queue.retain(|e| e.unit_id != unit.id);
        self.queue.push(TurnQueueEntry::for_unit(
            unit,
            TurnPhase::WaitedEligibleForMorale,
        ));
        unit.has_waited = true;
        self.sort();
    }

    /// Morale-triggered extra turn: act immediately next, bypassing the sort
    pub fn insert_bonus_turn(&mut self, unit: &CombatUnit) {
        self.queue
            .insert(0, TurnQueueEntry::for_unit(unit, TurnPhase::Normal));
    }

    /// Full ordered unit-id list, for display only
    pub fn turn_order(&self) -> Vec<UnitId> {
        self.queue.iter().map(|e| e.unit_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
