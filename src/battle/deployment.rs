//! Roster placement onto the battlefield
//!
//! Attacker stacks deploy in the left columns, defender stacks in the
//! right columns, with slot indices spread down the field in bands.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    ARMY_SLOTS, ATTACKER_DEPLOY_COLUMNS, DEFENDER_DEPLOY_COLUMNS, FIELD_HEIGHT,
};
use crate::battle::creature::CreatureType;
use crate::battle::engine::BattleEngine;
use crate::battle::hex::HexCoord;
use crate::battle::unit::{BattleSide, UnitId};
use crate::core::error::{HexmarchError, Result};

/// One filled slot of an army
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmySlot {
    pub creature: CreatureType,
    pub count: u32,
}

/// Up to seven creature stacks forming one army
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    slots: Vec<Option<ArmySlot>>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            slots: vec![None; ARMY_SLOTS],
        }
    }

    pub fn set_slot(&mut self, index: usize, creature: CreatureType, count: u32) -> Result<()> {
        if index >= ARMY_SLOTS {
            return Err(HexmarchError::InvalidRoster(format!(
                "slot index {} exceeds army size {}",
                index, ARMY_SLOTS
            )));
        }
        self.slots[index] = Some(ArmySlot { creature, count });
        Ok(())
    }

    /// Filled slots with their indices
    pub fn filled_slots(&self) -> impl Iterator<Item = (usize, &ArmySlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|slot| (i, slot)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }
}

/// Starting hex for an army slot
///
/// Columns alternate within the side's deployment pair; rows step down the
/// field so each slot lands in its own band.
pub fn deployment_position(side: BattleSide, slot: usize) -> HexCoord {
    let y = ((slot as i32 * 3) / 2).min(FIELD_HEIGHT - 1);
    let x = match side {
        BattleSide::Attacker => ATTACKER_DEPLOY_COLUMNS[slot % 2],
        BattleSide::Defender => DEFENDER_DEPLOY_COLUMNS[1 - slot % 2],
    };
    HexCoord::new(x, y)
}

/// Place both rosters into the engine, skipping empty slots
pub fn place_rosters(
    engine: &mut BattleEngine,
    attacker: &Roster,
    defender: &Roster,
) -> Vec<UnitId> {
    let mut placed = Vec::new();
    for (side, roster) in [
        (BattleSide::Attacker, attacker),
        (BattleSide::Defender, defender),
    ] {
        for (slot, army_slot) in roster.filled_slots() {
            let position = deployment_position(side, slot);
            if let Some(id) = engine.add_unit(
                &army_slot.creature,
                army_slot.count,
                side,
                slot as u8,
                position,
            ) {
                placed.push(id);
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::engine::FieldTerrain;

    #[test]
    fn test_roster_slot_bounds() {
        let mut roster = Roster::new();
        assert!(roster.set_slot(0, CreatureType::militia(), 10).is_ok());
        assert!(roster.set_slot(6, CreatureType::archer(), 5).is_ok());
        assert!(roster.set_slot(7, CreatureType::archer(), 5).is_err());
        assert_eq!(roster.filled_slots().count(), 2);
    }

    #[test]
    fn test_deployment_columns_per_side() {
        for slot in 0..ARMY_SLOTS {
            let a = deployment_position(BattleSide::Attacker, slot);
            let d = deployment_position(BattleSide::Defender, slot);
            assert!(ATTACKER_DEPLOY_COLUMNS.contains(&a.x()));
            assert!(DEFENDER_DEPLOY_COLUMNS.contains(&d.x()));
            assert!(a.is_available());
            assert!(d.is_available());
        }
    }

    #[test]
    fn test_deployment_positions_distinct() {
        let mut seen = std::collections::HashSet::new();
        for slot in 0..ARMY_SLOTS {
            assert!(seen.insert(deployment_position(BattleSide::Attacker, slot)));
            assert!(seen.insert(deployment_position(BattleSide::Defender, slot)));
        }
    }

    #[test]
    fn test_place_rosters_skips_empty_slots() {
        let mut attacker = Roster::new();
        attacker.set_slot(0, CreatureType::swordsman(), 10).unwrap();
        attacker.set_slot(3, CreatureType::archer(), 8).unwrap();
        let mut defender = Roster::new();
        defender.set_slot(1, CreatureType::ogre(), 4).unwrap();

        let mut engine = BattleEngine::new(FieldTerrain::Grass, 1);
        let placed = place_rosters(&mut engine, &attacker, &defender);

        assert_eq!(placed.len(), 3);
        assert_eq!(engine.units_for_side(BattleSide::Attacker).len(), 2);
        assert_eq!(engine.units_for_side(BattleSide::Defender).len(), 1);
        let ogre = engine.units_for_side(BattleSide::Defender)[0];
        assert_eq!(ogre.slot, 1);
        assert_eq!(ogre.position, deployment_position(BattleSide::Defender, 1));
    }
}
