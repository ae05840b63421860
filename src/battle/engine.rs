//! Battle state container and action execution
//!
//! One BattleEngine owns every unit, the turn scheduler, the obstacle map
//! and the seeded RNG for one battle. All operations run to completion;
//! there is no cross-battle sharing.

use ahash::AHashMap;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::actions::{AttackResult, BattleAction};
use crate::battle::creature::{CreatureTrait, CreatureType};
use crate::battle::damage::{self, AttackContext, DamageEstimation};
use crate::battle::events::{BattleEventKind, BattleEventLog};
use crate::battle::hex::HexCoord;
use crate::battle::scheduler::TurnScheduler;
use crate::battle::unit::{BattleSide, CombatUnit, UnitId};
use crate::core::types::{BattleId, Round};

/// Lifecycle phase of a battle
///
/// Tactics is a declared placeholder for a pre-battle repositioning phase;
/// only NotStarted -> Normal -> Ended is exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    NotStarted,
    Tactics,
    Normal,
    Ended,
}

/// Battlefield ground type (flavor for presentation; no rules effect yet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldTerrain {
    #[default]
    Grass,
    Dirt,
    Sand,
    Snow,
    Swamp,
    Subterranean,
}

/// Impassable battlefield clutter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Obstacle {
    Boulder,
    TreeStump,
    FallenLog,
    Pond,
}

/// Final outcome; winner None means a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: Option<BattleSide>,
}

/// Complete battle state
#[derive(Debug)]
pub struct BattleEngine {
    pub id: BattleId,
    units: Vec<CombatUnit>,
    next_unit_id: u32,
    pub round: Round,
    pub active_unit: Option<UnitId>,
    pub phase: BattlePhase,
    pub terrain: FieldTerrain,
    obstacles: AHashMap<HexCoord, Obstacle>,
    result: Option<BattleResult>,
    scheduler: TurnScheduler,
    rng: ChaCha8Rng,
    pub log: BattleEventLog,
}

impl BattleEngine {
    /// Create an empty battle on the given terrain with a fixed RNG seed
    ///
    /// The same seed and the same action sequence replay identically.
    pub fn new(terrain: FieldTerrain, seed: u64) -> Self {
        Self {
            id: BattleId::new(),
            units: Vec::new(),
            next_unit_id: 0,
            round: 0,
            active_unit: None,
            phase: BattlePhase::NotStarted,
            terrain,
            obstacles: AHashMap::new(),
            result: None,
            scheduler: TurnScheduler::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            log: BattleEventLog::new(),
        }
    }

    // Setup

    /// Place a creature stack; rejects empty stacks
    pub fn add_unit(
        &mut self,
        creature: &CreatureType,
        count: u32,
        side: BattleSide,
        slot: u8,
        position: HexCoord,
    ) -> Option<UnitId> {
        if count == 0 {
            return None;
        }
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        let unit = CombatUnit::new(id, creature.clone(), count, side, slot, position);
        self.log.push(
            BattleEventKind::UnitPlaced { unit_id: id },
            format!("{} x{} deployed at ({}, {})", creature.name, count, position.x(), position.y()),
            self.round,
        );
        self.units.push(unit);
        Some(id)
    }

    pub fn add_obstacle(&mut self, position: HexCoord, obstacle: Obstacle) {
        self.obstacles.insert(position, obstacle);
    }

    // Round lifecycle

    /// Begin a new round: refresh every living unit and rebuild the queue
    pub fn start_new_round(&mut self) {
        if self.phase == BattlePhase::NotStarted {
            self.phase = BattlePhase::Normal;
            self.log
                .push(BattleEventKind::BattleStarted, "Battle begins".into(), self.round);
        }
        self.round += 1;
        for unit in self.units.iter_mut().filter(|u| u.is_alive()) {
            unit.start_turn();
            unit.update_status_effects();
        }
        self.scheduler
            .build_queue(self.units.iter().filter(|u| u.is_alive()));
        self.active_unit = None;
        self.log.push(
            BattleEventKind::RoundStarted { round: self.round },
            format!("Round {} begins", self.round),
            self.round,
        );
    }

    /// Dequeue the next unit to act; None means the round is over
    pub fn next_unit(&mut self) -> Option<UnitId> {
        self.active_unit = self.scheduler.next_unit();
        self.active_unit
    }

    pub fn peek_next_unit(&self) -> Option<UnitId> {
        self.scheduler.peek_next_unit()
    }

    /// Grant a bonus turn: the unit acts immediately next
    ///
    /// Entry point for a future morale system; nothing in the core triggers
    /// it on its own.
    pub fn insert_bonus_turn(&mut self, unit_id: UnitId) {
        if let Some(unit) = self.units.iter().find(|u| u.id == unit_id && u.is_alive()) {
            self.scheduler.insert_bonus_turn(unit);
        }
    }

    // Action execution

    /// Execute a driver-submitted action for its unit
    pub fn execute_action(&mut self, action: BattleAction) -> Option<AttackResult> {
        match action {
            BattleAction::Attack {
                unit_id,
                target,
                charge_distance,
            } => self.execute_attack(unit_id, target, charge_distance),
            BattleAction::Shoot { unit_id, target } => self.execute_shoot(unit_id, target),
            BattleAction::Wait { unit_id } => {
                self.execute_wait(unit_id);
                None
            }
            BattleAction::Defend { unit_id } => {
                self.execute_defend(unit_id);
                None
            }
            BattleAction::Retreat { .. }
            | BattleAction::Surrender { .. }
            | BattleAction::Spellcast { .. }
            | BattleAction::Catapult { .. } => {
                tracing::debug!(?action, "action kind not implemented, ignoring");
                None
            }
        }
    }

    /// Melee attack; triggers at most one retaliation
    pub fn execute_attack(
        &mut self,
        attacker_id: UnitId,
        defender_id: UnitId,
        charge_distance: u32,
    ) -> Option<AttackResult> {
        if attacker_id == defender_id {
            return None;
        }
        let atk_idx = self.index_of(attacker_id)?;
        let def_idx = self.index_of(defender_id)?;
        if !self.units[atk_idx].is_alive() || !self.units[def_idx].is_alive() {
            return None;
        }

        let attacker = self.units[atk_idx].clone();
        let defender = self.units[def_idx].clone();
        let estimation = damage::estimate(&AttackContext::melee(&attacker, &defender, charge_distance));
        let rolled = self.roll_damage(&estimation);
        let kills = self.units[def_idx].take_damage(rolled);
        let killed = !self.units[def_idx].is_alive();

        self.log.push(
            BattleEventKind::UnitAttacked {
                attacker: attacker_id,
                defender: defender_id,
                damage: rolled,
                kills,
            },
            format!(
                "{} strikes {} for {} damage, {} fall",
                attacker.creature.name, defender.creature.name, rolled, kills
            ),
            self.round,
        );
        if killed {
            self.log_death(defender_id, &defender.creature.name);
        }

        let mut result = AttackResult {
            attacker: attacker_id,
            defender: defender_id,
            damage: rolled,
            kills,
            killed,
            is_ranged: false,
            retaliation: None,
        };

        let can_retaliate = !killed
            && self.units[def_idx].retaliations > 0
            && !attacker.creature.has_trait(CreatureTrait::NoMeleeRetaliation);
        if can_retaliate {
            self.units[def_idx].retaliations -= 1;
            self.units[def_idx].has_retaliated = true;

            let retaliator = self.units[def_idx].clone();
            let target = self.units[atk_idx].clone();
            let back_estimation = damage::estimate(&AttackContext::melee(&retaliator, &target, 0));
            let back_damage = self.roll_damage(&back_estimation);
            let back_kills = self.units[atk_idx].take_damage(back_damage);
            let attacker_killed = !self.units[atk_idx].is_alive();

            self.log.push(
                BattleEventKind::UnitRetaliated {
                    attacker: defender_id,
                    defender: attacker_id,
                    damage: back_damage,
                    kills: back_kills,
                },
                format!(
                    "{} retaliates against {} for {} damage, {} fall",
                    retaliator.creature.name, target.creature.name, back_damage, back_kills
                ),
                self.round,
            );
            if attacker_killed {
                self.log_death(attacker_id, &target.creature.name);
            }

            result.retaliation = Some(Box::new(AttackResult {
                attacker: defender_id,
                defender: attacker_id,
                damage: back_damage,
                kills: back_kills,
                killed: attacker_killed,
                is_ranged: false,
                retaliation: None,
            }));
        }

        self.units[atk_idx].end_turn();
        Some(result)
    }

    /// Ranged attack; consumes a shot, never draws retaliation
    pub fn execute_shoot(&mut self, attacker_id: UnitId, defender_id: UnitId) -> Option<AttackResult> {
        if attacker_id == defender_id {
            return None;
        }
        let atk_idx = self.index_of(attacker_id)?;
        let def_idx = self.index_of(defender_id)?;
        if !self.units[atk_idx].can_shoot() || !self.units[def_idx].is_alive() {
            return None;
        }

        let attacker = self.units[atk_idx].clone();
        let defender = self.units[def_idx].clone();
        let estimation = damage::estimate(&AttackContext::ranged(&attacker, &defender));
        let rolled = self.roll_damage(&estimation);
        self.units[atk_idx].shots -= 1;
        let kills = self.units[def_idx].take_damage(rolled);
        let killed = !self.units[def_idx].is_alive();

        self.log.push(
            BattleEventKind::UnitShot {
                attacker: attacker_id,
                defender: defender_id,
                damage: rolled,
                kills,
            },
            format!(
                "{} shoots {} for {} damage, {} fall",
                attacker.creature.name, defender.creature.name, rolled, kills
            ),
            self.round,
        );
        if killed {
            self.log_death(defender_id, &defender.creature.name);
        }

        self.units[atk_idx].end_turn();
        Some(AttackResult {
            attacker: attacker_id,
            defender: defender_id,
            damage: rolled,
            kills,
            killed,
            is_ranged: true,
            retaliation: None,
        })
    }

    /// Postpone the unit's turn; waiting twice just ends the turn
    pub fn execute_wait(&mut self, unit_id: UnitId) {
        let Some(idx) = self.index_of(unit_id) else {
            return;
        };
        if !self.units[idx].is_alive() {
            return;
        }
        if self.units[idx].has_waited {
            self.units[idx].end_turn();
            return;
        }
        self.scheduler.move_to_wait_phase(&mut self.units[idx]);
        let name = self.units[idx].creature.name.clone();
        self.log.push(
            BattleEventKind::UnitWaited { unit_id },
            format!("{} waits", name),
            self.round,
        );
    }

    /// Brace for +50% of base defense until the next turn
    pub fn execute_defend(&mut self, unit_id: UnitId) {
        let Some(idx) = self.index_of(unit_id) else {
            return;
        };
        if !self.units[idx].is_alive() {
            return;
        }
        self.units[idx].is_defending = true;
        self.units[idx].end_turn();
        let name = self.units[idx].creature.name.clone();
        self.log.push(
            BattleEventKind::UnitDefended { unit_id },
            format!("{} defends", name),
            self.round,
        );
    }

    fn roll_damage(&mut self, estimation: &DamageEstimation) -> i32 {
        self.rng
            .gen_range(estimation.damage_min..=estimation.damage_max)
    }

    fn log_death(&mut self, unit_id: UnitId, name: &str) {
        self.log.push(
            BattleEventKind::UnitDied { unit_id },
            format!("{} stack is destroyed", name),
            self.round,
        );
    }

    // Battle end

    /// Check whether a side has been wiped out and finish the battle if so
    pub fn check_battle_end(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }
        let attackers_alive = self.living_count(BattleSide::Attacker);
        let defenders_alive = self.living_count(BattleSide::Defender);
        match (attackers_alive, defenders_alive) {
            (0, 0) => {
                self.end_battle(None);
                true
            }
            (0, _) => {
                self.end_battle(Some(BattleSide::Defender));
                true
            }
            (_, 0) => {
                self.end_battle(Some(BattleSide::Attacker));
                true
            }
            _ => false,
        }
    }

    pub fn end_battle(&mut self, winner: Option<BattleSide>) {
        self.result = Some(BattleResult { winner });
        self.phase = BattlePhase::Ended;
        let description = match winner {
            Some(side) => format!("Battle ended: {:?} wins", side),
            None => "Battle ended in a draw".into(),
        };
        self.log
            .push(BattleEventKind::BattleEnded { winner }, description, self.round);
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn winning_side(&self) -> Option<BattleSide> {
        self.result.and_then(|r| r.winner)
    }

    // Hex queries (used by movement/AI callers, not by attack resolution)

    pub fn is_hex_occupied(&self, position: HexCoord) -> bool {
        self.unit_at(position).is_some()
    }

    pub fn is_hex_blocked(&self, position: HexCoord) -> bool {
        self.obstacles.contains_key(&position)
    }

    pub fn is_hex_accessible(&self, position: HexCoord) -> bool {
        position.is_available() && !self.is_hex_occupied(position) && !self.is_hex_blocked(position)
    }

    // Presentation queries

    pub fn unit(&self, unit_id: UnitId) -> Option<&CombatUnit> {
        self.units.iter().find(|u| u.id == unit_id)
    }

    pub fn unit_mut(&mut self, unit_id: UnitId) -> Option<&mut CombatUnit> {
        self.units.iter_mut().find(|u| u.id == unit_id)
    }

    pub fn units(&self) -> &[CombatUnit] {
        &self.units
    }

    /// Living units on one side
    pub fn units_for_side(&self, side: BattleSide) -> Vec<&CombatUnit> {
        self.units
            .iter()
            .filter(|u| u.side == side && u.is_alive())
            .collect()
    }

    /// Living unit standing on the given hex
    pub fn unit_at(&self, position: HexCoord) -> Option<&CombatUnit> {
        self.units
            .iter()
            .find(|u| u.is_alive() && u.position == position)
    }

    pub fn turn_order(&self) -> Vec<UnitId> {
        self.scheduler.turn_order()
    }

    /// Drop dead stacks from the unit table
    pub fn prune_dead(&mut self) {
        self.units.retain(|u| u.is_alive());
    }

    /// Short human-readable state line
    pub fn battle_summary(&self) -> String {
        let attackers = self.units_for_side(BattleSide::Attacker);
        let defenders = self.units_for_side(BattleSide::Defender);
        let creatures = |units: &[&CombatUnit]| units.iter().map(|u| u.count).sum::<u32>();
        format!(
            "Round {} ({:?}): Attacker {} stacks / {} creatures vs Defender {} stacks / {} creatures",
            self.round,
            self.phase,
            attackers.len(),
            creatures(&attackers),
            defenders.len(),
            creatures(&defenders),
        )
    }

    fn living_count(&self, side: BattleSide) -> usize {
        self.units
            .iter()
            .filter(|u| u.side == side && u.is_alive())
            .count()
    }

    fn index_of(&self, unit_id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == unit_id)
    }
}
