//! Combat units - stacks of identical creatures
//!
//! A unit tracks its creature count plus the hit points of the partially
//! damaged lead creature. Damage kills from the back of the stack and the
//! remainder carries to the next creature.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{DEFEND_BONUS_PERCENT, RETALIATIONS_PER_TURN};
use crate::battle::creature::CreatureType;
use crate::battle::hex::HexCoord;

/// Unique identifier for units within one battle (allocated by the engine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Which army a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleSide {
    Attacker,
    Defender,
}

impl BattleSide {
    pub fn opposite(&self) -> Self {
        match self {
            BattleSide::Attacker => BattleSide::Defender,
            BattleSide::Defender => BattleSide::Attacker,
        }
    }
}

/// A timed stat modifier on a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub rounds_remaining: u32,
    pub attack_modifier: i32,
    pub defense_modifier: i32,
    pub speed_modifier: i32,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>, rounds: u32) -> Self {
        Self {
            name: name.into(),
            rounds_remaining: rounds,
            attack_modifier: 0,
            defense_modifier: 0,
            speed_modifier: 0,
        }
    }

    pub fn with_attack(mut self, modifier: i32) -> Self {
        self.attack_modifier = modifier;
        self
    }

    pub fn with_defense(mut self, modifier: i32) -> Self {
        self.defense_modifier = modifier;
        self
    }

    pub fn with_speed(mut self, modifier: i32) -> Self {
        self.speed_modifier = modifier;
        self
    }
}

/// A stack of identical creatures fighting on one side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatUnit {
    pub id: UnitId,
    pub creature: CreatureType,
    pub side: BattleSide,
    /// Originating army slot (0-6)
    pub slot: u8,
    pub position: HexCoord,

    // Health state
    pub count: u32,
    /// Remaining hit points of the lead creature
    pub first_unit_hp: i32,

    // Combat resources
    pub shots: i32,
    pub retaliations: i32,

    // Per-turn flags
    pub has_moved: bool,
    pub has_retaliated: bool,
    pub is_defending: bool,
    pub has_waited: bool,

    pub effects: Vec<StatusEffect>,
}

impl CombatUnit {
    pub fn new(
        id: UnitId,
        creature: CreatureType,
        count: u32,
        side: BattleSide,
        slot: u8,
        position: HexCoord,
    ) -> Self {
        let first_unit_hp = creature.max_health;
        let shots = creature.shots;
        Self {
            id,
            creature,
            side,
            slot,
            position,
            count,
            first_unit_hp,
            shots,
            retaliations: RETALIATIONS_PER_TURN,
            has_moved: false,
            has_retaliated: false,
            is_defending: false,
            has_waited: false,
            effects: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.count > 0
    }

    pub fn max_health(&self) -> i32 {
        self.creature.max_health
    }

    /// Combined hit points of the whole stack
    pub fn total_health(&self) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        (self.count as i32 - 1) * self.max_health() + self.first_unit_hp
    }

    /// Apply damage to the stack; returns the number of creatures killed
    pub fn take_damage(&mut self, amount: i32) -> u32 {
        if amount <= 0 || !self.is_alive() {
            return 0;
        }
        let max_hp = self.max_health();
        let mut kills = 0u32;

        if amount < self.first_unit_hp {
            self.first_unit_hp -= amount;
            return 0;
        }

        // Lead creature falls; remainder carries to the next one
        let mut remaining = amount - self.first_unit_hp;
        self.count -= 1;
        kills += 1;
        self.first_unit_hp = max_hp;

        while remaining >= max_hp && self.count > 0 {
            remaining -= max_hp;
            self.count -= 1;
            kills += 1;
        }

        if self.count == 0 {
            self.first_unit_hp = 0;
            return kills;
        }

        if remaining > 0 {
            self.first_unit_hp = max_hp - remaining;
        }
        kills
    }

    /// Restore the lead creature's hit points; never resurrects
    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 || !self.is_alive() {
            return;
        }
        self.first_unit_hp = (self.first_unit_hp + amount).min(self.max_health());
    }

    /// Convert health into whole creatures; returns how many were raised
    pub fn resurrect(&mut self, health_to_restore: i32, max_count: u32) -> u32 {
        if health_to_restore <= 0 {
            return 0;
        }
        let max_hp = self.max_health();
        let mut raised = (health_to_restore / max_hp) as u32;
        if self.count + raised > max_count {
            raised = max_count.saturating_sub(self.count);
        }
        if !self.is_alive() && raised > 0 {
            self.first_unit_hp = max_hp;
        }
        self.count += raised;
        if self.is_alive() {
            let remainder = health_to_restore % max_hp;
            self.first_unit_hp = (self.first_unit_hp + remainder).min(max_hp);
        }
        raised
    }

    // Turn lifecycle

    pub fn start_turn(&mut self) {
        self.has_moved = false;
        self.has_retaliated = false;
        self.is_defending = false;
        self.has_waited = false;
        self.retaliations = RETALIATIONS_PER_TURN;
    }

    pub fn end_turn(&mut self) {
        self.has_moved = true;
    }

    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.has_moved
    }

    pub fn can_shoot(&self) -> bool {
        self.is_alive() && self.shots > 0
    }

    // Effective stats (base + status effects, floored at 0)

    pub fn attack(&self) -> i32 {
        let modifiers: i32 = self.effects.iter().map(|e| e.attack_modifier).sum();
        (self.creature.attack + modifiers).max(0)
    }

    pub fn defense(&self) -> i32 {
        let modifiers: i32 = self.effects.iter().map(|e| e.defense_modifier).sum();
        let defend_bonus = if self.is_defending {
            self.creature.defense * DEFEND_BONUS_PERCENT / 100
        } else {
            0
        };
        (self.creature.defense + modifiers + defend_bonus).max(0)
    }

    pub fn speed(&self) -> i32 {
        let modifiers: i32 = self.effects.iter().map(|e| e.speed_modifier).sum();
        (self.creature.speed + modifiers).max(0)
    }

    pub fn initiative(&self) -> i32 {
        self.speed()
    }

    // Status effects

    pub fn add_effect(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    /// Tick down effect durations, dropping the expired ones (once per round)
    pub fn update_status_effects(&mut self) {
        for effect in &mut self.effects {
            effect.rounds_remaining = effect.rounds_remaining.saturating_sub(1);
        }
        self.effects.retain(|e| e.rounds_remaining > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swordsmen(count: u32) -> CombatUnit {
        CombatUnit::new(
            UnitId(1),
            CreatureType::swordsman(),
            count,
            BattleSide::Attacker,
            0,
            HexCoord::new(1, 5),
        )
    }

    #[test]
    fn test_new_unit_full_health() {
        let unit = swordsmen(10);
        assert!(unit.is_alive());
        assert_eq!(unit.first_unit_hp, 35);
        assert_eq!(unit.total_health(), 350);
    }

    #[test]
    fn test_damage_within_lead_creature() {
        let mut unit = swordsmen(10);
        let kills = unit.take_damage(20);
        assert_eq!(kills, 0);
        assert_eq!(unit.count, 10);
        assert_eq!(unit.first_unit_hp, 15);
    }

    #[test]
    fn test_damage_exactly_lead_hp_kills_one() {
        let mut unit = swordsmen(10);
        let kills = unit.take_damage(35);
        assert_eq!(kills, 1);
        assert_eq!(unit.count, 9);
        assert_eq!(unit.first_unit_hp, 35);
    }

    #[test]
    fn test_damage_carries_to_next_creature() {
        // k * max_health + r on a full stack: count drops by k, lead keeps max - r
        let mut unit = swordsmen(10);
        let kills = unit.take_damage(2 * 35 + 12);
        assert_eq!(kills, 2);
        assert_eq!(unit.count, 8);
        assert_eq!(unit.first_unit_hp, 35 - 12);
    }

    #[test]
    fn test_overkill_clamps_to_zero() {
        let mut unit = swordsmen(3);
        let kills = unit.take_damage(10_000);
        assert_eq!(kills, 3);
        assert_eq!(unit.count, 0);
        assert!(!unit.is_alive());
        assert_eq!(unit.total_health(), 0);
    }

    #[test]
    fn test_damage_noop_when_dead_or_nonpositive() {
        let mut unit = swordsmen(2);
        assert_eq!(unit.take_damage(0), 0);
        assert_eq!(unit.take_damage(-5), 0);
        unit.take_damage(10_000);
        assert_eq!(unit.take_damage(50), 0);
    }

    #[test]
    fn test_heal_caps_at_max_and_skips_dead() {
        let mut unit = swordsmen(5);
        unit.take_damage(20);
        unit.heal(100);
        assert_eq!(unit.first_unit_hp, 35);
        assert_eq!(unit.count, 5);

        let mut dead = swordsmen(1);
        dead.take_damage(35);
        dead.heal(100);
        assert!(!dead.is_alive());
    }

    #[test]
    fn test_resurrect_whole_creatures_and_remainder() {
        let mut unit = swordsmen(10);
        unit.take_damage(5 * 35); // down to 5
        let raised = unit.resurrect(2 * 35 + 10, 10);
        assert_eq!(raised, 2);
        assert_eq!(unit.count, 7);
        assert_eq!(unit.first_unit_hp, 35); // remainder capped at max
    }

    #[test]
    fn test_resurrect_capped_by_max_count() {
        let mut unit = swordsmen(10);
        unit.take_damage(35); // 9 left
        let raised = unit.resurrect(5 * 35, 10);
        assert_eq!(raised, 1);
        assert_eq!(unit.count, 10);
    }

    #[test]
    fn test_resurrect_from_dead() {
        let mut unit = swordsmen(2);
        unit.take_damage(2 * 35);
        assert!(!unit.is_alive());
        let raised = unit.resurrect(35 + 5, 2);
        assert_eq!(raised, 1);
        assert_eq!(unit.count, 1);
        assert_eq!(unit.first_unit_hp, 35);
    }

    #[test]
    fn test_turn_lifecycle() {
        let mut unit = swordsmen(5);
        unit.end_turn();
        unit.is_defending = true;
        unit.has_waited = true;
        unit.retaliations = 0;
        assert!(!unit.can_act());

        unit.start_turn();
        assert!(unit.can_act());
        assert!(!unit.is_defending);
        assert!(!unit.has_waited);
        assert_eq!(unit.retaliations, 1);
    }

    #[test]
    fn test_defending_adds_half_base_defense() {
        let mut unit = swordsmen(5);
        let base = unit.defense();
        unit.is_defending = true;
        assert_eq!(unit.defense(), base + base / 2);
    }

    #[test]
    fn test_effects_modify_stats_and_expire() {
        let mut unit = swordsmen(5);
        let base_attack = unit.attack();
        unit.add_effect(StatusEffect::new("Bloodlust", 2).with_attack(3));
        assert_eq!(unit.attack(), base_attack + 3);

        unit.update_status_effects();
        assert_eq!(unit.attack(), base_attack + 3);
        unit.update_status_effects();
        assert_eq!(unit.attack(), base_attack);
        assert!(unit.effects.is_empty());
    }

    #[test]
    fn test_effective_stats_floor_at_zero() {
        let mut unit = swordsmen(5);
        unit.add_effect(StatusEffect::new("Weakness", 3).with_attack(-100).with_speed(-100));
        assert_eq!(unit.attack(), 0);
        assert_eq!(unit.speed(), 0);
        assert_eq!(unit.initiative(), 0);
    }

    #[test]
    fn test_shooter_resources() {
        let unit = CombatUnit::new(
            UnitId(2),
            CreatureType::archer(),
            4,
            BattleSide::Defender,
            1,
            HexCoord::new(15, 2),
        );
        assert_eq!(unit.shots, 12);
        assert!(unit.can_shoot());
    }
}
