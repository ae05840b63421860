//! Battle system - deterministic turn-based tactical combat
//!
//! The rules layer only: who acts when, how attacks become casualties, and
//! how the AI picks an action. Rendering, input and persistence live with
//! the caller.

pub mod actions;
pub mod ai;
pub mod constants;
pub mod creature;
pub mod damage;
pub mod deployment;
pub mod engine;
pub mod events;
pub mod hex;
pub mod scheduler;
pub mod unit;

// Re-exports for convenient access
pub use actions::{AttackResult, BattleAction};
pub use ai::{select_action, AttackPossibility};
pub use constants::*;
pub use creature::{Bestiary, CreatureTrait, CreatureType};
pub use damage::{estimate, kills_from_damage, AttackContext, DamageEstimation};
pub use deployment::{deployment_position, place_rosters, ArmySlot, Roster};
pub use engine::{BattleEngine, BattlePhase, BattleResult, FieldTerrain, Obstacle};
pub use events::{BattleEvent, BattleEventKind, BattleEventLog};
pub use hex::{HexCoord, HexDirection, UNREACHABLE};
pub use scheduler::{TurnPhase, TurnQueueEntry, TurnScheduler};
pub use unit::{BattleSide, CombatUnit, StatusEffect, UnitId};
