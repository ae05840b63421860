//! Battle system constants - all tunable values in one place

// Battlefield dimensions (fixed 17x11 hex grid)
pub const FIELD_WIDTH: i32 = 17;
pub const FIELD_HEIGHT: i32 = 11;
pub const FIELD_SIZE: i32 = FIELD_WIDTH * FIELD_HEIGHT;

// Edge columns are reserved for the hero icons and never hold units
pub const ATTACKER_HERO_COLUMN: i32 = 0;
pub const DEFENDER_HERO_COLUMN: i32 = FIELD_WIDTH - 1;

// Deployment columns for army slots
pub const ATTACKER_DEPLOY_COLUMNS: [i32; 2] = [1, 2];
pub const DEFENDER_DEPLOY_COLUMNS: [i32; 2] = [14, 15];
pub const ARMY_SLOTS: usize = 7;

// Damage pipeline - attack factors are ADDITIVE (1.0 + sum)
pub const ATTACK_SKILL_FACTOR_PER_POINT: f64 = 0.05;
pub const ATTACK_SKILL_FACTOR_CAP: f64 = 3.0;
pub const LUCKY_STRIKE_BONUS: f64 = 1.0;
pub const DEATH_BLOW_BONUS: f64 = 1.0;
pub const DOUBLE_DAMAGE_BONUS: f64 = 1.0;

// Damage pipeline - defense factors are MULTIPLICATIVE (product of 1 - f)
pub const DEFENSE_SKILL_FACTOR_PER_POINT: f64 = 0.025;
pub const DEFENSE_SKILL_FACTOR_CAP: f64 = 0.7;
pub const MELEE_SHOOTER_PENALTY: f64 = 0.5;
pub const UNLUCKY_STRIKE_PENALTY: f64 = 0.5;

// Damage never drops below this, no matter how bad the matchup
pub const MINIMUM_DAMAGE: i32 = 1;

// Defending grants +50% of base defense for the turn
pub const DEFEND_BONUS_PERCENT: i32 = 50;

// Combat resources
pub const RETALIATIONS_PER_TURN: i32 = 1;

// AI action scoring
pub const AI_KILL_BONUS: f64 = 100.0;
pub const AI_SUICIDE_PENALTY: f64 = 1000.0;
