//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a battle instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleId(pub Uuid);

impl BattleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BattleId {
    fn default() -> Self {
        Self::new()
    }
}

/// Battle round counter (starts at 0, incremented when a round begins)
pub type Round = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_id_unique() {
        let a = BattleId::new();
        let b = BattleId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_battle_id_hash() {
        use std::collections::HashMap;
        let id = BattleId::new();
        let mut map: HashMap<BattleId, &str> = HashMap::new();
        map.insert(id, "skirmish");
        assert_eq!(map.get(&id), Some(&"skirmish"));
    }
}
