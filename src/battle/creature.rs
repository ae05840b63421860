//! Creature types and the bestiary
//!
//! Creature data is explicit input to the battle - there is no global
//! registry. The built-in bestiary covers tests and the demo driver;
//! campaigns load their own stat blocks from TOML.

use serde::{Deserialize, Serialize};

use crate::core::error::{HexmarchError, Result};

/// Combat traits a creature can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureTrait {
    /// Has a ranged attack (shots come from the stat block)
    Ranged,
    /// Suffers no melee penalty despite being a shooter
    ShootInMelee,
    /// Melee attacks against others draw no retaliation
    NoMeleeRetaliation,
    /// Ignores ground obstacles when deployed (movement metadata)
    Flying,
    /// Strikes twice per attack - declared, not yet wired to resolution
    DoubleAttack,
}

/// Stat block for one creature kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureType {
    pub name: String,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// Hit points of a single creature
    pub max_health: i32,
    pub min_damage: i32,
    pub max_damage: i32,
    /// Ammunition for ranged attacks; 0 for melee-only creatures
    #[serde(default)]
    pub shots: i32,
    #[serde(default)]
    pub traits: Vec<CreatureTrait>,
}

impl CreatureType {
    pub fn has_trait(&self, t: CreatureTrait) -> bool {
        self.traits.contains(&t)
    }

    /// Does this creature have a ranged attack at all?
    pub fn is_shooter(&self) -> bool {
        self.shots > 0 || self.has_trait(CreatureTrait::Ranged)
    }

    // Built-in stat blocks

    pub fn militia() -> Self {
        Self {
            name: "Militia".into(),
            attack: 2,
            defense: 2,
            speed: 4,
            max_health: 6,
            min_damage: 1,
            max_damage: 2,
            shots: 0,
            traits: vec![],
        }
    }

    pub fn archer() -> Self {
        Self {
            name: "Archer".into(),
            attack: 6,
            defense: 3,
            speed: 4,
            max_health: 10,
            min_damage: 2,
            max_damage: 3,
            shots: 12,
            traits: vec![CreatureTrait::Ranged],
        }
    }

    pub fn swordsman() -> Self {
        Self {
            name: "Swordsman".into(),
            attack: 10,
            defense: 12,
            speed: 5,
            max_health: 35,
            min_damage: 6,
            max_damage: 9,
            shots: 0,
            traits: vec![],
        }
    }

    pub fn marksman() -> Self {
        Self {
            name: "Marksman".into(),
            attack: 9,
            defense: 5,
            speed: 6,
            max_health: 15,
            min_damage: 3,
            max_damage: 5,
            shots: 24,
            traits: vec![CreatureTrait::Ranged, CreatureTrait::ShootInMelee],
        }
    }

    pub fn dire_wolf() -> Self {
        Self {
            name: "Dire Wolf".into(),
            attack: 8,
            defense: 5,
            speed: 9,
            max_health: 20,
            min_damage: 3,
            max_damage: 7,
            shots: 0,
            traits: vec![CreatureTrait::NoMeleeRetaliation],
        }
    }

    pub fn ogre() -> Self {
        Self {
            name: "Ogre".into(),
            attack: 13,
            defense: 7,
            speed: 4,
            max_health: 60,
            min_damage: 6,
            max_damage: 12,
            shots: 0,
            traits: vec![],
        }
    }

    pub fn griffin() -> Self {
        Self {
            name: "Griffin".into(),
            attack: 8,
            defense: 8,
            speed: 6,
            max_health: 25,
            min_damage: 3,
            max_damage: 6,
            shots: 0,
            traits: vec![CreatureTrait::Flying],
        }
    }
}

/// Lookup table of creature stat blocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bestiary {
    creatures: Vec<CreatureType>,
}

/// On-disk shape of a bestiary TOML file
#[derive(Debug, Deserialize)]
struct BestiaryFile {
    #[serde(rename = "creature")]
    creatures: Vec<CreatureType>,
}

impl Bestiary {
    /// The built-in roster used by tests and the demo driver
    pub fn builtin() -> Self {
        Self {
            creatures: vec![
                CreatureType::militia(),
                CreatureType::archer(),
                CreatureType::swordsman(),
                CreatureType::marksman(),
                CreatureType::dire_wolf(),
                CreatureType::ogre(),
                CreatureType::griffin(),
            ],
        }
    }

    /// Parse a bestiary from TOML content ([[creature]] tables)
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: BestiaryFile = toml::from_str(content)?;
        Ok(Self {
            creatures: file.creatures,
        })
    }

    /// Load a bestiary from a TOML file on disk
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn get(&self, name: &str) -> Option<&CreatureType> {
        self.creatures.iter().find(|c| c.name == name)
    }

    /// Lookup that errors on a missing name, for roster construction
    pub fn require(&self, name: &str) -> Result<&CreatureType> {
        self.get(name)
            .ok_or_else(|| HexmarchError::CreatureNotFound(name.to_string()))
    }

    pub fn creatures(&self) -> &[CreatureType] {
        &self.creatures
    }
}
