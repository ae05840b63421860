use thiserror::Error;

#[derive(Error, Debug)]
pub enum HexmarchError {
    #[error("Creature not found in bestiary: {0}")]
    CreatureNotFound(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HexmarchError>;
