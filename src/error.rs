//! Error types.

use thiserror::Error;

/// An asset the loader could not provide.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: String },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown power-up type '{0}' (expected damage, armor or speed)")]
    UnknownBoost(String),

    #[error("unknown weapon type '{0}'")]
    UnknownWeapon(String),

    #[error("no power-up is bound to spawn index {0}")]
    UnknownSpawnIndex(u8),

    #[error("the player has already been registered")]
    PlayerAlreadyRegistered,

    #[error("no player registered before the first frame")]
    MissingPlayer,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type GameResult<T> = Result<T, GameError>;
