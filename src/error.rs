//! Error types
//!
//! Setup problems are fatal and surface once from construction. Fire
//! rejections are ordinary outcomes: the engine reports them to the player
//! and leaves state untouched.

use thiserror::Error;

/// Fatal problems detected while building a match
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("arena must be between 1x100 and 16384x16384, got {width}x{height}")]
    InvalidArena { width: f32, height: f32 },

    #[error("arena width {width} cannot fit two castles of width {castle_width}")]
    ArenaTooNarrow { width: f32, castle_width: f32 },

    #[error("a duel needs exactly 2 players, got {0}")]
    PlayerCount(usize),

    #[error("invalid castle geometry: {0}")]
    InvalidCastle(&'static str),

    #[error("invalid timing: {0}")]
    InvalidTiming(&'static str),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reasons a fire command is refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FireError {
    #[error("a projectile is already in flight")]
    ProjectileInFlight,

    #[error("weapon is reloading ({remaining:.1}s left)")]
    Reloading { remaining: f32 },

    #[error("controls are disabled")]
    ControlsDisabled,

    #[error("the match is over")]
    MatchOver,
}

impl FireError {
    /// Message shown to the player when the command is rejected
    pub fn user_message(&self) -> String {
        match self {
            FireError::ProjectileInFlight => "Wait for the shot to land.".to_string(),
            FireError::Reloading { .. } => "The weapon is still reloading...".to_string(),
            FireError::ControlsDisabled => "It's not your turn.".to_string(),
            FireError::MatchOver => "The match is over.".to_string(),
        }
    }
}
