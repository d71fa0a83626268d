//! Castle Duel - a two-castle artillery duel
//!
//! Core modules:
//! - `sim`: Turn/combat simulation (terrain, ballistics, collisions, AI, turn engine)
//! - `config`: Data-driven match setup and balance
//! - `error`: Setup and command rejection errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::{MatchConfig, PlayerSetup, TerrainStyle};
pub use error::{FireError, SetupError};

/// Game configuration constants
pub mod consts {
    /// Downward acceleration (pixels/s²), screen coordinates with y growing down
    pub const GRAVITY: f32 = 500.0;

    /// Projectile collision radius (cosmetic, impacts are point tests)
    pub const PROJECTILE_RADIUS: f32 = 4.0;

    /// Power is clamped into this range before computing launch speed
    pub const MIN_POWER: f32 = 0.1;
    pub const MAX_POWER: f32 = 1.0;

    /// Aim angle range (degrees above the horizontal, toward the opponent)
    pub const MIN_ANGLE_DEG: f32 = 0.0;
    pub const MAX_ANGLE_DEG: f32 = 90.0;

    /// Castle height never shrinks below this fraction of full height
    pub const MIN_HEIGHT_RATIO: f32 = 0.2;
    /// Muzzle sits this far above the castle's current top edge
    pub const MUZZLE_CLEARANCE: f32 = 6.0;

    /// Trajectory preview look-ahead
    pub const PREVIEW_STEPS: usize = 60;
    pub const PREVIEW_DT: f32 = 0.05;

    /// AI difficulty range
    pub const MIN_DIFFICULTY: u8 = 1;
    pub const MAX_DIFFICULTY: u8 = 10;
}

/// Clamp a user-facing aim angle into the valid range
#[inline]
pub fn clamp_angle(angle_deg: f32) -> f32 {
    if angle_deg.is_nan() {
        return consts::MIN_ANGLE_DEG;
    }
    angle_deg.clamp(consts::MIN_ANGLE_DEG, consts::MAX_ANGLE_DEG)
}

/// Clamp a user-facing power value into the valid range
#[inline]
pub fn clamp_power(power: f32) -> f32 {
    if power.is_nan() {
        return consts::MIN_POWER;
    }
    power.clamp(consts::MIN_POWER, consts::MAX_POWER)
}

/// Horizontal sign pointing from a castle toward its opponent
#[inline]
pub fn facing_sign(is_left_side: bool) -> f32 {
    if is_left_side { 1.0 } else { -1.0 }
}
