//! Match configuration and balance
//!
//! Every tunable lives here so a match can be set up from JSON. Missing
//! fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::error::SetupError;
use crate::sim::player::PlayerKind;

/// Largest accepted arena side (pixels)
pub const MAX_ARENA_SIZE: f32 = 16_384.0;
/// Shortest arena that still leaves room for ground and sky
pub const MIN_ARENA_HEIGHT: f32 = 100.0;

/// Terrain generation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TerrainStyle {
    /// Level ground at the baseline
    Flat,
    /// Baseline with a parabolic hill in the middle
    #[default]
    Hill,
    /// Seeded sine hills with noise, flattened toward the edges
    Procedural,
}

impl TerrainStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainStyle::Flat => "Flat",
            TerrainStyle::Hill => "Hill",
            TerrainStyle::Procedural => "Procedural",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Some(TerrainStyle::Flat),
            "hill" => Some(TerrainStyle::Hill),
            "procedural" | "proc" => Some(TerrainStyle::Procedural),
            _ => None,
        }
    }
}

/// One entry of the player roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    pub kind: PlayerKind,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Complete match setup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // === Arena ===
    pub width: f32,
    pub height: f32,
    pub terrain: TerrainStyle,
    /// Seed for terrain, wind and AI noise
    pub seed: u64,

    // === Castles & weapons ===
    pub castle_width: f32,
    pub castle_height: f32,
    pub castle_max_hp: f32,
    /// Castle centres sit this fraction of the width in from each edge
    pub castle_inset: f32,
    /// Seconds between shots of the same weapon
    pub reload_time: f32,

    // === Ballistics ===
    pub base_speed: f32,
    pub extra_speed: f32,
    pub damage: f32,
    /// Wind is rolled uniformly in [-wind_max, wind_max]
    pub wind_max: f32,
    /// Upper bound on a single simulation step (seconds)
    pub max_dt: f32,

    // === AI ===
    /// Simulation seconds the AI waits before firing
    pub ai_delay: f32,
    pub difficulty: u8,

    // === Economy ===
    pub starting_gold: f32,
    pub base_income: f32,
    pub income_per_level: f32,
    pub repair_cost: f32,
    pub repair_amount: f32,
    pub upgrade_base_cost: f32,
    pub upgrade_cost_step: f32,

    /// Exactly two entries; index 0 gets the left castle
    pub players: Vec<PlayerSetup>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            terrain: TerrainStyle::Hill,
            seed: 1,

            castle_width: 60.0,
            castle_height: 140.0,
            castle_max_hp: 100.0,
            castle_inset: 0.15,
            reload_time: 2.0,

            base_speed: 250.0,
            extra_speed: 350.0,
            damage: 25.0,
            wind_max: 80.0,
            max_dt: 0.05,

            ai_delay: 0.8,
            difficulty: 5,

            starting_gold: 50.0,
            base_income: 20.0,
            income_per_level: 10.0,
            repair_cost: 40.0,
            repair_amount: 25.0,
            upgrade_base_cost: 60.0,
            upgrade_cost_step: 40.0,

            players: vec![
                PlayerSetup::new("Player", PlayerKind::Human),
                PlayerSetup::new("CPU", PlayerKind::Ai),
            ],
        }
    }
}

impl MatchConfig {
    /// Load a config from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded match config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject setups the engine cannot run
    pub fn validate(&self) -> Result<(), SetupError> {
        let fits = |v: f32, min: f32| v.is_finite() && v >= min && v <= MAX_ARENA_SIZE;
        if !(self.width > 0.0 && fits(self.width, 0.0) && fits(self.height, MIN_ARENA_HEIGHT)) {
            return Err(SetupError::InvalidArena {
                width: self.width,
                height: self.height,
            });
        }
        if self.players.len() != 2 {
            return Err(SetupError::PlayerCount(self.players.len()));
        }
        if !(self.castle_width > 0.0 && self.castle_height > 0.0) {
            return Err(SetupError::InvalidCastle("width and height must be positive"));
        }
        if !(self.castle_max_hp > 0.0) {
            return Err(SetupError::InvalidCastle("max hp must be positive"));
        }
        if !(self.castle_inset >= 0.0 && self.castle_inset < 0.5) {
            return Err(SetupError::InvalidCastle("inset must be in [0, 0.5)"));
        }
        if self.width < self.castle_width * 2.0 {
            return Err(SetupError::ArenaTooNarrow {
                width: self.width,
                castle_width: self.castle_width,
            });
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(SetupError::InvalidTiming("max_dt must be positive"));
        }
        if !(self.ai_delay.is_finite() && self.ai_delay >= 0.0) {
            return Err(SetupError::InvalidTiming("ai_delay must not be negative"));
        }
        if !(self.reload_time.is_finite() && self.reload_time >= 0.0) {
            return Err(SetupError::InvalidTiming("reload_time must not be negative"));
        }
        Ok(())
    }

    /// Difficulty clamped into the AI's accepted range
    pub fn clamped_difficulty(&self) -> u8 {
        self.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }

    /// Gold needed to raise income from `level` to `level + 1`
    pub fn upgrade_cost(&self, level: u32) -> f32 {
        self.upgrade_base_cost + self.upgrade_cost_step * level as f32
    }

    /// Gold credited at the start of a turn for the given income level
    pub fn income_for(&self, level: u32) -> f32 {
        self.base_income + self.income_per_level * level as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_terrain_style_from_str() {
        assert_eq!(TerrainStyle::from_str("FLAT"), Some(TerrainStyle::Flat));
        assert_eq!(TerrainStyle::from_str("proc"), Some(TerrainStyle::Procedural));
        assert_eq!(TerrainStyle::from_str("lava"), None);
        assert_eq!(TerrainStyle::Hill.as_str(), "Hill");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MatchConfig::from_json(r#"{ "width": 1024, "terrain": "Procedural" }"#)
            .expect("valid config");
        assert_eq!(config.width, 1024.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.terrain, TerrainStyle::Procedural);
        assert_eq!(config.players.len(), 2);
    }

    #[test]
    fn test_rejects_bad_arena() {
        let err = MatchConfig::from_json(r#"{ "width": 0 }"#).unwrap_err();
        assert!(matches!(err, SetupError::InvalidArena { .. }));
    }

    #[test]
    fn test_rejects_unbounded_arena() {
        for json in [
            r#"{ "width": 1e300 }"#,
            r#"{ "height": 1e300 }"#,
            r#"{ "width": 100000 }"#,
            r#"{ "height": 30, "terrain": "Procedural" }"#,
        ] {
            let err = MatchConfig::from_json(json).unwrap_err();
            assert!(matches!(err, SetupError::InvalidArena { .. }), "{json}");
        }
    }

    #[test]
    fn test_rejects_bad_timing() {
        for json in [
            r#"{ "max_dt": -1 }"#,
            r#"{ "max_dt": 0 }"#,
            r#"{ "ai_delay": -0.5 }"#,
            r#"{ "reload_time": -2 }"#,
        ] {
            let err = MatchConfig::from_json(json).unwrap_err();
            assert!(matches!(err, SetupError::InvalidTiming(_)), "{json}");
        }
    }

    #[test]
    fn test_rejects_castle_inset_past_centre() {
        for inset in [0.5, 0.8, -0.1, f32::NAN] {
            let config = MatchConfig {
                castle_inset: inset,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(SetupError::InvalidCastle(_))));
        }
        let config = MatchConfig {
            castle_inset: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_wrong_player_count() {
        let config = MatchConfig {
            players: vec![PlayerSetup::new("Solo", PlayerKind::Human)],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SetupError::PlayerCount(1))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = MatchConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SetupError::Parse(_)));
    }

    #[test]
    fn test_economy_formulas() {
        let config = MatchConfig::default();
        assert_eq!(config.income_for(0), 20.0);
        assert_eq!(config.income_for(2), 40.0);
        assert_eq!(config.upgrade_cost(0), 60.0);
        assert_eq!(config.upgrade_cost(1), 100.0);
    }

    #[test]
    fn test_difficulty_clamped() {
        let config = MatchConfig {
            difficulty: 42,
            ..Default::default()
        };
        assert_eq!(config.clamped_difficulty(), 10);
        let config = MatchConfig {
            difficulty: 0,
            ..Default::default()
        };
        assert_eq!(config.clamped_difficulty(), 1);
    }
}
