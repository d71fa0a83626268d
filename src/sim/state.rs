//! Game state and core simulation types
//!
//! Everything the turn engine mutates lives in [`GameState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::Shot;
use super::ballistics::Projectile;
use super::castle::{Castle, Weapon};
use super::player::Player;
use super::terrain::Terrain;
use crate::config::MatchConfig;
use crate::error::SetupError;

/// Castle colours (cosmetic)
pub const LEFT_CASTLE_COLOR: u32 = 0x4EA5FF;
pub const RIGHT_CASTLE_COLOR: u32 = 0xFF6B6B;

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner { player: usize },
    Draw,
}

/// Turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the active player's fire command
    AwaitingInput { player: usize },
    /// The shot is flying
    ProjectileInFlight,
    /// Impact is being applied; never observed between ticks
    TurnResolving,
    /// Terminal
    GameOver(MatchOutcome),
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::GameOver(_))
    }
}

/// Identifies one scheduled AI decision
///
/// A ticket from before a restart carries an old generation and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTicket {
    pub generation: u64,
    pub player: usize,
}

/// An AI decision waiting for its delay to run out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingAiShot {
    pub ticket: AiTicket,
    /// Simulation clock time (seconds) at which the AI fires
    pub due_at: f64,
}

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub turn_owner: String,
    pub hp_left: f32,
    pub max_hp_left: f32,
    pub hp_right: f32,
    pub max_hp_right: f32,
    pub wind: f32,
    pub gold_left: f32,
    pub gold_right: f32,
}

/// Authoritative match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Index 0 owns the left castle
    pub players: Vec<Player>,
    pub current_player: usize,
    pub phase: GamePhase,
    /// At most one shot exists at any time
    pub projectile: Option<Projectile>,
    /// Horizontal acceleration, re-rolled every turn
    pub wind: f32,
    pub terrain: Terrain,
    pub difficulty: u8,
    /// Pending aim edited by the human (drives preview and barrel facing)
    pub human_aim: Shot,
    pub controls_enabled: bool,
    /// Bumped on every restart
    pub generation: u64,
    pub pending_ai: Option<PendingAiShot>,
    /// Simulation seconds since the match started
    pub clock: f64,
    /// Shots fired this match
    pub shots_fired: u32,
}

impl GameState {
    /// Build a fresh match: terrain, two castles on the ground, two players
    pub fn new(config: &MatchConfig, terrain_seed: u64) -> Result<Self, SetupError> {
        config.validate()?;

        let terrain = Terrain::new(config.terrain, config.width, config.height, terrain_seed);
        let players = config
            .players
            .iter()
            .enumerate()
            .map(|(i, setup)| {
                let is_left = i == 0;
                let x = if is_left {
                    config.width * config.castle_inset
                } else {
                    config.width * (1.0 - config.castle_inset)
                };
                let castle = Castle::new(
                    Vec2::new(x, terrain.height_at(x)),
                    config.castle_width,
                    config.castle_height,
                    config.castle_max_hp,
                    is_left,
                    if is_left { LEFT_CASTLE_COLOR } else { RIGHT_CASTLE_COLOR },
                );
                let mut player = Player::new(
                    setup.name.clone(),
                    setup.kind,
                    castle,
                    Weapon::new(config.reload_time),
                );
                player.gold = config.starting_gold;
                player
            })
            .collect();

        Ok(Self {
            players,
            current_player: 0,
            phase: GamePhase::AwaitingInput { player: 0 },
            projectile: None,
            wind: 0.0,
            terrain,
            difficulty: config.clamped_difficulty(),
            human_aim: Shot {
                angle_deg: 45.0,
                power: 0.6,
            },
            controls_enabled: false,
            generation: 0,
            pending_ai: None,
            clock: 0.0,
            shots_fired: 0,
        })
    }

    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    /// Index of the other player
    pub fn opponent_of(&self, player: usize) -> usize {
        (player + 1) % self.players.len()
    }

    pub fn hud(&self) -> HudSnapshot {
        let (left, right) = (&self.players[0], &self.players[1]);
        HudSnapshot {
            turn_owner: self.current().name.clone(),
            hp_left: left.castle.hp(),
            max_hp_left: left.castle.max_hp,
            hp_right: right.castle.hp(),
            max_hp_right: right.castle.max_hp,
            wind: self.wind,
            gold_left: left.gold,
            gold_right: right.gold,
        }
    }

    /// Decide the match if any castle is down
    pub fn outcome(&self) -> Option<MatchOutcome> {
        let left_down = self.players[0].castle.is_destroyed();
        let right_down = self.players[1].castle.is_destroyed();
        match (left_down, right_down) {
            (true, true) => Some(MatchOutcome::Draw),
            (true, false) => Some(MatchOutcome::Winner { player: 1 }),
            (false, true) => Some(MatchOutcome::Winner { player: 0 }),
            (false, false) => None,
        }
    }
}
