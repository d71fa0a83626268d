//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same config and the same tick
//! sequence, a match plays out identically:
//! - Seeded RNG only (wind, AI noise, terrain seeds)
//! - Simulation clock only, never wall time
//! - No rendering or platform dependencies

pub mod ai;
pub mod ballistics;
pub mod castle;
pub mod collision;
pub mod observer;
pub mod player;
pub mod state;
pub mod terrain;
pub mod tick;

pub use ai::{Shot, choose_economy_action, choose_shot};
pub use ballistics::{Projectile, launch_velocity, preview_trajectory, simulate_flight};
pub use castle::{Bounds, Castle, Weapon};
pub use collision::{Impact, detect_impact};
pub use observer::{LogObserver, MatchObserver, ObserverEvent, RecordingObserver};
pub use player::{EconomyAction, Player, PlayerKind};
pub use state::{AiTicket, GamePhase, GameState, HudSnapshot, MatchOutcome, PendingAiShot};
pub use terrain::Terrain;
pub use tick::Engine;
