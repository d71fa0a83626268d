//! Castle Duel entry point
//!
//! Runs a headless AI-vs-AI match at a simulated 60 Hz frame rate and prints
//! the final HUD as JSON. An optional argument names a JSON match config.

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use castle_duel::MatchConfig;
#[cfg(not(target_arch = "wasm32"))]
use castle_duel::sim::{Engine, GamePhase, LogObserver, PlayerKind};

/// Simulated frame interval (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Give up after this many simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_MINUTES: usize = 30;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Castle Duel (headless) starting...");

    let mut config = match std::env::args().nth(1) {
        Some(path) => match MatchConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Failed to load config {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => MatchConfig::default(),
    };

    // Nobody is at the controls: every side is played by the AI
    for setup in &mut config.players {
        setup.kind = PlayerKind::Ai;
    }

    let mut engine = match Engine::new(config, LogObserver) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Invalid match setup: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let max_frames = MAX_MINUTES * 60 * 60;
    let mut frames = 0;
    while !engine.phase().is_over() && frames < max_frames {
        engine.tick(frames as f64 * FRAME_MS);
        frames += 1;
    }

    match engine.phase() {
        GamePhase::GameOver(outcome) => {
            log::info!("Finished after {} frames: {:?}", frames, outcome)
        }
        _ => log::warn!("No winner after {} simulated minutes", MAX_MINUTES),
    }

    match serde_json::to_string_pretty(&engine.hud()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Failed to serialize HUD: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only; embedders drive `Engine` directly
}
