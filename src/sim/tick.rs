//! Turn engine
//!
//! Owns the match and advances it one tick at a time. Human input and AI
//! decisions go through the same fire path, so both get the same validation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ai::{self, Shot};
use super::ballistics::{Projectile, launch_velocity, preview_trajectory};
use super::castle::Bounds;
use super::collision::{Impact, detect_impact};
use super::observer::MatchObserver;
use super::player::{EconomyAction, Player};
use super::state::{AiTicket, GamePhase, GameState, HudSnapshot, MatchOutcome, PendingAiShot};
use crate::config::MatchConfig;
use crate::consts::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::error::{FireError, SetupError};
use crate::{clamp_angle, clamp_power};

/// The authoritative match driver
pub struct Engine<O: MatchObserver> {
    config: MatchConfig,
    state: GameState,
    rng: Pcg32,
    observer: O,
    last_tick_ms: Option<f64>,
}

impl<O: MatchObserver> Engine<O> {
    /// Set up a match and prepare the first turn
    pub fn new(config: MatchConfig, observer: O) -> Result<Self, SetupError> {
        let state = GameState::new(&config, config.seed)?;
        let rng = Pcg32::seed_from_u64(config.seed);
        let mut engine = Self {
            config,
            state,
            rng,
            observer,
            last_tick_ms: None,
        };
        log::info!(
            "Match set up: {} vs {} on {} terrain ({}x{}, seed {})",
            engine.state.players[0].name,
            engine.state.players[1].name,
            engine.config.terrain.as_str(),
            engine.config.width,
            engine.config.height,
            engine.config.seed
        );
        engine.start_match();
        Ok(engine)
    }

    // === Inbound commands ===

    /// Fire request from the human controls
    pub fn fire_command(&mut self, angle_deg: f32, power: f32) -> Result<(), FireError> {
        if let GamePhase::AwaitingInput { player } = self.state.phase {
            if !self.state.players[player].is_human() {
                let err = FireError::ControlsDisabled;
                self.reject(&err);
                return Err(err);
            }
        }
        self.fire(Shot { angle_deg, power })
    }

    /// The human moved the aim sliders
    pub fn aim_changed(&mut self, angle_deg: f32, power: f32) {
        self.state.human_aim = Shot {
            angle_deg: clamp_angle(angle_deg),
            power: clamp_power(power),
        };
        if let GamePhase::AwaitingInput { player } = self.state.phase {
            let aim = self.state.human_aim.angle_deg;
            let player = &mut self.state.players[player];
            if player.is_human() {
                player.weapon.set_aim_angle(aim);
            }
        }
    }

    /// New AI difficulty, clamped to 1..=10
    pub fn difficulty_changed(&mut self, level: i32) {
        let level = level.clamp(MIN_DIFFICULTY as i32, MAX_DIFFICULTY as i32) as u8;
        if level != self.state.difficulty {
            log::debug!("AI difficulty {} -> {}", self.state.difficulty, level);
            self.state.difficulty = level;
        }
    }

    /// Start over with fresh castles, terrain and wind
    ///
    /// Any AI decision scheduled before the restart becomes stale.
    pub fn restart_requested(&mut self) {
        let terrain_seed = self.rng.random::<u64>();
        let mut state = match GameState::new(&self.config, terrain_seed) {
            Ok(state) => state,
            Err(err) => {
                log::error!("Restart failed: {}", err);
                return;
            }
        };
        state.generation = self.state.generation + 1;
        state.difficulty = self.state.difficulty;
        state.human_aim = self.state.human_aim;
        state.controls_enabled = self.state.controls_enabled;
        self.state = state;

        log::info!("Match restarted (generation {})", self.state.generation);
        self.start_match();
    }

    /// Spend gold on the human's turn; silently does nothing if unaffordable
    pub fn economy_action(&mut self, action: EconomyAction) -> bool {
        match self.state.phase {
            GamePhase::AwaitingInput { player } if self.state.players[player].is_human() => {
                self.apply_economy(player, action)
            }
            _ => false,
        }
    }

    /// Frame callback with a monotonic timestamp in milliseconds
    ///
    /// The first call only latches the clock.
    pub fn tick(&mut self, now_ms: f64) {
        let dt = match self.last_tick_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        self.step(dt);
    }

    /// Advance the simulation by `dt` seconds (clamped to `[0, max_dt]`)
    pub fn step(&mut self, dt: f32) {
        if self.state.phase.is_over() {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_dt)
        } else {
            0.0
        };
        self.state.clock += dt as f64;

        for player in &mut self.state.players {
            player.weapon.update(dt);
        }

        if let Some(mut projectile) = self.state.projectile {
            projectile.step(dt, self.state.wind);
            self.state.projectile = Some(projectile);

            let castles: Vec<Bounds> = self.state.players.iter().map(|p| p.castle.bounds()).collect();
            if let Some(impact) = detect_impact(projectile.pos, &self.state.terrain, &castles) {
                self.resolve_impact(impact);
            }
            return;
        }

        if let Some(pending) = self.state.pending_ai {
            if self.state.clock >= pending.due_at {
                self.state.pending_ai = None;
                self.resolve_ai_turn(pending.ticket);
            }
        }
    }

    /// Run a scheduled AI decision
    ///
    /// Returns true if a shot was fired. Stale tickets (older generation, or
    /// no longer that player's turn) are discarded.
    pub fn resolve_ai_turn(&mut self, ticket: AiTicket) -> bool {
        if ticket.generation != self.state.generation {
            log::debug!(
                "Discarding stale AI ticket (generation {} != {})",
                ticket.generation,
                self.state.generation
            );
            return false;
        }
        if self.state.phase != (GamePhase::AwaitingInput { player: ticket.player })
            || self.state.players[ticket.player].is_human()
        {
            log::debug!("Discarding AI ticket for player {}: not their turn", ticket.player);
            return false;
        }

        let cooldown = self.state.players[ticket.player].weapon.cooldown();
        if cooldown > 0.0 {
            let due_at = self.state.clock + cooldown as f64;
            log::debug!("AI weapon reloading, retrying in {:.2}s", cooldown);
            self.state.pending_ai = Some(PendingAiShot { ticket, due_at });
            return false;
        }

        if let Some(action) = ai::choose_economy_action(&self.state.players[ticket.player], &self.config) {
            self.apply_economy(ticket.player, action);
        }

        let opponent = self.state.opponent_of(ticket.player);
        let shot = ai::choose_shot(
            &self.state.players[ticket.player].castle,
            &self.state.players[opponent].castle,
            self.state.difficulty,
            self.state.wind,
            &self.config,
            &mut self.rng,
        );
        self.fire(shot).is_ok()
    }

    // === Queries ===

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted test setups
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn wind(&self) -> f32 {
        self.state.wind
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn current_player(&self) -> usize {
        self.state.current_player
    }

    pub fn difficulty(&self) -> u8 {
        self.state.difficulty
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn hud(&self) -> HudSnapshot {
        self.state.hud()
    }

    pub fn terrain_height_at(&self, x: f32) -> f32 {
        self.state.terrain.height_at(x)
    }

    pub fn castle_bounds(&self, player: usize) -> Option<Bounds> {
        self.state.players.get(player).map(|p| p.castle.bounds())
    }

    pub fn projectile_position(&self) -> Option<Vec2> {
        self.state.projectile.map(|p| p.pos)
    }

    /// The scheduled AI decision, if one is waiting
    pub fn pending_ai_ticket(&self) -> Option<AiTicket> {
        self.state.pending_ai.map(|p| p.ticket)
    }

    /// Aim guide for the human's pending aim; empty when not applicable
    pub fn trajectory_preview(&self) -> Vec<Vec2> {
        let GamePhase::AwaitingInput { player } = self.state.phase else {
            return Vec::new();
        };
        let player = &self.state.players[player];
        if !player.is_human() || self.state.projectile.is_some() {
            return Vec::new();
        }
        let aim = self.state.human_aim;
        let vel = launch_velocity(
            aim.angle_deg,
            aim.power,
            player.castle.is_left_side,
            self.config.base_speed,
            self.config.extra_speed,
        );
        preview_trajectory(
            player.castle.muzzle_position(),
            vel,
            self.state.wind,
            &self.state.terrain,
        )
    }

    // === Turn flow ===

    fn start_match(&mut self) {
        self.state.wind = self.roll_wind();
        self.observer.controls_enabled_changed(self.state.controls_enabled);
        self.prepare_turn();
    }

    fn fire(&mut self, shot: Shot) -> Result<(), FireError> {
        if let Err(err) = self.check_can_fire() {
            self.reject(&err);
            return Err(err);
        }

        let angle = clamp_angle(shot.angle_deg);
        let power = clamp_power(shot.power);
        let (base_speed, extra_speed) = (self.config.base_speed, self.config.extra_speed);

        let shooter = self.state.current_mut();
        let muzzle = shooter.castle.muzzle_position();
        let vel = launch_velocity(angle, power, shooter.castle.is_left_side, base_speed, extra_speed);
        shooter.weapon.mark_fired();
        shooter.weapon.set_aim_angle(angle);
        let name = shooter.name.clone();

        self.state.projectile = Some(Projectile::new(muzzle, vel));
        self.state.phase = GamePhase::ProjectileInFlight;
        self.state.pending_ai = None;
        self.state.shots_fired += 1;
        self.set_controls(false);

        log::info!("{} fires: {:.1}° at {:.0}% power", name, angle, power * 100.0);
        self.observer.message(&format!("{} fires!", name));
        Ok(())
    }

    fn check_can_fire(&self) -> Result<(), FireError> {
        match self.state.phase {
            GamePhase::GameOver(_) => Err(FireError::MatchOver),
            GamePhase::ProjectileInFlight | GamePhase::TurnResolving => {
                Err(FireError::ProjectileInFlight)
            }
            GamePhase::AwaitingInput { .. } => {
                if self.state.projectile.is_some() {
                    return Err(FireError::ProjectileInFlight);
                }
                let weapon = &self.state.current().weapon;
                if weapon.can_fire() {
                    Ok(())
                } else {
                    Err(FireError::Reloading {
                        remaining: weapon.cooldown(),
                    })
                }
            }
        }
    }

    fn reject(&mut self, err: &FireError) {
        log::warn!("Fire rejected: {}", err);
        self.observer.message(&err.user_message());
    }

    fn resolve_impact(&mut self, impact: Impact) {
        self.state.phase = GamePhase::TurnResolving;
        self.state.projectile = None;

        let shooter_idx = self.state.current_player;
        let shooter = self.state.players[shooter_idx].name.clone();
        match impact {
            Impact::Castle(idx) => {
                let damage = self.config.damage;
                let target = &mut self.state.players[idx];
                target.castle.apply_damage(damage);
                log::info!(
                    "{} hits {} for {} ({} hp left)",
                    shooter,
                    target.name,
                    damage,
                    target.castle.hp()
                );
                let text = if idx == shooter_idx {
                    format!("{} hits their own castle (-{} HP)!", shooter, damage)
                } else {
                    format!("{} hits {}'s castle (-{} HP)!", shooter, target.name, damage)
                };
                self.observer.message(&text);
            }
            Impact::Terrain | Impact::OutOfBounds => {
                log::debug!("{}'s shot missed ({:?})", shooter, impact);
                self.observer.message("The shot misses its target.");
            }
        }
        self.emit_hud();

        if let Some(outcome) = self.state.outcome() {
            self.finish(outcome);
            return;
        }
        self.next_turn();
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        self.state.phase = GamePhase::GameOver(outcome);
        self.state.pending_ai = None;
        self.set_controls(false);

        let name = match outcome {
            MatchOutcome::Winner { player } => self.state.players[player].name.clone(),
            MatchOutcome::Draw => "draw".to_string(),
        };
        log::info!("Match over after {} shots: {}", self.state.shots_fired, name);
        if outcome == MatchOutcome::Draw {
            self.observer.message("Nobody wins - both castles destroyed!");
        }
        self.observer.winner(outcome, &name);
    }

    fn next_turn(&mut self) {
        self.state.current_player = self.state.opponent_of(self.state.current_player);
        self.state.wind = self.roll_wind();
        self.prepare_turn();
    }

    fn prepare_turn(&mut self) {
        let idx = self.state.current_player;
        self.state.phase = GamePhase::AwaitingInput { player: idx };

        let income = self.config.income_for(self.state.players[idx].income_level);
        self.state.players[idx].earn(income);
        self.emit_hud();

        let name = self.state.players[idx].name.clone();
        log::debug!(
            "Turn {}: {} (wind {:+.1}, +{} gold)",
            self.state.shots_fired + 1,
            name,
            self.state.wind,
            income
        );

        if self.state.players[idx].is_human() {
            let aim = self.state.human_aim.angle_deg;
            self.state.players[idx].weapon.set_aim_angle(aim);
            self.set_controls(true);
            self.observer
                .message(&format!("{}, your turn: set angle and power, then fire.", name));
        } else {
            self.set_controls(false);
            self.observer.message(&format!("{} is aiming...", name));
            self.state.pending_ai = Some(PendingAiShot {
                ticket: AiTicket {
                    generation: self.state.generation,
                    player: idx,
                },
                due_at: self.state.clock + self.config.ai_delay.max(0.0) as f64,
            });
        }
    }

    fn apply_economy(&mut self, idx: usize, action: EconomyAction) -> bool {
        let config = &self.config;
        let player = &mut self.state.players[idx];
        let done = match action {
            EconomyAction::Repair => player.buy_repair(config.repair_cost, config.repair_amount),
            EconomyAction::UpgradeIncome => {
                let cost = config.upgrade_cost(player.income_level);
                player.buy_income_upgrade(cost)
            }
        };
        if !done {
            log::debug!("{}: {:?} not possible ({:.0} gold)", player.name, action, player.gold);
            return false;
        }

        let text = match action {
            EconomyAction::Repair => format!(
                "{} repairs their castle ({} HP).",
                player.name,
                player.castle.hp()
            ),
            EconomyAction::UpgradeIncome => format!(
                "{} raises income to level {}.",
                player.name, player.income_level
            ),
        };
        log::debug!("{}", text);
        self.observer.message(&text);
        self.emit_hud();
        true
    }

    fn roll_wind(&mut self) -> f32 {
        let max = self.config.wind_max.abs();
        let wind = if max > 0.0 {
            self.rng.random_range(-max..=max)
        } else {
            0.0
        };
        log::debug!("Wind rolled: {:+.1}", wind);
        wind
    }

    fn set_controls(&mut self, enabled: bool) {
        if self.state.controls_enabled != enabled {
            self.state.controls_enabled = enabled;
            self.observer.controls_enabled_changed(enabled);
        }
    }

    fn emit_hud(&mut self) {
        let hud = self.state.hud();
        self.observer.state_changed(&hud);
    }
}
