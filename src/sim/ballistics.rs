//! Projectile flight under gravity and wind
//!
//! Semi-implicit Euler: velocity first, then position with the new velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Impact, detect_impact};
use super::terrain::Terrain;
use crate::consts::*;
use crate::{clamp_power, facing_sign};

/// The single in-flight shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
        }
    }

    /// Advance one timestep
    pub fn step(&mut self, dt: f32, wind: f32) {
        let (pos, vel) = integrate(self.pos, self.vel, wind, dt);
        self.pos = pos;
        self.vel = vel;
    }
}

/// One integration step, returning the new (position, velocity)
#[inline]
pub fn integrate(pos: Vec2, vel: Vec2, wind: f32, dt: f32) -> (Vec2, Vec2) {
    let vel = vel + Vec2::new(wind, GRAVITY) * dt;
    (pos + vel * dt, vel)
}

/// Launch speed for a power setting (power clamped to [0.1, 1])
#[inline]
pub fn launch_speed(power: f32, base_speed: f32, extra_speed: f32) -> f32 {
    base_speed + extra_speed * clamp_power(power)
}

/// Initial velocity for an aim, with "forward" pointing at the opponent
///
/// The angle is measured up from the horizontal; the side only flips the
/// horizontal component.
pub fn launch_velocity(
    angle_deg: f32,
    power: f32,
    is_left_side: bool,
    base_speed: f32,
    extra_speed: f32,
) -> Vec2 {
    let speed = launch_speed(power, base_speed, extra_speed);
    let angle = angle_deg.to_radians();
    Vec2::new(
        angle.cos() * speed * facing_sign(is_left_side),
        -angle.sin() * speed,
    )
}

/// Points of a predicted flight, for the aim guide
///
/// Runs the same integration as real flight for a fixed look-ahead and stops
/// early at the first bounds or terrain impact. Castles are ignored so the
/// guide does not reveal exact hits.
pub fn preview_trajectory(origin: Vec2, vel: Vec2, wind: f32, terrain: &Terrain) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(PREVIEW_STEPS);
    let (mut pos, mut vel) = (origin, vel);

    for _ in 0..PREVIEW_STEPS {
        (pos, vel) = integrate(pos, vel, wind, PREVIEW_DT);
        if detect_impact(pos, terrain, std::iter::empty()).is_some() {
            break;
        }
        points.push(pos);
    }

    points
}

/// Fly a shot to its first impact (bounded by `max_steps`)
///
/// Used by tests and tooling to check where a shot lands without running
/// the full engine.
pub fn simulate_flight<'a>(
    mut projectile: Projectile,
    wind: f32,
    dt: f32,
    terrain: &Terrain,
    castles: impl Iterator<Item = &'a super::castle::Bounds> + Clone,
    max_steps: usize,
) -> Option<(Impact, Vec2)> {
    for _ in 0..max_steps {
        projectile.step(dt, wind);
        if let Some(impact) = detect_impact(projectile.pos, terrain, castles.clone()) {
            return Some((impact, projectile.pos));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainStyle;

    #[test]
    fn test_step_applies_gravity_and_wind() {
        let mut p = Projectile::new(Vec2::new(100.0, 100.0), Vec2::new(10.0, -20.0));
        p.step(0.1, 30.0);
        // vx = 10 + 30*0.1, vy = -20 + 500*0.1
        assert!((p.vel.x - 13.0).abs() < 1e-4);
        assert!((p.vel.y - 30.0).abs() < 1e-4);
        // position uses the updated velocity
        assert!((p.pos.x - 101.3).abs() < 1e-4);
        assert!((p.pos.y - 103.0).abs() < 1e-4);
    }

    #[test]
    fn test_launch_speed_clamps_power() {
        assert_eq!(launch_speed(0.0, 250.0, 350.0), 285.0);
        assert_eq!(launch_speed(1.0, 250.0, 350.0), 600.0);
        assert_eq!(launch_speed(5.0, 250.0, 350.0), 600.0);
    }

    #[test]
    fn test_launch_velocity_direction() {
        let left = launch_velocity(45.0, 0.5, true, 250.0, 350.0);
        assert!(left.x > 0.0 && left.y < 0.0);

        let right = launch_velocity(45.0, 0.5, false, 250.0, 350.0);
        assert!(right.x < 0.0 && right.y < 0.0);
        assert!((left.x + right.x).abs() < 1e-3);
        assert!((left.y - right.y).abs() < 1e-3);

        let speed = launch_speed(0.5, 250.0, 350.0);
        assert!((left.length() - speed).abs() < 1e-2);
    }

    #[test]
    fn test_preview_stops_at_terrain() {
        let terrain = Terrain::new(TerrainStyle::Flat, 800.0, 600.0, 1);
        let vel = launch_velocity(45.0, 0.3, true, 250.0, 350.0);
        let points = preview_trajectory(Vec2::new(100.0, 500.0), vel, 0.0, &terrain);
        assert!(!points.is_empty());
        assert!(points.len() < PREVIEW_STEPS);
        for p in &points {
            assert!(p.y < terrain.height_at(p.x));
        }
    }

    #[test]
    fn test_preview_runs_full_lookahead_in_open_air() {
        let terrain = Terrain::new(TerrainStyle::Flat, 100_000.0, 100_000.0, 1);
        let points = preview_trajectory(
            Vec2::new(50_000.0, 10_000.0),
            Vec2::new(100.0, -100.0),
            0.0,
            &terrain,
        );
        assert_eq!(points.len(), PREVIEW_STEPS);
    }

    #[test]
    fn test_simulate_flight_lands() {
        let terrain = Terrain::new(TerrainStyle::Flat, 800.0, 600.0, 1);
        let vel = launch_velocity(45.0, 0.2, true, 250.0, 350.0);
        let shot = Projectile::new(Vec2::new(100.0, 534.0), vel);
        let result = simulate_flight(shot, 0.0, 0.01, &terrain, std::iter::empty(), 10_000);
        let (impact, pos) = result.expect("shot must land");
        assert_eq!(impact, Impact::Terrain);
        assert!(pos.x > 100.0);
    }
}
