//! Computer opponent
//!
//! Aims by inverting the flat-ground range equation, counter-steers against
//! wind in proportion to difficulty, then blurs the result with noise that
//! shrinks as difficulty rises. Outputs go through the same fire path as a
//! human's.

use std::f32::consts::FRAC_PI_4;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ballistics::launch_speed;
use super::castle::Castle;
use super::player::{EconomyAction, Player};
use crate::config::MatchConfig;
use crate::consts::{GRAVITY, MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::{clamp_angle, facing_sign};

/// Power estimate bounds (closer targets get less power)
pub const MIN_ESTIMATED_POWER: f32 = 0.35;
pub const MAX_ESTIMATED_POWER: f32 = 0.9;
/// Distance at which the power estimate reaches its ceiling
pub const POWER_REFERENCE_DISTANCE: f32 = 800.0;

/// Largest wind counter-steer (degrees)
pub const MAX_WIND_CORRECTION_DEG: f32 = 8.0;
/// Wind strength that earns the full counter-steer
pub const WIND_REFERENCE: f32 = 120.0;

/// Noise envelopes at difficulty 1 (weak) and 10 (strong)
pub const WEAK_ANGLE_NOISE_DEG: f32 = 16.0;
pub const WEAK_POWER_NOISE: f32 = 0.25;
pub const STRONG_ANGLE_NOISE_DEG: f32 = 1.5;
pub const STRONG_POWER_NOISE: f32 = 0.03;

/// Final power range of an AI shot
pub const MIN_AI_POWER: f32 = 0.2;
pub const MAX_AI_POWER: f32 = 1.0;

/// Repair once hp falls to this fraction
const REPAIR_THRESHOLD: f32 = 0.5;

/// An aim decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub angle_deg: f32,
    pub power: f32,
}

/// Difficulty mapped to 0..=1
pub fn difficulty_factor(difficulty: u8) -> f32 {
    let d = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY) as f32;
    ((d - 1.0) / 9.0).clamp(0.0, 1.0)
}

/// Noise amplitudes `(angle_deg, power)` for a difficulty
pub fn noise_envelope(difficulty: u8) -> (f32, f32) {
    let t = difficulty_factor(difficulty);
    (
        lerp(WEAK_ANGLE_NOISE_DEG, STRONG_ANGLE_NOISE_DEG, t),
        lerp(WEAK_POWER_NOISE, STRONG_POWER_NOISE, t),
    )
}

/// The deterministic aim, before noise
pub fn baseline_shot(
    attacker: &Castle,
    defender: &Castle,
    difficulty: u8,
    wind: f32,
    config: &MatchConfig,
) -> Shot {
    let dx = defender.position().x - attacker.position().x;
    let distance = dx.abs();

    let power = (MIN_ESTIMATED_POWER
        + (MAX_ESTIMATED_POWER - MIN_ESTIMATED_POWER) * distance / POWER_REFERENCE_DISTANCE)
        .clamp(MIN_ESTIMATED_POWER, MAX_ESTIMATED_POWER);
    let speed = launch_speed(power, config.base_speed, config.extra_speed);

    // R ≈ v²/g · sin(2θ)  =>  θ = ½ asin(gR / v²)
    let inside = GRAVITY * distance / (speed * speed);
    let angle_rad = if inside > 0.0 && inside < 1.0 {
        0.5 * inside.min(0.99).asin()
    } else {
        FRAC_PI_4
    };
    let mut angle_deg = angle_rad.to_degrees();

    let t = difficulty_factor(difficulty);
    let correction = (MAX_WIND_CORRECTION_DEG * (wind.abs() / WIND_REFERENCE).clamp(0.0, 1.0) * t)
        .min(MAX_WIND_CORRECTION_DEG);
    let shot_dir = if dx != 0.0 {
        dx.signum()
    } else {
        facing_sign(attacker.is_left_side)
    };
    let along = wind * shot_dir;
    if along > 0.0 {
        // Tailwind carries the shot further: flatten
        angle_deg -= correction;
    } else if along < 0.0 {
        angle_deg += correction;
    }

    Shot {
        angle_deg: clamp_angle(angle_deg),
        power,
    }
}

/// Pick an aim for `attacker` against `defender`
///
/// Output is random; only its distribution is fixed: uniform noise around
/// [`baseline_shot`] within [`noise_envelope`].
pub fn choose_shot(
    attacker: &Castle,
    defender: &Castle,
    difficulty: u8,
    wind: f32,
    config: &MatchConfig,
    rng: &mut impl Rng,
) -> Shot {
    let base = baseline_shot(attacker, defender, difficulty, wind, config);
    let (angle_noise, power_noise) = noise_envelope(difficulty);

    let angle = base.angle_deg + rng.random_range(-angle_noise..=angle_noise);
    let power = base.power + rng.random_range(-power_noise..=power_noise);

    let shot = Shot {
        angle_deg: clamp_angle(angle),
        power: power.clamp(MIN_AI_POWER, MAX_AI_POWER),
    };
    log::debug!(
        "AI aim: baseline {:.1}°/{:.2} -> {:.1}°/{:.2} (difficulty {}, wind {:.1})",
        base.angle_deg,
        base.power,
        shot.angle_deg,
        shot.power,
        difficulty,
        wind
    );
    shot
}

/// Spend gold before shooting: repair when hurt, otherwise grow income
pub fn choose_economy_action(player: &Player, config: &MatchConfig) -> Option<EconomyAction> {
    let hurt = player.castle.hp_ratio() <= REPAIR_THRESHOLD;
    if hurt {
        if player.gold >= config.repair_cost {
            return Some(EconomyAction::Repair);
        }
        return None;
    }
    if player.gold >= config.upgrade_cost(player.income_level) {
        return Some(EconomyAction::UpgradeIncome);
    }
    None
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ballistics::launch_velocity;
    use crate::sim::castle::Weapon;
    use crate::sim::player::PlayerKind;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn castles(attacker_x: f32, defender_x: f32) -> (Castle, Castle) {
        (
            Castle::new(Vec2::new(attacker_x, 540.0), 60.0, 140.0, 100.0, attacker_x < defender_x, 0),
            Castle::new(Vec2::new(defender_x, 540.0), 60.0, 140.0, 100.0, attacker_x > defender_x, 0),
        )
    }

    #[test]
    fn test_difficulty_factor() {
        assert_eq!(difficulty_factor(1), 0.0);
        assert_eq!(difficulty_factor(10), 1.0);
        assert_eq!(difficulty_factor(0), 0.0);
        assert_eq!(difficulty_factor(200), 1.0);
        assert!((difficulty_factor(5) - 4.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_envelope_endpoints() {
        assert_eq!(noise_envelope(1), (16.0, 0.25));
        let (a, p) = noise_envelope(10);
        assert!((a - 1.5).abs() < 1e-6);
        assert!((p - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_power_grows_with_distance() {
        let config = MatchConfig::default();
        let (a, near) = castles(100.0, 250.0);
        let (b, far) = castles(100.0, 700.0);
        let near_shot = baseline_shot(&a, &near, 5, 0.0, &config);
        let far_shot = baseline_shot(&b, &far, 5, 0.0, &config);
        assert!(near_shot.power < far_shot.power);
        for shot in [near_shot, far_shot] {
            assert!(shot.power >= MIN_ESTIMATED_POWER && shot.power <= MAX_ESTIMATED_POWER);
        }
    }

    #[test]
    fn test_range_inversion_and_fallback() {
        let config = MatchConfig::default();
        // 300px: reachable, low-arc solution below 45°
        let (a, d) = castles(100.0, 400.0);
        let shot = baseline_shot(&a, &d, 1, 0.0, &config);
        assert!(shot.angle_deg > 0.0 && shot.angle_deg < 45.0);
        // 600px: out of estimated range, falls back to 45°
        let (a, d) = castles(100.0, 700.0);
        let shot = baseline_shot(&a, &d, 1, 0.0, &config);
        assert!((shot.angle_deg - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_wind_counter_steer() {
        let config = MatchConfig::default();
        let (a, d) = castles(100.0, 400.0);
        let calm = baseline_shot(&a, &d, 10, 0.0, &config).angle_deg;
        let tail = baseline_shot(&a, &d, 10, 120.0, &config).angle_deg;
        let head = baseline_shot(&a, &d, 10, -120.0, &config).angle_deg;
        assert!((calm - tail - 8.0).abs() < 1e-3);
        assert!((head - calm - 8.0).abs() < 1e-3);

        // Stronger wind never exceeds the cap
        let gale = baseline_shot(&a, &d, 10, 1000.0, &config).angle_deg;
        assert!((calm - gale - 8.0).abs() < 1e-3);

        // Weakest AI ignores wind entirely
        let weak = baseline_shot(&a, &d, 1, 120.0, &config).angle_deg;
        assert!((weak - calm).abs() < 1e-4);
    }

    #[test]
    fn test_counter_steer_flips_for_right_side_shooter() {
        let config = MatchConfig::default();
        let (a, d) = castles(400.0, 100.0);
        let calm = baseline_shot(&a, &d, 10, 0.0, &config).angle_deg;
        // Shooting left: negative wind is a tailwind
        let tail = baseline_shot(&a, &d, 10, -120.0, &config).angle_deg;
        assert!((calm - tail - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_strong_ai_noise_bounds() {
        let config = MatchConfig::default();
        let (a, d) = castles(100.0, 700.0);
        let base = baseline_shot(&a, &d, 10, 0.0, &config);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let shot = choose_shot(&a, &d, 10, 0.0, &config, &mut rng);
            assert!((shot.angle_deg - base.angle_deg).abs() <= 1.5 + 1e-4);
            assert!((shot.power - base.power).abs() <= 0.03 + 1e-4);
        }
    }

    #[test]
    fn test_weak_ai_distribution() {
        let config = MatchConfig::default();
        let (a, d) = castles(100.0, 700.0);
        let base = baseline_shot(&a, &d, 1, 0.0, &config);
        let mut rng = Pcg32::seed_from_u64(11);

        let n = 4000;
        let mut angle_sum = 0.0f64;
        let mut widest = 0.0f32;
        for _ in 0..n {
            let shot = choose_shot(&a, &d, 1, 0.0, &config, &mut rng);
            let off = shot.angle_deg - base.angle_deg;
            assert!(off.abs() <= 16.0 + 1e-4);
            assert!(shot.power >= MIN_AI_POWER && shot.power <= MAX_AI_POWER);
            assert!((shot.power - base.power).abs() <= 0.25 + 1e-4);
            angle_sum += shot.angle_deg as f64;
            widest = widest.max(off.abs());
        }
        let mean = (angle_sum / n as f64) as f32;
        assert!((mean - base.angle_deg).abs() < 1.0);
        // A weak AI visibly misses the strong envelope
        assert!(widest > 10.0);
    }

    #[test]
    fn test_scenario_left_vs_right_flat_calm() {
        let config = MatchConfig::default();
        let (a, d) = castles(100.0, 700.0);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let shot = choose_shot(&a, &d, 1, 0.0, &config, &mut rng);
            assert!((0.2..=1.0).contains(&shot.power));
            assert!((0.0..=90.0).contains(&shot.angle_deg));
            let vel = launch_velocity(
                shot.angle_deg,
                shot.power,
                a.is_left_side,
                config.base_speed,
                config.extra_speed,
            );
            assert!(vel.y < 0.0);
            assert!(vel.x > 0.0);
        }
    }

    #[test]
    fn test_economy_choice() {
        let config = MatchConfig::default();
        let castle = Castle::new(Vec2::new(700.0, 540.0), 60.0, 140.0, 100.0, false, 0);
        let mut p = Player::new("CPU", PlayerKind::Ai, castle, Weapon::new(2.0));

        p.gold = 30.0;
        assert_eq!(choose_economy_action(&p, &config), None);

        p.gold = 60.0;
        assert_eq!(choose_economy_action(&p, &config), Some(EconomyAction::UpgradeIncome));

        p.castle.apply_damage(60.0);
        assert_eq!(choose_economy_action(&p, &config), Some(EconomyAction::Repair));

        // Hurt but broke: saves up rather than upgrading
        p.gold = 39.0;
        assert_eq!(choose_economy_action(&p, &config), None);
    }
}
