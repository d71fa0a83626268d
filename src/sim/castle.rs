//! Castles and their weapons

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_HEIGHT_RATIO, MUZZLE_CLEARANCE};
use crate::facing_sign;

/// Axis-aligned box in screen coordinates (y grows down, so top < bottom)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Inclusive on all four edges
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// A castle standing on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Castle {
    /// Bottom-centre, where the castle meets the ground
    position: Vec2,
    pub width: f32,
    pub height: f32,
    pub max_hp: f32,
    hp: f32,
    pub is_left_side: bool,
    /// Cosmetic 0xRRGGBB
    pub base_color: u32,
}

impl Castle {
    pub fn new(
        position: Vec2,
        width: f32,
        height: f32,
        max_hp: f32,
        is_left_side: bool,
        base_color: u32,
    ) -> Self {
        Self {
            position,
            width,
            height,
            max_hp,
            hp: max_hp,
            is_left_side,
            base_color,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn is_full_health(&self) -> bool {
        self.hp >= self.max_hp
    }

    /// Fraction of hp left, 0..=1
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Remove hp, never below zero
    pub fn apply_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }

    /// Restore hp, never above max
    pub fn repair(&mut self, amount: f32) {
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }

    /// Height shrinks with damage, floored at 20% of full height
    pub fn current_height(&self) -> f32 {
        self.height * self.hp_ratio().max(MIN_HEIGHT_RATIO)
    }

    /// Hit box, using the shrunken height
    pub fn bounds(&self) -> Bounds {
        let half = self.width / 2.0;
        let bottom = self.position.y;
        Bounds {
            left: self.position.x - half,
            right: self.position.x + half,
            top: bottom - self.current_height(),
            bottom,
        }
    }

    /// Where shots leave from: just above the current top edge
    pub fn muzzle_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.bounds().top - MUZZLE_CLEARANCE)
    }
}

/// A castle's cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    /// Seconds between shots
    pub reload_time: f32,
    /// Seconds until the weapon may fire again
    cooldown: f32,
    /// Barrel angle for drawing (degrees above horizontal, toward the opponent)
    aim_angle_deg: f32,
}

impl Weapon {
    pub fn new(reload_time: f32) -> Self {
        Self {
            reload_time: reload_time.max(0.0),
            cooldown: 0.0,
            aim_angle_deg: 45.0,
        }
    }

    /// Count the cooldown down toward zero
    pub fn update(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt.max(0.0)).max(0.0);
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown <= 0.0
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn mark_fired(&mut self) {
        self.cooldown = self.reload_time;
    }

    pub fn aim_angle(&self) -> f32 {
        self.aim_angle_deg
    }

    pub fn set_aim_angle(&mut self, angle_deg: f32) {
        self.aim_angle_deg = crate::clamp_angle(angle_deg);
    }

    /// Unit vector along the barrel, in screen coordinates
    ///
    /// The stored angle is side-agnostic; the side sign is applied here and
    /// nowhere else.
    pub fn barrel_direction(&self, is_left_side: bool) -> Vec2 {
        let angle = self.aim_angle_deg.to_radians();
        Vec2::new(angle.cos() * facing_sign(is_left_side), -angle.sin())
    }
}
