//! Impact detection for the projectile
//!
//! Tests run in a fixed order: leaving the arena, then terrain, then castles.
//! The first match wins, so overlapping geometry always resolves the same way.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::castle::Bounds;
use super::terrain::Terrain;

/// What a projectile ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    /// Left through a side or the bottom (the sky is open)
    OutOfBounds,
    /// Touched or crossed the ground
    Terrain,
    /// Entered a castle's bounding box (index into the castle list)
    Castle(usize),
}

impl Impact {
    pub fn is_hit(&self) -> bool {
        matches!(self, Impact::Castle(_))
    }
}

/// Outside the play area: x < 0, x > width, or below the bottom edge
#[inline]
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32) -> bool {
    pos.x < 0.0 || pos.x > width || pos.y > height
}

/// At or below the ground (inclusive)
#[inline]
pub fn hits_terrain(pos: Vec2, terrain: &Terrain) -> bool {
    pos.y >= terrain.height_at(pos.x)
}

/// Ordered impact test for one point
pub fn detect_impact<'a>(
    pos: Vec2,
    terrain: &Terrain,
    castles: impl IntoIterator<Item = &'a Bounds>,
) -> Option<Impact> {
    if out_of_bounds(pos, terrain.width(), terrain.height()) {
        return Some(Impact::OutOfBounds);
    }
    if hits_terrain(pos, terrain) {
        return Some(Impact::Terrain);
    }
    castles
        .into_iter()
        .position(|bounds| bounds.contains(pos))
        .map(Impact::Castle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainStyle;

    const NO_CASTLES: [Bounds; 0] = [];

    fn flat() -> Terrain {
        Terrain::new(TerrainStyle::Flat, 800.0, 600.0, 1)
    }

    fn castle_box(x: f32) -> Bounds {
        Bounds {
            left: x - 30.0,
            right: x + 30.0,
            top: 400.0,
            bottom: 540.0,
        }
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(out_of_bounds(Vec2::new(-0.1, 100.0), 800.0, 600.0));
        assert!(out_of_bounds(Vec2::new(800.1, 100.0), 800.0, 600.0));
        assert!(out_of_bounds(Vec2::new(400.0, 600.1), 800.0, 600.0));
        // Above the top is still in play
        assert!(!out_of_bounds(Vec2::new(400.0, -500.0), 800.0, 600.0));
    }

    #[test]
    fn test_terrain_contact_is_inclusive() {
        let terrain = flat();
        let y = terrain.height_at(250.0);
        assert_eq!(
            detect_impact(Vec2::new(250.0, y), &terrain, &NO_CASTLES),
            Some(Impact::Terrain)
        );
        assert_eq!(detect_impact(Vec2::new(250.0, y - 0.01), &terrain, &NO_CASTLES), None);
    }

    #[test]
    fn test_castle_hit_reports_index() {
        let terrain = flat();
        let castles = [castle_box(100.0), castle_box(700.0)];
        assert_eq!(
            detect_impact(Vec2::new(690.0, 450.0), &terrain, &castles),
            Some(Impact::Castle(1))
        );
        assert_eq!(detect_impact(Vec2::new(400.0, 450.0), &terrain, &castles), None);
    }

    #[test]
    fn test_terrain_wins_over_castle() {
        let terrain = flat();
        let castles = [castle_box(100.0)];
        // Bottom edge of the castle is on the ground line
        assert_eq!(
            detect_impact(Vec2::new(100.0, 540.0), &terrain, &castles),
            Some(Impact::Terrain)
        );
    }

    #[test]
    fn test_bounds_win_over_everything() {
        let terrain = flat();
        let castles = [castle_box(0.0)];
        assert_eq!(
            detect_impact(Vec2::new(-1.0, 450.0), &terrain, &castles),
            Some(Impact::OutOfBounds)
        );
    }
}
