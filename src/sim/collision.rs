//! Collision detection for the buggy
//!
//! Everything in the playfield is an axis-aligned box in screen space
//! (y grows downward). Hitboxes are shrunk by a fixed padding before testing
//! so that near-misses read as misses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::vehicle::Buggy;

/// Axis-aligned bounding box (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Shrink on every side by `padding`
    pub fn inset(&self, padding: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(padding),
            max: self.max - Vec2::splat(padding),
        }
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Check the buggy against one rock, with both hitboxes padded inward
pub fn buggy_hits_obstacle(buggy: &Buggy, obstacle: &Obstacle, padding: f32) -> bool {
    buggy
        .bounds()
        .inset(padding)
        .overlaps(&obstacle.bounds().inset(padding))
}

/// Index of the first rock the buggy hits, if any
pub fn first_hit(buggy: &Buggy, obstacles: &[Obstacle], padding: f32) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| buggy_hits_obstacle(buggy, o, padding))
}
