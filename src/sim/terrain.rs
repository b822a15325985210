//! Scrolling ground strip
//!
//! The ground is a ring of fixed-width segments that scroll a whole segment
//! at a time, plus craters that slide pixel-smoothly on top.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_RATE, GROUND_INSET, SEGMENT_WIDTH};

/// Base grey level of the regolith
const BASE_SHADE: f32 = 85.0;
/// Spread of grey levels around the base
const SHADE_VARIANCE: f32 = 15.0;

/// One fixed-width slice of ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    /// Vertical offset from the ground line (flat terrain keeps this at 0)
    pub height: f32,
    /// Grey level (0-255)
    pub shade: u8,
    /// Decoration seed in [0, 1); values above 0.7 carry a pebble
    pub detail: f32,
}

impl TerrainSegment {
    fn random(rng: &mut impl Rng) -> Self {
        let shade = BASE_SHADE + (rng.random::<f32>() * SHADE_VARIANCE - SHADE_VARIANCE / 2.0).floor();
        Self {
            height: 0.0,
            shade: shade.clamp(0.0, 255.0) as u8,
            detail: rng.random(),
        }
    }

    /// Whether this segment is decorated with a pebble
    #[inline]
    pub fn has_rock(&self) -> bool {
        self.detail > 0.7
    }
}

/// A decorative crater
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crater {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Shading opacity in [0.2, 0.7)
    pub depth: f32,
}

impl Crater {
    fn random(rng: &mut impl Rng, x: f32, viewport_height: f32) -> Self {
        Self {
            x,
            y: viewport_height - GROUND_INSET + rng.random::<f32>() * 10.0,
            radius: rng.random_range(5.0..20.0),
            depth: rng.random_range(0.2..0.7),
        }
    }
}

/// The scrolling ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    width: f32,
    height: f32,
    segment_width: f32,
    pub segments: VecDeque<TerrainSegment>,
    pub craters: Vec<Crater>,
}

impl Terrain {
    pub fn new(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        let count = Self::segment_count_for(width, SEGMENT_WIDTH);
        let segments = (0..count).map(|_| TerrainSegment::random(rng)).collect();

        let num_craters = (width / 100.0).floor() as usize;
        let craters = (0..num_craters)
            .map(|_| {
                let x = rng.random::<f32>() * width;
                Crater::random(rng, x, height)
            })
            .collect();

        Self {
            width,
            height,
            segment_width: SEGMENT_WIDTH,
            segments,
            craters,
        }
    }

    /// Number of segments needed to cover `width` with one to spare
    pub fn segment_count_for(width: f32, segment_width: f32) -> usize {
        (width / segment_width).ceil() as usize + 1
    }

    pub fn segment_width(&self) -> f32 {
        self.segment_width
    }

    /// Y of the ground surface
    pub fn surface_y(&self) -> f32 {
        self.height - GROUND_INSET
    }

    /// Scroll by `speed * dt * 60` pixels
    pub fn update(&mut self, rng: &mut impl Rng, dt: f32, speed: f32) {
        let pixels = speed * dt * FRAME_RATE;
        let whole = (pixels / self.segment_width).floor();

        if whole >= 1.0 {
            // Never drain more than we have; the ring is rebuilt from fresh segments
            let n = (whole as usize).min(self.segments.len());
            self.segments.drain(..n);
            for _ in 0..n {
                self.segments.push_back(TerrainSegment::random(rng));
            }
        }

        for crater in &mut self.craters {
            crater.x -= pixels;

            if crater.x < -crater.radius * 2.0 {
                let x = self.width + rng.random::<f32>() * 100.0;
                *crater = Crater::random(rng, x, self.height);
            }
        }
    }
}
