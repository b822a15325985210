//! Parallax backdrop: star fields and mountain silhouettes
//!
//! Layers scroll at a fraction of world speed (per second, not per frame),
//! so distant layers drift slowly and give the scene depth.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::STAR_FIELD_MARGIN;

/// A single point star
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Base brightness in [0.5, 1)
    pub brightness: f32,
    /// Twinkle angular rate (radians per millisecond)
    pub twinkle_speed: f32,
    pub twinkle_offset: f32,
}

impl Star {
    /// Brightness at wall-clock time `now_ms`, oscillating in [0.4, 1.0] of base
    pub fn twinkle(&self, now_ms: f64) -> f32 {
        let phase = (now_ms * self.twinkle_speed as f64) as f32 + self.twinkle_offset;
        self.brightness * (phase.sin() * 0.3 + 0.7)
    }
}

/// Stars sharing one parallax speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarLayer {
    pub stars: Vec<Star>,
    /// Fraction of world speed
    pub speed: f32,
}

/// A mountain ridge silhouette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountainLayer {
    /// Normalized ridge heights, first and last are 0
    pub points: Vec<f32>,
    /// Grey level of the silhouette
    pub shade: u8,
    /// Peak height above the ground line
    pub height: f32,
    /// Fraction of world speed
    pub speed: f32,
    /// Horizontal scroll offset, always in (-width/2, 0]
    pub x: f32,
    /// Drawn span; twice the viewport so the wrap is seamless
    pub width: f32,
}

impl MountainLayer {
    fn new(
        rng: &mut impl Rng,
        viewport_width: f32,
        segments: usize,
        jaggedness: f32,
        shade: u8,
        height: f32,
        speed: f32,
    ) -> Self {
        Self {
            points: ridge_points(rng, segments, jaggedness),
            shade,
            height,
            speed,
            x: 0.0,
            width: viewport_width * 2.0,
        }
    }
}

/// Random ridge: `segments + 1` samples, pinned to 0 at both ends
fn ridge_points(rng: &mut impl Rng, segments: usize, jaggedness: f32) -> Vec<f32> {
    let mut points = Vec::with_capacity(segments + 1);
    points.push(0.0);
    for _ in 1..segments {
        points.push(rng.random::<f32>() * jaggedness);
    }
    points.push(0.0);
    points
}

/// Star layer definitions: (speed, star count)
const STAR_LAYERS: [(f32, usize); 3] = [
    (0.3, 40), // Distant
    (0.6, 30), // Middle
    (1.0, 20), // Close
];

/// All parallax layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backdrop {
    width: f32,
    height: f32,
    pub star_layers: Vec<StarLayer>,
    /// Far layer first (render order)
    pub mountains: Vec<MountainLayer>,
}

impl Backdrop {
    pub fn new(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        let field_height = (height - STAR_FIELD_MARGIN).max(1.0);

        let star_layers = STAR_LAYERS
            .iter()
            .enumerate()
            .map(|(index, &(speed, count))| {
                let stars = (0..count)
                    .map(|_| Star {
                        x: rng.random::<f32>() * width,
                        y: rng.random::<f32>() * field_height,
                        // Closer layers get bigger stars
                        size: 0.5 + index as f32 * 0.8 + rng.random::<f32>() * 1.2,
                        brightness: 0.5 + rng.random::<f32>() * 0.5,
                        twinkle_speed: rng.random::<f32>() * 0.02 + 0.01,
                        twinkle_offset: rng.random::<f32>() * TAU,
                    })
                    .collect();
                StarLayer { stars, speed }
            })
            .collect();

        let mountains = vec![
            MountainLayer::new(rng, width, 40, 0.3, 0x44, 100.0, 0.5),
            MountainLayer::new(rng, width, 30, 0.5, 0x66, 120.0, 0.8),
        ];

        Self {
            width,
            height,
            star_layers,
            mountains,
        }
    }

    /// Scroll every layer by its share of `speed` over `dt` seconds
    pub fn update(&mut self, rng: &mut impl Rng, dt: f32, speed: f32) {
        let field_height = (self.height - STAR_FIELD_MARGIN).max(1.0);

        for layer in &mut self.star_layers {
            let shift = layer.speed * speed * dt;
            for star in &mut layer.stars {
                star.x -= shift;
                if star.x < 0.0 {
                    star.x = self.width;
                    star.y = rng.random::<f32>() * field_height;
                }
            }
        }

        for layer in &mut self.mountains {
            layer.x -= layer.speed * speed * dt;
            if layer.x <= -layer.width / 2.0 {
                layer.x = 0.0;
            }
        }
    }

    pub fn star_count(&self) -> usize {
        self.star_layers.iter().map(|l| l.stars.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn backdrop() -> (Pcg32, Backdrop) {
        let mut rng = Pcg32::seed_from_u64(11);
        let b = Backdrop::new(&mut rng, 640.0, 240.0);
        (rng, b)
    }

    #[test]
    fn test_layer_layout() {
        let (_, b) = backdrop();
        assert_eq!(b.star_layers.len(), 3);
        assert_eq!(b.star_count(), 90);
        assert_eq!(b.mountains.len(), 2);
        assert_eq!(b.mountains[0].points.len(), 41);
        assert_eq!(b.mountains[1].points.len(), 31);
        assert_eq!(b.mountains[0].points[0], 0.0);
        assert_eq!(*b.mountains[1].points.last().unwrap(), 0.0);
        assert_eq!(b.mountains[0].width, 1280.0);
        // Far layer is slower than near layer
        assert!(b.mountains[0].speed < b.mountains[1].speed);
        for star in b.star_layers.iter().flat_map(|l| &l.stars) {
            assert!(star.y >= 0.0 && star.y < 140.0);
        }
    }

    #[test]
    fn test_stars_scroll_by_layer_speed() {
        let (mut rng, mut b) = backdrop();
        for layer in &mut b.star_layers {
            for star in &mut layer.stars {
                star.x = 300.0;
            }
        }
        b.update(&mut rng, 1.0, 10.0);
        assert!((b.star_layers[0].stars[0].x - 297.0).abs() < 1e-4);
        assert!((b.star_layers[1].stars[0].x - 294.0).abs() < 1e-4);
        assert!((b.star_layers[2].stars[0].x - 290.0).abs() < 1e-4);
    }

    #[test]
    fn test_star_wraps_to_right_edge() {
        let (mut rng, mut b) = backdrop();
        b.star_layers[2].stars[0].x = 1.0;
        b.update(&mut rng, 1.0, 5.0);
        let star = b.star_layers[2].stars[0];
        assert_eq!(star.x, 640.0);
        assert!(star.y >= 0.0 && star.y < 140.0);
    }

    #[test]
    fn test_mountain_wraps_at_half_width() {
        let (mut rng, mut b) = backdrop();
        // Near layer: 0.8 * 10 * dt; reaching -640 wraps to 0
        b.mountains[1].x = -635.0;
        b.update(&mut rng, 1.0, 10.0);
        assert_eq!(b.mountains[1].x, 0.0);

        b.update(&mut rng, 1.0, 10.0);
        assert!((b.mountains[1].x + 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_twinkle_bounds() {
        let (_, b) = backdrop();
        let star = b.star_layers[0].stars[0];
        for t in 0..200 {
            let v = star.twinkle(t as f64 * 37.0);
            assert!(v >= star.brightness * 0.4 - 1e-5);
            assert!(v <= star.brightness + 1e-5);
        }
    }
}
