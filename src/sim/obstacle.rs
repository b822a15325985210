//! Rocks scrolling toward the buggy
//!
//! Spawned off the right edge, advected left at world speed, dropped once
//! fully past the left edge. Collection order is spawn order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::FRAME_RATE;
use crate::ground_line;

/// Rock size class (affects shading and crack count)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Large,
    Small,
}

/// A rock on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Slight tilt (radians), purely visual
    pub rotation: f32,
    /// Upper bound of the ridge perturbation
    pub jaggedness: f32,
    /// Ridge heights along the top edge, each in [0, jaggedness)
    pub points: Vec<f32>,
}

impl Obstacle {
    /// Generate a rock sized relative to the buggy, resting on the ground at `x`
    pub fn random(
        rng: &mut impl Rng,
        x: f32,
        viewport_height: f32,
        buggy_width: f32,
        buggy_height: f32,
    ) -> Self {
        // 70-100% of buggy width, 80-100% of buggy height
        let width = buggy_width * rng.random_range(0.7..1.0);
        let height = buggy_height * rng.random_range(0.8..1.0);

        let jaggedness = rng.random_range(0.1..0.4);
        let num_points = rng.random_range(4..=8);
        let points = (0..num_points)
            .map(|_| rng.random::<f32>() * jaggedness)
            .collect();

        let kind = if rng.random::<f32>() > 0.5 {
            ObstacleKind::Large
        } else {
            ObstacleKind::Small
        };

        Self {
            x,
            y: ground_line(viewport_height, height),
            width,
            height,
            kind,
            rotation: rng.random_range(-0.1..0.1),
            jaggedness,
            points,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Entirely past the left edge of the viewport (right edge at or left of 0)
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= 0.0
    }
}

/// Spawn policy parameters, snapshotted from tuning each tick
#[derive(Debug, Clone, Copy)]
pub struct SpawnRules {
    pub max_obstacles: usize,
    pub chance_per_speed: f32,
    pub min_gap: f32,
}

/// The live set of rocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleStream {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Scroll every rock left and drop the ones that left the screen
    pub fn update(&mut self, dt: f32, speed: f32) {
        let shift = speed * dt * FRAME_RATE;
        for obstacle in &mut self.obstacles {
            obstacle.x -= shift;
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_offscreen());
        let removed = before - self.obstacles.len();
        if removed > 0 {
            log::debug!("Despawned {} obstacle(s), {} live", removed, self.obstacles.len());
        }
    }

    /// Whether the most recent rock has moved far enough left for a new one.
    /// With no rocks the last position counts as 0.
    pub fn has_room(&self, viewport_width: f32, min_gap: f32) -> bool {
        let last_x = self.obstacles.last().map(|o| o.x).unwrap_or(0.0);
        last_x < viewport_width - min_gap
    }

    /// Roll for a new rock at the right edge. Returns true if one was placed.
    pub fn try_spawn(
        &mut self,
        rng: &mut impl Rng,
        speed: f32,
        rules: SpawnRules,
        viewport: (f32, f32),
        buggy_size: (f32, f32),
    ) -> bool {
        if self.obstacles.len() >= rules.max_obstacles {
            return false;
        }
        if rng.random::<f32>() >= rules.chance_per_speed * speed {
            return false;
        }
        if !self.has_room(viewport.0, rules.min_gap) {
            return false;
        }

        let obstacle = Obstacle::random(rng, viewport.0, viewport.1, buggy_size.0, buggy_size.1);
        log::debug!(
            "Spawned {:?} obstacle {:.1}x{:.1} at speed {:.2}",
            obstacle.kind,
            obstacle.width,
            obstacle.height,
            speed
        );
        self.obstacles.push(obstacle);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const RULES: SpawnRules = SpawnRules {
        max_obstacles: 3,
        chance_per_speed: 0.01,
        min_gap: 275.0,
    };

    fn always_spawn() -> SpawnRules {
        SpawnRules {
            chance_per_speed: 1.0,
            ..RULES
        }
    }

    #[test]
    fn test_random_rock_is_proportionate() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let rock = Obstacle::random(&mut rng, 640.0, 240.0, 50.0, 35.0);
            assert!(rock.width >= 35.0 && rock.width < 50.0);
            assert!(rock.height >= 28.0 && rock.height < 35.0);
            assert!((4..=8).contains(&rock.points.len()));
            assert!(rock.points.iter().all(|p| *p >= 0.0 && *p < rock.jaggedness));
            assert!(rock.rotation >= -0.1 && rock.rotation < 0.1);
            // Resting on the ground band
            assert!((rock.y + rock.height - 200.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_offscreen_rock_is_discarded() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut stream = ObstacleStream::new();
        for x in [200.0, 201.0] {
            let mut rock = Obstacle::random(&mut rng, x, 240.0, 50.0, 35.0);
            rock.width = 40.0;
            stream.obstacles.push(rock);
        }

        // 4 * 0.5 * 60 = 120 px per update
        stream.update(0.5, 4.0);
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.obstacles[0].x, 80.0);

        // Total shift 240 == x + width for the first rock: its box is [-40, 0]
        stream.update(0.5, 4.0);
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.obstacles[0].x, -39.0);

        stream.update(0.5, 4.0);
        assert!(stream.is_empty());
    }

    #[test]
    fn test_offscreen_boundary() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut rock = Obstacle::random(&mut rng, 0.0, 240.0, 50.0, 35.0);
        rock.width = 40.0;
        rock.x = -40.0;
        assert!(rock.is_offscreen());
        rock.x = -39.5;
        assert!(!rock.is_offscreen());
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut stream = ObstacleStream::new();
        for i in 0..3 {
            let mut rock = Obstacle::random(&mut rng, 0.0, 240.0, 50.0, 35.0);
            rock.x = i as f32 * 10.0;
            stream.obstacles.push(rock);
        }
        assert!(!stream.try_spawn(&mut rng, 100.0, always_spawn(), (640.0, 240.0), (50.0, 35.0)));
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_spawn_respects_gap() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut stream = ObstacleStream::new();
        assert!(stream.try_spawn(&mut rng, 100.0, always_spawn(), (640.0, 240.0), (50.0, 35.0)));
        assert_eq!(stream.obstacles[0].x, 640.0);

        // Newest rock still at the right edge: no room
        assert!(!stream.try_spawn(&mut rng, 100.0, always_spawn(), (640.0, 240.0), (50.0, 35.0)));

        // Move it past width - gap (640 - 275 = 365)
        stream.obstacles[0].x = 360.0;
        assert!(stream.try_spawn(&mut rng, 100.0, always_spawn(), (640.0, 240.0), (50.0, 35.0)));
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_spawn_never_at_zero_speed() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stream = ObstacleStream::new();
        for _ in 0..1000 {
            stream.try_spawn(&mut rng, 0.0, RULES, (640.0, 240.0), (50.0, 35.0));
        }
        assert!(stream.is_empty());
    }

    #[test]
    fn test_spawn_rate_scales_with_speed() {
        // At speed 5 the per-tick chance is 5%
        let mut rng = Pcg32::seed_from_u64(6);
        let mut spawned = 0;
        for _ in 0..10_000 {
            let mut stream = ObstacleStream::new();
            if stream.try_spawn(&mut rng, 5.0, RULES, (640.0, 240.0), (50.0, 35.0)) {
                spawned += 1;
            }
        }
        assert!((350..650).contains(&spawned), "spawned {}", spawned);
    }
}
