//! Dust kicked up by the buggy's wheels
//!
//! Purely visual. Particles move a fixed amount per tick and fade by elapsed
//! time, so they keep settling even while the world is stopped.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default dust colour (light grey, RGB)
pub const DUST_COLOR: [u8; 3] = [211, 211, 211];

/// A single dust mote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DustParticle {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
    /// 1 at birth, removed at 0
    pub life: f32,
    pub color: [u8; 3],
}

/// Live dust particles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DustSystem {
    pub particles: Vec<DustParticle>,
}

impl DustSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Emit `count` motes from one point, spraying up and sideways
    pub fn burst(&mut self, rng: &mut impl Rng, origin: (f32, f32), count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(DustParticle {
                pos: Vec2::new(origin.0, origin.1),
                vel: Vec2::new(
                    (rng.random::<f32>() - 0.5) * 3.0,
                    -(rng.random::<f32>() * 2.0 + 1.0),
                ),
                size: rng.random::<f32>() * 3.0 + 1.0,
                alpha: 1.0,
                life: 1.0,
                color: DUST_COLOR,
            });
        }
    }

    /// Advance one tick: move, drift downward, fade, and cull
    pub fn update(&mut self, dt: f32, drift: f32, decay: f32) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += drift;
            p.life -= dt * decay;
            p.alpha = p.life.max(0.0);
        }
        // Draw order of dust is irrelevant
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].life <= 0.0 {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}
