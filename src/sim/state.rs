//! Game state and core simulation types
//!
//! `GameState` exclusively owns every entity collection; nothing outside the
//! simulation holds references across frames.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::backdrop::Backdrop;
use super::obstacle::{ObstacleStream, SpawnRules};
use super::particles::DustSystem;
use super::terrain::Terrain;
use super::vehicle::Buggy;
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed or reset, not yet started
    #[default]
    Idle,
    /// Frames are advancing the simulation
    Running,
    /// Frozen; no time passes
    Paused,
    /// Buggy hit a rock; terminal until reset
    GameOver,
}

/// Notifications pushed out of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Floored score after a tick (or after reset)
    Score(u64),
    /// A jump started
    Jump,
    /// The run ended
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Viewport size in pixels
    pub width: f32,
    pub height: f32,
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,

    pub buggy: Buggy,
    pub terrain: Terrain,
    pub backdrop: Backdrop,
    pub obstacles: ObstacleStream,
    pub dust: DustSystem,

    /// Current world scroll speed (pixels per 60 Hz frame)
    pub speed: f32,
    /// Cruising speed to restore when the brake is released
    pub original_speed: f32,
    /// Fractional score accumulator
    pub score: f64,
    /// Brake input currently held
    pub braking: bool,
    /// Simulated seconds since the run started
    pub time: f64,

    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh run for a `width` x `height` viewport
    pub fn new(width: f32, height: f32, seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::new(&mut rng, width, height);
        let backdrop = Backdrop::new(&mut rng, width, height);
        let buggy = Buggy::new(
            BUGGY_START_X,
            height - BUGGY_START_OFFSET,
            tuning.gravity,
            tuning.jump_force,
            tuning.brake_jump_gravity,
        );

        Self {
            width,
            height,
            seed,
            speed: tuning.initial_speed,
            original_speed: tuning.initial_speed,
            tuning,
            phase: GamePhase::Idle,
            buggy,
            terrain,
            backdrop,
            obstacles: ObstacleStream::new(),
            dust: DustSystem::new(),
            score: 0.0,
            braking: false,
            time: 0.0,
            rng,
        }
    }

    /// Back to a fresh idle run. Scenery (terrain, stars, mountains) is kept.
    pub fn reset(&mut self) {
        self.score = 0.0;
        self.speed = self.tuning.initial_speed;
        self.original_speed = self.tuning.initial_speed;
        self.obstacles.clear();
        self.dust.clear();
        self.buggy.reset(BUGGY_START_X, self.height - BUGGY_START_OFFSET);
        self.braking = false;
        self.time = 0.0;
        self.phase = GamePhase::Idle;
    }

    /// Score as reported to the outside (floored)
    pub fn display_score(&self) -> u64 {
        (self.score + SCORE_EPSILON).floor().max(0.0) as u64
    }

    /// Top of the buggy when resting on the ground
    pub fn ground_y(&self) -> f32 {
        crate::ground_line(self.height, self.buggy.height)
    }

    /// Brought to a full stop by braking
    pub fn is_stopped(&self) -> bool {
        self.speed <= 0.0
    }

    pub(crate) fn spawn_rules(&self) -> SpawnRules {
        SpawnRules {
            max_obstacles: self.tuning.max_obstacles,
            chance_per_speed: self.tuning.spawn_chance_per_speed,
            min_gap: self.tuning.min_gap(self.speed),
        }
    }

    /// Dust burst from a point on the buggy's underside
    pub(crate) fn dust_at(&mut self, frac: f32, count: usize) {
        let origin = self.buggy.underside_at(frac);
        self.dust.burst(&mut self.rng, origin, count);
    }

    /// Symmetric pair of bursts under the front and rear wheels
    pub(crate) fn dust_pair(&mut self, count: usize) {
        self.dust_at(0.25, count);
        self.dust_at(0.75, count);
    }
}
