//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-tuned from a JSON file
//! without touching the simulation. Defaults reproduce the shipped balance.

use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Buggy ===
    /// Downward acceleration while airborne (pixels/s²)
    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative is up, pixels/s)
    pub jump_force: f32,
    /// Gravity multiplier for jumps started while braking (long jump)
    pub brake_jump_gravity: f32,

    // === World speed ===
    /// Scroll speed at the start of a run (pixels per 60 Hz frame)
    pub initial_speed: f32,
    /// Natural speed growth (units/s)
    pub speed_growth: f32,
    /// How far natural growth may exceed the remembered cruising speed
    pub speed_headroom: f32,
    /// Speed lost per second while braking
    pub brake_deceleration: f32,
    /// Releasing the brake below this speed kicks up extra dust
    pub kickoff_threshold: f32,

    // === Score ===
    /// Points per second at full speed
    pub score_rate: f64,
    /// Score multiplier while braking but still rolling
    pub braking_score_multiplier: f64,

    // === Obstacles ===
    /// Maximum rocks alive at once
    pub max_obstacles: usize,
    /// Spawn probability per tick, per unit of speed
    pub spawn_chance_per_speed: f32,
    /// Minimum distance between rocks at zero speed
    pub base_gap: f32,
    /// Gap reduction per unit of speed
    pub gap_per_speed: f32,
    /// Hitbox inset applied to both buggy and rock
    pub hitbox_padding: f32,

    // === Dust ===
    /// Downward drift added to particle velocity each tick
    pub particle_drift: f32,
    /// Life lost per second
    pub particle_decay: f32,
    /// Chance per tick of a small puff while braking
    pub braking_dust_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            jump_force: -450.0,
            brake_jump_gravity: 0.7,

            initial_speed: 5.0,
            speed_growth: 0.1,
            speed_headroom: 2.0,
            brake_deceleration: 10.0,
            kickoff_threshold: 1.0,

            score_rate: 10.0,
            braking_score_multiplier: 0.5,

            max_obstacles: 3,
            spawn_chance_per_speed: 0.01,
            base_gap: 300.0,
            gap_per_speed: 5.0,
            hitbox_padding: 4.0,

            particle_drift: 0.1,
            particle_decay: 2.0,
            braking_dust_chance: 0.2,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON (for writing a template file)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Minimum horizontal gap between rocks at the given speed
    #[inline]
    pub fn min_gap(&self, speed: f32) -> f32 {
        self.base_gap - self.gap_per_speed * speed
    }

    /// Cap for natural speed growth given the remembered cruising speed
    #[inline]
    pub fn max_speed(&self, original_speed: f32) -> f32 {
        original_speed + self.speed_headroom
    }
}
