//! Moon Buggy - A side-scrolling lunar buggy arcade game
//!
//! Core modules:
//! - `sim`: Simulation (buggy physics, terrain, obstacles, collisions, score)
//! - `engine`: Lifecycle, frame clock and callback contract for the host
//! - `renderer`: Layered scene assembly and WebGPU pipeline
//! - `tuning`: Data-driven game balance
//! - `settings`: Cosmetic quality preferences

pub mod engine;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{Clock, FrameRequest, GameEngine, GameOptions, ManualClock};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default viewport (matches the original 640x240 canvas)
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 240;

    /// Per-frame pixel scale: world speeds are expressed in pixels per 60 Hz frame
    pub const FRAME_RATE: f32 = 60.0;

    /// Height of the ground band at the bottom of the viewport
    pub const GROUND_INSET: f32 = 40.0;
    /// Width of one terrain segment
    pub const SEGMENT_WIDTH: f32 = 20.0;

    /// Buggy dimensions and spawn position
    pub const BUGGY_WIDTH: f32 = 50.0;
    pub const BUGGY_HEIGHT: f32 = 35.0;
    pub const BUGGY_START_X: f32 = 50.0;
    /// Spawn height above the bottom edge (the buggy settles onto the ground on the first tick)
    pub const BUGGY_START_OFFSET: f32 = 70.0;

    /// Star field occupies everything above this band
    pub const STAR_FIELD_MARGIN: f32 = 100.0;

    /// Score is floored after adding this to absorb float drift in summed deltas
    pub const SCORE_EPSILON: f64 = 1e-6;
}

/// Y coordinate of the top of a body of `body_height` resting on the ground
#[inline]
pub fn ground_line(viewport_height: f32, body_height: f32) -> f32 {
    viewport_height - consts::GROUND_INSET - body_height
}
