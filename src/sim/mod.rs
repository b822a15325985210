//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Time only enters through the `dt` passed to `tick`
//! - Seeded RNG only (one `Pcg32` per run)
//! - Stable iteration order (spawn order for rocks and terrain)

pub mod backdrop;
pub mod collision;
pub mod obstacle;
pub mod particles;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod vehicle;

pub use backdrop::{Backdrop, MountainLayer, Star, StarLayer};
pub use collision::{Aabb, buggy_hits_obstacle, first_hit};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleStream, SpawnRules};
pub use particles::{DustParticle, DustSystem};
pub use state::{GameEvent, GamePhase, GameState};
pub use terrain::{Crater, Terrain, TerrainSegment};
pub use tick::{brake, jump, tick};
pub use vehicle::Buggy;
