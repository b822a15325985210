//! Rendering module
//!
//! `scene` builds a pixel-space triangle list from the game state; any
//! `RenderSurface` can display it. `pipeline::RenderState` is the WebGPU one.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;

/// Something the engine can draw a frame onto
pub trait RenderSurface {
    /// Drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Display one frame of pixel-space triangles
    fn present(&mut self, vertices: &[Vertex]);
}

/// Surface that discards every frame (headless runs)
#[derive(Debug, Clone, Copy)]
pub struct NullSurface {
    pub width: u32,
    pub height: u32,
}

impl NullSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderSurface for NullSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, _vertices: &[Vertex]) {}
}
