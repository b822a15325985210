//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (pixels, y down) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Opaque grey from an 8-bit level
#[inline]
pub fn grey(level: u8) -> [f32; 4] {
    let v = level as f32 / 255.0;
    [v, v, v, 1.0]
}

/// Color from 8-bit RGB and a float alpha
#[inline]
pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Shift a grey level, saturating at black/white
#[inline]
pub fn adjust_grey(level: u8, amount: i16) -> u8 {
    (level as i16 + amount).clamp(0, 255) as u8
}

/// Colors for game elements
pub mod colors {
    pub const SPACE_TOP: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const SPACE_MID: [f32; 4] = [0.067, 0.067, 0.067, 1.0];
    pub const SPACE_BOTTOM: [f32; 4] = [0.133, 0.133, 0.133, 1.0];
    pub const GROUND_TOP: [f32; 4] = [0.4, 0.4, 0.4, 1.0];
    pub const GROUND_BOTTOM: [f32; 4] = [0.267, 0.267, 0.267, 1.0];
    pub const PEBBLE: [f32; 4] = [0.47, 0.47, 0.47, 1.0];
    pub const CHASSIS: [f32; 4] = [0.87, 0.87, 0.87, 1.0];
    pub const CHASSIS_DARK: [f32; 4] = [0.67, 0.67, 0.67, 1.0];
    pub const WINDOW: [f32; 4] = [0.4, 0.4, 0.8, 1.0];
    pub const SOLAR: [f32; 4] = [0.33, 0.33, 1.0, 1.0];
    pub const TIRE: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const HUB: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
    pub const SPOKE: [f32; 4] = [0.53, 0.53, 0.53, 1.0];
    pub const FLAG_RED: [f32; 4] = [0.93, 0.27, 0.27, 1.0];
    pub const FLAG_BLUE: [f32; 4] = [0.27, 0.27, 0.93, 1.0];
    pub const HELMET: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const VISOR: [f32; 4] = [0.47, 0.47, 0.8, 1.0];
    pub const ENGINE_GLOW: [f32; 4] = [1.0, 0.63, 0.2, 0.8];
    pub const BRAKE_LIGHT: [f32; 4] = [1.0, 0.2, 0.2, 0.9];
    pub const LONG_JUMP_TRAIL: [f32; 4] = [1.0, 0.39, 0.2, 0.2];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.3];
    pub const ROCK_LARGE: [f32; 4] = [0.47, 0.47, 0.47, 1.0];
    pub const ROCK_SMALL: [f32; 4] = [0.53, 0.53, 0.53, 1.0];
    pub const ROCK_CRACK: [f32; 4] = [0.27, 0.27, 0.27, 1.0];
    pub const INDICATOR_BRAKING: [f32; 4] = [1.0, 0.39, 0.39, 0.7];
    pub const INDICATOR_STOPPED: [f32; 4] = [1.0, 0.2, 0.2, 0.8];
    pub const INDICATOR_LONG_JUMP: [f32; 4] = [1.0, 0.59, 0.2, 0.7];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let v = [Vertex::new(1.0, 2.0, [0.5; 4])];
        let bytes: &[u8] = bytemuck::cast_slice(&v);
        assert_eq!(bytes.len(), 24);
    }

    #[test]
    fn test_adjust_grey_saturates() {
        assert_eq!(adjust_grey(0x44, -20), 0x30);
        assert_eq!(adjust_grey(10, -20), 0);
        assert_eq!(adjust_grey(250, 20), 255);
    }
}
