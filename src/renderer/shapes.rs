//! Shape generation for 2D primitives
//!
//! Every function returns a triangle list in pixel space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Push one triangle
#[inline]
fn tri(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));
}

/// Axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    rect_gradient(x, y, w, h, color, color)
}

/// Rectangle with a vertical gradient (top color to bottom color)
pub fn rect_gradient(x: f32, y: f32, w: f32, h: f32, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(x, y, top),
        Vertex::new(x + w, y, top),
        Vertex::new(x, y + h, bottom),
        Vertex::new(x, y + h, bottom),
        Vertex::new(x + w, y, top),
        Vertex::new(x + w, y + h, bottom),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, radius, radius, color, segments)
}

/// Filled axis-aligned ellipse
pub fn ellipse(center: Vec2, rx: f32, ry: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        tri(
            &mut vertices,
            center,
            center + Vec2::new(rx * theta1.cos(), ry * theta1.sin()),
            center + Vec2::new(rx * theta2.cos(), ry * theta2.sin()),
            color,
        );
    }

    vertices
}

/// Soft glow: opaque-ish center fading to transparent at the rim
pub fn radial_glow(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let rim = [color[0], color[1], color[2], 0.0];
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let p1 = center + Vec2::new(theta1.cos(), theta1.sin()) * radius;
        let p2 = center + Vec2::new(theta2.cos(), theta2.sin()) * radius;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, rim));
        vertices.push(Vertex::new(p2.x, p2.y, rim));
    }

    vertices
}

/// Thick line segment as a quad
pub fn line(a: Vec2, b: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (thickness / 2.0);

    let mut vertices = Vec::with_capacity(6);
    tri(&mut vertices, a + perp, a - perp, b + perp, color);
    tri(&mut vertices, b + perp, a - perp, b - perp, color);
    vertices
}

/// Fan-triangulated polygon around `center`. Correct for outlines that are
/// star-shaped with respect to the center.
pub fn polygon_fan(center: Vec2, outline: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if outline.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[(i + 1) % outline.len()];
        tri(&mut vertices, center, a, b, color);
    }
    vertices
}

/// Filled area between a ridge line and a flat baseline below it,
/// with a vertical gradient from `top` (at `top_y`) to `bottom` (at `base_y`)
pub fn silhouette(ridge: &[Vec2], base_y: f32, top_y: f32, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    if ridge.len() < 2 {
        return Vec::new();
    }

    let span = (base_y - top_y).max(f32::EPSILON);
    let shade = |y: f32| {
        let t = ((y - top_y) / span).clamp(0.0, 1.0);
        [
            top[0] + (bottom[0] - top[0]) * t,
            top[1] + (bottom[1] - top[1]) * t,
            top[2] + (bottom[2] - top[2]) * t,
            top[3] + (bottom[3] - top[3]) * t,
        ]
    };

    let mut vertices = Vec::with_capacity((ridge.len() - 1) * 6);
    for pair in ridge.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (a0, b0) = (Vec2::new(a.x, base_y), Vec2::new(b.x, base_y));

        vertices.push(Vertex::new(a.x, a.y, shade(a.y)));
        vertices.push(Vertex::new(b.x, b.y, shade(b.y)));
        vertices.push(Vertex::new(a0.x, a0.y, bottom));

        vertices.push(Vertex::new(a0.x, a0.y, bottom));
        vertices.push(Vertex::new(b.x, b.y, shade(b.y)));
        vertices.push(Vertex::new(b0.x, b0.y, bottom));
    }
    vertices
}

/// Rotate `p` about `pivot` by `angle` radians
#[inline]
pub fn rotate_about(p: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(p - pivot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        assert_eq!(rect(0.0, 0.0, 1.0, 1.0, [1.0; 4]).len(), 6);
        assert_eq!(circle(Vec2::ZERO, 2.0, [1.0; 4], 12).len(), 36);
        assert_eq!(line(Vec2::ZERO, Vec2::X, 1.0, [1.0; 4]).len(), 6);
        let outline = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        assert_eq!(polygon_fan(Vec2::splat(0.5), &outline, [1.0; 4]).len(), 9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(polygon_fan(Vec2::ZERO, &[Vec2::ONE], [1.0; 4]).is_empty());
        assert!(silhouette(&[Vec2::ONE], 10.0, 0.0, [1.0; 4], [0.0; 4]).is_empty());
        // Zero-length line still yields a (degenerate) quad, never NaN
        let v = line(Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]);
        assert!(v.iter().all(|v| v.position[0].is_finite()));
    }

    #[test]
    fn test_silhouette_reaches_baseline() {
        let ridge = [Vec2::new(0.0, 50.0), Vec2::new(10.0, 20.0), Vec2::new(20.0, 50.0)];
        let v = silhouette(&ridge, 50.0, 20.0, [1.0; 4], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(v.len(), 12);
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 50.0);
    }

    #[test]
    fn test_rotate_about() {
        let p = rotate_about(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0), PI / 2.0);
        assert!((p - Vec2::new(1.0, 2.0)).length() < 1e-5);
    }
}
