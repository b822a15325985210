//! Scene assembly
//!
//! Turns a `GameState` into one flat triangle list in pixel space, painted
//! back to front. Rendering is a pure function of the state, the settings and
//! the wall clock (for star twinkle); it never mutates the simulation.

use glam::Vec2;

use super::shapes::{
    circle, ellipse, line, polygon_fan, radial_glow, rect, rect_gradient, rotate_about, silhouette,
};
use super::vertex::{Vertex, adjust_grey, colors, grey, rgba, with_alpha};
use crate::consts::GROUND_INSET;
use crate::settings::Settings;
use crate::sim::backdrop::{Backdrop, MountainLayer};
use crate::sim::obstacle::{Obstacle, ObstacleKind};
use crate::sim::particles::DustSystem;
use crate::sim::state::GameState;
use crate::sim::terrain::Terrain;
use crate::sim::vehicle::Buggy;

/// Below this speed the braking tag turns into STOPPED
const STOPPED_SPEED: f32 = 0.1;

/// HUD tag geometry (text is drawn by the host shell)
const TAG_X: f32 = 10.0;
const TAG_HEIGHT: f32 = 6.0;
const BRAKE_TAG_Y: f32 = 12.0;
const LONG_JUMP_TAG_Y: f32 = 32.0;

/// Which HUD tags are lit this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indicators {
    pub braking: bool,
    pub stopped: bool,
    pub long_jump: bool,
}

impl Indicators {
    pub fn from_state(state: &GameState) -> Self {
        let stopped = state.braking && state.speed <= STOPPED_SPEED;
        Self {
            braking: state.braking && !stopped,
            stopped,
            long_jump: state.buggy.brake_jumping && state.buggy.is_jumping,
        }
    }
}

/// Build the full frame
pub fn build_scene(state: &GameState, settings: &Settings, now_ms: f64) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(8192);
    let segments = settings.quality.circle_segments();

    push_space(&mut vertices, state.width, state.height);
    if settings.quality.starfield_enabled() {
        push_stars(&mut vertices, &state.backdrop, settings.twinkle, now_ms, segments);
    }
    for layer in &state.backdrop.mountains {
        push_mountain(&mut vertices, layer, state.height);
    }
    push_terrain(&mut vertices, &state.terrain, state.width, state.height, settings);
    for obstacle in state.obstacles.iter() {
        push_obstacle(&mut vertices, obstacle, settings.quality.fine_detail_enabled());
    }
    if settings.particles {
        push_dust(&mut vertices, &state.dust, segments);
    }
    push_buggy(&mut vertices, &state.buggy, state.braking, settings);
    if settings.indicators {
        push_indicators(&mut vertices, Indicators::from_state(state));
    }

    vertices
}

fn push_space(out: &mut Vec<Vertex>, width: f32, height: f32) {
    let half = height / 2.0;
    out.extend(rect_gradient(0.0, 0.0, width, half, colors::SPACE_TOP, colors::SPACE_MID));
    out.extend(rect_gradient(0.0, half, width, height - half, colors::SPACE_MID, colors::SPACE_BOTTOM));
}

fn push_stars(out: &mut Vec<Vertex>, backdrop: &Backdrop, twinkle: bool, now_ms: f64, segments: u32) {
    // Stars are tiny; a handful of triangles is plenty
    let segments = segments.min(8);
    for layer in &backdrop.star_layers {
        for star in &layer.stars {
            let alpha = if twinkle {
                star.twinkle(now_ms)
            } else {
                star.brightness
            };
            out.extend(circle(
                Vec2::new(star.x, star.y),
                star.size,
                [1.0, 1.0, 1.0, alpha],
                segments,
            ));
        }
    }
}

fn push_mountain(out: &mut Vec<Vertex>, layer: &MountainLayer, viewport_height: f32) {
    if layer.points.len() < 2 {
        return;
    }

    let base_y = viewport_height - GROUND_INSET;
    let step = layer.width / (layer.points.len() - 1) as f32;
    let ridge: Vec<Vec2> = layer
        .points
        .iter()
        .enumerate()
        .map(|(i, &p)| Vec2::new(layer.x + i as f32 * step, base_y - p * layer.height))
        .collect();

    // Lighter at the peaks, darker toward the ground
    out.extend(silhouette(
        &ridge,
        base_y,
        base_y - layer.height,
        grey(layer.shade),
        grey(adjust_grey(layer.shade, -20)),
    ));
}

fn push_terrain(out: &mut Vec<Vertex>, terrain: &Terrain, width: f32, height: f32, settings: &Settings) {
    let top = terrain.surface_y();
    out.extend(rect_gradient(
        0.0,
        top,
        width,
        height - top,
        colors::GROUND_TOP,
        colors::GROUND_BOTTOM,
    ));

    let sw = terrain.segment_width();
    let detail = settings.quality.ground_detail_enabled();
    for (i, segment) in terrain.segments.iter().enumerate() {
        let x = i as f32 * sw;
        let y = top + segment.height;
        out.extend(rect(x, y, sw, 2.0, grey(segment.shade)));

        if detail && segment.has_rock() {
            // Pebble position derived from the segment's own detail value so it stays put
            let px = x + (segment.detail - 0.7) / 0.3 * sw;
            out.extend(circle(Vec2::new(px, y - 1.0), 1.0, colors::PEBBLE, 6));
        }
    }

    if !detail {
        return;
    }
    let segments = settings.quality.circle_segments();
    for crater in &terrain.craters {
        let center = Vec2::new(crater.x, crater.y);
        out.extend(radial_glow(center, crater.radius, rgba(50, 50, 50, crater.depth), segments));
        // Rim highlight on the upper left
        let a = rotate_about(center + Vec2::X * crater.radius * 0.9, center, std::f32::consts::PI * 0.8);
        let b = rotate_about(center + Vec2::X * crater.radius * 0.9, center, std::f32::consts::PI * 1.5);
        out.extend(line(a, b, 0.5, colors::PEBBLE));
    }
}

/// Outline of the jagged trapezoid in rock-local coordinates (centre origin)
fn rock_outline(obstacle: &Obstacle) -> Vec<Vec2> {
    let (hw, hh) = (obstacle.width / 2.0, obstacle.height / 2.0);
    let top_width = obstacle.width * 0.8;
    let spacing = if obstacle.points.len() > 1 {
        top_width / (obstacle.points.len() - 1) as f32
    } else {
        0.0
    };

    let mut outline = Vec::with_capacity(obstacle.points.len() + 4);
    outline.push(Vec2::new(-hw, hh));
    outline.push(Vec2::new(-hw * 0.9, -hh));
    for (i, &p) in obstacle.points.iter().enumerate() {
        outline.push(Vec2::new(
            -top_width / 2.0 + i as f32 * spacing,
            -hh - p * obstacle.height * 0.2,
        ));
    }
    outline.push(Vec2::new(hw * 0.9, -hh));
    outline.push(Vec2::new(hw, hh));
    outline
}

fn push_obstacle(out: &mut Vec<Vertex>, obstacle: &Obstacle, fine_detail: bool) {
    let center = Vec2::new(obstacle.x + obstacle.width / 2.0, obstacle.y + obstacle.height / 2.0);
    let to_world = |p: Vec2| rotate_about(center + p, center, obstacle.rotation);

    let color = match obstacle.kind {
        ObstacleKind::Large => colors::ROCK_LARGE,
        ObstacleKind::Small => colors::ROCK_SMALL,
    };
    let outline: Vec<Vec2> = rock_outline(obstacle).into_iter().map(to_world).collect();
    out.extend(polygon_fan(center, &outline, color));

    if fine_detail {
        // Cracks hang off the ridge samples so they stay fixed to the rock
        let cracks = match obstacle.kind {
            ObstacleKind::Large => 3,
            ObstacleKind::Small => 2,
        };
        for (i, &p) in obstacle.points.iter().take(cracks).enumerate() {
            let t = (i as f32 + 1.0) / (cracks as f32 + 1.0);
            let start = Vec2::new((t - 0.5) * obstacle.width, -obstacle.height * 0.3);
            let mid = start + Vec2::new(p * obstacle.width * 0.5, obstacle.height * 0.25);
            let end = mid + Vec2::new(-p * obstacle.width * 0.3, obstacle.height * 0.2);
            out.extend(line(to_world(start), to_world(mid), 0.8, colors::ROCK_CRACK));
            out.extend(line(to_world(mid), to_world(end), 0.8, colors::ROCK_CRACK));
        }
    }

    let shadow = to_world(Vec2::new(2.0, obstacle.height / 2.0 - 2.0));
    out.extend(ellipse(
        shadow,
        (obstacle.width / 2.0 - 2.0).max(1.0),
        obstacle.height / 6.0,
        colors::SHADOW,
        12,
    ));
}

fn push_dust(out: &mut Vec<Vertex>, dust: &DustSystem, segments: u32) {
    let segments = segments.min(8);
    for p in &dust.particles {
        let [r, g, b] = p.color;
        out.extend(circle(p.pos, p.size, rgba(r, g, b, p.alpha), segments));
    }
}

fn push_wheel(out: &mut Vec<Vertex>, center: Vec2, radius: f32, rotation: f32, segments: u32, spokes: bool) {
    out.extend(circle(center + Vec2::ONE, radius, with_alpha(colors::SHADOW, 0.2), segments));
    out.extend(circle(center, radius, colors::TIRE, segments));
    out.extend(circle(center, radius - 2.0, colors::HUB, segments));

    if spokes {
        for i in 0..4 {
            let angle = rotation + i as f32 * std::f32::consts::FRAC_PI_4;
            let tip = Vec2::from_angle(angle) * (radius - 2.0);
            out.extend(line(center - tip, center + tip, 1.0, colors::SPOKE));
        }
    }
}

fn push_buggy(out: &mut Vec<Vertex>, buggy: &Buggy, braking: bool, settings: &Settings) {
    let x = buggy.x;
    let y = buggy.y + buggy.suspension_offset;
    let (w, h) = (buggy.width, buggy.height);
    let segments = settings.quality.circle_segments();

    // Shadow
    out.extend(ellipse(Vec2::new(x + w / 2.0, y + h - 2.0), w / 2.0, h / 6.0, colors::SHADOW, segments));

    // Engine glow at the rear, dims while braking
    out.extend(radial_glow(
        Vec2::new(x + 5.0, y + h - 12.0),
        6.0 * buggy.engine_glow,
        colors::ENGINE_GLOW,
        segments,
    ));

    if braking {
        out.extend(radial_glow(Vec2::new(x + w - 5.0, y + h - 12.0), 4.0, colors::BRAKE_LIGHT, segments));
    }

    if buggy.brake_jumping && buggy.is_jumping {
        out.extend(radial_glow(
            Vec2::new(x - 5.0, y + h / 2.0),
            h / 1.5,
            colors::LONG_JUMP_TRAIL,
            segments,
        ));
    }

    // Chassis and cabin
    out.extend(rect_gradient(x + 8.0, y + 8.0, w - 16.0, h - 16.0, colors::CHASSIS, colors::CHASSIS_DARK));
    out.extend(rect_gradient(x + 12.0, y + 4.0, w - 24.0, h - 18.0, colors::CHASSIS, colors::CHASSIS_DARK));
    out.extend(rect(x + 4.0, y + 12.0, 6.0, 10.0, colors::CHASSIS_DARK));
    out.extend(rect(x + w - 10.0, y + 12.0, 6.0, 10.0, colors::CHASSIS_DARK));

    // Astronaut
    let head = Vec2::new(x + w / 2.0 - 5.0, y + 10.0 + buggy.astronaut_bob);
    out.extend(circle(head, 5.0, colors::HELMET, segments));
    out.extend(ellipse(head + Vec2::X, 3.0, 2.5, colors::VISOR, segments));

    // Windshield
    let shield = [
        Vec2::new(x + 18.0, y + 6.0),
        Vec2::new(x + 28.0, y + 6.0),
        Vec2::new(x + 30.0, y + 12.0),
        Vec2::new(x + 16.0, y + 12.0),
    ];
    out.extend(polygon_fan(Vec2::new(x + 23.0, y + 9.0), &shield, colors::WINDOW));

    // Antenna and flag
    let mast = x + w - 12.0;
    out.extend(line(Vec2::new(mast, y - 14.0), Vec2::new(mast, y + 6.0), 1.0, colors::HUB));
    let flag_y = y - 14.0 + buggy.flag_wave;
    out.extend(rect(mast + 1.0, flag_y, 8.0, 3.0, colors::FLAG_RED));
    out.extend(rect(mast + 1.0, flag_y + 3.0, 8.0, 1.0, colors::HELMET));
    out.extend(rect(mast + 1.0, flag_y, 4.0, 2.0, colors::FLAG_BLUE));

    // Solar panel
    out.extend(rect(x + 16.0, y, w - 32.0, 4.0, colors::SOLAR));

    // Wheels: front, rear, and a smaller middle one
    let spokes = settings.quality.fine_detail_enabled();
    let r = buggy.wheel_rotation;
    push_wheel(out, Vec2::new(x + 10.0, y + h - 8.0), 8.0, r, segments, spokes);
    push_wheel(out, Vec2::new(x + w - 10.0, y + h - 8.0), 8.0, r, segments, spokes);
    push_wheel(out, Vec2::new(x + w / 2.0, y + h - 6.0), 6.0, r, segments, spokes);
}

fn push_indicators(out: &mut Vec<Vertex>, indicators: Indicators) {
    if indicators.stopped {
        out.extend(rect(TAG_X, BRAKE_TAG_Y, 64.0, TAG_HEIGHT, colors::INDICATOR_STOPPED));
    } else if indicators.braking {
        out.extend(rect(TAG_X, BRAKE_TAG_Y, 56.0, TAG_HEIGHT, colors::INDICATOR_BRAKING));
    }
    if indicators.long_jump {
        out.extend(rect(TAG_X, LONG_JUMP_TAG_Y, 64.0, TAG_HEIGHT, colors::INDICATOR_LONG_JUMP));
    }
}
