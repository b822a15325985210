//! The player's buggy
//!
//! Vertical physics only: the world scrolls past a buggy with a fixed x.
//! Cosmetic phases (wheels, flag, suspension, glow) are derived from elapsed
//! time and braking state and never feed back into physics.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::{BUGGY_HEIGHT, BUGGY_WIDTH};

/// Wheel spin rate while rolling (rad/s)
const WHEEL_SPEED: f32 = 5.0;
/// Wheel spin rate while braking (rad/s)
const WHEEL_SPEED_BRAKING: f32 = 1.0;

/// The player's vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buggy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (pixels/s, positive is down). Only meaningful while jumping.
    pub velocity: f32,
    pub is_jumping: bool,
    /// Set on takeoff, cleared by the landing dust burst
    pub was_jumping: bool,
    /// This jump started while braking (sticky until landing)
    pub brake_jumping: bool,

    gravity: f32,
    jump_force: f32,
    brake_jump_gravity: f32,

    // Animation phases
    pub wheel_rotation: f32,
    pub flag_wave: f32,
    pub suspension_offset: f32,
    pub engine_glow: f32,
    pub astronaut_bob: f32,
    time: f32,
}

impl Buggy {
    pub fn new(x: f32, y: f32, gravity: f32, jump_force: f32, brake_jump_gravity: f32) -> Self {
        Self {
            x,
            y,
            width: BUGGY_WIDTH,
            height: BUGGY_HEIGHT,
            velocity: 0.0,
            is_jumping: false,
            was_jumping: false,
            brake_jumping: false,
            gravity,
            jump_force,
            brake_jump_gravity,
            wheel_rotation: 0.0,
            flag_wave: 0.0,
            suspension_offset: 0.0,
            engine_glow: 0.0,
            astronaut_bob: 0.0,
            time: 0.0,
        }
    }

    /// Put the buggy back at its spawn point with all motion cleared
    pub fn reset(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.velocity = 0.0;
        self.is_jumping = false;
        self.was_jumping = false;
        self.brake_jumping = false;
        self.wheel_rotation = 0.0;
        self.flag_wave = 0.0;
        self.suspension_offset = 0.0;
        self.engine_glow = 0.0;
        self.astronaut_bob = 0.0;
        self.time = 0.0;
    }

    /// Start a jump. Returns false (and changes nothing) if already airborne.
    pub fn jump(&mut self, braking: bool) -> bool {
        if self.is_jumping {
            return false;
        }

        self.velocity = self.jump_force;
        self.is_jumping = true;
        self.was_jumping = true;
        self.brake_jumping = braking;
        true
    }

    /// Effective gravity multiplier for the current jump
    #[inline]
    pub fn gravity_modifier(&self) -> f32 {
        if self.brake_jumping {
            self.brake_jump_gravity
        } else {
            1.0
        }
    }

    /// Integrate vertical motion and advance animation phases
    pub fn update(&mut self, dt: f32, braking: bool) {
        self.time += dt;

        if self.is_jumping {
            self.velocity += self.gravity * self.gravity_modifier() * dt;
            self.y += self.velocity * dt;
        }

        let wheel_speed = if braking {
            WHEEL_SPEED_BRAKING
        } else {
            WHEEL_SPEED
        };
        self.wheel_rotation = (self.wheel_rotation + dt * wheel_speed) % TAU;
        self.flag_wave = (self.time * 5.0).sin() * 2.0;

        // Suspension only sways on the ground, harder while braking
        if !self.is_jumping {
            let intensity = if braking { 1.5 } else { 0.5 };
            self.suspension_offset = (self.time * 10.0).sin() * intensity;
        }

        self.engine_glow = if braking {
            0.3
        } else {
            0.6 + (self.time * 8.0).sin() * 0.4
        };

        self.astronaut_bob = (self.time * 3.0).sin() * 0.8;
    }

    /// Put the buggy on the ground at `ground_y` and clear jump state.
    /// Returns true if this ended a jump (the caller emits landing dust).
    pub fn land(&mut self, ground_y: f32) -> bool {
        self.y = ground_y;
        self.is_jumping = false;
        self.velocity = 0.0;
        self.brake_jumping = false;

        if self.was_jumping {
            self.was_jumping = false;
            return true;
        }
        false
    }

    /// Bounding box in screen space
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// A point on the buggy's underside at `frac` of its width (dust origin)
    #[inline]
    pub fn underside_at(&self, frac: f32) -> (f32, f32) {
        (self.x + self.width * frac, self.y + self.height)
    }

    /// Seconds of animation time since spawn
    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buggy() -> Buggy {
        Buggy::new(50.0, 165.0, 980.0, -450.0, 0.7)
    }

    /// Fly a jump to completion, returning (peak rise, airtime)
    fn fly(b: &mut Buggy, dt: f32) -> (f32, f32) {
        let start_y = b.y;
        let mut min_y = b.y;
        let mut t = 0.0;
        while b.y <= start_y && t < 10.0 {
            b.update(dt, false);
            min_y = min_y.min(b.y);
            t += dt;
        }
        (start_y - min_y, t)
    }

    #[test]
    fn test_jump_sets_upward_velocity() {
        let mut b = buggy();
        assert!(b.jump(false));
        assert!(b.is_jumping);
        assert!(b.was_jumping);
        assert!(!b.brake_jumping);
        assert_eq!(b.velocity, -450.0);
    }

    #[test]
    fn test_double_jump_is_noop() {
        let mut b = buggy();
        assert!(b.jump(false));
        b.update(0.05, false);
        let (y, v) = (b.y, b.velocity);

        assert!(!b.jump(true));
        assert_eq!(b.y, y);
        assert_eq!(b.velocity, v);
        assert!(!b.brake_jumping, "second jump must not rewrite the brake flag");
    }

    #[test]
    fn test_grounded_update_does_not_move() {
        let mut b = buggy();
        b.update(0.5, false);
        assert_eq!(b.y, 165.0);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_apex_matches_projectile() {
        // v²/2g = 450² / 1960 ≈ 103.3 px
        let mut b = buggy();
        b.jump(false);
        let (rise, _) = fly(&mut b, 1.0 / 600.0);
        let expected = 450.0 * 450.0 / (2.0 * 980.0);
        assert!((rise - expected).abs() < 1.0, "rise {} vs {}", rise, expected);
    }

    #[test]
    fn test_brake_jump_flies_higher_and_longer() {
        let mut normal = buggy();
        normal.jump(false);
        let (normal_rise, normal_air) = fly(&mut normal, 1.0 / 120.0);

        let mut long = buggy();
        long.jump(true);
        let (long_rise, long_air) = fly(&mut long, 1.0 / 120.0);

        assert!(long_rise > normal_rise);
        assert!(long_air > normal_air);
    }

    #[test]
    fn test_land_clears_flags_once() {
        let mut b = buggy();
        b.jump(true);
        b.update(0.1, false);
        assert!(b.land(165.0));
        assert!(!b.is_jumping);
        assert!(!b.brake_jumping);
        assert_eq!(b.velocity, 0.0);
        // Already on the ground: no second landing
        assert!(!b.land(165.0));
    }

    #[test]
    fn test_braking_slows_wheels_and_dims_glow() {
        let mut rolling = buggy();
        let mut braking = buggy();
        rolling.update(0.1, false);
        braking.update(0.1, true);
        assert!(braking.wheel_rotation < rolling.wheel_rotation);
        assert_eq!(braking.engine_glow, 0.3);
    }

    #[test]
    fn test_suspension_frozen_in_air() {
        let mut b = buggy();
        b.update(0.03, false);
        let before = b.suspension_offset;
        b.jump(false);
        b.update(0.05, false);
        assert_eq!(b.suspension_offset, before);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut b = buggy();
        b.jump(true);
        b.update(0.2, true);
        b.reset(50.0, 170.0);
        assert_eq!(b.y, 170.0);
        assert!(!b.is_jumping && !b.was_jumping && !b.brake_jumping);
        assert_eq!(b.wheel_rotation, 0.0);
        assert_eq!(b.time(), 0.0);
    }
}
