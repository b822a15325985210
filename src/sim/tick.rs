//! Per-frame simulation step and player controls
//!
//! The step order is fixed: brake release, speed, buggy, scenery, dust,
//! spawning, collisions, score.

use rand::Rng;

use super::collision::first_hit;
use super::state::{GameEvent, GamePhase, GameState};

/// Dust counts per trigger
const JUMP_DUST: usize = 10;
const BRAKE_JUMP_DUST: usize = 5;
const BRAKE_DUST: usize = 10;
const KICKOFF_DUST: usize = 15;
const LANDING_DUST: usize = 15;
const BRAKING_DRIZZLE: usize = 2;

/// Start a jump. Ignored unless running and grounded; returns true on takeoff.
pub fn jump(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    if !state.buggy.jump(state.braking) {
        return false;
    }

    state.dust_at(0.5, JUMP_DUST);
    if state.braking {
        state.dust_pair(BRAKE_JUMP_DUST);
    }
    true
}

/// Engage or release the brake.
///
/// Engaging is refused while airborne (or when not running); releasing is
/// always honoured and snaps speed straight back to the remembered cruise speed.
pub fn brake(state: &mut GameState, engage: bool) {
    if engage {
        if state.buggy.is_jumping || state.phase != GamePhase::Running {
            return;
        }
        if !state.braking {
            state.original_speed = state.speed;
            state.dust_pair(BRAKE_DUST);
            log::debug!("Brake engaged at speed {:.2}", state.speed);
        }
    } else if state.braking {
        if state.speed < state.tuning.kickoff_threshold {
            state.dust_pair(KICKOFF_DUST);
        }
        state.speed = state.original_speed;
        log::debug!("Brake released, speed restored to {:.2}", state.speed);
    }

    state.braking = engage;
}

/// Advance the simulation by `dt` seconds. No-op unless running.
///
/// Normally returns one `Score` event. The frame that ends the run returns
/// only `GameOver`: the crash frame is not scored, so no final `Score`
/// follows it.
pub fn tick(state: &mut GameState, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }
    let dt = dt.max(0.0);
    state.time += dt as f64;

    // 1. Braking cannot persist in the air (the jump keeps its brake flag)
    if state.buggy.is_jumping && state.braking {
        brake(state, false);
    }

    // 2. World speed
    update_speed(state, dt);

    // 3. Buggy physics
    state.buggy.update(dt, state.braking);

    // 4. Scenery freezes at a full stop
    let moving = state.speed > 0.0;
    if moving {
        let speed = state.speed;
        state.backdrop.update(&mut state.rng, dt, speed);
        state.terrain.update(&mut state.rng, dt, speed);
        state.obstacles.update(dt, speed);
    }

    // 5. Dust always settles
    state
        .dust
        .update(dt, state.tuning.particle_drift, state.tuning.particle_decay);

    // 6. New rocks
    if moving {
        let rules = state.spawn_rules();
        let viewport = (state.width, state.height);
        let buggy_size = (state.buggy.width, state.buggy.height);
        let speed = state.speed;
        state
            .obstacles
            .try_spawn(&mut state.rng, speed, rules, viewport, buggy_size);
    }

    // 7. Collisions
    if check_collisions(state) {
        state.phase = GamePhase::GameOver;
        log::info!("Game over: score {}", state.display_score());
        events.push(GameEvent::GameOver);
        return events;
    }

    // 8. Score
    let multiplier = if state.braking {
        if moving {
            state.tuning.braking_score_multiplier
        } else {
            0.0
        }
    } else {
        1.0
    };
    state.score += dt as f64 * state.tuning.score_rate * multiplier;
    events.push(GameEvent::Score(state.display_score()));

    log::trace!("tick dt={:.4} speed={:.3} score={:.2}", dt, state.speed, state.score);
    events
}

/// Decay toward zero while braking, otherwise creep toward cruise + headroom
fn update_speed(state: &mut GameState, dt: f32) {
    if state.braking {
        state.speed = (state.speed - dt * state.tuning.brake_deceleration).max(0.0);

        if state.rng.random::<f32>() < state.tuning.braking_dust_chance {
            state.dust_at(0.25, BRAKING_DRIZZLE);
        }
    } else {
        let max_speed = state.tuning.max_speed(state.original_speed);
        if state.speed < max_speed {
            state.speed = (state.speed + dt * state.tuning.speed_growth).min(max_speed);

            // Natural growth raises the cruise speed; recovery does not
            if state.speed > state.original_speed {
                state.original_speed = state.speed;
            }
        }
    }
}

/// Ground clamp, then rock test. Returns true if the buggy crashed.
fn check_collisions(state: &mut GameState) -> bool {
    let ground_y = state.ground_y();
    if state.buggy.y > ground_y && state.buggy.land(ground_y) {
        state.dust_at(0.5, LANDING_DUST);
    }

    first_hit(
        &state.buggy,
        &state.obstacles.obstacles,
        state.tuning.hitbox_padding,
    )
    .is_some()
}
