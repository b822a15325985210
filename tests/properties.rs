//! Property tests for simulation invariants

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use moon_buggy::Tuning;
use moon_buggy::sim::{
    Buggy, GamePhase, GameState, Obstacle, ObstacleKind, Terrain, brake, buggy_hits_obstacle, jump,
    tick,
};

/// Running state with no rock spawns
fn running(seed: u64) -> GameState {
    let tuning = Tuning {
        spawn_chance_per_speed: 0.0,
        ..Tuning::default()
    };
    let mut state = GameState::new(640.0, 240.0, seed, tuning);
    state.phase = GamePhase::Running;
    tick(&mut state, 0.0);
    state
}

fn rock(x: f32, y: f32, width: f32, height: f32) -> Obstacle {
    Obstacle {
        x,
        y,
        width,
        height,
        kind: ObstacleKind::Large,
        rotation: 0.0,
        jaggedness: 0.2,
        points: vec![0.0; 4],
    }
}

proptest! {
    #[test]
    fn terrain_segment_count_is_stable(
        seed in any::<u64>(),
        width in 100.0f32..2000.0,
        steps in prop::collection::vec((0.0f32..0.5, 0.0f32..20.0), 1..40),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut terrain = Terrain::new(&mut rng, width, 240.0);
        let expected = (width / 20.0).ceil() as usize + 1;
        prop_assert_eq!(terrain.segments.len(), expected);

        for (dt, speed) in steps {
            terrain.update(&mut rng, dt, speed);
            prop_assert_eq!(terrain.segments.len(), expected);
        }
    }

    #[test]
    fn speed_stays_between_zero_and_headroom(
        seed in any::<u64>(),
        steps in prop::collection::vec((0.0f32..0.1, any::<bool>()), 1..200),
    ) {
        let mut state = running(seed);
        for (dt, braking) in steps {
            let ceiling = state.original_speed + state.tuning.speed_headroom;
            brake(&mut state, braking);
            tick(&mut state, dt);
            prop_assert!(state.speed >= 0.0);
            prop_assert!(state.speed <= ceiling + 1e-4);
            prop_assert!(state.speed <= state.original_speed + state.tuning.speed_headroom + 1e-4);
        }
    }

    #[test]
    fn braking_never_goes_negative(seed in any::<u64>(), dt in 0.0f32..5.0) {
        let mut state = running(seed);
        brake(&mut state, true);
        tick(&mut state, dt);
        let expected = (5.0 - dt * 10.0).max(0.0);
        prop_assert!((state.speed - expected).abs() < 1e-4);
    }

    #[test]
    fn airborne_velocity_only_increases(
        braking in any::<bool>(),
        dts in prop::collection::vec(0.001f32..0.05, 1..60),
    ) {
        let mut buggy = Buggy::new(50.0, 165.0, 980.0, -450.0, 0.7);
        prop_assert!(buggy.jump(braking));
        let mut last = buggy.velocity;
        for dt in dts {
            buggy.update(dt, false);
            prop_assert!(buggy.velocity > last);
            last = buggy.velocity;
        }
    }

    #[test]
    fn padded_overlap_matches_shrunk_boxes(
        rx in 0.0f32..200.0,
        ry in 100.0f32..240.0,
        rw in 20.0f32..60.0,
        rh in 20.0f32..40.0,
    ) {
        let buggy = Buggy::new(50.0, 165.0, 980.0, -450.0, 0.7);
        let obstacle = rock(rx, ry, rw, rh);

        // Buggy hitbox is [54, 96] x [169, 196] after padding
        let expected = 54.0 < rx + rw - 4.0
            && 96.0 > rx + 4.0
            && 169.0 < ry + rh - 4.0
            && 196.0 > ry + 4.0;
        prop_assert_eq!(buggy_hits_obstacle(&buggy, &obstacle, 4.0), expected);
    }

    #[test]
    fn same_seed_same_run(
        seed in any::<u64>(),
        inputs in prop::collection::vec((0.005f32..0.05, any::<bool>(), any::<bool>()), 1..120),
    ) {
        let mut a = GameState::new(640.0, 240.0, seed, Tuning::default());
        let mut b = GameState::new(640.0, 240.0, seed, Tuning::default());
        a.phase = GamePhase::Running;
        b.phase = GamePhase::Running;

        for (dt, jumping, braking) in inputs {
            for state in [&mut a, &mut b] {
                if jumping {
                    jump(state);
                }
                brake(state, braking);
            }
            prop_assert_eq!(tick(&mut a, dt), tick(&mut b, dt));
        }
        prop_assert_eq!(a.display_score(), b.display_score());
        prop_assert_eq!(a.obstacles.len(), b.obstacles.len());
        prop_assert_eq!(a.buggy.y, b.buggy.y);
    }
}
