//! Game engine: lifecycle, frame clock and the callback contract
//!
//! The host owns the display loop (requestAnimationFrame on the web, a plain
//! loop natively) and calls [`GameEngine::frame`] with each frame timestamp.
//! The engine answers with a [`FrameRequest`] telling the host whether to
//! schedule another frame. Everything the engine reports goes out through
//! the [`GameOptions`] callbacks.

use std::cell::Cell;
use std::rc::Rc;

use crate::renderer::{RenderSurface, build_scene};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Millisecond wall clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock measured from construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// `performance.now()`, the same timebase requestAnimationFrame hands out
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle and give another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Platform default clock
#[cfg(not(target_arch = "wasm32"))]
fn default_clock() -> Box<dyn Clock> {
    Box::new(SystemClock::new())
}

#[cfg(target_arch = "wasm32")]
fn default_clock() -> Box<dyn Clock> {
    Box::new(PerformanceClock::new())
}

/// Outbound notifications
pub struct GameOptions {
    /// Floored score, after every simulated frame and on reset
    pub on_score: Box<dyn FnMut(u64)>,
    pub on_game_over: Box<dyn FnMut()>,
    pub on_jump: Box<dyn FnMut()>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            on_score: Box::new(|_| {}),
            on_game_over: Box::new(|| {}),
            on_jump: Box::new(|| {}),
        }
    }
}

impl GameOptions {
    pub fn on_score(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.on_score = Box::new(f);
        self
    }

    pub fn on_game_over(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_game_over = Box::new(f);
        self
    }

    pub fn on_jump(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_jump = Box::new(f);
        self
    }
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    Continue,
    Stop,
}

/// Owns the simulation and drives it from host frames
pub struct GameEngine<S: RenderSurface> {
    state: GameState,
    surface: S,
    options: GameOptions,
    settings: Settings,
    clock: Box<dyn Clock>,
    /// Timestamp of the last simulated frame
    last_frame_ms: f64,
    destroyed: bool,
}

impl<S: RenderSurface> GameEngine<S> {
    /// Engine with default tuning and settings, a random seed and the platform clock
    pub fn new(surface: S, options: GameOptions) -> Self {
        Self::from_parts(
            surface,
            options,
            default_clock(),
            rand::random(),
            Tuning::default(),
            Settings::default(),
        )
    }

    pub fn with_config(
        surface: S,
        options: GameOptions,
        clock: impl Clock + 'static,
        seed: u64,
        tuning: Tuning,
        settings: Settings,
    ) -> Self {
        Self::from_parts(surface, options, Box::new(clock), seed, tuning, settings)
    }

    fn from_parts(
        surface: S,
        options: GameOptions,
        clock: Box<dyn Clock>,
        seed: u64,
        tuning: Tuning,
        settings: Settings,
    ) -> Self {
        let (width, height) = surface.size();
        let state = GameState::new(width as f32, height as f32, seed, tuning);
        log::info!("Engine created: {}x{}, seed {}", width, height, seed);

        let last_frame_ms = clock.now_ms();
        Self {
            state,
            surface,
            options,
            settings,
            clock,
            last_frame_ms,
            destroyed: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.display_score()
    }

    pub fn is_running(&self) -> bool {
        !self.destroyed && self.state.phase == GamePhase::Running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Begin running from the current wall-clock time. No-op while running,
    /// after game over (reset first) or once destroyed. Returns `Continue`
    /// when the host should start scheduling frames.
    pub fn start(&mut self) -> FrameRequest {
        match self.state.phase {
            GamePhase::Idle | GamePhase::Paused if !self.destroyed => {
                log::info!("Game started");
                self.run_from_now()
            }
            _ => FrameRequest::Stop,
        }
    }

    /// Freeze the simulation; the host should drop its pending frame
    pub fn pause(&mut self) {
        if self.destroyed || self.state.phase != GamePhase::Running {
            return;
        }
        self.state.phase = GamePhase::Paused;
        log::info!("Game paused at score {}", self.score());
    }

    /// Continue after a pause. Time spent paused is not simulated.
    pub fn resume(&mut self) -> FrameRequest {
        if self.destroyed || self.state.phase != GamePhase::Paused {
            return FrameRequest::Stop;
        }
        log::info!("Game resumed");
        self.run_from_now()
    }

    /// Fresh run: score 0, initial speed, no rocks or dust. Reports score 0.
    /// A running game keeps running; otherwise the engine returns to idle.
    pub fn reset(&mut self) {
        if self.destroyed {
            return;
        }
        let was_running = self.state.phase == GamePhase::Running;
        self.state.reset();
        if was_running {
            self.state.phase = GamePhase::Running;
            self.last_frame_ms = self.clock.now_ms();
        }
        log::info!("Game reset");
        (self.options.on_score)(0);
    }

    /// Stop for good; every later call is a no-op
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.pause();
        self.destroyed = true;
        log::info!("Engine destroyed");
    }

    pub fn jump(&mut self) {
        if self.destroyed {
            return;
        }
        if sim::jump(&mut self.state) {
            self.dispatch(&[GameEvent::Jump]);
        }
    }

    pub fn brake(&mut self, engage: bool) {
        if self.destroyed {
            return;
        }
        sim::brake(&mut self.state, engage);
    }

    /// One display frame: simulate the time since the previous frame, report,
    /// and draw
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameRequest {
        if !self.is_running() {
            return FrameRequest::Stop;
        }

        let dt = ((timestamp_ms - self.last_frame_ms) / 1000.0).max(0.0) as f32;
        self.last_frame_ms = timestamp_ms;

        let events = sim::tick(&mut self.state, dt);
        self.dispatch(&events);
        self.render();

        if self.state.phase == GamePhase::GameOver {
            FrameRequest::Stop
        } else {
            FrameRequest::Continue
        }
    }

    /// Draw the current state without advancing it
    pub fn render(&mut self) {
        let vertices = build_scene(&self.state, &self.settings, self.clock.now_ms());
        self.surface.present(&vertices);
    }

    fn run_from_now(&mut self) -> FrameRequest {
        self.state.phase = GamePhase::Running;
        let now = self.clock.now_ms();
        self.last_frame_ms = now;
        self.frame(now)
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Score(score) => (self.options.on_score)(*score),
                GameEvent::Jump => (self.options.on_jump)(),
                GameEvent::GameOver => (self.options.on_game_over)(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Vertex;
    use crate::sim::obstacle::{Obstacle, ObstacleKind};
    use std::cell::RefCell;

    /// Counts presented frames
    struct RecordingSurface {
        frames: Rc<Cell<usize>>,
        last_len: usize,
    }

    impl RenderSurface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (640, 240)
        }

        fn present(&mut self, vertices: &[Vertex]) {
            self.frames.set(self.frames.get() + 1);
            self.last_len = vertices.len();
        }
    }

    #[derive(Default, Clone)]
    struct Log {
        scores: Rc<RefCell<Vec<u64>>>,
        game_overs: Rc<Cell<u32>>,
        jumps: Rc<Cell<u32>>,
        frames: Rc<Cell<usize>>,
    }

    impl Log {
        fn options(&self) -> GameOptions {
            let scores = self.scores.clone();
            let game_overs = self.game_overs.clone();
            let jumps = self.jumps.clone();
            GameOptions::default()
                .on_score(move |s| scores.borrow_mut().push(s))
                .on_game_over(move || game_overs.set(game_overs.get() + 1))
                .on_jump(move || jumps.set(jumps.get() + 1))
        }

        fn last_score(&self) -> Option<u64> {
            self.scores.borrow().last().copied()
        }
    }

    fn engine(clock: &ManualClock, log: &Log) -> GameEngine<RecordingSurface> {
        let tuning = Tuning {
            spawn_chance_per_speed: 0.0,
            ..Tuning::default()
        };
        let surface = RecordingSurface {
            frames: log.frames.clone(),
            last_len: 0,
        };
        GameEngine::with_config(surface, log.options(), clock.clone(), 7, tuning, Settings::default())
    }

    #[test]
    fn test_start_runs_first_frame_immediately() {
        let clock = ManualClock::new(1000.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert_eq!(engine.frame(1500.0), FrameRequest::Stop);

        assert_eq!(engine.start(), FrameRequest::Continue);
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(log.frames.get(), 1);
        assert!(engine.surface().last_len > 0);
        assert_eq!(log.last_score(), Some(0));
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();
        engine.frame(500.0);
        clock.set(900.0);
        assert_eq!(engine.start(), FrameRequest::Stop);
        assert_eq!(log.frames.get(), 2);
        // The next frame still measures from 500
        engine.frame(1000.0);
        assert_eq!(log.last_score(), Some(10));
    }

    #[test]
    fn test_score_reported_each_frame() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();
        for i in 1..=60 {
            assert_eq!(engine.frame(i as f64 * 1000.0 / 60.0), FrameRequest::Continue);
        }
        assert_eq!(log.scores.borrow().len(), 61);
        assert_eq!(log.last_score(), Some(10));
        assert_eq!(engine.score(), 10);
    }

    #[test]
    fn test_pause_excludes_elapsed_time() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();
        engine.frame(500.0);

        engine.pause();
        assert_eq!(engine.phase(), GamePhase::Paused);
        assert_eq!(engine.frame(5_000.0), FrameRequest::Stop);

        clock.advance(10_000.0);
        assert_eq!(engine.resume(), FrameRequest::Continue);
        engine.frame(10_500.0);
        assert_eq!(log.last_score(), Some(10));
    }

    #[test]
    fn test_resume_only_from_pause() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        assert_eq!(engine.resume(), FrameRequest::Stop);
        assert_eq!(engine.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_jump_notifies_once() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);

        // Not running yet
        engine.jump();
        assert_eq!(log.jumps.get(), 0);

        engine.start();
        engine.jump();
        engine.frame(16.0);
        engine.jump();
        assert_eq!(log.jumps.get(), 1);
    }

    #[test]
    fn test_game_over_then_reset() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();

        engine.state.obstacles.obstacles.push(Obstacle {
            x: 70.0,
            y: 170.0,
            width: 40.0,
            height: 30.0,
            kind: ObstacleKind::Small,
            rotation: 0.0,
            jaggedness: 0.1,
            points: vec![0.0; 4],
        });
        let frames = log.frames.get();
        assert_eq!(engine.frame(16.0), FrameRequest::Stop);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(log.game_overs.get(), 1);
        // Final frame is still drawn
        assert_eq!(log.frames.get(), frames + 1);

        // Terminal until reset
        assert_eq!(engine.start(), FrameRequest::Stop);
        assert_eq!(engine.frame(32.0), FrameRequest::Stop);
        assert_eq!(log.game_overs.get(), 1);

        engine.reset();
        assert_eq!(log.last_score(), Some(0));
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert!(engine.state().obstacles.is_empty());
        assert_eq!(engine.start(), FrameRequest::Continue);
    }

    #[test]
    fn test_reset_while_running_keeps_running() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();
        engine.frame(2000.0);
        assert_eq!(log.last_score(), Some(20));

        clock.set(2000.0);
        engine.reset();
        assert_eq!(engine.phase(), GamePhase::Running);
        engine.frame(3000.0);
        assert_eq!(log.last_score(), Some(10));
    }

    #[test]
    fn test_destroy_stops_everything() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();
        engine.destroy();

        assert!(!engine.is_running());
        assert_eq!(engine.frame(100.0), FrameRequest::Stop);
        assert_eq!(engine.start(), FrameRequest::Stop);
        assert_eq!(engine.resume(), FrameRequest::Stop);
        engine.jump();
        assert_eq!(log.jumps.get(), 0);
    }

    #[test]
    fn test_settings_change_next_frame() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();
        let medium = engine.surface().last_len;

        engine.set_settings(Settings::from_preset(crate::settings::QualityPreset::Low));
        engine.frame(16.0);
        assert_eq!(engine.settings().quality, crate::settings::QualityPreset::Low);
        assert!(engine.surface().last_len < medium);
    }

    #[test]
    fn test_brake_forwarded() {
        let clock = ManualClock::new(0.0);
        let log = Log::default();
        let mut engine = engine(&clock, &log);
        engine.start();
        engine.brake(true);
        assert!(engine.state().braking);
        engine.frame(1000.0);
        assert!(engine.state().is_stopped());
        engine.brake(false);
        assert_eq!(engine.state().speed, 5.0);
    }
}
