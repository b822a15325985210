//! Moon Buggy entry point
//!
//! Handles platform-specific initialization and drives the engine's frames.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use moon_buggy::consts::*;
    use moon_buggy::renderer::RenderState;
    use moon_buggy::sim::GamePhase;
    use moon_buggy::{FrameRequest, GameEngine, GameOptions, Settings};

    /// Engine plus loop bookkeeping
    struct Game {
        engine: GameEngine<RenderState>,
        /// A requestAnimationFrame callback is pending
        loop_active: bool,
    }

    type Shared = Rc<RefCell<Game>>;

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(id: &str, class: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", class);
        }
    }

    /// Settings named by a `?quality=low|medium|high` query value
    fn settings_from_query() -> Settings {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("quality"));
        let Some(name) = query else {
            return Settings::default();
        };
        Settings::from_preset_name(&name).unwrap_or_else(|| {
            log::warn!("Unknown quality preset '{}', using default", name);
            Settings::default()
        })
    }

    /// Q: step to the next quality preset and redraw
    fn cycle_quality(game: &Shared) {
        let mut g = game.borrow_mut();
        let next = g.engine.settings().quality.next();
        g.engine.set_settings(Settings::from_preset(next));
        log::info!("Quality: {}", next.as_str());
        g.engine.render();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Moon Buggy starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fixed logical resolution; CSS scales the canvas
        canvas.set_width(DEFAULT_WIDTH);
        canvas.set_height(DEFAULT_HEIGHT);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, DEFAULT_WIDTH, DEFAULT_HEIGHT)
            .await
            .expect("Failed to create device");

        let options = GameOptions::default()
            .on_score(|score| set_text("score", &score.to_string()))
            .on_game_over(|| set_class("game-over", ""))
            .on_jump(|| log::debug!("jump"));

        let settings = settings_from_query();
        log::info!("Quality preset: {}", settings.quality.as_str());

        let mut engine = GameEngine::new(render_state, options);
        engine.set_settings(settings);
        // Show the idle scene until the player starts
        engine.render();

        let game = Rc::new(RefCell::new(Game {
            engine,
            loop_active: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }
    }

    /// Schedule frames if the engine asked for them and none are pending
    fn ensure_loop(game: &Shared, request: FrameRequest) {
        let schedule = {
            let mut g = game.borrow_mut();
            let schedule = request == FrameRequest::Continue && !g.loop_active;
            if schedule {
                g.loop_active = true;
            }
            schedule
        };
        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Shared, time: f64) {
        let request = game.borrow_mut().engine.frame(time);
        if request == FrameRequest::Continue {
            request_animation_frame(game);
        } else {
            game.borrow_mut().loop_active = false;
        }
    }

    fn toggle_pause(game: &Shared) {
        let request = {
            let mut g = game.borrow_mut();
            match g.engine.phase() {
                GamePhase::Running => {
                    g.engine.pause();
                    set_class("paused", "");
                    FrameRequest::Stop
                }
                GamePhase::Paused => {
                    set_class("paused", "hidden");
                    g.engine.resume()
                }
                _ => FrameRequest::Stop,
            }
        };
        ensure_loop(game, request);
    }

    /// Enter: start from idle, or start over after a crash
    fn start_or_restart(game: &Shared) {
        let request = {
            let mut g = game.borrow_mut();
            if g.engine.phase() == GamePhase::GameOver {
                g.engine.reset();
                set_class("game-over", "hidden");
            }
            g.engine.start()
        };
        ensure_loop(game, request);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        game.borrow_mut().engine.jump();
                    }
                    "Control" => game.borrow_mut().engine.brake(true),
                    "p" | "P" => toggle_pause(&game),
                    "Enter" => start_or_restart(&game),
                    "q" | "Q" => cycle_quality(&game),
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Control" {
                    game.borrow_mut().engine.brake(false);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap to jump (or start)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let phase = game.borrow().engine.phase();
                match phase {
                    GamePhase::Running => game.borrow_mut().engine.jump(),
                    _ => start_or_restart(&game),
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pause when the tab is hidden or the window loses focus
    fn setup_auto_pause(game: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change
        {
            let game = game.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if doc.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow().engine.is_running()
                {
                    toggle_pause(&game);
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if game.borrow().engine.is_running() {
                    toggle_pause(&game);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Moon Buggy (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    // moon-buggy [--print-tuning] [--quality <low|medium|high>] [--settings <file>] [seed] [tuning-file]
    let mut settings = moon_buggy::Settings::default();
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--print-tuning" => {
                match moon_buggy::Tuning::default().to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => log::error!("Could not serialize tuning: {}", e),
                }
                return;
            }
            "--quality" => match args.next().as_deref().and_then(moon_buggy::QualityPreset::parse) {
                Some(preset) => settings = moon_buggy::Settings::from_preset(preset),
                None => log::warn!("--quality expects low, medium or high"),
            },
            "--settings" => match args.next() {
                Some(path) => settings = load_settings(&path),
                None => log::warn!("--settings expects a file path"),
            },
            _ => positional.push(arg),
        }
    }
    log::info!("Quality preset: {}", settings.quality.as_str());

    let mut positional = positional.into_iter();
    let seed = positional.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = positional.next().map(|path| load_tuning(&path)).unwrap_or_default();

    let score = autopilot::run(seed, tuning, settings, 120.0);
    println!("Autopilot finished with score {}", score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Tuning from a JSON file, falling back to defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> moon_buggy::Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read tuning file {}: {}", path, e);
            return moon_buggy::Tuning::default();
        }
    };
    match moon_buggy::Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Invalid tuning file {}: {}", path, e);
            moon_buggy::Tuning::default()
        }
    }
}

/// Settings from a JSON file, falling back to defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> moon_buggy::Settings {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| moon_buggy::Settings::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path);
            settings
        }
        Err(e) => {
            log::warn!("Could not load settings file {}: {}", path, e);
            moon_buggy::Settings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::cell::Cell;
    use std::rc::Rc;

    use moon_buggy::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_RATE};
    use moon_buggy::renderer::NullSurface;
    use moon_buggy::sim::GamePhase;
    use moon_buggy::{Clock, FrameRequest, GameEngine, GameOptions, ManualClock, Settings, Tuning};

    /// Lead distance in 60 Hz frames of travel before a rock
    const JUMP_LEAD_FRAMES: f32 = 8.0;

    /// Play up to `seconds` of simulated time at 60 fps; returns the final score
    pub fn run(seed: u64, tuning: Tuning, settings: Settings, seconds: f64) -> u64 {
        let clock = ManualClock::new(0.0);
        let jumps = Rc::new(Cell::new(0u32));
        let jump_counter = jumps.clone();
        let options = GameOptions::default()
            .on_game_over(|| log::info!("Autopilot crashed"))
            .on_jump(move || jump_counter.set(jump_counter.get() + 1));

        let mut engine = GameEngine::with_config(
            NullSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            options,
            clock.clone(),
            seed,
            tuning,
            settings,
        );

        let frame_ms = 1000.0 / FRAME_RATE as f64;
        let mut request = engine.start();
        while request == FrameRequest::Continue && clock_secs(&clock) < seconds {
            if rock_ahead(&engine) {
                engine.jump();
            }
            clock.advance(frame_ms);
            request = engine.frame(clock.now_ms());
        }

        let crashed = engine.phase() == GamePhase::GameOver;
        log::info!(
            "Seed {}: score {} after {:.1}s, {} jumps{}",
            seed,
            engine.score(),
            clock_secs(&clock),
            jumps.get(),
            if crashed { ", crashed" } else { "" }
        );
        engine.destroy();
        engine.score()
    }

    fn clock_secs(clock: &ManualClock) -> f64 {
        clock.now_ms() / 1000.0
    }

    /// A rock's leading edge is within jumping range of the buggy's nose
    fn rock_ahead(engine: &GameEngine<NullSurface>) -> bool {
        let state = engine.state();
        let nose = state.buggy.x + state.buggy.width;
        let lead = state.speed * JUMP_LEAD_FRAMES;
        state
            .obstacles
            .iter()
            .any(|o| o.x >= nose && o.x - nose <= lead)
    }
}
