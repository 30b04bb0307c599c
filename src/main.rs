//! Block Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use block_breaker::audio::{AudioManager, SoundEffect};
    use block_breaker::highscores::format_date;
    use block_breaker::renderer::{RenderState, build_scene};
    use block_breaker::sim::{GameEvent, GameState, PaddleMove, Screen, StepClock, TickInput};
    use block_breaker::{HighScores, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        high_scores: HighScores,
        clock: StepClock,
        last_time: f64,
        input: TickInput,
        /// Rank of the last finished run on the leaderboard
        last_rank: Option<usize>,
        leaderboard_dirty: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let high_scores = HighScores::load();
            let mut state = GameState::new(seed, Tuning::default());
            state.high_score = high_scores.top_score().unwrap_or(0);

            Self {
                state,
                render_state: None,
                audio: AudioManager::new(&settings),
                settings,
                high_scores,
                clock: StepClock::new(),
                last_time: 0.0,
                input: TickInput::default(),
                last_rank: None,
                leaderboard_dirty: true,
            }
        }

        /// Run simulation steps for `dt_ms` of real time
        fn update(&mut self, dt_ms: f32) {
            self.clock.advance(&mut self.state, dt_ms, &mut self.input);

            for event in self.state.drain_events() {
                self.handle_event(&event);
            }
            self.audio.update_music();
        }

        fn handle_event(&mut self, event: &GameEvent) {
            self.audio.play_event(event);
            match *event {
                GameEvent::GameOver { score, stage } => {
                    self.last_rank = self.high_scores.add_score(score, stage, js_sys::Date::now());
                    if let Some(rank) = self.last_rank {
                        log::info!("Score {score} placed #{rank} on the leaderboard");
                        self.high_scores.save();
                        if rank == 1 {
                            self.audio.play(SoundEffect::HighScore);
                        }
                    }
                    self.leaderboard_dirty = true;
                }
                GameEvent::ScreenChanged(screen) => log::debug!("Screen: {screen:?}"),
                _ => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.apply_settings(&self.settings);
            if muted {
                self.audio.stop_music();
            } else {
                self.audio.start_music();
            }
            self.settings.save();
            log::info!("Muted: {muted}");
        }

        /// Update overlay elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let screen = self.state.screen;
            let playing = matches!(screen, Screen::Play | Screen::StageClear);

            set_visible(&document, "title-screen", screen == Screen::Title);
            set_visible(&document, "game-over", screen == Screen::GameOver);
            set_visible(&document, "stage-clear", screen == Screen::StageClear);
            set_visible(&document, "hud", playing && self.settings.show_hud);
            set_visible(&document, "prompt", !playing && self.state.prompt_visible);

            set_text(&document, "hud-stage", &self.state.stage.to_string());
            set_text(&document, "hud-score", &self.state.score.to_string());
            set_text(&document, "stage-clear-number", &self.state.stage.to_string());

            if screen == Screen::GameOver {
                set_text(&document, "final-score", &self.state.score.to_string());
                set_text(&document, "best-score", &self.state.high_score.to_string());
                set_visible(&document, "new-best", self.last_rank == Some(1));
            }

            if self.leaderboard_dirty {
                self.leaderboard_dirty = false;
                if let Some(el) = document.get_element_by_id("leaderboard") {
                    let rows: String = self
                        .high_scores
                        .entries
                        .iter()
                        .enumerate()
                        .map(|(i, e)| {
                            format!(
                                "<li><span>#{}</span> <span>{}</span> \
                                 <span>stage {}</span> <span>{}</span></li>",
                                i + 1,
                                e.score,
                                e.stage,
                                format_date(e.timestamp)
                            )
                        })
                        .collect();
                    el.set_inner_html(&rows);
                }
            }
        }
    }

    /// Toggle only the `hidden` class, keeping the element's layout classes
    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Block Breaker starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match init_renderer(&instance, canvas, width, height).await {
            Some(render_state) => game.borrow_mut().render_state = Some(render_state),
            None => log::error!("Rendering unavailable; the game runs without a picture"),
        }

        setup_input_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Block Breaker running!");
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Option<RenderState> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| log::error!("Failed to create surface: {e}"))
            .ok()?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| log::error!("Failed to get adapter: {e}"))
            .ok()?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| log::error!("Failed to create device: {e}"))
            .ok()
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();

                // Browsers only allow audio after a user gesture
                g.audio.resume();
                if !g.audio.is_music_playing() && !g.settings.muted {
                    g.audio.start_music();
                }

                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        g.input.confirm = true;
                    }
                    "ArrowLeft" => {
                        event.prevent_default();
                        g.input.paddle_moves.push(PaddleMove::Left);
                    }
                    "ArrowRight" => {
                        event.prevent_default();
                        g.input.paddle_moves.push(PaddleMove::Right);
                    }
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "m" | "M" => g.toggle_mute(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drop pending real time while the tab is hidden
        if let Some(document) = window.document() {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                    let mut g = game.borrow_mut();
                    g.last_time = 0.0;
                    g.clock.reset();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
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
    log::info!("Block Breaker (native) starting...");
    log::info!("Native mode runs a headless autoplay demo");
    log::info!("Run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let steps = args.next().and_then(|s| s.parse().ok()).unwrap_or(20_000);

    let tuning = match std::env::var("BLOCK_BREAKER_TUNING") {
        Ok(path) => load_tuning(&path),
        Err(_) => block_breaker::Tuning::default(),
    };

    autoplay(seed, steps, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Read a tuning file, falling back to defaults on any problem
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> block_breaker::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| block_breaker::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {path}: {e}");
            block_breaker::Tuning::default()
        }
    }
}

/// Let the autopilot play and report what happened
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64, steps: u64, tuning: block_breaker::Tuning) {
    use block_breaker::HighScores;
    use block_breaker::sim::{GameEvent, GameState, TickInput, tick};

    let mut state = GameState::new(seed, tuning);
    let mut high_scores = HighScores::new();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut simulated_ms = 0.0_f64;
    let mut blocks = 0_u64;

    for _ in 0..steps {
        simulated_ms += state.step_interval_ms() as f64;
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::BlockDestroyed { .. } => blocks += 1,
                GameEvent::GameOver { score, stage } => {
                    let rank = high_scores.add_score(score, stage, simulated_ms);
                    log::info!("Run over: score {score}, stage {stage}, rank {rank:?}");
                }
                _ => {}
            }
        }
    }

    println!(
        "Autoplay: {steps} steps (~{:.1}s game time), {blocks} blocks broken, best score {}",
        simulated_ms / 1000.0,
        high_scores.top_score().unwrap_or(state.score)
    );
}
