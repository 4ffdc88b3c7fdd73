//! Tower Rush entry point
//!
//! Handles platform-specific initialization and runs the frame loop. The
//! loop is the external driver the simulation needs: measure dt, call
//! `step`, then hand the state to the renderer and HUD. Opening the page
//! with `#race` starts the timed race variant instead of free-roam.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use serde::Serialize;
    use tower_rush::BestScore;
    use tower_rush::CameraRig;
    use tower_rush::sim::{FrameInput, GameMode, GameState, StepEvent, step};

    /// How long a flash notification stays visible (ms)
    const FLASH_MS: f64 = 900.0;

    /// Held-key state, sampled into a `FrameInput` every frame
    #[derive(Default)]
    struct Held {
        forward: bool,
        back: bool,
        left: bool,
        right: bool,
        jump: bool,
        sprint: bool,
        restart: bool,
    }

    impl Held {
        fn sample(&mut self) -> FrameInput {
            let input = FrameInput {
                move_x: (self.right as i8 - self.left as i8) as f32,
                move_z: (self.back as i8 - self.forward as i8) as f32,
                jump: self.jump,
                sprint: self.sprint,
                restart: self.restart,
            };
            // Restart is a one-shot, not a held action
            self.restart = false;
            input
        }
    }

    /// Game instance holding all host-side state
    struct Game {
        state: GameState,
        camera: CameraRig,
        best: BestScore,
        held: Held,
        last_time: f64,
        flash_until: f64,
    }

    impl Game {
        fn new(seed: u64, mode: GameMode) -> Self {
            let mut state = match mode {
                GameMode::FreeRoam => GameState::new_free_roam(seed),
                GameMode::Race => GameState::new_race(seed),
            };
            let best = BestScore::load();
            // Seed the session bests from the persisted record
            state.best_height = best.best_height;
            state.best_time = best.best_time;
            Self {
                state,
                camera: CameraRig::default(),
                best,
                held: Held::default(),
                last_time: 0.0,
                flash_until: 0.0,
            }
        }

        /// One frame: step the simulation, then apply side effects
        fn update(&mut self, dt: f32, now: f64) {
            let input = self.held.sample();
            let events = step(&mut self.state, &input, dt);

            for event in events {
                match event {
                    StepEvent::EventStarted(kind) => self.flash(kind.label(), now),
                    StepEvent::Knockback => self.flash("KNOCKED BACK", now),
                    StepEvent::AuraCollected { total } => {
                        log::debug!("aura collected ({total})");
                    }
                    StepEvent::NewBestHeight(height) => {
                        if self.best.record_height(height) {
                            self.best.save();
                        }
                    }
                    StepEvent::Fell { .. } => {
                        self.best.save();
                        self.flash("YOU FELL. PRESS R", now);
                    }
                    StepEvent::Finished { time, new_best } => {
                        if new_best {
                            self.best.record_time(time);
                            self.best.save();
                            self.flash(&format!("FINISHED {time:.2}s - NEW BEST"), now);
                        } else {
                            self.flash(&format!("FINISHED {time:.2}s"), now);
                        }
                    }
                    StepEvent::Restarted => self.flash("RESTART", now),
                }
            }

            self.camera.follow(self.state.player.pos);
        }

        fn flash(&mut self, text: &str, now: f64) {
            self.flash_until = now + FLASH_MS;
            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(el) = document.get_element_by_id("flash") {
                el.set_text_content(Some(text));
                let _ = el.set_attribute("class", "on");
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, now: f64) {
            let document = web_sys::window().unwrap().document().unwrap();

            match self.state.mode {
                GameMode::FreeRoam => {
                    if let Some(el) = document.get_element_by_id("height") {
                        el.set_text_content(Some(&format!("{:.1}", self.state.current_height())));
                    }
                    if let Some(el) = document.get_element_by_id("best") {
                        el.set_text_content(Some(&format!("{:.1}", self.state.best_height)));
                    }
                    if let Some(el) = document.get_element_by_id("aura") {
                        el.set_text_content(Some(&self.state.aura.to_string()));
                    }
                }
                GameMode::Race => {
                    if let Some(el) = document.get_element_by_id("time") {
                        el.set_text_content(Some(&format!("{:.2}", self.state.run_time)));
                    }
                    if let Some(el) = document.get_element_by_id("best") {
                        let text = match self.state.best_time {
                            Some(t) => format!("{t:.2}"),
                            None => "--".to_string(),
                        };
                        el.set_text_content(Some(&text));
                    }
                }
            }

            // Expire the flash notification
            if now > self.flash_until {
                if let Some(el) = document.get_element_by_id("flash") {
                    let _ = el.set_attribute("class", "");
                }
            }
        }

        /// Hand the frame snapshot to the page's renderer, if one is
        /// installed (`window.__towerRushRender = (json) => {...}`)
        fn render(&self) {
            let window = web_sys::window().unwrap();
            let Ok(callback) =
                js_sys::Reflect::get(&window, &JsValue::from_str("__towerRushRender"))
            else {
                return;
            };
            let Some(callback) = callback.dyn_ref::<js_sys::Function>() else {
                return;
            };
            if let Ok(json) = serde_json::to_string(&Snapshot::capture(self)) {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
            }
        }
    }

    /// Per-frame world description for the external renderer: positions and
    /// a small set of per-object flags, nothing engine-specific
    #[derive(Serialize)]
    struct Snapshot {
        player: [f32; 3],
        camera: [f32; 3],
        look_at: [f32; 3],
        platforms: Vec<PlatformView>,
        hazards: Vec<SpinView>,
        pickups: Vec<SpinView>,
        goal: Option<[f32; 3]>,
    }

    #[derive(Serialize)]
    struct PlatformView {
        pos: [f32; 3],
        half_x: f32,
        half_z: f32,
        opacity: f32,
    }

    #[derive(Serialize)]
    struct SpinView {
        pos: [f32; 3],
        angle: f32,
    }

    impl Snapshot {
        fn capture(game: &Game) -> Self {
            let state = &game.state;
            let elapsed = state.elapsed;
            Self {
                player: state.player.pos.to_array(),
                camera: game.camera.pos.to_array(),
                look_at: game.camera.look_target(state.player.pos).to_array(),
                platforms: state
                    .platforms
                    .iter()
                    .map(|p| PlatformView {
                        pos: p.position().to_array(),
                        half_x: p.half_x,
                        half_z: p.half_z,
                        opacity: p.opacity(elapsed),
                    })
                    .collect(),
                hazards: state
                    .hazards
                    .iter()
                    .map(|h| SpinView {
                        pos: h.pos.to_array(),
                        angle: h.angle,
                    })
                    .collect(),
                pickups: state
                    .pickups
                    .iter()
                    .map(|p| SpinView {
                        pos: p.pos.to_array(),
                        angle: p.angle,
                    })
                    .collect(),
                goal: state.goal.as_ref().map(|g| g.pos.to_array()),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tower Rush starting...");

        let window = web_sys::window().expect("no window");

        // `#race` selects the timed race variant
        let mode = match window.location().hash().as_deref() {
            Ok("#race") => GameMode::Race,
            _ => GameMode::FreeRoam,
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, mode)));
        log::info!("Mode {mode:?}, seed {seed}");

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Tower Rush running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => g.held.forward = true,
                    "KeyS" | "ArrowDown" => g.held.back = true,
                    "KeyA" | "ArrowLeft" => g.held.left = true,
                    "KeyD" | "ArrowRight" => g.held.right = true,
                    "Space" => g.held.jump = true,
                    "ShiftLeft" | "ShiftRight" => g.held.sprint = true,
                    "KeyR" => g.held.restart = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => g.held.forward = false,
                    "KeyS" | "ArrowDown" => g.held.back = false,
                    "KeyA" | "ArrowLeft" => g.held.left = false,
                    "KeyD" | "ArrowRight" => g.held.right = false,
                    "Space" => g.held.jump = false,
                    "ShiftLeft" | "ShiftRight" => g.held.sprint = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Measured wall-clock dt; step clamps it
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tower_rush::sim::{FrameInput, GameState, StepEvent, step};

    env_logger::init();
    log::info!("Tower Rush (native) starting headless demo...");

    // Free-roam: hold forward and hop for ten simulated seconds
    let mut state = GameState::new_free_roam(42);
    let dt = 1.0 / 60.0;
    for frame in 0..600 {
        let input = FrameInput {
            move_z: -1.0,
            jump: frame % 40 == 0,
            ..Default::default()
        };
        for event in step(&mut state, &input, dt) {
            match event {
                StepEvent::EventStarted(kind) => log::info!("event: {}", kind.label()),
                StepEvent::Fell { best } => log::info!("fell (best {best:.1}m)"),
                StepEvent::AuraCollected { total } => log::info!("aura x{total}"),
                _ => {}
            }
        }
    }
    println!(
        "free-roam: height {:.1}m, best {:.1}m, aura {}",
        state.current_height(),
        state.best_height,
        state.aura
    );

    // Race: same script against the handcrafted course
    let mut race = GameState::new_race(42);
    for frame in 0..1200 {
        let input = FrameInput {
            move_z: -1.0,
            sprint: true,
            jump: frame % 30 == 0,
            ..Default::default()
        };
        for event in step(&mut race, &input, dt) {
            if let StepEvent::Finished { time, .. } = event {
                log::info!("finished in {time:.2}s");
            }
        }
        if race.finished {
            break;
        }
    }
    println!(
        "race: time {:.2}s, finished {}",
        race.run_time, race.finished
    );
}
