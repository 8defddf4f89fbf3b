//! Berry Ninja entry point
//!
//! Handles platform-specific initialization and runs the game loop. All
//! gameplay flows through `GameSession`; this file only wires events,
//! time, and the DOM HUD.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent};

    use berry_ninja::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use berry_ninja::persistence::LocalStorageStore;
    use berry_ninja::session::GameSession;
    use berry_ninja::settings::Settings;
    use berry_ninja::sim::GamePhase;

    type Session = GameSession<LocalStorageStore>;

    /// Shared loop state: the session plus frame timing
    struct Host {
        session: Session,
        last_time: f64,
        canvas_size: (f32, f32),
    }

    impl Host {
        fn new(seed: u64) -> Self {
            Self {
                session: Session::new(seed, Settings::load(), LocalStorageStore::new()),
                last_time: 0.0,
                canvas_size: (PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            }
        }

        fn set_canvas_size(&mut self, w: f32, h: f32) {
            if w > 0.0 && h > 0.0 {
                self.canvas_size = (w, h);
            }
        }

        /// Map canvas client coordinates to playfield coordinates
        fn to_playfield(&self, x: f32, y: f32) -> (f32, f32) {
            (
                x * PLAYFIELD_WIDTH / self.canvas_size.0,
                y * PLAYFIELD_HEIGHT / self.canvas_size.1,
            )
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Berry Ninja starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let host = Rc::new(RefCell::new(Host::new(seed)));
        host.borrow_mut()
            .set_canvas_size(canvas.client_width() as f32, canvas.client_height() as f32);

        log::info!("Session initialized with seed: {}", seed);

        setup_input_handlers(&canvas, host.clone());
        setup_restart_button(host.clone());

        request_animation_frame(host);

        log::info!("Berry Ninja running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Pointer move feeds the blade trail
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut h = host.borrow_mut();
                h.set_canvas_size(
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let (x, y) = h.to_playfield(event.offset_x() as f32, event.offset_y() as f32);
                h.session.pointer_moved(x, y, now_ms());
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down starts a stroke (held-blade mode) and doubles as the
        // restart gesture once the run has ended
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut h = host.borrow_mut();
                h.session.pointer_pressed();
                if h.session.state().phase == GamePhase::GameOver {
                    h.session.request_restart();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up ends the stroke
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                host.borrow_mut().session.pointer_released();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                host.borrow_mut().session.request_restart();
                log::info!("Restart requested");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();

            let dt = if h.last_time > 0.0 {
                ((time - h.last_time) / 1000.0) as f32
            } else {
                berry_ninja::consts::SIM_DT
            };
            h.last_time = time;

            h.session.frame(dt);
            update_hud(&h.session);
        }

        request_animation_frame(host);
    }

    /// Mirror score/lives/wave/combo into the DOM HUD. Drawing the
    /// playfield itself is the embedding page's renderer's job; it reads
    /// `session.render_frame()` through the wasm boundary.
    fn update_hud(session: &Session) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let frame = session.render_frame();

        if let Some(el) = document
            .query_selector("#hud-score .hud-value")
            .ok()
            .flatten()
        {
            el.set_text_content(Some(&frame.score.to_string()));
        }

        if let Some(el) = document
            .query_selector("#hud-lives .hud-value")
            .ok()
            .flatten()
        {
            el.set_text_content(Some(&frame.lives.to_string()));
        }

        if let Some(el) = document
            .query_selector("#hud-wave .hud-value")
            .ok()
            .flatten()
        {
            el.set_text_content(Some(&frame.wave.to_string()));
        }

        // Combo only shows at 2+
        if let Some(el) = document.get_element_by_id("hud-combo") {
            if frame.combo > 1 {
                let _ = el.set_attribute("class", "hud-item");
                if let Some(val) = document
                    .query_selector("#hud-combo .hud-value")
                    .ok()
                    .flatten()
                {
                    val.set_text_content(Some(&frame.combo.to_string()));
                }
            } else {
                let _ = el.set_attribute("class", "hud-item hidden");
            }
        }

        // Game over overlay with final score and best score
        if let Some(el) = document.get_element_by_id("game-over") {
            if frame.game_over {
                let _ = el.set_attribute("class", "");
                if let Some(score_el) = document.get_element_by_id("final-score") {
                    score_el.set_text_content(Some(&frame.score.to_string()));
                }
                if let Some(best_el) = document.get_element_by_id("best-score") {
                    best_el.set_text_content(Some(&session.profile().high_score.to_string()));
                }
            } else {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use berry_ninja::consts::{PLAYFIELD_WIDTH, SIM_DT};
    use berry_ninja::persistence::MemoryStore;
    use berry_ninja::session::GameSession;
    use berry_ninja::settings::Settings;
    use berry_ninja::sim::GamePhase;

    env_logger::init();
    log::info!("Berry Ninja (native) starting...");

    // Headless demo: sweep the blade across mid-screen for up to 60
    // seconds of sim time and report how the run went. The web build is
    // the real game; this exists to watch the sim behave.
    let mut session = GameSession::new(0xB3B3, Settings::default(), MemoryStore::new());
    let half_width = PLAYFIELD_WIDTH / 2.0;

    for i in 0..(60 * 120) {
        let t = i as f32 * SIM_DT;
        let x = half_width + (half_width - 100.0) * (t * 3.0).sin();
        session.pointer_moved(x, 360.0, f64::from(t) * 1000.0);
        session.frame(SIM_DT);

        if session.state().phase == GamePhase::GameOver {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "Demo finished: score {}, wave {}, lives {}, phase {:?}",
        state.score,
        state.wave_index + 1,
        state.lives,
        state.phase
    );
    println!(
        "final score {} (best {})",
        state.score,
        session.profile().high_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
