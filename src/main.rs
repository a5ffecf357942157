//! Flappy Rewards entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

    use flappy_rewards::api::{ApiClient, HttpBackend};
    use flappy_rewards::consts::*;
    use flappy_rewards::renderer::CanvasRenderer;
    use flappy_rewards::sim::{EndCause, RunPhase};
    use flappy_rewards::ui::{self, HudSnapshot};
    use flappy_rewards::{ClientSettings, GameError, SessionController};

    type Controller = SessionController<ApiClient<HttpBackend>>;

    /// Game instance holding all state
    struct Game {
        controller: Controller,
        renderer: Option<CanvasRenderer>,
        accumulator: f32,
        last_time: f64,
        /// Last HUD pushed to the DOM
        last_hud: Option<HudSnapshot>,
    }

    impl Game {
        fn new(settings: &ClientSettings, seed: u64) -> Self {
            let client = ApiClient::new(HttpBackend::new(&settings.base_url), settings.clone());
            Self {
                controller: SessionController::new(client, settings, seed),
                renderer: None,
                accumulator: 0.0,
                last_time: 0.0,
                last_hud: None,
            }
        }

        /// Run simulation ticks. Returns how the run ended, if it did.
        fn update(&mut self, dt: f32) -> Option<EndCause> {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut ended = None;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if let Some(cause) = self.controller.tick() {
                    ended = Some(cause);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            ended
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(ref renderer) = self.renderer {
                let show_entities = self.controller.phase() != RunPhase::Idle;
                if let Err(e) = renderer.render(self.controller.state(), show_entities) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let hud = HudSnapshot::from_controller(&self.controller);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }

            set_text(document, "coinCount", &hud.coin_text);
            set_text(document, "cashValue", &hud.cash_text);
            set_text(document, "coupons", &hud.coupon_text);
            set_text(document, "statusText", hud.status_text);
            set_text(document, "connectionStatus", hud.status_text);
            set_visible(document, "startGameInfo", hud.start_info_visible, "block");
            set_visible(document, "gameOverInfo", hud.game_over_visible, "block");

            if let Some(btn) = button(document, "startGameBtn") {
                btn.set_text_content(Some(hud.start_label));
                btn.set_disabled(!hud.start_enabled);
            }
            if let Some(btn) = button(document, "reviveBtn") {
                btn.set_text_content(Some(hud.revive.label));
                // Stays clickable when locked so the reasons can be shown
                btn.set_disabled(false);
                let _ = btn.set_attribute("aria-disabled", &(!hud.revive.enabled).to_string());
            }
            set_visible(document, "reviveBtn", hud.revive.visible, "inline-block");

            self.last_hud = Some(hud);
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_ARENA_WIDTH as f64) as u32;
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_ARENA_HEIGHT as f64) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            self.controller.resize(width as f32, height as f32);
            if let Some(ref mut renderer) = self.renderer {
                renderer.resize(width, height);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool, display: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el
                .style()
                .set_property("display", if visible { display } else { "none" });
        }
    }

    fn button(document: &Document, id: &str) -> Option<HtmlButtonElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    /// Tell the player why an action did nothing
    fn report_action_error(game: &Game, err: GameError) {
        let ctl = &game.controller;
        match err {
            GameError::NotReady => alert("Please wait for game parameters to load from server..."),
            GameError::NoResumableSession => alert("No session data available to resume"),
            GameError::RevivalUnavailable => alert(&ui::revive_blocked_message(
                ctl.revive_policy(),
                &ctl.store().grant().revival,
            )),
            other => log::warn!("{other}"),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flappy Rewards starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("no document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no #gameCanvas");
            return;
        };

        let settings = ClientSettings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(&settings, seed)));
        log::info!(
            "Game initialized with seed: {} (revive policy: {})",
            seed,
            settings.revive_policy.as_str()
        );

        {
            let mut g = game.borrow_mut();
            match CanvasRenderer::new(&canvas) {
                Ok(renderer) => g.renderer = Some(renderer),
                Err(e) => log::error!("Canvas unavailable: {:?}", e),
            }
            g.resize(&canvas);
            g.controller.request_sync();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas.clone(), game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Flappy Rewards running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let _ = canvas.set_attribute("tabindex", "0");

        // Click = jump
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().controller.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch = jump
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().controller.jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        if let Err(err) = g.controller.primary_action() {
                            report_action_error(&g, err);
                        }
                    }
                    "i" | "I" => {
                        let enabled = !g.controller.autopilot();
                        g.controller.set_autopilot(enabled);
                        log::info!("Autopilot: {}", enabled);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("startGameBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                let result = if g.controller.can_resume() {
                    g.controller.resume()
                } else {
                    g.controller.start()
                };
                if let Err(err) = result {
                    report_action_error(&g, err);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reviveBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if let Err(err) = g.controller.revive() {
                    report_action_error(&g, err);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if let Err(err) = g.controller.restart() {
                    report_action_error(&g, err);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        let ended = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let ended = g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
            ended.and_then(|cause| ui::end_message(cause, g.controller.store().coupons_to_win()))
        };

        // Alert blocks, so it runs with the game unborrowed
        if let Some(message) = ended {
            alert(&message);
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
fn main() -> flappy_rewards::Result<()> {
    use flappy_rewards::api::{ApiClient, MemoryBackend, fallback::fallback_response};
    use flappy_rewards::{ClientSettings, SessionController};

    /// Ten minutes at 60 Hz
    const MAX_TICKS: u32 = 60 * 60 * 10;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Rewards (native) starting...");
    log::info!("Native mode plays one headless autopilot run - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let settings = ClientSettings::load();
    let backend = MemoryBackend::new(fallback_response()?);
    let client = ApiClient::new(backend.clone(), settings.clone());

    let mut controller = SessionController::new(client, &settings, seed);
    controller.set_autopilot(true);
    controller.request_sync();
    controller.apply_pending_sync();
    controller.start()?;

    let mut ticks = 0;
    let cause = loop {
        if let Some(cause) = controller.tick() {
            break Some(cause);
        }
        ticks += 1;
        if ticks >= MAX_TICKS {
            break None;
        }
    };

    let session = &controller.state().session;
    match cause {
        Some(cause) => println!(
            "Run ended after {} ticks: {:?} ({:?})",
            controller.state().time_ticks,
            cause,
            cause.verdict()
        ),
        None => println!("Run still going after {ticks} ticks"),
    }
    println!(
        "score {}  coins {} ({})  coupons {}",
        session.score,
        session.coins,
        flappy_rewards::ui::cash_text(session.coins),
        session.coupons
    );
    println!("session reports sent: {}", backend.sessions().len());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
