//! Dino Dash entry point
//!
//! On the web this wires the demo page to a [`WebGame`]. Natively it plays a
//! seeded headless session with a simple autopilot and prints a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement};

    use dino_dash::GameConfig;
    use dino_dash::platform::web::WebGame;

    const CANVAS_ID: &str = "game-canvas";
    const TITLE_ID: &str = "game-title";

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn show_game(game: &Rc<RefCell<WebGame>>, visible: bool) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Err(e) = game.borrow_mut().set_visible(visible) {
            log::error!("Failed to toggle game: {e}");
            return;
        }
        set_hidden(&document, "game-overlay", !visible);
        set_hidden(&document, "play-btn", visible);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dino Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let accent = document
            .get_element_by_id(TITLE_ID)
            .and_then(|el| el.get_attribute("data-accent"));
        let config = GameConfig {
            accent,
            ..Default::default()
        };
        let game = Rc::new(RefCell::new(WebGame::new(
            CANVAS_ID,
            Some(TITLE_ID.to_string()),
            config,
        )));

        // Escape hides the game again; Weak avoids a cycle through the hook
        let weak: Weak<RefCell<WebGame>> = Rc::downgrade(&game);
        game.borrow_mut().set_on_close(move || {
            if let Some(game) = weak.upgrade() {
                show_game(&game, false);
            }
        });

        let score_doc = document.clone();
        game.borrow_mut().set_on_score(move |score| {
            if let Some(el) = score_doc.get_element_by_id("score") {
                el.set_text_content(Some(&score.to_string()));
            }
        });

        if let Some(btn) = document
            .get_element_by_id("play-btn")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                show_game(&game, true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // The page keeps the game for its whole lifetime
        std::mem::forget(game);

        log::info!("Dino Dash ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use dino_dash::platform::HostEvent;
    use dino_dash::sim::GameState;

    /// Ticks of look-ahead before an obstacle reaches the player
    const REACT_TICKS: f32 = 6.0;

    /// Key press the autopilot wants this frame, if any
    pub fn decide(state: &GameState) -> Option<HostEvent> {
        if !state.is_running() {
            return Some(HostEvent::Key("Space".into()));
        }
        if !state.player.grounded {
            return None;
        }
        let front = state.player.pos.x + state.player.size;
        let reach = state.session.speed * REACT_TICKS;
        let threat = state
            .obstacles
            .iter()
            .filter(|o| !o.passed && o.right() >= state.player.pos.x)
            .any(|o| o.pos.x - front <= reach);
        threat.then(|| HostEvent::Key("ArrowUp".into()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dino_dash::platform::{HostMetrics, ManualScheduler};
    use dino_dash::renderer::RecordingSurface;
    use dino_dash::{GameConfig, HostHooks, LoopDriver};
    use serde::Serialize;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default, Serialize)]
    struct Summary {
        seed: u64,
        ticks: u64,
        runs: u32,
        best_score: u32,
        final_score: u32,
        jumps: u32,
        frames_drawn: u64,
    }

    env_logger::init();
    log::info!("Dino Dash (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3000);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let best = Rc::new(RefCell::new(0u32));
    let best_hook = best.clone();
    let hooks = HostHooks {
        on_score: Box::new(move |score| {
            let mut best = best_hook.borrow_mut();
            *best = (*best).max(score);
        }),
        ..Default::default()
    };
    let config = GameConfig {
        seed: Some(seed),
        ..Default::default()
    };
    let metrics = HostMetrics {
        width: 1024.0,
        device_pixel_ratio: 1.0,
    };

    let mut driver = match LoopDriver::start(
        RecordingSurface::new(),
        ManualScheduler::new(),
        config,
        metrics,
        hooks,
    ) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    let events = driver.events();
    let mut summary = Summary {
        seed,
        runs: 1,
        ..Default::default()
    };

    for _ in 0..ticks {
        if let Some(event) = autopilot::decide(driver.state()) {
            if driver.state().is_running() {
                summary.jumps += 1;
            } else {
                summary.runs += 1;
            }
            events.push(event);
        }
        driver.pump();
        summary.ticks += 1;
    }

    summary.final_score = driver.score();
    summary.best_score = *best.borrow();
    summary.frames_drawn = driver.surface().frames_drawn;
    driver.stop();

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize summary: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
