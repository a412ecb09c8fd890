//! Browser host (wasm32)
//!
//! Mounts the game on a canvas while visible: requestAnimationFrame drives
//! the loop, DOM listeners feed the event queue, and everything is released
//! again on unmount.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, Window};

use super::{EventQueue, FrameHandle, FrameScheduler, HostEvent, HostMetrics, Subscription};
use crate::driver::{HostHooks, LoopDriver};
use crate::error::FatalError;
use crate::renderer::CanvasSurface;
use crate::tuning::{GameConfig, Tuning};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type WebDriver = LoopDriver<CanvasSurface, RafScheduler>;

/// requestAnimationFrame with a single shared callback
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {e:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

/// Current window size for viewport computation
pub fn host_metrics(window: &Window) -> HostMetrics {
    let width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0);
    HostMetrics {
        width: width as f32,
        device_pixel_ratio: window.device_pixel_ratio() as f32,
    }
}

/// Register a DOM listener; the returned guard removes it
pub fn listen(
    target: &EventTarget,
    name: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Subscription, FatalError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        .map_err(|e| FatalError::Host(format!("{name} listener ({e:?})")))?;

    let target = target.clone();
    Ok(Subscription::new(move || {
        let _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
    }))
}

/// A running game on one canvas
struct Mounted {
    driver: Rc<RefCell<WebDriver>>,
    frame_callback: FrameCallback,
}

impl Mounted {
    fn new(canvas: HtmlCanvasElement, config: GameConfig, hooks: HostHooks) -> Result<Self, FatalError> {
        let window = web_sys::window().ok_or_else(|| FatalError::Host("window".into()))?;
        let surface = CanvasSurface::new(canvas.clone())?;

        // The frame callback needs the driver, which needs the scheduler
        let slot: Rc<RefCell<Weak<RefCell<WebDriver>>>> = Rc::new(RefCell::new(Weak::new()));
        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        {
            let slot = slot.clone();
            *frame_callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
                let driver = slot.borrow().upgrade();
                if let Some(driver) = driver {
                    driver.borrow_mut().on_frame();
                }
            }));
        }

        let scheduler = RafScheduler {
            window: window.clone(),
            callback: frame_callback.clone(),
        };
        let driver = LoopDriver::start(surface, scheduler, config, host_metrics(&window), hooks)?;
        let driver = Rc::new(RefCell::new(driver));
        *slot.borrow_mut() = Rc::downgrade(&driver);

        let mounted = Self {
            driver,
            frame_callback,
        };
        mounted.attach_listeners(&window, &canvas)?;
        Ok(mounted)
    }

    fn attach_listeners(&self, window: &Window, canvas: &HtmlCanvasElement) -> Result<(), FatalError> {
        let events: EventQueue = self.driver.borrow().events();

        let keys = {
            let events = events.clone();
            listen(window, "keydown", move |event| {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                    events.push(HostEvent::Key(key.code()));
                }
            })?
        };
        let pointer = {
            let events = events.clone();
            listen(canvas, "mousedown", move |_event| {
                events.push(HostEvent::PointerDown);
            })?
        };
        let resize = {
            let window_for_metrics = window.clone();
            listen(window, "resize", move |_event| {
                events.push(HostEvent::Resize(host_metrics(&window_for_metrics)));
            })?
        };

        let mut driver = self.driver.borrow_mut();
        driver.hold(keys);
        driver.hold(pointer);
        driver.hold(resize);
        Ok(())
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        if let Ok(mut driver) = self.driver.try_borrow_mut() {
            driver.stop();
        } else {
            log::error!("Unmount during a frame; teardown deferred to drop");
        }
        self.frame_callback.borrow_mut().take();
    }
}

/// Host-facing game: mounts while visible, unmounts when hidden
pub struct WebGame {
    canvas_id: String,
    title_id: Option<String>,
    config: GameConfig,
    on_close: Rc<dyn Fn()>,
    on_score: Rc<dyn Fn(u32)>,
    score: Rc<Cell<u32>>,
    mounted: Option<Mounted>,
}

impl WebGame {
    pub fn new(canvas_id: &str, title_id: Option<String>, config: GameConfig) -> Self {
        Self {
            canvas_id: canvas_id.to_string(),
            title_id,
            config,
            on_close: Rc::new(|| {}),
            on_score: Rc::new(|_| {}),
            score: Rc::new(Cell::new(0)),
            mounted: None,
        }
    }

    pub fn set_on_close(&mut self, f: impl Fn() + 'static) {
        self.on_close = Rc::new(f);
    }

    pub fn set_on_score(&mut self, f: impl Fn(u32) + 'static) {
        self.on_score = Rc::new(f);
    }

    pub fn is_visible(&self) -> bool {
        self.mounted.is_some()
    }

    /// Last score reported by the running game. Safe to call from `on_score`.
    pub fn score(&self) -> u32 {
        self.score.get()
    }

    /// Mount on `true`, tear down on `false`. Repeated calls are no-ops.
    pub fn set_visible(&mut self, visible: bool) -> Result<(), FatalError> {
        match (visible, self.mounted.is_some()) {
            (true, false) => {
                self.mounted = Some(self.mount()?);
                log::info!("Game mounted on #{}", self.canvas_id);
            }
            (false, true) => {
                self.mounted = None;
                log::info!("Game unmounted from #{}", self.canvas_id);
            }
            _ => {}
        }
        Ok(())
    }

    fn mount(&self) -> Result<Mounted, FatalError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| FatalError::Host("document".into()))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(&self.canvas_id)
            .ok_or_else(|| FatalError::Host(format!("#{}", self.canvas_id)))?
            .dyn_into()
            .map_err(|_| FatalError::Host(format!("canvas #{}", self.canvas_id)))?;

        if let (Some(title_id), Some(accent)) = (&self.title_id, &self.config.accent) {
            if let Some(title) = document
                .get_element_by_id(title_id)
                .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
            {
                let _ = title.style().set_property("color", accent);
            }
        }

        self.score.set(0);
        Mounted::new(canvas, self.config.clone(), self.hooks())
    }

    fn hooks(&self) -> HostHooks {
        let on_close = self.on_close.clone();
        let on_score = self.on_score.clone();
        HostHooks {
            // Runs after the current frame returns so the host may unmount
            on_close: Box::new(move || {
                let on_close = on_close.clone();
                wasm_bindgen_futures::spawn_local(async move { on_close() });
            }),
            on_score: Box::new(move |s| on_score(s)),
        }
        .tracking_score(self.score.clone())
    }
}

/// JavaScript handle around [`WebGame`]
#[wasm_bindgen]
pub struct DinoGame {
    inner: Rc<RefCell<WebGame>>,
}

#[wasm_bindgen]
impl DinoGame {
    /// `tuning` is an optional JSON override of the game balance
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        title_id: Option<String>,
        accent: Option<String>,
        tuning: Option<String>,
    ) -> Result<DinoGame, JsValue> {
        let tuning = match tuning {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        let config = GameConfig {
            tuning,
            accent,
            ..Default::default()
        };
        Ok(Self {
            inner: Rc::new(RefCell::new(WebGame::new(canvas_id, title_id, config))),
        })
    }

    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&self, visible: bool) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .set_visible(visible)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = onClose)]
    pub fn on_close(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().set_on_close(move || {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::warn!("onClose threw: {e:?}");
            }
        });
    }

    #[wasm_bindgen(js_name = onScore)]
    pub fn on_score(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().set_on_score(move |score| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from(score)) {
                log::warn!("onScore threw: {e:?}");
            }
        });
    }

    pub fn score(&self) -> u32 {
        self.inner.borrow().score()
    }

    pub fn visible(&self) -> bool {
        self.inner.borrow().is_visible()
    }
}
