//! Loop driver
//!
//! Owns the game state, the drawing surface and the frame schedule. Each
//! frame: apply queued host events, tick, forward events, render, then ask
//! for the next frame. `stop` releases everything `start` acquired.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::FatalError;
use crate::platform::{
    EventQueue, FrameHandle, FrameScheduler, HostEvent, HostMetrics, ManualScheduler,
    Subscription, clock_seed,
};
use crate::renderer::{Renderer, Surface};
use crate::sim::{
    GameEvent, GameState, Intent, IntentEffect, TickOutcome, Viewport, apply_intent, tick,
};
use crate::tuning::GameConfig;

/// Callbacks into the host
pub struct HostHooks {
    /// The player asked to close the game. Tearing down is up to the host.
    pub on_close: Box<dyn FnMut()>,
    /// Score changed (including the reset to 0 on restart)
    pub on_score: Box<dyn FnMut(u32)>,
}

impl Default for HostHooks {
    fn default() -> Self {
        Self {
            on_close: Box::new(|| {}),
            on_score: Box::new(|_| {}),
        }
    }
}

impl HostHooks {
    /// Mirror every score change into `score` before `on_score` runs, so the
    /// host can read the score without touching the driver mid-frame
    pub fn tracking_score(mut self, score: Rc<Cell<u32>>) -> Self {
        let mut on_score = self.on_score;
        self.on_score = Box::new(move |s| {
            score.set(s);
            on_score(s);
        });
        self
    }
}

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Callback arrived after `stop` or without a pending request; ignored
    Stale,
    Ran(TickOutcome),
}

pub struct LoopDriver<S: Surface, F: FrameScheduler> {
    state: GameState,
    renderer: Renderer,
    surface: S,
    scheduler: F,
    events: EventQueue,
    hooks: HostHooks,
    subscriptions: Vec<Subscription>,
    pending: Option<FrameHandle>,
    stopped: bool,
}

impl<S: Surface, F: FrameScheduler> LoopDriver<S, F> {
    /// Configure the surface, build a fresh run and schedule the first frame.
    ///
    /// Fails without scheduling anything if the surface cannot be set up.
    pub fn start(
        mut surface: S,
        scheduler: F,
        config: GameConfig,
        metrics: HostMetrics,
        hooks: HostHooks,
    ) -> Result<Self, FatalError> {
        let viewport = Viewport::from_host(metrics.width, metrics.device_pixel_ratio, &config.tuning);
        surface.configure(&viewport)?;

        let seed = config.seed.unwrap_or_else(clock_seed);
        let state = GameState::new(seed, viewport, config.tuning);
        log::info!(
            "Game started with seed {} ({}x{} @{}x)",
            seed,
            viewport.width,
            viewport.height,
            viewport.scale_factor
        );

        let mut driver = Self {
            state,
            renderer: Renderer::new(config.palette),
            surface,
            scheduler,
            events: EventQueue::new(),
            hooks,
            subscriptions: Vec::new(),
            pending: None,
            stopped: false,
        };
        driver.schedule();
        Ok(driver)
    }

    /// Queue the host's listeners push into
    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    /// Keep a listener registered until `stop`. Released immediately if
    /// the driver is already stopped.
    pub fn hold(&mut self, subscription: Subscription) {
        if !self.stopped {
            self.subscriptions.push(subscription);
        }
    }

    /// Run one frame
    pub fn on_frame(&mut self) -> FrameOutcome {
        if self.stopped || self.pending.take().is_none() {
            log::trace!("Ignoring stale frame");
            return FrameOutcome::Stale;
        }

        self.apply_host_events();
        let outcome = tick(&mut self.state);
        self.forward_game_events();
        self.renderer.render(&self.state, &mut self.surface);
        self.schedule();
        FrameOutcome::Ran(outcome)
    }

    /// Cancel the next frame and release every listener. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        let released = self.subscriptions.len();
        self.subscriptions.clear();
        self.events.clear();
        log::info!(
            "Game stopped at score {} ({} listeners released)",
            self.state.score(),
            released
        );
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn schedule(&mut self) {
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            log::warn!("Host refused a frame callback; loop halted");
        }
    }

    fn apply_host_events(&mut self) {
        for event in self.events.drain() {
            match event {
                HostEvent::Key(code) => {
                    if let Some(intent) = Intent::from_key(&code) {
                        self.apply(intent);
                    }
                }
                HostEvent::PointerDown => self.apply(Intent::from_pointer()),
                HostEvent::Resize(metrics) => self.resize(metrics),
            }
        }
    }

    fn apply(&mut self, intent: Intent) {
        if apply_intent(&mut self.state, intent) == IntentEffect::CloseRequested {
            (self.hooks.on_close)();
        }
    }

    fn resize(&mut self, metrics: HostMetrics) {
        let viewport = Viewport::from_host(
            metrics.width,
            metrics.device_pixel_ratio,
            &self.state.tuning,
        );
        if viewport == self.state.viewport {
            return;
        }
        if let Err(e) = self.surface.configure(&viewport) {
            log::error!("Failed to reconfigure surface on resize, keeping previous viewport: {e}");
            return;
        }
        self.state.resize(viewport);
    }

    fn forward_game_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Scored { score } | GameEvent::GameOver { score } => {
                    (self.hooks.on_score)(score)
                }
                GameEvent::Restarted => (self.hooks.on_score)(0),
                GameEvent::Spawned { .. } => {}
            }
        }
    }
}

impl<S: Surface> LoopDriver<S, ManualScheduler> {
    /// Fire the oldest pending frame, as a display refresh would
    pub fn pump(&mut self) -> FrameOutcome {
        match self.scheduler.fire() {
            Some(_) => self.on_frame(),
            None => FrameOutcome::Stale,
        }
    }
}

impl<S: Surface, F: FrameScheduler> Drop for LoopDriver<S, F> {
    fn drop(&mut self) {
        self.stop();
    }
}
