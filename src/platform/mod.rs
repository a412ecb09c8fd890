//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web, manual when headless)
//! - Input and resize events, queued and applied between ticks
//! - Listener lifetimes

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::ManualScheduler;

/// Host window measurements used to size the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostMetrics {
    /// Available window width (CSS pixels)
    pub width: f32,
    pub device_pixel_ratio: f32,
}

/// Raw event from the host, before intent mapping
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Key press, by `KeyboardEvent.code`
    Key(String),
    /// Pointer press on the drawing surface
    PointerDown,
    Resize(HostMetrics),
}

/// Shared FIFO the host's listeners push into; drained once per frame
#[derive(Debug, Clone, Default)]
pub struct EventQueue(Rc<RefCell<VecDeque<HostEvent>>>);

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: HostEvent) {
        self.0.borrow_mut().push_back(event);
    }

    pub fn drain(&self) -> Vec<HostEvent> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Opaque id of a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Schedules one callback per display refresh
pub trait FrameScheduler {
    /// Ask for the next frame. `None` if the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a frame that has not run yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A registered listener; dropping it unregisters
#[must_use = "dropping a Subscription unregisters it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Seed derived from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed derived from the wall clock
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
