//! Headless frame scheduler for tests and the native binary

use super::{FrameHandle, FrameScheduler};

/// Records frame requests; the caller decides when a frame "fires"
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    /// Requested and not yet cancelled
    pub pending: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub requests: u64,
    /// Refuse every request (simulates a host without frame callbacks)
    pub refuse: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest pending frame, as the display would when it fires
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse {
            return None;
        }
        self.next_id += 1;
        self.requests += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }
}
