//! Viewport sizing
//!
//! Derives the logical canvas size from the host window width and keeps a
//! device-pixel scale so rendering stays crisp on high-density displays.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Logical canvas size plus device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Logical width (pixels)
    pub width: f32,
    /// Logical height (pixels)
    pub height: f32,
    /// Device pixels per logical pixel (>= 1)
    pub scale_factor: f32,
}

impl Viewport {
    /// Compute the viewport for a host window of the given width.
    ///
    /// Degenerate input (zero, negative, NaN, infinite) is clamped to the
    /// minimum width rather than rejected.
    pub fn from_host(host_width: f32, device_pixel_ratio: f32, tuning: &Tuning) -> Self {
        let available = if host_width.is_finite() {
            host_width - tuning.host_padding
        } else {
            log::warn!("Non-finite host width {host_width}, using minimum viewport");
            tuning.min_width
        };
        if available <= 0.0 {
            log::warn!("Host width {host_width} leaves no room, clamping viewport");
        }

        let width = available.clamp(tuning.min_width, tuning.max_width);
        let height = (width * tuning.aspect).round().max(tuning.min_height);

        let scale_factor = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.max(1.0)
        } else {
            1.0
        };

        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Top of the ground band; nothing may extend below this line
    #[inline]
    pub fn ground_y(&self, tuning: &Tuning) -> f32 {
        self.height - tuning.ground_thickness
    }

    /// Player side length for this width
    #[inline]
    pub fn player_size(&self, tuning: &Tuning) -> f32 {
        (self.width * tuning.player_frac).round().max(tuning.player_min_px)
    }

    /// Player's fixed horizontal position for this width
    #[inline]
    pub fn player_x(&self, tuning: &Tuning) -> f32 {
        (self.width * tuning.player_frac).round()
    }

    /// Backing store size in device pixels
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.scale_factor).round() as u32,
            (self.height * self.scale_factor).round() as u32,
        )
    }

    /// 2D affine transform `[a, b, c, d, e, f]` mapping logical to device pixels
    pub fn transform(&self) -> [f64; 6] {
        let s = f64::from(self.scale_factor);
        [s, 0.0, 0.0, s, 0.0, 0.0]
    }
}
