//! Data-driven game balance
//!
//! Every number the simulation and viewport depend on lives here. The host
//! can pass a partial JSON override; missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::renderer::Palette;

/// Simulation and viewport constants (all lengths in logical pixels, per tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Downward acceleration added to vertical velocity each tick
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_impulse: f32,
    /// Scroll speed at the start of a run
    pub start_speed: f32,
    /// Speed added each time an obstacle is cleared
    pub speed_step: f32,

    // === World ===
    /// Thickness of the ground band at the bottom of the viewport
    pub ground_thickness: f32,
    /// Obstacles are removed once their right edge is this far left of x=0
    pub despawn_margin: f32,
    /// New obstacles appear this far right of the viewport edge
    pub spawn_offset: f32,

    // === Spawner ===
    /// Spawn interval (ticks) at score 0
    pub spawn_interval_base: u64,
    /// Spawn interval never drops below this many ticks
    pub spawn_interval_floor: u64,
    /// Interval shrinks by one tick per this many points
    pub spawn_score_divisor: u32,
    /// Obstacle size range as a fraction of viewport width
    pub obstacle_size_min_frac: f32,
    pub obstacle_size_max_frac: f32,
    /// Smallest obstacle side length
    pub obstacle_min_px: f32,

    // === Viewport ===
    /// Horizontal space left around the canvas inside the host window
    pub host_padding: f32,
    pub min_width: f32,
    pub max_width: f32,
    /// Height as a fraction of width
    pub aspect: f32,
    pub min_height: f32,
    /// Player side length and x position as a fraction of width
    pub player_frac: f32,
    pub player_min_px: f32,

    // === Score readout ===
    /// Font size as a fraction of width, and its floor
    pub score_font_frac: f32,
    pub score_font_min_px: f32,
    /// Distance of the text start from the right edge, as a fraction of width, and its floor
    pub score_inset_frac: f32,
    pub score_inset_min_px: f32,
    /// Baseline as a fraction of height
    pub score_baseline_frac: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.9,
            jump_impulse: -14.0,
            start_speed: 6.0,
            speed_step: 0.08,

            ground_thickness: 10.0,
            despawn_margin: 50.0,
            spawn_offset: 10.0,

            spawn_interval_base: 120,
            spawn_interval_floor: 60,
            spawn_score_divisor: 5,
            obstacle_size_min_frac: 0.02,
            obstacle_size_max_frac: 0.05,
            obstacle_min_px: 12.0,

            host_padding: 40.0,
            min_width: 320.0,
            max_width: 980.0,
            aspect: 0.25,
            min_height: 140.0,
            player_frac: 0.06,
            player_min_px: 28.0,

            score_font_frac: 0.02,
            score_font_min_px: 12.0,
            score_inset_frac: 0.15,
            score_inset_min_px: 100.0,
            score_baseline_frac: 0.15,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("start_speed", self.start_speed),
            ("speed_step", self.speed_step),
            ("ground_thickness", self.ground_thickness),
            ("despawn_margin", self.despawn_margin),
            ("spawn_offset", self.spawn_offset),
            ("obstacle_size_min_frac", self.obstacle_size_min_frac),
            ("obstacle_size_max_frac", self.obstacle_size_max_frac),
            ("obstacle_min_px", self.obstacle_min_px),
            ("host_padding", self.host_padding),
            ("min_width", self.min_width),
            ("max_width", self.max_width),
            ("aspect", self.aspect),
            ("min_height", self.min_height),
            ("player_frac", self.player_frac),
            ("player_min_px", self.player_min_px),
            ("score_font_frac", self.score_font_frac),
            ("score_font_min_px", self.score_font_min_px),
            ("score_inset_frac", self.score_inset_frac),
            ("score_inset_min_px", self.score_inset_min_px),
            ("score_baseline_frac", self.score_baseline_frac),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }

        if self.gravity <= 0.0 {
            return Err(ConfigError::Invalid("gravity must be positive".into()));
        }
        if self.jump_impulse >= 0.0 {
            return Err(ConfigError::Invalid("jump_impulse must be negative".into()));
        }
        if self.start_speed < 0.0 || self.speed_step < 0.0 {
            return Err(ConfigError::Invalid(
                "start_speed and speed_step must not be negative".into(),
            ));
        }
        if self.ground_thickness < 0.0 {
            return Err(ConfigError::Invalid("ground_thickness must not be negative".into()));
        }
        if self.spawn_interval_floor == 0 || self.spawn_score_divisor == 0 {
            return Err(ConfigError::Invalid(
                "spawn_interval_floor and spawn_score_divisor must be at least 1".into(),
            ));
        }
        let (lo, hi) = (self.obstacle_size_min_frac, self.obstacle_size_max_frac);
        if lo < 0.0 || lo > hi || hi > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "obstacle size range [{lo}, {hi}] must lie within [0, 1]"
            )));
        }
        if self.min_width <= 0.0 || self.min_width > self.max_width {
            return Err(ConfigError::Invalid(format!(
                "viewport width range [{}, {}] is invalid",
                self.min_width, self.max_width
            )));
        }
        if self.aspect <= 0.0 || self.min_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "aspect and min_height must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Spawn interval for the given score: shrinks with score, floored
    pub fn spawn_interval(&self, score: u32) -> u64 {
        let shrink = u64::from(score / self.spawn_score_divisor);
        self.spawn_interval_base
            .saturating_sub(shrink)
            .max(self.spawn_interval_floor)
    }
}

/// Everything the host hands to `LoopDriver::start`
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub tuning: Tuning,
    /// RNG seed; the host picks one (wall clock on web) when absent
    pub seed: Option<u64>,
    pub palette: Palette,
    /// Cosmetic accent color for the host's title label
    pub accent: Option<String>,
}
