//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per displayed frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;
pub mod viewport;

pub use collision::{Rect, overlaps};
pub use input::{Intent, IntentEffect, apply_intent};
pub use state::{GameEvent, GamePhase, GameState, Obstacle, Player, Session};
pub use tick::{TickOutcome, first_collision, step_physics, tick};
pub use viewport::Viewport;
