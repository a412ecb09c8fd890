//! Dino Dash - an endless-runner obstacle jumping game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (viewport, physics, spawning, collisions, session)
//! - `renderer`: Draw-command frames and drawing surfaces (Canvas2D on web)
//! - `platform`: Browser/headless platform abstraction
//! - `driver`: Frame loop tying input, simulation and rendering together
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use driver::{FrameOutcome, HostHooks, LoopDriver};
pub use error::{ConfigError, FatalError};
pub use tuning::{GameConfig, Tuning};

#[cfg(target_arch = "wasm32")]
pub use platform::web::DinoGame;
