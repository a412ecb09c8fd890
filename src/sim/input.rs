//! Input intents
//!
//! Raw key and pointer events are reduced to three intents. The same
//! physical action means "jump" while running and "restart" after a crash.

use super::state::{GamePhase, GameState};

/// Key codes (DOM `KeyboardEvent.code`) that jump or restart
pub const JUMP_KEYS: [&str; 2] = ["Space", "ArrowUp"];
/// Key code that asks the host to close the game
pub const CLOSE_KEY: &str = "Escape";

/// A device-independent player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Jump while running, restart after game over
    Jump,
    /// Ask the host to hide the game
    Close,
}

impl Intent {
    /// Map a keyboard code to an intent
    pub fn from_key(code: &str) -> Option<Self> {
        if JUMP_KEYS.contains(&code) {
            Some(Intent::Jump)
        } else if code == CLOSE_KEY {
            Some(Intent::Close)
        } else {
            None
        }
    }

    /// Pointer presses on the surface only ever jump/restart
    pub fn from_pointer() -> Self {
        Intent::Jump
    }
}

/// What applying an intent did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentEffect {
    Jumped,
    Restarted,
    /// Airborne jump, ignored
    Ignored,
    /// The host's close callback should run; the simulation is untouched
    CloseRequested,
}

/// Apply an intent between ticks
pub fn apply_intent(state: &mut GameState, intent: Intent) -> IntentEffect {
    match (intent, state.phase()) {
        (Intent::Close, _) => {
            log::info!("Close requested");
            IntentEffect::CloseRequested
        }
        (Intent::Jump, GamePhase::GameOver) => {
            state.restart();
            IntentEffect::Restarted
        }
        (Intent::Jump, GamePhase::Running) if state.player.grounded => {
            // grounded flips to false on the next physics step
            state.player.vy = state.tuning.jump_impulse;
            IntentEffect::Jumped
        }
        (Intent::Jump, GamePhase::Running) => IntentEffect::Ignored,
    }
}
