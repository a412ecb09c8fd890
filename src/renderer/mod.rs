//! Rendering module
//!
//! Frames are built as plain draw commands from the game state, then
//! replayed onto whatever [`Surface`] the host provides.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod commands;
pub mod recording;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use commands::{DrawCmd, Paint, Palette, Surface};
pub use recording::RecordingSurface;

use crate::sim::GameState;

/// Reusable frame builder
#[derive(Debug, Default)]
pub struct Renderer {
    pub palette: Palette,
    cmds: Vec<DrawCmd>,
}

impl Renderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            cmds: Vec::new(),
        }
    }

    /// Draw the current state. Reads only.
    pub fn render<S: Surface + ?Sized>(&mut self, state: &GameState, surface: &mut S) {
        self.cmds.clear();
        scene::build_frame(state, &mut self.cmds);
        surface.draw(&self.cmds, &self.palette);
    }
}
