//! Headless surface that keeps what it was asked to draw

use super::commands::{DrawCmd, Palette, Surface};
use crate::error::FatalError;
use crate::sim::Viewport;

#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// Backing store size from the last `configure`
    pub backing: Option<(u32, u32)>,
    /// Transform from the last `configure`
    pub transform: Option<[f64; 6]>,
    /// Commands from the most recent frame
    pub last_frame: Vec<DrawCmd>,
    pub frames_drawn: u64,
    /// When set, `configure` fails with this error
    pub fail_with: Option<FatalError>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn configure(&mut self, viewport: &Viewport) -> Result<(), FatalError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.backing = Some(viewport.backing_size());
        self.transform = Some(viewport.transform());
        Ok(())
    }

    fn draw(&mut self, cmds: &[DrawCmd], _palette: &Palette) {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(cmds);
        self.frames_drawn += 1;
    }
}
