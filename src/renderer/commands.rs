//! Backend-neutral draw commands

use serde::{Deserialize, Serialize};

use crate::error::FatalError;
use crate::sim::{Rect, Viewport};

/// Which palette entry a command paints with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Background,
    Ground,
    Player,
    Obstacle,
    Text,
}

/// Fill colors (any CSS color string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub ground: String,
    pub player: String,
    pub obstacle: String,
    pub text: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#f7f7f7".into(),
            ground: "#555".into(),
            player: "#222".into(),
            obstacle: "#0b6623".into(),
            text: "#222".into(),
        }
    }
}

impl Palette {
    pub fn color(&self, paint: Paint) -> &str {
        match paint {
            Paint::Background => &self.background,
            Paint::Ground => &self.ground,
            Paint::Player => &self.player,
            Paint::Obstacle => &self.obstacle,
            Paint::Text => &self.text,
        }
    }
}

/// One drawing operation in logical pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    /// Left-aligned text on an alphabetic baseline at (x, y)
    Text {
        text: String,
        x: f32,
        y: f32,
        font_px: f32,
        paint: Paint,
    },
}

/// A 2D drawing target
pub trait Surface {
    /// Size the backing store for the viewport and install the
    /// logical-to-device transform
    fn configure(&mut self, viewport: &Viewport) -> Result<(), FatalError>;

    /// Replay one frame of commands
    fn draw(&mut self, cmds: &[DrawCmd], palette: &Palette);
}
