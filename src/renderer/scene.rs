//! Frame building: game state in, draw commands out. Never mutates state.

use super::commands::{DrawCmd, Paint};
use crate::sim::{GameState, Rect};
use crate::tuning::Tuning;

/// Font size for the score readout
pub fn score_font_px(width: f32, tuning: &Tuning) -> f32 {
    (width * tuning.score_font_frac)
        .round()
        .max(tuning.score_font_min_px)
}

/// Baseline position of the score readout
pub fn score_position(width: f32, height: f32, tuning: &Tuning) -> (f32, f32) {
    let inset = (width * tuning.score_inset_frac)
        .round()
        .max(tuning.score_inset_min_px);
    let y = (height * tuning.score_baseline_frac).round();
    (width - inset, y)
}

/// Append the commands for the current frame to `out`
pub fn build_frame(state: &GameState, out: &mut Vec<DrawCmd>) {
    let vp = &state.viewport;
    let ground_y = vp.ground_y(&state.tuning);

    out.push(DrawCmd::FillRect {
        rect: Rect::new(0.0, 0.0, vp.width, vp.height),
        paint: Paint::Background,
    });
    out.push(DrawCmd::FillRect {
        rect: Rect::new(0.0, ground_y, vp.width, state.tuning.ground_thickness),
        paint: Paint::Ground,
    });
    out.push(DrawCmd::FillRect {
        rect: state.player.rect(),
        paint: Paint::Player,
    });
    out.extend(state.obstacles.iter().map(|o| DrawCmd::FillRect {
        rect: o.rect(),
        paint: Paint::Obstacle,
    }));

    let (x, y) = score_position(vp.width, vp.height, &state.tuning);
    out.push(DrawCmd::Text {
        text: format!("Score: {}", state.session.score),
        x,
        y,
        font_px: score_font_px(vp.width, &state.tuning),
        paint: Paint::Text,
    });
}
