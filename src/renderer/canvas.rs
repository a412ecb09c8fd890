//! Canvas 2D backend (wasm32)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::commands::{DrawCmd, Palette, Surface};
use crate::error::FatalError;
use crate::sim::Viewport;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap a canvas element. Fails if it cannot hand out a 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, FatalError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| FatalError::NoContext)?
            .ok_or(FatalError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FatalError::NoContext)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn configure(&mut self, viewport: &Viewport) -> Result<(), FatalError> {
        let style = self.canvas.style();
        style
            .set_property("width", &format!("{}px", viewport.width))
            .and_then(|_| style.set_property("height", &format!("{}px", viewport.height)))
            .map_err(|e| FatalError::Surface(format!("{e:?}")))?;

        // Resizing the backing store resets the context, so the transform goes last
        let (w, h) = viewport.backing_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);

        let [a, b, c, d, e, f] = viewport.transform();
        self.ctx
            .set_transform(a, b, c, d, e, f)
            .map_err(|e| FatalError::Surface(format!("{e:?}")))
    }

    fn draw(&mut self, cmds: &[DrawCmd], palette: &Palette) {
        for cmd in cmds {
            match cmd {
                DrawCmd::FillRect { rect, paint } => {
                    self.ctx.set_fill_style_str(palette.color(*paint));
                    self.ctx.fill_rect(
                        f64::from(rect.min.x),
                        f64::from(rect.min.y),
                        f64::from(rect.size.x),
                        f64::from(rect.size.y),
                    );
                }
                DrawCmd::Text {
                    text,
                    x,
                    y,
                    font_px,
                    paint,
                } => {
                    self.ctx.set_fill_style_str(palette.color(*paint));
                    self.ctx.set_font(&format!("{font_px}px monospace"));
                    if let Err(e) = self.ctx.fill_text(text, f64::from(*x), f64::from(*y)) {
                        log::warn!("fill_text failed: {e:?}");
                    }
                }
            }
        }
    }
}
