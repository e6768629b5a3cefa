//! Browser backend drawing onto two stacked 2D canvases.
//!
//! The base canvas sits underneath; the overlay canvas is positioned on top
//! of it by the page and receives pointer events.

use arena_core::surface::TextStyle;
use arena_core::{DrawCommand, Layer};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    fn by_id(id: &str) -> RenderResult<Self> {
        let window = web_sys::window().ok_or_else(|| RenderError::NoBackend("No window object".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RenderError::NoBackend("No document object".into()))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| RenderError::Surface(format!("Canvas element '{id}' not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RenderError::Surface(format!("Element '{id}' is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| RenderError::Surface("Failed to get 2D context".into()))?
            .ok_or_else(|| RenderError::Surface("2D context not available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::Surface("Failed to cast to 2D context".into()))?;
        Ok(Self { canvas, ctx })
    }

    fn apply_text_style(&self, style: &TextStyle) {
        self.ctx.set_font(&style.font);
        self.ctx.set_text_align(style.align.as_css());
        self.ctx.set_text_baseline(style.baseline.as_css());
    }
}

fn frame_error(e: &JsValue) -> RenderError {
    RenderError::Frame(format!("{e:?}"))
}

/// Two-canvas 2D backend.
pub struct Canvas2DBackend {
    base: Surface,
    overlay: Surface,
}

impl Canvas2DBackend {
    /// Bind to the canvases with the given element ids.
    ///
    /// # Errors
    ///
    /// Returns an error if either element is missing or has no 2D context.
    pub fn from_ids(base_id: &str, overlay_id: &str) -> RenderResult<Self> {
        Ok(Self {
            base: Surface::by_id(base_id)?,
            overlay: Surface::by_id(overlay_id)?,
        })
    }

    fn surface(&self, layer: Layer) -> &Surface {
        match layer {
            Layer::Base => &self.base,
            Layer::Overlay => &self.overlay,
        }
    }
}

impl RenderBackend for Canvas2DBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn clear(&mut self, layer: Layer) -> RenderResult<()> {
        let surface = self.surface(layer);
        surface.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(surface.canvas.width()),
            f64::from(surface.canvas.height()),
        );
        Ok(())
    }

    fn draw(&mut self, layer: Layer, command: &DrawCommand) -> RenderResult<()> {
        tracing::trace!(?layer, ?command, "draw");
        let surface = self.surface(layer);
        let ctx = &surface.ctx;
        match command {
            DrawCommand::FillRect { origin, size, color } => {
                ctx.set_fill_style_str(color.as_str());
                ctx.fill_rect(
                    f64::from(origin.x),
                    f64::from(origin.y),
                    f64::from(size.width),
                    f64::from(size.height),
                );
            }
            DrawCommand::StrokeRect {
                origin,
                size,
                color,
                line_width,
            } => {
                ctx.set_stroke_style_str(color.as_str());
                ctx.set_line_width(f64::from(*line_width));
                ctx.stroke_rect(
                    f64::from(origin.x),
                    f64::from(origin.y),
                    f64::from(size.width),
                    f64::from(size.height),
                );
            }
            DrawCommand::FillText { text, at, style } => {
                surface.apply_text_style(style);
                ctx.set_fill_style_str(style.color.as_str());
                ctx.fill_text(text, f64::from(at.x), f64::from(at.y))
                    .map_err(|e| frame_error(&e))?;
            }
            DrawCommand::StrokeText { text, at, style } => {
                surface.apply_text_style(style);
                ctx.set_stroke_style_str(style.color.as_str());
                ctx.stroke_text(text, f64::from(at.x), f64::from(at.y))
                    .map_err(|e| frame_error(&e))?;
            }
            DrawCommand::FillArc {
                center,
                radius,
                start_angle,
                end_angle,
                color,
            } => {
                ctx.begin_path();
                ctx.move_to(f64::from(center.x), f64::from(center.y));
                ctx.arc(
                    f64::from(center.x),
                    f64::from(center.y),
                    f64::from(*radius),
                    f64::from(*start_angle),
                    f64::from(*end_angle),
                )
                .map_err(|e| frame_error(&e))?;
                ctx.close_path();
                ctx.set_fill_style_str(color.as_str());
                ctx.fill();
            }
            DrawCommand::StrokeArc {
                center,
                radius,
                start_angle,
                end_angle,
                color,
                line_width,
            } => {
                ctx.begin_path();
                ctx.arc(
                    f64::from(center.x),
                    f64::from(center.y),
                    f64::from(*radius),
                    f64::from(*start_angle),
                    f64::from(*end_angle),
                )
                .map_err(|e| frame_error(&e))?;
                ctx.set_stroke_style_str(color.as_str());
                ctx.set_line_width(f64::from(*line_width));
                ctx.stroke();
            }
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        for surface in [&self.base, &self.overlay] {
            surface.canvas.set_width(width);
            surface.canvas.set_height(height);
        }
        tracing::debug!("Canvas2D resized to {}x{}", width, height);
        Ok(())
    }
}
