//! Renderer strategies.
//!
//! A node holds at most one renderer. Renderers read the node (screen
//! location, size, text, payload) and the host context, then append draw
//! calls to the surface of the node's resolved layer. Composite renderers in
//! [`widgets`] are built from the primitives here and pass offsets
//! explicitly, so rendering never mutates the tree.

pub mod widgets;

use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;

use crate::geometry::{Point, Size};
use crate::node::SceneNode;
use crate::surface::{Color, DrawCommand, DrawSurface, TextStyle};

/// Draw behavior attached to a node.
pub trait Renderer<C>: fmt::Debug {
    /// Draw `node` onto `surface`.
    fn render(&self, host: &C, node: &SceneNode<C>, surface: &mut dyn DrawSurface);
}

/// Filled and/or outlined rectangle covering the node's box.
#[derive(Debug, Clone, Default)]
pub struct RectRenderer {
    /// Fill color.
    pub fill: Option<Color>,
    /// Outline color and line width.
    pub stroke: Option<(Color, f32)>,
}

impl RectRenderer {
    /// Solid rectangle.
    #[must_use]
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Outline only.
    #[must_use]
    pub fn outlined(color: Color, line_width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some((color, line_width)),
        }
    }

    /// Add an outline.
    #[must_use]
    pub fn with_stroke(mut self, color: Color, line_width: f32) -> Self {
        self.stroke = Some((color, line_width));
        self
    }

    /// Draw at an explicit position.
    pub fn paint(&self, surface: &mut dyn DrawSurface, origin: Point, size: Size) {
        if let Some(fill) = &self.fill {
            surface.fill_rect(origin, size, fill);
        }
        if let Some((color, width)) = &self.stroke {
            surface.stroke_rect(origin, size, color, *width);
        }
    }
}

impl<C> Renderer<C> for RectRenderer {
    fn render(&self, _host: &C, node: &SceneNode<C>, surface: &mut dyn DrawSurface) {
        self.paint(surface, node.screen_location(), node.size);
    }
}

/// Solid fill of a scene root's box.
#[derive(Debug, Clone)]
pub struct BackgroundRenderer {
    /// Fill color.
    pub color: Color,
}

impl BackgroundRenderer {
    /// Background of the given color.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl<C> Renderer<C> for BackgroundRenderer {
    fn render(&self, _host: &C, node: &SceneNode<C>, surface: &mut dyn DrawSurface) {
        surface.fill_rect(node.screen_location(), node.size, &self.color);
    }
}

/// The node's text at its screen location.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    /// Font and placement.
    pub style: TextStyle,
    /// Optional outline drawn after the fill.
    pub outline: Option<Color>,
}

impl TextRenderer {
    /// Text renderer with the given style.
    #[must_use]
    pub fn new(style: TextStyle) -> Self {
        Self {
            style,
            outline: None,
        }
    }

    /// Draw `text` anchored at an explicit position.
    pub fn paint(&self, surface: &mut dyn DrawSurface, at: Point, text: &str) {
        surface.fill_text(text, at, &self.style);
        if let Some(outline) = &self.outline {
            let mut style = self.style.clone();
            style.color = outline.clone();
            surface.draw(DrawCommand::StrokeText {
                text: text.to_string(),
                at,
                style,
            });
        }
    }
}

impl<C> Renderer<C> for TextRenderer {
    fn render(&self, _host: &C, node: &SceneNode<C>, surface: &mut dyn DrawSurface) {
        if let Some(text) = &node.text {
            self.paint(surface, node.screen_location(), text);
        }
    }
}

/// Circle segment inscribed in the node's box.
///
/// Angles are radians, clockwise, starting at `start_angle`; the default
/// starts at twelve o'clock and sweeps a full turn.
#[derive(Debug, Clone)]
pub struct ArcRenderer {
    /// Fill color (pie slice).
    pub fill: Option<Color>,
    /// Outline color and width.
    pub stroke: Option<(Color, f32)>,
    /// Start angle.
    pub start_angle: f32,
    /// Angle covered.
    pub sweep: f32,
}

impl Default for ArcRenderer {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            start_angle: -FRAC_PI_2,
            sweep: TAU,
        }
    }
}

impl ArcRenderer {
    /// Filled full circle.
    #[must_use]
    pub fn disc(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// Same arc with a different sweep.
    #[must_use]
    pub fn with_sweep(mut self, sweep: f32) -> Self {
        self.sweep = sweep;
        self
    }

    /// Draw around an explicit center.
    pub fn paint(&self, surface: &mut dyn DrawSurface, center: Point, radius: f32) {
        if self.sweep <= 0.0 {
            return;
        }
        let end_angle = self.start_angle + self.sweep;
        if let Some(color) = &self.fill {
            surface.draw(DrawCommand::FillArc {
                center,
                radius,
                start_angle: self.start_angle,
                end_angle,
                color: color.clone(),
            });
        }
        if let Some((color, line_width)) = &self.stroke {
            surface.draw(DrawCommand::StrokeArc {
                center,
                radius,
                start_angle: self.start_angle,
                end_angle,
                color: color.clone(),
                line_width: *line_width,
            });
        }
    }
}

impl<C> Renderer<C> for ArcRenderer {
    fn render(&self, _host: &C, node: &SceneNode<C>, surface: &mut dyn DrawSurface) {
        let center = node.screen_location() + node.size.center();
        let radius = node.size.width.min(node.size.height) / 2.0;
        self.paint(surface, center, radius);
    }
}
