//! Drawing surfaces and the per-frame display list.
//!
//! Renderers never touch a real canvas. They append [`DrawCommand`]s to the
//! [`DrawSurface`] of their resolved [`Layer`]; a backend replays the lists.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};

/// Target drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Base surface, drawn over every frame and never cleared.
    Base,
    /// Always-on-top surface, cleared every frame.
    Overlay,
}

/// CSS-style color string (`"red"`, `"#2f80ed"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Create a color from any CSS color string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The CSS color string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor at the left edge.
    #[default]
    Left,
    /// Anchor at the center.
    Center,
    /// Anchor at the right edge.
    Right,
}

impl TextAlign {
    /// Canvas 2D `textAlign` keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// Anchor at the top of the em box.
    #[default]
    Top,
    /// Anchor at the middle of the em box.
    Middle,
    /// Anchor at the alphabetic baseline.
    Alphabetic,
    /// Anchor at the bottom of the em box.
    Bottom,
}

impl TextBaseline {
    /// Canvas 2D `textBaseline` keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
            Self::Bottom => "bottom",
        }
    }
}

/// Font and placement for a text draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// CSS font shorthand, e.g. `"25px Arial"`.
    pub font: String,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical anchor.
    pub baseline: TextBaseline,
    /// Text color.
    pub color: Color,
}

impl TextStyle {
    /// Create a style with `px` sized text in the given family.
    #[must_use]
    pub fn new(px: u32, family: &str, color: impl Into<Color>) -> Self {
        Self {
            font: format!("{px}px {family}"),
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
            color: color.into(),
        }
    }

    /// Set the alignment.
    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the baseline.
    #[must_use]
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(16, "Arial", "black")
    }
}

/// A primitive draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
#[allow(missing_docs)] // Fields are documented at variant level
pub enum DrawCommand {
    /// Filled axis-aligned rectangle.
    FillRect {
        origin: Point,
        size: Size,
        color: Color,
    },
    /// Outlined axis-aligned rectangle.
    StrokeRect {
        origin: Point,
        size: Size,
        color: Color,
        line_width: f32,
    },
    /// Filled text anchored at `at`.
    FillText {
        text: String,
        at: Point,
        style: TextStyle,
    },
    /// Outlined text anchored at `at`.
    StrokeText {
        text: String,
        at: Point,
        style: TextStyle,
    },
    /// Filled pie slice from `start_angle` to `end_angle` (radians, clockwise).
    FillArc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    },
    /// Arc outline from `start_angle` to `end_angle` (radians, clockwise).
    StrokeArc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
        line_width: f32,
    },
}

/// A surface renderers draw onto.
pub trait DrawSurface {
    /// Append a draw call.
    fn draw(&mut self, command: DrawCommand);

    /// Discard everything drawn so far.
    fn clear(&mut self);

    /// Fill a rectangle.
    fn fill_rect(&mut self, origin: Point, size: Size, color: &Color) {
        self.draw(DrawCommand::FillRect {
            origin,
            size,
            color: color.clone(),
        });
    }

    /// Outline a rectangle.
    fn stroke_rect(&mut self, origin: Point, size: Size, color: &Color, line_width: f32) {
        self.draw(DrawCommand::StrokeRect {
            origin,
            size,
            color: color.clone(),
            line_width,
        });
    }

    /// Fill text.
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.draw(DrawCommand::FillText {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
    }
}

/// Ordered list of draw calls for one layer of one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in draw order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if nothing was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Texts drawn with `FillText`, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for CommandList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Resolves a [`Layer`] to the surface that receives its draw calls.
pub trait SurfaceSet {
    /// The surface for `layer`.
    fn surface(&mut self, layer: Layer) -> &mut dyn DrawSurface;
}

/// Display lists for both layers of one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameLayers {
    /// Base layer draw calls.
    pub base: CommandList,
    /// Overlay layer draw calls.
    pub overlay: CommandList,
}

impl FrameLayers {
    /// Create empty layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access one layer's list.
    #[must_use]
    pub fn layer(&self, layer: Layer) -> &CommandList {
        match layer {
            Layer::Base => &self.base,
            Layer::Overlay => &self.overlay,
        }
    }

    /// Empty both lists for a new frame.
    pub fn clear(&mut self) {
        self.base.clear();
        self.overlay.clear();
    }

    /// Total draw calls across both layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len() + self.overlay.len()
    }

    /// Check if neither layer has draw calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.overlay.is_empty()
    }
}

impl SurfaceSet for FrameLayers {
    fn surface(&mut self, layer: Layer) -> &mut dyn DrawSurface {
        match layer {
            Layer::Base => &mut self.base,
            Layer::Overlay => &mut self.overlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layers_route_by_layer() {
        let mut frame = FrameLayers::new();
        frame
            .surface(Layer::Overlay)
            .fill_rect(Point::ZERO, Size::new(1.0, 1.0), &Color::from("red"));
        assert!(frame.base.is_empty());
        assert_eq!(frame.overlay.len(), 1);
    }

    #[test]
    fn draw_command_serializes_with_op_tag() {
        let cmd = DrawCommand::FillText {
            text: "hi".to_string(),
            at: Point::new(1.0, 2.0),
            style: TextStyle::default(),
        };
        let json = serde_json::to_string(&cmd).expect("serialize");
        assert!(json.contains(r#""op":"fill_text""#));
        assert!(json.contains(r#""color":"black""#));
    }
}
