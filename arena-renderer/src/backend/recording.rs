//! Display-list backend for native hosts and tests.
//!
//! Keeps, per layer, the draw calls that are still visible on the simulated
//! surface, and traces every call. An opaque fill covering the whole
//! viewport hides everything under it, so those calls are dropped and the
//! never-cleared base layer stays bounded.

use std::cell::RefCell;
use std::rc::Rc;

use arena_core::{DrawCommand, Layer};
use serde::Serialize;

use crate::{BackendType, RenderResult};

use super::RenderBackend;

/// Shared view of a [`RecordingBackend`]'s surfaces.
pub type RecordingHandle = Rc<RefCell<Recording>>;

/// What the recording backend's surfaces currently show.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recording {
    width: u32,
    height: u32,
    base: Vec<DrawCommand>,
    overlay: Vec<DrawCommand>,
    #[serde(skip)]
    clears: [u64; 2],
    #[serde(skip)]
    draw_calls: u64,
}

impl Recording {
    /// Draw calls visible on a layer, oldest first.
    #[must_use]
    pub fn layer(&self, layer: Layer) -> &[DrawCommand] {
        match layer {
            Layer::Base => &self.base,
            Layer::Overlay => &self.overlay,
        }
    }

    /// Visible text on a layer.
    pub fn texts(&self, layer: Layer) -> impl Iterator<Item = &str> {
        self.layer(layer).iter().filter_map(|c| match c {
            DrawCommand::FillText { text, .. } | DrawCommand::StrokeText { text, .. } => {
                Some(text.as_str())
            }
            _ => None,
        })
    }

    /// How many times a layer was cleared.
    #[must_use]
    pub const fn clears(&self, layer: Layer) -> u64 {
        self.clears[layer_index(layer)]
    }

    /// Draw calls received across both layers.
    #[must_use]
    pub const fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Surface size in pixels.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Serialize the visible surfaces as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn list_mut(&mut self, layer: Layer) -> &mut Vec<DrawCommand> {
        match layer {
            Layer::Base => &mut self.base,
            Layer::Overlay => &mut self.overlay,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn covers_viewport(&self, command: &DrawCommand) -> bool {
        let DrawCommand::FillRect { origin, size, .. } = command else {
            return false;
        };
        origin.x <= 0.0
            && origin.y <= 0.0
            && origin.x + size.width >= self.width as f32
            && origin.y + size.height >= self.height as f32
    }
}

const fn layer_index(layer: Layer) -> usize {
    match layer {
        Layer::Base => 0,
        Layer::Overlay => 1,
    }
}

/// Backend that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    state: RecordingHandle,
}

impl RecordingBackend {
    /// Create a backend with a `width` x `height` surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(Recording {
                width,
                height,
                ..Recording::default()
            })),
        }
    }

    /// Handle for inspecting the surfaces after the backend is boxed.
    #[must_use]
    pub fn handle(&self) -> RecordingHandle {
        Rc::clone(&self.state)
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl RenderBackend for RecordingBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Recording
    }

    fn clear(&mut self, layer: Layer) -> RenderResult<()> {
        let mut state = self.state.borrow_mut();
        state.list_mut(layer).clear();
        state.clears[layer_index(layer)] += 1;
        Ok(())
    }

    fn draw(&mut self, layer: Layer, command: &DrawCommand) -> RenderResult<()> {
        tracing::trace!(?layer, ?command, "draw");
        let mut state = self.state.borrow_mut();
        if state.covers_viewport(command) {
            state.list_mut(layer).clear();
        }
        state.list_mut(layer).push(command.clone());
        state.draw_calls += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
        tracing::debug!("Recording surface resized to {}x{}", width, height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{Color, Point, Size};

    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> DrawCommand {
        DrawCommand::FillRect {
            origin: Point::new(x, y),
            size: Size::new(w, h),
            color: Color::from("red"),
        }
    }

    #[test]
    fn full_viewport_fill_hides_older_calls() {
        let mut backend = RecordingBackend::new(100, 50);
        let handle = backend.handle();
        backend.draw(Layer::Base, &rect(10.0, 10.0, 5.0, 5.0)).unwrap();
        backend.draw(Layer::Base, &rect(0.0, 0.0, 100.0, 50.0)).unwrap();
        backend.draw(Layer::Base, &rect(20.0, 20.0, 5.0, 5.0)).unwrap();

        let recording = handle.borrow();
        assert_eq!(recording.layer(Layer::Base).len(), 2);
        assert_eq!(recording.draw_calls(), 3);
    }

    #[test]
    fn clear_only_touches_one_layer() {
        let mut backend = RecordingBackend::new(100, 50);
        let handle = backend.handle();
        backend.draw(Layer::Base, &rect(1.0, 1.0, 1.0, 1.0)).unwrap();
        backend.draw(Layer::Overlay, &rect(1.0, 1.0, 1.0, 1.0)).unwrap();
        backend.clear(Layer::Overlay).unwrap();

        let recording = handle.borrow();
        assert_eq!(recording.layer(Layer::Base).len(), 1);
        assert!(recording.layer(Layer::Overlay).is_empty());
        assert_eq!(recording.clears(Layer::Overlay), 1);
        assert_eq!(recording.clears(Layer::Base), 0);
    }

    #[test]
    fn resize_changes_the_covering_test() {
        let mut backend = RecordingBackend::new(100, 50);
        let handle = backend.handle();
        backend.resize(200, 50).unwrap();
        backend.draw(Layer::Base, &rect(5.0, 5.0, 1.0, 1.0)).unwrap();
        backend.draw(Layer::Base, &rect(0.0, 0.0, 100.0, 50.0)).unwrap();
        assert_eq!(handle.borrow().layer(Layer::Base).len(), 2);
        assert_eq!(handle.borrow().size(), (200, 50));
    }

    #[test]
    fn snapshot_serializes_visible_calls() {
        let mut backend = RecordingBackend::new(10, 10);
        backend.draw(Layer::Overlay, &rect(1.0, 1.0, 2.0, 2.0)).unwrap();
        let json = backend.handle().borrow().to_json().unwrap();
        assert!(json.contains("fill_rect"));
        assert!(json.contains("\"overlay\""));
    }
}
