//! Rendering backend implementations.

#[cfg(feature = "wasm")]
pub mod canvas2d;
pub mod recording;

use arena_core::{DrawCommand, Layer};

use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
///
/// A backend owns one persistent surface per [`Layer`]. Nothing is cleared
/// unless [`RenderBackend::clear`] is called.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Erase one layer's surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is unavailable.
    fn clear(&mut self, layer: Layer) -> RenderResult<()>;

    /// Replay one draw call onto a layer's surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the draw call fails.
    fn draw(&mut self, layer: Layer, command: &DrawCommand) -> RenderResult<()>;

    /// Resize the rendering surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;
}
