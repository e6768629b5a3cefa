//! # Minion Arena Renderer
//!
//! Presents the per-frame display lists produced by
//! [`arena_core::Session::render`] onto two stacked surfaces.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Overlay: cleared, then drawn every frame    │  dragged token, popovers
//! ├─────────────────────────────────────────────┤
//! │ Base: drawn over, never cleared             │  scene background, slots
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            RenderBackend Trait              │
//! ├──────────────────────┬──────────────────────┤
//! │ Canvas2D             │ Recording            │
//! │ (browser, `wasm`)    │ (native, tests)      │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;

pub use backend::recording::{Recording, RecordingBackend, RecordingHandle};
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};

use arena_core::{FrameLayers, Layer};

/// Configuration for the compositor.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Preferred backend (will fall back if unavailable).
    pub preferred_backend: BackendType,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Element id of the base canvas (browser only).
    pub base_canvas_id: String,
    /// Element id of the overlay canvas (browser only).
    pub overlay_canvas_id: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Canvas2D,
            width: 1280,
            height: 720,
            base_canvas_id: "base".to_string(),
            overlay_canvas_id: "overlay".to_string(),
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Two browser 2D canvases.
    Canvas2D,
    /// In-memory display lists.
    Recording,
}

/// Layered frame presenter.
pub struct Compositor {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("backend", &self.backend.backend_type())
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Create a compositor with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable backend is available.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        let backend = Self::create_backend(&config)?;
        Ok(Self::with_backend(backend, config))
    }

    /// Create a compositor around an existing backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn RenderBackend>, config: RendererConfig) -> Self {
        Self {
            config,
            backend,
            frame_count: 0,
        }
    }

    /// Create the appropriate backend based on config and availability.
    fn create_backend(config: &RendererConfig) -> RenderResult<Box<dyn RenderBackend>> {
        match config.preferred_backend {
            BackendType::Canvas2D => {
                #[cfg(feature = "wasm")]
                {
                    match backend::canvas2d::Canvas2DBackend::from_ids(
                        &config.base_canvas_id,
                        &config.overlay_canvas_id,
                    ) {
                        Ok(b) => return Ok(Box::new(b)),
                        Err(e) => {
                            tracing::warn!("2D canvas unavailable, falling back: {}", e);
                        }
                    }
                }
                Self::create_backend(&RendererConfig {
                    preferred_backend: BackendType::Recording,
                    ..config.clone()
                })
            }
            BackendType::Recording => Ok(Box::new(RecordingBackend::new(
                config.width,
                config.height,
            ))),
        }
    }

    /// Present one frame: the base list is drawn over what the base surface
    /// already shows, the overlay surface is cleared before its list is
    /// drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if a draw call fails. The frame counter is not
    /// advanced in that case.
    pub fn present(&mut self, frame: &FrameLayers) -> RenderResult<()> {
        for command in frame.base.commands() {
            self.backend.draw(Layer::Base, command)?;
        }
        self.backend.clear(Layer::Overlay)?;
        for command in frame.overlay.commands() {
            self.backend.draw(Layer::Overlay, command)?;
        }
        self.frame_count += 1;
        tracing::trace!(
            frame = self.frame_count,
            base = frame.base.len(),
            overlay = frame.overlay.len(),
            "presented"
        );
        Ok(())
    }

    /// Get the number of presented frames.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the compositor configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.config.width = width;
        self.config.height = height;
        self.backend.resize(width, height)
    }
}

/// Renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
