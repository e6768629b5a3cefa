//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while presenting a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No suitable rendering backend available.
    #[error("No rendering backend available: {0}")]
    NoBackend(String),

    /// The drawing surface could not be acquired or resized.
    #[error("Surface error: {0}")]
    Surface(String),

    /// A draw call was rejected by the backend.
    #[error("Frame render failed: {0}")]
    Frame(String),

    /// A recorded frame could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
