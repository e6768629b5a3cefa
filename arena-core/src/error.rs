//! Error types for arena operations.

use thiserror::Error;

use crate::node::NodeId;

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Errors that can occur in arena operations.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Node handle does not resolve (never existed or already removed).
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("Attaching {child} under {parent} would create a cycle")]
    CycleDetected {
        /// Requested parent.
        parent: NodeId,
        /// Node being attached.
        child: NodeId,
    },

    /// Container slot already holds a different occupant.
    #[error("Slot {slot} is already occupied by {occupant}")]
    SlotOccupied {
        /// The container slot.
        slot: NodeId,
        /// Its current occupant.
        occupant: NodeId,
    },

    /// Scene is not registered with the scene manager.
    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    /// Minion id does not resolve.
    #[error("Minion not found: {0}")]
    MinionNotFound(String),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
