//! Drag-and-drop re-parenting through the pointer proxy.
//!
//! ```text
//!            pick_up                     drop_into / revert
//!   Idle ───────────────▶ Dragging ─────────────────────────▶ Idle
//! ```
//!
//! While dragging, the object is a child of the pointer proxy so it follows
//! the pointer and draws on the proxy's layer. A per-frame `handled` flag
//! keeps a pick-up and a drop from both firing for the same interaction.

use crate::error::ArenaResult;
use crate::geometry::Point;
use crate::node::{NodeId, Slot};
use crate::tree::SceneTree;

/// Drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Nothing is carried.
    #[default]
    Idle,
    /// `object` hangs under the pointer proxy.
    Dragging {
        /// Carried node.
        object: NodeId,
        /// Local offset to restore on revert.
        return_location: Point,
        /// Owner to restore on revert; `None` if the object was unplaced.
        return_container: Option<NodeId>,
    },
}

/// Result of [`DragController::drop_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing was dragged, or the interaction was already handled.
    Ignored,
    /// The object now occupies an empty target.
    Placed {
        /// Dropped node.
        object: NodeId,
        /// New owner.
        target: NodeId,
    },
    /// The target's previous occupant went to the object's old container.
    Swapped {
        /// Dropped node.
        object: NodeId,
        /// New owner.
        target: NodeId,
        /// Former occupant of `target`.
        displaced: NodeId,
    },
}

/// Drag controller owned by the session.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    handled: bool,
}

impl DragController {
    /// Idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Check if something is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Carried node, if any.
    #[must_use]
    pub const fn dragged(&self) -> Option<NodeId> {
        match self.state {
            DragState::Dragging { object, .. } => Some(object),
            DragState::Idle => None,
        }
    }

    /// Check if the current interaction already picked up or dropped.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        self.handled
    }

    /// Reset the handled flag at the start of a frame.
    pub fn begin_frame(&mut self) {
        self.handled = false;
    }

    /// Reset the handled flag before dispatching a pointer interaction.
    pub fn begin_interaction(&mut self) {
        self.handled = false;
    }

    /// Mark the current interaction handled without moving anything, so
    /// nodes further down the dispatch order ignore it.
    pub fn consume(&mut self) {
        self.handled = true;
    }

    /// Start dragging `object`.
    ///
    /// The object moves under `proxy` with a local offset of
    /// `screen_location - pointer`, so it stays where it was drawn. Returns
    /// `false` without changes if a drag is active or the interaction was
    /// already handled.
    ///
    /// # Errors
    ///
    /// Returns an error if `object` or `proxy` is stale, or if `proxy` lies
    /// inside `object`'s subtree.
    pub fn pick_up<C>(
        &mut self,
        tree: &mut SceneTree<C>,
        object: NodeId,
        proxy: NodeId,
        pointer: Point,
    ) -> ArenaResult<bool> {
        if self.handled || self.is_dragging() {
            return Ok(false);
        }
        let node = tree.node(object)?;
        let return_location = node.location;
        let return_container = node.parent();
        let screen = node.screen_location();

        tree.attach(proxy, object)?;
        tree.set_location(object, screen - pointer);

        self.state = DragState::Dragging {
            object,
            return_location,
            return_container,
        };
        self.handled = true;
        tracing::debug!(%object, ?return_container, "picked up");
        Ok(true)
    }

    /// Drop the carried object into `target`.
    ///
    /// If `target` is a slot holding another node, that node is moved to the
    /// object's return container at the return location first. The object
    /// lands at the target's origin.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle is stale or the move would create a
    /// cycle. The controller is left in the dragging state on error.
    pub fn drop_into<C>(
        &mut self,
        tree: &mut SceneTree<C>,
        target: NodeId,
    ) -> ArenaResult<DropOutcome> {
        let DragState::Dragging {
            object,
            return_location,
            return_container,
        } = self.state
        else {
            return Ok(DropOutcome::Ignored);
        };
        if self.handled {
            return Ok(DropOutcome::Ignored);
        }

        let displaced = tree
            .node(target)?
            .slot
            .as_ref()
            .and_then(Slot::occupant)
            .filter(|&occupant| occupant != object);

        if let Some(displaced) = displaced {
            tree.detach(target, displaced);
            if let Some(home) = return_container {
                tree.attach(home, displaced)?;
            }
            tree.set_location(displaced, return_location);
        }

        tree.attach(target, object)?;
        tree.set_location(object, Point::ZERO);

        self.state = DragState::Idle;
        self.handled = true;

        let outcome = match displaced {
            Some(displaced) => DropOutcome::Swapped {
                object,
                target,
                displaced,
            },
            None => DropOutcome::Placed { object, target },
        };
        tracing::debug!(?outcome, "dropped");
        Ok(outcome)
    }

    /// Put the carried object back where it was picked up.
    ///
    /// Returns the object, or `None` if nothing was being dragged.
    ///
    /// # Errors
    ///
    /// Returns an error if the return container no longer accepts the object.
    pub fn revert<C>(&mut self, tree: &mut SceneTree<C>) -> ArenaResult<Option<NodeId>> {
        let DragState::Dragging {
            object,
            return_location,
            return_container,
        } = self.state
        else {
            return Ok(None);
        };
        self.state = DragState::Idle;

        match return_container {
            Some(home) if tree.contains(home) => tree.attach(home, object)?,
            _ => {
                tree.detach_from_parent(object);
            }
        }
        tree.set_location(object, return_location);
        tracing::debug!(%object, "drag reverted");
        Ok(Some(object))
    }
}
