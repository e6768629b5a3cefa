//! Scene nodes - the building blocks of scenes.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::event::{EventKind, Handler, HandlerTable};
use crate::geometry::{Point, Size};
use crate::model::{MinionId, PlayerId};
use crate::render::Renderer;
use crate::surface::Layer;

/// Generational handle to a node in a [`SceneTree`](crate::tree::SceneTree).
///
/// A handle whose node was removed never resolves again, even after its
/// slot has been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Build a handle from its parts.
    #[must_use]
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

/// What a container slot is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// A player's bench.
    Reserve,
    /// A player's board cell.
    Board,
    /// A player's wide bench inside a draft scene.
    DraftReserve,
    /// Neutral slot holding a newly offered minion.
    Offer,
}

/// Container specialization: holds at most one occupant.
///
/// `occupant` mirrors the node's only child. The tree keeps the two in
/// agreement on every attach and detach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Slot role.
    pub kind: SlotKind,
    /// Owning player; `None` for neutral slots.
    pub owner: Option<PlayerId>,
    /// Whether dragged objects may be dropped here.
    pub droppable: bool,
    pub(crate) occupant: Option<NodeId>,
}

impl Slot {
    /// Create an empty slot.
    #[must_use]
    pub fn new(kind: SlotKind, owner: Option<PlayerId>) -> Self {
        Self {
            kind,
            owner,
            droppable: kind != SlotKind::Offer,
            occupant: None,
        }
    }

    /// Current occupant.
    #[must_use]
    pub fn occupant(&self) -> Option<NodeId> {
        self.occupant
    }

    /// Check if the slot holds something.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Game data a node stands for, read by renderers and handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Payload {
    /// Plain layout or decoration node.
    #[default]
    None,
    /// Token of a minion.
    Minion(MinionId),
    /// A player's card.
    Player(PlayerId),
    /// Info popover for a minion.
    Popover(MinionId),
}

/// Per-frame task run on a node during the update pass.
pub struct UpdateTask<C>(Rc<dyn Fn(&mut C, NodeId)>);

impl<C> UpdateTask<C> {
    /// Wrap a closure.
    pub fn new(task: impl Fn(&mut C, NodeId) + 'static) -> Self {
        Self(Rc::new(task))
    }

    pub(crate) fn run(&self, host: &mut C, node: NodeId) {
        (self.0)(host, node);
    }
}

impl<C> Clone for UpdateTask<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C> fmt::Debug for UpdateTask<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UpdateTask({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// A node of the scene tree.
pub struct SceneNode<C> {
    /// Debug label.
    pub name: String,
    /// Offset from the parent's screen location.
    pub location: Point,
    /// Box size used for hit-testing and drawing.
    pub size: Size,
    /// Text content for text-bearing renderers.
    pub text: Option<String>,
    /// Layer override inherited by the subtree.
    pub layer: Option<Layer>,
    /// Game data this node represents.
    pub payload: Payload,
    pub(crate) slot: Option<Slot>,
    pub(crate) screen_location: Point,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) renderer: Option<Rc<dyn Renderer<C>>>,
    pub(crate) tasks: Vec<UpdateTask<C>>,
    pub(crate) handlers: HandlerTable<C>,
}

impl<C> SceneNode<C> {
    /// Create a detached node at the origin with zero size.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: Point::ZERO,
            size: Size::default(),
            text: None,
            layer: None,
            payload: Payload::None,
            slot: None,
            screen_location: Point::ZERO,
            parent: None,
            children: Vec::new(),
            renderer: None,
            tasks: Vec::new(),
            handlers: HandlerTable::default(),
        }
    }

    /// Set the local offset.
    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.location = Point::new(x, y);
        self
    }

    /// Set the size.
    #[must_use]
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set the renderer strategy.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Renderer<C> + 'static) -> Self {
        self.renderer = Some(Rc::new(renderer));
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Override the layer for this subtree.
    #[must_use]
    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Make this node a container slot.
    #[must_use]
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Register a per-frame task.
    #[must_use]
    pub fn with_task(mut self, task: UpdateTask<C>) -> Self {
        self.tasks.push(task);
        self
    }

    /// Register a handler before the node is inserted.
    #[must_use]
    pub fn with_handler(mut self, kind: EventKind, handler: Handler<C>) -> Self {
        self.handlers.register(kind, handler);
        self
    }

    /// Container specialization. Occupancy changes only through
    /// [`SceneTree::attach`] and [`SceneTree::detach`].
    ///
    /// [`SceneTree::attach`]: crate::tree::SceneTree::attach
    /// [`SceneTree::detach`]: crate::tree::SceneTree::detach
    #[must_use]
    pub fn slot(&self) -> Option<&Slot> {
        self.slot.as_ref()
    }

    /// Absolute position computed by the last layout or render pass.
    #[must_use]
    pub fn screen_location(&self) -> Point {
        self.screen_location
    }

    /// Owning parent.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in draw order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Replace the renderer strategy.
    pub fn set_renderer(&mut self, renderer: impl Renderer<C> + 'static) {
        self.renderer = Some(Rc::new(renderer));
    }

    /// Check if any handler is registered for `kind`.
    #[must_use]
    pub fn handles(&self, kind: EventKind) -> bool {
        !self.handlers.get(kind).is_empty()
    }
}

impl<C> fmt::Debug for SceneNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("size", &self.size)
            .field("screen_location", &self.screen_location)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("layer", &self.layer)
            .field("payload", &self.payload)
            .field("slot", &self.slot)
            .field("has_renderer", &self.renderer.is_some())
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}
