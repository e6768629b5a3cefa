//! Input events, typed handler tables and hit-test dispatch.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::node::NodeId;
use crate::surface::Layer;
use crate::tree::TreeHost;

/// Every event kind a node can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer moved.
    PointerMove,
    /// Primary button (pick up, drop, press).
    PrimaryInteract,
    /// Secondary button (info popover).
    SecondaryInteract,
    /// Scene became active.
    Activate,
    /// A countdown expired.
    Timer,
}

/// Event delivered to a handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Kind of event.
    pub kind: EventKind,
    /// Pointer position in base-surface coordinates.
    pub point: Point,
    /// Node whose handler is running.
    pub target: NodeId,
}

/// Shared event handler with identity.
///
/// Two handlers are equal only if they are clones of the same handler, which
/// is what makes duplicate registration detectable.
pub struct Handler<C>(Rc<dyn Fn(&mut C, &Event)>);

impl<C> Handler<C> {
    /// Wrap a closure.
    pub fn new(handler: impl Fn(&mut C, &Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invoke the handler.
    pub fn call(&self, host: &mut C, event: &Event) {
        (self.0)(host, event);
    }
}

impl<C> Clone for Handler<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C> PartialEq for Handler<C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Ordered handlers per event kind.
pub struct HandlerTable<C> {
    by_kind: HashMap<EventKind, Vec<Handler<C>>>,
}

impl<C> Default for HandlerTable<C> {
    fn default() -> Self {
        Self {
            by_kind: HashMap::new(),
        }
    }
}

impl<C> HandlerTable<C> {
    /// Append `handler` for `kind`. Returns `false` if it was already there.
    pub fn register(&mut self, kind: EventKind, handler: Handler<C>) -> bool {
        let list = self.by_kind.entry(kind).or_default();
        if list.contains(&handler) {
            return false;
        }
        list.push(handler);
        true
    }

    /// Remove `handler` for `kind`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, kind: EventKind, handler: &Handler<C>) -> bool {
        let Some(list) = self.by_kind.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|h| h != handler);
        before != list.len()
    }

    /// Handlers for `kind` in registration order.
    #[must_use]
    pub fn get(&self, kind: EventKind) -> &[Handler<C>] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Raw input kinds delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    /// Pointer moved.
    PointerMove,
    /// Primary click.
    Primary,
    /// Secondary click.
    Secondary,
}

impl Input {
    /// Event kind dispatched for this input.
    #[must_use]
    pub const fn event_kind(self) -> EventKind {
        match self {
            Self::PointerMove => EventKind::PointerMove,
            Self::Primary => EventKind::PrimaryInteract,
            Self::Secondary => EventKind::SecondaryInteract,
        }
    }
}

/// An input record from the host's input-capture layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Input kind.
    pub kind: Input,
    /// Position in base-surface coordinates.
    pub point: Point,
}

impl InputEvent {
    /// Pointer moved to `(x, y)`.
    #[must_use]
    pub const fn pointer_move(x: f32, y: f32) -> Self {
        Self {
            kind: Input::PointerMove,
            point: Point::new(x, y),
        }
    }

    /// Primary click at `(x, y)`.
    #[must_use]
    pub const fn primary(x: f32, y: f32) -> Self {
        Self {
            kind: Input::Primary,
            point: Point::new(x, y),
        }
    }

    /// Secondary click at `(x, y)`.
    #[must_use]
    pub const fn secondary(x: f32, y: f32) -> Self {
        Self {
            kind: Input::Secondary,
            point: Point::new(x, y),
        }
    }
}

/// Run the handlers of every node under `point`, topmost first.
///
/// Nodes on [`Layer::Overlay`] come before every base-layer node. Within a
/// layer, nodes are located in pre-order and visited in reverse, so the node
/// drawn last sees the event first. A node removed by an earlier handler is
/// skipped. Returns the number of handlers invoked.
pub fn dispatch<C: TreeHost>(host: &mut C, root: NodeId, kind: EventKind, point: Point) -> usize {
    let mut targets = host.tree().locate(root, point);
    targets.reverse();
    let tree = host.tree();
    targets.sort_by_key(|&id| tree.resolve_layer(id) != Layer::Overlay);
    let mut invoked = 0;
    for &target in &targets {
        invoked += run_handlers(host, target, kind, point);
    }
    tracing::trace!(?kind, x = point.x, y = point.y, hits = targets.len(), invoked, "dispatch");
    invoked
}

/// Run the handlers for `kind` of every node under `root` in pre-order,
/// regardless of position. Used for lifecycle events.
pub fn broadcast<C: TreeHost>(host: &mut C, root: NodeId, kind: EventKind, point: Point) -> usize {
    let targets = host.tree().descendants(root);
    let mut invoked = 0;
    for target in targets {
        invoked += run_handlers(host, target, kind, point);
    }
    tracing::trace!(?kind, invoked, "broadcast");
    invoked
}

fn run_handlers<C: TreeHost>(host: &mut C, target: NodeId, kind: EventKind, point: Point) -> usize {
    let handlers = match host.tree().get(target) {
        Some(node) => node.handlers.get(kind).to_vec(),
        None => return 0,
    };
    let event = Event {
        kind,
        point,
        target,
    };
    for handler in &handlers {
        handler.call(host, &event);
    }
    handlers.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_a_noop() {
        let mut table: HandlerTable<()> = HandlerTable::default();
        let h = Handler::new(|_: &mut (), _: &Event| {});
        assert!(table.register(EventKind::PrimaryInteract, h.clone()));
        assert!(!table.register(EventKind::PrimaryInteract, h.clone()));
        assert_eq!(table.get(EventKind::PrimaryInteract).len(), 1);
        // Same handler under another kind is a separate registration.
        assert!(table.register(EventKind::SecondaryInteract, h));
    }

    #[test]
    fn distinct_closures_are_distinct_handlers() {
        let mut table: HandlerTable<()> = HandlerTable::default();
        table.register(EventKind::Timer, Handler::new(|_: &mut (), _: &Event| {}));
        table.register(EventKind::Timer, Handler::new(|_: &mut (), _: &Event| {}));
        assert_eq!(table.get(EventKind::Timer).len(), 2);
    }

    #[test]
    fn unregister_absent_handler_is_a_noop() {
        let mut table: HandlerTable<()> = HandlerTable::default();
        let h = Handler::new(|_: &mut (), _: &Event| {});
        assert!(!table.unregister(EventKind::Activate, &h));
        table.register(EventKind::Activate, h.clone());
        assert!(table.unregister(EventKind::Activate, &h));
        assert!(table.get(EventKind::Activate).is_empty());
    }
}
