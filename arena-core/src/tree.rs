//! Scene tree: a generational arena of [`SceneNode`]s.
//!
//! Parent and child edges are stored as [`NodeId`] fields, so moving a node
//! between owners is an index update. Every structural edit keeps
//! `child ∈ parent.children ⇔ child.parent == parent` and rejects cycles
//! before touching anything.

use crate::error::{ArenaError, ArenaResult};
use crate::event::{EventKind, Handler};
use crate::geometry::{box_contains, Point};
use crate::model::PlayerId;
use crate::node::{NodeId, SceneNode, Slot, UpdateTask};
use crate::surface::{Layer, SurfaceSet};

/// A context object that owns a scene tree whose handlers, tasks and
/// renderers operate on that same context.
pub trait TreeHost: Sized {
    /// The tree.
    fn tree(&self) -> &SceneTree<Self>;

    /// The tree, mutably.
    fn tree_mut(&mut self) -> &mut SceneTree<Self>;
}

/// Arena of scene nodes addressed by generational handles.
pub struct SceneTree<C> {
    nodes: Vec<Option<SceneNode<C>>>,
    generations: Vec<u32>,
    free_indices: Vec<usize>,
}

impl<C> Default for SceneTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for SceneTree<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneTree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free", &self.free_indices.len())
            .finish()
    }
}

impl<C> SceneTree<C> {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_indices: Vec::new(),
        }
    }

    /// Insert a detached node and return its handle.
    pub fn insert(&mut self, node: SceneNode<C>) -> NodeId {
        if let Some(index) = self.free_indices.pop() {
            self.nodes[index] = Some(node);
            return NodeId::from_parts(Self::to_u32(index), self.generations[index]);
        }
        let index = self.nodes.len();
        self.nodes.push(Some(node));
        self.generations.push(0);
        NodeId::from_parts(Self::to_u32(index), 0)
    }

    fn to_u32(index: usize) -> u32 {
        u32::try_from(index).unwrap_or(u32::MAX)
    }

    fn slot_index(&self, id: NodeId) -> Option<usize> {
        let index = id.index() as usize;
        (index < self.nodes.len() && self.generations[index] == id.generation()).then_some(index)
    }

    /// Get a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode<C>> {
        self.slot_index(id).and_then(|i| self.nodes[i].as_ref())
    }

    /// Get a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode<C>> {
        self.slot_index(id).and_then(|i| self.nodes[i].as_mut())
    }

    /// Get a node or fail with [`ArenaError::NodeNotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if the handle does not resolve.
    pub fn node(&self, id: NodeId) -> ArenaResult<&SceneNode<C>> {
        self.get(id).ok_or(ArenaError::NodeNotFound(id))
    }

    /// Get a node mutably or fail with [`ArenaError::NodeNotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if the handle does not resolve.
    pub fn node_mut(&mut self, id: NodeId) -> ArenaResult<&mut SceneNode<C>> {
        self.get_mut(id).ok_or(ArenaError::NodeNotFound(id))
    }

    /// Check if a handle resolves.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Check if the tree has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Option::is_none)
    }

    /// Owning parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in draw order; empty for unknown handles.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Container specialization of a node.
    #[must_use]
    pub fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.get(id).and_then(|n| n.slot.as_ref())
    }

    /// Check if `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Topmost ancestor of a node (the node itself when detached).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// The child is detached from its current owner first.
    ///
    /// # Errors
    ///
    /// See [`SceneTree::attach_at`].
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> ArenaResult<()> {
        self.attach_at(parent, child, usize::MAX)
    }

    /// Attach `child` under `parent` at position `index` (clamped).
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NodeNotFound`] for stale handles,
    /// [`ArenaError::CycleDetected`] if `child` is `parent` or one of its
    /// ancestors, and [`ArenaError::SlotOccupied`] if `parent` is a container
    /// holding a different node. Nothing is modified on error.
    pub fn attach_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> ArenaResult<()> {
        let target = self.node(parent)?;
        self.node(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(ArenaError::CycleDetected { parent, child });
        }
        if let Some(occupant) = target.slot.as_ref().and_then(Slot::occupant) {
            if occupant != child {
                return Err(ArenaError::SlotOccupied {
                    slot: parent,
                    occupant,
                });
            }
        }

        if let Some(old) = self.parent(child) {
            self.detach(old, child);
        }

        let target = self.node_mut(parent)?;
        let at = index.min(target.children.len());
        target.children.insert(at, child);
        if let Some(slot) = target.slot.as_mut() {
            slot.occupant = Some(child);
        }
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from `parent`. Returns `false` if it was not a child.
    pub fn detach(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(owner) = self.get_mut(parent) else {
            return false;
        };
        let Some(pos) = owner.children.iter().position(|&c| c == child) else {
            return false;
        };
        owner.children.remove(pos);
        if let Some(slot) = owner.slot.as_mut() {
            if slot.occupant == Some(child) {
                slot.occupant = None;
            }
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        true
    }

    /// Detach a node from whatever owns it. Returns the former parent.
    pub fn detach_from_parent(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.parent(child)?;
        self.detach(parent, child);
        Some(parent)
    }

    /// Remove a node and its whole subtree. Returns the number of nodes freed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.detach_from_parent(id);
        let doomed = self.descendants(id);
        for node in &doomed {
            let index = node.index() as usize;
            self.nodes[index] = None;
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.free_indices.push(index);
        }
        doomed.len()
    }

    /// `root` and all its descendants in pre-order.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Nodes under `root` whose box contains `point`, in pre-order.
    ///
    /// Uses the screen locations from the last layout or render pass.
    #[must_use]
    pub fn locate(&self, root: NodeId, point: Point) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| {
                self.get(id)
                    .is_some_and(|n| box_contains(n.screen_location, n.size, point))
            })
            .collect()
    }

    /// Layer a node draws onto: its own override, else the nearest
    /// ancestor's, else [`Layer::Base`].
    #[must_use]
    pub fn resolve_layer(&self, id: NodeId) -> Layer {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            if let Some(layer) = node.layer {
                return layer;
            }
            current = node.parent;
        }
        Layer::Base
    }

    /// Recompute screen locations under `root` without rendering.
    pub fn layout(&mut self, root: NodeId, origin: Point) {
        let Some(node) = self.get_mut(root) else {
            return;
        };
        node.screen_location = node.location + origin;
        let screen = node.screen_location;
        let children = node.children.clone();
        for child in children {
            self.layout(child, screen);
        }
    }

    /// Set a node's local offset. Unknown handles are ignored.
    pub fn set_location(&mut self, id: NodeId, location: Point) {
        if let Some(node) = self.get_mut(id) {
            node.location = location;
        }
    }

    /// Change who owns a slot and whether it accepts drops. The occupant is
    /// untouched. Returns `false` if `id` is not a live slot.
    pub fn set_slot_access(&mut self, id: NodeId, owner: Option<PlayerId>, droppable: bool) -> bool {
        let Some(slot) = self.get_mut(id).and_then(|n| n.slot.as_mut()) else {
            return false;
        };
        slot.owner = owner;
        slot.droppable = droppable;
        true
    }

    /// Set a node's text. Unknown handles are ignored.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.get_mut(id) {
            node.text = Some(text.into());
        }
    }

    /// Register a handler. Returns `false` if it was already registered for
    /// `kind` or the node does not exist.
    pub fn on(&mut self, id: NodeId, kind: EventKind, handler: Handler<C>) -> bool {
        self.get_mut(id)
            .is_some_and(|n| n.handlers.register(kind, handler))
    }

    /// Unregister a handler. Returns `false` if it was not registered.
    pub fn off(&mut self, id: NodeId, kind: EventKind, handler: &Handler<C>) -> bool {
        self.get_mut(id)
            .is_some_and(|n| n.handlers.unregister(kind, handler))
    }

    /// Append a per-frame task to a node.
    pub fn add_task(&mut self, id: NodeId, task: UpdateTask<C>) {
        if let Some(node) = self.get_mut(id) {
            node.tasks.push(task);
        }
    }
}

/// Run update tasks under `id`: the node's tasks in registration order,
/// then each child subtree in child order.
///
/// Nodes removed by an earlier task are skipped.
pub fn update<C: TreeHost>(host: &mut C, id: NodeId) {
    let tasks = match host.tree().get(id) {
        Some(node) => node.tasks.clone(),
        None => return,
    };
    for task in &tasks {
        task.run(host, id);
    }
    let children = host.tree().children(id).to_vec();
    for child in children {
        update(host, child);
    }
}

/// Lay out and draw the subtree under `id` in pre-order.
///
/// Each node's screen location is its local offset plus `origin`; children
/// receive their parent's screen location as origin. Renderers draw onto the
/// surface of the node's resolved layer.
pub fn render<C: TreeHost, S: SurfaceSet + ?Sized>(
    host: &mut C,
    id: NodeId,
    origin: Point,
    surfaces: &mut S,
) {
    let screen = {
        let Some(node) = host.tree_mut().get_mut(id) else {
            return;
        };
        node.screen_location = node.location + origin;
        node.screen_location
    };

    {
        let host: &C = host;
        let tree = host.tree();
        if let Some(node) = tree.get(id) {
            if let Some(renderer) = &node.renderer {
                let layer = tree.resolve_layer(id);
                renderer.render(host, node, surfaces.surface(layer));
            }
        }
    }

    let children = host.tree().children(id).to_vec();
    for child in children {
        render(host, child, screen, surfaces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{dispatch, Event};
    use crate::node::SlotKind;
    use crate::render::{RectRenderer, TextRenderer};
    use crate::surface::{Color, FrameLayers};

    #[derive(Default)]
    struct Host {
        tree: SceneTree<Host>,
        log: Vec<String>,
    }

    impl TreeHost for Host {
        fn tree(&self) -> &SceneTree<Self> {
            &self.tree
        }

        fn tree_mut(&mut self) -> &mut SceneTree<Self> {
            &mut self.tree
        }
    }

    fn node(name: &str) -> SceneNode<Host> {
        SceneNode::new(name)
    }

    fn logging_task(label: &'static str) -> UpdateTask<Host> {
        UpdateTask::new(move |host: &mut Host, _| host.log.push(label.to_string()))
    }

    fn logging_handler(label: &'static str) -> Handler<Host> {
        Handler::new(move |host: &mut Host, _: &Event| host.log.push(label.to_string()))
    }

    fn assert_edges_agree(tree: &SceneTree<Host>, ids: &[NodeId]) {
        for &id in ids {
            if let Some(parent) = tree.parent(id) {
                assert!(tree.children(parent).contains(&id), "{id} missing from parent");
            }
            for &child in tree.children(id) {
                assert_eq!(tree.parent(child), Some(id));
            }
        }
    }

    #[test]
    fn attach_sets_both_edges() {
        let mut tree = SceneTree::<Host>::new();
        let root = tree.insert(node("root"));
        let a = tree.insert(node("a"));
        tree.attach(root, a).expect("attach");
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.children(root), &[a]);
        assert_edges_agree(&tree, &[root, a]);
    }

    #[test]
    fn reattach_moves_exactly_one_child() {
        let mut tree = SceneTree::<Host>::new();
        let left = tree.insert(node("left"));
        let right = tree.insert(node("right"));
        let a = tree.insert(node("a"));
        let b = tree.insert(node("b"));
        tree.attach(left, a).expect("attach");
        tree.attach(left, b).expect("attach");

        tree.attach(right, a).expect("reattach");

        assert_eq!(tree.children(left), &[b]);
        assert_eq!(tree.children(right), &[a]);
        assert_edges_agree(&tree, &[left, right, a, b]);
    }

    #[test]
    fn detach_absent_child_is_noop() {
        let mut tree = SceneTree::<Host>::new();
        let root = tree.insert(node("root"));
        let stray = tree.insert(node("stray"));
        assert!(!tree.detach(root, stray));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn cycle_rejected_before_mutation() {
        let mut tree = SceneTree::<Host>::new();
        let a = tree.insert(node("a"));
        let b = tree.insert(node("b"));
        let c = tree.insert(node("c"));
        tree.attach(a, b).expect("attach");
        tree.attach(b, c).expect("attach");

        let err = tree.attach(c, a).expect_err("cycle");
        assert!(matches!(err, ArenaError::CycleDetected { .. }));
        assert!(tree.attach(a, a).is_err());

        assert_eq!(tree.parent(a), None);
        assert!(tree.children(c).is_empty());
        assert_edges_agree(&tree, &[a, b, c]);
    }

    #[test]
    fn slot_occupant_mirrors_child() {
        let mut tree = SceneTree::<Host>::new();
        let slot = tree.insert(node("slot").with_slot(Slot::new(SlotKind::Reserve, None)));
        let token = tree.insert(node("token"));
        let other = tree.insert(node("other"));

        tree.attach(slot, token).expect("attach");
        assert_eq!(tree.slot(slot).and_then(Slot::occupant), Some(token));

        let err = tree.attach(slot, other).expect_err("occupied");
        assert!(matches!(err, ArenaError::SlotOccupied { .. }));
        assert_eq!(tree.children(slot).len(), 1);

        tree.detach(slot, token);
        assert!(!tree.slot(slot).is_some_and(Slot::is_occupied));
        assert!(tree.children(slot).is_empty());
    }

    #[test]
    fn slot_access_change_keeps_the_occupant() {
        let mut tree = SceneTree::<Host>::new();
        let slot = tree.insert(node("slot").with_slot(Slot::new(SlotKind::Offer, None)));
        let token = tree.insert(node("token"));
        let plain = tree.insert(node("plain"));
        tree.attach(slot, token).expect("attach");

        assert!(tree.set_slot_access(slot, Some(PlayerId::ONE), true));
        let access = tree.slot(slot).expect("slot");
        assert_eq!(access.owner, Some(PlayerId::ONE));
        assert!(access.droppable);
        assert_eq!(access.kind, SlotKind::Offer);
        assert_eq!(access.occupant(), Some(token));
        assert_eq!(tree.children(slot), [token]);

        assert!(!tree.set_slot_access(plain, None, false));
        assert!(tree.node(plain).expect("plain").slot().is_none());
    }

    #[test]
    fn leaving_a_slot_clears_its_occupant() {
        let mut tree = SceneTree::<Host>::new();
        let s1 = tree.insert(node("s1").with_slot(Slot::new(SlotKind::Reserve, None)));
        let s2 = tree.insert(node("s2").with_slot(Slot::new(SlotKind::Board, None)));
        let token = tree.insert(node("token"));
        tree.attach(s1, token).expect("attach");
        tree.attach(s2, token).expect("move");
        assert_eq!(tree.slot(s1).and_then(Slot::occupant), None);
        assert_eq!(tree.slot(s2).and_then(Slot::occupant), Some(token));
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut tree = SceneTree::<Host>::new();
        let root = tree.insert(node("root"));
        let branch = tree.insert(node("branch"));
        let leaf = tree.insert(node("leaf"));
        tree.attach(root, branch).expect("attach");
        tree.attach(branch, leaf).expect("attach");

        assert_eq!(tree.remove(branch), 2);
        assert!(!tree.contains(branch));
        assert!(!tree.contains(leaf));
        assert!(tree.children(root).is_empty());

        // Freed slots are reused under a new generation.
        let reused = tree.insert(node("reused"));
        assert_ne!(reused, leaf);
        assert_ne!(reused, branch);
        assert!(tree.get(leaf).is_none());
        assert!(tree.get(branch).is_none());
    }

    #[test]
    fn update_runs_tasks_before_descending() {
        let mut host = Host::default();
        let root = host
            .tree
            .insert(node("root").with_task(logging_task("root-1")).with_task(logging_task("root-2")));
        let a = host.tree.insert(node("a").with_task(logging_task("a")));
        let a1 = host.tree.insert(node("a1").with_task(logging_task("a1")));
        let b = host.tree.insert(node("b").with_task(logging_task("b")));
        host.tree.attach(root, a).expect("attach");
        host.tree.attach(a, a1).expect("attach");
        host.tree.attach(root, b).expect("attach");

        update(&mut host, root);

        assert_eq!(host.log, ["root-1", "root-2", "a", "a1", "b"]);
    }

    #[test]
    fn layout_accumulates_offsets() {
        let mut tree = SceneTree::<Host>::new();
        let root = tree.insert(node("root").at(10.0, 20.0));
        let row = tree.insert(node("row").at(100.0, 0.0));
        let cell = tree.insert(node("cell").at(5.0, 5.0));
        tree.attach(root, row).expect("attach");
        tree.attach(row, cell).expect("attach");

        tree.layout(root, Point::ZERO);
        assert_eq!(tree.node(cell).expect("cell").screen_location(), Point::new(115.0, 25.0));

        // A later offset change is picked up on the next pass.
        tree.set_location(row, Point::new(0.0, 50.0));
        tree.layout(root, Point::ZERO);
        assert_eq!(tree.node(cell).expect("cell").screen_location(), Point::new(15.0, 75.0));
    }

    #[test]
    fn locate_is_preorder_and_dispatch_is_reversed() {
        let mut host = Host::default();
        let root = host.tree.insert(node("root").sized(200.0, 200.0));
        let first = host.tree.insert(
            node("first")
                .at(10.0, 10.0)
                .sized(50.0, 50.0)
                .with_handler(EventKind::PrimaryInteract, logging_handler("first")),
        );
        let second = host.tree.insert(
            node("second")
                .at(30.0, 30.0)
                .sized(50.0, 50.0)
                .with_handler(EventKind::PrimaryInteract, logging_handler("second")),
        );
        host.tree.attach(root, first).expect("attach");
        host.tree.attach(root, second).expect("attach");
        host.tree.layout(root, Point::ZERO);

        let hits = host.tree.locate(root, Point::new(40.0, 40.0));
        assert_eq!(hits, vec![root, first, second]);

        let invoked = dispatch(&mut host, root, EventKind::PrimaryInteract, Point::new(40.0, 40.0));
        assert_eq!(invoked, 2);
        assert_eq!(host.log, ["second", "first"]);
    }

    #[test]
    fn overlay_nodes_see_events_before_later_base_siblings() {
        let mut host = Host::default();
        let root = host.tree.insert(node("root").sized(200.0, 200.0));
        let token = host.tree.insert(
            node("token")
                .at(10.0, 10.0)
                .sized(50.0, 50.0)
                .with_handler(EventKind::PrimaryInteract, logging_handler("token")),
        );
        let popover = host.tree.insert(
            node("popover")
                .at(20.0, 0.0)
                .sized(100.0, 100.0)
                .on_layer(Layer::Overlay)
                .with_handler(EventKind::PrimaryInteract, logging_handler("popover")),
        );
        let neighbour = host.tree.insert(
            node("neighbour")
                .at(40.0, 10.0)
                .sized(50.0, 50.0)
                .with_handler(EventKind::PrimaryInteract, logging_handler("neighbour")),
        );
        host.tree.attach(root, token).expect("attach");
        host.tree.attach(token, popover).expect("attach");
        host.tree.attach(root, neighbour).expect("attach");
        host.tree.layout(root, Point::ZERO);

        let at = Point::new(50.0, 20.0);
        assert_eq!(host.tree.locate(root, at), vec![root, token, popover, neighbour]);

        dispatch(&mut host, root, EventKind::PrimaryInteract, at);
        assert_eq!(host.log, ["popover", "neighbour", "token"]);
    }

    #[test]
    fn handlers_of_one_kind_run_in_registration_order() {
        let mut host = Host::default();
        let root = host.tree.insert(node("root").sized(10.0, 10.0));
        let h1 = logging_handler("one");
        let h2 = logging_handler("two");
        assert!(host.tree.on(root, EventKind::SecondaryInteract, h1.clone()));
        assert!(host.tree.on(root, EventKind::SecondaryInteract, h2));
        assert!(!host.tree.on(root, EventKind::SecondaryInteract, h1.clone()));
        host.tree.layout(root, Point::ZERO);

        dispatch(&mut host, root, EventKind::SecondaryInteract, Point::new(1.0, 1.0));
        assert_eq!(host.log, ["one", "two"]);

        assert!(host.tree.off(root, EventKind::SecondaryInteract, &h1));
        assert!(!host.tree.off(root, EventKind::SecondaryInteract, &h1));
    }

    #[test]
    fn layer_override_is_inherited() {
        let mut tree = SceneTree::<Host>::new();
        let root = tree.insert(node("root"));
        let overlay = tree.insert(node("proxy").on_layer(Layer::Overlay));
        let carried = tree.insert(node("carried"));
        tree.attach(root, overlay).expect("attach");
        tree.attach(overlay, carried).expect("attach");

        assert_eq!(tree.resolve_layer(root), Layer::Base);
        assert_eq!(tree.resolve_layer(carried), Layer::Overlay);

        tree.attach(root, carried).expect("move back");
        assert_eq!(tree.resolve_layer(carried), Layer::Base);
    }

    #[test]
    fn render_routes_draw_calls_by_layer() {
        let mut host = Host::default();
        let root = host.tree.insert(
            node("root")
                .sized(100.0, 100.0)
                .with_renderer(RectRenderer::filled(Color::from("white"))),
        );
        let label = host.tree.insert(
            node("label")
                .at(5.0, 5.0)
                .with_text("hello")
                .with_renderer(TextRenderer::default()),
        );
        let popover = host.tree.insert(
            node("popover")
                .at(1.0, 1.0)
                .on_layer(Layer::Overlay)
                .with_text("on top")
                .with_renderer(TextRenderer::default()),
        );
        host.tree.attach(root, label).expect("attach");
        host.tree.attach(label, popover).expect("attach");

        let mut frame = FrameLayers::new();
        render(&mut host, root, Point::new(10.0, 0.0), &mut frame);

        assert_eq!(frame.base.len(), 2);
        assert_eq!(frame.base.texts().collect::<Vec<_>>(), ["hello"]);
        assert_eq!(frame.overlay.texts().collect::<Vec<_>>(), ["on top"]);
        assert_eq!(
            host.tree.node(popover).expect("popover").screen_location(),
            Point::new(16.0, 6.0)
        );
    }
}
