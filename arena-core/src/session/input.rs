//! Pointer handlers and the drag and drop policy.

use crate::drag::DropOutcome;
use crate::event::{Event, EventKind, Handler};
use crate::node::{NodeId, Payload, SceneNode, SlotKind};
use crate::phase::Phase;
use crate::render::widgets::MinionInfoRenderer;
use crate::surface::Layer;

use super::build::{GAP, SLOT};
use super::{Session, HUMAN};

const POPOVER_WIDTH: f32 = 230.0;
const POPOVER_HEIGHT: f32 = 180.0;

impl Session {
    /// Whether the human player may pick up `token` now.
    ///
    /// Own minions can be moved during placement and draft. An offered
    /// minion can be taken only on the human player's draft turn while picks
    /// remain.
    #[must_use]
    pub fn can_drag(&self, token: NodeId) -> bool {
        let Some(minion) = self.minion_for_token(token) else {
            return false;
        };
        match (self.phase, minion.owner) {
            (Phase::Placement | Phase::Draft, Some(owner)) => owner == HUMAN,
            (Phase::Draft, None) => self
                .draft
                .as_ref()
                .is_some_and(|round| round.picker() == Some(HUMAN) && round.can_pick(&self.config)),
            _ => false,
        }
    }

    /// Whether dropping `object` into `target` is allowed now.
    ///
    /// The target must be a droppable slot owned by the human player and
    /// belong to the current phase. Offered minions only go into an empty
    /// draft reserve slot of the current human picker.
    #[must_use]
    pub fn can_drop(&self, object: NodeId, target: NodeId) -> bool {
        let Some(slot) = self.tree.slot(target) else {
            return false;
        };
        if !slot.droppable || slot.owner != Some(HUMAN) {
            return false;
        }
        let Some(minion) = self.minion_for_token(object) else {
            return false;
        };
        match self.phase {
            Phase::Placement => {
                matches!(slot.kind, SlotKind::Reserve | SlotKind::Board) && minion.owner == Some(HUMAN)
            }
            Phase::Draft if slot.kind == SlotKind::DraftReserve => match minion.owner {
                Some(owner) => owner == HUMAN,
                None => {
                    !slot.is_occupied()
                        && self
                            .draft
                            .as_ref()
                            .is_some_and(|round| round.picker() == Some(HUMAN))
                }
            },
            _ => false,
        }
    }

    pub(super) fn token_primary(&mut self, event: &Event) {
        if self.drag.is_dragging() || self.drag.is_handled() {
            return;
        }
        let token = event.target;
        if !self.can_drag(token) {
            return;
        }
        let Some(scene) = self.scenes.active_scene() else {
            return;
        };
        if let Err(e) = self.drag.pick_up(&mut self.tree, token, scene.proxy, event.point) {
            tracing::error!(%token, error = %e, "pick up failed");
        }
    }

    pub(super) fn slot_primary(&mut self, event: &Event) {
        let Some(object) = self.drag.dragged() else {
            return;
        };
        if self.drag.is_handled() {
            return;
        }
        let target = event.target;
        if !self.can_drop(object, target) {
            tracing::warn!(%object, %target, "drop rejected");
            return;
        }
        let offered = self
            .minion_for_token(object)
            .filter(|m| m.owner.is_none())
            .map(|m| m.id);

        match self.drag.drop_into(&mut self.tree, target) {
            Ok(DropOutcome::Ignored) => {}
            Ok(_) => {
                if let Some(minion) = offered {
                    self.claim_offer(minion, HUMAN);
                }
            }
            Err(e) => tracing::error!(%object, %target, error = %e, "drop failed"),
        }
    }

    /// Open the info popover of a token, or close it if open. Ignored if
    /// a popover above already took the interaction.
    pub(super) fn toggle_popover(&mut self, token: NodeId) {
        if self.drag.is_handled() {
            return;
        }
        self.drag.consume();
        if let Some(popover) = self.popovers.remove(&token) {
            self.tree.remove(popover);
            tracing::debug!(%token, "popover closed");
            return;
        }
        let minion = match self.tree.get(token).map(|n| n.payload) {
            Some(Payload::Minion(id)) => id,
            _ => return,
        };
        let node = SceneNode::new("popover")
            .at(SLOT + GAP, 0.0)
            .sized(POPOVER_WIDTH, POPOVER_HEIGHT)
            .on_layer(Layer::Overlay)
            .with_payload(Payload::Popover(minion))
            .with_renderer(MinionInfoRenderer::default())
            .with_handler(
                EventKind::PrimaryInteract,
                Handler::new(|s: &mut Session, _: &Event| s.drag.consume()),
            )
            .with_handler(
                EventKind::SecondaryInteract,
                Handler::new(|s: &mut Session, e: &Event| s.close_popover(e.target)),
            );
        let popover = self.tree.insert(node);
        if let Err(e) = self.tree.attach(token, popover) {
            tracing::error!(%token, error = %e, "popover attach failed");
            self.tree.remove(popover);
            return;
        }
        self.popovers.insert(token, popover);
        tracing::debug!(%token, %minion, "popover opened");
    }

    fn close_popover(&mut self, popover: NodeId) {
        let Some(token) = self.tree.parent(popover) else {
            return;
        };
        if self.popovers.get(&token) == Some(&popover) {
            self.toggle_popover(token);
        }
    }
}
