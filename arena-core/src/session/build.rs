//! Scene construction.

use crate::catalog;
use crate::error::ArenaResult;
use crate::event::{Event, EventKind, Handler};
use crate::geometry::{Point, Size};
use crate::model::{MinionDef, PlayerId};
use crate::node::{NodeId, Payload, SceneNode, Slot, SlotKind, UpdateTask};
use crate::phase::Phase;
use crate::render::widgets::{
    ButtonRenderer, CountdownRenderer, MinionTokenRenderer, PlayerCardRenderer, SlotRenderer,
    StatsRenderer,
};
use crate::render::TextRenderer;
use crate::scene::{Scene, SceneKey};
use crate::surface::{Color, TextAlign, TextBaseline, TextStyle};

use super::{Session, Transition, COMPUTER, HUMAN};

pub(super) const SLOT: f32 = 80.0;
pub(super) const GAP: f32 = 10.0;
const CARD: Size = Size::new(220.0, 80.0);
const MARGIN: f32 = 20.0;
const ROW_X: f32 = MARGIN + CARD.width + 40.0;

const INTRO_BACKGROUND: &str = "#1b1b2f";
const MAIN_BACKGROUND: &str = "#f2efe6";
const DRAFT_BACKGROUND: &str = "#e9f0f7";

/// Node handles of a freshly built draft scene.
pub(super) struct DraftLayout {
    pub scene: Scene,
    pub reserves: [Vec<NodeId>; 2],
    pub offers: Vec<NodeId>,
    pub banner: NodeId,
    pub skip_button: NodeId,
}

/// Token node for a minion definition; the caller sets the payload.
pub(super) fn token_node(def: &MinionDef) -> SceneNode<Session> {
    SceneNode::new(format!("token/{}", def.name))
        .sized(SLOT, SLOT)
        .with_renderer(MinionTokenRenderer::default())
        .with_handler(
            EventKind::PrimaryInteract,
            Handler::new(|s: &mut Session, e: &Event| s.token_primary(e)),
        )
        .with_handler(
            EventKind::SecondaryInteract,
            Handler::new(|s: &mut Session, e: &Event| s.toggle_popover(e.target)),
        )
}

fn slot_node(name: String, kind: SlotKind, owner: Option<PlayerId>, at: Point) -> SceneNode<Session> {
    SceneNode::new(name)
        .at(at.x, at.y)
        .sized(SLOT, SLOT)
        .with_slot(Slot::new(kind, owner))
        .with_renderer(SlotRenderer)
        .with_handler(
            EventKind::PrimaryInteract,
            Handler::new(|s: &mut Session, e: &Event| s.slot_primary(e)),
        )
}

fn card_node(player: PlayerId, at: Point) -> SceneNode<Session> {
    SceneNode::new(format!("card/{player}"))
        .at(at.x, at.y)
        .sized(CARD.width, CARD.height)
        .with_payload(Payload::Player(player))
        .with_renderer(PlayerCardRenderer)
}

fn button_node(name: &str, label: &str, at: Point, size: Size) -> SceneNode<Session> {
    SceneNode::new(name)
        .at(at.x, at.y)
        .sized(size.width, size.height)
        .with_text(label)
        .with_renderer(ButtonRenderer::default())
}

fn banner_style(px: u32, color: &str) -> TextStyle {
    TextStyle::new(px, "Arial", color)
        .with_align(TextAlign::Center)
        .with_baseline(TextBaseline::Middle)
}

fn row(x: f32, y: f32, index: usize) -> Point {
    #[allow(clippy::cast_precision_loss)]
    let step = index as f32 * (SLOT + GAP);
    Point::new(x + step, y)
}

#[allow(clippy::cast_precision_loss)]
fn centered_row_x(width: f32, count: usize) -> f32 {
    let span = count as f32 * (SLOT + GAP) - GAP;
    ((width - span) / 2.0).max(0.0)
}

impl Session {
    fn viewport(&self) -> Size {
        Size::new(self.config.width, self.config.height)
    }

    /// Vertical position of a seat's card and reserve row. Seat 2 sits at
    /// the top, seat 1 at the bottom.
    fn seat_row_y(&self, seat: PlayerId) -> f32 {
        if seat == COMPUTER {
            MARGIN
        } else {
            self.config.height - MARGIN - CARD.height
        }
    }

    fn place<F>(&mut self, scene: Scene, node: SceneNode<Self>, then: F) -> ArenaResult<NodeId>
    where
        F: FnOnce(&mut Self, NodeId),
    {
        let id = self.tree.insert(node);
        scene.attach(&mut self.tree, id)?;
        then(self, id);
        Ok(id)
    }

    pub(super) fn build_intro(&mut self) -> ArenaResult<()> {
        let size = self.viewport();
        let scene = Scene::build(&mut self.tree, "intro", size, Color::from(INTRO_BACKGROUND))?;
        let center = size.center();

        let title = SceneNode::new("intro/title")
            .at(center.x, center.y - 120.0)
            .with_text("Minion Arena")
            .with_renderer(TextRenderer::new(banner_style(64, "white")));
        self.place(scene, title, |_, _| {})?;

        let button = button_node(
            "intro/start",
            "START",
            Point::new(center.x - 100.0, center.y - 30.0),
            Size::new(200.0, 60.0),
        )
        .with_handler(
            EventKind::PrimaryInteract,
            Handler::new(|s: &mut Session, _: &Event| s.request(Transition::StartMatch)),
        );
        self.place(scene, button, |s, id| s.start_button = Some(id))?;

        self.scenes.insert(SceneKey::Intro, scene);
        Ok(())
    }

    pub(super) fn build_main(&mut self) -> ArenaResult<()> {
        let size = self.viewport();
        let scene = Scene::build(&mut self.tree, "main", size, Color::from(MAIN_BACKGROUND))?;
        self.tree.on(
            scene.root,
            EventKind::Activate,
            Handler::new(|s: &mut Session, _: &Event| s.begin_placement()),
        );
        self.tree.on(
            scene.root,
            EventKind::Timer,
            Handler::new(|s: &mut Session, _: &Event| s.request(Transition::Combat)),
        );

        let board_x = centered_row_x(size.width, self.config.board_size);
        for seat in [COMPUTER, HUMAN] {
            let y = self.seat_row_y(seat);
            self.place(scene, card_node(seat, Point::new(MARGIN, y)), |_, _| {})?;

            for i in 0..self.config.reserve_size {
                let slot = slot_node(format!("reserve/{seat}/{i}"), SlotKind::Reserve, Some(seat), row(ROW_X, y, i));
                self.place(scene, slot, |s, id| s.players[seat.index()].reserve.push(id))?;
            }

            let board_y = if seat == COMPUTER {
                size.height / 2.0 - SLOT - GAP
            } else {
                size.height / 2.0 + GAP
            };
            for i in 0..self.config.board_size {
                let cell = slot_node(format!("board/{seat}/{i}"), SlotKind::Board, Some(seat), row(board_x, board_y, i));
                self.place(scene, cell, |s, id| s.players[seat.index()].board.push(id))?;
            }
        }

        let countdown = SceneNode::new("main/countdown")
            .at(size.width - 140.0, size.height / 2.0 - 60.0)
            .sized(120.0, 120.0)
            .with_renderer(CountdownRenderer::default())
            .with_task(UpdateTask::new(|s: &mut Session, _| s.poll_countdown()));
        self.place(scene, countdown, |_, _| {})?;

        let status = SceneNode::new("main/status")
            .at(size.width / 2.0, MARGIN + CARD.height + 40.0)
            .with_renderer(TextRenderer::new(banner_style(40, "#333333")))
            .with_task(UpdateTask::new(|s: &mut Session, id| s.refresh_status(id)));
        self.place(scene, status, |_, _| {})?;

        let stats = SceneNode::new("main/stats")
            .at(size.width - 170.0, size.height - 60.0)
            .sized(160.0, 50.0)
            .with_renderer(StatsRenderer::default());
        self.place(scene, stats, |_, _| {})?;

        self.scenes.insert(SceneKey::Main, scene);
        Ok(())
    }

    /// Seat each player's configured starting minions in reserve order.
    pub(super) fn seat_starting_minions(&mut self) -> ArenaResult<()> {
        for seat in [HUMAN, COMPUTER] {
            let names = self.config.players[seat.index()].starting_minions.clone();
            for name in names {
                let Some(def) = catalog::find(&name) else {
                    tracing::warn!(%name, "unknown starting minion skipped");
                    continue;
                };
                let (id, token) = self.spawn_minion(def, Some(seat));
                self.players[seat.index()].add_minion(&mut self.tree, id, token)?;
            }
        }
        Ok(())
    }

    pub(super) fn build_draft_scene(&mut self) -> ArenaResult<DraftLayout> {
        let size = self.viewport();
        let scene = Scene::build(&mut self.tree, "draft", size, Color::from(DRAFT_BACKGROUND))?;

        let mut reserves: [Vec<NodeId>; 2] = [Vec::new(), Vec::new()];
        for seat in [COMPUTER, HUMAN] {
            let y = self.seat_row_y(seat);
            self.place(scene, card_node(seat, Point::new(MARGIN, y)), |_, _| {})?;
            for i in 0..self.config.draft_reserve_size {
                let slot = slot_node(
                    format!("draft/reserve/{seat}/{i}"),
                    SlotKind::DraftReserve,
                    Some(seat),
                    row(ROW_X, y, i),
                );
                let id = self.place(scene, slot, |_, _| {})?;
                reserves[seat.index()].push(id);
            }
        }

        let offer_y = size.height / 2.0 - SLOT / 2.0;
        let offer_x = centered_row_x(size.width, self.config.offer_count);
        let mut offers = Vec::with_capacity(self.config.offer_count);
        for i in 0..self.config.offer_count {
            let slot = slot_node(format!("draft/offer/{i}"), SlotKind::Offer, None, row(offer_x, offer_y, i));
            offers.push(self.place(scene, slot, |_, _| {})?);
        }

        let banner = SceneNode::new("draft/banner")
            .at(size.width / 2.0, offer_y - 50.0)
            .with_renderer(TextRenderer::new(banner_style(32, "#333333")));
        let banner = self.place(scene, banner, |_, _| {})?;

        let skip = button_node(
            "draft/skip",
            "SKIP",
            Point::new(size.width - 180.0, size.height / 2.0 - 30.0),
            Size::new(140.0, 60.0),
        )
        .with_handler(
            EventKind::PrimaryInteract,
            Handler::new(|s: &mut Session, _: &Event| {
                if !s.drag.is_handled() {
                    s.end_human_turn();
                }
            }),
        );
        let skip_button = self.place(scene, skip, |_, _| {})?;

        self.tree.add_task(
            scene.root,
            UpdateTask::new(|s: &mut Session, _| s.draft_frame()),
        );

        Ok(DraftLayout {
            scene,
            reserves,
            offers,
            banner,
            skip_button,
        })
    }

    fn poll_countdown(&mut self) {
        if !self.timer.update(self.now) {
            return;
        }
        tracing::debug!("placement countdown expired");
        if let Ok(scene) = self.scenes.get(SceneKey::Main) {
            let point = self.pointer;
            crate::event::broadcast(self, scene.root, EventKind::Timer, point);
        }
    }

    fn refresh_status(&mut self, id: NodeId) {
        let text = match (self.phase, self.last_combat) {
            (Phase::MatchOver, Some(outcome)) => {
                let winner = &self.players[outcome.target.opponent().index()];
                Some(format!("{} {} wins!", winner.avatar, winner.name))
            }
            _ => None,
        };
        if let Some(node) = self.tree.get_mut(id) {
            node.text = text;
        }
    }
}
