//! The per-match context.
//!
//! [`Session`] owns everything a match needs: the scene tree with all scene
//! roots, the scene manager, the drag controller, both players, every live
//! minion, the placement timer, frame stats and the RNG. Handlers, update
//! tasks and renderers receive it as their context.
//!
//! ```text
//!            start            timer expiry              not defeated
//!   Intro ─────────▶ Placement ────────────▶ Combat ───────────────▶ Draft
//!                       ▲                      │                       │
//!                       │                      │ defeated              │ all turns done
//!                       │                      ▼                       │
//!                       │                  MatchOver ── reset ──▶ Intro│
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! Transitions raised by handlers or update tasks are queued and applied
//! once the current input dispatch or update pass has finished.

mod build;
mod draft_round;
mod input;

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog;
use crate::config::SessionConfig;
use crate::draft::DraftSelector;
use crate::drag::DragController;
use crate::error::{ArenaError, ArenaResult};
use crate::event::{self, EventKind, Input, InputEvent};
use crate::geometry::Point;
use crate::model::{Minion, MinionDef, MinionId, Player, PlayerId};
use crate::node::{NodeId, Payload};
use crate::phase::{self, CombatOutcome, CombatPolicy, Phase};
use crate::scene::{Scene, SceneKey, SceneManager};
use crate::stats::RollingStats;
use crate::surface::FrameLayers;
use crate::timer::Timer;
use crate::tree::{self, SceneTree, TreeHost};

pub use draft_round::DraftRound;

/// Seat controlled by pointer input.
pub const HUMAN: PlayerId = PlayerId::ONE;

/// Seat played automatically.
pub const COMPUTER: PlayerId = PlayerId::TWO;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    StartMatch,
    Combat,
    FinishDraft,
    Reset,
}

/// Explicit context for one match.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    tree: SceneTree<Session>,
    scenes: SceneManager,
    drag: DragController,
    players: [Player; 2],
    minions: HashMap<MinionId, Minion>,
    popovers: HashMap<NodeId, NodeId>,
    catalog: Vec<MinionDef>,
    selector: DraftSelector,
    timer: Timer,
    stats: RollingStats,
    rng: StdRng,
    phase: Phase,
    now: Duration,
    pointer: Point,
    pending: Vec<Transition>,
    draft: Option<DraftRound>,
    start_button: Option<NodeId>,
    reset_at: Option<Duration>,
    last_combat: Option<CombatOutcome>,
    matches_completed: u32,
}

impl TreeHost for Session {
    fn tree(&self) -> &SceneTree<Self> {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut SceneTree<Self> {
        &mut self.tree
    }
}

impl Session {
    /// Validate `config` and build a match on the intro scene.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] if validation fails, or a tree
    /// error if scene construction fails.
    pub fn new(config: SessionConfig) -> ArenaResult<Self> {
        config.validate()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::with_rng(config, rng, 0)
    }

    fn with_rng(config: SessionConfig, rng: StdRng, matches_completed: u32) -> ArenaResult<Self> {
        let players = [HUMAN, COMPUTER].map(|id| {
            let seat = &config.players[id.index()];
            Player::new(
                id,
                seat.name.clone(),
                seat.avatar.clone(),
                seat.color.clone(),
                config.starting_health,
            )
        });
        let mut session = Self {
            tree: SceneTree::new(),
            scenes: SceneManager::new(),
            drag: DragController::new(),
            players,
            minions: HashMap::new(),
            popovers: HashMap::new(),
            catalog: catalog::builtin(),
            selector: DraftSelector::new(config.rarity_weights),
            timer: Timer::new(config.placement_duration()),
            stats: RollingStats::new(config.stats_capacity),
            rng,
            phase: Phase::Intro,
            now: Duration::ZERO,
            pointer: Point::ZERO,
            pending: Vec::new(),
            draft: None,
            start_button: None,
            reset_at: None,
            last_combat: None,
            matches_completed,
            config,
        };
        session.build_intro()?;
        session.build_main()?;
        session.seat_starting_minions()?;
        session.activate(SceneKey::Intro)?;
        tracing::debug!(nodes = session.tree.len(), "session built");
        Ok(session)
    }

    /// Advance one frame at host time `now`: reset the per-frame drag flag,
    /// record frame stats, run the active scene's update tasks, then apply
    /// transitions they requested.
    pub fn tick(&mut self, now: Duration) {
        self.now = now;
        self.drag.begin_frame();
        self.stats.record(now);
        if self.reset_at.is_some_and(|at| now >= at) {
            self.request(Transition::Reset);
        }
        if let Some(scene) = self.scenes.active_scene() {
            tree::update(self, scene.root);
        }
        self.apply_pending();
    }

    /// Route one input record into the active scene.
    ///
    /// Pointer moves reposition the pointer proxy. A primary interaction
    /// that leaves a pre-existing drag in flight reverts it.
    pub fn handle_input(&mut self, input: InputEvent) {
        let Some(scene) = self.scenes.active_scene() else {
            return;
        };
        self.pointer = input.point;
        self.tree.set_location(scene.proxy, input.point);
        self.tree.layout(scene.root, Point::ZERO);

        let kind = input.kind.event_kind();
        match input.kind {
            Input::Primary => {
                let was_dragging = self.drag.is_dragging();
                self.drag.begin_interaction();
                event::dispatch(self, scene.root, kind, input.point);
                if was_dragging && self.drag.is_dragging() {
                    tracing::debug!("no target claimed the drop");
                    self.revert_drag();
                }
            }
            Input::Secondary => {
                self.drag.begin_interaction();
                event::dispatch(self, scene.root, kind, input.point);
            }
            Input::PointerMove => {
                event::dispatch(self, scene.root, kind, input.point);
            }
        }
        self.apply_pending();
    }

    /// Draw the active scene into `frame`, replacing its previous contents.
    pub fn render(&mut self, frame: &mut FrameLayers) {
        frame.clear();
        if let Some(scene) = self.scenes.active_scene() {
            tree::render(self, scene.root, Point::ZERO, frame);
        }
    }

    /// Leave the intro scene and start the first placement countdown.
    ///
    /// Returns `false` outside the intro phase.
    pub fn start_match(&mut self) -> bool {
        if self.phase != Phase::Intro {
            tracing::warn!(phase = %self.phase, "start ignored");
            return false;
        }
        self.request(Transition::StartMatch);
        self.apply_pending();
        true
    }

    /// End the human player's draft turn, as the SKIP button does.
    ///
    /// Returns `false` if it is not the human player's turn.
    pub fn skip_draft_turn(&mut self) -> bool {
        let skipped = self.end_human_turn();
        self.apply_pending();
        skipped
    }

    fn request(&mut self, transition: Transition) {
        tracing::trace!(?transition, "transition requested");
        self.pending.push(transition);
    }

    fn apply_pending(&mut self) {
        loop {
            let batch = std::mem::take(&mut self.pending);
            if batch.is_empty() {
                break;
            }
            for transition in batch {
                if let Err(e) = self.apply(transition) {
                    tracing::error!(?transition, error = %e, "transition failed");
                }
            }
        }
    }

    fn apply(&mut self, transition: Transition) -> ArenaResult<()> {
        match (transition, self.phase) {
            (Transition::StartMatch, Phase::Intro) => self.activate(SceneKey::Main),
            (Transition::Combat, Phase::Placement) => self.run_combat(),
            (Transition::FinishDraft, Phase::Draft) => self.finish_draft(),
            (Transition::Reset, Phase::MatchOver) => self.reset(),
            (transition, phase) => {
                tracing::warn!(?transition, %phase, "stale transition dropped");
                Ok(())
            }
        }
    }

    fn activate(&mut self, key: SceneKey) -> ArenaResult<()> {
        let scene = self.scenes.set_active(key)?;
        let point = self.pointer;
        event::broadcast(self, scene.root, EventKind::Activate, point);
        Ok(())
    }

    fn begin_placement(&mut self) {
        self.phase = Phase::Placement;
        self.timer.start(self.now);
        self.auto_place(COMPUTER);
        tracing::info!(
            countdown_ms = self.config.placement_ms,
            "placement started"
        );
    }

    /// Move the seat's reserve minions onto free board cells.
    fn auto_place(&mut self, seat: PlayerId) {
        let player = &self.players[seat.index()];
        let waiting: Vec<NodeId> = player
            .reserve
            .iter()
            .filter_map(|&slot| self.tree.slot(slot).and_then(|s| s.occupant()))
            .collect();
        let mut free = player
            .board
            .iter()
            .copied()
            .filter(|&cell| self.tree.slot(cell).is_some_and(|s| !s.is_occupied()))
            .collect::<Vec<_>>()
            .into_iter();
        for token in waiting {
            let Some(cell) = free.next() else {
                break;
            };
            if let Err(e) = self.tree.attach(cell, token) {
                tracing::error!(%token, %cell, error = %e, "auto placement failed");
                continue;
            }
            self.tree.set_location(token, Point::ZERO);
        }
    }

    fn run_combat(&mut self) -> ArenaResult<()> {
        self.revert_drag();
        self.timer.stop();
        self.phase = Phase::Combat;

        let policy = CombatPolicy {
            min_fraction: self.config.damage_min_fraction,
            max_fraction: self.config.damage_max_fraction,
        };
        let outcome = phase::resolve_combat(&mut self.rng, &mut self.players, policy);
        let target = &self.players[outcome.target.index()];
        tracing::info!(
            target = %target.name,
            damage = outcome.damage,
            health = target.health(),
            "combat resolved"
        );
        self.last_combat = Some(outcome);

        if outcome.defeated {
            self.phase = Phase::MatchOver;
            self.reset_at = Some(self.now + self.config.reset_delay());
            let winner = &self.players[outcome.target.opponent().index()];
            tracing::info!(winner = %winner.name, reset_in_ms = self.config.reset_delay_ms, "match over");
            return Ok(());
        }
        self.begin_draft()
    }

    fn reset(&mut self) -> ArenaResult<()> {
        let seed: u64 = self.rng.gen();
        let mut next = Self::with_rng(
            self.config.clone(),
            StdRng::seed_from_u64(seed),
            self.matches_completed + 1,
        )?;
        next.now = self.now;
        next.pointer = self.pointer;
        next.stats = self.stats.clone();
        tracing::info!(matches_completed = next.matches_completed, "match reset");
        *self = next;
        Ok(())
    }

    fn revert_drag(&mut self) {
        if let Err(e) = self.drag.revert(&mut self.tree) {
            tracing::error!(error = %e, "drag revert failed");
        }
    }

    /// Create a minion and its detached token.
    fn spawn_minion(&mut self, def: MinionDef, owner: Option<PlayerId>) -> (MinionId, NodeId) {
        let token = self.tree.insert(build::token_node(&def));
        let minion = Minion::from_def(def, owner, token);
        let id = minion.id;
        if let Some(node) = self.tree.get_mut(token) {
            node.payload = Payload::Minion(id);
        }
        self.minions.insert(id, minion);
        (id, token)
    }

    fn minion_for_token(&self, token: NodeId) -> Option<&Minion> {
        match self.tree.get(token)?.payload {
            Payload::Minion(id) => self.minions.get(&id),
            _ => None,
        }
    }

    // Queries

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Configuration the match was built from.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// A player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Both players, seat 1 first.
    #[must_use]
    pub const fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// A live minion.
    #[must_use]
    pub fn minion(&self, id: MinionId) -> Option<&Minion> {
        self.minions.get(&id)
    }

    /// Look up a live minion by name.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::MinionNotFound`] if no live minion has `name`.
    pub fn minion_named(&self, name: &str) -> ArenaResult<&Minion> {
        self.minions
            .values()
            .find(|m| m.name() == name)
            .ok_or_else(|| ArenaError::MinionNotFound(name.to_string()))
    }

    /// Minions owned by a player, in acquisition order.
    pub fn minions_of(&self, id: PlayerId) -> impl Iterator<Item = &Minion> {
        let minions = &self.minions;
        self.players[id.index()]
            .minions
            .iter()
            .filter_map(move |m| minions.get(m))
    }

    /// Number of live minions, offered ones included.
    #[must_use]
    pub fn minion_count(&self) -> usize {
        self.minions.len()
    }

    /// Minion shown by a token node.
    #[must_use]
    pub fn minion_at(&self, token: NodeId) -> Option<&Minion> {
        self.minion_for_token(token)
    }

    /// Position of a node from its ancestors' offsets, independent of the
    /// last layout pass.
    #[must_use]
    pub fn absolute_location(&self, id: NodeId) -> Option<Point> {
        let mut at = self.tree.get(id)?.location;
        let mut current = self.tree.parent(id);
        while let Some(parent) = current {
            at = at + self.tree.get(parent)?.location;
            current = self.tree.parent(parent);
        }
        Some(at)
    }

    /// Center of a node's box in base-surface coordinates.
    #[must_use]
    pub fn node_center(&self, id: NodeId) -> Option<Point> {
        let size = self.tree.get(id)?.size;
        self.absolute_location(id).map(|at| at + size.center())
    }

    /// Center of a minion's token.
    #[must_use]
    pub fn token_center(&self, id: MinionId) -> Option<Point> {
        self.node_center(self.minions.get(&id)?.token)
    }

    /// Container currently owning a minion's token.
    #[must_use]
    pub fn container_of(&self, id: MinionId) -> Option<NodeId> {
        self.tree.parent(self.minions.get(&id)?.token)
    }

    /// Reserve slots of a player.
    #[must_use]
    pub fn reserve_slots(&self, id: PlayerId) -> &[NodeId] {
        &self.players[id.index()].reserve
    }

    /// Board cells of a player.
    #[must_use]
    pub fn board_cells(&self, id: PlayerId) -> &[NodeId] {
        &self.players[id.index()].board
    }

    /// A registered scene.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::SceneNotFound`] if `key` is not registered.
    pub fn scene(&self, key: SceneKey) -> ArenaResult<Scene> {
        self.scenes.get(key)
    }

    /// Key of the active scene.
    #[must_use]
    pub const fn active_scene(&self) -> Option<SceneKey> {
        self.scenes.active()
    }

    /// The intro scene's start button.
    #[must_use]
    pub const fn start_button(&self) -> Option<NodeId> {
        self.start_button
    }

    /// The running draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&DraftRound> {
        self.draft.as_ref()
    }

    /// Whether a token is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// The token being dragged.
    #[must_use]
    pub const fn dragged(&self) -> Option<NodeId> {
        self.drag.dragged()
    }

    /// Info popover open on a token.
    #[must_use]
    pub fn popover_of(&self, token: NodeId) -> Option<NodeId> {
        self.popovers.get(&token).copied()
    }

    /// Placement countdown.
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Frame statistics.
    #[must_use]
    pub const fn stats(&self) -> &RollingStats {
        &self.stats
    }

    /// Host time of the last tick.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Last known pointer position.
    #[must_use]
    pub const fn pointer(&self) -> Point {
        self.pointer
    }

    /// Outcome of the most recent combat step.
    #[must_use]
    pub const fn last_combat(&self) -> Option<CombatOutcome> {
        self.last_combat
    }

    /// Matches finished and reset in this session's lineage.
    #[must_use]
    pub const fn matches_completed(&self) -> u32 {
        self.matches_completed
    }

    /// Host time at which a finished match resets.
    #[must_use]
    pub const fn reset_at(&self) -> Option<Duration> {
        self.reset_at
    }
}
