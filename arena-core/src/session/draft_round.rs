//! The draft phase: offers, pick turns and returning minions home.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::config::SessionConfig;
use crate::error::ArenaResult;
use crate::geometry::Point;
use crate::model::{MinionDef, MinionId, PlayerId};
use crate::node::NodeId;
use crate::phase::{self, Phase};
use crate::scene::{Scene, SceneKey};

use super::{Session, Transition, COMPUTER, HUMAN};

/// State of a running draft.
#[derive(Debug, Clone)]
pub struct DraftRound {
    scene: Scene,
    order: [PlayerId; 2],
    turn: usize,
    picks: usize,
    reserves: [Vec<NodeId>; 2],
    offer_slots: Vec<NodeId>,
    offers: Vec<MinionId>,
    homes: HashMap<NodeId, NodeId>,
    banner: NodeId,
    skip_button: NodeId,
}

impl DraftRound {
    /// Seat whose turn it is; `None` once every seat is done.
    #[must_use]
    pub fn picker(&self) -> Option<PlayerId> {
        self.order.get(self.turn).copied()
    }

    /// Pick order for this draft.
    #[must_use]
    pub const fn order(&self) -> [PlayerId; 2] {
        self.order
    }

    /// Picks made in the current turn.
    #[must_use]
    pub const fn picks_this_turn(&self) -> usize {
        self.picks
    }

    /// Whether the current picker may still take an offer.
    #[must_use]
    pub fn can_pick(&self, config: &SessionConfig) -> bool {
        self.picker().is_some() && self.picks < config.picks_per_turn && !self.offers.is_empty()
    }

    /// Unclaimed offered minions.
    #[must_use]
    pub fn offers(&self) -> &[MinionId] {
        &self.offers
    }

    /// Offer slots in display order.
    #[must_use]
    pub fn offer_slots(&self) -> &[NodeId] {
        &self.offer_slots
    }

    /// Draft reserve slots of a seat.
    #[must_use]
    pub fn reserve_slots(&self, seat: PlayerId) -> &[NodeId] {
        &self.reserves[seat.index()]
    }

    /// The SKIP button.
    #[must_use]
    pub const fn skip_button(&self) -> NodeId {
        self.skip_button
    }

    /// Main-scene container a token came from, if it was placed.
    #[must_use]
    pub fn home_of(&self, token: NodeId) -> Option<NodeId> {
        self.homes.get(&token).copied()
    }
}

impl Session {
    /// Build the draft scene, move both rosters into it, draw the offers and
    /// switch to it.
    pub(super) fn begin_draft(&mut self) -> ArenaResult<()> {
        let order = phase::draft_order(&self.players);
        let layout = self.build_draft_scene()?;

        let mut homes = HashMap::new();
        for seat in [HUMAN, COMPUTER] {
            let tokens: Vec<NodeId> = self.minions_of(seat).map(|m| m.token).collect();
            let mut free = layout.reserves[seat.index()].iter().copied();
            for token in tokens {
                let Some(slot) = free.next() else {
                    break;
                };
                // Unplaced minions come along too; with no home they are
                // seated afresh when the draft ends.
                if let Some(home) = self.tree.parent(token) {
                    homes.insert(token, home);
                }
                self.tree.attach(slot, token)?;
                self.tree.set_location(token, Point::ZERO);
            }
        }

        let picks: Vec<MinionDef> = {
            let excluded: HashSet<&str> = self.minions.values().map(|m| m.name()).collect();
            self.selector
                .select(&mut self.rng, self.config.offer_count, &self.catalog, &excluded)
                .into_iter()
                .cloned()
                .collect()
        };
        let mut offers = Vec::with_capacity(picks.len());
        for (def, &slot) in picks.into_iter().zip(&layout.offers) {
            let (id, token) = self.spawn_minion(def, None);
            self.tree.attach(slot, token)?;
            offers.push(id);
        }

        tracing::info!(
            first = %self.players[order[0].index()].name,
            offers = offers.len(),
            "draft started"
        );
        self.draft = Some(DraftRound {
            scene: layout.scene,
            order,
            turn: 0,
            picks: 0,
            reserves: layout.reserves,
            offer_slots: layout.offers,
            offers,
            homes,
            banner: layout.banner,
            skip_button: layout.skip_button,
        });
        self.phase = Phase::Draft;
        self.scenes.insert(SceneKey::Draft, layout.scene);
        self.activate(SceneKey::Draft)
    }

    /// Hand an offered minion to `seat`. Its token must already sit in one
    /// of the seat's draft reserve slots.
    pub(super) fn claim_offer(&mut self, minion: MinionId, seat: PlayerId) {
        let Some(round) = self.draft.as_mut() else {
            return;
        };
        let Some(pos) = round.offers.iter().position(|&m| m == minion) else {
            return;
        };
        round.offers.remove(pos);
        round.picks += 1;
        let turn_done = round.picks >= self.config.picks_per_turn || round.offers.is_empty();

        if let Some(m) = self.minions.get_mut(&minion) {
            m.owner = Some(seat);
            tracing::debug!(player = %seat, minion = %m.name(), "draft pick");
        }
        self.players[seat.index()].minions.push(minion);

        if turn_done {
            self.end_turn();
        }
    }

    /// Pass the turn to the next picker, finishing the draft after the last.
    fn end_turn(&mut self) {
        let Some(round) = self.draft.as_mut() else {
            return;
        };
        let seat = round.picker();
        round.turn += 1;
        round.picks = 0;
        if round.offers.is_empty() {
            round.turn = round.order.len();
        }
        let done = round.picker().is_none();
        tracing::debug!(?seat, next = ?round.picker(), "draft turn ended");
        if done {
            self.request(Transition::FinishDraft);
        }
    }

    /// End the human player's turn. Returns `false` if it is not their turn.
    pub(super) fn end_human_turn(&mut self) -> bool {
        if self.phase != Phase::Draft
            || self.draft.as_ref().and_then(DraftRound::picker) != Some(HUMAN)
        {
            return false;
        }
        self.revert_drag();
        self.end_turn();
        true
    }

    /// Per-frame draft work: refresh the banner and let the computer pick.
    pub(super) fn draft_frame(&mut self) {
        let Some(round) = self.draft.as_ref() else {
            return;
        };
        let banner = round.banner;
        let picker = round.picker();
        let text = match picker {
            Some(seat) => {
                let left = self.config.picks_per_turn.saturating_sub(round.picks);
                format!("{} picks ({left} left)", self.players[seat.index()].name)
            }
            None => "Draft complete".to_string(),
        };
        self.tree.set_text(banner, text);

        if picker == Some(COMPUTER) {
            self.computer_pick();
        }
    }

    /// Claim a random offer into the computer's first free draft reserve
    /// slot, or end its turn when nothing can be taken.
    fn computer_pick(&mut self) {
        let Some(round) = self.draft.as_ref() else {
            return;
        };
        let free = round.reserves[COMPUTER.index()]
            .iter()
            .copied()
            .find(|&slot| self.tree.slot(slot).is_some_and(|s| !s.is_occupied()));
        let (Some(slot), false) = (free, round.offers.is_empty()) else {
            self.end_turn();
            return;
        };
        let minion = round.offers[self.rng.gen_range(0..round.offers.len())];
        let Some(token) = self.minions.get(&minion).map(|m| m.token) else {
            self.end_turn();
            return;
        };
        if let Err(e) = self.tree.attach(slot, token) {
            tracing::error!(%token, %slot, error = %e, "computer pick failed");
            self.end_turn();
            return;
        }
        self.tree.set_location(token, Point::ZERO);
        self.claim_offer(minion, COMPUTER);
    }

    /// Return every owned minion home, seat new ones, discard unclaimed
    /// offers with the draft scene and re-enter placement.
    pub(super) fn finish_draft(&mut self) -> ArenaResult<()> {
        self.revert_drag();
        let Some(round) = self.draft.take() else {
            return Ok(());
        };

        for seat in [HUMAN, COMPUTER] {
            let tokens: Vec<NodeId> = self.minions_of(seat).map(|m| m.token).collect();
            for token in tokens {
                match round.home_of(token) {
                    Some(home) if self.tree.attach(home, token).is_ok() => {
                        self.tree.set_location(token, Point::ZERO);
                    }
                    // Never entered the draft scene: still at home.
                    None if self.tree.parent(token).is_some()
                        && !self.tree.is_ancestor(round.scene.root, token) => {}
                    _ => self.seat_new_minion(seat, token),
                }
            }
        }

        for id in &round.offers {
            self.minions.remove(id);
        }
        let freed = self.tree.remove(round.scene.root);
        self.scenes.remove(SceneKey::Draft);
        let tree = &self.tree;
        self.popovers.retain(|_, popover| tree.contains(*popover));
        tracing::info!(discarded = round.offers.len(), freed, "draft finished");

        self.activate(SceneKey::Main)
    }

    /// Seat a token in the first free reserve slot, then board cell; else
    /// leave it unplaced.
    fn seat_new_minion(&mut self, seat: PlayerId, token: NodeId) {
        let player = &self.players[seat.index()];
        let free = player
            .reserve
            .iter()
            .chain(&player.board)
            .copied()
            .find(|&slot| self.tree.slot(slot).is_some_and(|s| !s.is_occupied()));
        match free {
            Some(slot) if self.tree.attach(slot, token).is_ok() => {
                self.tree.set_location(token, Point::ZERO);
            }
            _ => {
                self.tree.detach_from_parent(token);
                tracing::debug!(player = %seat, %token, "no free slot, minion left unplaced");
            }
        }
    }
}
