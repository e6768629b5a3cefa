//! Players and minions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ArenaResult;
use crate::node::{NodeId, Slot};
use crate::surface::Color;
use crate::tree::SceneTree;

/// Identifies one of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Seat 1, the human-controlled player.
    pub const ONE: Self = Self(0);
    /// Seat 2, the computer.
    pub const TWO: Self = Self(1);

    /// Index into the session's player array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0 + 1)
    }
}

/// Unique identifier for a minion instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinionId(Uuid);

impl MinionId {
    /// Create a new unique minion ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MinionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MinionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Draft rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    /// Most frequent.
    Common,
    /// Less frequent.
    Rare,
    /// Least frequent.
    Epic,
}

/// Minion family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum MinionType {
    Implication,
    Algorithm,
    Mathematician,
    Abstraction,
    Dream,
    Concept,
}

/// Minion role within its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Specialization {
    Virus,
    Modeler,
    Engineer,
    Dormant,
}

/// The six combat stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Physical attack.
    pub physical_attack: u32,
    /// Physical defense.
    pub physical_defense: u32,
    /// Magic attack.
    pub magic_attack: u32,
    /// Magic defense.
    pub magic_defense: u32,
    /// Mana pool.
    pub mana: u32,
    /// Attacks per second.
    pub attack_speed: f32,
}

/// Static definition of a minion from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionDef {
    /// Unique display name; also the exclusion key for drafts.
    pub name: String,
    /// Avatar glyph.
    pub glyph: String,
    /// Family.
    pub kind: MinionType,
    /// Role.
    pub specialization: Specialization,
    /// Draft rarity.
    pub rarity: Rarity,
    /// Combat stats.
    pub stats: CombatStats,
    /// Maximum health.
    pub health: u32,
}

/// A minion instance in a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Minion {
    /// Instance id.
    pub id: MinionId,
    /// Catalog definition.
    pub def: MinionDef,
    /// Current health.
    pub health: u32,
    /// Owning player; `None` while offered in a draft.
    pub owner: Option<PlayerId>,
    /// Token node representing the minion in the scene tree.
    pub token: NodeId,
}

impl Minion {
    /// Instantiate a definition at full health.
    #[must_use]
    pub fn from_def(def: MinionDef, owner: Option<PlayerId>, token: NodeId) -> Self {
        Self {
            id: MinionId::new(),
            health: def.health,
            def,
            owner,
            token,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.def.health
    }
}

/// A participant in the match.
#[derive(Debug, Clone)]
pub struct Player {
    /// Seat.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Accent color for cards and slots.
    pub color: Color,
    /// Owned minions in acquisition order.
    pub minions: Vec<MinionId>,
    /// Reserve slot nodes, left to right.
    pub reserve: Vec<NodeId>,
    /// Board cell nodes, left to right.
    pub board: Vec<NodeId>,
    health: u32,
    max_health: u32,
}

impl Player {
    /// Create a player at full health with no minions or slots.
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        avatar: impl Into<String>,
        color: Color,
        max_health: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            avatar: avatar.into(),
            color,
            minions: Vec::new(),
            reserve: Vec::new(),
            board: Vec::new(),
            health: max_health,
            max_health,
        }
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Check if health reached zero.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Subtract damage, floored at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.health);
        self.health -= taken;
        taken
    }

    /// Take ownership of `minion` and seat its `token` in the first empty
    /// reserve slot.
    ///
    /// Returns the slot used, or `None` when the reserve is full; the token
    /// then stays unplaced.
    ///
    /// # Errors
    ///
    /// Returns an error if a slot or the token handle is stale.
    pub fn add_minion<C>(
        &mut self,
        tree: &mut SceneTree<C>,
        minion: MinionId,
        token: NodeId,
    ) -> ArenaResult<Option<NodeId>> {
        if !self.minions.contains(&minion) {
            self.minions.push(minion);
        }
        let free = self
            .reserve
            .iter()
            .copied()
            .find(|&slot| tree.slot(slot).is_some_and(|s| !s.is_occupied()));
        match free {
            Some(slot) => {
                tree.attach(slot, token)?;
                Ok(Some(slot))
            }
            None => {
                tracing::debug!(player = %self.id, %minion, "reserve full, minion left unplaced");
                Ok(None)
            }
        }
    }

    /// Number of occupied reserve slots.
    #[must_use]
    pub fn reserve_occupancy<C>(&self, tree: &SceneTree<C>) -> usize {
        self.reserve
            .iter()
            .filter(|&&slot| tree.slot(slot).is_some_and(Slot::is_occupied))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{SceneNode, SlotKind};

    fn player_with_reserve(tree: &mut SceneTree<()>, slots: usize) -> Player {
        let mut player = Player::new(PlayerId::ONE, "player", "🐵", Color::from("blue"), 1000);
        for i in 0..slots {
            let slot = tree.insert(
                SceneNode::new(format!("reserve-{i}"))
                    .with_slot(Slot::new(SlotKind::Reserve, Some(PlayerId::ONE))),
            );
            player.reserve.push(slot);
        }
        player
    }

    #[test]
    fn fourth_minion_is_left_unplaced() {
        let mut tree = SceneTree::<()>::new();
        let mut player = player_with_reserve(&mut tree, 3);

        let mut placements = Vec::new();
        let mut tokens = Vec::new();
        for i in 0..4 {
            let token = tree.insert(SceneNode::new(format!("token-{i}")));
            tokens.push(token);
            placements.push(player.add_minion(&mut tree, MinionId::new(), token).expect("add"));
        }

        assert_eq!(&placements[..3], &[Some(player.reserve[0]), Some(player.reserve[1]), Some(player.reserve[2])]);
        assert_eq!(placements[3], None);
        assert_eq!(player.reserve_occupancy(&tree), 3);
        assert_eq!(tree.parent(tokens[3]), None);
        assert_eq!(player.minions.len(), 4);
        for &slot in &player.reserve {
            assert_eq!(tree.children(slot).len(), 1);
        }
    }

    #[test]
    fn damage_is_floored_at_zero() {
        let mut player = Player::new(PlayerId::TWO, "computer", "🐷", Color::from("red"), 100);
        assert_eq!(player.take_damage(30), 30);
        assert_eq!(player.take_damage(500), 70);
        assert_eq!(player.health(), 0);
        assert!(player.is_defeated());
    }

    #[test]
    fn opponent_flips_seat() {
        assert_eq!(PlayerId::ONE.opponent(), PlayerId::TWO);
        assert_eq!(PlayerId::TWO.opponent(), PlayerId::ONE);
    }
}
