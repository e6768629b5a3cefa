//! Match phases and the combat and pick-order policies.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Player, PlayerId};

/// Phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Intro scene, waiting for the start button.
    Intro,
    /// Countdown running, minions may be rearranged.
    Placement,
    /// Single resolution step.
    Combat,
    /// Players pick from offered minions.
    Draft,
    /// A player reached zero health; reset pending.
    MatchOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Intro => "intro",
            Self::Placement => "placement",
            Self::Combat => "combat",
            Self::Draft => "draft",
            Self::MatchOver => "match over",
        };
        f.write_str(name)
    }
}

/// Damage policy for a combat step: a uniform fraction of the target's
/// maximum health in `[min_fraction, max_fraction)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatPolicy {
    /// Inclusive lower bound.
    pub min_fraction: f64,
    /// Exclusive upper bound.
    pub max_fraction: f64,
}

impl Default for CombatPolicy {
    fn default() -> Self {
        Self {
            min_fraction: 0.06,
            max_fraction: 0.16,
        }
    }
}

/// What a combat step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Player that took damage.
    pub target: PlayerId,
    /// Damage actually applied.
    pub damage: u32,
    /// Whether the target reached zero health.
    pub defeated: bool,
}

/// Pick a player uniformly at random and apply
/// `floor(max_health * U[min, max))` damage, floored at zero health.
pub fn resolve_combat<R: Rng + ?Sized>(
    rng: &mut R,
    players: &mut [Player; 2],
    policy: CombatPolicy,
) -> CombatOutcome {
    let target = PlayerId(rng.gen_range(0..2));
    let fraction = if policy.min_fraction < policy.max_fraction {
        rng.gen_range(policy.min_fraction..policy.max_fraction)
    } else {
        policy.min_fraction
    };
    let player = &mut players[target.index()];
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rolled = (f64::from(player.max_health()) * fraction).floor() as u32;
    let damage = player.take_damage(rolled);
    CombatOutcome {
        target,
        damage,
        defeated: player.is_defeated(),
    }
}

/// Draft pick order: the player with less health first, seat 1 on a tie.
#[must_use]
pub fn draft_order(players: &[Player; 2]) -> [PlayerId; 2] {
    if players[0].health() <= players[1].health() {
        [PlayerId::ONE, PlayerId::TWO]
    } else {
        [PlayerId::TWO, PlayerId::ONE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn players(h1: u32, h2: u32) -> [Player; 2] {
        let mut p1 = Player::new(PlayerId::ONE, "a", "A", Color::from("blue"), 1000);
        let mut p2 = Player::new(PlayerId::TWO, "b", "B", Color::from("red"), 1000);
        p1.take_damage(1000 - h1);
        p2.take_damage(1000 - h2);
        [p1, p2]
    }

    #[test]
    fn damage_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let mut ps = players(1000, 1000);
            let outcome = resolve_combat(&mut rng, &mut ps, CombatPolicy::default());
            assert!((60..160).contains(&outcome.damage), "damage {}", outcome.damage);
            assert_eq!(
                ps[outcome.target.index()].health(),
                1000 - outcome.damage
            );
            assert_eq!(ps[outcome.target.opponent().index()].health(), 1000);
            assert!(!outcome.defeated);
        }
    }

    #[test]
    fn lethal_damage_floors_at_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ps = players(10, 10);
        let outcome = resolve_combat(&mut rng, &mut ps, CombatPolicy::default());
        assert!(outcome.defeated);
        assert_eq!(outcome.damage, 10);
        assert_eq!(ps[outcome.target.index()].health(), 0);
    }

    #[test]
    fn lower_health_picks_first_with_tie_to_seat_one() {
        assert_eq!(draft_order(&players(500, 900)), [PlayerId::ONE, PlayerId::TWO]);
        assert_eq!(draft_order(&players(900, 500)), [PlayerId::TWO, PlayerId::ONE]);
        assert_eq!(draft_order(&players(700, 700)), [PlayerId::ONE, PlayerId::TWO]);
    }
}
