//! Match configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::draft::RarityWeights;
use crate::error::{ArenaError, ArenaResult};
use crate::surface::Color;

/// Identity and starting roster of one seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,
    /// Avatar glyph.
    pub avatar: String,
    /// Accent color.
    pub color: Color,
    /// Catalog names of the starting minions, seated in reserve order.
    pub starting_minions: Vec<String>,
}

/// Every tunable of a match.
///
/// All fields have defaults, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Seat 1 (human) and seat 2 (computer).
    pub players: [PlayerConfig; 2],
    /// Starting and maximum player health.
    pub starting_health: u32,
    /// Reserve slots per player.
    pub reserve_size: usize,
    /// Board cells per player.
    pub board_size: usize,
    /// Reserve slots per player inside the draft scene.
    pub draft_reserve_size: usize,
    /// Placement countdown in milliseconds.
    pub placement_ms: u64,
    /// Lower bound of the combat damage fraction.
    pub damage_min_fraction: f64,
    /// Upper bound (exclusive) of the combat damage fraction.
    pub damage_max_fraction: f64,
    /// Minions offered per draft.
    pub offer_count: usize,
    /// Picks a player may make before the turn passes.
    pub picks_per_turn: usize,
    /// Draft weights per rarity.
    pub rarity_weights: RarityWeights,
    /// Frame instants kept for the frame rate estimate.
    pub stats_capacity: usize,
    /// Delay between a player's defeat and the match reset, in milliseconds.
    pub reset_delay_ms: u64,
    /// Seed for combat and draft randomness; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            players: [
                PlayerConfig {
                    name: "player".to_string(),
                    avatar: "🐵".to_string(),
                    color: Color::from("#2f80ed"),
                    starting_minions: vec!["Fuzzy".into(), "Boole".into(), "Proof".into()],
                },
                PlayerConfig {
                    name: "computer".to_string(),
                    avatar: "🐷".to_string(),
                    color: Color::from("#eb5757"),
                    starting_minions: vec!["Truth".into(), "Regression".into(), "Divide and Conquer".into()],
                },
            ],
            starting_health: 1000,
            reserve_size: 3,
            board_size: 3,
            draft_reserve_size: 7,
            placement_ms: 10_000,
            damage_min_fraction: 0.06,
            damage_max_fraction: 0.16,
            offer_count: 3,
            picks_per_turn: 1,
            rarity_weights: RarityWeights::default(),
            stats_capacity: 99,
            reset_delay_ms: 3_000,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Serialization`] for malformed JSON and
    /// [`ArenaError::InvalidConfig`] if validation fails.
    pub fn from_json(json: &str) -> ArenaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ArenaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the values are usable for a match.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> ArenaResult<()> {
        let invalid = |msg: String| Err(ArenaError::InvalidConfig(msg));

        if !(self.width > 0.0 && self.height > 0.0) {
            return invalid(format!("viewport {}x{} must be positive", self.width, self.height));
        }
        if self.starting_health == 0 {
            return invalid("starting_health must be positive".into());
        }
        if self.reserve_size == 0 || self.board_size == 0 {
            return invalid("reserve_size and board_size must be positive".into());
        }
        if self.draft_reserve_size < self.reserve_size + self.board_size {
            return invalid(format!(
                "draft_reserve_size {} cannot hold {} reserve and {} board minions",
                self.draft_reserve_size, self.reserve_size, self.board_size
            ));
        }
        let (min, max) = (self.damage_min_fraction, self.damage_max_fraction);
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min >= max {
            return invalid(format!("damage range [{min}, {max}) is empty or outside [0, 1]"));
        }
        if self.picks_per_turn == 0 {
            return invalid("picks_per_turn must be positive".into());
        }
        if self.stats_capacity < 2 {
            return invalid("stats_capacity must hold at least two frames".into());
        }
        for player in &self.players {
            if let Some(unknown) = player
                .starting_minions
                .iter()
                .find(|name| catalog::find(name).is_none())
            {
                return invalid(format!("{} starts with unknown minion {unknown:?}", player.name));
            }
        }
        Ok(())
    }

    /// Placement countdown length.
    #[must_use]
    pub const fn placement_duration(&self) -> Duration {
        Duration::from_millis(self.placement_ms)
    }

    /// Delay before a finished match resets.
    #[must_use]
    pub const fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}
