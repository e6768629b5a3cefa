//! Weighted draft selection without replacement.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{MinionDef, Rarity};

/// Relative draw weight per rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityWeights {
    /// Weight of [`Rarity::Common`].
    pub common: u32,
    /// Weight of [`Rarity::Rare`].
    pub rare: u32,
    /// Weight of [`Rarity::Epic`].
    pub epic: u32,
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: 10,
            rare: 4,
            epic: 1,
        }
    }
}

impl RarityWeights {
    /// Weight for a tier.
    #[must_use]
    pub const fn weight(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
        }
    }
}

/// Picks draft offers from a pool of definitions.
#[derive(Debug, Clone, Default)]
pub struct DraftSelector {
    weights: RarityWeights,
}

impl DraftSelector {
    /// Selector with the given weights.
    #[must_use]
    pub const fn new(weights: RarityWeights) -> Self {
        Self { weights }
    }

    /// Configured weights.
    #[must_use]
    pub const fn weights(&self) -> RarityWeights {
        self.weights
    }

    /// Draw up to `count` distinct definitions from `pool`, skipping names in
    /// `excluded`.
    ///
    /// Each draw takes a uniform integer below the total remaining weight and
    /// walks the eligible entries in pool order, picking the first whose
    /// running weight exceeds it. Picked entries leave the pool. The result
    /// is shorter than `count` once no entry with positive weight remains.
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        pool: &'a [MinionDef],
        excluded: &HashSet<&str>,
    ) -> Vec<&'a MinionDef> {
        let mut candidates: Vec<(&'a MinionDef, u64)> = pool
            .iter()
            .filter(|def| !excluded.contains(def.name.as_str()))
            .map(|def| (def, u64::from(self.weights.weight(def.rarity))))
            .filter(|&(_, weight)| weight > 0)
            .collect();

        let target = count.min(candidates.len());
        let mut picked = Vec::with_capacity(target);
        while picked.len() < target {
            let total: u64 = candidates.iter().map(|&(_, w)| w).sum();
            if total == 0 {
                break;
            }
            let roll = rng.gen_range(0..total);
            let mut running = 0;
            let Some(index) = candidates.iter().position(|&(_, weight)| {
                running += weight;
                running > roll
            }) else {
                break;
            };
            let (def, _) = candidates.remove(index);
            picked.push(def);
        }

        if picked.len() < count {
            tracing::debug!(requested = count, drawn = picked.len(), "draft pool exhausted");
        }
        picked
    }
}
