//! Per-category value domains and the codec bit widths derived from them.
//!
//! A domain is the sorted set of every score a category can take, 0
//! included. It is derived from [`calculate_category_score`] over all 252
//! dice multisets rather than written out by hand, so the codec can never
//! drift from the scoring rules.
//!
//! | Category | Domain size | Slot bits |
//! |----------|-------------|-----------|
//! | ones … sixes | 6 | 3 |
//! | one_pair, three/four_of_a_kind | 7 | 3 |
//! | two_pairs | 10 | 4 |
//! | small/large_straight, yatzy | 2 | 2 |
//! | full_house | 21 | 5 |
//! | chance | 27 | 5 |
//!
//! A slot stores an index into `[unset] ++ domain`, hence `domain_size + 1`
//! symbols per slot.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::constants::*;
use crate::dice_mechanics::all_dice_sets;
use crate::game_mechanics::calculate_category_score;
use crate::types::{Category, ScoreSlot};

/// Smallest bit count able to hold `symbols` distinct values: ceil(log2(symbols)).
pub const fn bit_width(symbols: usize) -> u32 {
    if symbols <= 1 {
        0
    } else {
        usize::BITS - (symbols - 1).leading_zeros()
    }
}

/// Score domains and slot widths for all 15 categories.
#[derive(Debug)]
pub struct ScoreDomains {
    values: [Vec<u8>; CATEGORY_COUNT],
    widths: [u32; CATEGORY_COUNT],
}

static SCORE_DOMAINS: OnceLock<ScoreDomains> = OnceLock::new();

/// Process-wide domain table, built on first use.
pub fn score_domains() -> &'static ScoreDomains {
    SCORE_DOMAINS.get_or_init(ScoreDomains::build)
}

impl ScoreDomains {
    pub fn build() -> Self {
        let dice_sets = all_dice_sets();
        let values: [Vec<u8>; CATEGORY_COUNT] = std::array::from_fn(|i| {
            let category = Category::ALL[i];
            let mut seen = BTreeSet::from([0u8]);
            seen.extend(dice_sets.iter().map(|d| calculate_category_score(d, category)));
            seen.into_iter().collect()
        });
        let widths = std::array::from_fn(|i| bit_width(values[i].len() + 1));
        Self { values, widths }
    }

    /// Strictly increasing legal scores for `category`, starting at 0.
    pub fn domain(&self, category: Category) -> &[u8] {
        &self.values[category.index()]
    }

    /// Bits used by the slot field of `category`.
    #[inline(always)]
    pub fn width(&self, category: Category) -> u32 {
        self.widths[category.index()]
    }

    pub fn contains(&self, category: Category, score: u8) -> bool {
        self.domain(category).contains(&score)
    }

    /// Position of `slot` in `[unset] ++ domain`, or `None` if the score is
    /// not a legal value for the category.
    pub fn slot_index(&self, category: Category, slot: ScoreSlot) -> Option<usize> {
        match slot {
            None => Some(0),
            Some(score) => self
                .domain(category)
                .iter()
                .position(|&v| v == score)
                .map(|i| i + 1),
        }
    }

    /// Inverse of [`slot_index`](Self::slot_index). `None` when `index`
    /// exceeds the domain size.
    pub fn slot_at(&self, category: Category, index: usize) -> Option<ScoreSlot> {
        match index {
            0 => Some(None),
            i => self.domain(category).get(i - 1).map(|&v| Some(v)),
        }
    }

    /// Total width of a packed state: dice, rerolls and all slots.
    pub fn total_bits(&self) -> u32 {
        DICE_COUNT as u32 * DIE_BITS + REROLLS_BITS + self.widths.iter().sum::<u32>()
    }
}
