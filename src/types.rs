use serde::{Deserialize, Serialize};

use crate::constants::*;

/// One die face, 1..=6.
pub type Die = u8;

/// Five dice in the order the player entered them. Order is part of the
/// state identity; scoring never depends on it.
pub type Dice = [Die; DICE_COUNT];

/// A scorecard slot: `None` while the category is still open.
pub type ScoreSlot = Option<u8>;

/// The 15 Scandinavian Yatzy scoring categories, in scorecard order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    OnePair,
    TwoPairs,
    ThreeOfAKind,
    FourOfAKind,
    SmallStraight,
    LargeStraight,
    FullHouse,
    Chance,
    Yatzy,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::OnePair,
        Category::TwoPairs,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::FullHouse,
        Category::Chance,
        Category::Yatzy,
    ];

    /// Position on the scorecard (0 = Ones, 14 = Yatzy).
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        CATEGORY_NAMES[self.index()]
    }

    pub fn from_name(name: &str) -> Option<Category> {
        CATEGORY_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| Self::ALL[i])
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete snapshot of a single-player game between two actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    pub dice: Dice,
    pub rerolls_left: u8,
    pub scores: [ScoreSlot; CATEGORY_COUNT],
}

impl Default for GameState {
    /// Fresh scorecard, dice `[1, 2, 3, 4, 5]`, both rerolls available.
    fn default() -> Self {
        Self {
            dice: [1, 2, 3, 4, 5],
            rerolls_left: MAX_REROLLS,
            scores: [None; CATEGORY_COUNT],
        }
    }
}

impl GameState {
    #[inline(always)]
    pub fn score(&self, category: Category) -> ScoreSlot {
        self.scores[category.index()]
    }

    pub fn set_score(&mut self, category: Category, slot: ScoreSlot) {
        self.scores[category.index()] = slot;
    }

    /// A game is over once every category has been scored.
    pub fn is_ended(&self) -> bool {
        self.scores.iter().all(Option::is_some)
    }
}

/// An action suggested by the advisory engine.
///
/// `Reroll` carries the face values exactly as the engine sent them. Whether
/// they denote dice to keep or dice to throw is the engine's convention; this
/// crate passes them through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum Choice {
    SelectCombo { combo: Category },
    Reroll { dice: Vec<Die> },
}

impl Choice {
    /// Shape check for engine payloads: a reroll names 1–5 faces in 1..=6.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Choice::SelectCombo { .. } => true,
            Choice::Reroll { dice } => {
                (1..=DICE_COUNT).contains(&dice.len())
                    && dice.iter().all(|&d| (1..=MAX_FACE).contains(&d))
            }
        }
    }
}
