//! Game constants and fixed codec field widths.
//!
//! Category indices follow the scorecard order ones → yatzy. That order is
//! also the packing order of the state codec, so it must never change.

/// Number of scoring categories in Scandinavian Yatzy (Ones through Yatzy).
pub const CATEGORY_COUNT: usize = 15;

/// Number of dice in a hand.
pub const DICE_COUNT: usize = 5;

/// Number of distinct sorted 5-dice multisets from {1..6}: C(10,5) = 252.
pub const NUM_DICE_SETS: usize = 252;

/// Highest face value of a die.
pub const MAX_FACE: u8 = 6;

/// Rerolls available at the start of a turn.
pub const MAX_REROLLS: u8 = 2;

/// Bits per die field: ceil(log2(7)), faces 1..=6 stored raw.
pub const DIE_BITS: u32 = 3;

/// Bits for the rerolls field: ceil(log2(3)), values 0..=2 stored raw.
pub const REROLLS_BITS: u32 = 2;

/// Default number of cached choice lists.
pub const DEFAULT_CHOICE_CACHE_CAPACITY: usize = 1000;

/// Wire names, used as query parameter keys and JSON field names.
pub const CATEGORY_NAMES: [&str; CATEGORY_COUNT] = [
    "ones",
    "twos",
    "threes",
    "fours",
    "fives",
    "sixes",
    "one_pair",
    "two_pairs",
    "three_of_a_kind",
    "four_of_a_kind",
    "small_straight",
    "large_straight",
    "full_house",
    "chance",
    "yatzy",
];
