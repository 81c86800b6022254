use crate::constants::*;
use crate::types::{Dice, Die};

/// Count occurrences of each face (1-6) in a 5-dice hand.
/// face_count[0] is unused; face_count[f] = count of face f.
pub fn count_faces(dice: &Dice) -> [u8; 7] {
    let mut face_count = [0u8; 7];
    for &d in dice {
        face_count[d as usize] += 1;
    }
    face_count
}

#[inline(always)]
pub fn is_valid_die(die: Die) -> bool {
    (1..=MAX_FACE).contains(&die)
}

/// Enumerate all C(10,5) = 252 sorted 5-dice multisets.
///
/// Every scoring function depends only on face counts, so this covers the
/// range of each category over all 6^5 ordered rolls.
pub fn all_dice_sets() -> Vec<Dice> {
    let mut sets = Vec::with_capacity(NUM_DICE_SETS);
    for a in 1..=MAX_FACE {
        for b in a..=MAX_FACE {
            for c in b..=MAX_FACE {
                for d in c..=MAX_FACE {
                    for e in d..=MAX_FACE {
                        sets.push([a, b, c, d, e]);
                    }
                }
            }
        }
    }
    sets
}
