//! Yatzy scoring rules: f_C(dice) for all 15 Scandinavian Yatzy categories.
//!
//! Every rule works on face counts, so the result is independent of dice
//! order. Where several faces qualify, the highest face wins: faces are
//! scanned 6 → 1 and the first match is returned.

use crate::dice_mechanics::count_faces;
use crate::types::{Category, Dice};

/// Score `dice` in `category`. Dice must hold faces in 1..=6.
pub fn calculate_category_score(dice: &Dice, category: Category) -> u8 {
    let face_count = count_faces(dice);
    let sum_all: u8 = dice.iter().sum();

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = (category.index() + 1) as u8;
            face_count[face as usize] * face
        }
        Category::OnePair => n_of_a_kind_score(&face_count, 2),
        Category::TwoPairs => {
            let mut pairs = [0u8; 2];
            let mut pcount = 0;
            for f in (1..=6).rev() {
                if face_count[f] >= 2 {
                    pairs[pcount] = f as u8;
                    pcount += 1;
                    if pcount == 2 {
                        break;
                    }
                }
            }
            if pcount == 2 {
                2 * pairs[0] + 2 * pairs[1]
            } else {
                0
            }
        }
        Category::ThreeOfAKind => n_of_a_kind_score(&face_count, 3),
        Category::FourOfAKind => n_of_a_kind_score(&face_count, 4),
        Category::SmallStraight => {
            if (1..=5).all(|f| face_count[f] == 1) {
                15
            } else {
                0
            }
        }
        Category::LargeStraight => {
            if (2..=6).all(|f| face_count[f] == 1) {
                20
            } else {
                0
            }
        }
        Category::FullHouse => {
            let three = (1..=6).rev().find(|&f| face_count[f] == 3);
            let pair = (1..=6).rev().find(|&f| face_count[f] == 2);
            match (three, pair) {
                (Some(three), Some(pair)) => 3 * three as u8 + 2 * pair as u8,
                _ => 0,
            }
        }
        Category::Chance => sum_all,
        Category::Yatzy => {
            if face_count.iter().any(|&n| n == 5) {
                50
            } else {
                0
            }
        }
    }
}

/// Scoring helper for N-of-a-kind categories.
/// Returns highest_face * n if any face appears >= n times, else 0.
fn n_of_a_kind_score(face_count: &[u8; 7], n: u8) -> u8 {
    for face in (1..=6).rev() {
        if face_count[face] >= n {
            return face as u8 * n;
        }
    }
    0
}
