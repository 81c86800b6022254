//! Property-based tests for scoring and the state codec.

use proptest::prelude::*;

use yatzy_advisor::constants::*;
use yatzy_advisor::game_mechanics::calculate_category_score;
use yatzy_advisor::score_domains::score_domains;
use yatzy_advisor::state_codec::{decode, encode, DecodeError, EncodeError, StateId};
use yatzy_advisor::types::{Category, Dice, GameState};

/// Strategy: generate a valid dice array (each die 1-6).
fn dice_strategy() -> impl Strategy<Value = Dice> {
    prop::array::uniform5(1..=6u8)
}

fn category_strategy() -> impl Strategy<Value = Category> {
    (0..CATEGORY_COUNT).prop_map(|i| Category::ALL[i])
}

/// Strategy: any syntactically valid game state. Each slot picks uniformly
/// among `[unset] ++ domain`.
fn state_strategy() -> impl Strategy<Value = GameState> {
    (
        dice_strategy(),
        0..=MAX_REROLLS,
        prop::array::uniform15(any::<u32>()),
    )
        .prop_map(|(dice, rerolls_left, raw)| {
            let domains = score_domains();
            let mut state = GameState {
                dice,
                rerolls_left,
                ..GameState::default()
            };
            for c in Category::ALL {
                let symbols = domains.domain(c).len() + 1;
                let index = raw[c.index()] as usize % symbols;
                state.set_score(c, domains.slot_at(c, index).unwrap());
            }
            state
        })
}

proptest! {
    // 1. Every valid state round-trips
    #[test]
    fn codec_round_trip(state in state_strategy()) {
        let id = encode(&state).unwrap();
        prop_assert_eq!(decode(id), Ok(state));
    }

    // 2. Text form is canonical: no leading zero, parses back to the same id
    #[test]
    fn text_form_canonical(state in state_strategy()) {
        let id = encode(&state).unwrap();
        let text = id.to_string();
        prop_assert!(!text.starts_with('0'), "text={text}");
        prop_assert!(text.len() <= 16);
        prop_assert_eq!(text.parse::<StateId>(), Ok(id));
    }

    // 3. Any bit above the 64-bit layout is rejected
    #[test]
    fn trailing_bits_rejected(state in state_strategy(), bit in 64u32..128) {
        let id = encode(&state).unwrap();
        let forged = StateId::new(id.value() | (1u128 << bit));
        prop_assert_eq!(decode(forged), Err(DecodeError::TrailingBits));
    }

    // 4. Decoding is injective: whatever decodes re-encodes to the same id
    #[test]
    fn decode_then_encode(raw in any::<u64>()) {
        let id = StateId::new(raw as u128);
        if let Ok(state) = decode(id) {
            prop_assert_eq!(encode(&state), Ok(id));
        }
    }

    // 5. encode fails exactly when a score is outside its domain
    #[test]
    fn domain_completeness(cat in category_strategy(), score in any::<u8>()) {
        let mut state = GameState::default();
        state.set_score(cat, Some(score));
        let legal = score_domains().contains(cat, score);
        match encode(&state) {
            Ok(_) => {
                prop_assert!(legal, "{cat}={score} encoded");
            }
            Err(err) => {
                prop_assert!(!legal);
                prop_assert_eq!(err, EncodeError::DomainViolation { category: cat, score });
            }
        }
    }

    // 6. Scores land in the category's domain
    #[test]
    fn score_in_domain(dice in dice_strategy(), cat in category_strategy()) {
        let score = calculate_category_score(&dice, cat);
        prop_assert!(score_domains().contains(cat, score), "{cat}={score} for {dice:?}");
    }

    // 7. Scoring ignores dice order
    #[test]
    fn score_order_independent(dice in dice_strategy(), cat in category_strategy()) {
        let mut sorted = dice;
        sorted.sort_unstable();
        prop_assert_eq!(
            calculate_category_score(&dice, cat),
            calculate_category_score(&sorted, cat)
        );
    }

    // 8. Five identical dice always score 50 for Yatzy
    #[test]
    fn yatzy_five_of_a_kind(face in 1..=6u8) {
        prop_assert_eq!(calculate_category_score(&[face; 5], Category::Yatzy), 50);
    }
}
