//! # Yatzy Advisor: stateless game sessions with cached advice
//!
//! A Scandinavian Yatzy game in progress (five dice, rerolls left, fifteen
//! score slots) is packed into one integer, the *state id*, whose lowercase
//! hex form can travel in a URL. No session store is needed: every request
//! carries its whole game.
//!
//! For states that still have open categories, the legal next actions come
//! from an external advisory engine. Its answers are memoized in a bounded,
//! least-recently-used [`choice_cache::ChoiceCache`].
//!
//! | Concern | Module |
//! |---------|--------|
//! | Scoring rules | [`game_mechanics`] |
//! | Legal score sets and slot widths | [`score_domains`] |
//! | State id packing | [`state_codec`] |
//! | Engine contract and HTTP client | [`advisor`] |
//! | Memoization | [`choice_cache`] |
//! | HTTP surface | [`server`] |
//!
//! ## Example
//!
//! ```
//! use yatzy_advisor::state_codec::{decode, encode};
//! use yatzy_advisor::types::GameState;
//!
//! let state = GameState::default();
//! let id = encode(&state).unwrap();
//! assert_eq!(id.to_string(), "29cb000000000000");
//! assert_eq!(decode(id).unwrap(), state);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod advisor;
pub mod choice_cache;
pub mod constants;
pub mod dice_mechanics;
pub mod env_config;
pub mod game_mechanics;
pub mod score_domains;
pub mod server;
pub mod state_codec;
pub mod types;
