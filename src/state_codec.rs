//! Bijective packing of a [`GameState`] into a single integer state id.
//!
//! ## Layout (most significant field first)
//!
//! | Field | Bits | Stored value |
//! |-------|------|--------------|
//! | die_0 .. die_4 | 3 each | raw face 1..=6 |
//! | rerolls_left | 2 | raw 0..=2 |
//! | ones .. yatzy | per [`ScoreDomains::width`] | index into `[unset] ++ domain` |
//!
//! Encoding shifts each field in from the right; decoding peels fields off
//! the low end in reverse order. The layout is 64 bits wide and ids are held
//! in a `u128`, so any id carrying bits above the layout is representable and
//! is rejected by [`decode`] instead of being silently truncated.
//!
//! The text form of an id is minimal lowercase hex. Parsing is strict: the
//! only accepted spelling of a number is the one [`StateId`]'s `Display`
//! produces.

use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::dice_mechanics::is_valid_die;
use crate::score_domains::{score_domains, ScoreDomains};
use crate::types::{Category, GameState};

/// Opaque identifier of a complete game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u128);

impl StateId {
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u128 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::LowerHex for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// The id text is not canonical lowercase hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateIdParseError {
    #[error("state id is empty")]
    Empty,
    #[error("state id must be lowercase hexadecimal")]
    NotLowerHex,
    #[error("state id has a leading zero")]
    LeadingZero,
    #[error("state id is too wide to name any state")]
    TooWide,
}

impl FromStr for StateId {
    type Err = StateIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(StateIdParseError::Empty);
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(StateIdParseError::NotLowerHex);
        }
        if s.len() > 1 && s.starts_with('0') {
            return Err(StateIdParseError::LeadingZero);
        }
        u128::from_str_radix(s, 16)
            .map(StateId)
            .map_err(|_| StateIdParseError::TooWide)
    }
}

/// The caller handed [`encode`] a state that is not a legal game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("die {position} has face {value}, expected 1..=6")]
    InvalidDie { position: usize, value: u8 },
    #[error("rerolls_left is {0}, expected 0..=2")]
    InvalidRerolls(u8),
    #[error("{score} is not a possible score for {category}")]
    DomainViolation { category: Category, score: u8 },
}

/// The id does not name any game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("slot index {index} out of range for {category}")]
    InvalidCategoryIndex { category: Category, index: u128 },
    #[error("rerolls_left field is {0}, expected 0..=2")]
    InvalidRerolls(u128),
    #[error("die {position} field is {value}, expected 1..=6")]
    InvalidDie { position: usize, value: u128 },
    #[error("state id has bits beyond the packed layout")]
    TrailingBits,
}

/// Failure to turn id text into a state. Both kinds mean "no such state".
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Malformed(#[from] StateIdParseError),
    #[error(transparent)]
    Invalid(#[from] DecodeError),
}

/// Pack `state` into its id.
pub fn encode(state: &GameState) -> Result<StateId, EncodeError> {
    encode_with(score_domains(), state)
}

/// Unpack an id produced by [`encode`].
pub fn decode(id: StateId) -> Result<GameState, DecodeError> {
    decode_with(score_domains(), id)
}

/// Parse canonical id text and decode it.
pub fn resolve(text: &str) -> Result<(StateId, GameState), ResolveError> {
    let id: StateId = text.parse()?;
    let state = decode(id)?;
    Ok((id, state))
}

pub fn encode_with(domains: &ScoreDomains, state: &GameState) -> Result<StateId, EncodeError> {
    let mut value: u128 = 0;

    for (position, &die) in state.dice.iter().enumerate() {
        if !is_valid_die(die) {
            return Err(EncodeError::InvalidDie { position, value: die });
        }
        value = (value << DIE_BITS) | die as u128;
    }

    if state.rerolls_left > MAX_REROLLS {
        return Err(EncodeError::InvalidRerolls(state.rerolls_left));
    }
    value = (value << REROLLS_BITS) | state.rerolls_left as u128;

    for category in Category::ALL {
        let slot = state.score(category);
        let index = domains
            .slot_index(category, slot)
            .ok_or(EncodeError::DomainViolation {
                category,
                score: slot.unwrap_or_default(),
            })?;
        value = (value << domains.width(category)) | index as u128;
    }

    Ok(StateId(value))
}

pub fn decode_with(domains: &ScoreDomains, id: StateId) -> Result<GameState, DecodeError> {
    let mut value = id.0;
    let mut scores = [None; CATEGORY_COUNT];

    for category in Category::ALL.into_iter().rev() {
        let index = take_bits(&mut value, domains.width(category));
        scores[category.index()] = domains
            .slot_at(category, index as usize)
            .ok_or(DecodeError::InvalidCategoryIndex { category, index })?;
    }

    let rerolls_left = take_bits(&mut value, REROLLS_BITS);
    if rerolls_left > MAX_REROLLS as u128 {
        return Err(DecodeError::InvalidRerolls(rerolls_left));
    }

    let mut dice = [0; DICE_COUNT];
    for position in (0..DICE_COUNT).rev() {
        let face = take_bits(&mut value, DIE_BITS);
        if face == 0 || face > MAX_FACE as u128 {
            return Err(DecodeError::InvalidDie { position, value: face });
        }
        dice[position] = face as u8;
    }

    if value != 0 {
        return Err(DecodeError::TrailingBits);
    }

    Ok(GameState {
        dice,
        rerolls_left: rerolls_left as u8,
        scores,
    })
}

/// Remove and return the low `width` bits of `value`.
#[inline(always)]
fn take_bits(value: &mut u128, width: u32) -> u128 {
    let field = *value & ((1u128 << width) - 1);
    *value >>= width;
    field
}
