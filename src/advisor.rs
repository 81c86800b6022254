//! Client side of the advisory engine: the service that, given a state,
//! answers with the rational next actions.
//!
//! ## Wire contract
//!
//! Request: `GET <base_url>?dice=d0,d1,d2,d3,d4&rerolls_left=r&ones=…&…&yatzy=…`
//! with each category carrying its score or the literal `empty`.
//!
//! Response: a JSON array whose items are either
//! `{"choice": "select_combo", "combo": "<category>"}` or
//! `{"choice": "reroll", "dice": [faces…]}`. An object with an `errors`
//! field is an explicit failure. Parsing is all-or-nothing: one bad item
//! makes the whole answer unusable.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::constants::*;
use crate::types::{Category, Choice, Dice, GameState, ScoreSlot};

/// Marker sent for a category that has not been scored yet.
pub const EMPTY_SLOT_MARKER: &str = "empty";

/// Why the engine's answer could not be used.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory engine request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("advisory engine answered with HTTP {0}")]
    Status(u16),
    #[error("advisory engine reported errors: {}", .0.join("; "))]
    Errors(Vec<String>),
    #[error("malformed advisory response: {0}")]
    Malformed(String),
}

/// Everything the engine needs to know about a state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisoryRequest {
    pub dice: Dice,
    pub rerolls_left: u8,
    pub scores: [ScoreSlot; CATEGORY_COUNT],
}

impl From<&GameState> for AdvisoryRequest {
    fn from(state: &GameState) -> Self {
        Self {
            dice: state.dice,
            rerolls_left: state.rerolls_left,
            scores: state.scores,
        }
    }
}

impl AdvisoryRequest {
    /// Query parameters in the order the engine documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let dice = self
            .dice
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut pairs = Vec::with_capacity(2 + CATEGORY_COUNT);
        pairs.push(("dice", dice));
        pairs.push(("rerolls_left", self.rerolls_left.to_string()));
        for category in Category::ALL {
            let value = match self.scores[category.index()] {
                Some(score) => score.to_string(),
                None => EMPTY_SLOT_MARKER.to_string(),
            };
            pairs.push((category.name(), value));
        }
        pairs
    }
}

/// Source of choices for a non-terminal state.
#[async_trait]
pub trait AdvisoryEngine: Send + Sync {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<Vec<Choice>, AdvisoryError>;
}

/// Validate a decoded engine response body.
pub fn parse_advisory_response(body: &serde_json::Value) -> Result<Vec<Choice>, AdvisoryError> {
    if let Some(errors) = body.get("errors") {
        let messages = match errors {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                .collect(),
            other => vec![other.to_string()],
        };
        return Err(AdvisoryError::Errors(messages));
    }

    let items = body
        .as_array()
        .ok_or_else(|| AdvisoryError::Malformed("expected a JSON array".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(AdvisoryError::Malformed(format!("item {i}: expected an object")));
            }
            let choice = Choice::deserialize(item)
                .map_err(|e| AdvisoryError::Malformed(format!("item {i}: {e}")))?;
            if !choice.is_well_formed() {
                return Err(AdvisoryError::Malformed(format!(
                    "item {i}: reroll must name 1-5 faces in 1..=6"
                )));
            }
            Ok(choice)
        })
        .collect()
}

/// Advisory engine reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpAdvisoryEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAdvisoryEngine {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AdvisoryEngine for HttpAdvisoryEngine {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<Vec<Choice>, AdvisoryError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        parse_advisory_response(&body)
    }
}
