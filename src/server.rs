//! Axum HTTP server: stateless game sessions addressed by state id.
//!
//! The whole game lives in the URL. Submitting the scorecard form packs it
//! into an id and redirects there; fetching an id unpacks the state and, for
//! games still in progress, attaches the advisory engine's choices through
//! the shared [`ChoiceCache`].
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check plus cache counters |
//! | GET | `/` | Build a state from form fields, 307 to `/{state_id}` |
//! | GET | `/{state_id}` | State fields and choices; 404 for unknown ids |

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::choice_cache::{ChoiceCache, ChoicesError};
use crate::constants::*;
use crate::score_domains::score_domains;
use crate::state_codec::{encode, resolve, StateId};
use crate::types::{Category, Dice, GameState};

pub type AppState = Arc<ChoiceCache>;

type ErrorResponse = (StatusCode, Json<Value>);

pub fn create_router(cache: Arc<ChoiceCache>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_new_state))
        .route("/health", get(handle_health_check))
        .route("/{state_id}", get(handle_get_state))
        .layer(cors)
        .with_state(cache)
}

fn error_response(status: StatusCode, msg: &str) -> ErrorResponse {
    (status, Json(json!({ "error": msg })))
}

// ── Form parsing ────────────────────────────────────────────────────

/// First value submitted for `key`.
fn first<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// All `dice` fields joined, as exactly five digits 1-6.
fn parse_dice(params: &[(String, String)]) -> Option<Dice> {
    let joined: String = params
        .iter()
        .filter(|(k, _)| k == "dice")
        .map(|(_, v)| v.as_str())
        .collect();
    let bytes = joined.as_bytes();
    if bytes.len() != DICE_COUNT || !bytes.iter().all(|b| (b'1'..=b'6').contains(b)) {
        return None;
    }
    let mut dice = [0; DICE_COUNT];
    for (d, b) in dice.iter_mut().zip(bytes) {
        *d = b - b'0';
    }
    Some(dice)
}

fn parse_rerolls(params: &[(String, String)]) -> Option<u8> {
    match first(params, "rerolls_left")? {
        "0" => Some(0),
        "1" => Some(1),
        "2" => Some(2),
        _ => None,
    }
}

/// A category value counts only when it is spelled exactly like a domain
/// member; anything else leaves the category open.
fn parse_score(params: &[(String, String)], category: Category) -> Option<u8> {
    let raw = first(params, category.name())?;
    score_domains()
        .domain(category)
        .iter()
        .copied()
        .find(|score| score.to_string() == raw)
}

/// Build a state from form fields, substituting defaults for anything
/// missing or invalid.
pub fn state_from_form(params: &[(String, String)]) -> GameState {
    let defaults = GameState::default();
    let mut state = GameState {
        dice: parse_dice(params).unwrap_or(defaults.dice),
        rerolls_left: parse_rerolls(params).unwrap_or(defaults.rerolls_left),
        ..defaults
    };
    for category in Category::ALL {
        state.set_score(category, parse_score(params, category));
    }
    state
}

fn state_json(id: StateId, state: &GameState) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("state_id".to_string(), json!(id.to_string()));
    body.insert("dice".to_string(), json!(state.dice));
    body.insert("rerolls_left".to_string(), json!(state.rerolls_left));
    for category in Category::ALL {
        body.insert(category.name().to_string(), json!(state.score(category)));
    }
    body.insert("ended".to_string(), json!(state.is_ended()));
    body
}

// ── Handlers ────────────────────────────────────────────────────────

async fn handle_health_check(State(cache): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "OK", "cache": cache.stats() }))
}

async fn handle_new_state(
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Redirect, ErrorResponse> {
    let state = state_from_form(&params);
    match encode(&state) {
        Ok(id) => Ok(Redirect::temporary(&format!("/{id}"))),
        Err(err) => {
            error!(error = %err, ?state, "form produced an unencodable state");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not encode state",
            ))
        }
    }
}

async fn handle_get_state(
    State(cache): State<AppState>,
    Path(state_id): Path<String>,
) -> Result<Json<Value>, ErrorResponse> {
    let (id, state) = match resolve(&state_id) {
        Ok(resolved) => resolved,
        Err(err) => {
            debug!(%state_id, error = %err, "unknown state id");
            return Err(error_response(StatusCode::NOT_FOUND, "state not found"));
        }
    };

    let mut body = state_json(id, &state);
    match cache.get_or_compute(&state).await {
        Ok(choices) => {
            body.insert("choices".to_string(), json!(&*choices));
        }
        // Terminal states have no choices; engine failures were logged by the cache.
        Err(ChoicesError::GameEnded) | Err(ChoicesError::Unavailable(_)) => {}
    }

    Ok(Json(Value::Object(body)))
}
