//! Environment configuration for the server binary.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `YATZY_PORT` | 9000 |
//! | `YATZY_ADVISOR_URL` | `http://127.0.0.1:54460/` |
//! | `YATZY_ADVISOR_TIMEOUT_SECS` | 10 |
//! | `YATZY_CHOICE_CACHE_CAPACITY` | 1000 |
//!
//! Unset or unparseable values fall back to the default.

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::DEFAULT_CHOICE_CACHE_CAPACITY;

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_ADVISOR_URL: &str = "http://127.0.0.1:54460/";
pub const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 10;

/// Parse `raw` as `T`, or fall back to `default`.
fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

fn read(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read `YATZY_PORT` (default 9000).
pub fn server_port() -> u16 {
    parse_or(read("YATZY_PORT"), DEFAULT_PORT)
}

/// Read `YATZY_ADVISOR_URL`.
pub fn advisor_url() -> String {
    read("YATZY_ADVISOR_URL")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADVISOR_URL.to_string())
}

/// Read `YATZY_ADVISOR_TIMEOUT_SECS` (default 10).
pub fn advisor_timeout() -> Duration {
    Duration::from_secs(parse_or(
        read("YATZY_ADVISOR_TIMEOUT_SECS"),
        DEFAULT_ADVISOR_TIMEOUT_SECS,
    ))
}

/// Read `YATZY_CHOICE_CACHE_CAPACITY` (default 1000). Zero is not a capacity.
pub fn choice_cache_capacity() -> NonZeroUsize {
    cache_capacity_from(read("YATZY_CHOICE_CACHE_CAPACITY"))
}

fn cache_capacity_from(raw: Option<String>) -> NonZeroUsize {
    let fallback = NonZeroUsize::new(DEFAULT_CHOICE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
    parse_or(raw, fallback)
}
