//! Bounded memo of advisory engine answers, keyed by game state.
//!
//! Entries are ordered by last touch: a hit promotes the entry, an insert
//! puts it at the front, and once the cache is over capacity the single
//! least recently touched entry is dropped. Failed lookups are never
//! stored, so the next request for the same state asks the engine again.
//!
//! The lock is only held for the synchronous map operations, never across
//! the engine call. Two requests missing on the same key may therefore both
//! reach the engine; whichever finishes last owns the entry. The engine is
//! deterministic for a fixed state, so both answers are the same.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::advisor::{AdvisoryEngine, AdvisoryError, AdvisoryRequest};
use crate::constants::*;
use crate::types::{Choice, Dice, GameState, ScoreSlot};

/// Cache identity of a state that still has open categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    dice: Dice,
    rerolls_left: u8,
    scores: [ScoreSlot; CATEGORY_COUNT],
}

impl CacheKey {
    /// `None` for a finished game: terminal states have nothing to ask.
    pub fn for_state(state: &GameState) -> Option<Self> {
        if state.is_ended() {
            return None;
        }
        Some(Self {
            dice: state.dice,
            rerolls_left: state.rerolls_left,
            scores: state.scores,
        })
    }
}

impl fmt::Display for CacheKey {
    /// `dice:rerolls:slot:…:slot`, open slots left blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.dice {
            write!(f, "{d}")?;
        }
        write!(f, ":{}", self.rerolls_left)?;
        for slot in self.scores {
            match slot {
                Some(score) => write!(f, ":{score}")?,
                None => f.write_str(":")?,
            }
        }
        Ok(())
    }
}

/// Why no choices could be produced.
#[derive(Debug, thiserror::Error)]
pub enum ChoicesError {
    #[error("game has ended")]
    GameEnded,
    #[error("choices unavailable: {0}")]
    Unavailable(#[from] AdvisoryError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

pub struct ChoiceCache {
    entries: Mutex<LruCache<CacheKey, Arc<[Choice]>>>,
    engine: Arc<dyn AdvisoryEngine>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ChoiceCache {
    pub fn new(engine: Arc<dyn AdvisoryEngine>, capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            engine,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Choices for `state`, from the cache or from the engine.
    pub async fn get_or_compute(&self, state: &GameState) -> Result<Arc<[Choice]>, ChoicesError> {
        let key = CacheKey::for_state(state).ok_or(ChoicesError::GameEnded)?;

        if let Some(choices) = self.lookup(&key) {
            return Ok(choices);
        }

        let request = AdvisoryRequest::from(state);
        let choices: Arc<[Choice]> = match self.engine.advise(&request).await {
            Ok(choices) => choices.into(),
            Err(err) => {
                warn!(key = %key, error = %err, "advisory engine unavailable");
                return Err(err.into());
            }
        };

        self.store(key, Arc::clone(&choices));
        Ok(choices)
    }

    /// Whether `state` has a cached entry. Does not promote.
    pub fn contains(&self, state: &GameState) -> bool {
        CacheKey::for_state(state).is_some_and(|key| self.entries.lock().contains(&key))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        let (entries, capacity) = {
            let map = self.entries.lock();
            (map.len(), map.cap().get())
        };
        CacheStats {
            entries,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<[Choice]>> {
        let found = self.entries.lock().get(key).cloned();
        match found {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "choice cache hit");
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "choice cache miss");
            }
        }
        found
    }

    fn store(&self, key: CacheKey, choices: Arc<[Choice]>) {
        let displaced = self.entries.lock().push(key, choices);
        // push hands back either the replaced value for `key` or an evicted entry.
        if let Some((old_key, _)) = displaced {
            if old_key != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(evicted = %old_key, "choice cache eviction");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Engine answering every state with "score chance", counting calls.
    #[derive(Default)]
    struct CountingEngine {
        calls: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
    }

    impl CountingEngine {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AdvisoryEngine for CountingEngine {
        async fn advise(&self, request: &AdvisoryRequest) -> Result<Vec<Choice>, AdvisoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AdvisoryError::Errors(vec!["engine offline".to_string()]));
            }
            Ok(vec![
                Choice::SelectCombo { combo: Category::Chance },
                Choice::Reroll { dice: request.dice[..2].to_vec() },
            ])
        }
    }

    fn cache_with(capacity: usize) -> (ChoiceCache, Arc<CountingEngine>) {
        let engine = Arc::new(CountingEngine::default());
        let cache = ChoiceCache::new(engine.clone(), NonZeroUsize::new(capacity).unwrap());
        (cache, engine)
    }

    /// Distinct open states: vary dice and one score.
    fn nth_state(n: usize) -> GameState {
        let mut state = GameState {
            dice: [
                (n % 6) as u8 + 1,
                (n / 6 % 6) as u8 + 1,
                (n / 36 % 6) as u8 + 1,
                1,
                1,
            ],
            rerolls_left: 0,
            ..GameState::default()
        };
        state.set_score(Category::Ones, Some((n / 216 % 6) as u8));
        state
    }

    #[test]
    fn test_cache_key_display() {
        let mut state = GameState::default();
        state.set_score(Category::Twos, Some(4));
        let key = CacheKey::for_state(&state).unwrap();
        assert_eq!(key.to_string(), "12345:2::4:::::::::::::");
    }

    #[test]
    fn test_cache_key_distinguishes_unset_from_zero() {
        let open = GameState::default();
        let mut zero = open;
        zero.set_score(Category::Yatzy, Some(0));
        assert_ne!(CacheKey::for_state(&open), CacheKey::for_state(&zero));
    }

    #[test]
    fn test_no_key_for_ended_game() {
        let mut state = GameState::default();
        for c in Category::ALL {
            state.set_score(c, Some(0));
        }
        assert_eq!(CacheKey::for_state(&state), None);
    }

    #[tokio::test]
    async fn test_hit_skips_engine() {
        let (cache, engine) = cache_with(4);
        let state = GameState::default();

        let first = cache.get_or_compute(&state).await.unwrap();
        assert_eq!(engine.calls(), 1);
        let second = cache.get_or_compute(&state).await.unwrap();
        assert_eq!(engine.calls(), 1);
        assert_eq!(first, second);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_ended_game_never_reaches_engine() {
        let (cache, engine) = cache_with(4);
        let mut state = GameState::default();
        for c in Category::ALL {
            state.set_score(c, Some(0));
        }
        assert!(matches!(
            cache.get_or_compute(&state).await,
            Err(ChoicesError::GameEnded)
        ));
        assert_eq!(engine.calls(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_one_keeps_latest() {
        let (cache, engine) = cache_with(1);
        assert_eq!(cache.capacity(), 1);
        for n in [0, 1, 1, 0] {
            cache.get_or_compute(&nth_state(n)).await.unwrap();
        }
        assert_eq!(engine.calls(), 3);
        let stats = cache.stats();
        assert_eq!(stats.capacity, cache.capacity());
        assert_eq!(
            (stats.entries, stats.hits, stats.misses, stats.evictions),
            (1, 1, 3, 2)
        );
        assert!(cache.contains(&nth_state(0)));
        assert!(!cache.contains(&nth_state(1)));
    }

    #[tokio::test]
    async fn test_evicts_least_recently_touched() {
        let (cache, engine) = cache_with(3);
        for n in 0..4 {
            cache.get_or_compute(&nth_state(n)).await.unwrap();
        }
        assert_eq!(engine.calls(), 4);
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&nth_state(0)));
        assert_eq!(cache.stats().evictions, 1);

        // Refetching the evicted state costs an engine call.
        cache.get_or_compute(&nth_state(0)).await.unwrap();
        assert_eq!(engine.calls(), 5);
    }

    #[tokio::test]
    async fn test_hit_promotes_entry() {
        let (cache, engine) = cache_with(3);
        for n in 0..3 {
            cache.get_or_compute(&nth_state(n)).await.unwrap();
        }
        // Touch 0 so that 1 becomes the oldest.
        cache.get_or_compute(&nth_state(0)).await.unwrap();
        cache.get_or_compute(&nth_state(3)).await.unwrap();

        assert!(cache.contains(&nth_state(0)));
        assert!(!cache.contains(&nth_state(1)));
        assert!(cache.contains(&nth_state(2)));
        assert!(cache.contains(&nth_state(3)));
        assert_eq!(engine.calls(), 4);
    }

    #[tokio::test]
    async fn test_failure_not_cached() {
        let (cache, engine) = cache_with(3);
        let state = GameState::default();

        engine.fail.store(true, Ordering::SeqCst);
        assert!(matches!(
            cache.get_or_compute(&state).await,
            Err(ChoicesError::Unavailable(AdvisoryError::Errors(_)))
        ));
        assert!(cache.is_empty());

        engine.fail.store(false, Ordering::SeqCst);
        assert!(cache.get_or_compute(&state).await.is_ok());
        assert_eq!(engine.calls(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_leave_one_entry() {
        let (cache, engine) = cache_with(3);
        let cache = Arc::new(cache);
        let state = GameState::default();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_or_compute(&state).await.map(|c| c.len()) })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 2);
        }

        assert_eq!(cache.len(), 1);
        assert!(engine.calls() >= 1 && engine.calls() <= 8);
        assert_eq!(cache.stats().evictions, 0);
    }
}
