//! Remote resource loading primitives
//!
//! Screens fetch one primary resource (detail payload, search results) and
//! zero or more secondary resources (watch providers, membership flags).
//! `FetchState` tracks the primary resource's lifecycle, `Loader` discards
//! results whose triggering key is no longer current, and `Debouncer`
//! collapses rapid search keystrokes into a single fetch.

use std::time::{Duration, Instant};

// =============================================================================
// Fetch State
// =============================================================================

/// Lifecycle of a screen's primary resource
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing requested yet
    Idle,
    /// Fetch in flight
    Pending,
    /// Primary payload available
    Ready(T),
    /// Primary fetch failed; secondary failures never land here
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            FetchState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Stale-Result Guard
// =============================================================================

/// Handle for one dispatched fetch, tagged with the key and generation that
/// were current at dispatch time. Travels with the spawned task and comes
/// back attached to its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Tracks which identifier a screen is currently loading for.
///
/// Every `begin` bumps the generation, invalidating all previously issued
/// tickets; a late result for an old key fails `accept` and must be dropped.
/// Last key wins, no merge of stale and fresh results.
#[derive(Debug, Default)]
pub struct Loader<K> {
    current: Option<K>,
    generation: u64,
}

impl<K: Clone + PartialEq> Loader<K> {
    pub fn new() -> Self {
        Self {
            current: None,
            generation: 0,
        }
    }

    /// Start loading for `key`, invalidating any in-flight fetch
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.current = Some(key.clone());
        Ticket {
            key,
            generation: self.generation,
        }
    }

    /// True iff the ticket belongs to the most recent `begin`
    pub fn accept(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.generation
    }

    /// Invalidate in-flight fetches without starting a new one
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }
}

// =============================================================================
// Search Debounce
// =============================================================================

/// Quiet period before a search query is acted on
pub const SEARCH_DEBOUNCE: Duration = Duration::from_secs(1);

/// Queries must be longer than this many characters to trigger a fetch
pub const MIN_QUERY_LEN: usize = 4;

/// What to do once a debounced query comes due
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceAction {
    /// Issue exactly one fetch for the final query value
    Fetch(String),
    /// Query too short: clear results, no network call
    Clear,
}

/// Collapses rapid query edits into one action after a quiet period.
///
/// Driven by the UI tick: call `input` on every keystroke and `poll` on
/// every tick; `poll` yields at most one action per quiet period.
#[derive(Debug)]
pub struct Debouncer {
    pending: Option<(String, Instant)>,
    quiet: Duration,
    min_len: usize,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debouncer {
    pub fn new() -> Self {
        Self::with(SEARCH_DEBOUNCE, MIN_QUERY_LEN)
    }

    pub fn with(quiet: Duration, min_len: usize) -> Self {
        Self {
            pending: None,
            quiet,
            min_len,
        }
    }

    /// Record a query edit; restarts the quiet period
    pub fn input(&mut self, query: &str, now: Instant) {
        self.pending = Some((query.to_string(), now));
    }

    /// Yield the due action, if the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<DebounceAction> {
        let (_, at) = self.pending.as_ref()?;
        if now.duration_since(*at) < self.quiet {
            return None;
        }

        let (query, _) = self.pending.take()?;
        if query.chars().count() > self.min_len {
            Some(DebounceAction::Fetch(query))
        } else {
            Some(DebounceAction::Clear)
        }
    }

    /// Drop any pending query without acting on it
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
