//! Per-user login accumulation
//!
//! An accumulate-then-query structure: [`LoginAggregator::record`]
//! grows counters and history monotonically, the query methods return
//! read-only views. Querying mid-ingestion is allowed and simply
//! reflects the events recorded so far.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{LoginEvent, Outcome};

/// Number of history entries shown per user by the default report
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Counters and history for one username
#[derive(Debug, Clone, Default)]
pub struct UserStats {
    pub success_count: usize,
    pub failure_count: usize,
    /// Append-only during ingestion; discovery order, not time order
    pub history: Vec<LoginEvent>,
}

/// Aggregates login events per username
#[derive(Debug, Default)]
pub struct LoginAggregator {
    stats: HashMap<String, UserStats>,
    /// Usernames in first-seen order; HashMap iteration order is
    /// arbitrary and the report must be deterministic
    seen_order: Vec<String>,
}

impl LoginAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified event under its username.
    ///
    /// Lazily creates the [`UserStats`] entry the first time a
    /// username is seen. Amortized O(1).
    pub fn record(&mut self, event: LoginEvent) {
        let stats = match self.stats.entry(event.username.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.seen_order.push(event.username.clone());
                entry.insert(UserStats::default())
            }
        };

        match event.outcome {
            Outcome::Success => stats.success_count += 1,
            Outcome::Failure => stats.failure_count += 1,
        }
        stats.history.push(event);
    }

    /// Up to `limit` most recent events for `username`, most recent
    /// first. Events with equal timestamps keep their insertion order.
    pub fn recent_history(&self, username: &str, limit: usize) -> Vec<&LoginEvent> {
        let mut events = self.history_refs(username);
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(limit);
        events
    }

    /// The entire history for `username`, oldest first. Events with
    /// equal timestamps keep their insertion order.
    pub fn full_history_sorted(&self, username: &str) -> Vec<&LoginEvent> {
        let mut events = self.history_refs(username);
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        events
    }

    /// Usernames in the order they were first recorded
    pub fn all_users(&self) -> &[String] {
        &self.seen_order
    }

    /// Stats for one username, if any event was recorded for it
    pub fn stats(&self, username: &str) -> Option<&UserStats> {
        self.stats.get(username)
    }

    pub fn is_empty(&self) -> bool {
        self.seen_order.is_empty()
    }

    fn history_refs(&self, username: &str) -> Vec<&LoginEvent> {
        self.stats
            .get(username)
            .map(|stats| stats.history.iter().collect())
            .unwrap_or_default()
    }
}
