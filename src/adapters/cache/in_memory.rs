//! In-memory analysis cache.
//!
//! Bounded by entry count and entry age. Lives and dies with the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::risk::RiskResult;
use crate::ports::{AnalysisCache, CacheKey};

/// Process-local cache with TTL expiry and oldest-first eviction.
#[derive(Debug, Clone)]
pub struct InMemoryAnalysisCache {
    capacity: usize,
    ttl: Duration,
    state: Arc<RwLock<CacheState>>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Insertion counter; lower means older.
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: RiskResult,
    inserted_at: Instant,
    seq: u64,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= ttl
    }
}

impl InMemoryAnalysisCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            state: Arc::new(RwLock::new(CacheState::default())),
        }
    }

    fn purge_expired(&self, state: &mut CacheState, now: Instant) {
        let ttl = self.ttl;
        state.entries.retain(|_, entry| !entry.is_expired(ttl, now));
    }
}

#[async_trait]
impl AnalysisCache for InMemoryAnalysisCache {
    async fn get(&self, key: &CacheKey) -> Option<RiskResult> {
        let now = Instant::now();
        {
            let state = self.state.read().await;
            match state.entries.get(key) {
                Some(entry) if !entry.is_expired(self.ttl, now) => {
                    return Some(entry.result.clone().into_cached());
                }
                None => return None,
                Some(_) => {}
            }
        }

        // Expired: take the write lock and clean up.
        let mut state = self.state.write().await;
        self.purge_expired(&mut state, now);
        None
    }

    async fn put(&self, key: CacheKey, result: RiskResult) {
        let now = Instant::now();
        let mut state = self.state.write().await;
        self.purge_expired(&mut state, now);

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: now,
                seq,
            },
        );
    }

    async fn len(&self) -> usize {
        let now = Instant::now();
        let state = self.state.read().await;
        state
            .entries
            .values()
            .filter(|entry| !entry.is_expired(self.ttl, now))
            .count()
    }
}

/// Cache that never stores anything, used when caching is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalysisCache;

#[async_trait]
impl AnalysisCache for NoopAnalysisCache {
    async fn get(&self, _key: &CacheKey) -> Option<RiskResult> {
        None
    }

    async fn put(&self, _key: CacheKey, _result: RiskResult) {}

    async fn len(&self) -> usize {
        0
    }
}
