use super::key::CacheKey;
use dashmap::DashMap;
use geodns_domain::RRset;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct CachedEntry {
    rrset: RRset,
    expires_at: Instant,
}

/// TTL-bounded store of policy answers.
///
/// Expiry is measured on the monotonic clock. Entries are never evicted to
/// make room: once `max_entries` is reached new answers are simply not
/// stored until the purge task has removed expired ones.
///
/// Every [`clear`](Self::clear) starts a new generation; answers computed
/// under an older generation are refused by
/// [`insert_for_generation`](Self::insert_for_generation).
pub struct ResponseCache {
    entries: DashMap<CacheKey, CachedEntry, FxBuildHasher>,
    max_entries: usize,
    generation: AtomicU64,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            max_entries,
            generation: AtomicU64::new(0),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Returns the stored RRset, TTL untouched, while it is still valid.
    pub fn get(&self, key: &CacheKey) -> Option<RRset> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.rrset.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    /// Stores `rrset` for its own TTL. Returns `false` when nothing was
    /// stored: a zero TTL, or the cache is full.
    pub fn insert(&self, key: CacheKey, rrset: &RRset) -> bool {
        if rrset.ttl == 0 {
            return false;
        }
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            debug!(max_entries = self.max_entries, "Response cache full, skipping insert");
            return false;
        }

        let expires_at = Instant::now() + Duration::from_secs(u64::from(rrset.ttl));
        self.entries.insert(
            key,
            CachedEntry {
                rrset: rrset.clone(),
                expires_at,
            },
        );
        true
    }

    /// Like [`insert`](Self::insert), but only while the cache is still at
    /// `generation`. A clear racing with the store wins: the entry is taken
    /// back out if the generation moved on meanwhile.
    pub fn insert_for_generation(&self, key: CacheKey, rrset: &RRset, generation: u64) -> bool {
        if self.generation() != generation {
            return false;
        }
        if !self.insert(key.clone(), rrset) {
            return false;
        }
        if self.generation() != generation {
            self.entries.remove(&key);
            return false;
        }
        true
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Drops every entry and refuses answers computed before the call.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spawns the periodic purge; it stops when `shutdown` is cancelled.
    pub fn spawn_purge_task(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            debug!(removed, remaining = cache.len(), "Response cache purged");
                        }
                    }
                }
            }
        })
    }
}
