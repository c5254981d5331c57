use super::key::CacheKey;
use super::storage::ResponseCache;
use async_trait::async_trait;
use dashmap::DashMap;
use geodns_application::ports::RRsetPolicy;
use geodns_domain::{DomainError, GeoInfo, RRset, RecordType};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

type InflightResult = Arc<Result<RRset, DomainError>>;
type InflightSender = Arc<watch::Sender<Option<InflightResult>>>;
type InflightMap = DashMap<CacheKey, InflightSender, FxBuildHasher>;

/// Owns the leader's in-flight slot. Publishing releases it; dropping the
/// guard unpublished (leader cancelled) wakes followers with `None` so they
/// retry.
struct InflightLeaderGuard {
    inflight: Arc<InflightMap>,
    key: CacheKey,
    published: bool,
}

impl InflightLeaderGuard {
    fn publish(mut self, result: InflightResult) {
        if let Some((_, tx)) = self.inflight.remove(&self.key) {
            let _ = tx.send(Some(result));
        }
        self.published = true;
    }
}

impl Drop for InflightLeaderGuard {
    fn drop(&mut self) {
        if self.published {
            return;
        }
        if let Some((_, tx)) = self.inflight.remove(&self.key) {
            let _ = tx.send(None);
        }
    }
}

/// Caching decorator for any [`RRsetPolicy`].
///
/// Concurrent misses on the same key share a single call to the inner
/// policy. Successful answers are cached for their TTL; errors are handed
/// to the waiting followers but never stored.
pub struct CachedRRsetPolicy {
    inner: Arc<dyn RRsetPolicy>,
    cache: Arc<ResponseCache>,
    inflight: Arc<InflightMap>,
}

impl CachedRRsetPolicy {
    pub fn new(inner: Arc<dyn RRsetPolicy>, cache: Arc<ResponseCache>) -> Self {
        Self {
            inner,
            cache,
            inflight: Arc::new(DashMap::with_hasher(FxBuildHasher)),
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    fn register_or_join_inflight(
        &self,
        key: &CacheKey,
    ) -> (bool, watch::Receiver<Option<InflightResult>>) {
        match self.inflight.entry(key.clone()) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                (false, rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, rx) = watch::channel(None::<InflightResult>);
                e.insert(Arc::new(tx));
                (true, rx)
            }
        }
    }

    async fn select_as_follower(
        &self,
        name: &str,
        record_type: RecordType,
        geo: &GeoInfo,
        mut rx: watch::Receiver<Option<InflightResult>>,
    ) -> Result<RRset, DomainError> {
        let _ = rx.changed().await;

        let published = rx.borrow().clone();
        if let Some(result) = published {
            debug!(domain = %name, record_type = %record_type, "Joined in-flight policy lookup");
            return (*result).clone();
        }

        // leader dropped without publishing
        self.select(name, record_type, geo).await
    }

    async fn select_as_leader(
        &self,
        name: &str,
        record_type: RecordType,
        geo: &GeoInfo,
        key: CacheKey,
    ) -> Result<RRset, DomainError> {
        let guard = InflightLeaderGuard {
            inflight: Arc::clone(&self.inflight),
            key: key.clone(),
            published: false,
        };

        debug!(domain = %name, record_type = %record_type, geo = %geo, "Cache MISS");

        // answers computed across a clear must not be stored
        let generation = self.cache.generation();
        let result = self.inner.select(name, record_type, geo).await;

        if let Ok(rrset) = &result {
            if !self.cache.insert_for_generation(key, rrset, generation) {
                debug!(domain = %name, record_type = %record_type, "Answer not cached");
            }
        }

        guard.publish(Arc::new(result.clone()));
        result
    }
}

#[async_trait]
impl RRsetPolicy for CachedRRsetPolicy {
    async fn select(
        &self,
        name: &str,
        record_type: RecordType,
        geo: &GeoInfo,
    ) -> Result<RRset, DomainError> {
        let key = CacheKey::new(name, record_type, geo);

        if let Some(rrset) = self.cache.get(&key) {
            debug!(domain = %name, record_type = %record_type, geo = %geo, "Cache HIT");
            return Ok(rrset);
        }

        let (is_leader, rx) = self.register_or_join_inflight(&key);
        if !is_leader {
            return self.select_as_follower(name, record_type, geo, rx).await;
        }

        self.select_as_leader(name, record_type, geo, key).await
    }
}
