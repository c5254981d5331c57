use geodns_application::ports::{GeoResolver, RRsetPolicy};
use geodns_application::use_cases::HandleDnsQueryUseCase;
use geodns_domain::config::{BackendKind, CacheConfig, GeoConfig, PolicyConfig};
use geodns_domain::Config;
use geodns_infrastructure::dns::{CachedRRsetPolicy, ResponseCache};
use geodns_infrastructure::geo::{GeoTable, StaticGeoResolver, TableGeoResolver};
use geodns_infrastructure::policy::{PolicyTable, StaticRRsetPolicy, TableRRsetPolicy};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct DnsServices {
    pub use_case: Arc<HandleDnsQueryUseCase>,
    cache: Option<Arc<ResponseCache>>,
    geo_table: Option<Arc<TableGeoResolver>>,
    policy_table: Option<Arc<TableRRsetPolicy>>,
}

impl DnsServices {
    pub fn new(config: &Config, shutdown: &CancellationToken) -> anyhow::Result<Self> {
        info!(
            geo_backend = ?config.geo.backend,
            policy_backend = ?config.policy.backend,
            cache_enabled = config.cache.enabled,
            "Initializing DNS services"
        );

        let (geo, geo_table) = Self::build_geo_resolver(&config.geo)?;
        let (policy, policy_table) = Self::build_policy(&config.policy)?;
        let (policy, cache) = Self::wrap_with_cache(policy, &config.cache, shutdown);

        let use_case = Arc::new(HandleDnsQueryUseCase::new(geo, policy));

        Ok(Self {
            use_case,
            cache,
            geo_table,
            policy_table,
        })
    }

    /// Swaps in the tables from a freshly loaded config. Backend kinds are
    /// fixed at startup; switching between `static` and `table` needs a
    /// restart.
    pub fn reload(&self, config: &Config) -> anyhow::Result<()> {
        // build everything first so a bad table leaves the old ones serving
        let geo = match (&self.geo_table, config.geo.backend) {
            (Some(resolver), BackendKind::Table) => {
                Some((resolver, GeoTable::from_entries(&config.geo.networks)?))
            }
            (Some(_), BackendKind::Static) | (None, BackendKind::Table) => {
                warn!("Geo backend kind changed; restart required to apply");
                None
            }
            (None, BackendKind::Static) => None,
        };

        let policy = match (&self.policy_table, config.policy.backend) {
            (Some(policy), BackendKind::Table) => {
                Some((policy, PolicyTable::from_records(&config.policy.records)?))
            }
            (Some(_), BackendKind::Static) | (None, BackendKind::Table) => {
                warn!("Policy backend kind changed; restart required to apply");
                None
            }
            (None, BackendKind::Static) => None,
        };

        if let Some((resolver, table)) = geo {
            resolver.reload(table);
        }
        if let Some((policy, table)) = policy {
            policy.reload(table);
        }

        // cached answers may come from the previous tables
        if let Some(cache) = &self.cache {
            cache.clear();
        }

        Ok(())
    }

    fn build_geo_resolver(
        config: &GeoConfig,
    ) -> anyhow::Result<(Arc<dyn GeoResolver>, Option<Arc<TableGeoResolver>>)> {
        match config.backend {
            BackendKind::Static => {
                info!(geo = %config.fixed.to_geo_info(), "Using static geo resolver");
                let resolver: Arc<dyn GeoResolver> =
                    Arc::new(StaticGeoResolver::from_config(config));
                Ok((resolver, None))
            }
            BackendKind::Table => {
                let resolver = Arc::new(TableGeoResolver::from_config(config)?);
                info!(networks = config.networks.len(), "Using table geo resolver");
                let shared: Arc<dyn GeoResolver> = resolver.clone();
                Ok((shared, Some(resolver)))
            }
        }
    }

    fn build_policy(
        config: &PolicyConfig,
    ) -> anyhow::Result<(Arc<dyn RRsetPolicy>, Option<Arc<TableRRsetPolicy>>)> {
        match config.backend {
            BackendKind::Static => {
                info!("Using static RRset policy");
                let policy: Arc<dyn RRsetPolicy> =
                    Arc::new(StaticRRsetPolicy::from_config(config));
                Ok((policy, None))
            }
            BackendKind::Table => {
                let policy = Arc::new(TableRRsetPolicy::from_config(config)?);
                info!(records = config.records.len(), "Using table RRset policy");
                let shared: Arc<dyn RRsetPolicy> = policy.clone();
                Ok((shared, Some(policy)))
            }
        }
    }

    fn wrap_with_cache(
        policy: Arc<dyn RRsetPolicy>,
        config: &CacheConfig,
        shutdown: &CancellationToken,
    ) -> (Arc<dyn RRsetPolicy>, Option<Arc<ResponseCache>>) {
        if !config.enabled {
            return (policy, None);
        }

        let cache = Arc::new(ResponseCache::new(config.max_entries));
        cache.spawn_purge_task(
            Duration::from_secs(config.purge_interval_secs),
            shutdown.clone(),
        );

        info!(
            max_entries = config.max_entries,
            purge_interval_secs = config.purge_interval_secs,
            "Response cache enabled"
        );

        let cached: Arc<dyn RRsetPolicy> =
            Arc::new(CachedRRsetPolicy::new(policy, Arc::clone(&cache)));
        (cached, Some(cache))
    }
}
