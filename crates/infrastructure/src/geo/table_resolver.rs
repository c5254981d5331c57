use super::reserved::is_reserved;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use geodns_application::ports::GeoResolver;
use geodns_domain::config::{GeoConfig, GeoNetworkEntry};
use geodns_domain::{DomainError, GeoInfo};
use ipnetwork::IpNetwork;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;

/// CIDR table kept ordered from most to least specific, so the first
/// containing network is the longest-prefix match.
#[derive(Debug, Default)]
pub struct GeoTable {
    networks: Vec<(IpNetwork, GeoInfo)>,
}

impl GeoTable {
    pub fn from_entries(entries: &[GeoNetworkEntry]) -> Result<Self, DomainError> {
        let mut networks = Vec::with_capacity(entries.len());

        for entry in entries {
            let network: IpNetwork = entry.cidr.parse().map_err(|e| {
                DomainError::ConfigError(format!("Invalid geo CIDR {}: {}", entry.cidr, e))
            })?;
            networks.push((network, entry.to_geo_info()));
        }

        // stable: equal prefixes keep declaration order
        networks.sort_by(|(a, _), (b, _)| b.prefix().cmp(&a.prefix()));

        Ok(Self { networks })
    }

    pub fn lookup(&self, address: IpAddr) -> Option<&GeoInfo> {
        self.networks
            .iter()
            .find(|(network, _)| network.contains(address))
            .map(|(_, geo)| geo)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

/// In-memory geo database with a hot-swappable table.
///
/// Reserved addresses and addresses outside every configured network
/// resolve to [`GeoInfo::unknown`]; lookups never fail.
pub struct TableGeoResolver {
    table: ArcSwap<GeoTable>,
}

impl TableGeoResolver {
    pub fn new(table: GeoTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    pub fn from_config(config: &GeoConfig) -> Result<Self, DomainError> {
        Ok(Self::new(GeoTable::from_entries(&config.networks)?))
    }

    /// Swaps in a new table; lookups already running keep the old one.
    pub fn reload(&self, table: GeoTable) {
        let networks = table.len();
        self.table.store(Arc::new(table));
        info!(networks, "Geo table reloaded");
    }

    pub fn lookup(&self, address: IpAddr) -> GeoInfo {
        let address = address.to_canonical();
        if is_reserved(address) {
            return GeoInfo::unknown();
        }
        self.table
            .load()
            .lookup(address)
            .cloned()
            .unwrap_or_else(GeoInfo::unknown)
    }
}

#[async_trait]
impl GeoResolver for TableGeoResolver {
    async fn resolve(&self, address: IpAddr) -> Result<GeoInfo, DomainError> {
        Ok(self.lookup(address))
    }
}
