use async_trait::async_trait;
use geodns_application::ports::GeoResolver;
use geodns_domain::config::GeoConfig;
use geodns_domain::{DomainError, GeoInfo};
use std::net::IpAddr;

/// Answers every address with the same GeoInfo.
pub struct StaticGeoResolver {
    geo: GeoInfo,
}

impl StaticGeoResolver {
    pub fn new(geo: GeoInfo) -> Self {
        Self { geo }
    }

    pub fn from_config(config: &GeoConfig) -> Self {
        Self::new(config.fixed.to_geo_info())
    }
}

#[async_trait]
impl GeoResolver for StaticGeoResolver {
    async fn resolve(&self, _address: IpAddr) -> Result<GeoInfo, DomainError> {
        Ok(self.geo.clone())
    }
}
