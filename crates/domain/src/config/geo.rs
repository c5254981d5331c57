use super::root::BackendKind;
use crate::GeoInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeoEntry {
    pub network: String,
    pub country_code: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
}

impl GeoEntry {
    pub fn to_geo_info(&self) -> GeoInfo {
        GeoInfo::new(
            self.network.as_str(),
            self.country_code.as_str(),
            self.region.as_str(),
            self.city.as_str(),
        )
    }
}

impl Default for GeoEntry {
    fn default() -> Self {
        Self {
            network: "dx".to_string(),
            country_code: "CN".to_string(),
            region: "Shanghai".to_string(),
            city: "Shanghai".to_string(),
        }
    }
}

/// One row of the CIDR table used by the `table` geo backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeoNetworkEntry {
    pub cidr: String,
    pub network: String,
    pub country_code: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
}

impl GeoNetworkEntry {
    pub fn to_geo_info(&self) -> GeoInfo {
        GeoInfo::new(
            self.network.as_str(),
            self.country_code.as_str(),
            self.region.as_str(),
            self.city.as_str(),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GeoConfig {
    pub backend: BackendKind,

    /// Descriptor returned for every address by the `static` backend.
    #[serde(rename = "static")]
    pub fixed: GeoEntry,

    pub networks: Vec<GeoNetworkEntry>,
}
