use super::root::BackendKind;
use crate::RRset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StaticRRsetEntry {
    pub addresses: Vec<String>,
    pub ttl: u32,
}

impl StaticRRsetEntry {
    pub fn to_rrset(&self) -> RRset {
        RRset::new(self.addresses.iter().map(String::as_str), self.ttl)
    }
}

/// One policy row: the answer for `name`/`record_type` when the client's
/// GeoInfo matches every selector that is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyRecordEntry {
    pub name: String,
    pub record_type: String,
    pub ttl: u32,
    pub addresses: Vec<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl PolicyRecordEntry {
    pub fn to_rrset(&self) -> RRset {
        RRset::new(self.addresses.iter().map(String::as_str), self.ttl)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub backend: BackendKind,

    /// Answer for every A question under the `static` backend.
    pub static_v4: StaticRRsetEntry,

    /// Answer for every AAAA question under the `static` backend.
    pub static_v6: StaticRRsetEntry,

    pub records: Vec<PolicyRecordEntry>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Static,
            static_v4: StaticRRsetEntry {
                addresses: vec!["1.1.1.1".to_string(), "1.1.2.2".to_string()],
                ttl: 3600,
            },
            static_v6: StaticRRsetEntry {
                addresses: vec!["2001:db8::68".to_string()],
                ttl: 300,
            },
            records: vec![],
        }
    }
}
