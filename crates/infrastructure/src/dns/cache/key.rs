use compact_str::CompactString;
use geodns_domain::dns_query::normalize_name;
use geodns_domain::{GeoInfo, RecordType};

/// Cache identity of one policy answer.
///
/// The whole GeoInfo is part of the key: a policy may select on any of its
/// fields, so two clients only share an entry when every field matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: CompactString,
    pub record_type: RecordType,
    pub geo: GeoInfo,
}

impl CacheKey {
    #[inline]
    pub fn new(name: &str, record_type: RecordType, geo: &GeoInfo) -> Self {
        Self {
            name: CompactString::from(normalize_name(name)),
            record_type,
            geo: geo.clone(),
        }
    }
}
