use std::fmt;
use std::sync::Arc;

const UNKNOWN: &str = "unknown";
/// ISO 3166 user-assigned code conventionally used for "unknown country".
const UNKNOWN_COUNTRY: &str = "ZZ";

/// Location and access network of a client address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoInfo {
    /// Access network (ISP) identifier, e.g. `"dx"`.
    pub network: Arc<str>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Arc<str>,
    pub region: Arc<str>,
    pub city: Arc<str>,
}

impl GeoInfo {
    pub fn new(
        network: impl Into<Arc<str>>,
        country_code: impl Into<Arc<str>>,
        region: impl Into<Arc<str>>,
        city: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            network: network.into(),
            country_code: country_code.into(),
            region: region.into(),
            city: city.into(),
        }
    }

    /// Descriptor for addresses with no usable location (private ranges,
    /// unmatched addresses).
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN_COUNTRY, UNKNOWN, UNKNOWN)
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

impl fmt::Display for GeoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.network, self.country_code, self.region, self.city
        )
    }
}
