mod geo_resolver;
mod rrset_policy;

pub use geo_resolver::GeoResolver;
pub use rrset_policy::RRsetPolicy;

// Re-export for convenience
pub use geodns_domain::{GeoInfo, RRset};
