use async_trait::async_trait;
use geodns_domain::{DomainError, GeoInfo};
use std::net::IpAddr;

/// Maps a client address to its location and access network.
///
/// Implementations must answer for every syntactically valid address,
/// private and reserved ranges included (those resolve to
/// [`GeoInfo::unknown`]). The call sits on the request path, so a backend
/// has to bound its own latency; an `Err` is reported to the client as a
/// server failure.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn resolve(&self, address: IpAddr) -> Result<GeoInfo, DomainError>;
}
