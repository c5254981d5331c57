use async_trait::async_trait;
use geodns_domain::{DomainError, GeoInfo, RRset, RecordType};

/// Picks the record set to answer a question with for a given client
/// location.
///
/// Contract:
/// - `name` is compared case-insensitively.
/// - No record for the question yields [`DomainError::NoData`]; any other
///   error means the lookup itself failed.
/// - Identical inputs yield identical outputs.
/// - The TTL is returned as stored, zero included.
#[async_trait]
pub trait RRsetPolicy: Send + Sync {
    async fn select(
        &self,
        name: &str,
        record_type: RecordType,
        geo: &GeoInfo,
    ) -> Result<RRset, DomainError>;
}
