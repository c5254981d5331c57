use crate::ports::{GeoResolver, RRsetPolicy};
use crate::services::ResponseEncoder;
use geodns_domain::{AnswerRecord, DnsRequest, DomainError, GeoInfo, RecordHeader};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Answer section for a successfully resolved question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub answers: Vec<AnswerRecord>,
    pub ttl: u32,
    pub geo: GeoInfo,
}

/// Geo classification, policy selection and encoding for one request.
///
/// Holds only the two backends; every value produced while answering lives
/// in the request's own future.
pub struct HandleDnsQueryUseCase {
    geo: Arc<dyn GeoResolver>,
    policy: Arc<dyn RRsetPolicy>,
}

impl HandleDnsQueryUseCase {
    pub fn new(geo: Arc<dyn GeoResolver>, policy: Arc<dyn RRsetPolicy>) -> Self {
        Self { geo, policy }
    }

    pub async fn execute(&self, request: &DnsRequest) -> Result<QueryAnswer, DomainError> {
        let start = Instant::now();
        let query = &request.query;
        query.validate()?;

        let address = request.location.effective_address();
        let geo = self.geo.resolve(address).await?;

        let rrset = self
            .policy
            .select(&query.name, query.record_type, &geo)
            .await?;

        let header = RecordHeader::new(
            Arc::clone(&query.name),
            query.record_type,
            query.class,
            rrset.ttl,
        );
        let answers = ResponseEncoder::encode(query.record_type, &header, &rrset)?;

        debug!(
            domain = %query.name,
            record_type = %query.record_type,
            client = %address,
            geo = %geo,
            answers = answers.len(),
            dropped = rrset.len() - answers.len(),
            ttl = rrset.ttl,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query resolved"
        );

        Ok(QueryAnswer {
            answers,
            ttl: rrset.ttl,
            geo,
        })
    }
}
