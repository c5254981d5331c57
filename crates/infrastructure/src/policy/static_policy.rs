use async_trait::async_trait;
use geodns_application::ports::RRsetPolicy;
use geodns_domain::config::PolicyConfig;
use geodns_domain::{DomainError, GeoInfo, RRset, RecordType};

/// One fixed RRset per address family, whatever the name or client.
pub struct StaticRRsetPolicy {
    v4: RRset,
    v6: RRset,
}

impl StaticRRsetPolicy {
    pub fn new(v4: RRset, v6: RRset) -> Self {
        Self { v4, v6 }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.static_v4.to_rrset(), config.static_v6.to_rrset())
    }
}

#[async_trait]
impl RRsetPolicy for StaticRRsetPolicy {
    async fn select(
        &self,
        name: &str,
        record_type: RecordType,
        _geo: &GeoInfo,
    ) -> Result<RRset, DomainError> {
        match record_type {
            RecordType::A => Ok(self.v4.clone()),
            RecordType::AAAA => Ok(self.v6.clone()),
            other => Err(DomainError::NoData {
                name: name.to_string(),
                record_type: other.to_string(),
            }),
        }
    }
}
