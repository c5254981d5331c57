use crate::dns_outcome::DnsOutcome;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("No data for {name} {record_type}")]
    NoData { name: String, record_type: String },

    #[error("Geo backend error: {0}")]
    GeoBackend(String),

    #[error("Policy backend error: {0}")]
    PolicyBackend(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Wire outcome a request failing with this error must be answered with.
    pub fn outcome(&self) -> DnsOutcome {
        match self {
            DomainError::UnsupportedQuery(_) => DnsOutcome::NotImplemented,
            DomainError::NoData { .. } => DnsOutcome::NameError,
            DomainError::GeoBackend(_)
            | DomainError::PolicyBackend(_)
            | DomainError::InvalidIpAddress(_)
            | DomainError::ConfigError(_) => DnsOutcome::ServerFailure,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, DomainError::NoData { .. })
    }
}
