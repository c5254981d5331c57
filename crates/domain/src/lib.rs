//! GeoDNS Domain Layer
pub mod client_location;
pub mod config;
pub mod dns_outcome;
pub mod dns_query;
pub mod dns_record;
pub mod dns_request;
pub mod errors;
pub mod geo_info;
pub mod rrset;

pub use client_location::{ClientLocation, SubnetHint, Transport};
pub use config::{CliOverrides, Config, ConfigError};
pub use dns_outcome::DnsOutcome;
pub use dns_query::{DnsQuery, QueryClass};
pub use dns_record::{AnswerRecord, RecordHeader, RecordType};
pub use dns_request::DnsRequest;
pub use errors::DomainError;
pub use geo_info::GeoInfo;
pub use rrset::RRset;
