use super::{ClientLocation, DnsQuery};

#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub query: DnsQuery,
    pub location: ClientLocation,
}

impl DnsRequest {
    pub fn new(query: DnsQuery, location: ClientLocation) -> Self {
        Self { query, location }
    }
}
