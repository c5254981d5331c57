use super::RecordType;
use crate::dns_query::QueryClass;
use std::net::IpAddr;
use std::sync::Arc;

/// Fields every answer record of one response shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: QueryClass,
    pub ttl: u32,
}

impl RecordHeader {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType, class: QueryClass, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
            ttl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub header: RecordHeader,
    pub address: IpAddr,
}

impl AnswerRecord {
    pub fn new(header: RecordHeader, address: IpAddr) -> Self {
        Self { header, address }
    }

    pub fn ttl(&self) -> u32 {
        self.header.ttl
    }
}
