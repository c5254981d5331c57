use super::RecordType;
use crate::errors::DomainError;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryClass {
    IN,
    Other(u16),
}

impl QueryClass {
    pub fn to_u16(&self) -> u16 {
        match self {
            QueryClass::IN => 1,
            QueryClass::Other(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => QueryClass::IN,
            other => QueryClass::Other(other),
        }
    }
}

impl fmt::Display for QueryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryClass::IN => f.write_str("IN"),
            QueryClass::Other(code) => write!(f, "CLASS{}", code),
        }
    }
}

/// A single question as received from the client.
///
/// `name` keeps the spelling of the wire question so it can be echoed back;
/// comparisons go through [`DnsQuery::normalized_name`].
#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: QueryClass,
}

impl DnsQuery {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType, class: QueryClass) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
        }
    }

    /// Lower-cased, fully qualified form of the name (`example.test.`).
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn is_supported(&self) -> bool {
        self.class == QueryClass::IN && self.record_type.is_address()
    }

    /// Rejects anything but IN-class address questions.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.class != QueryClass::IN {
            return Err(DomainError::UnsupportedQuery(format!(
                "class {} for {}",
                self.class, self.name
            )));
        }
        if !self.record_type.is_address() {
            return Err(DomainError::UnsupportedQuery(format!(
                "type {} for {}",
                self.record_type, self.name
            )));
        }
        Ok(())
    }
}

impl PartialEq for DnsQuery {
    fn eq(&self, other: &Self) -> bool {
        self.record_type == other.record_type
            && self.class == other.class
            && normalize_name(&self.name) == normalize_name(&other.name)
    }
}

impl Eq for DnsQuery {}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.class, self.record_type)
    }
}

/// Lower-cases `name` and appends the root label if it is missing.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = name.trim().to_ascii_lowercase();
    if !normalized.ends_with('.') {
        normalized.push('.');
    }
    normalized
}
