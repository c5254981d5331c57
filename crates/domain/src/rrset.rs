use std::sync::Arc;

/// Address literals selected for one question, plus their TTL.
///
/// Literals are kept as text: a backend may hand back entries that do not
/// parse, and those are dropped at encoding time rather than here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RRset {
    pub addresses: Vec<Arc<str>>,
    pub ttl: u32,
}

impl RRset {
    pub fn new<I, S>(addresses: I, ttl: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
