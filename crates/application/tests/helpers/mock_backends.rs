#![allow(dead_code)]

use async_trait::async_trait;
use geodns_application::ports::{GeoResolver, RRsetPolicy};
use geodns_domain::{DomainError, GeoInfo, RRset, RecordType};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct MockGeoResolver {
    geo: GeoInfo,
    error: Mutex<Option<DomainError>>,
    seen: Mutex<Vec<IpAddr>>,
}

impl MockGeoResolver {
    pub fn new(geo: GeoInfo) -> Self {
        Self {
            geo,
            error: Mutex::new(None),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn shanghai_dx() -> Self {
        Self::new(GeoInfo::new("dx", "CN", "Shanghai", "Shanghai"))
    }

    pub fn failing(error: DomainError) -> Self {
        let resolver = Self::new(GeoInfo::unknown());
        *resolver.error.lock().unwrap() = Some(error);
        resolver
    }

    pub fn seen(&self) -> Vec<IpAddr> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeoResolver for MockGeoResolver {
    async fn resolve(&self, address: IpAddr) -> Result<GeoInfo, DomainError> {
        self.seen.lock().unwrap().push(address);
        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.geo.clone())
    }
}

type PolicyKey = (String, RecordType);

#[derive(Default)]
pub struct MockRRsetPolicy {
    answers: Mutex<HashMap<PolicyKey, Result<RRset, DomainError>>>,
    calls: AtomicUsize,
    seen_geo: Mutex<Vec<GeoInfo>>,
}

impl MockRRsetPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rrset(self, name: &str, record_type: RecordType, rrset: RRset) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert((name.to_ascii_lowercase(), record_type), Ok(rrset));
        self
    }

    pub fn with_error(self, name: &str, record_type: RecordType, error: DomainError) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert((name.to_ascii_lowercase(), record_type), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_geo(&self) -> Vec<GeoInfo> {
        self.seen_geo.lock().unwrap().clone()
    }
}

#[async_trait]
impl RRsetPolicy for MockRRsetPolicy {
    async fn select(
        &self,
        name: &str,
        record_type: RecordType,
        geo: &GeoInfo,
    ) -> Result<RRset, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_geo.lock().unwrap().push(geo.clone());
        self.answers
            .lock()
            .unwrap()
            .get(&(name.to_ascii_lowercase(), record_type))
            .cloned()
            .unwrap_or_else(|| {
                Err(DomainError::NoData {
                    name: name.to_string(),
                    record_type: record_type.to_string(),
                })
            })
    }
}
