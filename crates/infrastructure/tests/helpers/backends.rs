#![allow(dead_code)]
use async_trait::async_trait;
use geodns_application::ports::{GeoResolver, RRsetPolicy};
use geodns_domain::{DomainError, GeoInfo, RRset, RecordType};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Geo resolver returning a fixed descriptor and remembering what it was
/// asked about.
pub struct RecordingGeoResolver {
    geo: GeoInfo,
    seen: Mutex<Vec<IpAddr>>,
}

impl RecordingGeoResolver {
    pub fn new(geo: GeoInfo) -> Self {
        Self {
            geo,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn shanghai_dx() -> Self {
        Self::new(GeoInfo::new("dx", "CN", "Shanghai", "Shanghai"))
    }

    pub fn seen(&self) -> Vec<IpAddr> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeoResolver for RecordingGeoResolver {
    async fn resolve(&self, address: IpAddr) -> Result<GeoInfo, DomainError> {
        self.seen.lock().unwrap().push(address);
        Ok(self.geo.clone())
    }
}

/// Policy that answers every question with one result after a delay and
/// counts how often it was called.
pub struct CountingPolicy {
    result: Result<RRset, DomainError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl CountingPolicy {
    pub fn answering(rrset: RRset) -> Self {
        Self {
            result: Ok(rrset),
            delay: Duration::from_millis(20),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: DomainError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::from_millis(20),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RRsetPolicy for CountingPolicy {
    async fn select(
        &self,
        _name: &str,
        _record_type: RecordType,
        _geo: &GeoInfo,
    ) -> Result<RRset, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

/// Policy whose answer can be replaced while a call is in flight. Each call
/// takes its answer when it starts, then waits `delay`.
pub struct SwitchablePolicy {
    current: Mutex<RRset>,
    delay: Duration,
    calls: AtomicUsize,
}

impl SwitchablePolicy {
    pub fn new(rrset: RRset, delay: Duration) -> Self {
        Self {
            current: Mutex::new(rrset),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, rrset: RRset) {
        *self.current.lock().unwrap() = rrset;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RRsetPolicy for SwitchablePolicy {
    async fn select(
        &self,
        _name: &str,
        _record_type: RecordType,
        _geo: &GeoInfo,
    ) -> Result<RRset, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.current.lock().unwrap().clone();
        tokio::time::sleep(self.delay).await;
        Ok(answer)
    }
}
