use arc_swap::ArcSwap;
use async_trait::async_trait;
use geodns_application::ports::RRsetPolicy;
use geodns_domain::config::{PolicyConfig, PolicyRecordEntry};
use geodns_domain::dns_query::normalize_name;
use geodns_domain::{DomainError, GeoInfo, RRset, RecordType};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// GeoInfo fields a rule is restricted to; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoSelector {
    pub network: Option<Arc<str>>,
    pub country_code: Option<Arc<str>>,
    pub region: Option<Arc<str>>,
    pub city: Option<Arc<str>>,
}

impl GeoSelector {
    pub fn matches(&self, geo: &GeoInfo) -> bool {
        field_matches(&self.network, &geo.network)
            && field_matches(&self.country_code, &geo.country_code)
            && field_matches(&self.region, &geo.region)
            && field_matches(&self.city, &geo.city)
    }

    /// Number of fields set.
    pub fn specificity(&self) -> usize {
        [&self.network, &self.country_code, &self.region, &self.city]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }
}

fn field_matches(selector: &Option<Arc<str>>, value: &str) -> bool {
    selector
        .as_deref()
        .map_or(true, |wanted| wanted.eq_ignore_ascii_case(value))
}

#[derive(Debug, Clone)]
struct PolicyRule {
    selector: GeoSelector,
    rrset: RRset,
}

/// Records keyed by (normalized name, type), each key holding its rules in
/// declaration order.
#[derive(Debug, Default)]
pub struct PolicyTable {
    rules: FxHashMap<(String, RecordType), Vec<PolicyRule>>,
}

impl PolicyTable {
    pub fn from_records(records: &[PolicyRecordEntry]) -> Result<Self, DomainError> {
        let mut rules: FxHashMap<(String, RecordType), Vec<PolicyRule>> = FxHashMap::default();

        for record in records {
            let record_type =
                RecordType::from_str(&record.record_type).map_err(DomainError::ConfigError)?;
            if !record_type.is_address() {
                return Err(DomainError::ConfigError(format!(
                    "Policy record {} has unsupported type {}",
                    record.name, record.record_type
                )));
            }

            let selector = GeoSelector {
                network: record.network.as_deref().map(Arc::from),
                country_code: record.country_code.as_deref().map(Arc::from),
                region: record.region.as_deref().map(Arc::from),
                city: record.city.as_deref().map(Arc::from),
            };

            rules
                .entry((normalize_name(&record.name), record_type))
                .or_default()
                .push(PolicyRule {
                    selector,
                    rrset: record.to_rrset(),
                });
        }

        Ok(Self { rules })
    }

    /// Most specific matching rule wins; among equally specific rules the
    /// first declared wins.
    pub fn select(
        &self,
        name: &str,
        record_type: RecordType,
        geo: &GeoInfo,
    ) -> Result<RRset, DomainError> {
        let no_data = || DomainError::NoData {
            name: name.to_string(),
            record_type: record_type.to_string(),
        };

        let rules = self
            .rules
            .get(&(normalize_name(name), record_type))
            .ok_or_else(no_data)?;

        let mut best: Option<&PolicyRule> = None;
        for rule in rules.iter().filter(|r| r.selector.matches(geo)) {
            if best.map_or(true, |b| rule.selector.specificity() > b.selector.specificity()) {
                best = Some(rule);
            }
        }

        best.map(|rule| rule.rrset.clone()).ok_or_else(no_data)
    }

    /// Number of distinct (name, type) keys.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// In-memory policy store with a hot-swappable table.
pub struct TableRRsetPolicy {
    table: ArcSwap<PolicyTable>,
}

impl TableRRsetPolicy {
    pub fn new(table: PolicyTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    pub fn from_config(config: &PolicyConfig) -> Result<Self, DomainError> {
        Ok(Self::new(PolicyTable::from_records(&config.records)?))
    }

    pub fn reload(&self, table: PolicyTable) {
        let keys = table.len();
        self.table.store(Arc::new(table));
        info!(keys, "Policy table reloaded");
    }
}

#[async_trait]
impl RRsetPolicy for TableRRsetPolicy {
    async fn select(
        &self,
        name: &str,
        record_type: RecordType,
        geo: &GeoInfo,
    ) -> Result<RRset, DomainError> {
        self.table.load().select(name, record_type, geo)
    }
}
