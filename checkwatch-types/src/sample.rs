//! Counter samples and their persisted form.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;

use crate::SCHEMA_VERSION;

/// Build the store key of a metric belonging to an entity.
///
/// ```rust
/// assert_eq!(checkwatch_types::metric_key("eth0", "in_octets"), "eth0.in_octets");
/// ```
pub fn metric_key(entity: &str, metric: &str) -> String {
    format!("{}.{}", entity, metric)
}

/// One observation of a monotonically increasing counter.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSample {
    pub entity: String,
    pub metric: String,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub value: u64,
}

impl CounterSample {
    pub fn new(entity: impl Into<String>, metric: impl Into<String>, timestamp: f64, value: u64) -> Self {
        Self {
            entity: entity.into(),
            metric: metric.into(),
            timestamp,
            value,
        }
    }

    /// The key this sample is stored under.
    pub fn key(&self) -> String {
        metric_key(&self.entity, &self.metric)
    }
}

/// The last stored `(timestamp, value)` pair of a counter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct StoreEntry {
    /// Seconds since the Unix epoch.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub timestamp: f64,

    #[cfg_attr(feature = "minicbor", n(1))]
    pub value: u64,
}

impl StoreEntry {
    pub const fn new(timestamp: f64, value: u64) -> Self {
        Self { timestamp, value }
    }
}

impl From<&CounterSample> for StoreEntry {
    fn from(sample: &CounterSample) -> Self {
        Self::new(sample.timestamp, sample.value)
    }
}

/// Serialized form of a whole value store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct StoreSnapshot {
    /// The [`SCHEMA_VERSION`] the store was written with.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub schema: u32,

    /// Entries keyed by metric key.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub entries: BTreeMap<String, StoreEntry>,
}

impl StoreSnapshot {
    pub fn new(entries: BTreeMap<String, StoreEntry>) -> Self {
        Self {
            schema: SCHEMA_VERSION,
            entries,
        }
    }

    /// Whether the entries were written in the layout this release reads.
    pub fn is_compatible(&self) -> bool {
        self.schema == SCHEMA_VERSION
    }
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}
