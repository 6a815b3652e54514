//! Discovery filtering.
//!
//! Discovery decides once which entities become monitored services. The
//! recurring check never re-runs it, so anything the check should compare
//! against later (a speed, an operational status) is captured here as the
//! service's baseline parameters.

use checkwatch_types::{FieldValue, Record, Section, SCALAR_KEY};
use serde::{Deserialize, Serialize};

use crate::params::{field_to_json, Parameters};

/// A declarative condition on one field of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The field equals the value. Numbers compare numerically across kinds.
    Equals(String, FieldValue),
    /// The field equals one of the values.
    OneOf(String, Vec<FieldValue>),
    /// The field is present and not empty text.
    NonEmpty(String),
    /// The field is a number greater than zero.
    Positive(String),
}

impl Predicate {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Predicate::Equals(field.into(), value.into())
    }

    pub fn one_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Predicate::OneOf(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Equals(field, expected) => record
                .get(field)
                .is_some_and(|value| same_value(value, expected)),
            Predicate::OneOf(field, options) => record
                .get(field)
                .is_some_and(|value| options.iter().any(|o| same_value(value, o))),
            Predicate::NonEmpty(field) => record.get(field).is_some_and(|v| !v.is_empty()),
            Predicate::Positive(field) => record
                .get(field)
                .and_then(FieldValue::as_f64)
                .is_some_and(|v| v > 0.0),
        }
    }
}

fn same_value(a: &FieldValue, b: &FieldValue) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// A discovered service: an item (or none, for itemless checks) plus the
/// baseline parameters captured at discovery time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
}

impl Service {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: Some(item.into()),
            parameters: Parameters::new(),
        }
    }

    pub fn itemless() -> Self {
        Self {
            item: None,
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Selects entities that become services.
///
/// # Example
///
/// ```rust
/// use checkwatch_engine::{Discovery, Predicate};
/// use checkwatch_types::{Record, Section};
///
/// let mut section = Section::new();
/// section.insert("eth0", Record::new().with("admin_status", 1i64).with("speed", 1000u64));
/// section.insert("eth1", Record::new().with("admin_status", 2i64).with("speed", 1000u64));
///
/// let discovery = Discovery::new()
///     .require(Predicate::equals("admin_status", 1i64))
///     .baseline("speed", "discovered_speed");
///
/// let services = discovery.discover(Some(&section));
/// assert_eq!(services.len(), 1);
/// assert_eq!(services[0].item.as_deref(), Some("eth0"));
/// assert_eq!(services[0].parameters.u64("discovered_speed"), Ok(Some(1000)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Discovery {
    pub predicates: Vec<Predicate>,
    /// `(field, parameter)` pairs copied into each service's baseline.
    pub baseline: Vec<(String, String)>,
}

impl Discovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only discover entities matching the predicate. All predicates must hold.
    pub fn require(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Snapshot `field` into the baseline parameter `parameter`.
    pub fn baseline(mut self, field: impl Into<String>, parameter: impl Into<String>) -> Self {
        self.baseline.push((field.into(), parameter.into()));
        self
    }

    /// Services for every matching entity, in key order.
    ///
    /// No data yields no services. An entity stored under the scalar key
    /// yields an itemless service.
    pub fn discover(&self, section: Option<&Section>) -> Vec<Service> {
        let Some(section) = section else {
            return Vec::new();
        };

        section
            .iter()
            .filter(|(_, record)| self.predicates.iter().all(|p| p.matches(record)))
            .map(|(key, record)| {
                let service = if key == SCALAR_KEY {
                    Service::itemless()
                } else {
                    Service::new(key.clone())
                };
                service.with_parameters(self.snapshot(record))
            })
            .collect()
    }

    fn snapshot(&self, record: &Record) -> Parameters {
        let mut parameters = Parameters::new();
        for (field, parameter) in &self.baseline {
            if let Some(value) = record.get(field) {
                parameters.insert(parameter.clone(), field_to_json(value));
            }
        }
        parameters
    }
}
