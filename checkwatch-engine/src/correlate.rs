//! Entity correlation across independently fetched tables.

use std::collections::HashMap;

use checkwatch_types::{EntityKey, RawTable, Record, Section};
use tracing::{debug, warn};

use crate::error::CorrelateError;
use crate::parse::TableSpec;

/// How the final entity key is chosen from a merged record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKeyRule {
    /// The value of a single field.
    Field(String),
    /// The first field with a non-empty value, e.g. `name || alias || descr`.
    FirstNonEmpty(Vec<String>),
}

impl EntityKeyRule {
    pub fn first_non_empty<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EntityKeyRule::FirstNonEmpty(fields.into_iter().map(Into::into).collect())
    }

    /// Resolve the key of a record, or `None` if every candidate is empty.
    pub fn resolve(&self, record: &Record) -> Option<EntityKey> {
        let candidates: &[String] = match self {
            EntityKeyRule::Field(field) => std::slice::from_ref(field),
            EntityKeyRule::FirstNonEmpty(fields) => fields,
        };
        candidates
            .iter()
            .filter_map(|name| record.get(name))
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
            .find(|key| !key.trim().is_empty())
    }
}

/// Merges rows of several tables into one record per entity.
///
/// Tables arrive in declared fetch order: the primary table first, then
/// each auxiliary table. Every table carries the same index column (its
/// spec's key column); auxiliary rows are joined onto primary rows by that
/// index. An auxiliary table without a key column is joined by row
/// position instead.
///
/// # Example
///
/// ```rust
/// use checkwatch_engine::{ColumnSpec, Correlator, EntityKeyRule, TableSpec};
/// use checkwatch_types::table_from;
///
/// let correlator = Correlator::new(
///     TableSpec::new("if")
///         .column(ColumnSpec::text("index"))
///         .column(ColumnSpec::text("descr"))
///         .key("index"),
///     EntityKeyRule::first_non_empty(["name", "descr"]),
/// )
/// .auxiliary(
///     TableSpec::new("ifx")
///         .column(ColumnSpec::text("index"))
///         .column(ColumnSpec::text("name").lenient())
///         .key("index"),
/// );
///
/// let tables = vec![
///     table_from(&[&["1", "GigabitEthernet0/1"], &["2", "Vlan1"]]),
///     table_from(&[&["1", "Gi0/1"]]),
/// ];
/// let section = correlator.correlate(&tables).unwrap().unwrap();
/// assert!(section.contains("Gi0/1"));
/// assert!(section.contains("Vlan1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Correlator {
    pub primary: TableSpec,
    pub auxiliaries: Vec<TableSpec>,
    pub key: EntityKeyRule,
}

impl Correlator {
    pub fn new(primary: TableSpec, key: EntityKeyRule) -> Self {
        Self {
            primary,
            auxiliaries: Vec::new(),
            key,
        }
    }

    /// Append an auxiliary table to the fetch order.
    pub fn auxiliary(mut self, spec: TableSpec) -> Self {
        self.auxiliaries.push(spec);
        self
    }

    /// Number of tables expected, in fetch order.
    pub fn table_count(&self) -> usize {
        1 + self.auxiliaries.len()
    }

    /// The table specs in declared fetch order.
    pub fn fetch_order(&self) -> impl Iterator<Item = &TableSpec> {
        std::iter::once(&self.primary).chain(self.auxiliaries.iter())
    }

    /// Correlate raw tables into entities.
    ///
    /// Empty input is "no data" (`Ok(None)`). Entities missing from an
    /// auxiliary table are kept with that table's fallback values.
    pub fn correlate(&self, tables: &[RawTable]) -> Result<Option<Section>, CorrelateError> {
        if tables.is_empty() {
            return Ok(None);
        }
        if tables.len() != self.table_count() {
            return Err(CorrelateError::TableCount {
                expected: self.table_count(),
                found: tables.len(),
            });
        }

        let lookups: Vec<AuxiliaryLookup> = self
            .auxiliaries
            .iter()
            .zip(&tables[1..])
            .map(|(spec, table)| AuxiliaryLookup::build(spec, table))
            .collect();

        let mut section = Section::new();
        for (position, row) in tables[0].iter().enumerate() {
            let (index, mut record) = match self.primary.parse_row(row) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    debug!(table = %self.primary.name, line = position, %reason, "Skipping row");
                    continue;
                }
            };

            for lookup in &lookups {
                for (name, value) in lookup.fields_for(&index, position).iter() {
                    if !record.contains(name) {
                        record.insert(name.clone(), value.clone());
                    }
                }
            }

            match self.key.resolve(&record) {
                Some(key) => {
                    if section.insert(key.clone(), record).is_some() {
                        warn!(table = %self.primary.name, %key, "Duplicate entity key, keeping later row");
                    }
                }
                None => debug!(table = %self.primary.name, %index, "No usable entity key"),
            }
        }

        Ok(section.non_empty())
    }
}

/// Index → fields lookup built from one auxiliary table.
struct AuxiliaryLookup {
    by_index: HashMap<String, Record>,
    by_position: Vec<Option<Record>>,
    keyed: bool,
    fallback: Record,
}

impl AuxiliaryLookup {
    fn build(spec: &TableSpec, table: &RawTable) -> Self {
        let mut by_index = HashMap::new();
        let mut by_position = Vec::with_capacity(table.len());

        for (line, row) in table.iter().enumerate() {
            match spec.parse_row(row) {
                Ok((index, record)) => {
                    if spec.is_scalar() {
                        by_position.push(Some(record));
                    } else {
                        by_index.insert(index, record);
                    }
                }
                Err(reason) => {
                    debug!(table = %spec.name, line, %reason, "Skipping row");
                    by_position.push(None);
                }
            }
        }

        Self {
            by_index,
            by_position,
            keyed: !spec.is_scalar(),
            fallback: spec.fallback_record(),
        }
    }

    fn fields_for(&self, index: &str, position: usize) -> &Record {
        let found = if self.keyed {
            self.by_index.get(index)
        } else {
            self.by_position.get(position).and_then(Option::as_ref)
        };
        found.unwrap_or(&self.fallback)
    }
}
