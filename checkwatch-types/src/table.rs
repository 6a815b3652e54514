//! Raw tables and the typed records parsed from them.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::FieldValue;

/// One parsed telemetry line: an ordered sequence of untyped string fields.
pub type RawRow = Vec<String>;

/// An ordered sequence of rows as produced by one fetch operation.
///
/// When several tables are fetched together they are passed around as a
/// `Vec<RawTable>` whose order matches the declared fetch order.
pub type RawTable = Vec<RawRow>;

/// Key identifying a monitorable entity (an interface name, an item name).
pub type EntityKey = String;

/// Key under which an itemless (scalar) section stores its single record.
///
/// Parsers never produce an empty entity key, so it cannot collide.
pub const SCALAR_KEY: &str = "";

/// Build a raw table from string literals. Handy in tests and examples.
///
/// ```rust
/// use checkwatch_types::table_from;
///
/// let table = table_from(&[&["eth0", "6"], &["lo", "24"]]);
/// assert_eq!(table[1][0], "lo");
/// ```
pub fn table_from(rows: &[&[&str]]) -> RawTable {
    rows.iter()
        .map(|row| row.iter().map(|field| String::from(*field)).collect())
        .collect()
}

/// Typed fields assembled for one entity.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn counter(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(FieldValue::as_u64)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    /// Copy every field of `other` into this record, overwriting on conflict.
    pub fn merge(&mut self, other: Record) {
        self.fields.extend(other.fields);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parsed entities of one run, keyed by entity key.
///
/// Entities iterate in key order, which keeps discovery output stable.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Section {
    entities: BTreeMap<EntityKey, Record>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// A section holding a single record under [`SCALAR_KEY`].
    pub fn scalar(record: Record) -> Self {
        let mut section = Self::new();
        section.insert(SCALAR_KEY, record);
        section
    }

    /// Insert an entity. A later insert for the same key wins.
    pub fn insert(&mut self, key: impl Into<EntityKey>, record: Record) -> Option<Record> {
        self.entities.insert(key.into(), record)
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entities.get(key)
    }

    /// The record of a scalar section.
    pub fn scalar_record(&self) -> Option<&Record> {
        self.entities.get(SCALAR_KEY)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entities.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.entities.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &Record)> {
        self.entities.iter()
    }

    /// `None` when empty, so callers can treat "no entities" as "no data".
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl FromIterator<(EntityKey, Record)> for Section {
    fn from_iter<I: IntoIterator<Item = (EntityKey, Record)>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Section {
    type Item = (EntityKey, Record);
    type IntoIter = alloc::collections::btree_map::IntoIter<EntityKey, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}
