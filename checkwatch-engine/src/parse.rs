//! Table parsing.
//!
//! A [`TableSpec`] declares the columns of one raw table. Each row is turned
//! into a typed [`Record`] or rejected with a [`SkipReason`]; a single bad row
//! never fails the whole table.

use checkwatch_types::{EntityKey, FieldValue, RawRow, Record, Section, SCALAR_KEY};
use thiserror::Error;
use tracing::debug;

/// How a column's string is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Unsigned monotonic counter.
    Counter,
    Integer,
    Float,
    /// Truth value: `1`/`true`/`yes`/`on` or `0`/`2`/`false`/`no`/`off`.
    Flag,
}

/// What happens when a column fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPolicy {
    /// The row is skipped. Empty text counts as a failure.
    #[default]
    Required,
    /// The field falls back to zero, `false` or empty text.
    Lenient,
}

/// One declared column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: FieldKind,
    pub policy: FieldPolicy,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            policy: FieldPolicy::Required,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn counter(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Counter)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    /// Fall back to a zero value instead of skipping the row.
    pub fn lenient(mut self) -> Self {
        self.policy = FieldPolicy::Lenient;
        self
    }

    /// The value a lenient column takes when it fails to convert.
    pub fn fallback(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Counter => FieldValue::Counter(0),
            FieldKind::Integer => FieldValue::Integer(0),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::Flag => FieldValue::Flag(false),
        }
    }

    /// Convert a raw string, or `None` if it does not fit the column kind.
    pub fn convert(&self, raw: &str) -> Option<FieldValue> {
        let trimmed = raw.trim();
        match self.kind {
            FieldKind::Text => {
                if self.policy == FieldPolicy::Required && raw.is_empty() {
                    None
                } else {
                    Some(FieldValue::Text(raw.to_string()))
                }
            }
            FieldKind::Counter => trimmed.parse().ok().map(FieldValue::Counter),
            FieldKind::Integer => trimmed.parse().ok().map(FieldValue::Integer),
            FieldKind::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Float),
            FieldKind::Flag => match trimmed.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(FieldValue::Flag(true)),
                "0" | "2" | "false" | "no" | "off" => Some(FieldValue::Flag(false)),
                _ => None,
            },
        }
    }
}

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("row has {found} columns, at least {expected} required")]
    TooFewColumns { expected: usize, found: usize },

    #[error("key column is empty")]
    EmptyKey,

    #[error("column '{column}' has invalid value {value:?}")]
    InvalidField { column: String, value: String },
}

/// Declared layout of one raw table.
///
/// A table either carries a key column, producing one entity per row, or is
/// scalar, producing a single record from its first row that parses.
///
/// # Example
///
/// ```rust
/// use checkwatch_engine::{ColumnSpec, TableSpec};
/// use checkwatch_types::table_from;
///
/// let spec = TableSpec::new("if_status")
///     .column(ColumnSpec::text("descr"))
///     .column(ColumnSpec::integer("oper_status").lenient())
///     .key("descr");
///
/// let section = spec.parse_table(&table_from(&[&["eth0", "1"], &["", "1"]])).unwrap();
/// assert_eq!(section.len(), 1);
/// assert_eq!(section.get("eth0").and_then(|r| r.integer("oper_status")), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    /// Index of the key column; `None` for scalar tables.
    pub key: Option<usize>,
    /// Rows shorter than this are skipped. Missing trailing columns above it
    /// are treated as empty strings.
    pub min_columns: Option<usize>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            key: None,
            min_columns: None,
        }
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Use the named column as the entity key.
    ///
    /// Unknown names leave the table scalar.
    pub fn key(mut self, name: &str) -> Self {
        self.key = self.columns.iter().position(|c| c.name == name);
        self
    }

    pub fn min_columns(mut self, min: usize) -> Self {
        self.min_columns = Some(min);
        self
    }

    /// Minimum number of raw fields a row must have.
    pub fn required_columns(&self) -> usize {
        self.min_columns.unwrap_or(self.columns.len())
    }

    pub fn is_scalar(&self) -> bool {
        self.key.is_none()
    }

    /// The name of the key column.
    pub fn key_name(&self) -> Option<&str> {
        self.key
            .and_then(|idx| self.columns.get(idx))
            .map(|c| c.name.as_str())
    }

    /// A record holding every non-key column's fallback value.
    ///
    /// Used for entities missing from an auxiliary table.
    pub fn fallback_record(&self) -> Record {
        self.columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != self.key)
            .map(|(_, c)| (c.name.clone(), c.fallback()))
            .collect()
    }

    /// Parse a single row into its key and typed record.
    ///
    /// Scalar tables key every row with [`SCALAR_KEY`].
    pub fn parse_row(&self, row: &RawRow) -> Result<(EntityKey, Record), SkipReason> {
        let expected = self.required_columns();
        if row.len() < expected {
            return Err(SkipReason::TooFewColumns {
                expected,
                found: row.len(),
            });
        }

        let key = match self.key {
            Some(idx) => {
                let raw = row.get(idx).map(String::as_str).unwrap_or("");
                if raw.trim().is_empty() {
                    return Err(SkipReason::EmptyKey);
                }
                raw.to_string()
            }
            None => SCALAR_KEY.to_string(),
        };

        let mut record = Record::new();
        for (idx, column) in self.columns.iter().enumerate() {
            let raw = row.get(idx).map(String::as_str).unwrap_or("");
            let value = match (column.convert(raw), column.policy) {
                (Some(value), _) => value,
                (None, FieldPolicy::Lenient) => column.fallback(),
                (None, FieldPolicy::Required) => {
                    return Err(SkipReason::InvalidField {
                        column: column.name.clone(),
                        value: raw.to_string(),
                    })
                }
            };
            record.insert(column.name.clone(), value);
        }

        Ok((key, record))
    }

    /// Parse every row of a table.
    ///
    /// Returns `None` ("no data") when the table is empty or no row survives.
    /// When two rows share a key the later one wins. A scalar table keeps
    /// the first row that parses and ignores the rest.
    pub fn parse_table(&self, table: &[RawRow]) -> Option<Section> {
        let mut section = Section::new();
        for (line, row) in table.iter().enumerate() {
            match self.parse_row(row) {
                Ok((key, record)) => {
                    section.insert(key, record);
                    if self.is_scalar() {
                        break;
                    }
                }
                Err(reason) => {
                    debug!(table = %self.name, line, %reason, "Skipping row");
                }
            }
        }

        section.non_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkwatch_types::table_from;

    fn status_spec() -> TableSpec {
        TableSpec::new("if_status")
            .column(ColumnSpec::text("descr"))
            .column(ColumnSpec::integer("type").lenient())
            .column(ColumnSpec::counter("speed").lenient())
            .column(ColumnSpec::integer("admin_status").lenient())
            .column(ColumnSpec::integer("oper_status").lenient())
            .key("descr")
    }

    #[test]
    fn parses_interface_row() {
        let section = status_spec()
            .parse_table(&table_from(&[&["eth0", "6", "1000000000", "1", "1"]]))
            .unwrap();

        let eth0 = section.get("eth0").unwrap();
        assert_eq!(eth0.text("descr"), Some("eth0"));
        assert_eq!(eth0.integer("type"), Some(6));
        assert_eq!(eth0.counter("speed"), Some(1_000_000_000));
        assert_eq!(eth0.integer("oper_status"), Some(1));
    }

    #[test]
    fn short_row_is_skipped() {
        let row = vec!["eth0".to_string(), "6".to_string()];
        assert_eq!(
            status_spec().parse_row(&row),
            Err(SkipReason::TooFewColumns {
                expected: 5,
                found: 2
            })
        );
    }

    #[test]
    fn empty_key_is_skipped() {
        let row: RawRow = ["", "6", "0", "1", "1"].iter().map(|s| s.to_string()).collect();
        assert_eq!(status_spec().parse_row(&row), Err(SkipReason::EmptyKey));
    }

    #[test]
    fn lenient_numeric_falls_back_to_zero() {
        let section = status_spec()
            .parse_table(&table_from(&[&["eth0", "x", "", "1", "up"]]))
            .unwrap();
        let eth0 = section.get("eth0").unwrap();
        assert_eq!(eth0.integer("type"), Some(0));
        assert_eq!(eth0.counter("speed"), Some(0));
        assert_eq!(eth0.integer("oper_status"), Some(0));
    }

    #[test]
    fn required_numeric_skips_row() {
        let spec = TableSpec::new("items")
            .column(ColumnSpec::text("item"))
            .column(ColumnSpec::float("value"))
            .key("item");

        let row: RawRow = vec!["disk".into(), "n/a".into()];
        assert_eq!(
            spec.parse_row(&row),
            Err(SkipReason::InvalidField {
                column: "value".into(),
                value: "n/a".into()
            })
        );

        let section = spec.parse_table(&table_from(&[&["disk", "n/a"], &["cpu", "12.5"]]));
        assert_eq!(section.map(|s| s.len()), Some(1));
    }

    #[test]
    fn empty_table_is_no_data() {
        assert_eq!(status_spec().parse_table(&[]), None);
    }

    #[test]
    fn all_rows_skipped_is_no_data() {
        let table = table_from(&[&["eth0"], &["", "6", "0", "1", "1"]]);
        assert_eq!(status_spec().parse_table(&table), None);
    }

    #[test]
    fn later_duplicate_wins() {
        let table = table_from(&[
            &["eth0", "6", "10", "1", "1"],
            &["eth0", "6", "20", "1", "2"],
        ]);
        let section = status_spec().parse_table(&table).unwrap();
        assert_eq!(section.len(), 1);
        assert_eq!(section.get("eth0").and_then(|r| r.counter("speed")), Some(20));
    }

    #[test]
    fn scalar_table_uses_first_row_and_pads() {
        let spec = TableSpec::new("device_setup")
            .column(ColumnSpec::text("contact").lenient())
            .column(ColumnSpec::text("name").lenient())
            .column(ColumnSpec::text("location").lenient())
            .min_columns(1);

        let section = spec
            .parse_table(&table_from(&[&["admin@example.com", "core-sw"], &["ignored"]]))
            .unwrap();
        let record = section.scalar_record().unwrap();
        assert_eq!(record.text("name"), Some("core-sw"));
        assert_eq!(record.text("location"), Some(""));
    }

    #[test]
    fn scalar_table_skips_invalid_leading_rows() {
        let spec = TableSpec::new("uptime")
            .column(ColumnSpec::integer("ticks"))
            .column(ColumnSpec::text("source").lenient());

        let section = spec
            .parse_table(&table_from(&[&["n/a", "agent"], &["4200", "snmp"], &["9000", "late"]]))
            .unwrap();
        let record = section.scalar_record().unwrap();
        assert_eq!(record.integer("ticks"), Some(4200));
        assert_eq!(record.text("source"), Some("snmp"));

        assert!(spec.parse_table(&table_from(&[&["n/a", "agent"], &["?"]])).is_none());
    }

    #[test]
    fn flag_conversion() {
        let column = ColumnSpec::flag("enabled");
        assert_eq!(column.convert("1"), Some(FieldValue::Flag(true)));
        assert_eq!(column.convert("2"), Some(FieldValue::Flag(false)));
        assert_eq!(column.convert("On"), Some(FieldValue::Flag(true)));
        assert_eq!(column.convert("maybe"), None);
    }

    #[test]
    fn non_finite_float_is_invalid() {
        assert_eq!(ColumnSpec::float("v").convert("NaN"), None);
        assert_eq!(ColumnSpec::float("v").convert(" 4.5 "), Some(FieldValue::Float(4.5)));
    }

    #[test]
    fn fallback_record_skips_key() {
        let record = status_spec().fallback_record();
        assert!(!record.contains("descr"));
        assert_eq!(record.counter("speed"), Some(0));
    }
}
