//! Check parameters.
//!
//! Parameters are a JSON object layered from three sources, later layers
//! winning per key: the plugin's defaults, the baseline captured at
//! discovery, and user overrides.

use checkwatch_types::{FieldValue, Levels};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParamsError;
use crate::levels::parse_levels;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: Map<String, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ParamsError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            other => Err(ParamsError::NotAnObject(other.to_string())),
        }
    }

    /// Merge `defaults ← baseline ← overrides`.
    pub fn layered(defaults: &Parameters, baseline: &Parameters, overrides: &Parameters) -> Self {
        let mut merged = defaults.clone();
        merged.extend(baseline);
        merged.extend(overrides);
        merged
    }

    /// Copy every key of `other`, replacing existing values.
    pub fn extend(&mut self, other: &Parameters) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`Parameters::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>, ParamsError> {
        self.typed(key, "a number", Value::as_f64)
    }

    pub fn u64(&self, key: &str) -> Result<Option<u64>, ParamsError> {
        self.typed(key, "a non-negative integer", Value::as_u64)
    }

    pub fn i64(&self, key: &str) -> Result<Option<i64>, ParamsError> {
        self.typed(key, "an integer", Value::as_i64)
    }

    pub fn str(&self, key: &str) -> Result<Option<&str>, ParamsError> {
        self.typed(key, "a string", Value::as_str)
    }

    /// Threshold spec stored under `key`; a missing key means no levels.
    pub fn levels(&self, key: &str) -> Result<Levels, ParamsError> {
        match self.values.get(key) {
            None => Ok(Levels::NoLevels),
            Some(value) => parse_levels(value).map_err(|source| ParamsError::Levels {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        convert: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, ParamsError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => convert(value).map(Some).ok_or_else(|| ParamsError::WrongType {
                key: key.to_string(),
                expected,
            }),
        }
    }
}

/// JSON form of a field value, used for discovery baselines.
pub fn field_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Flag(v) => Value::from(*v),
        FieldValue::Counter(v) => Value::from(*v),
        FieldValue::Integer(v) => Value::from(*v),
        FieldValue::Float(v) => Value::from(*v),
        FieldValue::Text(v) => Value::from(v.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn later_layers_win() {
        let defaults = Parameters::new()
            .with("expected_status", 1)
            .with("utilization_levels", json!([80.0, 90.0]));
        let baseline = Parameters::new().with("discovered_speed", 1_000_000_000u64);
        let overrides = Parameters::new().with("utilization_levels", json!(["fixed", [50.0, 60.0]]));

        let merged = Parameters::layered(&defaults, &baseline, &overrides);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.u64("discovered_speed"), Ok(Some(1_000_000_000)));
        assert_eq!(
            merged.levels("utilization_levels"),
            Ok(Levels::fixed(50.0, 60.0))
        );
    }

    #[test]
    fn missing_levels_mean_no_levels() {
        assert_eq!(Parameters::new().levels("cpu_levels"), Ok(Levels::NoLevels));
    }

    #[test]
    fn malformed_levels_name_the_key() {
        let params = Parameters::new().with("cpu_levels", json!(["fixed", [80.0]]));
        match params.levels("cpu_levels") {
            Err(ParamsError::Levels { key, .. }) => assert_eq!(key, "cpu_levels"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn typed_accessors_reject_wrong_types() {
        let params = Parameters::new().with("expected_status", "up");
        assert_eq!(
            params.u64("expected_status"),
            Err(ParamsError::WrongType {
                key: "expected_status".into(),
                expected: "a non-negative integer"
            })
        );
        assert_eq!(params.str("expected_status"), Ok(Some("up")));
        assert_eq!(params.f64("missing"), Ok(None));
    }

    #[test]
    fn from_value_requires_object() {
        assert!(Parameters::from_value(json!({"a": 1})).is_ok());
        assert_eq!(Parameters::from_value(Value::Null), Ok(Parameters::new()));
        assert!(matches!(
            Parameters::from_value(json!([1, 2])),
            Err(ParamsError::NotAnObject(_))
        ));
    }

    #[test]
    fn serializes_as_plain_object() {
        let params = Parameters::new().with("discovered_speed", 100);
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"discovered_speed": 100}));
    }
}
