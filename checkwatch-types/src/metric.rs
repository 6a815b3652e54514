//! Named metric values with optional bounds.

use alloc::string::String;

/// Optional warn/crit levels and min/max boundaries attached to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub warn: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub crit: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub min: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub max: Option<f64>,
}

impl Bounds {
    pub fn is_empty(&self) -> bool {
        self.warn.is_none() && self.crit.is_none() && self.min.is_none() && self.max.is_none()
    }
}

/// A named measurement emitted by a check.
///
/// # Example
///
/// ```rust
/// use checkwatch_types::Metric;
///
/// let m = Metric::new("memory_used", 512.0)
///     .levels(700.0, 850.0)
///     .boundaries(Some(0.0), Some(1024.0));
///
/// assert_eq!(m.bounds.crit, Some(850.0));
/// assert_eq!(m.bounds.max, Some(1024.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metric {
    pub name: String,
    pub value: f64,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub bounds: Bounds,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            bounds: Bounds::default(),
        }
    }

    /// Attach warning and critical levels.
    pub fn levels(mut self, warn: f64, crit: f64) -> Self {
        self.bounds.warn = Some(warn);
        self.bounds.crit = Some(crit);
        self
    }

    /// Attach min/max boundaries.
    pub fn boundaries(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.bounds.min = min;
        self.bounds.max = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metric_has_no_bounds() {
        let m = Metric::new("if_in_bps", 8000.0);
        assert_eq!(m.name, "if_in_bps");
        assert!(m.bounds.is_empty());
    }

    #[test]
    fn levels_and_boundaries_are_independent() {
        let m = Metric::new("usage", 42.0).boundaries(Some(0.0), Some(100.0));
        assert_eq!(m.bounds.warn, None);
        assert_eq!(m.bounds.min, Some(0.0));

        let m = m.levels(80.0, 90.0);
        assert_eq!(m.bounds.warn, Some(80.0));
        assert_eq!(m.bounds.max, Some(100.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_flat_and_skips_missing_bounds() {
        let m = Metric::new("cpu_percent", 12.5).levels(80.0, 90.0);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"name":"cpu_percent","value":12.5,"warn":80.0,"crit":90.0}"#);
    }
}
