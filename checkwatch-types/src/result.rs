//! Evaluations emitted by checks and their aggregate.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Metric, State};

/// Whether an evaluation contributes to the aggregated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Weight {
    /// The evaluation's state takes part in worst-of aggregation.
    #[default]
    LoadBearing,
    /// The evaluation is reported (text and metrics) but never changes the state.
    Informational,
}

/// One sub-result of a check: a state, a text and any metrics.
///
/// Texts come in two flavours: summary texts always appear in the
/// aggregated summary line, notices only when their state is not OK. Both
/// always appear in the details.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub state: State,
    pub text: String,
    pub notice: bool,
    pub weight: Weight,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub metrics: Vec<Metric>,
}

impl Evaluation {
    /// A load-bearing result shown in the summary.
    pub fn new(state: State, summary: impl Into<String>) -> Self {
        Self {
            state,
            text: summary.into(),
            notice: false,
            weight: Weight::LoadBearing,
            metrics: Vec::new(),
        }
    }

    /// A load-bearing result shown in the summary only when not OK.
    pub fn notice(state: State, text: impl Into<String>) -> Self {
        Self {
            notice: true,
            ..Self::new(state, text)
        }
    }

    /// A result that is reported but never drives the aggregated state.
    ///
    /// Used for benign conditions such as a rate that is still collecting.
    pub fn informational(state: State, text: impl Into<String>) -> Self {
        Self {
            weight: Weight::Informational,
            ..Self::new(state, text)
        }
    }

    /// A bare metric without any text.
    pub fn metric(metric: Metric) -> Self {
        Self {
            state: State::Ok,
            text: String::new(),
            notice: true,
            weight: Weight::Informational,
            metrics: alloc::vec![metric],
        }
    }

    /// Attach a metric to this evaluation.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn is_load_bearing(&self) -> bool {
        self.weight == Weight::LoadBearing
    }
}

/// Final result for one checked entity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatedResult {
    pub state: State,
    pub summary: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub details: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub metrics: Vec<Metric>,
}

impl AggregatedResult {
    /// Find a metric by name.
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_weight_and_visibility() {
        let e = Evaluation::new(State::Warn, "Speed changed");
        assert!(e.is_load_bearing());
        assert!(!e.notice);

        let e = Evaluation::notice(State::Ok, "Speed: 1 Gbit/s");
        assert!(e.is_load_bearing());
        assert!(e.notice);

        let e = Evaluation::informational(State::Ok, "Traffic: collecting data");
        assert!(!e.is_load_bearing());
    }

    #[test]
    fn metric_only_evaluation_is_silent() {
        let e = Evaluation::metric(Metric::new("if_in_bps", 1.0));
        assert!(e.text.is_empty());
        assert!(!e.is_load_bearing());
        assert_eq!(e.metrics.len(), 1);
    }

    #[test]
    fn aggregated_result_metric_lookup() {
        let result = AggregatedResult {
            state: State::Ok,
            summary: String::from("fine"),
            details: Vec::new(),
            metrics: alloc::vec![Metric::new("a", 1.0), Metric::new("b", 2.0)],
        };
        assert_eq!(result.metric("b").map(|m| m.value), Some(2.0));
        assert!(result.metric("c").is_none());
    }
}
