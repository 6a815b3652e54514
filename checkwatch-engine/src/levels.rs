//! Threshold evaluation.

use checkwatch_types::{Direction, Evaluation, Levels, Metric, State};
use serde_json::Value;

use crate::error::LevelsError;
use crate::render;

/// Classify a value against optional warn/crit bounds.
///
/// Boundaries are inclusive and the critical bound is checked first. The
/// bounds are not required to be ordered.
///
/// # Example
///
/// ```rust
/// use checkwatch_engine::evaluate;
/// use checkwatch_types::{Direction, Levels, State};
///
/// let levels = Levels::fixed(80.0, 90.0);
/// assert_eq!(evaluate(85.0, &levels, Direction::Upper), State::Warn);
/// assert_eq!(evaluate(90.0, &levels, Direction::Upper), State::Crit);
/// assert_eq!(evaluate(50.0, &Levels::NoLevels, Direction::Upper), State::Ok);
/// ```
pub fn evaluate(value: f64, levels: &Levels, direction: Direction) -> State {
    let Some((warn, crit)) = levels.bounds() else {
        return State::Ok;
    };

    match direction {
        Direction::Upper => {
            if value >= crit {
                State::Crit
            } else if value >= warn {
                State::Warn
            } else {
                State::Ok
            }
        }
        Direction::Lower => {
            if value <= crit {
                State::Crit
            } else if value <= warn {
                State::Warn
            } else {
                State::Ok
            }
        }
    }
}

/// Parse a threshold spec from its configuration form.
///
/// Accepted forms:
/// - `null` or `["no_levels", null]`: no levels
/// - `["fixed", [warn, crit]]`: fixed levels
/// - `[warn, crit]`: shorthand for fixed levels
pub fn parse_levels(value: &Value) -> Result<Levels, LevelsError> {
    let pair = match value {
        Value::Null => return Ok(Levels::NoLevels),
        Value::Array(items) if items.len() == 2 => items,
        other => return Err(LevelsError::NotAPair(other.to_string())),
    };

    match (&pair[0], &pair[1]) {
        (Value::String(kind), bounds) => match kind.as_str() {
            "no_levels" => Ok(Levels::NoLevels),
            "fixed" => parse_bounds(bounds),
            other => Err(LevelsError::UnknownKind(other.to_string())),
        },
        (Value::Number(_), Value::Number(_)) => parse_bounds(value),
        _ => Err(LevelsError::NotAPair(value.to_string())),
    }
}

fn parse_bounds(value: &Value) -> Result<Levels, LevelsError> {
    let invalid = || LevelsError::InvalidBounds(value.to_string());
    let bounds = value.as_array().filter(|b| b.len() == 2).ok_or_else(invalid)?;
    let warn = bounds[0].as_f64().ok_or_else(invalid)?;
    let crit = bounds[1].as_f64().ok_or_else(invalid)?;
    Ok(Levels::fixed(warn, crit))
}

/// Describes how [`check_levels`] evaluates, renders and records a value.
#[derive(Debug, Clone)]
pub struct LevelSpec {
    pub label: String,
    pub metric: Option<String>,
    pub upper: Levels,
    pub lower: Levels,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub render: fn(f64) -> String,
}

impl LevelSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            metric: None,
            upper: Levels::NoLevels,
            lower: Levels::NoLevels,
            min: None,
            max: None,
            render: render::number,
        }
    }

    pub fn metric(mut self, name: impl Into<String>) -> Self {
        self.metric = Some(name.into());
        self
    }

    pub fn upper(mut self, levels: Levels) -> Self {
        self.upper = levels;
        self
    }

    pub fn lower(mut self, levels: Levels) -> Self {
        self.lower = levels;
        self
    }

    pub fn boundaries(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn render(mut self, render: fn(f64) -> String) -> Self {
        self.render = render;
        self
    }
}

/// Evaluate a value against upper and lower levels and describe it.
///
/// The summary reads `"Label: 85.00% (warn/crit at 80.00%/90.00%)"`; the
/// levels are only mentioned when they are breached. If a metric name is
/// set, the evaluation carries the metric with the upper levels and the
/// boundaries.
///
/// # Example
///
/// ```rust
/// use checkwatch_engine::{check_levels, render, LevelSpec};
/// use checkwatch_types::{Levels, State};
///
/// let spec = LevelSpec::new("CPU")
///     .metric("cpu_percent")
///     .upper(Levels::fixed(80.0, 90.0))
///     .render(render::percent);
///
/// let result = check_levels(85.0, &spec);
/// assert_eq!(result.state, State::Warn);
/// assert_eq!(result.text, "CPU: 85.00% (warn/crit at 80.00%/90.00%)");
/// assert_eq!(result.metrics[0].bounds.warn, Some(80.0));
/// ```
pub fn check_levels(value: f64, spec: &LevelSpec) -> Evaluation {
    let render = spec.render;
    let mut text = if spec.label.is_empty() {
        render(value)
    } else {
        format!("{}: {}", spec.label, render(value))
    };

    let upper = evaluate(value, &spec.upper, Direction::Upper);
    if let (false, Some((warn, crit))) = (upper.is_ok(), spec.upper.bounds()) {
        text.push_str(&format!(" (warn/crit at {}/{})", render(warn), render(crit)));
    }

    let lower = evaluate(value, &spec.lower, Direction::Lower);
    if let (false, Some((warn, crit))) = (lower.is_ok(), spec.lower.bounds()) {
        text.push_str(&format!(" (warn/crit below {}/{})", render(warn), render(crit)));
    }

    let mut evaluation = Evaluation::new(upper.worse(lower), text);
    if let Some(name) = &spec.metric {
        let mut metric = Metric::new(name.clone(), value).boundaries(spec.min, spec.max);
        if let Some((warn, crit)) = spec.upper.bounds() {
            metric = metric.levels(warn, crit);
        }
        evaluation = evaluation.with_metric(metric);
    }
    evaluation
}
