//! Result aggregation.

use checkwatch_types::{AggregatedResult, Evaluation, State};

/// Combine the evaluations of one check into a single result.
///
/// - The state is the worst state among load-bearing evaluations, where
///   UNKNOWN only outranks OK. Informational evaluations never change it.
///   With no evaluations at all the result is UNKNOWN.
/// - The summary joins the texts of summary evaluations and of notices that
///   are not OK, each non-OK text marked with `(!)`, `(!!)` or `(?)`.
/// - The details list every text in emission order.
/// - The metrics of every evaluation are kept in emission order.
///
/// # Example
///
/// ```rust
/// use checkwatch_engine::aggregate;
/// use checkwatch_types::{Evaluation, State};
///
/// let result = aggregate(vec![
///     Evaluation::new(State::Ok, "Status: up"),
///     Evaluation::informational(State::Ok, "Traffic: collecting data"),
///     Evaluation::new(State::Warn, "Speed changed"),
/// ]);
///
/// assert_eq!(result.state, State::Warn);
/// assert_eq!(result.summary, "Status: up, Traffic: collecting data, Speed changed(!)");
/// ```
pub fn aggregate<I>(evaluations: I) -> AggregatedResult
where
    I: IntoIterator<Item = Evaluation>,
{
    let evaluations: Vec<Evaluation> = evaluations.into_iter().collect();
    if evaluations.is_empty() {
        return AggregatedResult {
            state: State::Unknown,
            summary: "no result".to_string(),
            details: Vec::new(),
            metrics: Vec::new(),
        };
    }

    let state = State::worst(
        evaluations
            .iter()
            .filter(|e| e.is_load_bearing())
            .map(|e| e.state),
    )
    .unwrap_or(State::Ok);

    let mut summary = Vec::new();
    let mut details = Vec::new();
    let mut metrics = Vec::new();

    for evaluation in evaluations {
        if !evaluation.text.is_empty() {
            let text = format!("{}{}", evaluation.text, evaluation.state.marker());
            if !evaluation.notice || !evaluation.state.is_ok() {
                summary.push(text.clone());
            }
            details.push(text);
        }
        metrics.extend(evaluation.metrics);
    }

    let summary = if summary.is_empty() && !details.is_empty() {
        "Everything looks OK".to_string()
    } else {
        summary.join(", ")
    };

    AggregatedResult {
        state,
        summary,
        details,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkwatch_types::Metric;

    #[test]
    fn empty_is_unknown() {
        let result = aggregate(Vec::new());
        assert_eq!(result.state, State::Unknown);
        assert_eq!(result.summary, "no result");
    }

    #[test]
    fn worst_load_bearing_state_wins() {
        let result = aggregate(vec![
            Evaluation::new(State::Ok, "a"),
            Evaluation::new(State::Crit, "b"),
            Evaluation::new(State::Warn, "c"),
        ]);
        assert_eq!(result.state, State::Crit);
        assert_eq!(result.summary, "a, b(!!), c(!)");
    }

    #[test]
    fn unknown_does_not_mask_concrete_states() {
        let result = aggregate(vec![
            Evaluation::new(State::Unknown, "sensor unreadable"),
            Evaluation::new(State::Warn, "temperature high"),
        ]);
        assert_eq!(result.state, State::Warn);

        let result = aggregate(vec![
            Evaluation::new(State::Ok, "fine"),
            Evaluation::new(State::Unknown, "sensor unreadable"),
        ]);
        assert_eq!(result.state, State::Unknown);
    }

    #[test]
    fn informational_never_changes_state() {
        let result = aggregate(vec![
            Evaluation::new(State::Ok, "Status: up"),
            Evaluation::informational(State::Unknown, "Errors: counter reset"),
        ]);
        assert_eq!(result.state, State::Ok);
        assert_eq!(result.details.len(), 2);
    }

    #[test]
    fn only_informational_is_ok() {
        let result = aggregate(vec![Evaluation::informational(State::Ok, "collecting data")]);
        assert_eq!(result.state, State::Ok);
        assert_eq!(result.summary, "collecting data");
    }

    #[test]
    fn ok_notices_stay_out_of_summary() {
        let result = aggregate(vec![
            Evaluation::new(State::Ok, "Status: up"),
            Evaluation::notice(State::Ok, "Speed: 1.00 Gbit/s"),
            Evaluation::notice(State::Warn, "Reported status: degraded"),
        ]);
        assert_eq!(result.summary, "Status: up, Reported status: degraded(!)");
        assert_eq!(
            result.details,
            vec![
                "Status: up".to_string(),
                "Speed: 1.00 Gbit/s".to_string(),
                "Reported status: degraded(!)".to_string(),
            ]
        );
    }

    #[test]
    fn only_ok_notices_summarize_as_ok() {
        let result = aggregate(vec![Evaluation::notice(State::Ok, "Speed: 1.00 Gbit/s")]);
        assert_eq!(result.summary, "Everything looks OK");
    }

    #[test]
    fn metrics_kept_in_emission_order() {
        let result = aggregate(vec![
            Evaluation::new(State::Ok, "In: 8.00 kbit/s").with_metric(Metric::new("if_in_bps", 8000.0)),
            Evaluation::metric(Metric::new("if_out_bps", 640.0)),
            Evaluation::new(State::Crit, "Utilization: 95.00%")
                .with_metric(Metric::new("if_util_percent", 95.0)),
        ]);
        let names: Vec<_> = result.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["if_in_bps", "if_out_bps", "if_util_percent"]);
        assert_eq!(result.state, State::Crit);
    }
}
