//! Rendering of check results and discovered services.

use checkwatch_engine::{CheckPlugin, Parameters, Service};
use checkwatch_types::{AggregatedResult, Metric, State};
use serde::Serialize;

use crate::config::OutputFormat;

/// The result of checking one service on one host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub host: String,
    pub plugin: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(flatten)]
    pub result: AggregatedResult,
}

impl CheckReport {
    /// An UNKNOWN report for a check that could not run at all.
    pub fn failed(host: &str, plugin: &str, service: &str, item: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            host: host.to_string(),
            plugin: plugin.to_string(),
            service: service.to_string(),
            item: item.map(String::from),
            result: AggregatedResult {
                state: State::Unknown,
                summary: message.clone(),
                details: vec![message],
                metrics: Vec::new(),
            },
        }
    }
}

/// A discovered service as printed by `discover`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceReport {
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub parameters: Parameters,
}

impl ServiceReport {
    pub fn new(plugin: &dyn CheckPlugin, service: Service) -> Self {
        Self {
            service: plugin.service_description(service.item.as_deref()),
            item: service.item,
            parameters: service.parameters,
        }
    }
}

/// Render a check report in the requested format.
pub fn render_report(report: &CheckReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(local_check_line(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report),
    }
}

/// Render discovered services as JSON.
pub fn render_services(services: &[ServiceReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(services)
}

/// A local-check line: `<code> "<service>" <metrics|-> <summary>`.
///
/// Metrics are `name=value;warn;crit;min;max` joined by `|`, trailing empty
/// fields dropped. When there is more than one detail, the details follow
/// the summary as long output, separated by a literal `\n`.
///
/// The line never spans more than one physical line: line breaks inside the
/// summary or details become a literal `\n`, and double quotes in the
/// service name become single quotes.
pub fn local_check_line(report: &CheckReport) -> String {
    let result = &report.result;
    let metrics = if result.metrics.is_empty() {
        "-".to_string()
    } else {
        result
            .metrics
            .iter()
            .map(metric_field)
            .collect::<Vec<_>>()
            .join("|")
    };

    let mut line = format!(
        "{} \"{}\" {} {}",
        result.state.code(),
        quoted_service(&report.service),
        metrics,
        single_line(&result.summary)
    );
    if result.details.len() > 1 {
        for detail in &result.details {
            line.push_str("\\n");
            line.push_str(&single_line(detail));
        }
    }
    line
}

fn quoted_service(service: &str) -> String {
    service
        .chars()
        .map(|c| match c {
            '"' => '\'',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", "\\n").replace(['\n', '\r'], "\\n")
}

fn metric_field(metric: &Metric) -> String {
    let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    let bounds = &metric.bounds;
    let field = format!(
        "{}={};{};{};{};{}",
        metric.name,
        metric.value,
        optional(bounds.warn),
        optional(bounds.crit),
        optional(bounds.min),
        optional(bounds.max)
    );
    field.trim_end_matches(';').to_string()
}
