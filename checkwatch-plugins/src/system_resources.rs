//! CPU and memory usage from scalar values.
//!
//! Table layout (single row): `cpu_percent, memory_used, memory_total`,
//! memory in bytes.

use checkwatch_engine::{
    check_levels, render, CheckContext, CheckError, CheckPlugin, ColumnSpec, Discovery, LevelSpec, Parameters,
    Predicate, Service, TableSpec,
};
use checkwatch_types::{Evaluation, Metric, RawTable, Section, State};
use serde_json::json;

use crate::entity;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResources;

impl SystemResources {
    pub fn table() -> TableSpec {
        TableSpec::new("system_resources")
            .column(ColumnSpec::float("cpu_percent").lenient())
            .column(ColumnSpec::counter("memory_used").lenient())
            .column(ColumnSpec::counter("memory_total").lenient())
            .min_columns(1)
    }
}

impl CheckPlugin for SystemResources {
    fn name(&self) -> &str {
        "system_resources"
    }

    fn service_name(&self) -> &str {
        "System Resources"
    }

    fn parse(&self, tables: &[RawTable]) -> Option<Section> {
        Self::table().parse_table(tables.first()?)
    }

    fn discover(&self, section: &Section) -> Vec<Service> {
        Discovery::new()
            .require(Predicate::Positive("memory_total".into()))
            .discover(Some(section))
    }

    fn default_parameters(&self) -> Parameters {
        Parameters::new()
            .with("cpu_levels", json!(["fixed", [80.0, 90.0]]))
            .with("memory_levels", json!(["fixed", [70.0, 85.0]]))
    }

    fn level_parameters(&self) -> &[&str] {
        &["cpu_levels", "memory_levels"]
    }

    fn check(
        &self,
        item: Option<&str>,
        params: &Parameters,
        section: &Section,
        _ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError> {
        let Some(resources) = entity(section, item) else {
            return Ok(Vec::new());
        };

        let cpu = LevelSpec::new("CPU")
            .metric("cpu_percent")
            .upper(params.levels("cpu_levels")?)
            .boundaries(Some(0.0), Some(100.0))
            .render(render::percent);
        let mut out = vec![check_levels(
            resources.float("cpu_percent").unwrap_or_default(),
            &cpu,
        )];

        let used = resources.counter("memory_used").unwrap_or_default() as f64;
        let total = resources.counter("memory_total").unwrap_or_default() as f64;
        if total > 0.0 {
            let memory = LevelSpec::new("Memory")
                .metric("memory_percent")
                .upper(params.levels("memory_levels")?)
                .boundaries(Some(0.0), Some(100.0))
                .render(render::percent);
            out.push(check_levels(used / total * 100.0, &memory));
            out.push(Evaluation::notice(
                State::Ok,
                format!("Used: {} of {}", render::bytes(used), render::bytes(total)),
            ));
            out.push(Evaluation::metric(
                Metric::new("memory_used", used).boundaries(Some(0.0), Some(total)),
            ));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkwatch_engine::{aggregate, MemoryStore};
    use checkwatch_types::{table_from, AggregatedResult};

    fn run(row: &[&str], params: &Parameters) -> AggregatedResult {
        let section = SystemResources.parse(&[table_from(&[row])]).unwrap();
        let mut store = MemoryStore::new();
        let mut ctx = CheckContext::new(0.0, &mut store);
        aggregate(SystemResources.check(None, params, &section, &mut ctx).unwrap())
    }

    #[test]
    fn discovers_itemless_when_memory_known() {
        let section = SystemResources
            .parse(&[table_from(&[&["12.5", "512", "1024"]])])
            .unwrap();
        assert_eq!(SystemResources.discover(&section), vec![Service::itemless()]);

        let section = SystemResources.parse(&[table_from(&[&["12.5"]])]).unwrap();
        assert!(SystemResources.discover(&section).is_empty());
    }

    #[test]
    fn within_levels() {
        let result = run(&["12.5", "536870912", "1073741824"], &SystemResources.default_parameters());
        assert_eq!(result.state, State::Ok);
        assert_eq!(result.summary, "CPU: 12.50%, Memory: 50.00%");
        assert!(result.details.iter().any(|d| d == "Used: 512.00 MiB of 1.00 GiB"));

        let used = result.metric("memory_used").unwrap();
        assert_eq!(used.bounds.max, Some(1073741824.0));
        assert_eq!(result.metric("cpu_percent").and_then(|m| m.bounds.warn), Some(80.0));
    }

    #[test]
    fn memory_above_levels() {
        let result = run(&["12.5", "900", "1000"], &SystemResources.default_parameters());
        assert_eq!(result.state, State::Crit);
        assert!(result.summary.contains("Memory: 90.00% (warn/crit at 70.00%/85.00%)(!!)"));
    }

    #[test]
    fn no_levels_configured() {
        let params = Parameters::new().with("cpu_levels", json!(["no_levels", null]));
        let result = run(&["99.0", "0", "0"], &params);
        assert_eq!(result.state, State::Ok);
        assert!(result.metric("memory_used").is_none());
    }
}
