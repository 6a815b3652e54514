//! Items reported by an agent section.
//!
//! Section format:
//!
//! ```text
//! <<<agent_items:sep(59)>>>
//! item1;100;OK
//! item2;75;WARNING
//! ```
//!
//! The value is a percentage checked against upper and lower levels; the
//! reported status is passed through as a notice.

use checkwatch_engine::{
    check_levels, render, CheckContext, CheckError, CheckPlugin, ColumnSpec, Discovery, LevelSpec, Parameters,
    Service, TableSpec,
};
use checkwatch_types::{Evaluation, RawTable, Section, State};
use serde_json::json;

use crate::entity;

#[derive(Debug, Clone, Copy, Default)]
pub struct AgentItems;

impl AgentItems {
    pub fn table() -> TableSpec {
        TableSpec::new("agent_items")
            .column(ColumnSpec::text("item"))
            .column(ColumnSpec::float("value"))
            .column(ColumnSpec::text("status").lenient())
            .key("item")
    }
}

impl CheckPlugin for AgentItems {
    fn name(&self) -> &str {
        "agent_items"
    }

    fn service_name(&self) -> &str {
        "Item %s"
    }

    fn parse(&self, tables: &[RawTable]) -> Option<Section> {
        Self::table().parse_table(tables.first()?)
    }

    fn discover(&self, section: &Section) -> Vec<Service> {
        Discovery::new().discover(Some(section))
    }

    fn default_parameters(&self) -> Parameters {
        Parameters::new()
            .with("levels_upper", json!(["fixed", [80.0, 90.0]]))
            .with("levels_lower", json!(["fixed", [10.0, 5.0]]))
    }

    fn level_parameters(&self) -> &[&str] {
        &["levels_upper", "levels_lower"]
    }

    fn check(
        &self,
        item: Option<&str>,
        params: &Parameters,
        section: &Section,
        _ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError> {
        let Some(data) = entity(section, item) else {
            return Ok(Vec::new());
        };

        let spec = LevelSpec::new("Value")
            .metric("item_value")
            .upper(params.levels("levels_upper")?)
            .lower(params.levels("levels_lower")?)
            .boundaries(Some(0.0), Some(100.0))
            .render(render::percent);

        Ok(vec![
            check_levels(data.float("value").unwrap_or_default(), &spec),
            Evaluation::notice(
                State::Ok,
                format!("Reported status: {}", data.text("status").unwrap_or_default()),
            ),
        ])
    }
}
