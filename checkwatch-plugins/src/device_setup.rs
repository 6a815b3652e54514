//! Checks that a device's contact, name and location are configured.
//!
//! Table layout (single row): `contact, name, location`.

use checkwatch_engine::{
    CheckContext, CheckError, CheckPlugin, ColumnSpec, Discovery, Parameters, Service, TableSpec,
};
use checkwatch_types::{Evaluation, RawTable, Section, State};

use crate::entity;

const FIELDS: [&str; 3] = ["contact", "name", "location"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceSetup;

impl DeviceSetup {
    pub fn table() -> TableSpec {
        FIELDS
            .iter()
            .fold(TableSpec::new("device_setup"), |spec, field| {
                spec.column(ColumnSpec::text(*field).lenient())
            })
            .min_columns(1)
    }
}

impl CheckPlugin for DeviceSetup {
    fn name(&self) -> &str {
        "device_setup"
    }

    fn service_name(&self) -> &str {
        "Device Setup"
    }

    fn parse(&self, tables: &[RawTable]) -> Option<Section> {
        Self::table().parse_table(tables.first()?)
    }

    fn discover(&self, section: &Section) -> Vec<Service> {
        Discovery::new().discover(Some(section))
    }

    fn check(
        &self,
        item: Option<&str>,
        _params: &Parameters,
        section: &Section,
        _ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError> {
        let Some(setup) = entity(section, item) else {
            return Ok(Vec::new());
        };

        let missing: Vec<&str> = FIELDS
            .iter()
            .copied()
            .filter(|field| setup.text(field).map_or(true, str::is_empty))
            .collect();

        let evaluation = if missing.is_empty() {
            Evaluation::new(
                State::Ok,
                format!(
                    "Name: {}, Location: {}",
                    setup.text("name").unwrap_or_default(),
                    setup.text("location").unwrap_or_default()
                ),
            )
        } else {
            Evaluation::new(State::Warn, format!("Missing: {}", missing.join(", ")))
        };
        Ok(vec![evaluation])
    }
}
