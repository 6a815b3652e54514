//! Operational status of interfaces from a single ifTable walk.
//!
//! Table layout: `descr, type, speed, admin_status, oper_status`.

use checkwatch_engine::{
    CheckContext, CheckError, CheckPlugin, ColumnSpec, Discovery, Parameters, Predicate, Service, TableSpec,
};
use checkwatch_types::{Evaluation, RawTable, Section, State};

use crate::entity;
use crate::ifmib::{oper_status, UP};

/// One service per administratively up interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceStatus;

impl InterfaceStatus {
    pub fn table() -> TableSpec {
        TableSpec::new("interface_status")
            .column(ColumnSpec::text("descr"))
            .column(ColumnSpec::integer("type").lenient())
            .column(ColumnSpec::counter("speed").lenient())
            .column(ColumnSpec::integer("admin_status").lenient())
            .column(ColumnSpec::integer("oper_status").lenient())
            .key("descr")
    }
}

impl CheckPlugin for InterfaceStatus {
    fn name(&self) -> &str {
        "interface_status"
    }

    fn service_name(&self) -> &str {
        "Interface %s"
    }

    fn parse(&self, tables: &[RawTable]) -> Option<Section> {
        Self::table().parse_table(tables.first()?)
    }

    fn discover(&self, section: &Section) -> Vec<Service> {
        Discovery::new()
            .require(Predicate::equals("admin_status", UP))
            .discover(Some(section))
    }

    fn check(
        &self,
        item: Option<&str>,
        _params: &Parameters,
        section: &Section,
        _ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError> {
        let Some(interface) = entity(section, item) else {
            return Ok(Vec::new());
        };

        let (mut state, name) = oper_status(interface.integer("oper_status").unwrap_or_default());
        let mut text = name.to_string();

        // an interface shut down on purpose is not a problem
        if interface.integer("admin_status") != Some(UP) {
            state = State::Ok;
            text.push_str(" (admin down)");
        }

        Ok(vec![Evaluation::new(state, format!("Status: {}", text))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkwatch_engine::MemoryStore;
    use checkwatch_types::table_from;

    fn check(rows: &[&[&str]], item: &str) -> Vec<Evaluation> {
        let section = InterfaceStatus.parse(&[table_from(rows)]).unwrap();
        let mut store = MemoryStore::new();
        let mut ctx = CheckContext::new(0.0, &mut store);
        InterfaceStatus
            .check(Some(item), &Parameters::new(), &section, &mut ctx)
            .unwrap()
    }

    #[test]
    fn discovers_admin_up_only() {
        let section = InterfaceStatus
            .parse(&[table_from(&[
                &["eth0", "6", "1000000000", "1", "1"],
                &["eth1", "6", "1000000000", "2", "2"],
            ])])
            .unwrap();
        let services = InterfaceStatus.discover(&section);
        assert_eq!(services, vec![Service::new("eth0")]);
    }

    #[test]
    fn oper_down_is_critical() {
        let result = check(&[&["eth0", "6", "0", "1", "2"]], "eth0");
        assert_eq!(result[0].state, State::Crit);
        assert_eq!(result[0].text, "Status: down");
    }

    #[test]
    fn admin_down_is_ok() {
        let result = check(&[&["eth0", "6", "0", "2", "2"]], "eth0");
        assert_eq!(result[0].state, State::Ok);
        assert_eq!(result[0].text, "Status: down (admin down)");
    }

    #[test]
    fn dormant_is_warning() {
        let result = check(&[&["eth0", "6", "0", "1", "5"]], "eth0");
        assert_eq!(result[0].state, State::Warn);
    }
}
