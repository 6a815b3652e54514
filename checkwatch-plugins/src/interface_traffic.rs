//! Interface traffic from 32-bit octet counters.
//!
//! Table layout: `index, descr, in_octets, out_octets`.

use checkwatch_engine::{
    render, CheckContext, CheckError, CheckPlugin, ColumnSpec, CounterWidth, Discovery, Parameters, Rate, Service,
    TableSpec,
};
use checkwatch_types::{metric_key, Evaluation, Metric, RawTable, Section, State};

use crate::entity;

#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceTraffic;

impl InterfaceTraffic {
    pub fn table() -> TableSpec {
        TableSpec::new("interface_traffic")
            .column(ColumnSpec::text("index").lenient())
            .column(ColumnSpec::text("descr"))
            .column(ColumnSpec::counter("in_octets").lenient())
            .column(ColumnSpec::counter("out_octets").lenient())
            .key("descr")
    }
}

impl CheckPlugin for InterfaceTraffic {
    fn name(&self) -> &str {
        "interface_traffic"
    }

    fn service_name(&self) -> &str {
        "Traffic %s"
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
        ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError> {
        let (Some(item), Some(interface)) = (item, entity(section, item)) else {
            return Ok(Vec::new());
        };

        // both counters are observed on every run so neither lags behind
        let in_rate = ctx.rate(
            &metric_key(item, "in_octets"),
            interface.counter("in_octets").unwrap_or_default(),
            CounterWidth::Bits32,
        );
        let out_rate = ctx.rate(
            &metric_key(item, "out_octets"),
            interface.counter("out_octets").unwrap_or_default(),
            CounterWidth::Bits32,
        );

        let (Rate::PerSecond(in_rate), Rate::PerSecond(out_rate)) = (in_rate, out_rate) else {
            return Ok(vec![Evaluation::informational(State::Ok, "Collecting data")]);
        };

        let in_bps = in_rate * 8.0;
        let out_bps = out_rate * 8.0;
        Ok(vec![
            Evaluation::new(
                State::Ok,
                format!("In: {}, Out: {}", render::bandwidth(in_bps), render::bandwidth(out_bps)),
            ),
            Evaluation::metric(Metric::new("if_in_bps", in_bps)),
            Evaluation::metric(Metric::new("if_out_bps", out_bps)),
        ])
    }
}
