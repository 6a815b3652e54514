//! Interfaces correlated from three tables.
//!
//! Tables, in fetch order:
//! 1. ifTable: `index, descr, type, speed, admin_status, oper_status`
//! 2. ifXTable: `index, name, alias`
//! 3. counters: `index, in_octets, out_octets, in_errors, out_errors`
//!
//! Entities are keyed by the best available name (`name`, then `alias`,
//! then `descr`). Discovery captures the speed and operational status so
//! the check can report changes since then.

use checkwatch_engine::{
    check_levels, render, CheckContext, CheckError, CheckPlugin, ColumnSpec, Correlator, CounterWidth, Discovery,
    EntityKeyRule, LevelSpec, Parameters, Predicate, Rate, Service, TableSpec,
};
use checkwatch_types::{metric_key, Evaluation, Metric, RawTable, Record, Section, State};
use serde_json::json;
use tracing::warn;

use crate::entity;
use crate::ifmib::{oper_status, PHYSICAL_TYPES, UP};

#[derive(Debug, Clone, Copy, Default)]
pub struct Interfaces;

impl Interfaces {
    pub fn correlator() -> Correlator {
        Correlator::new(
            TableSpec::new("if_table")
                .column(ColumnSpec::text("index"))
                .column(ColumnSpec::text("descr"))
                .column(ColumnSpec::integer("type").lenient())
                .column(ColumnSpec::counter("speed").lenient())
                .column(ColumnSpec::integer("admin_status").lenient())
                .column(ColumnSpec::integer("oper_status").lenient())
                .key("index"),
            EntityKeyRule::first_non_empty(["name", "alias", "descr"]),
        )
        .auxiliary(
            TableSpec::new("ifx_table")
                .column(ColumnSpec::text("index"))
                .column(ColumnSpec::text("name").lenient())
                .column(ColumnSpec::text("alias").lenient())
                .key("index"),
        )
        .auxiliary(
            TableSpec::new("if_counters")
                .column(ColumnSpec::text("index"))
                .column(ColumnSpec::counter("in_octets").lenient())
                .column(ColumnSpec::counter("out_octets").lenient())
                .column(ColumnSpec::counter("in_errors").lenient())
                .column(ColumnSpec::counter("out_errors").lenient())
                .key("index"),
        )
    }

    fn status(&self, interface: &Record, params: &Parameters) -> Result<Evaluation, CheckError> {
        let oper = interface.integer("oper_status").unwrap_or_default();
        let expected = params.i64("expected_status")?.unwrap_or(UP);
        let (mut state, name) = oper_status(oper);
        let mut text = name.to_string();

        if interface.integer("admin_status") != Some(UP) {
            state = State::Ok;
            text.push_str(" (admin down)");
        } else if oper != expected {
            state = State::Crit;
            text.push_str(&format!(" (expected: {})", oper_status(expected).1));
        }

        Ok(Evaluation::new(state, format!("Status: {}", text)))
    }

    fn speed(&self, interface: &Record, params: &Parameters) -> Result<Option<Evaluation>, CheckError> {
        let speed = interface.counter("speed").unwrap_or_default();
        if speed == 0 {
            return Ok(None);
        }

        let rendered = render::bandwidth(speed as f64);
        let evaluation = match params.u64("discovered_speed")? {
            Some(discovered) if discovered != 0 && discovered != speed => Evaluation::new(
                State::Warn,
                format!("Speed changed: {} (was {})", rendered, render::bandwidth(discovered as f64)),
            ),
            _ => Evaluation::notice(State::Ok, format!("Speed: {}", rendered)),
        };
        Ok(Some(evaluation))
    }

    fn traffic(
        &self,
        item: &str,
        interface: &Record,
        params: &Parameters,
        ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError> {
        let in_rate = counter_rate(ctx, item, interface, "in_octets");
        let out_rate = counter_rate(ctx, item, interface, "out_octets");

        let (Rate::PerSecond(in_rate), Rate::PerSecond(out_rate)) = (in_rate, out_rate) else {
            return Ok(vec![Evaluation {
                notice: true,
                ..Evaluation::informational(State::Ok, "Traffic: collecting data")
            }]);
        };

        let in_bps = in_rate * 8.0;
        let out_bps = out_rate * 8.0;
        let mut out = vec![
            Evaluation::new(
                State::Ok,
                format!("In: {}, Out: {}", render::bandwidth(in_bps), render::bandwidth(out_bps)),
            ),
            Evaluation::metric(Metric::new("if_in_bps", in_bps)),
            Evaluation::metric(Metric::new("if_out_bps", out_bps)),
        ];

        let speed = interface.counter("speed").unwrap_or_default();
        if speed > 0 {
            let utilization = in_bps.max(out_bps) / speed as f64 * 100.0;
            let spec = LevelSpec::new("Utilization")
                .metric("if_util_percent")
                .upper(params.levels("utilization_levels")?)
                .boundaries(Some(0.0), Some(100.0))
                .render(render::percent);
            out.push(check_levels(utilization, &spec));
        }

        Ok(out)
    }

    fn errors(
        &self,
        item: &str,
        interface: &Record,
        params: &Parameters,
        ctx: &mut CheckContext<'_>,
    ) -> Result<Option<Evaluation>, CheckError> {
        let in_rate = counter_rate(ctx, item, interface, "in_errors");
        let out_rate = counter_rate(ctx, item, interface, "out_errors");

        let (Some(in_rate), Some(out_rate)) = (in_rate.per_second(), out_rate.per_second()) else {
            return Ok(None);
        };

        let total = in_rate + out_rate;
        if total <= 0.0 {
            return Ok(None);
        }

        let spec = LevelSpec::new("Errors")
            .metric("if_errors_rate")
            .upper(params.levels("error_levels")?)
            .render(render::per_second);
        Ok(Some(check_levels(total, &spec)))
    }
}

fn counter_rate(ctx: &mut CheckContext<'_>, item: &str, interface: &Record, counter: &str) -> Rate {
    ctx.rate(
        &metric_key(item, counter),
        interface.counter(counter).unwrap_or_default(),
        CounterWidth::Bits32,
    )
}

impl CheckPlugin for Interfaces {
    fn name(&self) -> &str {
        "interfaces"
    }

    fn service_name(&self) -> &str {
        "Interface %s"
    }

    fn table_count(&self) -> usize {
        3
    }

    fn parse(&self, tables: &[RawTable]) -> Option<Section> {
        match Self::correlator().correlate(tables) {
            Ok(section) => section,
            Err(e) => {
                warn!(plugin = self.name(), error = %e, "Cannot correlate tables");
                None
            }
        }
    }

    fn discover(&self, section: &Section) -> Vec<Service> {
        Discovery::new()
            .require(Predicate::one_of("type", PHYSICAL_TYPES))
            .baseline("speed", "discovered_speed")
            .baseline("oper_status", "discovered_oper_status")
            .discover(Some(section))
    }

    fn default_parameters(&self) -> Parameters {
        Parameters::new()
            .with("expected_status", UP)
            .with("utilization_levels", json!(["fixed", [80.0, 90.0]]))
            .with("error_levels", json!(["fixed", [1.0, 10.0]]))
    }

    fn level_parameters(&self) -> &[&str] {
        &["utilization_levels", "error_levels"]
    }

    fn check(
        &self,
        item: Option<&str>,
        params: &Parameters,
        section: &Section,
        ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError> {
        let (Some(item), Some(interface)) = (item, entity(section, item)) else {
            return Ok(Vec::new());
        };

        let mut out = vec![self.status(interface, params)?];
        out.extend(self.speed(interface, params)?);
        out.extend(self.traffic(item, interface, params, ctx)?);
        out.extend(self.errors(item, interface, params, ctx)?);
        Ok(out)
    }
}
