//! End-to-end runs through parsing, discovery, rates, levels and aggregation.

use checkwatch_engine::{
    aggregate, check_levels, evaluate, render, ColumnSpec, CounterWidth, Direction, Discovery, Evaluation,
    FileStore, LevelSpec, Levels, MemoryStore, Predicate, Rate, RateEngine, State, StoreFormat, TableSpec,
};
use checkwatch_types::table_from;
use tempfile::TempDir;

fn status_spec() -> TableSpec {
    TableSpec::new("interface_status")
        .column(ColumnSpec::text("descr"))
        .column(ColumnSpec::integer("type").lenient())
        .column(ColumnSpec::counter("speed").lenient())
        .column(ColumnSpec::integer("admin_status").lenient())
        .column(ColumnSpec::integer("oper_status").lenient())
        .key("descr")
}

#[test]
fn parse_then_discover() {
    let section = status_spec().parse_table(&table_from(&[
        &["eth0", "6", "1000000000", "1", "1"],
        &["eth1", "6", "1000000000", "2", "2"],
    ]));

    let services = Discovery::new()
        .require(Predicate::equals("admin_status", 1i64))
        .baseline("speed", "discovered_speed")
        .discover(section.as_ref());

    assert_eq!(services.len(), 1);
    assert_eq!(services[0].item.as_deref(), Some("eth0"));
    assert_eq!(
        services[0].parameters.u64("discovered_speed"),
        Ok(Some(1_000_000_000))
    );
}

#[test]
fn rate_sequence_with_wrap() {
    let mut engine = RateEngine::new(MemoryStore::new()).with_width(CounterWidth::Modulus(2000));

    assert!(engine.rate("in.eth0", 100.0, 1000).is_collecting());
    assert_eq!(engine.rate("in.eth0", 110.0, 1800), Rate::PerSecond(80.0));
    assert_eq!(engine.rate("in.eth0", 120.0, 200), Rate::PerSecond(40.0));
}

#[test]
fn rates_survive_store_reopen() {
    let dir = TempDir::new().unwrap();

    let store = FileStore::for_host(dir.path(), "core-sw1", StoreFormat::Json).unwrap();
    let mut engine = RateEngine::new(store);
    assert!(engine.rate("eth0.in_octets", 100.0, 1000).is_collecting());
    engine.store().save().unwrap();

    let store = FileStore::for_host(dir.path(), "core-sw1", StoreFormat::Json).unwrap();
    let mut engine = RateEngine::new(store);
    assert_eq!(engine.rate("eth0.in_octets", 110.0, 1800), Rate::PerSecond(80.0));
}

#[test]
fn fixed_levels_scenario() {
    let levels = Levels::fixed(80.0, 90.0);
    assert_eq!(evaluate(85.0, &levels, Direction::Upper), State::Warn);
    assert_eq!(evaluate(95.0, &levels, Direction::Upper), State::Crit);
    assert_eq!(evaluate(50.0, &levels, Direction::Upper), State::Ok);
}

#[test]
fn collecting_rate_does_not_escalate() {
    let mut engine = RateEngine::new(MemoryStore::new());
    let traffic = match engine.rate("eth0.in_octets", 0.0, 0) {
        Rate::PerSecond(rate) => Evaluation::new(State::Ok, render::bandwidth(rate * 8.0)),
        Rate::Collecting(_) => Evaluation::informational(State::Ok, "Traffic: collecting data"),
    };

    let utilization = check_levels(
        95.0,
        &LevelSpec::new("Utilization")
            .metric("if_util_percent")
            .upper(Levels::fixed(80.0, 90.0))
            .render(render::percent),
    );

    let result = aggregate(vec![
        Evaluation::new(State::Ok, "Status: up"),
        traffic,
        utilization,
    ]);
    assert_eq!(result.state, State::Crit);
    assert_eq!(
        result.summary,
        "Status: up, Traffic: collecting data, Utilization: 95.00% (warn/crit at 80.00%/90.00%)(!!)"
    );
    assert_eq!(result.metrics.len(), 1);
}
