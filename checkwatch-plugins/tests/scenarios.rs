//! End-to-end runs of bundled plugins over raw tables.

use checkwatch_engine::{
    effective_parameters, evaluate, run_check, run_discovery, CheckContext, CounterWidth, Direction, Levels,
    MemoryStore, Parameters, Rate, State,
};
use checkwatch_types::table_from;

fn ifx_table() -> Vec<checkwatch_types::RawTable> {
    vec![table_from(&[&["eth0", "6", "1000000000", "1", "1"]])]
}

#[test]
fn single_interface_is_discovered_and_up() {
    let plugin = checkwatch_plugins::find("interface_status").unwrap();
    let tables = ifx_table();

    let services = run_discovery(plugin.as_ref(), &tables);
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].item.as_deref(), Some("eth0"));
    assert_eq!(plugin.service_description(Some("eth0")), "Interface eth0");

    let mut store = MemoryStore::new();
    let mut ctx = CheckContext::new(0.0, &mut store);
    let params = effective_parameters(plugin.as_ref(), &services[0].parameters, &Parameters::new());
    let result = run_check(plugin.as_ref(), Some("eth0"), &params, &tables, &mut ctx);

    assert_eq!(result.state, State::Ok);
    assert_eq!(result.summary, "Status: up");
}

#[test]
fn counter_rate_then_wrap() {
    let mut store = MemoryStore::new();
    let mut ctx = CheckContext::new(100.0, &mut store);
    let width = CounterWidth::Modulus(2000);
    assert!(ctx.rate("in.eth0", 1000, width).is_collecting());

    let mut ctx = CheckContext::new(110.0, &mut store);
    assert_eq!(ctx.rate("in.eth0", 1800, width), Rate::PerSecond(80.0));

    let mut ctx = CheckContext::new(120.0, &mut store);
    assert_eq!(ctx.rate("in.eth0", 200, width), Rate::PerSecond(40.0));
}

#[test]
fn fixed_upper_levels() {
    let levels = Levels::fixed(80.0, 90.0);
    assert_eq!(evaluate(85.0, &levels, Direction::Upper), State::Warn);
    assert_eq!(evaluate(95.0, &levels, Direction::Upper), State::Crit);
    assert_eq!(evaluate(50.0, &levels, Direction::Upper), State::Ok);
}

#[test]
fn vanished_entity_is_unknown() {
    let plugin = checkwatch_plugins::find("interface_status").unwrap();
    let mut store = MemoryStore::new();
    let mut ctx = CheckContext::new(0.0, &mut store);
    let result = run_check(plugin.as_ref(), Some("eth5"), &Parameters::new(), &ifx_table(), &mut ctx);

    assert_eq!(result.state, State::Unknown);
    assert_eq!(result.summary, "entity not found");
    assert!(result.metrics.is_empty());
}

#[test]
fn empty_tables_are_no_data() {
    for plugin in checkwatch_plugins::all() {
        let tables = vec![Vec::new(); plugin.table_count()];
        assert!(run_discovery(plugin.as_ref(), &tables).is_empty(), "{}", plugin.name());

        let mut store = MemoryStore::new();
        let mut ctx = CheckContext::new(0.0, &mut store);
        let params = plugin.default_parameters();
        let result = run_check(plugin.as_ref(), Some("x"), &params, &tables, &mut ctx);
        assert_eq!(result.state, State::Unknown, "{}", plugin.name());
        assert_eq!(result.summary, "no data");
    }
}

#[test]
fn defaults_are_valid_levels() {
    for plugin in checkwatch_plugins::all() {
        assert!(plugin.validate_parameters(&plugin.default_parameters()).is_ok(), "{}", plugin.name());
    }
}

#[test]
fn malformed_levels_are_a_configuration_error() {
    let plugin = checkwatch_plugins::find("agent_items").unwrap();
    let tables = vec![table_from(&[&["item1", "50", "OK"]])];
    let overrides = Parameters::new().with("levels_upper", "high");
    let params = effective_parameters(plugin.as_ref(), &Parameters::new(), &overrides);

    let mut store = MemoryStore::new();
    let mut ctx = CheckContext::new(0.0, &mut store);
    let result = run_check(plugin.as_ref(), Some("item1"), &params, &tables, &mut ctx);

    assert_eq!(result.state, State::Unknown);
    assert!(result.summary.starts_with("configuration error:"));
    assert!(plugin.validate_parameters(&params).is_err());
}
