use checkwatch_engine::{ColumnSpec, Correlator, EntityKeyRule, TableSpec};
use checkwatch_types::RawTable;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn if_table(rows: usize) -> RawTable {
    (1..=rows)
        .map(|i| {
            vec![
                i.to_string(),
                format!("GigabitEthernet0/{}", i),
                "6".to_string(),
                "1000000000".to_string(),
                "1".to_string(),
                if i % 7 == 0 { "2" } else { "1" }.to_string(),
            ]
        })
        .collect()
}

fn counters_table(rows: usize) -> RawTable {
    (1..=rows)
        .rev()
        .map(|i| {
            vec![
                i.to_string(),
                (i * 1_000_000).to_string(),
                (i * 2_000_000).to_string(),
            ]
        })
        .collect()
}

fn if_spec() -> TableSpec {
    TableSpec::new("if_table")
        .column(ColumnSpec::text("index"))
        .column(ColumnSpec::text("descr"))
        .column(ColumnSpec::integer("type").lenient())
        .column(ColumnSpec::counter("speed").lenient())
        .column(ColumnSpec::integer("admin_status").lenient())
        .column(ColumnSpec::integer("oper_status").lenient())
        .key("descr")
}

/// Benchmark parsing a single table of varying size
fn bench_parse_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_table");
    let spec = if_spec();

    for rows in [10usize, 100, 1000].iter() {
        let table = if_table(*rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| spec.parse_table(black_box(table)));
        });
    }
    group.finish();
}

/// Benchmark correlating a primary table with a reversed counter table
fn bench_correlate(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlate");
    let correlator = Correlator::new(
        TableSpec::new("if_table")
            .column(ColumnSpec::text("index"))
            .column(ColumnSpec::text("descr"))
            .key("index"),
        EntityKeyRule::Field("descr".into()),
    )
    .auxiliary(
        TableSpec::new("counters")
            .column(ColumnSpec::text("index"))
            .column(ColumnSpec::counter("in_octets").lenient())
            .column(ColumnSpec::counter("out_octets").lenient())
            .key("index"),
    );

    for rows in [10usize, 100, 1000].iter() {
        let tables = vec![if_table(*rows), counters_table(*rows)];
        group.bench_with_input(BenchmarkId::from_parameter(rows), &tables, |b, tables| {
            b.iter(|| correlator.correlate(black_box(tables)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_table, bench_correlate);
criterion_main!(benches);
