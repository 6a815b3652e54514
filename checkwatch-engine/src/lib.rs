//! # checkwatch-engine
//!
//! The check pipeline: raw tables are parsed into typed entities, correlated
//! across tables, filtered into services at discovery, turned into rates
//! against a persistent value store, evaluated against thresholds and
//! finally aggregated into a single result.
//!
//! ## Components
//!
//! - [`TableSpec`] - row parsing with per-column conversion policies
//! - [`Correlator`] - joins several tables on a shared index column
//! - [`Discovery`] - selects services and captures their baseline
//! - [`RateEngine`] - counter rates with wrap and reset detection
//! - [`evaluate`] / [`check_levels`] - threshold evaluation
//! - [`aggregate`] - worst-of aggregation over load-bearing evaluations
//! - [`CheckPlugin`] - ties the above together for one kind of check
//!
//! ## Quick Start
//!
//! ```rust
//! use checkwatch_engine::{aggregate, check_levels, render, LevelSpec, MemoryStore, Rate, RateEngine};
//! use checkwatch_types::{Evaluation, Levels, State};
//!
//! let mut rates = RateEngine::new(MemoryStore::new());
//! rates.rate("eth0.in_octets", 100.0, 1000);
//!
//! let mut evaluations = Vec::new();
//! if let Rate::PerSecond(bytes) = rates.rate("eth0.in_octets", 110.0, 1800) {
//!     evaluations.push(Evaluation::new(State::Ok, format!("In: {}", render::bandwidth(bytes * 8.0))));
//! }
//!
//! let spec = LevelSpec::new("Utilization")
//!     .metric("if_util_percent")
//!     .upper(Levels::fixed(80.0, 90.0))
//!     .render(render::percent);
//! evaluations.push(check_levels(64.0, &spec));
//!
//! let result = aggregate(evaluations);
//! assert_eq!(result.state, State::Ok);
//! assert_eq!(result.summary, "In: 640.00 bit/s, Utilization: 64.00%");
//! ```

pub mod aggregate;
pub mod correlate;
pub mod discovery;
pub mod error;
pub mod levels;
pub mod params;
pub mod parse;
pub mod plugin;
pub mod rate;
pub mod render;
pub mod store;

pub use aggregate::aggregate;
pub use correlate::{Correlator, EntityKeyRule};
pub use discovery::{Discovery, Predicate, Service};
pub use error::{CorrelateError, LevelsError, ParamsError, StoreError};
pub use levels::{check_levels, evaluate, parse_levels, LevelSpec};
pub use params::Parameters;
pub use parse::{ColumnSpec, FieldKind, FieldPolicy, SkipReason, TableSpec};
pub use plugin::{effective_parameters, run_check, run_discovery, CheckContext, CheckError, CheckPlugin};
pub use rate::{Collecting, CounterWidth, Rate, RateEngine};
pub use store::{FileStore, MemoryStore, StoreFormat, ValueStore};

// Re-export types for convenience
pub use checkwatch_types::{
    AggregatedResult, Direction, EntityKey, Evaluation, FieldValue, Levels, Metric, RawRow, RawTable, Record,
    Section, State,
};
