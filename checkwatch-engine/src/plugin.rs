//! Check plugins and the policies wrapped around them.
//!
//! A plugin supplies the per-check pieces: how its raw tables parse, which
//! entities it discovers and how one entity is evaluated. [`run_discovery`]
//! and [`run_check`] apply the shared policies (no data, missing entity,
//! configuration errors) and aggregate the result.

use checkwatch_types::{AggregatedResult, Evaluation, RawTable, Section, State};
use thiserror::Error;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::discovery::Service;
use crate::error::{LevelsError, ParamsError};
use crate::params::Parameters;
use crate::rate::{CounterWidth, Rate, RateEngine};
use crate::store::ValueStore;

/// Errors a check can hit that make its result meaningless.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Levels(#[from] LevelsError),
}

/// Per-run state handed to a check: the current time and the rate engine
/// over the host's value store.
pub struct CheckContext<'a> {
    now: f64,
    rates: RateEngine<&'a mut dyn ValueStore>,
}

impl<'a> CheckContext<'a> {
    pub fn new(now: f64, store: &'a mut dyn ValueStore) -> Self {
        Self {
            now,
            rates: RateEngine::new(store),
        }
    }

    /// Treat wrap-implied rates at or above `max_rate` as resets.
    pub fn with_max_rate(mut self, max_rate: Option<f64>) -> Self {
        self.rates = self.rates.with_max_rate(max_rate);
        self
    }

    /// Seconds since the Unix epoch at which this run observes its samples.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Rate of the counter stored under `key`, observed now.
    pub fn rate(&mut self, key: &str, value: u64, width: CounterWidth) -> Rate {
        self.rates.rate_with(key, self.now, value, width)
    }
}

/// A check over one named section of raw tables.
pub trait CheckPlugin {
    /// Unique plugin name.
    fn name(&self) -> &str;

    /// Service name template; `%s` is replaced by the item.
    fn service_name(&self) -> &str;

    /// Name of the agent section this plugin reads.
    fn section_name(&self) -> &str {
        self.name()
    }

    /// Number of raw tables expected, in fetch order.
    fn table_count(&self) -> usize {
        1
    }

    /// Parse raw tables into entities; `None` means no data.
    fn parse(&self, tables: &[RawTable]) -> Option<Section>;

    /// Services for the parsed entities.
    fn discover(&self, section: &Section) -> Vec<Service>;

    fn default_parameters(&self) -> Parameters {
        Parameters::new()
    }

    /// Parameter keys holding threshold specs, validated at configuration load.
    fn level_parameters(&self) -> &[&str] {
        &[]
    }

    /// Evaluate one entity. `item` is `None` for itemless checks; a keyed
    /// item is guaranteed to be present in `section`.
    fn check(
        &self,
        item: Option<&str>,
        params: &Parameters,
        section: &Section,
        ctx: &mut CheckContext<'_>,
    ) -> Result<Vec<Evaluation>, CheckError>;

    /// The service name for an item.
    fn service_description(&self, item: Option<&str>) -> String {
        match item {
            Some(item) => self.service_name().replace("%s", item),
            None => self.service_name().to_string(),
        }
    }

    /// Reject parameters whose threshold specs are malformed.
    fn validate_parameters(&self, params: &Parameters) -> Result<(), ParamsError> {
        for key in self.level_parameters() {
            params.levels(key)?;
        }
        Ok(())
    }
}

/// Merge a plugin's defaults with a service baseline and user overrides.
pub fn effective_parameters(
    plugin: &dyn CheckPlugin,
    baseline: &Parameters,
    overrides: &Parameters,
) -> Parameters {
    Parameters::layered(&plugin.default_parameters(), baseline, overrides)
}

/// Run discovery. No data yields no services.
pub fn run_discovery(plugin: &dyn CheckPlugin, tables: &[RawTable]) -> Vec<Service> {
    let services = match plugin.parse(tables) {
        Some(section) => plugin.discover(&section),
        None => Vec::new(),
    };
    info!(plugin = plugin.name(), services = services.len(), "Discovery finished");
    services
}

/// Run a check for one item and aggregate its evaluations.
///
/// - no data: UNKNOWN `"no data"`
/// - keyed item absent from the data: UNKNOWN `"entity not found"`, no metrics
/// - malformed parameters: UNKNOWN `"configuration error: ..."`
pub fn run_check(
    plugin: &dyn CheckPlugin,
    item: Option<&str>,
    params: &Parameters,
    tables: &[RawTable],
    ctx: &mut CheckContext<'_>,
) -> AggregatedResult {
    let service = plugin.service_description(item);

    let Some(section) = plugin.parse(tables) else {
        debug!(service = %service, "No data");
        return unknown("no data");
    };

    if let Some(item) = item {
        if !section.contains(item) {
            debug!(service = %service, "Entity not found");
            return unknown("entity not found");
        }
    }

    let result = match plugin.check(item, params, &section, ctx) {
        Ok(evaluations) => aggregate(evaluations),
        Err(e) => unknown(format!("configuration error: {}", e)),
    };
    info!(service = %service, state = %result.state, "Check finished");
    result
}

/// A policy result that bypasses aggregation, so the summary stays verbatim.
fn unknown(summary: impl Into<String>) -> AggregatedResult {
    let summary = summary.into();
    AggregatedResult {
        state: State::Unknown,
        details: vec![summary.clone()],
        summary,
        metrics: Vec::new(),
    }
}
