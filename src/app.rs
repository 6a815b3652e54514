//! Runs discovery and checks against a table source and the host's store.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Result};
use checkwatch_engine::{
    effective_parameters, run_check, run_discovery, CheckContext, CheckPlugin, FileStore, Parameters, Service,
};
use checkwatch_types::RawTable;
use tracing::{info, warn};

use crate::config::Settings;
use crate::output::CheckReport;
use crate::source::TableSource;

/// What to check: one service of one plugin on one host.
#[derive(Debug, Clone)]
pub struct CheckRequest<'a> {
    pub host: &'a str,
    pub item: Option<&'a str>,
    /// Parameters captured at discovery time.
    pub baseline: Parameters,
    /// Seconds since the Unix epoch.
    pub now: f64,
}

/// Application runner holding the loaded settings.
#[derive(Debug, Clone)]
pub struct Runner {
    settings: Settings,
}

impl Runner {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Discover the services a plugin finds in the source.
    pub fn discover(&self, plugin: &dyn CheckPlugin, source: &mut dyn TableSource) -> Result<Vec<Service>> {
        let tables = read_tables(plugin, source)?;
        Ok(run_discovery(plugin, &tables))
    }

    /// Check one service and persist the host's counter state.
    ///
    /// The store is saved even when the check ends UNKNOWN, so every counter
    /// observed during the run is remembered.
    pub fn check(
        &self,
        plugin: &dyn CheckPlugin,
        request: &CheckRequest<'_>,
        source: &mut dyn TableSource,
    ) -> Result<CheckReport> {
        let tables = read_tables(plugin, source)?;
        let params = effective_parameters(
            plugin,
            &request.baseline,
            &self.settings.overrides(plugin.name()),
        );

        let mut store = FileStore::for_host(&self.settings.state_dir, request.host, self.settings.store_format)?;
        let result = {
            let mut ctx = CheckContext::new(request.now, &mut store).with_max_rate(self.settings.max_rate);
            run_check(plugin, request.item, &params, &tables, &mut ctx)
        };
        store.save()?;

        let service = plugin.service_description(request.item);
        info!(host = request.host, service = %service, state = %result.state, "Checked service");

        Ok(CheckReport {
            host: request.host.to_string(),
            plugin: plugin.name().to_string(),
            service,
            item: request.item.map(String::from),
            result,
        })
    }

    /// Like [`Runner::check`], but a check that cannot run (unreadable
    /// source, store I/O failure) becomes an UNKNOWN report carrying the
    /// error.
    pub fn check_or_unknown(
        &self,
        plugin: &dyn CheckPlugin,
        request: &CheckRequest<'_>,
        source: &mut dyn TableSource,
    ) -> CheckReport {
        self.check(plugin, request, source).unwrap_or_else(|error| {
            let message = format!("{:#}", error);
            warn!(host = request.host, plugin = plugin.name(), error = %message, "Check could not run");
            CheckReport::failed(
                request.host,
                plugin.name(),
                &plugin.service_description(request.item),
                request.item,
                message,
            )
        })
    }
}

fn read_tables(plugin: &dyn CheckPlugin, source: &mut dyn TableSource) -> Result<Vec<RawTable>> {
    let tables = source.tables(plugin.section_name());
    if let Some(error) = source.error() {
        bail!("Cannot read {}: {}", source.description(), error);
    }
    Ok(tables)
}

/// The current time in seconds since the Unix epoch.
pub fn unix_now() -> Result<f64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs_f64())
}
