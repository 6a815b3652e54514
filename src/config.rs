//! Runtime settings.
//!
//! Settings come from an optional TOML file and `CHECKWATCH_*` environment
//! variables, environment winning:
//!
//! ```toml
//! state_dir = "/var/lib/checkwatch"
//! store_format = "json"
//! max_rate = 1e12
//! output = "text"
//!
//! [parameters.interfaces]
//! utilization_levels = ["fixed", [70.0, 85.0]]
//!
//! [parameters.agent_items]
//! levels_lower = ["no_levels", []]
//! ```
//!
//! Plugin parameters are validated when the settings are loaded, so a
//! malformed threshold is reported before any check runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use checkwatch_engine::{Parameters, StoreFormat};
use clap::ValueEnum;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// How check results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One local-check line per service.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one value store per host.
    pub state_dir: PathBuf,
    pub store_format: StoreFormat,
    /// Rates at or above this are treated as counter resets.
    pub max_rate: Option<f64>,
    pub output: OutputFormat,
    /// Parameter overrides by plugin name.
    pub parameters: BTreeMap<String, Parameters>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("state"),
            store_format: StoreFormat::default(),
            max_rate: None,
            output: OutputFormat::default(),
            parameters: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("CHECKWATCH"))
            .build()?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject unknown plugins, malformed thresholds and a non-positive rate ceiling.
    pub fn validate(&self) -> Result<()> {
        for (name, params) in &self.parameters {
            let plugin = checkwatch_plugins::find(name)
                .ok_or_else(|| anyhow!("Unknown plugin in parameters: {}", name))?;
            plugin
                .validate_parameters(params)
                .with_context(|| format!("Invalid parameters for plugin {}", name))?;
        }

        if let Some(max_rate) = self.max_rate {
            if max_rate.is_nan() || max_rate <= 0.0 {
                bail!("max_rate must be positive, got {}", max_rate);
            }
        }

        Ok(())
    }

    /// The configured overrides for a plugin.
    pub fn overrides(&self, plugin: &str) -> Parameters {
        self.parameters.get(plugin).cloned().unwrap_or_default()
    }
}
