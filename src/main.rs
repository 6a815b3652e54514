use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use checkwatch::{
    render_report, render_services, unix_now, AgentSource, CheckReport, CheckRequest, FileSource, OutputFormat,
    Runner, ServiceReport, Settings, TableSource,
};
use checkwatch_engine::{CheckPlugin, Parameters};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "checkwatch")]
#[command(about = "Table-driven health checks with counter rates and thresholds")]
#[command(version)]
struct Args {
    #[command(flatten)]
    globals: Globals,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Globals {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for per-host value stores (overrides the configuration)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Output format for check results (overrides the configuration)
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

impl Globals {
    fn runner(&self) -> Result<Runner> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(state_dir) = &self.state_dir {
            settings.state_dir = state_dir.clone();
        }
        if let Some(format) = self.format {
            settings.output = format;
        }
        Ok(Runner::new(settings))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available plugins
    Plugins,

    /// Discover services and print them as JSON
    Discover {
        /// Plugin name (see `checkwatch plugins`)
        #[arg(short, long)]
        plugin: String,

        #[command(flatten)]
        input: Input,
    },

    /// Check one service and print its result
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Plugin name (see `checkwatch plugins`)
    #[arg(short, long)]
    plugin: String,

    /// Host whose value store holds the counter history
    #[arg(long)]
    host: String,

    /// Service item; omit for itemless checks
    #[arg(short, long)]
    item: Option<String>,

    /// JSON object of discovered service parameters
    #[arg(long)]
    params: Option<PathBuf>,

    /// Check time in seconds since the epoch (default: now)
    #[arg(long)]
    time: Option<f64>,

    #[command(flatten)]
    input: Input,
}

impl CheckArgs {
    /// UNKNOWN report for a check that failed before it could run.
    fn failed(&self, message: String) -> CheckReport {
        let service = checkwatch_plugins::find(&self.plugin)
            .map(|plugin| plugin.service_description(self.item.as_deref()))
            .unwrap_or_else(|| self.plugin.clone());
        error!(host = %self.host, service = %service, error = %message, "Check could not run");
        CheckReport::failed(&self.host, &self.plugin, &service, self.item.as_deref(), message)
    }
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// JSON file mapping section names to tables
    #[arg(short, long)]
    tables: Option<PathBuf>,

    /// Captured agent output with <<<section>>> headers
    #[arg(short, long)]
    agent_output: Option<PathBuf>,
}

impl Input {
    fn source(&self) -> Result<Box<dyn TableSource>> {
        match (&self.tables, &self.agent_output) {
            (Some(path), _) => Ok(Box::new(FileSource::new(path))),
            (None, Some(path)) => Ok(Box::new(AgentSource::new(path))),
            (None, None) => bail!("One of --tables or --agent-output is required"),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // stdout is reserved for check output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Plugins => {
            for plugin in checkwatch_plugins::all() {
                println!("{:<20} {}", plugin.name(), plugin.service_name());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Discover { plugin, input } => {
            let runner = args.globals.runner()?;
            let plugin = find_plugin(&plugin)?;
            let services = runner.discover(plugin.as_ref(), input.source()?.as_mut())?;
            let reports: Vec<ServiceReport> = services
                .into_iter()
                .map(|service| ServiceReport::new(plugin.as_ref(), service))
                .collect();
            println!("{}", render_services(&reports)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(check_args) => {
            let (report, format) = check(&args.globals, &check_args);
            println!("{}", render_report(&report, format)?);
            Ok(ExitCode::from(report.result.state.code()))
        }
    }
}

/// Run the `check` subcommand. Every failure ends in an UNKNOWN report.
fn check(globals: &Globals, args: &CheckArgs) -> (CheckReport, OutputFormat) {
    let runner = match globals.runner() {
        Ok(runner) => runner,
        Err(e) => {
            let format = globals.format.unwrap_or_default();
            return (args.failed(format!("configuration error: {:#}", e)), format);
        }
    };
    let format = runner.settings().output;

    let report = match prepare_check(args) {
        Ok((plugin, request, mut source)) => runner.check_or_unknown(plugin.as_ref(), &request, source.as_mut()),
        Err(e) => args.failed(format!("{:#}", e)),
    };
    (report, format)
}

fn prepare_check(args: &CheckArgs) -> Result<(Box<dyn CheckPlugin>, CheckRequest<'_>, Box<dyn TableSource>)> {
    let plugin = find_plugin(&args.plugin)?;
    let baseline = match &args.params {
        Some(path) => load_parameters(path).context("configuration error")?,
        None => Parameters::new(),
    };
    let now = match args.time {
        Some(time) => time,
        None => unix_now()?,
    };
    let request = CheckRequest {
        host: &args.host,
        item: args.item.as_deref(),
        baseline,
        now,
    };
    Ok((plugin, request, args.input.source()?))
}

fn find_plugin(name: &str) -> Result<Box<dyn CheckPlugin>> {
    checkwatch_plugins::find(name).ok_or_else(|| anyhow!("Unknown plugin: {} (see `checkwatch plugins`)", name))
}

/// Load service parameters from a JSON file.
fn load_parameters(path: &Path) -> Result<Parameters> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(Parameters::from_value(value)?)
}
