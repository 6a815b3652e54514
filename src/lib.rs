//! # checkwatch
//!
//! Table-driven health checks: raw telemetry tables go in, one aggregated
//! state per monitored service comes out.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────────────── checkwatch-engine ───────────────────────┐
//! │  source  │──▶│ parse ─▶ correlate ─▶ discover / rate ─▶ levels ─▶ aggregate │──▶ output
//! └──────────┘   └───────────────────────────────┬──────────────────────────────────┘
//!                                                ▼
//!                                         value store (per host)
//! ```
//!
//! - **[`source`]**: where raw tables come from ([`TableSource`] trait) - a
//!   JSON tables file or captured agent output
//! - **[`config`]**: [`Settings`] from a TOML file and `CHECKWATCH_*` variables
//! - **[`app`]**: the [`Runner`] wiring plugins, sources and the host's
//!   value store together
//! - **[`output`]**: local-check lines and JSON reports
//!
//! The pipeline itself lives in `checkwatch-engine`; the bundled checks in
//! `checkwatch-plugins`.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # List the bundled plugins
//! checkwatch plugins
//!
//! # Find the services in a tables file
//! checkwatch discover --plugin interfaces --tables tables.json
//!
//! # Check one service, remembering counters under the state directory
//! checkwatch check --plugin interfaces --host core-sw1 --item Gi0/1 --tables tables.json
//!
//! # Agent output instead of a tables file
//! checkwatch check --plugin agent_items --host web1 --item item1 --agent-output agent.out
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use checkwatch::{CheckRequest, FileSource, Runner, Settings};
//! use checkwatch_engine::Parameters;
//!
//! let runner = Runner::new(Settings::load(None)?);
//! let plugin = checkwatch_plugins::find("interface_status").unwrap();
//! let mut source = FileSource::new("tables.json");
//!
//! let request = CheckRequest {
//!     host: "core-sw1",
//!     item: Some("eth0"),
//!     baseline: Parameters::new(),
//!     now: checkwatch::unix_now()?,
//! };
//! let report = runner.check(plugin.as_ref(), &request, &mut source)?;
//! println!("{}", checkwatch::local_check_line(&report));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod app;
pub mod config;
pub mod output;
pub mod source;

pub use app::{unix_now, CheckRequest, Runner};
pub use config::{OutputFormat, Settings};
pub use output::{local_check_line, render_report, render_services, CheckReport, ServiceReport};
pub use source::{parse_agent_output, AgentSource, FileSource, TableSet, TableSource};
