//! Table source abstraction for feeding raw tables into checks.
//!
//! A source maps section names to the tables a plugin expects, in fetch
//! order. Fetching the data from devices is out of scope; sources read
//! what some collector already wrote down.

mod agent;
mod file;

pub use agent::{parse_agent_output, AgentSource};
pub use file::FileSource;

use std::collections::BTreeMap;
use std::fmt::Debug;

use checkwatch_types::RawTable;

/// Tables grouped by section name.
pub type TableSet = BTreeMap<String, Vec<RawTable>>;

/// Trait for reading raw tables from various sources.
///
/// # Example
///
/// ```no_run
/// use checkwatch::{FileSource, TableSource};
///
/// let mut source = FileSource::new("tables.json");
/// let tables = source.tables("interfaces");
/// if let Some(error) = source.error() {
///     eprintln!("{}: {}", source.description(), error);
/// }
/// println!("Got {} tables", tables.len());
/// ```
pub trait TableSource: Debug {
    /// The tables stored for `section`, in fetch order.
    ///
    /// Returns an empty list when the section is absent or the source could
    /// not be read; [`error`](TableSource::error) tells the two apart.
    fn tables(&mut self, section: &str) -> Vec<RawTable>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message if the last read failed.
    fn error(&self) -> Option<&str>;
}
