//! Agent output source.
//!
//! Agents print sections introduced by a header line:
//!
//! ```text
//! <<<device_setup>>>
//! noc@example.com core-sw1 Rack-4
//! <<<agent_items:sep(59)>>>
//! item1;100;OK
//! item2;75;WARNING
//! ```
//!
//! Rows are split on whitespace unless the header names a separator by its
//! character code. Each section becomes one table; repeated headers append
//! to it. Other header options are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use checkwatch_types::{RawRow, RawTable};
use tracing::debug;

use super::{TableSet, TableSource};

/// A source that reads sections from captured agent output.
#[derive(Debug)]
pub struct AgentSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    loaded: Option<TableSet>,
}

impl AgentSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("agent output: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            loaded: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&mut self) -> Option<&TableSet> {
        if self.loaded.is_none() {
            match fs::read_to_string(&self.path) {
                Ok(content) => {
                    self.last_error = None;
                    self.loaded = Some(parse_agent_output(&content));
                }
                Err(e) => self.last_error = Some(format!("Read error: {}", e)),
            }
        }
        self.loaded.as_ref()
    }
}

impl TableSource for AgentSource {
    fn tables(&mut self, section: &str) -> Vec<RawTable> {
        self.load()
            .and_then(|sections| sections.get(section))
            .cloned()
            .unwrap_or_default()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// A section header: the section name and its field separator.
struct Header<'a> {
    name: &'a str,
    separator: Option<char>,
}

fn parse_header(line: &str) -> Option<Header<'_>> {
    let inner = line.strip_prefix("<<<")?.strip_suffix(">>>")?;
    let mut parts = inner.split(':');
    let name = parts.next().unwrap_or_default();

    let separator = parts
        .filter_map(|option| option.strip_prefix("sep(")?.strip_suffix(')'))
        .filter_map(|code| code.parse::<u32>().ok())
        .find_map(char::from_u32);

    Some(Header { name, separator })
}

fn split_row(line: &str, separator: Option<char>) -> RawRow {
    match separator {
        Some(sep) => line.split(sep).map(String::from).collect(),
        None => line.split_whitespace().map(String::from).collect(),
    }
}

/// Split agent output into one table per section.
///
/// Lines before the first header and after an empty `<<<>>>` header belong
/// to no section and are dropped.
pub fn parse_agent_output(text: &str) -> TableSet {
    let mut sections = TableSet::new();
    let mut current: Option<(String, Option<char>)> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(header) = parse_header(line.trim()) {
            current = if header.name.is_empty() {
                None
            } else {
                sections
                    .entry(header.name.to_string())
                    .or_insert_with(|| vec![RawTable::new()]);
                Some((header.name.to_string(), header.separator))
            };
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        match &current {
            Some((name, separator)) => {
                if let Some(table) = sections.get_mut(name).and_then(|tables| tables.first_mut()) {
                    table.push(split_row(line, *separator));
                }
            }
            None => debug!(line, "Ignoring line outside of any section"),
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const OUTPUT: &str = "\
<<<check_mk>>>
Version: 2.2.0
<<<agent_items:sep(59)>>>
item1;100;OK
item2;75;WARNING

<<<device_setup>>>
noc@example.com   core-sw1 Rack-4
<<<agent_items:sep(59):persist(1700000000)>>>
item3;4;CRITICAL
<<<>>>
stray line
";

    #[test]
    fn splits_sections() {
        let sections = parse_agent_output(OUTPUT);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections["check_mk"][0], vec![vec!["Version:", "2.2.0"]]);
        assert_eq!(
            sections["device_setup"][0],
            vec![vec!["noc@example.com", "core-sw1", "Rack-4"]]
        );
    }

    #[test]
    fn separator_and_repeated_headers() {
        let sections = parse_agent_output(OUTPUT);
        let items = &sections["agent_items"];
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0],
            vec![
                vec!["item1", "100", "OK"],
                vec!["item2", "75", "WARNING"],
                vec!["item3", "4", "CRITICAL"],
            ]
        );
    }

    #[test]
    fn empty_separated_fields_are_kept() {
        let sections = parse_agent_output("<<<x:sep(59)>>>\na;;c\n");
        assert_eq!(sections["x"][0], vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn header_only_section_is_empty_table() {
        let sections = parse_agent_output("<<<empty>>>\n");
        assert_eq!(sections["empty"], vec![RawTable::new()]);
    }

    #[test]
    fn text_before_any_header_is_dropped() {
        assert!(parse_agent_output("no header here\n").is_empty());
    }

    #[test]
    fn reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", OUTPUT).unwrap();

        let mut source = AgentSource::new(file.path());
        assert_eq!(source.tables("agent_items")[0].len(), 3);
        assert!(source.tables("interfaces").is_empty());
        assert!(source.error().is_none());
    }

    #[test]
    fn missing_file_sets_error() {
        let mut source = AgentSource::new("/nonexistent/agent.out");
        assert!(source.tables("agent_items").is_empty());
        assert!(source.error().unwrap().contains("Read error"));
    }
}
