//! File-based table source.
//!
//! Reads a JSON file mapping section names to lists of tables:
//!
//! ```json
//! {
//!   "interface_status": [
//!     [["eth0", "6", "1000000000", "1", "1"]]
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use checkwatch_types::RawTable;

use super::{TableSet, TableSource};

/// A source that reads all sections from a JSON tables file.
///
/// The file is read once, on the first request.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    loaded: Option<TableSet>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            loaded: None,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&mut self) -> Option<&TableSet> {
        if self.loaded.is_none() {
            self.loaded = self.read_file();
        }
        self.loaded.as_ref()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<TableSet> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(tables) => {
                    self.last_error = None;
                    Some(tables)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl TableSource for FileSource {
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
