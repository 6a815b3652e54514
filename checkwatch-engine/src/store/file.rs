//! File-backed value store.
//!
//! One file per host under a state directory. The whole store is read on
//! open and written back on [`FileStore::save`] through a temporary file
//! and a rename, so an interrupted run never leaves a truncated store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use checkwatch_types::{StoreEntry, StoreSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{MemoryStore, ValueStore};
use crate::error::StoreError;

/// On-disk encoding of a value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Json,
    /// Compact binary encoding; requires the `cbor` feature.
    Cbor,
}

impl StoreFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Cbor => "cbor",
        }
    }

    fn encode(&self, snapshot: &StoreSnapshot) -> Result<Vec<u8>, StoreError> {
        match self {
            StoreFormat::Json => Ok(serde_json::to_vec_pretty(snapshot)?),
            #[cfg(feature = "cbor")]
            StoreFormat::Cbor => {
                minicbor::to_vec(snapshot).map_err(|e| StoreError::Cbor(e.to_string()))
            }
            #[cfg(not(feature = "cbor"))]
            StoreFormat::Cbor => Err(StoreError::FormatUnavailable("cbor")),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<StoreSnapshot, StoreError> {
        match self {
            StoreFormat::Json => Ok(serde_json::from_slice(bytes)?),
            #[cfg(feature = "cbor")]
            StoreFormat::Cbor => {
                minicbor::decode(bytes).map_err(|e| StoreError::Cbor(e.to_string()))
            }
            #[cfg(not(feature = "cbor"))]
            StoreFormat::Cbor => Err(StoreError::FormatUnavailable("cbor")),
        }
    }
}

/// A value store persisted to a single file.
///
/// # Example
///
/// ```rust,no_run
/// use checkwatch_engine::{FileStore, StoreFormat, ValueStore};
/// use checkwatch_types::StoreEntry;
///
/// let mut store = FileStore::for_host("/var/lib/checkwatch", "core-sw1", StoreFormat::Json)?;
/// store.set("eth0.in_octets", StoreEntry::new(1703160000.0, 1800));
/// store.save()?;
/// # Ok::<(), checkwatch_engine::StoreError>(())
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    format: StoreFormat,
    entries: MemoryStore,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// A file that cannot be decoded, or that was written with an
    /// incompatible schema version, is discarded with a warning: every
    /// counter then starts collecting again.
    pub fn open<P: AsRef<Path>>(path: P, format: StoreFormat) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) => match format.decode(&bytes) {
                Ok(snapshot) if snapshot.is_compatible() => MemoryStore::from(snapshot),
                Ok(snapshot) => {
                    warn!(path = %path.display(), schema = snapshot.schema, "Discarding store with incompatible schema version");
                    MemoryStore::new()
                }
                Err(StoreError::FormatUnavailable(name)) => {
                    return Err(StoreError::FormatUnavailable(name))
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable store");
                    MemoryStore::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No store yet, starting empty");
                MemoryStore::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            format,
            entries,
        })
    }

    /// Open the store of `host` under `state_dir`.
    pub fn for_host<P: AsRef<Path>>(
        state_dir: P,
        host: &str,
        format: StoreFormat,
    ) -> Result<Self, StoreError> {
        Self::open(Self::host_path(state_dir, host, format), format)
    }

    /// Path of a host's store file.
    ///
    /// Bytes outside `[A-Za-z0-9._-]` are percent-encoded, `%` included, so
    /// distinct hosts never share a file.
    pub fn host_path<P: AsRef<Path>>(state_dir: P, host: &str, format: StoreFormat) -> PathBuf {
        let mut name = String::with_capacity(host.len());
        for byte in host.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{:02X}", byte));
            }
        }
        state_dir
            .as_ref()
            .join(format!("{}.{}", name, format.extension()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the store back to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        let bytes = self.format.encode(&self.entries.snapshot())?;
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let tmp = self
            .path
            .with_extension(format!("{}.tmp", self.format.extension()));
        fs::write(&tmp, bytes).map_err(io_error)?;
        fs::rename(&tmp, &self.path).map_err(io_error)?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "Saved store");
        Ok(())
    }
}

impl ValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoreEntry> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, entry: StoreEntry) {
        self.entries.set(key, entry)
    }
}
