//! Error types for the engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or saving a value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed.
    #[error("Store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The JSON store could not be encoded or decoded.
    #[error("Invalid JSON store: {0}")]
    Json(#[from] serde_json::Error),

    /// The CBOR store could not be encoded or decoded.
    #[error("Invalid CBOR store: {0}")]
    Cbor(String),

    /// The requested format was not compiled in.
    #[error("Store format not available: {0}")]
    FormatUnavailable(&'static str),
}

/// A threshold specification that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelsError {
    /// The spec is not a `[kind, value]` pair.
    #[error("Expected a [kind, value] pair, got: {0}")]
    NotAPair(String),

    /// The kind tag is not one of the known kinds.
    #[error("Unknown levels kind: {0}")]
    UnknownKind(String),

    /// The bounds of a `fixed` spec are not two numbers.
    #[error("Fixed levels need two numeric bounds, got: {0}")]
    InvalidBounds(String),
}

/// Raw tables that do not match a correlator's declared fetch order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelateError {
    #[error("Expected {expected} tables in fetch order, got {found}")]
    TableCount { expected: usize, found: usize },
}

/// Check parameters that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    /// Parameters must be a JSON object.
    #[error("Parameters must be an object, got: {0}")]
    NotAnObject(String),

    /// A parameter holds a malformed threshold specification.
    #[error("Invalid levels in '{key}': {source}")]
    Levels {
        key: String,
        #[source]
        source: LevelsError,
    },

    /// A parameter has the wrong type.
    #[error("Parameter '{key}' must be {expected}")]
    WrongType { key: String, expected: &'static str },
}
