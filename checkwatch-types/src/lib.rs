//! # checkwatch-types
//!
//! Core types for table-driven health checks. This crate defines the data
//! model shared by the checkwatch pipeline: the raw rows a fetch stage hands
//! over, the typed records they are parsed into, the states and metrics a
//! check emits, and the counter samples persisted between runs.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` and/or `minicbor` features as needed
//! - **Transport agnostic**: Rows may come from SNMP walks, agent sections or anything else
//! - **Versioned state**: Persisted counter state carries a schema version
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/etc. serialization via serde
//! - `minicbor`: Compact binary serialization of counter state via CBOR
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use checkwatch_types::{Evaluation, Metric, State};
//!
//! let status = Evaluation::new(State::Ok, "Status: up");
//! let traffic = Evaluation::metric(Metric::new("if_in_bps", 8000.0));
//!
//! assert!(status.is_load_bearing());
//! assert!(!traffic.is_load_bearing());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod field;
mod levels;
mod metric;
mod result;
mod sample;
mod state;
mod table;

pub use field::*;
pub use levels::*;
pub use metric::*;
pub use result::*;
pub use sample::*;
pub use state::*;
pub use table::*;

/// Layout version of persisted counter state.
///
/// Increment this when making breaking changes to the store format.
/// Stores written with a different version are discarded on load.
pub const SCHEMA_VERSION: u32 = 1;
