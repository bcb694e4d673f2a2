//! # OID Engine
//!
//! Rewrites the identifier columns of a CSV table through an old-to-new OID
//! mapping.
//!
//! ## Architecture
//!
//! ```text
//! mapping.json ──> CanonicalMapping (canonical keys and values)
//!                        │
//! table.csv ──> Table ───┴──> remap
//!                              ├─> id column: two lookup passes, misses keep
//!                              │   their canonical form (UnmappedSet)
//!                              └─> parent column: "0" sentinel, misses and
//!                                  self-references collapse to "0"
//!                                    │
//!                                 coerce (identifier columns to i64)
//!                                    │
//!                                 assemble ──> output.csv + JSON rows
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oid_engine::{coerce, remap, to_json_rows, CanonicalMapping, RemapConfig, read_table};
//!
//! let mapping = CanonicalMapping::from_slice(br#"{"1": "100"}"#).unwrap();
//! let config = RemapConfig::default();
//! let table = read_table("id_perkiraan,id_parent\n1,1\n2,1\n".as_bytes(), &config).unwrap();
//!
//! let (table, unmapped) = remap(table, &mapping, &config).unwrap();
//! let rows = to_json_rows(&coerce(table, &config));
//!
//! assert_eq!(rows[1]["id_parent"], 100);
//! assert_eq!(unmapped.as_slice(), ["2"]);
//! ```

mod assemble;
mod canon;
mod coerce;
mod config;
mod error;
mod job;
mod mapping;
mod reader;
mod remapper;
mod types;
mod unmapped;

pub use assemble::{assemble, to_csv_bytes, to_json_rows, write_output, Assembled, JsonRow};
pub use canon::{canon, canon_json, canon_str};
pub use coerce::{coerce, coerce_identifier};
pub use config::{RemapConfig, DEFAULT_ID_COLUMN, DEFAULT_NA_VALUES, DEFAULT_PARENT_COLUMN};
pub use error::{RemapError, Result};
pub use job::{RemapJob, RemapOutcome};
pub use mapping::CanonicalMapping;
pub use reader::{read_table, read_table_path};
pub use remapper::{remap, NO_PARENT};
pub use types::{Cell, Table};
pub use unmapped::UnmappedSet;
