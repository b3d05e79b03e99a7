//! Error taxonomy for the search engine.
//!
//! Load-time structural problems are fatal ([`LoadError`]): no partial table
//! is ever produced. Everything that can go wrong after a table is loaded is
//! a recoverable [`Warning`] — a mistyped column name degrades one criterion,
//! not the whole query.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {path:?} as delimited text")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot decode {path:?} using encoding {encoding}")]
    Decode { path: PathBuf, encoding: String },
    #[error("{path:?} has no header row")]
    Empty { path: PathBuf },
    #[error("{path:?} is structurally inconsistent: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Recoverable, reportable conditions surfaced alongside a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("column '{column}' not found; criterion skipped")]
    ColumnNotFound { column: String },
    #[error("expected {expected} column(s) but found {actual}; {action}")]
    SchemaMismatch {
        expected: usize,
        actual: usize,
        action: String,
    },
}
