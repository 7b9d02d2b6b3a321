//! Errors for the ledger analyzer.
//!
//! Query operations are lenient and almost never fail. The exceptions are:
//! - Month finders on a store with nothing to group ([`Error::EmptyStore`])
//! - Loading the initial dataset (I/O, JSON, CSV, unknown file format)
//!
//! A missing transaction is not an error: lookups return `None`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no transactions to evaluate for {operation}")]
    EmptyStore { operation: &'static str },

    #[error("unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
