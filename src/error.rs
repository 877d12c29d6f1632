//! Error types for serene-flow.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Phase;

/// A mode catalog that breaks one of its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog contains no modes")]
    Empty,

    #[error("mode id {0:?} appears more than once")]
    DuplicateId(String),

    #[error("mode {id:?} has a zero-second {phase:?} phase")]
    ZeroDuration { id: String, phase: Phase },
}

/// Top-level error for library and binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: invalid catalog JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("unknown mode {id:?} (known: {})", .known.join(", "))]
    UnknownMode { id: String, known: Vec<String> },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
