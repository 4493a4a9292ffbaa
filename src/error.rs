//! Error types for the extraction pipeline and the graph loader.
//!
//! Per-document failures ([`DocumentError`]) are isolated: the pipeline
//! records them in its skip report and moves on. Output failures
//! ([`WriteError`], [`LoadError`]) abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// A single document could not be turned into table rows.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed notebook: {0}")]
    Notebook(String),

    #[error("front-matter is not a mapping")]
    NotAMapping,

    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("document key '{0}' already produced by an earlier document")]
    DuplicateKey(String),
}

/// A table file could not be published.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// The graph store rejected a table during bulk load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing table file {}", .0.display())]
    MissingFile(PathBuf),

    #[error("unexpected header in {}: expected {expected:?}, found {found:?}", path.display())]
    HeaderMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("schema violation while loading {table}: {message}")]
    SchemaViolation { table: String, message: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to reset graph store: {0}")]
    Io(#[from] std::io::Error),
}
