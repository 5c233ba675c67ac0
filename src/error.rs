use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a run. Bad records never end up here.
#[derive(Debug, Error)]
pub enum SalesError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("enriched data error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while talking to the product catalog. These are logged
/// and downgraded to an empty catalog before they reach the pipeline.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("network unreachable: {0}")]
    Network(String),

    #[error("catalog responded with HTTP {0}")]
    Status(u16),

    #[error("unexpected catalog payload: {0}")]
    Format(String),

    #[error("failed to read catalog file {}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}
