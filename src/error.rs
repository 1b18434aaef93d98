//! Error types for reference data loading and pest detection

use std::path::PathBuf;

/// Failure while building the reference catalogs
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {name}: {source}")]
    Json {
        name: String,
        source: serde_json::Error,
    },

    #[error("{0} catalog is empty")]
    EmptyCatalog(&'static str),

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },
}

/// Failure inside a match resolver.
///
/// Never reaches callers of the detection service: every variant is
/// converted into the default detection result.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// Reported by resolvers that decode or inspect the image. The
    /// filename/size heuristic never does, so only injected resolvers
    /// return it.
    #[error("Image preprocessing failed: {0}")]
    Preprocess(String),

    #[error("Pest catalog is empty")]
    EmptyCatalog,

    /// The resolver panicked; set by the detection service
    #[error("Resolver panicked: {0}")]
    Panicked(String),
}
