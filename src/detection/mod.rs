//! Simulated Pest Detection
//!
//! Maps an uploaded image to one catalog pest without looking at pixels:
//! - `resolver`: the selection strategy (`MatchResolver` trait and the
//!   filename/size heuristic that stands in for a classifier)
//! - `confidence`: placeholder confidence scores
//! - `service`: latency, catch-and-default, typed outcome
//!
//! Only the artifact's filename and byte length are ever consulted.

pub mod confidence;
pub mod resolver;
pub mod service;

use serde::Serialize;

use crate::types::{Pest, Pesticide};

pub use confidence::{ConfidenceBand, ConfidenceSource, FixedConfidence, RandomConfidence};
pub use resolver::{HeuristicResolver, MatchResolver, Selection, SelectionRule};
pub use service::{default_result, DetectionOutcome, DetectionService, DEFAULT_CONFIDENCE, DEFAULT_LATENCY};

/// What the resolver gets to see of an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    pub filename: String,
    pub byte_len: u64,
    /// Declared MIME type, checked by the upload layer only
    pub content_type: Option<String>,
}

impl ImageArtifact {
    pub fn new(filename: impl Into<String>, byte_len: u64) -> Self {
        Self {
            filename: filename.into(),
            byte_len,
            content_type: None,
        }
    }

    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(filename, bytes.len() as u64)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// One resolved match, borrowing its pest and pesticides from the catalog
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult<'a> {
    pub pest: &'a Pest,
    pub confidence: f64,
    pub recommended_pesticides: Vec<&'a Pesticide>,
    /// Copied from the pest, empty when it lists none
    pub affected_crops: Vec<String>,
}
