//! Pest Guide
//!
//! Reference catalogs of crop pests, pesticides and crops, plus a simulated
//! image-based pest detector that maps an upload to one catalog pest.
//!
//! - `types/`, `data/`: catalog records and the immutable `ReferenceData` store
//! - `catalog/`: search, filtering and pest → pesticide cross-references
//! - `guide/`: static season and soil-type tables
//! - `detection/`: match resolution, placeholder confidence, fallback default
//! - `api_server/` (feature `api`): Axum JSON API over all of the above

pub mod utils;
pub mod error;
pub mod types;
pub mod data;
pub mod catalog;
pub mod guide;
pub mod detection;
pub mod config;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use config::AppConfig;
pub use data::ReferenceData;
pub use detection::{
    DetectionOutcome, DetectionResult, DetectionService, HeuristicResolver, ImageArtifact,
    MatchResolver,
};
pub use error::{DataError, DetectionError};
pub use types::{Crop, Pest, Pesticide, Severity};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
