//! Reference Data Loading
//!
//! Builds the three catalogs (pests, pesticides, crops) once at startup and
//! owns them for the rest of the process. There is no mutation API: callers
//! get shared slices and references, and the server hands the whole value
//! around behind an `Arc`.
//!
//! Sources:
//! - Embedded: `data/*.json`, compiled into the binary
//! - Directory: the same three file names under `DATA_DIR`

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;

use crate::error::DataError;
use crate::types::{Crop, Pest, Pesticide};

pub const PESTS_FILE: &str = "pests.json";
pub const PESTICIDES_FILE: &str = "pesticides.json";
pub const CROPS_FILE: &str = "crops.json";

static EMBEDDED_PESTS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/pests.json"));
static EMBEDDED_PESTICIDES: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/pesticides.json"));
static EMBEDDED_CROPS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/crops.json"));

/// Immutable pest, pesticide and crop catalogs
///
/// Construction guarantees at least one pest and one pesticide, and unique
/// ids within each catalog.
#[derive(Debug)]
pub struct ReferenceData {
    pests: Vec<Pest>,
    pesticides: Vec<Pesticide>,
    crops: Vec<Crop>,

    /// id → position, for O(1) detail lookups
    pest_index: FxHashMap<u32, usize>,
    pesticide_index: FxHashMap<u32, usize>,
    crop_index: FxHashMap<u32, usize>,
}

impl ReferenceData {
    /// Catalogs compiled into the binary
    pub fn embedded() -> Result<Self, DataError> {
        let pests = parse_catalog(PESTS_FILE, EMBEDDED_PESTS)?;
        let pesticides = parse_catalog(PESTICIDES_FILE, EMBEDDED_PESTICIDES)?;
        let crops = parse_catalog(CROPS_FILE, EMBEDDED_CROPS)?;
        Self::from_parts(pests, pesticides, crops)
    }

    /// Catalogs read from `pests.json`, `pesticides.json` and `crops.json`
    /// in `data_dir`
    pub fn load(data_dir: &Path) -> Result<Self, DataError> {
        tracing::info!("Loading reference data from {}", data_dir.display());

        let pests = read_catalog(data_dir, PESTS_FILE)?;
        let pesticides = read_catalog(data_dir, PESTICIDES_FILE)?;
        let crops = read_catalog(data_dir, CROPS_FILE)?;
        Self::from_parts(pests, pesticides, crops)
    }

    /// Validate and index already-parsed catalogs
    pub fn from_parts(
        pests: Vec<Pest>,
        pesticides: Vec<Pesticide>,
        crops: Vec<Crop>,
    ) -> Result<Self, DataError> {
        if pests.is_empty() {
            return Err(DataError::EmptyCatalog("Pest"));
        }
        if pesticides.is_empty() {
            return Err(DataError::EmptyCatalog("Pesticide"));
        }

        let pest_index = build_index("pest", pests.iter().map(|p| p.id))?;
        let pesticide_index = build_index("pesticide", pesticides.iter().map(|p| p.id))?;
        let crop_index = build_index("crop", crops.iter().map(|c| c.id))?;

        tracing::info!(
            "Reference data ready: {} pests, {} pesticides, {} crops",
            pests.len(),
            pesticides.len(),
            crops.len()
        );

        Ok(Self {
            pests,
            pesticides,
            crops,
            pest_index,
            pesticide_index,
            crop_index,
        })
    }

    pub fn pests(&self) -> &[Pest] {
        &self.pests
    }

    pub fn pesticides(&self) -> &[Pesticide] {
        &self.pesticides
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    /// First pest in catalog order. Always present.
    pub fn first_pest(&self) -> &Pest {
        &self.pests[0]
    }

    pub fn pest(&self, id: u32) -> Option<&Pest> {
        self.pest_index.get(&id).map(|&i| &self.pests[i])
    }

    pub fn pesticide(&self, id: u32) -> Option<&Pesticide> {
        self.pesticide_index.get(&id).map(|&i| &self.pesticides[i])
    }

    pub fn crop(&self, id: u32) -> Option<&Crop> {
        self.crop_index.get(&id).map(|&i| &self.crops[i])
    }
}

fn parse_catalog<T: DeserializeOwned>(name: &str, contents: &str) -> Result<Vec<T>, DataError> {
    serde_json::from_str(contents).map_err(|source| DataError::Json {
        name: name.to_string(),
        source,
    })
}

fn read_catalog<T: DeserializeOwned>(data_dir: &Path, name: &str) -> Result<Vec<T>, DataError> {
    let path = data_dir.join(name);
    let contents = std::fs::read_to_string(&path).map_err(|source| DataError::Io {
        path: path.clone(),
        source,
    })?;
    parse_catalog(name, &contents)
}

fn build_index(
    kind: &'static str,
    ids: impl Iterator<Item = u32>,
) -> Result<FxHashMap<u32, usize>, DataError> {
    let mut index = FxHashMap::default();
    for (position, id) in ids.enumerate() {
        if index.insert(id, position).is_some() {
            return Err(DataError::DuplicateId { kind, id });
        }
    }
    Ok(index)
}
