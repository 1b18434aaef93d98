//! Catalog record types
//!
//! Field names follow the JSON files under `data/` (snake_case).

use serde::{Deserialize, Serialize};

/// How much damage a pest typically does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// An agricultural pest or disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pest {
    pub id: u32,
    pub name: String,
    pub scientific_name: String,
    /// Informal group ("Insect", "Beetle", "Fungus", ...). Drives pesticide
    /// recommendations.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub damage_signs: Vec<String>,
    #[serde(default)]
    pub prevention_tips: Vec<String>,
    /// Crop names, matched case-insensitively against `Crop::name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_crops: Option<Vec<String>>,
}

/// A control product or method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pesticide {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    /// Pest names or categories ("Aphids", "Japanese Beetles", "Caterpillars")
    pub effective_against: Vec<String>,
    pub application_method: String,
    #[serde(default)]
    pub safety_precautions: Vec<String>,
    pub environmental_impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowingConditions {
    pub temperature: String,
    pub water_needs: String,
    pub soil_types: Vec<String>,
    pub sunlight: String,
}

/// Days to maturity: either a plain count or a descriptive range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Maturity {
    Days(u32),
    Description(String),
}

impl std::fmt::Display for Maturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Maturity::Days(days) => write!(f, "{} days", days),
            Maturity::Description(text) => f.write_str(text),
        }
    }
}

/// A cultivated plant and its growing requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: u32,
    pub name: String,
    pub scientific_name: String,
    pub family: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub growing_conditions: GrowingConditions,
    #[serde(default)]
    pub growing_season: Vec<String>,
    pub days_to_maturity: Maturity,
    #[serde(default)]
    pub common_pests: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
