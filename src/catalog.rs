//! Catalog Queries
//!
//! Read-only lookups over `ReferenceData`: library search and filtering,
//! cross-references between pests and crops, and pesticide recommendations.
//!
//! All matching is case-insensitive. Results keep catalog order.

use crate::data::ReferenceData;
use crate::types::{Crop, Pest, Pesticide};
use crate::utils::text::{contains_ignore_case, eq_ignore_case};

/// Number of leading pesticides recommended when nothing targets a pest
pub const FALLBACK_RECOMMENDATIONS: usize = 2;

/// Category filter value that disables filtering
pub const ALL_CATEGORIES: &str = "all";

impl ReferenceData {
    /// Pesticides with an effective-against entry containing `target_label`
    ///
    /// Empty (or blank) labels match nothing. No fallback is applied here.
    pub fn pesticides_effective_against(&self, target_label: &str) -> Vec<&Pesticide> {
        if target_label.trim().is_empty() {
            return Vec::new();
        }

        let needle = target_label.to_lowercase();
        self.pesticides()
            .iter()
            .filter(|p| {
                p.effective_against
                    .iter()
                    .any(|target| target.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Pesticides with an effective-against entry equal to `target_label`
    fn pesticides_targeting_exactly(&self, target_label: &str) -> Vec<&Pesticide> {
        self.pesticides()
            .iter()
            .filter(|p| {
                p.effective_against
                    .iter()
                    .any(|target| eq_ignore_case(target, target_label))
            })
            .collect()
    }

    /// Treatment list for a pest, never empty
    ///
    /// 1. Substring match on the pest's category
    /// 2. Exact match on the category
    /// 3. The first `FALLBACK_RECOMMENDATIONS` pesticides
    pub fn recommendations_for(&self, pest: &Pest) -> Vec<&Pesticide> {
        let by_substring = self.pesticides_effective_against(&pest.category);
        if !by_substring.is_empty() {
            return by_substring;
        }

        let by_exact = self.pesticides_targeting_exactly(&pest.category);
        if !by_exact.is_empty() {
            return by_exact;
        }

        tracing::debug!(
            "No pesticide targets category '{}', using first {}",
            pest.category,
            FALLBACK_RECOMMENDATIONS
        );
        self.pesticides()
            .iter()
            .take(FALLBACK_RECOMMENDATIONS)
            .collect()
    }

    /// Pest library search
    ///
    /// `term` matches name, scientific name or description. `category` is
    /// an exact category, or `None` / `"all"` for every category.
    pub fn search_pests(&self, term: &str, category: Option<&str>) -> Vec<&Pest> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !eq_ignore_case(c, ALL_CATEGORIES));

        self.pests()
            .iter()
            .filter(|pest| {
                contains_ignore_case(&pest.name, term)
                    || contains_ignore_case(&pest.scientific_name, term)
                    || contains_ignore_case(&pest.description, term)
            })
            .filter(|pest| category.map_or(true, |c| eq_ignore_case(&pest.category, c)))
            .collect()
    }

    /// Distinct pest categories in first-seen order
    pub fn pest_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for pest in self.pests() {
            if !categories.iter().any(|c| *c == pest.category) {
                categories.push(&pest.category);
            }
        }
        categories
    }

    /// Crop library search over name, scientific name, description and tags
    pub fn search_crops(&self, term: &str) -> Vec<&Crop> {
        self.crops()
            .iter()
            .filter(|crop| {
                contains_ignore_case(&crop.name, term)
                    || contains_ignore_case(&crop.scientific_name, term)
                    || contains_ignore_case(&crop.description, term)
                    || crop.tags.iter().any(|tag| contains_ignore_case(tag, term))
            })
            .collect()
    }

    /// Pests listing `crop_name` among their affected crops
    pub fn pests_affecting_crop(&self, crop_name: &str) -> Vec<&Pest> {
        self.pests()
            .iter()
            .filter(|pest| {
                pest.affected_crops
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .any(|name| eq_ignore_case(name, crop_name))
            })
            .collect()
    }

    /// Crops whose growing conditions list `soil_name` as a suitable soil
    pub fn crops_for_soil(&self, soil_name: &str) -> Vec<&Crop> {
        self.crops()
            .iter()
            .filter(|crop| {
                crop.growing_conditions
                    .soil_types
                    .iter()
                    .any(|soil| eq_ignore_case(soil, soil_name))
            })
            .collect()
    }
}
