//! Match resolution strategies
//!
//! `MatchResolver` is the seam where a real classifier would plug in.
//! `HeuristicResolver` is the placeholder: deterministic pest selection
//! from the filename or byte length, plus a placeholder confidence score.

use crate::data::ReferenceData;
use crate::error::DetectionError;
use crate::types::Pest;

use super::confidence::{ConfidenceBand, ConfidenceSource, RandomConfidence};
use super::{DetectionResult, ImageArtifact};

/// Maps an image artifact to a detection result
pub trait MatchResolver: Send + Sync {
    fn resolve<'a>(
        &self,
        data: &'a ReferenceData,
        artifact: &ImageArtifact,
    ) -> Result<DetectionResult<'a>, DetectionError>;
}

/// Which rule picked the pest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    /// Filename contained the pest's name
    FilenameMatch,
    /// `byte_len % pest_count`
    SizeModulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub rule: SelectionRule,
}

/// Pick a pest for an artifact.
///
/// 1. First pest (catalog order) whose name appears anywhere in the
///    filename, directory components included
/// 2. Otherwise the pest at `byte_len % pests.len()`
///
/// Returns `None` only for an empty pest list.
pub fn select_pest(pests: &[Pest], artifact: &ImageArtifact) -> Option<Selection> {
    if pests.is_empty() {
        return None;
    }

    let filename = artifact.filename.to_lowercase();
    let by_name = pests
        .iter()
        .position(|pest| !pest.name.is_empty() && filename.contains(&pest.name.to_lowercase()));

    let selection = match by_name {
        Some(index) => Selection {
            index,
            rule: SelectionRule::FilenameMatch,
        },
        None => Selection {
            index: (artifact.byte_len % pests.len() as u64) as usize,
            rule: SelectionRule::SizeModulo,
        },
    };
    Some(selection)
}

/// Filename/size heuristic with a sampled confidence
pub struct HeuristicResolver<C = RandomConfidence> {
    confidence: C,
    band: ConfidenceBand,
}

impl HeuristicResolver<RandomConfidence> {
    pub fn new() -> Self {
        Self::with_confidence(RandomConfidence)
    }
}

impl Default for HeuristicResolver<RandomConfidence> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ConfidenceSource> HeuristicResolver<C> {
    pub fn with_confidence(confidence: C) -> Self {
        Self {
            confidence,
            band: ConfidenceBand::DETECTION,
        }
    }

    pub fn band(&self) -> ConfidenceBand {
        self.band
    }
}

impl<C: ConfidenceSource> MatchResolver for HeuristicResolver<C> {
    fn resolve<'a>(
        &self,
        data: &'a ReferenceData,
        artifact: &ImageArtifact,
    ) -> Result<DetectionResult<'a>, DetectionError> {
        let selection = select_pest(data.pests(), artifact).ok_or(DetectionError::EmptyCatalog)?;
        let pest = &data.pests()[selection.index];

        tracing::debug!(
            filename = %artifact.filename,
            byte_len = artifact.byte_len,
            rule = ?selection.rule,
            "Selected pest '{}'",
            pest.name
        );

        Ok(DetectionResult {
            pest,
            confidence: self.band.map(self.confidence.unit_sample()),
            recommended_pesticides: data.recommendations_for(pest),
            affected_crops: pest.affected_crops.clone().unwrap_or_default(),
        })
    }
}
