//! Detection Service
//!
//! Owns the resolver strategy and the simulated inference latency. Callers
//! always get a usable result: resolver errors are logged and replaced by
//! the fixed default (first pest, confidence 0.85), and the outcome records
//! which of the two happened.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crate::data::ReferenceData;
use crate::error::DetectionError;

use super::resolver::{HeuristicResolver, MatchResolver};
use super::{DetectionResult, ImageArtifact};

/// Confidence reported with the default result
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Simulated inference latency
pub const DEFAULT_LATENCY: Duration = Duration::from_secs(2);

/// Result of one detection request
#[derive(Debug)]
pub enum DetectionOutcome<'a> {
    /// The resolver produced a match
    Matched(DetectionResult<'a>),
    /// The resolver failed; `result` is the fixed default
    Fallback {
        result: DetectionResult<'a>,
        error: DetectionError,
    },
}

impl<'a> DetectionOutcome<'a> {
    pub fn result(&self) -> &DetectionResult<'a> {
        match self {
            DetectionOutcome::Matched(result) => result,
            DetectionOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> DetectionResult<'a> {
        match self {
            DetectionOutcome::Matched(result) => result,
            DetectionOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DetectionOutcome::Fallback { .. })
    }

    pub fn error(&self) -> Option<&DetectionError> {
        match self {
            DetectionOutcome::Matched(_) => None,
            DetectionOutcome::Fallback { error, .. } => Some(error),
        }
    }
}

/// Result returned when resolution fails: the first catalog pest at a
/// fixed confidence, with its usual recommendations
pub fn default_result(data: &ReferenceData) -> DetectionResult<'_> {
    let pest = data.first_pest();
    DetectionResult {
        pest,
        confidence: DEFAULT_CONFIDENCE,
        recommended_pesticides: data.recommendations_for(pest),
        affected_crops: pest.affected_crops.clone().unwrap_or_default(),
    }
}

pub struct DetectionService {
    data: Arc<ReferenceData>,
    resolver: Arc<dyn MatchResolver>,
    latency: Duration,
}

impl DetectionService {
    /// Heuristic resolver with the default latency
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self {
            data,
            resolver: Arc::new(HeuristicResolver::new()),
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn MatchResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Wait out the simulated latency, then resolve.
    ///
    /// The wait is flat: no retry, no cancellation, no timeout.
    pub async fn detect(&self, artifact: &ImageArtifact) -> DetectionOutcome<'_> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.resolve_now(artifact)
    }

    /// `detect` without the outcome tag
    pub async fn resolve_match(&self, artifact: &ImageArtifact) -> DetectionResult<'_> {
        self.detect(artifact).await.into_result()
    }

    /// Resolve immediately, skipping the latency
    ///
    /// Resolver panics are caught and treated like any other resolver error.
    pub fn resolve_now(&self, artifact: &ImageArtifact) -> DetectionOutcome<'_> {
        let resolved = panic::catch_unwind(AssertUnwindSafe(|| {
            self.resolver.resolve(&self.data, artifact)
        }))
        .unwrap_or_else(|payload| Err(DetectionError::Panicked(panic_message(payload.as_ref()))));

        match resolved {
            Ok(result) => {
                tracing::info!(
                    "Detected '{}' for {} ({} bytes, confidence {:.2})",
                    result.pest.name,
                    artifact.filename,
                    artifact.byte_len,
                    result.confidence
                );
                DetectionOutcome::Matched(result)
            }
            Err(error) => {
                tracing::warn!(
                    "Detection failed for {}: {}. Returning default result",
                    artifact.filename,
                    error
                );
                DetectionOutcome::Fallback {
                    result: default_result(&self.data),
                    error,
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{ConfidenceBand, FixedConfidence};
    use approx::assert_relative_eq;

    /// Resolver whose preprocessing always fails
    struct BrokenPreprocessing;

    impl MatchResolver for BrokenPreprocessing {
        fn resolve<'a>(
            &self,
            _data: &'a ReferenceData,
            _artifact: &ImageArtifact,
        ) -> Result<DetectionResult<'a>, DetectionError> {
            Err(DetectionError::Preprocess("corrupt image header".to_string()))
        }
    }

    /// Resolver that panics instead of returning an error
    struct PanickingResolver;

    impl MatchResolver for PanickingResolver {
        fn resolve<'a>(
            &self,
            _data: &'a ReferenceData,
            _artifact: &ImageArtifact,
        ) -> Result<DetectionResult<'a>, DetectionError> {
            panic!("decoder blew up");
        }
    }

    fn service() -> DetectionService {
        let data = Arc::new(ReferenceData::embedded().unwrap());
        DetectionService::new(data).with_latency(Duration::ZERO)
    }

    #[test]
    fn test_default_result() {
        let data = ReferenceData::embedded().unwrap();
        let result = default_result(&data);
        assert_eq!(result.pest.name, "Aphid");
        assert_eq!(result.confidence, 0.85);
        // "Insect" matches Diatomaceous Earth's "Soil-dwelling insects"
        let recs: Vec<&str> = result
            .recommended_pesticides
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(recs, vec!["Diatomaceous Earth"]);
        assert_eq!(result.affected_crops.len(), 9);
    }

    #[test]
    fn test_failure_yields_default() {
        let service = service().with_resolver(Arc::new(BrokenPreprocessing));
        let outcome = service.resolve_now(&ImageArtifact::new("japanese_beetle.jpg", 500));

        assert!(outcome.is_fallback());
        assert!(matches!(outcome.error(), Some(DetectionError::Preprocess(_))));
        let result = outcome.into_result();
        assert_eq!(result.pest.name, "Aphid");
        assert_eq!(result.confidence, 0.85);
        assert!(!result.recommended_pesticides.is_empty());
    }

    #[test]
    fn test_panicking_resolver_yields_default() {
        let service = service().with_resolver(Arc::new(PanickingResolver));
        let outcome = service.resolve_now(&ImageArtifact::new("spider mite.jpg", 42));

        assert!(outcome.is_fallback());
        match outcome.error() {
            Some(DetectionError::Panicked(message)) => assert_eq!(message, "decoder blew up"),
            other => panic!("expected Panicked, got {:?}", other),
        }
        let result = outcome.into_result();
        assert_eq!(result.pest.name, "Aphid");
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
        assert!(!result.recommended_pesticides.is_empty());
    }

    #[test]
    fn test_panic_message_formats() {
        let owned: Box<dyn Any + Send> = Box::new(format!("bad header at {}", 12));
        assert_eq!(panic_message(owned.as_ref()), "bad header at 12");
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[test]
    fn test_matched_outcome() {
        let service = service()
            .with_resolver(Arc::new(HeuristicResolver::with_confidence(FixedConfidence(0.0))));
        let outcome = service.resolve_now(&ImageArtifact::new("spider mite.png", 1));
        assert!(!outcome.is_fallback());
        assert!(outcome.error().is_none());
        assert_eq!(outcome.result().pest.name, "Spider Mite");
        assert_relative_eq!(outcome.result().confidence, 0.88, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_resolve_match_without_latency() {
        let service = service();
        let result = service
            .resolve_match(&ImageArtifact::new("aphid_sample.jpg", 4096))
            .await;
        assert_eq!(result.pest.name, "Aphid");
        assert!(ConfidenceBand::DETECTION.contains(result.confidence));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detect_waits_for_latency() {
        let service = service().with_latency(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        let outcome = service.detect(&ImageArtifact::new("leaf.jpg", 10)).await;
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(!outcome.is_fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_latency_still_returns_default() {
        let service = service()
            .with_latency(Duration::from_millis(500))
            .with_resolver(Arc::new(BrokenPreprocessing));
        let result = service.resolve_match(&ImageArtifact::new("leaf.jpg", 10)).await;
        assert_eq!(result.pest.id, 1);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_new_uses_default_latency() {
        let data = Arc::new(ReferenceData::embedded().unwrap());
        assert_eq!(DetectionService::new(data).latency(), DEFAULT_LATENCY);
    }
}
