// Detection Properties
//
// Invariants of the simulated detector over the embedded catalogs:
// confidence band, determinism of pest selection, non-empty treatment
// lists, and the fixed default on resolver failure.

use pest_guide::detection::{ConfidenceBand, DEFAULT_CONFIDENCE};
use pest_guide::{
    DetectionError, DetectionResult, DetectionService, HeuristicResolver, ImageArtifact,
    MatchResolver, ReferenceData,
};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

fn random_artifact(rng: &mut impl Rng) -> ImageArtifact {
    let stem: String = (0..rng.gen_range(1..24))
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect();
    ImageArtifact::new(format!("{}.jpg", stem), rng.gen_range(0..50_000_000u64))
}

fn service() -> DetectionService {
    let data = Arc::new(ReferenceData::embedded().unwrap());
    DetectionService::new(data).with_latency(Duration::ZERO)
}

#[test]
fn test_random_artifacts_are_fully_populated() {
    let data = ReferenceData::embedded().unwrap();
    let resolver = HeuristicResolver::new();
    let mut rng = rand::thread_rng();

    for _ in 0..1_000 {
        let artifact = random_artifact(&mut rng);
        let result = resolver.resolve(&data, &artifact).unwrap();

        assert!(
            ConfidenceBand::DETECTION.contains(result.confidence),
            "confidence {} out of band for {:?}",
            result.confidence,
            artifact
        );
        assert!((0.88..0.98).contains(&result.confidence));
        assert!(data.pest(result.pest.id).is_some());
        assert!(!result.recommended_pesticides.is_empty());
        assert_eq!(
            result.affected_crops,
            result.pest.affected_crops.clone().unwrap_or_default()
        );
    }
}

#[test]
fn test_same_size_same_pest() {
    let data = ReferenceData::embedded().unwrap();
    let resolver = HeuristicResolver::new();

    for byte_len in [0u64, 1, 17, 4096, 1_048_576, 9_999_999] {
        let a = resolver
            .resolve(&data, &ImageArtifact::new("IMG_0001.jpg", byte_len))
            .unwrap();
        let b = resolver
            .resolve(&data, &ImageArtifact::new("holiday/DSC_8812.png", byte_len))
            .unwrap();
        assert_eq!(a.pest.id, b.pest.id, "byte length {}", byte_len);
    }
}

#[test]
fn test_every_pest_has_recommendations() {
    let data = ReferenceData::embedded().unwrap();
    for pest in data.pests() {
        assert!(
            !data.recommendations_for(pest).is_empty(),
            "no recommendations for {}",
            pest.name
        );
    }
}

#[test]
fn test_beetle_query_finds_japanese_beetle_treatment() {
    let data = ReferenceData::embedded().unwrap();
    let matches = data.pesticides_effective_against("Beetle");
    assert!(matches
        .iter()
        .any(|p| p.effective_against.iter().any(|t| t == "Japanese Beetles")));
}

#[test]
fn test_filename_shortcut_for_every_pest() {
    let data = ReferenceData::embedded().unwrap();
    let resolver = HeuristicResolver::new();
    for pest in data.pests() {
        let filename = format!("field_photo_{}.jpg", pest.name.to_lowercase());
        let result = resolver
            .resolve(&data, &ImageArtifact::new(filename, 12_345))
            .unwrap();
        assert_eq!(result.pest.id, pest.id);
    }
}

struct AlwaysFails;

impl MatchResolver for AlwaysFails {
    fn resolve<'a>(
        &self,
        _data: &'a ReferenceData,
        _artifact: &ImageArtifact,
    ) -> Result<DetectionResult<'a>, DetectionError> {
        Err(DetectionError::Preprocess("unsupported color profile".to_string()))
    }
}

#[tokio::test]
async fn test_failure_injection_returns_default() {
    let service = service().with_resolver(Arc::new(AlwaysFails));
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let artifact = random_artifact(&mut rng);
        let result = service.resolve_match(&artifact).await;
        assert_eq!(result.pest.name, "Aphid");
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
        assert!(!result.recommended_pesticides.is_empty());
    }
}

#[tokio::test]
async fn test_overlapping_detections() {
    let service = Arc::new(service().with_latency(Duration::from_millis(5)));

    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let artifact = ImageArtifact::new(format!("upload_{}.jpg", i), i);
                service.resolve_match(&artifact).await.pest.id
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let pest_id = handle.await.unwrap();
        // byte_len i over 8 pests: index i, ids are 1-based in catalog order
        assert_eq!(pest_id, i as u32 + 1);
    }
}
