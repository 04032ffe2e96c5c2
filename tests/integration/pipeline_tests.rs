/*!
 * End-to-end pipeline tests from raw transcription segments to rendered
 * subtitle artifacts, with the remote translation service mocked out
 */

use polysub::file_utils::FileManager;
use polysub::providers::mock::MockClient;
use polysub::quality::flag_low_confidence;
use polysub::reflow::{ReflowOptions, reflow};
use polysub::subtitle_renderer::SubtitleRenderer;
use polysub::translation::{CoordinatorOptions, RetryPolicy, TranslationCoordinator};

use crate::common::{create_temp_dir, sample_transcription, seg_with_probs};

fn fast_options() -> CoordinatorOptions {
    CoordinatorOptions {
        retry: RetryPolicy {
            max_attempts: 2,
            base_delay_ms: 1,
            max_delay_ms: 2,
        },
        chunk_pause_ms: 0,
        cache_enabled: true,
    }
}

#[tokio::test]
async fn test_pipeline_withWorkingService_shouldProduceAllArtifacts() {
    let dir = create_temp_dir().unwrap();

    // Reflow the raw transcription: the fragment merges, the run-on splits
    let raw = sample_transcription();
    let reflowed = reflow(&raw, &ReflowOptions::default());
    assert!(reflowed.len() > raw.len() - 1);
    assert!(reflowed.iter().all(|s| s.duration() <= 7.0 + 1e-9));

    // Translate through the coordinator
    let clients = vec![MockClient::working(), MockClient::working()];
    let coordinator =
        TranslationCoordinator::new(clients, "en", "fa", fast_options()).unwrap();
    let translated = coordinator.translate_segments(&reflowed).await;

    assert_eq!(translated.len(), reflowed.len());
    assert!(translated.iter().all(|s| s.original_text.is_some()));
    assert!(translated
        .iter()
        .all(|s| s.text.starts_with("[TRANSLATED]")));

    // Render every output format
    let renderer = SubtitleRenderer::new(42, 3);
    let base = dir.path().join("video_fa");
    let outputs = renderer.render_all(&translated, &base, true).unwrap();

    assert_eq!(outputs.len(), 5);
    for path in outputs.values() {
        assert!(path.exists(), "missing artifact: {}", path.display());
    }

    // The rendered SRT parses back to the same cue structure
    let srt_content = std::fs::read_to_string(&outputs["srt"]).unwrap();
    let parsed = SubtitleRenderer::parse_srt(&srt_content).unwrap();
    assert_eq!(parsed.len(), translated.len());
    assert_eq!(parsed[0].start, translated[0].start);
}

#[tokio::test]
async fn test_pipeline_withUnreachableService_shouldStillRenderOriginals() {
    let dir = create_temp_dir().unwrap();

    let raw = sample_transcription();
    let reflowed = reflow(&raw, &ReflowOptions::default());

    let coordinator =
        TranslationCoordinator::new(vec![MockClient::failing()], "en", "fa", fast_options())
            .unwrap();
    let translated = coordinator.translate_segments(&reflowed).await;

    // Translation degraded to the source text, nothing was lost
    for (before, after) in reflowed.iter().zip(&translated) {
        assert_eq!(&after.text, &before.text);
        assert_eq!(after.original_text.as_deref(), Some(before.text.as_str()));
    }

    let renderer = SubtitleRenderer::new(42, 3);
    let outputs = renderer
        .render_all(&translated, dir.path().join("video_fa"), true)
        .unwrap();
    assert!(outputs["srt"].exists());
}

#[tokio::test]
async fn test_pipeline_qualityFlagging_shouldSurviveReflowAndTranslation() {
    let raw = vec![
        seg_with_probs(0.0, 2.0, "clear speech here", &[0.9, 0.95, 0.92]),
        seg_with_probs(2.0, 4.0, "mumbled noise", &[0.2, 0.1]),
    ];

    let reflowed = reflow(&raw, &ReflowOptions::default());
    let flagged = flag_low_confidence(&reflowed, 0.5);

    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].segment.text, "mumbled noise");
}

#[tokio::test]
async fn test_pipeline_jsonDump_shouldSerializeSegmentsWithOriginals() {
    let dir = create_temp_dir().unwrap();

    let coordinator = TranslationCoordinator::new(
        vec![MockClient::working()],
        "en",
        "fa",
        fast_options(),
    )
    .unwrap();
    let translated = coordinator
        .translate_segments(&sample_transcription())
        .await;

    let dump_path = dir.path().join("video_segments.json");
    FileManager::save_json(&dump_path, &translated).unwrap();

    let raw = std::fs::read_to_string(&dump_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let array = parsed.as_array().unwrap();
    assert_eq!(array.len(), translated.len());
    assert!(array[0]["original_text"].is_string());
    assert!(array[0]["text"]
        .as_str()
        .unwrap()
        .starts_with("[TRANSLATED]"));
}
