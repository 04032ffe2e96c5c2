/*!
 * Tests for the translation coordinator: caching, retry, degradation,
 * and deterministic re-assembly
 */

use polysub::providers::mock::MockClient;
use polysub::translation::{CoordinatorOptions, RetryPolicy, TranslationCoordinator};

use crate::common::seg;

/// Options with millisecond-scale delays so retry tests stay fast
fn fast_options() -> CoordinatorOptions {
    CoordinatorOptions {
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_ms: 4,
        },
        chunk_pause_ms: 0,
        cache_enabled: true,
    }
}

fn coordinator_with(
    clients: Vec<MockClient>,
    options: CoordinatorOptions,
) -> TranslationCoordinator<MockClient> {
    TranslationCoordinator::new(clients, "en", "fa", options).unwrap()
}

#[tokio::test]
async fn test_new_withNoClients_shouldFail() {
    let result = TranslationCoordinator::<MockClient>::new(
        Vec::new(),
        "en",
        "fa",
        CoordinatorOptions::default(),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_translate_text_withWorkingClient_shouldTranslate() {
    let coordinator = coordinator_with(vec![MockClient::working()], fast_options());

    let result = coordinator.translate_text("Hello").await;

    assert_eq!(result, MockClient::expected_translation("Hello"));
}

#[tokio::test]
async fn test_translate_text_withEmptyText_shouldNotCallRemote() {
    let mock = MockClient::working();
    let coordinator = coordinator_with(vec![mock.clone()], fast_options());

    assert_eq!(coordinator.translate_text("").await, "");
    assert_eq!(coordinator.translate_text("   ").await, "   ");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_translate_text_withRepeatedText_shouldHitCacheOnce() {
    let mock = MockClient::working();
    let coordinator = coordinator_with(vec![mock.clone()], fast_options());

    let first = coordinator.translate_text("Hello").await;
    let second = coordinator.translate_text("Hello").await;

    assert_eq!(first, second);
    assert_eq!(mock.call_count(), 1);

    let (hits, _, _) = coordinator.cache().stats();
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn test_translate_text_withFailingClient_shouldReturnOriginal() {
    let mock = MockClient::failing();
    let coordinator = coordinator_with(vec![mock.clone()], fast_options());

    let result = coordinator.translate_text("Hello").await;

    assert_eq!(result, "Hello");
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_translate_text_withTransientFailure_shouldRetryAndSucceed() {
    let mock = MockClient::fail_first(2);
    let coordinator = coordinator_with(vec![mock.clone()], fast_options());

    let result = coordinator.translate_text("Hello").await;

    assert_eq!(result, MockClient::expected_translation("Hello"));
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_translate_text_withEmptyRemoteResult_shouldReturnOriginal() {
    let coordinator = coordinator_with(vec![MockClient::empty()], fast_options());

    let result = coordinator.translate_text("Hello").await;

    assert_eq!(result, "Hello");
}

#[tokio::test]
async fn test_translate_segments_shouldSetOriginalTextAndTranslate() {
    let coordinator = coordinator_with(vec![MockClient::working()], fast_options());
    let segments = vec![seg(0.0, 1.0, "One"), seg(1.0, 2.0, "Two")];

    let result = coordinator.translate_segments(&segments).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].original_text.as_deref(), Some("One"));
    assert_eq!(result[0].text, MockClient::expected_translation("One"));
    assert_eq!(result[1].original_text.as_deref(), Some("Two"));
}

#[tokio::test]
async fn test_translate_segments_withConcurrentWorkers_shouldRestoreTemporalOrder() {
    let clients = vec![
        MockClient::working(),
        MockClient::working(),
        MockClient::working(),
        MockClient::working(),
    ];
    let coordinator = coordinator_with(clients, fast_options());

    let segments: Vec<_> = (0..20)
        .map(|i| seg(i as f64, i as f64 + 1.0, &format!("segment {}", i)))
        .collect();

    let result = coordinator.translate_segments(&segments).await;

    let starts: Vec<f64> = result.iter().map(|s| s.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(starts, sorted);
}

#[tokio::test]
async fn test_translate_segments_withEqualStarts_shouldKeepInputOrder() {
    let clients = vec![MockClient::working(), MockClient::working()];
    let coordinator = coordinator_with(clients, fast_options());

    let segments = vec![
        seg(0.0, 1.0, "first"),
        seg(0.0, 1.0, "second"),
        seg(0.0, 1.0, "third"),
    ];

    let result = coordinator.translate_segments(&segments).await;

    let originals: Vec<&str> = result
        .iter()
        .map(|s| s.original_text.as_deref().unwrap())
        .collect();
    assert_eq!(originals, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_translate_segments_withProgressCallback_shouldReportCompletion() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let coordinator = coordinator_with(vec![MockClient::working()], fast_options());
    let segments = vec![seg(0.0, 1.0, "a"), seg(1.0, 2.0, "b"), seg(2.0, 3.0, "c")];

    let max_done = Arc::new(AtomicUsize::new(0));
    let max_done_cb = max_done.clone();

    coordinator
        .translate_segments_with_progress(&segments, move |done, total| {
            assert_eq!(total, 3);
            max_done_cb.fetch_max(done, Ordering::SeqCst);
        })
        .await;

    assert_eq!(max_done.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_translate_batch_withWorkingClient_shouldPreserveOrder() {
    let mock = MockClient::working();
    let coordinator = coordinator_with(vec![mock.clone()], fast_options());

    let texts: Vec<String> = (0..5).map(|i| format!("text {}", i)).collect();
    let result = coordinator.translate_batch(&texts, 2).await;

    assert_eq!(result.len(), 5);
    for (input, output) in texts.iter().zip(&result) {
        assert_eq!(output, &MockClient::expected_translation(input));
    }
    // 5 texts in chunks of 2 means 3 bulk calls
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_translate_batch_withFailingClient_shouldFallBackToOriginals() {
    let coordinator = coordinator_with(vec![MockClient::failing()], fast_options());

    let texts = vec!["one".to_string(), "two".to_string()];
    let result = coordinator.translate_batch(&texts, 10).await;

    assert_eq!(result, texts);
}
