/*!
 * Concurrent, cache-backed translation coordination.
 *
 * Fans a segment list out to a bounded pool of translation clients against
 * an unreliable remote service, with capped exponential backoff and
 * deterministic re-assembly. Translation failure always degrades to the
 * original text; it never aborts the caller.
 */

use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use futures::stream::{self, StreamExt};
use log::{error, info, warn};

use crate::providers::TranslationClient;
use crate::segment::Segment;

use super::cache::TranslationCache;
use super::pool::ClientPool;

/// Retry budget and backoff shape for a single translation
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum attempts per text (including the first)
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds
    pub base_delay_ms: u64,

    /// Cap on the exponential backoff delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 16_000,
        }
    }
}

/// Options for the translation coordinator
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorOptions {
    /// Retry budget per text
    pub retry: RetryPolicy,

    /// Pause between bulk chunks, to respect rate limits
    pub chunk_pause_ms: u64,

    /// Whether to memoize finished translations
    pub cache_enabled: bool,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            chunk_pause_ms: 500,
            cache_enabled: true,
        }
    }
}

/// Thread-safe memoizing translator with bounded concurrency and retry
pub struct TranslationCoordinator<C: TranslationClient> {
    /// One pre-constructed client per worker slot
    pool: ClientPool<C>,

    /// Process-lifetime memoization of finished translations
    cache: TranslationCache,

    /// Retry, pacing, and caching options
    options: CoordinatorOptions,

    /// Source language code ("auto" allowed)
    source_language: String,

    /// Target language code
    target_language: String,
}

impl<C: TranslationClient> TranslationCoordinator<C> {
    /// Create a coordinator from pre-constructed clients; concurrency equals
    /// the number of clients.
    pub fn new(
        clients: Vec<C>,
        source_language: &str,
        target_language: &str,
        options: CoordinatorOptions,
    ) -> Result<Self> {
        if clients.is_empty() {
            return Err(anyhow!("Translation coordinator needs at least one client"));
        }

        Ok(Self {
            pool: ClientPool::new(clients),
            cache: TranslationCache::new(options.cache_enabled),
            options,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        })
    }

    /// Worker pool size
    pub fn concurrency(&self) -> usize {
        self.pool.size()
    }

    /// Access to the memoization cache (stats, tests)
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate a single text with memoization and capped exponential
    /// backoff. Returns the original text unchanged when it is empty or when
    /// every attempt fails.
    pub async fn translate_text(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let trimmed = text.trim();

        if let Some(cached) = self
            .cache
            .get(trimmed, &self.source_language, &self.target_language)
        {
            return cached;
        }

        let retry = self.options.retry;
        for attempt in 0..retry.max_attempts {
            let outcome = {
                let client = self.pool.acquire().await;
                client
                    .translate(trimmed, &self.source_language, &self.target_language)
                    .await
                // The client handle returns to the pool here, before any
                // backoff sleep
            };

            match outcome {
                Ok(translated) => {
                    // An empty remote result degrades to the original text
                    let result = if translated.is_empty() {
                        text.to_string()
                    } else {
                        translated
                    };
                    self.cache.store(
                        trimmed,
                        &self.source_language,
                        &self.target_language,
                        &result,
                    );
                    return result;
                }
                Err(e) => {
                    if attempt + 1 < retry.max_attempts {
                        let delay = retry
                            .base_delay_ms
                            .saturating_mul(1u64 << attempt.min(16))
                            .min(retry.max_delay_ms);
                        warn!(
                            "Translation attempt {} failed ({}), retrying in {}ms",
                            attempt + 1,
                            e,
                            delay
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    } else {
                        error!(
                            "Translation failed after {} attempts: {}",
                            retry.max_attempts, e
                        );
                    }
                }
            }
        }

        text.to_string()
    }

    /// Translate all segments through the bounded worker pool.
    ///
    /// Each task copies its segment, records the pre-translation text in
    /// `original_text`, and overwrites `text` with the result. Completion
    /// order under concurrency is a race, so the output is stable-sorted by
    /// `(start, original index)` before being returned.
    pub async fn translate_segments(&self, segments: &[Segment]) -> Vec<Segment> {
        self.translate_segments_with_progress(segments, |_, _| {})
            .await
    }

    /// `translate_segments` with a `(done, total)` progress callback.
    pub async fn translate_segments_with_progress(
        &self,
        segments: &[Segment],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<Segment> {
        let total = segments.len();
        info!(
            "Translating {} segments ({} -> {})",
            total, self.source_language, self.target_language
        );

        let completed = Arc::new(AtomicUsize::new(0));

        let mut results: Vec<(usize, Segment)> = stream::iter(segments.iter().cloned().enumerate())
            .map(|(index, mut seg)| {
                let completed = completed.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let original = seg.text.clone();
                    let translated = self.translate_text(&original).await;

                    seg.original_text = Some(original);
                    seg.text = translated;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(done, total);

                    (index, seg)
                }
            })
            .buffer_unordered(self.concurrency())
            .collect()
            .await;

        // Restore temporal order lost to concurrent completion; ties on
        // start keep their input order
        results.sort_by(|(ia, a), (ib, b)| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(CmpOrdering::Equal)
                .then(ia.cmp(ib))
        });

        results.into_iter().map(|(_, seg)| seg).collect()
    }

    /// Translate a flat text list in sequential chunks via the provider's
    /// bulk endpoint where available. A failed chunk falls back to per-item
    /// translation for that chunk only; output order matches input order.
    pub async fn translate_batch(&self, texts: &[String], chunk_size: usize) -> Vec<String> {
        let mut translated = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(chunk_size.max(1)) {
            let outcome = {
                let client = self.pool.acquire().await;
                client
                    .translate_batch(chunk, &self.source_language, &self.target_language)
                    .await
            };

            match outcome {
                Ok(results) if results.len() == chunk.len() => {
                    translated.extend(results);
                }
                Ok(results) => {
                    warn!(
                        "Batch translation returned {} results for {} inputs, falling back to individual",
                        results.len(),
                        chunk.len()
                    );
                    for text in chunk {
                        translated.push(self.translate_text(text).await);
                    }
                }
                Err(e) => {
                    warn!(
                        "Batch translation failed, falling back to individual: {}",
                        e
                    );
                    for text in chunk {
                        translated.push(self.translate_text(text).await);
                    }
                }
            }

            // Brief pause between chunks to avoid rate limiting
            tokio::time::sleep(Duration::from_millis(self.options.chunk_pause_ms)).await;
        }

        translated
    }
}
