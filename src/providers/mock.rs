/*!
 * Mock translation clients for testing.
 *
 * The mocks simulate remote-service behaviors the coordinator has to cope
 * with: success, persistent failure, transient failure, empty responses,
 * and slow responses. A shared atomic counter records how many remote calls
 * were actually issued, which is how the cache-idempotence and retry tests
 * observe the coordinator.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::TranslationClient;

/// Behavior mode for the mock client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, prefixing the input with `[TRANSLATED] `
    Working,
    /// Always fails with a request error
    Failing,
    /// Fails the first N calls, then succeeds
    FailFirst(usize),
    /// Succeeds with an empty string
    Empty,
    /// Succeeds after a delay (for pacing tests)
    Slow { delay_ms: u64 },
}

/// Mock translation client
#[derive(Debug)]
pub struct MockClient {
    /// Behavior mode
    behavior: MockBehavior,

    /// Remote-call counter, shared across clones
    calls: Arc<AtomicUsize>,
}

impl MockClient {
    /// Create a mock client with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Mock that fails the first `n` calls, then succeeds
    pub fn fail_first(n: usize) -> Self {
        Self::new(MockBehavior::FailFirst(n))
    }

    /// Mock that succeeds with empty output
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of remote calls issued so far (across all clones)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The translation a working mock produces for `text`
    pub fn expected_translation(text: &str) -> String {
        format!("[TRANSLATED] {}", text)
    }
}

impl Clone for MockClient {
    fn clone(&self) -> Self {
        // Clones share the call counter so a pool of clients counts as one
        // remote service
        Self {
            behavior: self.behavior,
            calls: self.calls.clone(),
        }
    }
}

#[async_trait]
impl TranslationClient for MockClient {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(Self::expected_translation(text)),
            MockBehavior::Failing => {
                Err(ProviderError::RequestFailed("mock failure".to_string()))
            }
            MockBehavior::FailFirst(n) => {
                if call < n {
                    Err(ProviderError::RequestFailed(format!(
                        "mock transient failure {}",
                        call + 1
                    )))
                } else {
                    Ok(Self::expected_translation(text))
                }
            }
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Self::expected_translation(text))
            }
        }
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _source: &str,
        _target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(texts
                .iter()
                .map(|t| Self::expected_translation(t))
                .collect()),
            _ => Err(ProviderError::BatchUnsupported),
        }
    }
}
