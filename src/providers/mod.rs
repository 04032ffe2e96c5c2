/*!
 * Translation backend clients.
 *
 * The coordinator talks to a remote translation service through this narrow
 * interface; the wire protocol behind it is opaque to the core. A client
 * handle is not assumed safe for simultaneous use by multiple workers, which
 * is why the coordinator keeps one per worker slot.
 */

use std::fmt::Debug;

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Common trait for translation service clients
#[async_trait]
pub trait TranslationClient: Send + Sync + Debug {
    /// Translate a single text from `source` to `target` language.
    ///
    /// Single-shot: retry and caching are the coordinator's concern.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ProviderError>;

    /// Translate several texts in one call, preserving order.
    ///
    /// Optional; providers without a bulk endpoint keep the default, and the
    /// coordinator falls back to per-item translation.
    async fn translate_batch(
        &self,
        _texts: &[String],
        _source: &str,
        _target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::BatchUnsupported)
    }
}

pub mod libretranslate;
pub mod mock;
