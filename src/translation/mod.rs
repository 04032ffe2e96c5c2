/*!
 * Translation coordination for subtitle segments.
 *
 * This module contains the concurrent, cache-backed translation machinery:
 *
 * - `coordinator`: fan-out, retry/backoff, and deterministic re-assembly
 * - `cache`: memoization of finished translations
 * - `pool`: explicit pool of per-worker client handles
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::coordinator::{CoordinatorOptions, RetryPolicy, TranslationCoordinator};
pub use self::pool::ClientPool;

// Submodules
pub mod cache;
pub mod coordinator;
pub mod pool;
