/*!
 * # polysub - speech-to-subtitle translation pipeline
 *
 * A Rust library that turns spoken video into translated subtitle artifacts.
 *
 * ## Features
 *
 * - Extract and downmix the audio track of a video with ffmpeg
 * - Transcribe speech to timestamped segments with whisper.cpp
 * - Reflow segments for readability (merge fragments, split run-ons)
 * - Translate concurrently through a LibreTranslate-compatible service,
 *   with memoization, retry, and graceful degradation to the source text
 * - Flag low-confidence segments for human review
 * - Render SRT, VTT, and plain text, plus bilingual SRT and clean prose
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segment`: Timestamped segment and word records
 * - `reflow`: Duration-driven merge/split of segments
 * - `translation`: Concurrent translation machinery:
 *   - `translation::coordinator`: Fan-out, retry, deterministic re-assembly
 *   - `translation::cache`: Memoization of finished translations
 *   - `translation::pool`: Per-worker client pool
 * - `providers`: Translation service clients
 * - `quality`: Low-confidence segment flagging
 * - `subtitle_renderer`: Output format rendering
 * - `shaping`: Pluggable display-text shaping
 * - `media`: ffmpeg/ffprobe integration
 * - `transcribe`: whisper.cpp integration
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod providers;
pub mod quality;
pub mod reflow;
pub mod segment;
pub mod shaping;
pub mod subtitle_renderer;
pub mod transcribe;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{MediaError, ProviderError};
pub use language_utils::{get_language_name, language_codes_match};
pub use segment::{Segment, Word};
pub use subtitle_renderer::SubtitleRenderer;
pub use translation::TranslationCoordinator;
