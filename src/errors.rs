/*!
 * Error types for the polysub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider has no bulk translation endpoint
    #[error("Provider does not support batch translation")]
    BatchUnsupported,
}

/// Errors that can occur while driving external media tooling (ffmpeg/ffprobe/whisper)
#[derive(Error, Debug)]
pub enum MediaError {
    /// Input file is missing or has an unsupported extension
    #[error("Invalid input: {0}")]
    MissingInput(String),

    /// The external process exited with a failure status
    #[error("External tool failed: {0}")]
    ToolFailed(String),

    /// The external process exceeded its wall-clock timeout
    #[error("External tool timed out: {0}")]
    Timeout(String),

    /// The tool succeeded but its output could not be parsed
    #[error("Failed to parse tool output: {0}")]
    ParseError(String),
}
