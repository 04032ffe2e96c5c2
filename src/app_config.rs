use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or "auto" for detection
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation service config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Whisper transcription config
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Audio extraction config
    #[serde(default)]
    pub audio: AudioConfig,

    /// Segment reflow config
    #[serde(default)]
    pub reflow: ReflowConfig,

    /// Subtitle rendering config
    #[serde(default)]
    pub subtitle: SubtitleConfig,

    /// Quality flagging config
    #[serde(default)]
    pub quality: QualityConfig,

    /// Skip videos whose subtitles are already up to date
    #[serde(default = "default_true")]
    pub resume_processing: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Service endpoint URL (LibreTranslate-compatible)
    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,

    /// API key for the service, if required
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum number of concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff delay for retries (milliseconds, doubled each retry)
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Cap on the backoff delay (milliseconds)
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Texts per bulk request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Pause between bulk chunks (milliseconds)
    #[serde(default = "default_chunk_pause_ms")]
    pub chunk_pause_ms: u64,

    /// Whether to memoize finished translations
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_translation_endpoint(),
            api_key: None,
            concurrent_requests: default_concurrent_requests(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
            chunk_size: default_chunk_size(),
            chunk_pause_ms: default_chunk_pause_ms(),
            cache_enabled: true,
        }
    }
}

/// Whisper transcription configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    /// Path or name of the whisper CLI binary
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    /// Path to the model file
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Transcription timeout in seconds
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            binary: default_whisper_binary(),
            model: default_whisper_model(),
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Audio extraction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AudioConfig {
    /// Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Extraction timeout in seconds
    #[serde(default = "default_extraction_timeout_secs")]
    pub timeout_secs: u64,

    /// Keep the extracted WAV file after processing
    #[serde(default)]
    pub keep_audio: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            timeout_secs: default_extraction_timeout_secs(),
            keep_audio: false,
        }
    }
}

/// Segment reflow configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReflowConfig {
    /// Whether to reflow segments at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Segments shorter than this are merged into the previous one (seconds)
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,

    /// Segments longer than this are split at sentence boundaries (seconds)
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
        }
    }
}

/// Subtitle rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Maximum characters per rendered line
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Sentences per paragraph in the clean prose output
    #[serde(default = "default_sentences_per_paragraph")]
    pub sentences_per_paragraph: usize,

    /// Render bilingual SRT and clean prose alongside the base formats
    #[serde(default = "default_true")]
    pub bilingual: bool,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            sentences_per_paragraph: default_sentences_per_paragraph(),
            bilingual: true,
        }
    }
}

/// Quality flagging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QualityConfig {
    /// Segments whose mean word probability is below this are flagged
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: default_low_confidence_threshold(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "fa".to_string()
}

fn default_translation_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_max_retry_delay_ms() -> u64 {
    16_000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_chunk_size() -> usize {
    50
}

fn default_chunk_pause_ms() -> u64 {
    500 // 500ms default pause between bulk chunks
}

fn default_whisper_binary() -> String {
    "whisper-cli".to_string()
}

fn default_whisper_model() -> String {
    "models/ggml-base.bin".to_string()
}

fn default_whisper_timeout_secs() -> u64 {
    1800
}

fn default_sample_rate() -> u32 {
    16_000
}

fn default_extraction_timeout_secs() -> u64 {
    600
}

fn default_min_duration() -> f64 {
    0.8
}

fn default_max_duration() -> f64 {
    7.0
}

fn default_max_chars_per_line() -> usize {
    42
}

fn default_sentences_per_paragraph() -> usize {
    3
}

fn default_low_confidence_threshold() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow!(
                "Failed to read config file {:?}: {}",
                path.as_ref(),
                e
            )
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        language_utils::validate_source_language(&self.source_language)?;
        language_utils::validate_language_code(&self.target_language)?;

        if self.target_language.trim().eq_ignore_ascii_case("auto") {
            return Err(anyhow!("Target language cannot be 'auto'"));
        }

        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }

        if self.translation.retry_count == 0 {
            return Err(anyhow!("retry_count must be at least 1"));
        }

        if self.reflow.min_duration >= self.reflow.max_duration {
            return Err(anyhow!(
                "reflow.min_duration ({}) must be less than reflow.max_duration ({})",
                self.reflow.min_duration,
                self.reflow.max_duration
            ));
        }

        if !(0.0..=1.0).contains(&self.quality.low_confidence_threshold) {
            return Err(anyhow!(
                "quality.low_confidence_threshold must be between 0.0 and 1.0"
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            whisper: WhisperConfig::default(),
            audio: AudioConfig::default(),
            reflow: ReflowConfig::default(),
            subtitle: SubtitleConfig::default(),
            quality: QualityConfig::default(),
            resume_processing: true,
            log_level: LogLevel::default(),
        }
    }
}
