/*!
 * Speech-to-text transcription.
 *
 * The pipeline only depends on the `Transcriber` trait; the bundled
 * implementation shells out to a whisper.cpp CLI binary and parses its JSON
 * output into timestamped segments with per-token probabilities.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use serde_json::Value;
use tokio::process::Command;

use crate::errors::MediaError;
use crate::segment::{Segment, Word};

/// Result of transcribing one audio file
#[derive(Debug, Clone)]
pub struct Transcription {
    /// Timestamped segments in temporal order
    pub segments: Vec<Segment>,

    /// Detected (or forced) language code
    pub language: String,
}

/// Speech-to-text backend
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a mono 16 kHz WAV file
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription>;
}

/// Transcriber backed by a whisper.cpp command-line binary
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    /// Path or name of the whisper CLI binary
    pub binary: String,

    /// Path to the model file
    pub model: String,

    /// Source language to force, or None for auto-detection
    pub language: Option<String>,

    /// Timeout for the transcription process in seconds
    pub timeout_secs: u64,
}

impl WhisperCliTranscriber {
    pub fn new(binary: &str, model: &str, language: Option<String>, timeout_secs: u64) -> Self {
        Self {
            binary: binary.to_string(),
            model: model.to_string(),
            language,
            timeout_secs,
        }
    }

    /// Parse the whisper.cpp JSON output file into segments.
    ///
    /// Offsets come in milliseconds; token-level probabilities become `Word`
    /// records so downstream quality flagging has something to average.
    fn parse_output(json: &Value) -> Result<Transcription> {
        let language = json
            .get("result")
            .and_then(|r| r.get("language"))
            .and_then(|l| l.as_str())
            .unwrap_or("unknown")
            .to_string();

        let entries = json
            .get("transcription")
            .and_then(|t| t.as_array())
            .ok_or_else(|| {
                MediaError::ParseError("whisper output has no 'transcription' array".to_string())
            })?;

        let mut segments = Vec::with_capacity(entries.len());

        for entry in entries {
            let start = entry
                .get("offsets")
                .and_then(|o| o.get("from"))
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0)
                / 1000.0;
            let end = entry
                .get("offsets")
                .and_then(|o| o.get("to"))
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0)
                / 1000.0;
            let text = entry
                .get("text")
                .and_then(|t| t.as_str())
                .unwrap_or("")
                .trim()
                .to_string();

            let words = entry
                .get("tokens")
                .and_then(|t| t.as_array())
                .map(|tokens| {
                    tokens
                        .iter()
                        .filter_map(|token| {
                            let word = token.get("text").and_then(|t| t.as_str())?;
                            // Whisper emits control tokens like [_BEG_]
                            if word.starts_with('[') && word.ends_with(']') {
                                return None;
                            }
                            Some(Word {
                                word: word.to_string(),
                                start: token
                                    .get("offsets")
                                    .and_then(|o| o.get("from"))
                                    .and_then(|v| v.as_f64())
                                    .unwrap_or(0.0)
                                    / 1000.0,
                                end: token
                                    .get("offsets")
                                    .and_then(|o| o.get("to"))
                                    .and_then(|v| v.as_f64())
                                    .unwrap_or(0.0)
                                    / 1000.0,
                                probability: token
                                    .get("p")
                                    .and_then(|v| v.as_f64())
                                    .unwrap_or(0.0),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            segments.push(Segment {
                start,
                end,
                text,
                original_text: None,
                words,
            });
        }

        Ok(Transcription { segments, language })
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        if !audio_path.exists() {
            return Err(MediaError::MissingInput(format!(
                "audio file does not exist: {}",
                audio_path.display()
            ))
            .into());
        }

        info!("Transcribing {}", audio_path.display());

        // whisper.cpp writes <prefix>.json when given -oj/-of
        let output_prefix = audio_path.with_extension("whisper");
        let json_path = PathBuf::from(format!("{}.json", output_prefix.display()));

        let mut args: Vec<String> = vec![
            "-m".to_string(),
            self.model.clone(),
            "-f".to_string(),
            audio_path.to_string_lossy().to_string(),
            "-oj".to_string(),
            "-of".to_string(),
            output_prefix.to_string_lossy().to_string(),
        ];
        if let Some(language) = &self.language {
            args.push("-l".to_string());
            args.push(language.clone());
        }

        let whisper_future = Command::new(&self.binary).args(&args).output();

        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);
        let output = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| MediaError::ToolFailed(
                    format!("failed to execute whisper command '{}': {}", self.binary, e),
                ))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(MediaError::Timeout(format!(
                    "whisper did not finish within {} seconds",
                    self.timeout_secs
                ))
                .into());
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Whisper transcription failed: {}", stderr);
            return Err(MediaError::ToolFailed(format!("whisper transcription failed: {}", stderr)).into());
        }

        let raw = std::fs::read_to_string(&json_path).map_err(|e| {
            MediaError::ToolFailed(format!(
                "failed to read whisper output {}: {}",
                json_path.display(),
                e
            ))
        })?;
        let json: Value = serde_json::from_str(&raw)
            .map_err(|e| MediaError::ParseError(format!("invalid whisper JSON: {}", e)))?;

        // The JSON file is an intermediate; remove it once parsed
        if let Err(e) = std::fs::remove_file(&json_path) {
            debug!("Could not remove whisper output file: {}", e);
        }

        let transcription = Self::parse_output(&json)?;
        info!(
            "Transcribed {} segments (language: {})",
            transcription.segments.len(),
            transcription.language
        );

        Ok(transcription)
    }
}
