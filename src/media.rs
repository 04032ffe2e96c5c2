/*!
 * Media probing and audio extraction via ffmpeg/ffprobe.
 *
 * The transcriber wants mono 16 kHz PCM, so extraction always converts to
 * that shape regardless of the source container. Both tools run as external
 * processes with a timeout to avoid hanging on damaged files.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;
use tokio::process::Command;

use crate::errors::MediaError;

/// Summary of a probed video file
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    /// File name without directory
    pub filename: String,

    /// Duration in seconds
    pub duration: f64,

    /// Duration formatted for humans, e.g. "1h 23m 45s"
    pub duration_formatted: String,

    /// File size in megabytes
    pub size_mb: f64,

    /// Frames per second of the first video stream
    pub fps: f64,

    /// Resolution as "WIDTHxHEIGHT"
    pub resolution: String,
}

/// Audio extractor backed by the ffmpeg binary
#[derive(Debug, Clone, Copy)]
pub struct AudioExtractor {
    /// Output sample rate in Hz
    pub sample_rate: u32,

    /// Timeout for the ffmpeg process in seconds
    pub timeout_secs: u64,
}

impl Default for AudioExtractor {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            timeout_secs: 600,
        }
    }
}

impl AudioExtractor {
    /// Create an extractor with the given sample rate and timeout
    pub fn new(sample_rate: u32, timeout_secs: u64) -> Self {
        Self {
            sample_rate,
            timeout_secs,
        }
    }

    /// Extract the audio track of `video_path` to `output_path` as mono
    /// 16-bit PCM WAV at the configured sample rate.
    pub async fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        video_path: P,
        output_path: Q,
    ) -> Result<PathBuf> {
        let video_path = video_path.as_ref();
        let output_path = output_path.as_ref();

        if !video_path.exists() {
            return Err(MediaError::MissingInput(format!(
                "video file does not exist: {}",
                video_path.display()
            ))
            .into());
        }

        info!("Extracting audio from {}", video_path.display());

        let sample_rate = self.sample_rate.to_string();
        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y", // Overwrite existing file
                "-i", video_path.to_str().unwrap_or_default(),
                "-vn", // No video
                "-acodec", "pcm_s16le",
                "-ar", &sample_rate,
                "-ac", "1", // Mono
                output_path.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(self.timeout_secs);
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| MediaError::ToolFailed(format!("failed to execute ffmpeg: {}", e)))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(MediaError::Timeout(format!(
                    "ffmpeg did not finish within {} seconds",
                    self.timeout_secs
                ))
                .into());
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("Audio extraction failed: {}", filtered);
            return Err(MediaError::ToolFailed(format!("ffmpeg extraction failed: {}", filtered)).into());
        }

        if !output_path.exists() {
            return Err(MediaError::ToolFailed(format!(
                "ffmpeg reported success but produced no output: {}",
                output_path.display()
            ))
            .into());
        }

        debug!("Audio written to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }
}

/// Probe a video file with ffprobe and summarize its format and first
/// video stream.
pub async fn probe_video_info<P: AsRef<Path>>(video_path: P) -> Result<VideoInfo> {
    let video_path = video_path.as_ref();

    if !video_path.exists() {
        return Err(MediaError::MissingInput(format!(
            "video file not found: {}",
            video_path.display()
        ))
        .into());
    }

    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
            video_path.to_str().unwrap_or(""),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(30);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| MediaError::ToolFailed(format!("failed to execute ffprobe: {}", e)))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(MediaError::Timeout("ffprobe did not finish within 30 seconds".to_string()).into());
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(MediaError::ToolFailed(format!("ffprobe command failed: {}", stderr)).into());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout)
        .map_err(|e| MediaError::ParseError(format!("invalid ffprobe JSON: {}", e)))?;

    let duration = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let size_bytes = json
        .get("format")
        .and_then(|f| f.get("size"))
        .and_then(|s| s.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let video_stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| {
            streams.iter().find(|stream| {
                stream.get("codec_type").and_then(|c| c.as_str()) == Some("video")
            })
        });

    let fps = video_stream
        .and_then(|s| s.get("r_frame_rate"))
        .and_then(|r| r.as_str())
        .map(parse_frame_rate)
        .unwrap_or(0.0);

    let resolution = match (
        video_stream.and_then(|s| s.get("width")).and_then(|w| w.as_u64()),
        video_stream.and_then(|s| s.get("height")).and_then(|h| h.as_u64()),
    ) {
        (Some(w), Some(h)) => format!("{}x{}", w, h),
        _ => "unknown".to_string(),
    };

    let filename = video_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| video_path.display().to_string());

    Ok(VideoInfo {
        filename,
        duration,
        duration_formatted: format_duration(duration),
        size_mb: size_bytes / (1024.0 * 1024.0),
        fps,
        resolution,
    })
}

/// Parse an ffprobe rational frame rate like "30000/1001"
fn parse_frame_rate(rate: &str) -> f64 {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().unwrap_or(0.0);
            let den: f64 = den.parse().unwrap_or(1.0);
            if den == 0.0 { 0.0 } else { num / den }
        }
        None => rate.parse().unwrap_or(0.0),
    }
}

/// Format a duration in seconds as "1h 23m 45s", dropping leading zero units
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
