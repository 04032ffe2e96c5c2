/*!
 * Multi-format subtitle rendering.
 *
 * Serializes a segment sequence into SRT, WebVTT, plain text, bilingual SRT,
 * and a paragraph-reflowed clean prose document. Formatting is stateless
 * given the segment list; display text goes through optional bidi shaping
 * and word-boundary line wrapping before being written.
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::reflow::split_after_terminators;
use crate::segment::Segment;
use crate::shaping::{NoopShaper, TextShaper};

// Cue timestamp line, tolerant of both millisecond separators (SRT comma, VTT period)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3}) --> (\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
        .unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Sentence enders for prose re-splitting (Latin plus Arabic-script question mark)
const PROSE_TERMINATORS: [char; 4] = ['.', '!', '?', '؟'];

/// Millisecond separator style for cue timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStyle {
    /// SRT style: `00:01:23,456`
    Srt,
    /// WebVTT style: `00:01:23.456`
    Vtt,
}

/// Format seconds as a zero-padded cue timestamp.
pub fn format_timestamp(seconds: f64, style: TimestampStyle) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    match style {
        TimestampStyle::Srt => format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis),
        TimestampStyle::Vtt => format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis),
    }
}

/// Paths of the artifacts produced by a `render_all` call, keyed by format name
pub type RenderedOutputs = HashMap<String, PathBuf>;

/// Stateless multi-format subtitle renderer
#[derive(Debug, Clone)]
pub struct SubtitleRenderer {
    /// Maximum characters per line before wrapping
    max_chars_per_line: usize,

    /// Sentences grouped per paragraph in the clean prose format
    sentences_per_paragraph: usize,

    /// Optional bidi shaping capability
    shaper: Arc<dyn TextShaper>,
}

impl Default for SubtitleRenderer {
    fn default() -> Self {
        Self::new(42, 3)
    }
}

impl SubtitleRenderer {
    /// Create a renderer with the pass-through shaper
    pub fn new(max_chars_per_line: usize, sentences_per_paragraph: usize) -> Self {
        Self {
            max_chars_per_line,
            sentences_per_paragraph,
            shaper: Arc::new(NoopShaper),
        }
    }

    /// Inject a shaping capability (builder style)
    pub fn with_shaper(mut self, shaper: Arc<dyn TextShaper>) -> Self {
        self.shaper = shaper;
        self
    }

    /// Wrap text at word boundaries so no line exceeds the character limit.
    /// Text at or under the limit is returned untouched. A single word longer
    /// than the limit is broken mid-word.
    pub fn wrap_text(&self, text: &str) -> String {
        if text.chars().count() <= self.max_chars_per_line {
            return text.to_string();
        }

        let limit = self.max_chars_per_line.max(1);
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > limit {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                // Full chunks become lines; the remainder starts the next line
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(limit) {
                    if chunk.len() == limit {
                        lines.push(chunk.iter().collect());
                    } else {
                        current = chunk.iter().collect();
                        current_len = chunk.len();
                    }
                }
                continue;
            }

            if current_len > 0 && current_len + 1 + word_len > limit {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
        if !current.is_empty() {
            lines.push(current);
        }

        lines.join("\n")
    }

    /// Shape then wrap trimmed text for on-screen display
    fn display_text(&self, text: &str) -> String {
        self.wrap_text(&self.shaper.shape(text.trim()))
    }

    /// Render SRT: index, comma-millisecond timestamp line, text, blank line.
    pub fn render_srt(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        for (i, seg) in segments.iter().enumerate() {
            out.push_str(&format!("{}\n", i + 1));
            out.push_str(&format!(
                "{} --> {}\n",
                format_timestamp(seg.start, TimestampStyle::Srt),
                format_timestamp(seg.end, TimestampStyle::Srt)
            ));
            out.push_str(&self.display_text(&seg.text));
            out.push_str("\n\n");
        }
        out
    }

    /// Render WebVTT: fixed header, then indexed cues with period-millisecond
    /// timestamps.
    pub fn render_vtt(&self, segments: &[Segment]) -> String {
        let mut out = String::from("WEBVTT\n\n");
        for (i, seg) in segments.iter().enumerate() {
            out.push_str(&format!("{}\n", i + 1));
            out.push_str(&format!(
                "{} --> {}\n",
                format_timestamp(seg.start, TimestampStyle::Vtt),
                format_timestamp(seg.end, TimestampStyle::Vtt)
            ));
            out.push_str(&self.display_text(&seg.text));
            out.push_str("\n\n");
        }
        out
    }

    /// Render a plain text transcript, optionally prefixed with bracketed
    /// timestamp lines.
    pub fn render_txt(&self, segments: &[Segment], include_timestamps: bool) -> String {
        let mut out = String::new();
        for seg in segments {
            if include_timestamps {
                out.push_str(&format!(
                    "[{} --> {}]\n",
                    format_timestamp(seg.start, TimestampStyle::Srt),
                    format_timestamp(seg.end, TimestampStyle::Srt)
                ));
            }
            out.push_str(&self.display_text(&seg.text));
            out.push_str("\n\n");
        }
        out
    }

    /// Render bilingual SRT: source-language line above the shaped/wrapped
    /// translation. Segments without `original_text` fall back to the
    /// translation only.
    pub fn render_bilingual_srt(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        for (i, seg) in segments.iter().enumerate() {
            out.push_str(&format!("{}\n", i + 1));
            out.push_str(&format!(
                "{} --> {}\n",
                format_timestamp(seg.start, TimestampStyle::Srt),
                format_timestamp(seg.end, TimestampStyle::Srt)
            ));
            if let Some(original) = &seg.original_text {
                out.push_str(original.trim());
                out.push('\n');
            }
            out.push_str(&self.display_text(&seg.text));
            out.push_str("\n\n");
        }
        out
    }

    /// Render a clean prose document: all text joined, whitespace collapsed,
    /// re-split into sentences, grouped into paragraphs, shaped, BOM-prefixed
    /// for RTL editor compatibility. No timestamps.
    pub fn render_clean_prose(&self, segments: &[Segment]) -> String {
        let joined = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let collapsed = WHITESPACE_REGEX.replace_all(&joined, " ");

        let sentences: Vec<&str> = split_after_terminators(&collapsed, &PROSE_TERMINATORS)
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let group = self.sentences_per_paragraph.max(1);
        let paragraphs: Vec<String> = sentences
            .chunks(group)
            .map(|chunk| self.shaper.shape(&chunk.join(" ")))
            .collect();

        // UTF-8 BOM helps RTL-aware editors pick the right encoding
        format!("\u{feff}{}\n", paragraphs.join("\n\n"))
    }

    /// Produce all formats under `base_path` (path without extension).
    ///
    /// SRT, VTT, and TXT are always written. The bilingual SRT and clean
    /// prose document are added only when requested and at least one segment
    /// carries `original_text`.
    pub fn render_all<P: AsRef<Path>>(
        &self,
        segments: &[Segment],
        base_path: P,
        include_bilingual: bool,
    ) -> Result<RenderedOutputs> {
        let base = base_path.as_ref();
        let mut outputs = RenderedOutputs::new();

        let srt_path = base.with_extension("srt");
        write_text_file(&srt_path, &self.render_srt(segments))?;
        outputs.insert("srt".to_string(), srt_path);

        let vtt_path = base.with_extension("vtt");
        write_text_file(&vtt_path, &self.render_vtt(segments))?;
        outputs.insert("vtt".to_string(), vtt_path);

        let txt_path = base.with_extension("txt");
        write_text_file(&txt_path, &self.render_txt(segments, true))?;
        outputs.insert("txt".to_string(), txt_path);

        let has_original = segments.iter().any(|s| s.original_text.is_some());
        if include_bilingual && has_original {
            let bilingual_path = sibling_with_suffix(base, "_bilingual.srt");
            write_text_file(&bilingual_path, &self.render_bilingual_srt(segments))?;
            outputs.insert("bilingual_srt".to_string(), bilingual_path);

            let prose_path = sibling_with_suffix(base, "_clean.txt");
            write_text_file(&prose_path, &self.render_clean_prose(segments))?;
            outputs.insert("clean_text".to_string(), prose_path);
        }

        Ok(outputs)
    }

    /// Parse SRT (or VTT cue) content back into segments.
    ///
    /// Used by the round-trip tests and the resume path. Line wrapping
    /// inserted at render time survives as embedded newlines in the text.
    pub fn parse_srt(content: &str) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut current_times: Option<(f64, f64)> = None;
        let mut current_text = String::new();

        let mut flush =
            |times: &mut Option<(f64, f64)>, text: &mut String, out: &mut Vec<Segment>| {
                if let Some((start, end)) = times.take() {
                    if !text.trim().is_empty() {
                        out.push(Segment::new(start, end, text.trim().to_string()));
                    }
                }
                text.clear();
            };

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut current_times, &mut current_text, &mut segments);
                continue;
            }

            // Header and cue indices are skipped; timestamps open a new cue
            if trimmed == "WEBVTT" {
                continue;
            }
            if current_times.is_none() && trimmed.parse::<usize>().is_ok() {
                continue;
            }

            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                flush(&mut current_times, &mut current_text, &mut segments);
                let start = timestamp_captures_to_seconds(&caps, 1)?;
                let end = timestamp_captures_to_seconds(&caps, 5)?;
                current_times = Some((start, end));
                continue;
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            }
        }
        flush(&mut current_times, &mut current_text, &mut segments);

        if segments.is_empty() {
            return Err(anyhow!("No valid subtitle cues found in content"));
        }
        Ok(segments)
    }
}

/// Convert four timestamp capture groups starting at `start_idx` to seconds
fn timestamp_captures_to_seconds(caps: &regex::Captures, start_idx: usize) -> Result<f64> {
    let field = |offset: usize| -> Result<u64> {
        caps.get(start_idx + offset)
            .ok_or_else(|| anyhow!("Missing timestamp field"))?
            .as_str()
            .parse::<u64>()
            .context("Failed to parse timestamp field")
    };

    let ms = (field(0)? * 3600 + field(1)? * 60 + field(2)?) * 1000 + field(3)?;
    Ok(ms as f64 / 1000.0)
}

/// Write a text file, creating parent directories as needed
fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Append a suffix to the final path component (e.g. `out/video` + `_clean.txt`)
fn sibling_with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let stem = base
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    base.with_file_name(format!("{}{}", stem, suffix))
}
