/*!
 * Shared segment model flowing through every pipeline stage.
 *
 * A segment is one timestamped unit of recognized speech. It is created by
 * the transcription engine, reshaped by the reflow pass, annotated by the
 * translation coordinator, and read by the renderer and quality flagger.
 */

use serde::{Deserialize, Serialize};

/// A single recognized word with its timing and confidence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    /// The recognized word text
    pub word: String,

    /// Word start time in seconds
    pub start: f64,

    /// Word end time in seconds
    pub end: f64,

    /// Recognition confidence in [0, 1]
    pub probability: f64,
}

/// A contiguous span of speech with its text
///
/// Segments are conceptually ordered by `start`, but nothing enforces
/// non-overlap; consumers preserve input order until an explicit sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds (`start <= end`)
    pub end: f64,

    /// Working text: original language until translated, then the translation
    pub text: String,

    /// Pre-translation text, present once translation has occurred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,

    /// Word-level timing and confidence; may be empty, dropped on split
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
}

impl Segment {
    /// Create a new segment without word-level data
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Segment {
            start,
            end,
            text: text.into(),
            original_text: None,
            words: Vec::new(),
        }
    }

    /// Attach word-level data (builder style, used by the transcriber and tests)
    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = words;
        self
    }

    /// Segment duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl Word {
    /// Create a new word entry
    pub fn new(word: impl Into<String>, start: f64, end: f64, probability: f64) -> Self {
        Word {
            word: word.into(),
            start,
            end,
            probability,
        }
    }
}
