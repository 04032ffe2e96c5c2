/*!
 * Segment timing reflow: merge short segments, split long ones.
 *
 * Very short segments flash by too quickly to read; very long ones put too
 * much text on screen at once. The reflow pass repairs both, before and
 * after translation. It is a pure transformation over a segment slice.
 */

use crate::segment::Segment;

/// Sentence-ending punctuation used as split points (Latin and Arabic-script)
const SENTENCE_TERMINATORS: [char; 7] = ['.', '!', '?', '،', '؛', ':', ';'];

/// Thresholds for the reflow pass
#[derive(Debug, Clone, Copy)]
pub struct ReflowOptions {
    /// Merge segments shorter than this (seconds)
    pub min_duration: f64,

    /// Split segments longer than this (seconds)
    pub max_duration: f64,
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self {
            min_duration: 0.8,
            max_duration: 7.0,
        }
    }
}

/// Reflow a segment sequence: merge pass followed by split pass.
///
/// Merge protects legibility, split protects screen density. The two passes
/// are deliberately asymmetric: the first segment can never be merged away
/// (no predecessor), and an unsplittable over-long segment is kept as-is.
pub fn reflow(segments: &[Segment], options: &ReflowOptions) -> Vec<Segment> {
    let merged = merge_short(segments, options.min_duration);
    split_long(merged, options.max_duration)
}

/// Merge pass: fold segments shorter than `min_duration` into their predecessor.
///
/// The accumulator's last segment absorbs the short one: its end is extended,
/// texts are concatenated with a single space, and word lists are joined.
/// `original_text` is only concatenated when both sides carry it. A segment
/// may absorb multiple short followers in sequence, so the resulting duration
/// is unbounded by this pass alone.
fn merge_short(segments: &[Segment], min_duration: f64) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());

    for seg in segments {
        if let Some(prev) = merged.last_mut() {
            if seg.duration() < min_duration {
                prev.end = seg.end;
                prev.text = format!("{} {}", prev.text, seg.text);

                if let (Some(prev_orig), Some(seg_orig)) =
                    (prev.original_text.as_ref(), seg.original_text.as_ref())
                {
                    prev.original_text = Some(format!("{} {}", prev_orig, seg_orig));
                }

                prev.words.extend(seg.words.iter().cloned());
                continue;
            }
        }

        // First segment, or long enough to stand on its own
        merged.push(seg.clone());
    }

    merged
}

/// Split pass: break segments longer than `max_duration` at sentence punctuation.
///
/// Duration is distributed proportionally to each part's character count,
/// assigning consecutive non-overlapping sub-ranges starting at the original
/// start. Word-level timing is no longer attributable after a split, so
/// `words` is dropped on every fragment. When the text yields fewer than two
/// parts the over-long segment is kept unchanged.
fn split_long(segments: Vec<Segment>, max_duration: f64) -> Vec<Segment> {
    let mut result: Vec<Segment> = Vec::with_capacity(segments.len());

    for seg in segments {
        let duration = seg.duration();
        if duration <= max_duration {
            result.push(seg);
            continue;
        }

        let parts = split_after_terminators(&seg.text, &SENTENCE_TERMINATORS);
        if parts.len() < 2 {
            // No usable split point, keep over-length rather than forcing
            // nonsensical fragments
            result.push(seg);
            continue;
        }

        let total_chars: usize = parts.iter().map(|p| p.chars().count()).sum::<usize>().max(1);
        let has_original = seg.original_text.is_some();
        let mut cursor = seg.start;

        for part in parts {
            let fraction = part.chars().count() as f64 / total_chars as f64;
            let part_duration = duration * fraction;

            let trimmed = part.trim().to_string();
            let mut child = Segment::new(cursor, cursor + part_duration, trimmed.clone());
            if has_original {
                // Source and target lose independent alignment here; both
                // sides get the same trimmed part. Known approximation.
                child.original_text = Some(trimmed);
            }
            result.push(child);

            cursor += part_duration;
        }
    }

    result
}

/// Zero-width split after any of `terminators` followed by whitespace.
///
/// The punctuation stays with the left part and the whitespace run between
/// parts is consumed. Also used by the clean-prose renderer with its own
/// terminator set.
pub(crate) fn split_after_terminators<'a>(text: &'a str, terminators: &[char]) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut part_start = 0;
    let mut prev_was_terminator = false;

    let mut iter = text.char_indices().peekable();
    while let Some((idx, ch)) = iter.next() {
        if prev_was_terminator && ch.is_whitespace() {
            parts.push(&text[part_start..idx]);

            // Consume the whole whitespace run
            let mut next_start = idx + ch.len_utf8();
            while let Some(&(next_idx, next_ch)) = iter.peek() {
                if next_ch.is_whitespace() {
                    iter.next();
                    next_start = next_idx + next_ch.len_utf8();
                } else {
                    next_start = next_idx;
                    break;
                }
            }

            part_start = next_start;
            prev_was_terminator = false;
            continue;
        }

        prev_was_terminator = terminators.contains(&ch);
    }

    if part_start < text.len() {
        parts.push(&text[part_start..]);
    }

    parts
}
