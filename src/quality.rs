/*!
 * Low-confidence segment flagging for human review.
 *
 * The transcription engine attaches per-word probability scores. A segment
 * whose mean word probability falls below a threshold likely carries
 * recognition errors, so it is exported to a review list instead of being
 * trusted blindly. Segments without word-level data are skipped: absence of
 * evidence is not treated as low confidence.
 */

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::segment::Segment;

/// A segment flagged for review, with its confidence and original position
#[derive(Debug, Clone)]
pub struct FlaggedSegment {
    /// Index of the segment in the original sequence
    pub index: usize,

    /// Mean word probability, rounded to 4 decimal places
    pub avg_probability: f64,

    /// Copy of the flagged segment
    pub segment: Segment,
}

/// Scan segments and return those whose mean word probability is strictly
/// below `threshold`.
pub fn flag_low_confidence(segments: &[Segment], threshold: f64) -> Vec<FlaggedSegment> {
    let mut flagged = Vec::new();

    for (index, seg) in segments.iter().enumerate() {
        if seg.words.is_empty() {
            continue;
        }

        let sum: f64 = seg.words.iter().map(|w| w.probability).sum();
        let avg = sum / seg.words.len() as f64;

        if avg < threshold {
            flagged.push(FlaggedSegment {
                index,
                avg_probability: round4(avg),
                segment: seg.clone(),
            });
        }
    }

    flagged
}

/// Write a human-readable review list for flagged segments.
pub fn write_review_list<P: AsRef<Path>>(flagged: &[FlaggedSegment], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create review list: {}", path.display()))?;

    writeln!(file, "LOW-CONFIDENCE SEGMENTS - REVIEW LIST")?;
    writeln!(file, "{}", "=".repeat(60))?;
    writeln!(file)?;

    if flagged.is_empty() {
        writeln!(file, "All segments passed the confidence threshold")?;
    }

    for entry in flagged {
        writeln!(
            file,
            "[{:.2}s - {:.2}s]  avg_prob={:.2}%",
            entry.segment.start,
            entry.segment.end,
            entry.avg_probability * 100.0
        )?;
        writeln!(file, "  Text: {}", entry.segment.text)?;
        if let Some(original) = &entry.segment.original_text {
            writeln!(file, "  Original: {}", original)?;
        }
        writeln!(file)?;
    }

    info!("Review list saved: {}", path.display());
    Ok(())
}

/// Round to 4 decimal places
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
