/*!
 * Tests for segment reflow (merge/split) behavior
 */

use polysub::reflow::{ReflowOptions, reflow};
use polysub::segment::Word;

use crate::common::{seg, seg_with_probs};

fn options(min: f64, max: f64) -> ReflowOptions {
    ReflowOptions {
        min_duration: min,
        max_duration: max,
    }
}

#[test]
fn test_reflow_withShortSecondSegment_shouldMergeIntoPrevious() {
    let segments = vec![seg(0.0, 4.0, "A"), seg(4.0, 4.3, "B")];

    let result = reflow(&segments, &options(0.8, 7.0));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].start, 0.0);
    assert_eq!(result[0].end, 4.3);
    assert_eq!(result[0].text, "A B");
}

#[test]
fn test_reflow_withShortFirstSegment_shouldKeepIt() {
    // The first segment has no predecessor to merge into
    let segments = vec![seg(0.0, 0.3, "Hi"), seg(0.3, 5.0, "There")];

    let result = reflow(&segments, &options(0.8, 7.0));

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].text, "Hi");
    assert_eq!(result[0].end, 0.3);
}

#[test]
fn test_reflow_withRunOfShortSegments_shouldMergeAllIntoPrevious() {
    let segments = vec![
        seg(0.0, 2.0, "One"),
        seg(2.0, 2.2, "two"),
        seg(2.2, 2.4, "three"),
    ];

    let result = reflow(&segments, &options(0.8, 7.0));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].text, "One two three");
    assert_eq!(result[0].end, 2.4);
}

#[test]
fn test_reflow_merge_shouldConcatenateWords() {
    let a = seg_with_probs(0.0, 2.0, "One", &[0.9, 0.8]);
    let b = seg_with_probs(2.0, 2.3, "two", &[0.7]);

    let result = reflow(&[a, b], &options(0.8, 7.0));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].words.len(), 3);
    assert_eq!(result[0].words[2].probability, 0.7);
}

#[test]
fn test_reflow_merge_withOriginalTextOnBothSides_shouldConcatenate() {
    let mut a = seg(0.0, 2.0, "Uno");
    a.original_text = Some("One".to_string());
    let mut b = seg(2.0, 2.3, "dos");
    b.original_text = Some("two".to_string());

    let result = reflow(&[a, b], &options(0.8, 7.0));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].original_text.as_deref(), Some("One two"));
}

#[test]
fn test_reflow_merge_withOriginalTextOnOneSide_shouldKeepPreviousOnly() {
    let mut a = seg(0.0, 2.0, "Uno");
    a.original_text = Some("One".to_string());
    let b = seg(2.0, 2.3, "dos");

    let result = reflow(&[a, b], &options(0.8, 7.0));

    assert_eq!(result[0].original_text.as_deref(), Some("One"));
}

#[test]
fn test_reflow_withLongSegment_shouldSplitProportionallyToCharCount() {
    // "Hello world." is 12 chars, "How are you?" is 13 chars, 25 total
    let segments = vec![seg(0.0, 10.0, "Hello world. How are you?")];

    let result = reflow(&segments, &options(0.8, 7.0));

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].text, "Hello world.");
    assert_eq!(result[1].text, "How are you?");

    assert!((result[0].duration() - 4.8).abs() < 1e-9);
    assert!((result[1].duration() - 5.2).abs() < 1e-9);
    assert_eq!(result[0].end, result[1].start);
    assert!((result[1].end - 10.0).abs() < 1e-9);
}

#[test]
fn test_reflow_withLongUnsplittableSegment_shouldKeepIt() {
    let segments = vec![seg(0.0, 12.0, "no punctuation in this one at all")];

    let result = reflow(&segments, &options(0.8, 7.0));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].duration(), 12.0);
}

#[test]
fn test_reflow_split_shouldDropWordTimings() {
    let mut segment = seg(0.0, 10.0, "First sentence. Second sentence.");
    segment.words = vec![Word::new("First", 0.0, 1.0, 0.9)];

    let result = reflow(&[segment], &options(0.8, 7.0));

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|s| s.words.is_empty()));
}

#[test]
fn test_reflow_split_withOriginalText_shouldAssignPartToBothSides() {
    let mut segment = seg(0.0, 10.0, "First sentence. Second sentence.");
    segment.original_text = Some("whatever came before".to_string());

    let result = reflow(&[segment], &options(0.8, 7.0));

    assert_eq!(result.len(), 2);
    for child in &result {
        assert_eq!(child.original_text.as_deref(), Some(child.text.as_str()));
    }
}

#[test]
fn test_reflow_withMixedInput_shouldPreserveTotalDuration() {
    let segments = vec![
        seg(0.0, 4.0, "This is the first sentence."),
        seg(4.0, 4.3, "Yeah."),
        seg(4.3, 14.0, "Here is a very long sentence. And a second one right after it?"),
    ];
    let total: f64 = segments.iter().map(|s| s.duration()).sum();

    let result = reflow(&segments, &options(0.8, 7.0));

    let reflowed_total: f64 = result.iter().map(|s| s.duration()).sum();
    assert!((total - reflowed_total).abs() < 1e-9);
}

#[test]
fn test_reflow_withEmptyInput_shouldReturnEmpty() {
    let result = reflow(&[], &ReflowOptions::default());
    assert!(result.is_empty());
}
