// src/spans.rs

use crate::fields::FieldKind;
use std::collections::BTreeMap;

/// One mention detected by the tagging model: a labeled substring with
/// character offsets into the source text and a confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub field: FieldKind,
    /// Substring as emitted by the tokenizer, possibly a sub-token
    /// fragment carrying `##` continuation markers.
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Confidence in [0, 1].
    pub score: f32,
}

/// Drop the tokenizer's `##` continuation markers.
pub fn strip_markers(text: &str) -> String {
    text.replace("##", "")
}

/// Merge consecutive sub-token fragments of the same fragment-prone
/// field back into single spans.
///
/// A following span is absorbed while it starts at or before the
/// current span's end plus `fragment_gap` characters, which tolerates
/// OCR drift without pulling in unrelated nearby spans. Scores average
/// with equal weight per absorbed fragment. Fields outside the
/// fragment-prone set pass through unchanged.
pub fn merge_fragments(mut spans: Vec<Span>, fragment_gap: usize) -> Vec<Span> {
    spans.sort_by_key(|s| s.start);

    let mut merged = Vec::with_capacity(spans.len());
    let mut i = 0;
    while i < spans.len() {
        let span = &spans[i];
        if !span.field.fragment_prone() {
            merged.push(span.clone());
            i += 1;
            continue;
        }

        let mut text = strip_markers(&span.text);
        let mut end = span.end;
        let mut score_sum = span.score;
        let mut count = 1usize;

        let mut j = i + 1;
        while j < spans.len() {
            let next = &spans[j];
            if next.field == span.field && next.start <= end + fragment_gap {
                text.push_str(&strip_markers(&next.text));
                end = next.end;
                score_sum += next.score;
                count += 1;
                j += 1;
            } else {
                break;
            }
        }

        merged.push(Span {
            field: span.field,
            text,
            start: span.start,
            end,
            score: score_sum / count as f32,
        });
        i = j;
    }

    merged
}

/// Group spans by field, each list sorted by ascending start offset.
pub fn group_by_field(spans: Vec<Span>) -> BTreeMap<FieldKind, Vec<Span>> {
    let mut grouped: BTreeMap<FieldKind, Vec<Span>> = BTreeMap::new();
    for span in spans {
        grouped.entry(span.field).or_default().push(span);
    }
    for list in grouped.values_mut() {
        list.sort_by_key(|s| s.start);
    }
    grouped
}
