// src/joiner.rs

use crate::config::Thresholds;
use crate::fields::FieldKind;
use crate::spans::Span;
use regex::Regex;

/// Characters of source text inspected on each side of a composite when
/// restoring separators.
const RESTORE_WINDOW: usize = 5;

/// Merge qualifying spans of one field into a single composite value.
///
/// Spans at or below the confidence floor are discarded; if none
/// qualify the field yields nothing from the model side. Several
/// qualifying spans extend greedily from the lowest offset: a gap of at
/// most `join_gap` joins (with a space when the tokenizer had
/// interposed whitespace, i.e. gap > 1), and the first larger gap stops
/// the composite. Client names get a cluster check first: when the
/// first and last mention are more than `cluster_gap` apart they are
/// separate mentions, and only the last one (nearer the totals and
/// signature section) is kept.
pub fn join_spans(cands: &[Span], kind: FieldKind, th: &Thresholds) -> Option<String> {
    let mut good: Vec<&Span> = cands.iter().filter(|c| c.score > th.score_floor).collect();
    if good.is_empty() {
        return None;
    }
    if good.len() == 1 {
        return Some(good[0].text.clone());
    }

    good.sort_by_key(|c| c.start);

    if kind == FieldKind::ClientName {
        let first = good[0];
        let last = good[good.len() - 1];
        if last.start > first.end + th.cluster_gap {
            return Some(last.text.clone());
        }
    }

    let mut combined = good[0].text.clone();
    let mut last_end = good[0].end;
    for cand in &good[1..] {
        let gap = cand.start.saturating_sub(last_end);
        if gap > th.join_gap {
            break;
        }
        if gap > 1 {
            combined.push(' ');
        }
        combined.push_str(&cand.text);
        last_end = cand.end;
    }

    Some(combined.trim().to_string())
}

/// Reinsert a comma between two words of a composite when the original
/// text shows one in the vicinity — the tokenizer drops separators, so
/// the source text is the only place they survive.
pub fn restore_punctuation(text: &str, value: &str, start: usize, end: usize) -> String {
    let mut words: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if words.len() < 2 {
        return value.to_string();
    }

    let window = char_window(
        text,
        start.saturating_sub(RESTORE_WINDOW),
        end + RESTORE_WINDOW,
    );

    for i in 0..words.len() - 1 {
        let pattern = format!(
            "(?i){}([,\\-\\s]+){}",
            regex::escape(&words[i]),
            regex::escape(&words[i + 1])
        );
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if let Some(cap) = re.captures(window) {
            if cap[1].contains(',') {
                words[i].push(',');
            }
        }
    }

    words.join(" ")
}

/// Slice by character offsets, clamped to the text bounds.
fn char_window(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    &text[byte_at(start)..byte_at(end)]
}
