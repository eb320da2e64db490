// src/engine.rs

use crate::config::Thresholds;
use crate::fields::{FieldKind, FieldMap, Strategy};
use crate::heuristics::{self, PatternFields};
use crate::joiner;
use crate::spans::{self, Span, strip_markers};
use crate::tagger::SpanTagger;
use tracing::{debug, warn};

/// A pattern-extracted date this long is plausibly a full date and wins
/// outright.
const MIN_PATTERN_DATE_LEN: usize = 8;

/// Minimum length for a date reconstructed from model fragments.
const MIN_MODEL_DATE_LEN: usize = 6;

/// The fusion engine: reconciles tagging-model spans and pattern
/// matches into one field map per call.
///
/// Stateless across calls and lock-free; safe to share across tasks as
/// long as the injected tagger is.
pub struct Extractor {
    tagger: Option<Box<dyn SpanTagger>>,
    thresholds: Thresholds,
}

impl Extractor {
    pub fn new(tagger: Option<Box<dyn SpanTagger>>, thresholds: Thresholds) -> Self {
        Self { tagger, thresholds }
    }

    /// Pattern extraction only, no model.
    pub fn heuristics_only() -> Self {
        Self::new(None, Thresholds::default())
    }

    /// Extract structured fields from raw invoice text.
    ///
    /// Never fails: a tagging-model failure degrades to pattern-only
    /// output, a field with no confident candidate is simply absent,
    /// and empty text yields an empty map.
    pub async fn extract(&self, text: &str) -> FieldMap {
        let raw = match &self.tagger {
            Some(tagger) => match tagger.tag(text).await {
                Ok(spans) => spans,
                Err(e) => {
                    warn!(
                        error = %e,
                        "tagging model unavailable — continuing with pattern extraction only"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let merged = spans::merge_fragments(raw, self.thresholds.fragment_gap);
        let by_field = spans::group_by_field(merged);
        let patterns = heuristics::extract(text);

        let mut out = FieldMap::default();
        for kind in FieldKind::ALL {
            let cands = by_field.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
            match self.arbitrate(kind, cands, &patterns) {
                Some(value) => {
                    debug!(field = %kind, value = %value, "field resolved");
                    out.insert(kind, value);
                }
                None => debug!(field = %kind, "no confident candidate from either source"),
            }
        }

        // Names lose separators in tokenization; repair from the source
        // text around wherever the model saw the mention.
        for kind in FieldKind::ALL.into_iter().filter(|k| k.name_like()) {
            let Some(cands) = by_field.get(&kind) else {
                continue;
            };
            let (Some(value), Some(start), Some(end)) = (
                out.get(kind),
                cands.iter().map(|c| c.start).min(),
                cands.iter().map(|c| c.end).max(),
            ) else {
                continue;
            };
            let restored = joiner::restore_punctuation(text, value, start, end);
            out.insert(kind, restored);
        }

        out
    }

    /// The per-field decision table. Sources are evaluated
    /// independently: a pattern miss never blocks model output and vice
    /// versa.
    fn arbitrate(
        &self,
        kind: FieldKind,
        cands: &[Span],
        patterns: &PatternFields,
    ) -> Option<String> {
        let pattern = patterns.get(kind);
        match kind.strategy() {
            Strategy::NumericBestOf => self.numeric_best_of(cands, pattern),
            Strategy::DatePreferPattern => date_prefer_pattern(cands, pattern),
            Strategy::TotalPreferPattern => total_prefer_pattern(cands, pattern),
            Strategy::GenericJoin => joiner::join_spans(cands, kind, &self.thresholds)
                .or_else(|| pattern.map(str::to_string)),
        }
    }

    fn numeric_best_of(&self, cands: &[Span], pattern: Option<&str>) -> Option<String> {
        let best = cands
            .iter()
            .filter(|c| {
                let digits = strip_markers(&c.text).replace(' ', "");
                !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit())
            })
            .max_by(|a, b| a.score.total_cmp(&b.score));

        match best {
            Some(c) if c.score > self.thresholds.score_floor => {
                Some(strip_markers(&c.text).replace(' ', ""))
            }
            _ => pattern.map(str::to_string),
        }
    }
}

fn date_prefer_pattern(cands: &[Span], pattern: Option<&str>) -> Option<String> {
    if let Some(date) = pattern {
        if date.chars().count() >= MIN_PATTERN_DATE_LEN {
            return Some(date.to_string());
        }
    }
    if cands.is_empty() {
        return None;
    }
    let reconstructed: String = cands.iter().map(|c| c.text.as_str()).collect();
    (reconstructed.chars().count() >= MIN_MODEL_DATE_LEN).then_some(reconstructed)
}

fn total_prefer_pattern(cands: &[Span], pattern: Option<&str>) -> Option<String> {
    if let Some(total) = pattern {
        return Some(total.to_string());
    }
    cands
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|c| c.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(field: FieldKind, text: &str, start: usize, end: usize, score: f32) -> Span {
        Span {
            field,
            text: text.to_string(),
            start,
            end,
            score,
        }
    }

    #[test]
    fn numeric_rejects_non_digit_candidates() {
        let ex = Extractor::heuristics_only();
        let cands = [
            span(FieldKind::InvoiceNumber, "no 123", 0, 6, 0.99),
            span(FieldKind::InvoiceNumber, "4567", 10, 14, 0.85),
        ];
        assert_eq!(ex.numeric_best_of(&cands, None), Some("4567".to_string()));
    }

    #[test]
    fn numeric_below_floor_falls_back_to_pattern() {
        let ex = Extractor::heuristics_only();
        let cands = [span(FieldKind::InvoiceNumber, "4567", 10, 14, 0.5)];
        assert_eq!(
            ex.numeric_best_of(&cands, Some("8888")),
            Some("8888".to_string())
        );
        assert_eq!(ex.numeric_best_of(&cands, None), None);
    }

    #[test]
    fn numeric_strips_markers_and_spaces() {
        let ex = Extractor::heuristics_only();
        let cands = [span(FieldKind::InvoiceNumber, "##12 345", 0, 8, 0.95)];
        assert_eq!(ex.numeric_best_of(&cands, None), Some("12345".to_string()));
    }

    #[test]
    fn short_pattern_date_yields_to_model_reconstruction() {
        let cands = [
            span(FieldKind::InvoiceDate, "12/06", 5, 10, 0.7),
            span(FieldKind::InvoiceDate, "/2025", 10, 15, 0.7),
        ];
        assert_eq!(
            date_prefer_pattern(&cands, Some("12/06/2025")),
            Some("12/06/2025".to_string())
        );
        assert_eq!(
            date_prefer_pattern(&cands, Some("12/06")),
            Some("12/06/2025".to_string())
        );
    }

    #[test]
    fn too_short_date_reconstruction_is_omitted() {
        let cands = [span(FieldKind::InvoiceDate, "2025", 5, 9, 0.7)];
        assert_eq!(date_prefer_pattern(&cands, None), None);
        assert_eq!(date_prefer_pattern(&[], None), None);
    }

    #[test]
    fn total_always_prefers_pattern() {
        let cands = [span(FieldKind::Total, "999,99", 0, 6, 0.99)];
        assert_eq!(
            total_prefer_pattern(&cands, Some("120,00")),
            Some("120,00".to_string())
        );
        assert_eq!(
            total_prefer_pattern(&cands, None),
            Some("999,99".to_string())
        );
        assert_eq!(total_prefer_pattern(&[], None), None);
    }
}
