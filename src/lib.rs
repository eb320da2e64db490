//! invoice_extractor - structured field extraction from noisy invoice text
//!
//! Two independent sources feed a fusion engine:
//! - a probabilistic span-tagging model (external, injected via
//!   [`SpanTagger`]) that labels substrings with a field and a
//!   confidence score, but fragments multi-token values;
//! - a deterministic pattern extractor (`heuristics`) that is precise
//!   on well-formatted text but brittle to formatting drift.
//!
//! The engine re-glues fragmented sub-token spans, joins proximate
//! mentions into composites, restores punctuation the tokenizer
//! dropped, and arbitrates per field between the two sources. The sole
//! operation is [`Extractor::extract`]: text in, [`FieldMap`] out,
//! never an error — a missing field is simply absent and a failing
//! model degrades to pattern-only output.

pub mod config;
pub mod engine;
pub mod fields;
pub mod heuristics;
pub mod joiner;
pub mod spans;
pub mod tagger;

// Re-export main types at crate root for convenience
pub use config::{Config, TaggerBackend, Thresholds};
pub use engine::Extractor;
pub use fields::{FieldKind, FieldMap};
pub use spans::Span;
pub use tagger::{RemoteTagger, SpanTagger, TaggerError};
