// src/config.rs

use serde::Deserialize;
use std::{fs, path::Path};

/// Sub-token fragments merge while the next span starts within this
/// many characters of the current span's end.
pub const FRAGMENT_GAP: usize = 2;

/// Same-field spans join into one composite while the gap between them
/// stays within this many characters.
pub const JOIN_GAP: usize = 20;

/// Client-name mentions further apart than this are treated as separate
/// mentions of the document; only the last one is kept.
pub const CLUSTER_GAP: usize = 50;

/// Model candidates at or below this confidence are discarded.
pub const SCORE_FLOOR: f32 = 0.8;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tagger: TaggerSection,
    pub thresholds: Thresholds,
}

/// Which span source backs the model side of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggerBackend {
    /// Remote span-tagging service over HTTP.
    Remote,
    /// No model; pattern extraction only.
    #[default]
    Heuristics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaggerSection {
    pub backend: TaggerBackend,
    pub remote: RemoteSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// The fusion engine's proximity and confidence constants, overridable
/// through `[thresholds]`. The defaults are the original tuned values;
/// no documented derivation exists for them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub fragment_gap: usize,
    pub join_gap: usize,
    pub cluster_gap: usize,
    pub score_floor: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fragment_gap: FRAGMENT_GAP,
            join_gap: JOIN_GAP,
            cluster_gap: CLUSTER_GAP,
            score_floor: SCORE_FLOOR,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.tagger.backend, TaggerBackend::Heuristics);
        assert_eq!(cfg.thresholds.join_gap, JOIN_GAP);
        assert_eq!(cfg.thresholds.score_floor, SCORE_FLOOR);
    }

    #[test]
    fn thresholds_are_overridable() {
        let cfg: Config = toml::from_str(
            r#"
            [tagger]
            backend = "remote"

            [tagger.remote]
            base_url = "http://tagger:9000"

            [thresholds]
            join_gap = 10
            "#,
        )
        .unwrap();

        assert_eq!(cfg.tagger.backend, TaggerBackend::Remote);
        assert_eq!(cfg.tagger.remote.base_url, "http://tagger:9000");
        assert_eq!(cfg.thresholds.join_gap, 10);
        // untouched values keep their defaults
        assert_eq!(cfg.thresholds.cluster_gap, CLUSTER_GAP);
    }
}
