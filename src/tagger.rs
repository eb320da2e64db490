// src/tagger.rs

use crate::fields::FieldKind;
use crate::spans::Span;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a tagging call produced no spans.
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("tagging request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("tagging service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// The span-tagging model, injected into the engine at construction.
///
/// Implementations return spans in text order, with character offsets
/// into the exact text passed in. Failure is an explicit outcome the
/// engine degrades on — it never aborts an extraction call.
#[async_trait]
pub trait SpanTagger: Send + Sync {
    async fn tag(&self, text: &str) -> Result<Vec<Span>, TaggerError>;
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    raw_entities: Vec<RawEntity>,
}

/// One span as the tagging service reports it.
#[derive(Debug, Deserialize)]
struct RawEntity {
    entity_group: String,
    word: String,
    start: usize,
    end: usize,
    score: f32,
}

/// Map wire entities onto typed spans. The service may emit labels
/// outside the handled set (addresses, tax ids, item descriptions);
/// those are dropped here.
fn spans_from_entities(entities: Vec<RawEntity>) -> Vec<Span> {
    let mut spans = Vec::with_capacity(entities.len());
    for entity in entities {
        match FieldKind::from_label(&entity.entity_group) {
            Some(field) => spans.push(Span {
                field,
                text: entity.word,
                start: entity.start,
                end: entity.end,
                score: entity.score,
            }),
            None => debug!(label = %entity.entity_group, "dropping span with unhandled label"),
        }
    }
    spans
}

/// HTTP client for a hosted token-classification service.
pub struct RemoteTagger {
    client: Client,
    base_url: String,
}

impl RemoteTagger {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TaggerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Check if the tagging service is reachable.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));

        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(3))
            .send()
            .await
        {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!("tagging service is reachable");
                    true
                } else {
                    warn!(status = %resp.status(), "tagging service returned non-OK status");
                    false
                }
            }
            Err(e) => {
                warn!(error = %e, "tagging service not reachable");
                false
            }
        }
    }
}

#[async_trait]
impl SpanTagger for RemoteTagger {
    async fn tag(&self, text: &str) -> Result<Vec<Span>, TaggerError> {
        let url = format!("{}/predict-text", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TaggerError::Status { status, body });
        }

        let predicted: PredictResponse = response.json().await?;
        debug!(spans = predicted.raw_entities.len(), "tagging service responded");
        Ok(spans_from_entities(predicted.raw_entities))
    }
}
