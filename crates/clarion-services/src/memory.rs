//! Memory sink client.
//!
//! A durable, append-only home for derived records. Writes are keyed
//! upserts: storing the same id twice replaces the stored record, so
//! retries are safe. An absent sink is a feature being disabled, never an
//! error; every write path becomes a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clarion_types::{AgentId, MemoryId};

use crate::config::MemoryConfig;
use crate::error::ServiceError;

/// One derived record bound for durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Stable key; upserts with the same id replace the stored record.
    pub id: MemoryId,
    /// Agent the record is about, when any.
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    /// Short title.
    pub title: String,
    /// Record text.
    pub text: String,
    /// Tick the record describes.
    pub tick: u64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Embedding vector, when one was computed.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// A durable sink for derived records.
pub enum MemorySink {
    /// No sink configured; every write is a no-op.
    Disabled,
    /// Remote HTTP sink.
    Http(HttpSink),
}

impl MemorySink {
    /// Build the sink from an optional config block.
    pub fn from_config(config: Option<&MemoryConfig>) -> Self {
        config.map_or(Self::Disabled, |c| Self::Http(HttpSink::new(c)))
    }

    /// Whether a remote sink is configured.
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Idempotent keyed upsert. `Ok(())` no-op when disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] when the HTTP call fails.
    pub async fn upsert(&self, record: &MemoryRecord) -> Result<(), ServiceError> {
        match self {
            Self::Disabled => Ok(()),
            Self::Http(sink) => sink.upsert(record).await,
        }
    }
}

/// HTTP client for the memory sink endpoint.
///
/// Upserts with `PUT {url}/memories/{id}`.
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    /// Create a new HTTP sink client.
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
        }
    }

    async fn upsert(&self, record: &MemoryRecord) -> Result<(), ServiceError> {
        let url = format!("{}/memories/{}", self.url, record.id);

        let response = self
            .client
            .put(&url)
            .header("Content-Type", "application/json")
            .json(record)
            .send()
            .await
            .map_err(|e| ServiceError::Backend(format!("memory upsert failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ServiceError::Backend(format!(
                "memory sink returned {status}: {error_body}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_record() -> MemoryRecord {
        MemoryRecord {
            id: MemoryId::new("run-outcome-1"),
            agent_id: Some(AgentId::new("a1")),
            title: "Run outcome".to_owned(),
            text: "Stabilized at tick 74.".to_owned(),
            tick: 74,
            created_at: Utc::now(),
            embedding: None,
        }
    }

    #[tokio::test]
    async fn disabled_sink_upsert_is_a_no_op() {
        let sink = MemorySink::from_config(None);
        assert!(!sink.is_enabled());
        assert!(sink.upsert(&sample_record()).await.is_ok());
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"agentId\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"tick\":74"));
    }
}
