//! Embedding service client with a rate-limit cooldown gate.
//!
//! The embedding backend is optional enrichment: when it is disabled,
//! cooling down after a rate limit, or answering 429, calls resolve to
//! `Ok(None)` (or an empty neighbor list) and the core carries on. Only
//! hard failures surface as errors. The cooldown is process-wide state
//! scoped to this client, held in an explicit [`CooldownGate`] so tests
//! can drive it with synthetic instants.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use clarion_types::MemoryId;

use crate::config::EmbeddingConfig;
use crate::error::ServiceError;

/// Minimum spacing between cooldown skip log lines.
const NOTE_INTERVAL: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Cooldown Gate
// ---------------------------------------------------------------------------

/// Time-boxed suppression of embedding calls after a rate-limit response.
///
/// All methods take the current instant as a parameter; the service passes
/// `Instant::now()`, tests pass synthetic values.
#[derive(Debug, Default)]
pub struct CooldownGate {
    until: Option<Instant>,
    last_note: Option<Instant>,
}

impl CooldownGate {
    /// A gate with no active window.
    pub const fn new() -> Self {
        Self {
            until: None,
            last_note: None,
        }
    }

    /// Start (or restart) the cooldown window from `now`.
    pub fn trip(&mut self, now: Instant, cooldown: Duration) {
        self.until = now.checked_add(cooldown);
    }

    /// Whether calls should be skipped at `now`.
    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Whether a skipped call is worth logging. True at most once per
    /// [`NOTE_INTERVAL`]; marks the note as spent.
    pub fn should_note(&mut self, now: Instant) -> bool {
        let due = self
            .last_note
            .is_none_or(|last| now.saturating_duration_since(last) >= NOTE_INTERVAL);
        if due {
            self.last_note = Some(now);
        }
        due
    }

    /// Clear the window and the note state.
    pub fn reset(&mut self) {
        self.until = None;
        self.last_note = None;
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// One nearest-neighbor hit from the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Key of the stored memory.
    pub id: MemoryId,
    /// Distance from the query; smaller is closer.
    pub distance: f32,
}

/// An embedding backend that can vectorize text and query neighbors.
pub enum EmbeddingService {
    /// No backend configured; every call is a quiet no-op.
    Disabled,
    /// Remote HTTP backend.
    Remote(RemoteEmbedder),
}

impl EmbeddingService {
    /// Build the service from an optional config block.
    pub fn from_config(config: Option<&EmbeddingConfig>) -> Self {
        config.map_or(Self::Disabled, |c| Self::Remote(RemoteEmbedder::new(c)))
    }

    /// Whether a remote backend is configured.
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Vectorize a piece of text.
    ///
    /// `Ok(None)` when the service is disabled, the cooldown gate is
    /// active, or the backend answered 429 (which trips the gate).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] on any other failure.
    pub async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, ServiceError> {
        match self {
            Self::Disabled => Ok(None),
            Self::Remote(remote) => remote.embed(text).await,
        }
    }

    /// Query the `k` nearest stored memories for a piece of text.
    ///
    /// Empty when the service is disabled or cooling down.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] on any non-rate-limit failure.
    pub async fn neighbors(&self, text: &str, k: usize) -> Result<Vec<Neighbor>, ServiceError> {
        match self {
            Self::Disabled => Ok(Vec::new()),
            Self::Remote(remote) => remote.neighbors(text, k).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Remote Backend
// ---------------------------------------------------------------------------

/// HTTP client for the embedding endpoint.
///
/// Sends requests to `{url}/embed` and `{url}/neighbors`.
pub struct RemoteEmbedder {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    cooldown: Duration,
    gate: Mutex<CooldownGate>,
}

impl RemoteEmbedder {
    /// Create a new remote embedding client with an open gate.
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            cooldown: config.cooldown,
            gate: Mutex::new(CooldownGate::new()),
        }
    }

    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, ServiceError> {
        if self.cooling("embed").await {
            return Ok(None);
        }

        let body = serde_json::json!({ "text": text });
        let response = self.post("embed", &body).await?;
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            self.trip_gate().await;
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ServiceError::Backend(format!(
                "embedding returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Backend(format!("embedding response parse failed: {e}")))?;
        parse_embedding(&json).map(Some)
    }

    async fn neighbors(&self, text: &str, k: usize) -> Result<Vec<Neighbor>, ServiceError> {
        if self.cooling("neighbors").await {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({ "text": text, "k": k });
        let response = self.post("neighbors", &body).await?;
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            self.trip_gate().await;
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ServiceError::Backend(format!(
                "neighbor query returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Backend(format!("neighbor response parse failed: {e}")))?;
        parse_neighbors(&json)
    }

    /// Whether the gate is active right now; logs the skip at most once
    /// per note interval.
    async fn cooling(&self, operation: &'static str) -> bool {
        let now = Instant::now();
        let mut gate = self.gate.lock().await;
        if !gate.is_active(now) {
            return false;
        }
        if gate.should_note(now) {
            debug!(operation = operation, "embedding cooldown active, skipping call");
        }
        true
    }

    async fn trip_gate(&self) {
        let mut gate = self.gate.lock().await;
        gate.trip(Instant::now(), self.cooldown);
        warn!(
            cooldown_secs = self.cooldown.as_secs(),
            "embedding backend rate limited, cooling down"
        );
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ServiceError> {
        let url = format!("{}/{path}", self.url);
        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        builder
            .send()
            .await
            .map_err(|e| ServiceError::Backend(format!("embedding request failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Response Parsing
// ---------------------------------------------------------------------------

/// Extract the vector from an embedding response body.
#[allow(clippy::cast_possible_truncation)]
fn parse_embedding(json: &serde_json::Value) -> Result<Vec<f32>, ServiceError> {
    json.get("embedding")
        .and_then(serde_json::Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(serde_json::Value::as_f64)
                .map(|v| v as f32)
                .collect()
        })
        .ok_or_else(|| ServiceError::Backend("embedding response missing embedding".to_owned()))
}

/// Extract and rank neighbors from a neighbor query response body.
///
/// Entries missing either field are skipped; survivors are sorted by
/// distance ascending.
fn parse_neighbors(json: &serde_json::Value) -> Result<Vec<Neighbor>, ServiceError> {
    let mut neighbors: Vec<Neighbor> = json
        .get("neighbors")
        .and_then(serde_json::Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let id = entry.get("id").and_then(serde_json::Value::as_str)?;
                    let distance = entry.get("distance").and_then(serde_json::Value::as_f64)?;
                    #[allow(clippy::cast_possible_truncation)]
                    let distance = distance as f32;
                    Some(Neighbor {
                        id: MemoryId::new(id),
                        distance,
                    })
                })
                .collect()
        })
        .ok_or_else(|| ServiceError::Backend("neighbor response missing neighbors".to_owned()))?;

    neighbors.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(core::cmp::Ordering::Equal)
    });
    Ok(neighbors)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn gate_trips_and_expires() {
        let mut gate = CooldownGate::new();
        let start = Instant::now();
        assert!(!gate.is_active(start));

        gate.trip(start, Duration::from_secs(30));
        let during = start.checked_add(Duration::from_secs(29)).unwrap();
        assert!(gate.is_active(during));

        let after = start.checked_add(Duration::from_secs(31)).unwrap();
        assert!(!gate.is_active(after));
    }

    #[test]
    fn gate_notes_at_most_once_per_interval() {
        let mut gate = CooldownGate::new();
        let start = Instant::now();
        assert!(gate.should_note(start));
        assert!(!gate.should_note(start));

        let later = start.checked_add(Duration::from_secs(61)).unwrap();
        assert!(gate.should_note(later));
    }

    #[test]
    fn gate_reset_clears_the_window() {
        let mut gate = CooldownGate::new();
        let start = Instant::now();
        gate.trip(start, Duration::from_secs(600));
        assert!(gate.is_active(start));

        gate.reset();
        assert!(!gate.is_active(start));
    }

    #[tokio::test]
    async fn disabled_service_skips_quietly() {
        let service = EmbeddingService::from_config(None);
        assert!(!service.is_enabled());
        assert_eq!(service.embed("hello").await.ok(), Some(None));
        let neighbors = service.neighbors("hello", 3).await.unwrap();
        assert!(neighbors.is_empty());
    }

    #[test]
    fn parse_embedding_extracts_vector() {
        let json = serde_json::json!({"embedding": [0.25, -0.5, 1.0]});
        let vector = parse_embedding(&json).unwrap();
        assert_eq!(vector.len(), 3);
        assert!((vector.first().copied().unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn parse_embedding_missing_field_is_an_error() {
        let json = serde_json::json!({"status": "ok"});
        assert!(parse_embedding(&json).is_err());
    }

    #[test]
    fn parse_neighbors_ranks_by_distance() {
        let json = serde_json::json!({
            "neighbors": [
                {"id": "m-far", "distance": 0.9},
                {"id": "m-near", "distance": 0.1},
                {"id": "malformed"},
                {"id": "m-mid", "distance": 0.4}
            ]
        });
        let neighbors = parse_neighbors(&json).unwrap();
        let ids: Vec<&str> = neighbors.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["m-near", "m-mid", "m-far"]);
    }
}
