//! Reasoning service client.
//!
//! Asks an external reasoning backend to explain an agent's recent
//! behavior. Uses enum dispatch instead of trait objects because async
//! methods are not dyn-compatible. The remote call can fail; callers on
//! the presentation path use [`ReasoningService::explain_or_fallback`],
//! which degrades to a templated explanation built only from locally
//! tracked agent fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use clarion_types::{AgentId, EntityRecord};

use crate::config::ReasoningConfig;
use crate::error::ServiceError;

/// Stress level above which the fallback explanation reads as strained.
const STRESS_HEAVY: f64 = 70.0;

/// Stress level above which the fallback explanation notes pressure.
const STRESS_ELEVATED: f64 = 40.0;

// ---------------------------------------------------------------------------
// Request / Response Shapes
// ---------------------------------------------------------------------------

/// Request for an explanation of one agent's behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    /// Agent to explain.
    pub agent_id: AgentId,
    /// Recent timeline messages involving the agent, newest first.
    pub recent_events: Vec<String>,
    /// Tick the question refers to.
    pub tick: u64,
}

/// One supporting memory reference in an explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRef {
    /// Short title of the referenced memory.
    pub title: String,
    /// Memory text.
    pub text: String,
}

/// Explanation of an agent's behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentExplanation {
    /// Why the agent is behaving as observed, one short paragraph.
    pub why: String,
    /// Supporting memories, empty for fallback explanations.
    #[serde(default)]
    pub memory_refs: Vec<MemoryRef>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// A reasoning backend that can explain agent behavior.
pub enum ReasoningService {
    /// No backend configured; only the local fallback is available.
    Disabled,
    /// Remote HTTP backend.
    Remote(RemoteReasoner),
}

impl ReasoningService {
    /// Build the service from an optional config block.
    pub fn from_config(config: Option<&ReasoningConfig>) -> Self {
        config.map_or(Self::Disabled, |c| Self::Remote(RemoteReasoner::new(c)))
    }

    /// Whether a remote backend is configured.
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Remote(_) => "remote",
        }
    }

    /// Ask the backend to explain an agent.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Disabled`] when no backend is configured,
    /// [`ServiceError::Backend`] when the HTTP call fails or the response
    /// cannot be extracted.
    pub async fn explain(
        &self,
        request: &ExplainRequest,
    ) -> Result<AgentExplanation, ServiceError> {
        match self {
            Self::Disabled => Err(ServiceError::Disabled("reasoning")),
            Self::Remote(remote) => remote.explain(request).await,
        }
    }

    /// Explain an agent, degrading to the local templated explanation on
    /// any failure. Never errors.
    pub async fn explain_or_fallback(
        &self,
        request: &ExplainRequest,
        agent: &EntityRecord,
    ) -> AgentExplanation {
        self.explain(request).await.unwrap_or_else(|error| {
            debug!(
                agent_id = %request.agent_id,
                error = %error,
                "reasoning unavailable, using local fallback"
            );
            fallback_explanation(agent, request.tick)
        })
    }
}

// ---------------------------------------------------------------------------
// Remote Backend
// ---------------------------------------------------------------------------

/// HTTP client for the reasoning endpoint.
///
/// Sends requests to `{url}/explain` and expects a JSON object with `why`
/// and `memoryRefs`.
pub struct RemoteReasoner {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RemoteReasoner {
    /// Create a new remote reasoning client.
    pub fn new(config: &ReasoningConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        }
    }

    /// Send an explain request and extract the explanation.
    async fn explain(&self, request: &ExplainRequest) -> Result<AgentExplanation, ServiceError> {
        let url = format!("{}/explain", self.url);

        let mut builder = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ServiceError::Backend(format!("reasoning request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ServiceError::Backend(format!(
                "reasoning returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Backend(format!("reasoning response parse failed: {e}")))?;

        parse_explanation(&json)
    }
}

/// Extract an explanation from a reasoning response body.
///
/// `why` is required; `memoryRefs` is optional and entries missing either
/// field are skipped rather than failing the whole response.
fn parse_explanation(json: &serde_json::Value) -> Result<AgentExplanation, ServiceError> {
    let why = json
        .get("why")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| ServiceError::Backend("reasoning response missing why".to_owned()))?;

    let memory_refs = json
        .get("memoryRefs")
        .and_then(serde_json::Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter_map(|entry| {
                    let title = entry.get("title").and_then(serde_json::Value::as_str)?;
                    let text = entry.get("text").and_then(serde_json::Value::as_str)?;
                    Some(MemoryRef {
                        title: title.to_owned(),
                        text: text.to_owned(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(AgentExplanation { why, memory_refs })
}

// ---------------------------------------------------------------------------
// Local Fallback
// ---------------------------------------------------------------------------

/// Templated explanation built only from locally tracked agent fields.
///
/// Used whenever the remote backend is disabled or failing. Pure: reads
/// the record, touches nothing else.
pub fn fallback_explanation(agent: &EntityRecord, tick: u64) -> AgentExplanation {
    let name = agent
        .get_str("name")
        .or_else(|| agent.get_str("id"))
        .unwrap_or("this resident");

    let state_clause = agent.get_f64("stress").map_or_else(
        || String::from("is going about the day"),
        |stress| {
            if stress >= STRESS_HEAVY {
                format!("is under heavy stress (stress {stress:.0})")
            } else if stress >= STRESS_ELEVATED {
                format!("is feeling the pressure (stress {stress:.0})")
            } else {
                String::from("is going about the day calmly")
            }
        },
    );

    let place = agent
        .get_str("location")
        .or_else(|| agent.get_str("building"));
    let why = place.map_or_else(
        || format!("At tick {tick}, {name} {state_clause}."),
        |place| format!("At tick {tick}, {name} {state_clause} near {place}."),
    );

    AgentExplanation {
        why,
        memory_refs: Vec::new(),
    }
}
