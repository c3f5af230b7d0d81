//! Analytic bundle payloads: conversation threads and message clusters.
//!
//! Produced by an upstream analysis pipeline at run end and consumed
//! read-only by the insight classifier. Every field beyond the keys is
//! optional on the wire; the bundle arrives in whatever state the pipeline
//! reached.

use serde::{Deserialize, Serialize};

use crate::enums::{BundleStatus, MessageKind, ThreadMood};
use crate::ids::{ClusterId, ThreadId};

/// Inclusive tick range a thread was active over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickWindow {
    /// First tick (inclusive).
    pub start: u64,
    /// Last tick (inclusive).
    pub end: u64,
}

/// One analyzed conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationThread {
    /// Producer-assigned thread key.
    pub id: ThreadId,
    /// Short topic title.
    #[serde(default)]
    pub title: String,
    /// Lead text: the opening or most representative message.
    #[serde(default)]
    pub lead: String,
    /// Mood classification over the thread window.
    #[serde(default)]
    pub mood: ThreadMood,
    /// Rumor contamination, 0 to 100.
    #[serde(default)]
    pub contamination: f64,
    /// Number of turns in the thread.
    #[serde(default)]
    pub turn_count: u32,
    /// Distinct participants.
    #[serde(default)]
    pub participant_count: u32,
    /// Dominant message kinds, most common first.
    #[serde(default)]
    pub dominant_types: Vec<MessageKind>,
    /// Tick at which the thread reversed away from escalation, when the
    /// analysis detected one.
    #[serde(default)]
    pub reversal_tick: Option<u64>,
    /// Active tick window, when known.
    #[serde(default)]
    pub window: Option<TickWindow>,
}

impl ConversationThread {
    /// Whether any of the given kinds appears among the dominant tags.
    pub fn has_dominant(&self, kinds: &[MessageKind]) -> bool {
        self.dominant_types.iter().any(|k| kinds.contains(k))
    }
}

/// One message cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Producer-assigned cluster key.
    pub id: ClusterId,
    /// Human-readable cluster label.
    #[serde(default)]
    pub label: String,
    /// Number of messages in the cluster.
    #[serde(default)]
    pub size: u32,
    /// Representative message text, when the analysis produced one.
    #[serde(default)]
    pub representative: Option<String>,
}

/// End-of-run analytic payload from the upstream analysis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticBundle {
    /// Pipeline status at the time the bundle was emitted.
    #[serde(default)]
    pub status: BundleStatus,
    /// Pipeline-supplied reason when the status is not `ready`.
    #[serde(default)]
    pub reason: Option<String>,
    /// Whether numeric rollups (contamination, stabilization) are
    /// trustworthy for this bundle.
    #[serde(default = "default_true")]
    pub metrics_available: bool,
    /// Analyzed conversation threads, producer order.
    #[serde(default)]
    pub threads: Vec<ConversationThread>,
    /// Message clusters, producer order.
    #[serde(default)]
    pub clusters: Vec<ClusterSummary>,
}

/// Serde default: bundles that omit the flag claim usable metrics.
const fn default_true() -> bool {
    true
}
