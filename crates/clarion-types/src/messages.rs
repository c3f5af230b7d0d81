//! Producer feed messages.
//!
//! The producer streams one JSON object per message, internally tagged on
//! `kind`. Ordering within the stream is the producer's responsibility;
//! the session applies messages strictly in arrival order.

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticBundle;
use crate::enums::EndReason;
use crate::metrics::{HealthMetrics, MetricsSample};
use crate::timeline::TimelineEvent;
use crate::world::{WorldDiff, WorldSnapshot};

/// Resident breakdown reported at run end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PopulationBreakdown {
    /// Total residents in the scenario.
    pub total: u32,
    /// Residents holding the official account.
    pub informed: u32,
    /// Residents holding a rumor account.
    pub misinformed: u32,
    /// Residents in a panicked state at run end.
    pub panicked: u32,
    /// Residents tagged vulnerable by the scenario.
    pub vulnerable: u32,
    /// Vulnerable residents confirmed reached.
    pub vulnerable_reached: u32,
}

/// End-of-run payload streamed by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Final tick of the run.
    pub tick: u64,
    /// Wall-clock duration of the run in seconds.
    #[serde(default)]
    pub duration_seconds: u64,
    /// Simulated in-world minutes covered.
    #[serde(default)]
    pub simulated_minutes: u64,
    /// Why the run ended.
    pub end_reason: EndReason,
    /// Final gauge values.
    #[serde(default)]
    pub metrics: HealthMetrics,
    /// Resident breakdown at run end.
    #[serde(default)]
    pub population: PopulationBreakdown,
    /// Scenario name, when the producer reports one.
    #[serde(default)]
    pub scenario: Option<String>,
    /// Free-form context tags (hazard type, locale, variant).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Analytic bundle, when the upstream pipeline delivered one.
    #[serde(default)]
    pub analytics: Option<AnalyticBundle>,
}

/// One producer feed message.
///
/// The `end` payload is boxed: it is an order of magnitude larger than the
/// per-tick messages that make up almost all traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeedMessage {
    /// Full world snapshot; replaces all merged state.
    Init(WorldSnapshot),
    /// Tick-scoped field patches.
    Diff(WorldDiff),
    /// One timeline event.
    Event(TimelineEvent),
    /// One metrics interval.
    Metrics(MetricsSample),
    /// End of run.
    End(Box<RunSummary>),
}
