//! Derived end-of-run summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticBundle;
use crate::enums::{EndReason, EventCategory, Gauge};
use crate::ids::RunId;
use crate::messages::PopulationBreakdown;
use crate::metrics::{HealthMetrics, Peak};

/// Immutable end-of-run record: the producer's final payload joined with
/// locally tracked peaks and per-category event counts.
///
/// Assembled exactly once per run, when the `end` message arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSummary {
    /// Run this summary describes.
    pub run_id: RunId,
    /// Final tick.
    pub tick: u64,
    /// Wall-clock duration in seconds.
    pub duration_seconds: u64,
    /// Simulated in-world minutes covered.
    pub simulated_minutes: u64,
    /// Why the run ended.
    pub end_reason: EndReason,
    /// Final gauge values.
    pub metrics: HealthMetrics,
    /// Highest observed value per gauge across the run.
    pub peaks: BTreeMap<Gauge, Peak>,
    /// Total events seen per category, counting evicted ones.
    pub event_counts: BTreeMap<EventCategory, u64>,
    /// Resident breakdown at run end.
    pub population: PopulationBreakdown,
    /// Scenario name, when reported.
    pub scenario: Option<String>,
    /// Free-form context tags.
    pub tags: Vec<String>,
    /// Analytic bundle, when delivered.
    pub analytics: Option<AnalyticBundle>,
}
