//! Fixed targets and the threshold check table.
//!
//! Every number here is part of the evaluation contract with the
//! presentation layer. The nearly-there pair is a tuned heuristic rather
//! than a derived constant; treat it as adjustable, everything else as
//! fixed.

use serde::{Deserialize, Serialize};

use clarion_types::Gauge;

// ---------------------------------------------------------------------------
// Check Targets
// ---------------------------------------------------------------------------

/// Minimum share of residents reached by official messaging.
pub const OFFICIAL_REACH_MIN: f64 = 65.0;

/// Minimum share of vulnerable residents reached.
pub const VULNERABLE_REACH_MIN: f64 = 55.0;

/// Maximum tolerated confusion.
pub const CONFUSION_MAX: f64 = 40.0;

/// Maximum tolerated rumor spread.
pub const RUMOR_SPREAD_MAX: f64 = 32.0;

/// Maximum tolerated panic.
pub const PANIC_INDEX_MAX: f64 = 45.0;

/// Minimum trust in official channels.
pub const TRUST_INDEX_MIN: f64 = 55.0;

/// Maximum tolerated misinformation belief.
pub const MISINFO_BELIEF_MAX: f64 = 30.0;

/// Maximum tolerated resource misallocation.
pub const RESOURCE_MISALLOCATION_MAX: f64 = 40.0;

/// Minimum overall stability score.
pub const STABILITY_SCORE_MIN: f64 = 65.0;

// ---------------------------------------------------------------------------
// Classifier Thresholds
// ---------------------------------------------------------------------------

/// Thread contamination at or above this level is a rumor signal.
pub const CONTAMINATION_CONCERN: f64 = 50.0;

/// A thread cannot count as resolved at or above this contamination.
pub const CONTAMINATION_RESOLVED_MAX: f64 = 60.0;

/// Concern lines at or above this contamination are tagged rumor-dominant.
pub const CONTAMINATION_DOMINANT: f64 = 60.0;

/// Run-level rumor score that triggers the fact-check hint.
pub const RUMOR_SCORE_ALERT: u8 = 60;

/// Stabilization rate treated as a healthy trajectory.
pub const STABILIZATION_HEALTHY: u8 = 50;

// ---------------------------------------------------------------------------
// Nearly-There Heuristic (tunable)
// ---------------------------------------------------------------------------

/// Most failing checks a run may have and still read as nearly there.
pub const NEARLY_THERE_MAX_FAILING: usize = 2;

/// Largest stability shortfall a run may have and still read as nearly
/// there.
pub const NEARLY_THERE_STABILITY_GAP: f64 = 8.0;

// ---------------------------------------------------------------------------
// Check Table
// ---------------------------------------------------------------------------

/// Which side of the target a gauge must land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckDirection {
    /// The gauge must be at or above the target.
    AtLeast,
    /// The gauge must be at or below the target.
    AtMost,
}

/// Aggregate gap family used for time-limit diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapGroup {
    /// Reach and clarity of official messaging.
    Communication,
    /// Rumor spread and belief.
    Rumor,
    /// Trust in officials and the panic it holds back.
    Trust,
    /// Relief logistics.
    Operations,
}

impl GapGroup {
    /// All groups, in tie-break order. Declaration order decides ties on
    /// the dominant gap.
    pub const ALL: [Self; 4] = [
        Self::Communication,
        Self::Rumor,
        Self::Trust,
        Self::Operations,
    ];

    /// Wire spelling of the group.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Communication => "communication",
            Self::Rumor => "rumor",
            Self::Trust => "trust",
            Self::Operations => "operations",
        }
    }
}

/// Specification of one pass/fail check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckSpec {
    /// Gauge under test.
    pub gauge: Gauge,
    /// Side of the target the gauge must land on.
    pub direction: CheckDirection,
    /// Target value.
    pub target: f64,
    /// Gap family the check's shortfall/excess feeds. The stability check
    /// feeds none; it gates the nearly-there special case instead.
    pub group: Option<GapGroup>,
}

/// The nine checks, in report order.
pub const CHECKS: [CheckSpec; 9] = [
    CheckSpec {
        gauge: Gauge::OfficialReach,
        direction: CheckDirection::AtLeast,
        target: OFFICIAL_REACH_MIN,
        group: Some(GapGroup::Communication),
    },
    CheckSpec {
        gauge: Gauge::VulnerableReach,
        direction: CheckDirection::AtLeast,
        target: VULNERABLE_REACH_MIN,
        group: Some(GapGroup::Communication),
    },
    CheckSpec {
        gauge: Gauge::Confusion,
        direction: CheckDirection::AtMost,
        target: CONFUSION_MAX,
        group: Some(GapGroup::Communication),
    },
    CheckSpec {
        gauge: Gauge::RumorSpread,
        direction: CheckDirection::AtMost,
        target: RUMOR_SPREAD_MAX,
        group: Some(GapGroup::Rumor),
    },
    CheckSpec {
        gauge: Gauge::PanicIndex,
        direction: CheckDirection::AtMost,
        target: PANIC_INDEX_MAX,
        group: Some(GapGroup::Trust),
    },
    CheckSpec {
        gauge: Gauge::TrustIndex,
        direction: CheckDirection::AtLeast,
        target: TRUST_INDEX_MIN,
        group: Some(GapGroup::Trust),
    },
    CheckSpec {
        gauge: Gauge::MisinfoBelief,
        direction: CheckDirection::AtMost,
        target: MISINFO_BELIEF_MAX,
        group: Some(GapGroup::Rumor),
    },
    CheckSpec {
        gauge: Gauge::ResourceMisallocation,
        direction: CheckDirection::AtMost,
        target: RESOURCE_MISALLOCATION_MAX,
        group: Some(GapGroup::Operations),
    },
    CheckSpec {
        gauge: Gauge::StabilityScore,
        direction: CheckDirection::AtLeast,
        target: STABILITY_SCORE_MIN,
        group: None,
    },
];
