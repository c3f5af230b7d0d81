//! Outcome evaluation: score, grade, target checks, and failure diagnosis.
//!
//! Pure function of the end-of-run summary. The score is the effective
//! stability (producer value when reported, composite otherwise); the nine
//! target checks compare final gauges against fixed thresholds; the
//! diagnosis names the dominant failure pattern for runs that fell short.

use serde::{Deserialize, Serialize};

use clarion_types::{EndReason, Gauge, Grade, HealthMetrics, OutcomeSummary};

use crate::targets::{
    CHECKS, CheckDirection, CheckSpec, GapGroup, NEARLY_THERE_MAX_FAILING,
    NEARLY_THERE_STABILITY_GAP,
};

// ---------------------------------------------------------------------------
// Report Shapes
// ---------------------------------------------------------------------------

/// One threshold check against a final gauge value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Gauge the check reads.
    pub gauge: Gauge,
    /// Which side of the target counts as passing.
    pub direction: CheckDirection,
    /// Threshold value.
    pub target: f64,
    /// Final gauge value the check saw.
    pub value: f64,
    /// Whether the target was met. Values exactly at the target pass.
    pub passed: bool,
    /// Distance from the target on the failing side, zero when passed.
    pub gap: f64,
}

impl CheckResult {
    /// Gap group this check feeds, when it participates in diagnosis.
    pub fn group(&self) -> Option<GapGroup> {
        CHECKS
            .iter()
            .find(|spec| spec.gauge == self.gauge)
            .and_then(|spec| spec.group)
    }

    fn run(spec: &CheckSpec, metrics: &HealthMetrics) -> Self {
        let value = metrics.gauge(spec.gauge);
        let (passed, gap) = match spec.direction {
            CheckDirection::AtLeast => (value >= spec.target, (spec.target - value).max(0.0)),
            CheckDirection::AtMost => (value <= spec.target, (value - spec.target).max(0.0)),
        };
        Self {
            gauge: spec.gauge,
            direction: spec.direction,
            target: spec.target,
            value,
            passed,
            gap,
        }
    }
}

/// Accumulated shortfall of one gap group over its failing checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapScore {
    /// The group.
    pub group: GapGroup,
    /// Sum of the gaps of the group's failing checks.
    pub total: f64,
}

/// Named failure pattern with a one-line explanation and one tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// Stable pattern key.
    pub pattern: String,
    /// What went wrong, in one sentence.
    pub description: String,
    /// What to change next run, in one sentence.
    pub tip: String,
}

impl Diagnosis {
    fn new(pattern: &str, description: &str, tip: &str) -> Self {
        Self {
            pattern: pattern.to_owned(),
            description: description.to_owned(),
            tip: tip.to_owned(),
        }
    }
}

/// Evaluated outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeReport {
    /// Effective stability, rounded to a whole score.
    pub score: u8,
    /// Letter grade for the score.
    pub grade: Grade,
    /// All nine target checks, threshold-table order.
    pub checks: Vec<CheckResult>,
    /// Number of failing checks.
    pub failing: usize,
    /// Per-group shortfall totals, fixed group order.
    pub gaps: Vec<GapScore>,
    /// Failure pattern, absent for stabilized runs.
    pub diagnosis: Option<Diagnosis>,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate a completed run into an [`OutcomeReport`].
///
/// Deterministic: equal summaries produce equal reports.
pub fn evaluate(summary: &OutcomeSummary) -> OutcomeReport {
    let metrics = &summary.metrics;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = metrics.effective_stability().round().clamp(0.0, 100.0) as u8;
    let grade = Grade::for_score(score);

    let checks: Vec<CheckResult> = CHECKS
        .iter()
        .map(|spec| CheckResult::run(spec, metrics))
        .collect();
    let failing = checks.iter().filter(|c| !c.passed).count();
    let gaps = group_gaps(&checks);
    let diagnosis = diagnose(summary.end_reason, failing, &checks, &gaps);

    OutcomeReport {
        score,
        grade,
        checks,
        failing,
        gaps,
        diagnosis,
    }
}

/// Sum failing-check gaps into the four groups, fixed group order. Checks
/// outside every group (the stability check) are excluded.
fn group_gaps(checks: &[CheckResult]) -> Vec<GapScore> {
    GapGroup::ALL
        .iter()
        .map(|&group| {
            let total = checks
                .iter()
                .filter(|c| !c.passed && c.group() == Some(group))
                .map(|c| c.gap)
                .sum();
            GapScore { group, total }
        })
        .collect()
}

/// Group with the largest shortfall; earlier groups win ties.
fn dominant_group(gaps: &[GapScore]) -> GapGroup {
    let mut winner: Option<&GapScore> = None;
    for gap in gaps {
        if winner.is_none_or(|w| gap.total > w.total) {
            winner = Some(gap);
        }
    }
    winner.map_or(GapGroup::Communication, |g| g.group)
}

/// Whether a time-limit run counts as a near miss: few failing checks and
/// stability within close reach of its target.
fn nearly_there(failing: usize, checks: &[CheckResult]) -> bool {
    if failing > NEARLY_THERE_MAX_FAILING {
        return false;
    }
    let stability_gap = checks
        .iter()
        .find(|c| c.gauge == Gauge::StabilityScore)
        .map_or(f64::INFINITY, |c| c.gap);
    stability_gap <= NEARLY_THERE_STABILITY_GAP
}

fn diagnose(
    end_reason: EndReason,
    failing: usize,
    checks: &[CheckResult],
    gaps: &[GapScore],
) -> Option<Diagnosis> {
    match end_reason {
        EndReason::Stabilized => None,
        EndReason::Escalated => Some(Diagnosis::new(
            "escalation-spiral",
            "Panic or misinformation crossed the abort thresholds before stabilization.",
            "Intervene earlier: alert plus routing in the first phase of the next run.",
        )),
        EndReason::TimeLimit => {
            if nearly_there(failing, checks) {
                return Some(Diagnosis::new(
                    "nearly-there",
                    "The response was close: most targets met and stability within reach.",
                    "Hold the plan and close the last small gaps.",
                ));
            }
            let (pattern, description, tip) = group_advice(dominant_group(gaps));
            Some(Diagnosis::new(pattern, description, tip))
        }
    }
}

/// Fixed advice triple per gap group.
const fn group_advice(group: GapGroup) -> (&'static str, &'static str, &'static str) {
    match group {
        GapGroup::Communication => (
            "communication-gap",
            "Official messaging did not reach enough of the town before the clock ran out.",
            "Increase broadcast frequency early and confirm delivery to every district.",
        ),
        GapGroup::Rumor => (
            "rumor-resurgence",
            "Rumor belief and spread stayed high through the end of the run.",
            "Pair every rumor sighting with a fast fact-check on the same channel.",
        ),
        GapGroup::Trust => (
            "trust-erosion",
            "Residents stopped trusting official channels and panic filled the gap.",
            "Lead with verifiable, locally confirmed details to rebuild trust.",
        ),
        GapGroup::Operations => (
            "operations-strain",
            "Relief resources queued at the wrong sites.",
            "Re-route capacity toward the sites residents are actually using.",
        ),
    }
}
