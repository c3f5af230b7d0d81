//! Insight classifier: ranked narrative lists plus a single action hint.
//!
//! Pure transformation of the end-of-run analytic bundle (possibly partial,
//! possibly absent) and the final gauges into three ranked, deduplicated,
//! length-bounded text lists and exactly one recommendation. Never errors:
//! missing data degrades to sentinels and generic fallback lines.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use clarion_types::{
    AnalyticBundle, BundleStatus, ClusterSummary, ConversationThread, HealthMetrics,
    MessageKind, ThreadMood,
};

use crate::targets::{
    CONTAMINATION_CONCERN, CONTAMINATION_DOMINANT, CONTAMINATION_RESOLVED_MAX,
    OFFICIAL_REACH_MIN, RUMOR_SCORE_ALERT, RUMOR_SPREAD_MAX, STABILIZATION_HEALTHY,
    VULNERABLE_REACH_MIN,
};

/// Entries kept per narrative list.
const TOP_LINES: usize = 3;

/// Character budget for one narrative line, ellipsis included.
const LINE_BUDGET: usize = 120;

/// Sentinel shown where a numeric rollup is unavailable.
pub const NA_SENTINEL: &str = "n/a";

/// Dominant-type tags that read as calming signals.
const CALMING_KINDS: [MessageKind; 3] = [
    MessageKind::CheckIn,
    MessageKind::Official,
    MessageKind::Alert,
];

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Why a hint was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintKind {
    /// Analytics degraded; lean on the channels that do not need them.
    DegradedData,
    /// Rumor pressure is high; escalate fact-checking.
    FactCheck,
    /// Vulnerable residents are being missed.
    VulnerableOutreach,
    /// The plan is working; keep the cadence.
    MaintainCadence,
    /// Active concerns without a dominant metric signal.
    CombinedResponse,
    /// Nothing stands out; reinforce the official line.
    ReinforceOfficial,
}

impl HintKind {
    /// The fixed one-sentence recommendation for this kind.
    pub const fn text(self) -> &'static str {
        match self {
            Self::DegradedData => {
                "Analytics are degraded; prioritize official and check-in channels and re-check next cycle."
            }
            Self::FactCheck => {
                "Rumor pressure is high; escalate fact-checking on the dominant rumor threads."
            }
            Self::VulnerableOutreach => {
                "Vulnerable residents are under-reached; prioritize direct outreach to them."
            }
            Self::MaintainCadence => {
                "Messaging is landing; maintain the current broadcast cadence."
            }
            Self::CombinedResponse => {
                "Active rumor concerns remain; combine an alert push with resident routing."
            }
            Self::ReinforceOfficial => {
                "No dominant signal; reinforce official messaging on the main channels."
            }
        }
    }
}

/// The single actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHint {
    /// Which branch of the priority chain fired.
    pub kind: HintKind,
    /// The recommendation sentence.
    pub text: String,
}

impl From<HintKind> for ActionHint {
    fn from(kind: HintKind) -> Self {
        Self {
            kind,
            text: kind.text().to_owned(),
        }
    }
}

/// Narrative classification of the end-of-run analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    /// Bundle status as delivered (`unavailable` when no bundle arrived).
    pub status: BundleStatus,
    /// True when the upstream numeric rollups were unusable.
    pub partial: bool,
    /// Pipeline-supplied degradation reason, when any.
    pub reason: Option<String>,
    /// "What happened": first threads in input order, else top clusters.
    pub highlights: Vec<String>,
    /// Active rumor concerns, worst first.
    pub concerns: Vec<String>,
    /// Signs of resolution, ambient calm before detected turnarounds.
    pub resolutions: Vec<String>,
    /// The single action hint.
    pub hint: ActionHint,
    /// Mean thread contamination, absent when partial or threadless.
    pub rumor_score: Option<u8>,
    /// Share of threads showing a resolution signal, absent when partial
    /// or threadless.
    pub stabilization_rate: Option<u8>,
}

impl InsightReport {
    /// Rumor score for display; the sentinel when unavailable.
    pub fn rumor_score_display(&self) -> String {
        display_or_sentinel(self.rumor_score)
    }

    /// Stabilization rate for display; the sentinel when unavailable.
    pub fn stabilization_display(&self) -> String {
        display_or_sentinel(self.stabilization_rate)
    }
}

fn display_or_sentinel(value: Option<u8>) -> String {
    value.map_or_else(|| NA_SENTINEL.to_owned(), |v| format!("{v}%"))
}

// ---------------------------------------------------------------------------
// Thread Signals
// ---------------------------------------------------------------------------

/// Whether the thread shows a rumor signal.
pub fn rumor_signal(thread: &ConversationThread) -> bool {
    thread.mood == ThreadMood::Escalating
        || thread.contamination >= CONTAMINATION_CONCERN
        || thread.has_dominant(&[MessageKind::Rumor])
}

/// Whether the thread shows a resolution signal.
pub fn resolution_signal(thread: &ConversationThread) -> bool {
    thread.mood == ThreadMood::Stabilizing
        || thread.reversal_tick.is_some()
        || thread.has_dominant(&CALMING_KINDS)
}

/// Whether the thread counts as resolved: a resolution signal with no
/// remaining escalation, high contamination, or rumor dominance.
pub fn is_resolved(thread: &ConversationThread) -> bool {
    resolution_signal(thread)
        && thread.mood != ThreadMood::Escalating
        && thread.contamination < CONTAMINATION_RESOLVED_MAX
        && !thread.has_dominant(&[MessageKind::Rumor])
}

/// Whether the thread is an active concern.
pub fn is_concern(thread: &ConversationThread) -> bool {
    rumor_signal(thread) && !is_resolved(thread)
}

// ---------------------------------------------------------------------------
// Derived Numerics
// ---------------------------------------------------------------------------

/// Mean thread contamination, rounded. `None` for an empty thread list.
pub fn rumor_score(threads: &[ConversationThread]) -> Option<u8> {
    if threads.is_empty() {
        return None;
    }
    let sum: f64 = threads.iter().map(|t| t.contamination.clamp(0.0, 100.0)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / threads.len() as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = mean.round().clamp(0.0, 100.0) as u8;
    Some(rounded)
}

/// Share of threads showing a resolution signal, as a rounded percentage.
/// `None` for an empty thread list.
pub fn stabilization_rate(threads: &[ConversationThread]) -> Option<u8> {
    if threads.is_empty() {
        return None;
    }
    let calming = threads.iter().filter(|t| resolution_signal(t)).count();
    #[allow(clippy::cast_precision_loss)]
    let share = calming as f64 * 100.0 / threads.len() as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = share.round().clamp(0.0, 100.0) as u8;
    Some(rounded)
}

// ---------------------------------------------------------------------------
// Line Building
// ---------------------------------------------------------------------------

/// Shortest readable description of a thread.
fn thread_blurb(thread: &ConversationThread) -> String {
    let title = thread.title.trim();
    let lead = thread.lead.trim();
    match (title.is_empty(), lead.is_empty()) {
        (false, false) => format!("{title}: {lead}"),
        (false, true) => title.to_owned(),
        (true, false) => lead.to_owned(),
        (true, true) => format!("thread {}", thread.id),
    }
}

/// Concern line: severity tag plus the thread blurb.
fn concern_line(thread: &ConversationThread) -> String {
    let tag = if thread.contamination >= CONTAMINATION_DOMINANT {
        "rumor-dominant"
    } else {
        "caution"
    };
    format!("[{tag}] {}", thread_blurb(thread))
}

/// Resolution line, phrased by whichever signal fired first in priority
/// order: reversal, check-in, official-or-alert, generic stabilizing.
fn resolution_line(thread: &ConversationThread) -> String {
    let blurb = thread_blurb(thread);
    if let Some(tick) = thread.reversal_tick {
        return format!("Turnaround at tick {tick}: {blurb}");
    }
    if thread.has_dominant(&[MessageKind::CheckIn]) {
        format!("Check-ins are calming things down: {blurb}")
    } else if thread.has_dominant(&[MessageKind::Official, MessageKind::Alert]) {
        format!("Official word is landing: {blurb}")
    } else {
        format!("Settling down: {blurb}")
    }
}

/// Highlight line for a cluster: representative text, label, or key.
fn cluster_line(cluster: &ClusterSummary) -> String {
    let text = cluster
        .representative
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| cluster.label.trim().to_owned(), ToOwned::to_owned);
    if text.is_empty() {
        format!("cluster {}", cluster.id)
    } else {
        text
    }
}

/// Truncate a line to the character budget, appending an ellipsis when
/// anything was cut. Operates on characters, never raw bytes.
fn truncate_line(line: &str) -> String {
    if line.chars().count() <= LINE_BUDGET {
        return line.to_owned();
    }
    let mut cut: String = line.chars().take(LINE_BUDGET.saturating_sub(1)).collect();
    cut.push('\u{2026}');
    cut
}

/// Trim, drop empties and exact duplicates (first occurrence wins), then
/// apply the character budget.
fn dedupe_lines(lines: Vec<String>) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let trimmed = line.trim().to_owned();
        if trimmed.is_empty() || !seen.insert(trimmed.clone()) {
            continue;
        }
        out.push(truncate_line(&trimmed));
    }
    out
}

/// Replace an empty list with its generic fallback line.
fn or_fallback(lines: Vec<String>, fallback: &str) -> Vec<String> {
    if lines.is_empty() {
        vec![fallback.to_owned()]
    } else {
        lines
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Concerns ranked worst first: contamination desc, then turn count desc.
fn ranked_concerns(threads: &[ConversationThread]) -> Vec<&ConversationThread> {
    let mut concerns: Vec<&ConversationThread> =
        threads.iter().filter(|t| is_concern(t)).collect();
    concerns.sort_by(|a, b| {
        b.contamination
            .partial_cmp(&a.contamination)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.turn_count.cmp(&a.turn_count))
    });
    concerns.truncate(TOP_LINES);
    concerns
}

/// Resolved threads ranked with ambient calm first and detected
/// turnarounds after, ties broken by turn count desc.
fn ranked_resolutions(threads: &[ConversationThread]) -> Vec<&ConversationThread> {
    let mut resolved: Vec<&ConversationThread> =
        threads.iter().filter(|t| is_resolved(t)).collect();
    resolved.sort_by(|a, b| {
        a.reversal_tick
            .is_some()
            .cmp(&b.reversal_tick.is_some())
            .then_with(|| b.turn_count.cmp(&a.turn_count))
    });
    resolved.truncate(TOP_LINES);
    resolved
}

// ---------------------------------------------------------------------------
// Action Hint Chain
// ---------------------------------------------------------------------------

/// Everything the hint predicates read.
#[derive(Debug, Clone, Copy)]
struct HintContext {
    partial: bool,
    rumor_score: Option<u8>,
    stabilization_rate: Option<u8>,
    rumor_spread: f64,
    vulnerable_reach: f64,
    official_reach: f64,
    concern_count: usize,
}

const fn hint_degraded(ctx: &HintContext) -> bool {
    ctx.partial
}

fn hint_rumor_pressure(ctx: &HintContext) -> bool {
    ctx.rumor_score.is_some_and(|s| s >= RUMOR_SCORE_ALERT)
        || ctx.rumor_spread > RUMOR_SPREAD_MAX
}

const fn hint_vulnerable_gap(ctx: &HintContext) -> bool {
    ctx.vulnerable_reach < VULNERABLE_REACH_MIN
}

fn hint_holding(ctx: &HintContext) -> bool {
    ctx.stabilization_rate
        .is_some_and(|r| r >= STABILIZATION_HEALTHY)
        || ctx.official_reach >= OFFICIAL_REACH_MIN
}

const fn hint_active_concerns(ctx: &HintContext) -> bool {
    ctx.concern_count > 0
}

const fn hint_always(_: &HintContext) -> bool {
    true
}

/// The hint chain, first match wins. Branches are not mutually exclusive;
/// the order is part of the contract.
const HINT_CHAIN: &[(fn(&HintContext) -> bool, HintKind)] = &[
    (hint_degraded, HintKind::DegradedData),
    (hint_rumor_pressure, HintKind::FactCheck),
    (hint_vulnerable_gap, HintKind::VulnerableOutreach),
    (hint_holding, HintKind::MaintainCadence),
    (hint_active_concerns, HintKind::CombinedResponse),
    (hint_always, HintKind::ReinforceOfficial),
];

fn choose_hint(ctx: &HintContext) -> ActionHint {
    for (predicate, kind) in HINT_CHAIN {
        if predicate(ctx) {
            return ActionHint::from(*kind);
        }
    }
    // The chain ends in an always-true branch.
    ActionHint::from(HintKind::ReinforceOfficial)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify the end-of-run analytics into an [`InsightReport`].
///
/// `bundle` is the analytic payload as delivered (or absent); `metrics`
/// are the final gauges from the end-of-run summary. Total: any input
/// shape produces a report, worst case built from fallback lines.
pub fn classify(bundle: Option<&AnalyticBundle>, metrics: &HealthMetrics) -> InsightReport {
    let status = bundle.map_or(BundleStatus::Unavailable, |b| b.status);
    let reason = bundle.and_then(|b| b.reason.clone());
    let metrics_available = bundle.is_some_and(|b| b.metrics_available);
    let partial = !metrics_available || status != BundleStatus::Ready;

    let threads: &[ConversationThread] = bundle.map_or(&[], |b| b.threads.as_slice());
    let clusters: &[ClusterSummary] = bundle.map_or(&[], |b| b.clusters.as_slice());

    let rumor = if partial { None } else { rumor_score(threads) };
    let stabilization = if partial {
        None
    } else {
        stabilization_rate(threads)
    };

    let concerns = ranked_concerns(threads);
    let resolutions = ranked_resolutions(threads);

    let highlight_lines: Vec<String> = if threads.is_empty() {
        let mut by_size: Vec<&ClusterSummary> = clusters.iter().collect();
        by_size.sort_by(|a, b| b.size.cmp(&a.size));
        by_size.iter().take(TOP_LINES).map(|c| cluster_line(c)).collect()
    } else {
        threads.iter().take(TOP_LINES).map(thread_blurb).collect()
    };

    let hint = choose_hint(&HintContext {
        partial,
        rumor_score: rumor,
        stabilization_rate: stabilization,
        rumor_spread: metrics.rumor_spread,
        vulnerable_reach: metrics.vulnerable_reach,
        official_reach: metrics.official_reach,
        concern_count: concerns.len(),
    });

    InsightReport {
        status,
        partial,
        reason,
        highlights: or_fallback(
            dedupe_lines(highlight_lines),
            "No conversation data was captured for this run.",
        ),
        concerns: or_fallback(
            dedupe_lines(concerns.iter().map(|t| concern_line(t)).collect()),
            "No active rumor concerns detected.",
        ),
        resolutions: or_fallback(
            dedupe_lines(resolutions.iter().map(|t| resolution_line(t)).collect()),
            "No clear resolution signals yet.",
        ),
        hint,
        rumor_score: rumor,
        stabilization_rate: stabilization,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clarion_types::ThreadId;

    fn thread(id: &str) -> ConversationThread {
        ConversationThread {
            id: ThreadId::new(id),
            title: format!("Topic {id}"),
            lead: format!("lead text for {id}"),
            mood: ThreadMood::Neutral,
            contamination: 0.0,
            turn_count: 1,
            participant_count: 2,
            dominant_types: Vec::new(),
            reversal_tick: None,
            window: None,
        }
    }

    fn ready_bundle(threads: Vec<ConversationThread>) -> AnalyticBundle {
        AnalyticBundle {
            status: BundleStatus::Ready,
            reason: None,
            metrics_available: true,
            threads,
            clusters: Vec::new(),
        }
    }

    fn healthy_metrics() -> HealthMetrics {
        HealthMetrics {
            official_reach: 70.0,
            vulnerable_reach: 60.0,
            confusion: 20.0,
            rumor_spread: 15.0,
            panic_index: 20.0,
            trust_index: 65.0,
            misinfo_belief: 10.0,
            resource_misallocation: 20.0,
            stability_score: None,
        }
    }

    #[test]
    fn stabilizing_official_thread_is_resolution_not_concern() {
        let mut t = thread("th-1");
        t.mood = ThreadMood::Stabilizing;
        t.contamination = 20.0;
        t.dominant_types = vec![MessageKind::Official];

        assert!(is_resolved(&t));
        assert!(!is_concern(&t));

        let report = classify(Some(&ready_bundle(vec![t])), &healthy_metrics());
        assert!(report.resolutions.iter().any(|l| l.contains("th-1")));
        assert!(!report.concerns.iter().any(|l| l.contains("th-1")));
    }

    #[test]
    fn escalating_rumor_thread_is_concern_not_resolution() {
        let mut t = thread("th-2");
        t.mood = ThreadMood::Escalating;
        t.contamination = 80.0;
        t.dominant_types = vec![MessageKind::Rumor];

        assert!(is_concern(&t));
        assert!(!is_resolved(&t));

        let report = classify(Some(&ready_bundle(vec![t])), &healthy_metrics());
        assert!(report.concerns.iter().any(|l| l.contains("th-2")));
        assert!(!report.resolutions.iter().any(|l| l.contains("th-2")));
    }

    #[test]
    fn contaminated_stabilizing_thread_stays_a_concern() {
        // A resolution signal alone does not clear a thread that is still
        // rumor-dominated.
        let mut t = thread("th-3");
        t.mood = ThreadMood::Stabilizing;
        t.contamination = 70.0;
        t.dominant_types = vec![MessageKind::Rumor];

        assert!(is_concern(&t));
        assert!(!is_resolved(&t));
    }

    #[test]
    fn concerns_rank_by_contamination_then_turns_and_cap_at_three() {
        let mut threads = Vec::new();
        for (id, contamination, turns) in [
            ("th-a", 55.0, 4_u32),
            ("th-b", 90.0, 2),
            ("th-c", 70.0, 9),
            ("th-d", 70.0, 3),
            ("th-e", 52.0, 1),
        ] {
            let mut t = thread(id);
            t.contamination = contamination;
            t.turn_count = turns;
            threads.push(t);
        }

        let ranked = ranked_concerns(&threads);
        let ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["th-b", "th-c", "th-d"]);
    }

    #[test]
    fn concern_tag_flips_at_dominance_threshold() {
        let mut caution = thread("th-4");
        caution.contamination = 55.0;
        let mut dominant = thread("th-5");
        dominant.contamination = 60.0;

        assert!(concern_line(&caution).starts_with("[caution]"));
        assert!(concern_line(&dominant).starts_with("[rumor-dominant]"));
    }

    #[test]
    fn resolutions_put_ambient_calm_before_turnarounds() {
        let mut calm = thread("th-calm");
        calm.mood = ThreadMood::Stabilizing;
        calm.turn_count = 2;

        let mut reversed = thread("th-rev");
        reversed.mood = ThreadMood::Stabilizing;
        reversed.reversal_tick = Some(40);
        reversed.turn_count = 9;

        let threads = vec![reversed, calm];
        let ranked = ranked_resolutions(&threads);
        let ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["th-calm", "th-rev"]);
    }

    #[test]
    fn resolution_phrasing_priority_prefers_reversal() {
        let mut t = thread("th-6");
        t.mood = ThreadMood::Stabilizing;
        t.reversal_tick = Some(33);
        t.dominant_types = vec![MessageKind::CheckIn];
        assert!(resolution_line(&t).starts_with("Turnaround at tick 33"));

        t.reversal_tick = None;
        assert!(resolution_line(&t).starts_with("Check-ins"));

        t.dominant_types = vec![MessageKind::Alert];
        assert!(resolution_line(&t).starts_with("Official word"));

        t.dominant_types = Vec::new();
        assert!(resolution_line(&t).starts_with("Settling down"));
    }

    #[test]
    fn duplicate_lines_are_removed_preserving_first() {
        let lines = vec![
            "  same text ".to_owned(),
            "same text".to_owned(),
            "other".to_owned(),
        ];
        assert_eq!(dedupe_lines(lines), vec!["same text", "other"]);
    }

    #[test]
    fn long_lines_are_truncated_on_char_boundaries() {
        let long: String = "ä".repeat(200);
        let cut = truncate_line(&long);
        assert_eq!(cut.chars().count(), LINE_BUDGET);
        assert!(cut.ends_with('\u{2026}'));

        let short = "short".to_owned();
        assert_eq!(truncate_line(&short), "short");
    }

    #[test]
    fn degraded_bundle_yields_sentinels_but_keeps_narrative() {
        let mut t = thread("th-7");
        t.mood = ThreadMood::Escalating;
        t.contamination = 75.0;
        let mut bundle = ready_bundle(vec![t]);
        bundle.metrics_available = false;

        let report = classify(Some(&bundle), &healthy_metrics());
        assert!(report.partial);
        assert_eq!(report.rumor_score, None);
        assert_eq!(report.rumor_score_display(), NA_SENTINEL);
        assert_eq!(report.stabilization_display(), NA_SENTINEL);
        // Narrative still derived from the thread data that exists.
        assert!(report.concerns.iter().any(|l| l.contains("th-7")));
        assert_eq!(report.hint.kind, HintKind::DegradedData);
    }

    #[test]
    fn missing_bundle_degrades_to_fallback_lines() {
        let report = classify(None, &healthy_metrics());
        assert_eq!(report.status, BundleStatus::Unavailable);
        assert!(report.partial);
        assert_eq!(report.highlights.len(), 1);
        assert_eq!(report.concerns.len(), 1);
        assert_eq!(report.resolutions.len(), 1);
        assert_eq!(report.hint.kind, HintKind::DegradedData);
    }

    #[test]
    fn highlights_fall_back_to_largest_clusters() {
        let mut bundle = ready_bundle(Vec::new());
        for (id, size, rep) in [
            ("cl-1", 4_u32, "small talk"),
            ("cl-2", 20, "where to get water"),
            ("cl-3", 11, "shelter directions"),
        ] {
            bundle.clusters.push(ClusterSummary {
                id: clarion_types::ClusterId::new(id),
                label: id.to_owned(),
                size,
                representative: Some(rep.to_owned()),
            });
        }

        let report = classify(Some(&bundle), &healthy_metrics());
        assert_eq!(
            report.highlights,
            vec!["where to get water", "shelter directions", "small talk"]
        );
    }

    #[test]
    fn rumor_score_is_mean_contamination() {
        let mut a = thread("th-a");
        a.contamination = 40.0;
        let mut b = thread("th-b");
        b.contamination = 61.0;
        assert_eq!(rumor_score(&[a, b]), Some(51));
        assert_eq!(rumor_score(&[]), None);
    }

    #[test]
    fn stabilization_rate_counts_resolution_signals() {
        let mut calm = thread("th-a");
        calm.mood = ThreadMood::Stabilizing;
        let noisy = thread("th-b");
        let reversed = {
            let mut t = thread("th-c");
            t.reversal_tick = Some(5);
            t
        };
        assert_eq!(stabilization_rate(&[calm, noisy, reversed]), Some(67));
    }

    #[test]
    fn hint_chain_order_is_load_bearing() {
        // (b) fires on the derived rumor score.
        let mut hot = thread("th-hot");
        hot.contamination = 80.0;
        hot.mood = ThreadMood::Escalating;
        let report = classify(Some(&ready_bundle(vec![hot])), &healthy_metrics());
        assert_eq!(report.hint.kind, HintKind::FactCheck);

        // (b) also fires on the rumor-spread gauge alone.
        let mut metrics = healthy_metrics();
        metrics.rumor_spread = 40.0;
        let report = classify(Some(&ready_bundle(Vec::new())), &metrics);
        assert_eq!(report.hint.kind, HintKind::FactCheck);

        // (c) vulnerable gap once rumor pressure is off.
        let mut metrics = healthy_metrics();
        metrics.vulnerable_reach = 30.0;
        let report = classify(Some(&ready_bundle(Vec::new())), &metrics);
        assert_eq!(report.hint.kind, HintKind::VulnerableOutreach);

        // (d) healthy stabilization keeps the cadence.
        let mut calm = thread("th-calm");
        calm.mood = ThreadMood::Stabilizing;
        let report = classify(Some(&ready_bundle(vec![calm])), &healthy_metrics());
        assert_eq!(report.hint.kind, HintKind::MaintainCadence);

        // (e) concerns without metric pressure combine interventions.
        let mut metrics = healthy_metrics();
        metrics.official_reach = 50.0;
        let mut worry = thread("th-worry");
        worry.mood = ThreadMood::Escalating;
        worry.contamination = 30.0;
        let report = classify(Some(&ready_bundle(vec![worry])), &metrics);
        assert_eq!(report.hint.kind, HintKind::CombinedResponse);

        // (f) nothing stands out.
        let mut metrics = healthy_metrics();
        metrics.official_reach = 50.0;
        let report = classify(Some(&ready_bundle(Vec::new())), &metrics);
        assert_eq!(report.hint.kind, HintKind::ReinforceOfficial);
    }

    #[test]
    fn report_serializes_with_camel_case_wire_names() {
        let report = classify(Some(&ready_bundle(Vec::new())), &healthy_metrics());
        let wire = serde_json::to_value(&report).unwrap();
        assert_eq!(wire["status"], "ready");
        assert_eq!(wire["partial"], false);
        assert!(wire["rumorScore"].is_null());
        assert!(wire["stabilizationRate"].is_null());
        assert_eq!(wire["hint"]["kind"], "maintain-cadence");
        assert!(wire["highlights"].is_array());
    }
}
