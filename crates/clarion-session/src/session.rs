//! Session state: one run's stores and its sealed final report.
//!
//! A [`SessionState`] owns the merged world, the timeline ring, and the
//! metrics series for a single producer run. All mutation flows through
//! [`SessionState::apply`], which routes each feed message to exactly one
//! store and describes what happened as a [`SessionNotice`]. The end
//! message seals a [`FinalReport`]; later messages still update the
//! stores, but the sealed report never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use clarion_insight::{InsightReport, OutcomeReport, classify, evaluate};
use clarion_state::{MetricsSeries, TimelineLog, WorldStore};
use clarion_types::{FeedMessage, OutcomeSummary, RunId, RunSummary};

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// What one applied message did to the session.
///
/// Broadcast to live subscribers so a consumer can refresh exactly the
/// panel the message touched instead of re-reading everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SessionNotice {
    /// A snapshot or diff advanced the merged world.
    TickApplied {
        /// Tick the world now reflects.
        tick: u64,
    },
    /// A timeline event was recorded.
    EventLogged {
        /// Tick the event belongs to.
        tick: u64,
    },
    /// A metrics interval was recorded.
    MetricsRecorded {
        /// Tick the interval belongs to.
        tick: u64,
    },
    /// The end message arrived and the final report is sealed.
    RunEnded,
    /// The message was dropped (duplicate end message).
    Ignored,
    /// The session was cleared for a new run.
    Reset,
}

// ---------------------------------------------------------------------------
// Final Report
// ---------------------------------------------------------------------------

/// Everything derived at run end, sealed in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    /// Producer totals merged with locally tracked peaks and counts.
    pub summary: OutcomeSummary,
    /// Score, grade, target checks, and failure diagnosis.
    pub outcome: OutcomeReport,
    /// Narrative lists and the single action hint.
    pub insight: InsightReport,
    /// When the end message was applied.
    pub ended_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Session State
// ---------------------------------------------------------------------------

/// Single mutable owner of one run's stores.
///
/// Readers reach the stores through the borrow accessors; the only way
/// to change anything is [`SessionState::apply`] or
/// [`SessionState::reset`], which keeps the single-writer discipline in
/// the type rather than in a convention.
#[derive(Debug, Clone)]
pub struct SessionState {
    run_id: RunId,
    world: WorldStore,
    timeline: TimelineLog,
    series: MetricsSeries,
    report: Option<FinalReport>,
}

impl SessionState {
    /// Create a fresh session with a new run id and empty stores.
    pub fn new() -> Self {
        Self {
            run_id: RunId::new(),
            world: WorldStore::new(),
            timeline: TimelineLog::new(),
            series: MetricsSeries::new(),
            report: None,
        }
    }

    /// Locally minted id of the current run.
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The merged world store.
    pub const fn world(&self) -> &WorldStore {
        &self.world
    }

    /// The bounded timeline log.
    pub const fn timeline(&self) -> &TimelineLog {
        &self.timeline
    }

    /// The bounded metrics series.
    pub const fn series(&self) -> &MetricsSeries {
        &self.series
    }

    /// The sealed final report, once the end message has arrived.
    pub const fn report(&self) -> Option<&FinalReport> {
        self.report.as_ref()
    }

    /// Whether the end message has been applied.
    pub const fn is_ended(&self) -> bool {
        self.report.is_some()
    }

    /// Apply one feed message to the store it addresses.
    ///
    /// Messages arriving after the end message still update the stores;
    /// only a second end message is dropped, because the sealed report
    /// must not change.
    pub fn apply(&mut self, message: FeedMessage) -> SessionNotice {
        match message {
            FeedMessage::Init(snapshot) => {
                let tick = snapshot.tick;
                self.world.apply_full(snapshot);
                SessionNotice::TickApplied { tick }
            }
            FeedMessage::Diff(diff) => {
                let tick = diff.tick;
                self.world.apply_diff(&diff);
                SessionNotice::TickApplied { tick }
            }
            FeedMessage::Event(event) => {
                let tick = event.tick;
                self.timeline.push(event);
                SessionNotice::EventLogged { tick }
            }
            FeedMessage::Metrics(sample) => {
                let tick = sample.tick;
                self.series.record(sample);
                SessionNotice::MetricsRecorded { tick }
            }
            FeedMessage::End(summary) => self.apply_end(&summary),
        }
    }

    /// Clear every store and mint a new run id.
    pub fn reset(&mut self) -> SessionNotice {
        self.run_id = RunId::new();
        self.world.reset();
        self.timeline.reset();
        self.series.reset();
        self.report = None;
        info!(run_id = %self.run_id, "session reset for a new run");
        SessionNotice::Reset
    }

    /// Seal the final report from the producer's totals plus the locally
    /// tracked peaks and event counts.
    fn apply_end(&mut self, end: &RunSummary) -> SessionNotice {
        if self.report.is_some() {
            warn!(tick = end.tick, "duplicate end message dropped");
            return SessionNotice::Ignored;
        }
        let summary = OutcomeSummary {
            run_id: self.run_id,
            tick: end.tick,
            duration_seconds: end.duration_seconds,
            simulated_minutes: end.simulated_minutes,
            end_reason: end.end_reason,
            metrics: end.metrics,
            peaks: self.series.peaks().clone(),
            event_counts: self.timeline.counts().clone(),
            population: end.population,
            scenario: end.scenario.clone(),
            tags: end.tags.clone(),
            analytics: end.analytics.clone(),
        };
        let outcome = evaluate(&summary);
        let insight = classify(summary.analytics.as_ref(), &summary.metrics);
        info!(
            tick = end.tick,
            score = outcome.score,
            grade = %outcome.grade,
            "final report sealed"
        );
        self.report = Some(FinalReport {
            summary,
            outcome,
            insight,
            ended_at: Utc::now(),
        });
        SessionNotice::RunEnded
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(raw: &str) -> FeedMessage {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn second_end_message_is_dropped() {
        let mut session = SessionState::new();
        let first = r#"{"kind": "end", "tick": 9, "endReason": "stabilized"}"#;
        assert_eq!(session.apply(message(first)), SessionNotice::RunEnded);
        let sealed_at = session.report().unwrap().ended_at;

        let later = r#"{"kind": "end", "tick": 12, "endReason": "escalated"}"#;
        assert_eq!(session.apply(message(later)), SessionNotice::Ignored);
        let report = session.report().unwrap();
        assert_eq!(report.summary.tick, 9);
        assert_eq!(report.ended_at, sealed_at);
    }

    #[test]
    fn stores_keep_updating_after_the_end_message() {
        let mut session = SessionState::new();
        session.apply(message(
            r#"{"kind": "end", "tick": 5, "endReason": "time-limit"}"#,
        ));
        let notice = session.apply(message(
            r#"{"kind": "event", "id": "e1", "tick": 6, "category": "official"}"#,
        ));
        assert_eq!(notice, SessionNotice::EventLogged { tick: 6 });
        assert_eq!(session.timeline().len(), 1);
        assert!(session.is_ended());
    }

    #[test]
    fn report_merges_local_peaks_and_event_counts() {
        let mut session = SessionState::new();
        session.apply(message(r#"{"kind": "metrics", "tick": 2, "panicIndex": 48}"#));
        session.apply(message(
            r#"{"kind": "event", "id": "e1", "tick": 2, "category": "rumor"}"#,
        ));
        session.apply(message(
            r#"{"kind": "end", "tick": 3, "endReason": "escalated"}"#,
        ));

        let report = session.report().unwrap();
        assert_eq!(report.summary.run_id, session.run_id());
        let peak = report.summary.peaks.get(&clarion_types::Gauge::PanicIndex);
        assert_eq!(peak.map(|p| p.tick), Some(2));
        let rumors = report
            .summary
            .event_counts
            .get(&clarion_types::EventCategory::Rumor);
        assert_eq!(rumors, Some(&1));
    }

    #[test]
    fn reset_clears_stores_and_mints_a_new_run_id() {
        let mut session = SessionState::new();
        let before = session.run_id();
        session.apply(message(r#"{"kind": "metrics", "tick": 1, "panicIndex": 20}"#));
        session.apply(message(
            r#"{"kind": "end", "tick": 1, "endReason": "stabilized"}"#,
        ));

        assert_eq!(session.reset(), SessionNotice::Reset);
        assert_ne!(session.run_id(), before);
        assert!(session.series().is_empty());
        assert!(session.timeline().is_empty());
        assert!(session.report().is_none());
        assert!(!session.is_ended());
    }

    #[test]
    fn notices_carry_their_kind_on_the_wire() {
        let applied = serde_json::to_value(SessionNotice::TickApplied { tick: 4 }).unwrap();
        assert_eq!(applied["kind"], "tick-applied");
        assert_eq!(applied["tick"], 4);
        let ended = serde_json::to_value(SessionNotice::RunEnded).unwrap();
        assert_eq!(ended["kind"], "run-ended");
    }
}
