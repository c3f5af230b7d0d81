//! End-to-end session flow over the public API.
//!
//! Drives a complete miniature run (snapshot, diff, metrics, end)
//! through the synchronous state and through the spawned worker, in the
//! same order a live feed would deliver the messages.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use clarion_services::ServiceSet;
use clarion_session::{SessionNotice, SessionState, decode_feed_message, spawn_session};
use clarion_types::{AgentId, FeedMessage, Gauge, Grade};

const INIT: &str = r#"{
    "kind": "init",
    "tick": 0,
    "agents": {
        "a1": {"id": "a1", "name": "Avery", "stress": 10},
        "a2": {"id": "a2", "name": "Brook", "stress": 15}
    },
    "buildings": {"hall": {"id": "hall", "kind": "town-hall"}}
}"#;

const DIFF: &str = r#"{"kind": "diff", "tick": 1, "agentPatches": {"a1": {"stress": 40}}}"#;

const METRICS: &str =
    r#"{"kind": "metrics", "tick": 1, "stabilityScore": 72, "officialReach": 70}"#;

const END: &str = r#"{
    "kind": "end",
    "tick": 1,
    "endReason": "stabilized",
    "metrics": {"stabilityScore": 72, "officialReach": 70, "trustIndex": 60},
    "population": {"total": 2, "informed": 2}
}"#;

fn decode(raw: &str) -> FeedMessage {
    decode_feed_message(raw).unwrap()
}

#[test]
fn full_run_produces_graded_report() {
    let mut session = SessionState::new();

    assert_eq!(
        session.apply(decode(INIT)),
        SessionNotice::TickApplied { tick: 0 }
    );
    assert_eq!(
        session.apply(decode(DIFF)),
        SessionNotice::TickApplied { tick: 1 }
    );
    assert_eq!(
        session.apply(decode(METRICS)),
        SessionNotice::MetricsRecorded { tick: 1 }
    );

    let snapshot = session.world().snapshot().unwrap();
    assert_eq!(snapshot.tick, 1);
    let a1 = snapshot.agents.get(&AgentId::from("a1")).unwrap();
    assert_eq!(a1.get_f64("stress"), Some(40.0));
    assert_eq!(a1.get_str("name"), Some("Avery"));
    let a2 = snapshot.agents.get(&AgentId::from("a2")).unwrap();
    assert_eq!(a2.get_f64("stress"), Some(15.0));
    assert_eq!(session.series().len(), 1);

    assert_eq!(session.apply(decode(END)), SessionNotice::RunEnded);
    let report = session.report().unwrap();
    let peak = report.summary.peaks.get(&Gauge::StabilityScore).unwrap();
    assert_eq!(peak.tick, 1);
    assert!((peak.value - 72.0).abs() < 1e-10);
    assert_eq!(report.outcome.score, 72);
    assert_eq!(report.outcome.grade, Grade::A);
    assert!(report.outcome.diagnosis.is_none());
}

#[tokio::test]
async fn worker_applies_commands_in_order_and_broadcasts() {
    let handle = spawn_session(Arc::new(ServiceSet::disabled()));
    let mut notices = handle.subscribe();

    handle.apply(decode(INIT)).await;
    handle.apply(decode(DIFF)).await;
    handle.apply(decode(METRICS)).await;
    handle.apply(decode(END)).await;

    assert_eq!(
        notices.recv().await.unwrap(),
        SessionNotice::TickApplied { tick: 0 }
    );
    assert_eq!(
        notices.recv().await.unwrap(),
        SessionNotice::TickApplied { tick: 1 }
    );
    assert_eq!(
        notices.recv().await.unwrap(),
        SessionNotice::MetricsRecorded { tick: 1 }
    );
    assert_eq!(notices.recv().await.unwrap(), SessionNotice::RunEnded);

    let state = handle.state();
    let guard = state.read().await;
    assert!(guard.is_ended());
    assert_eq!(guard.report().map(|r| r.outcome.grade), Some(Grade::A));
    drop(guard);

    handle.reset().await;
    assert_eq!(notices.recv().await.unwrap(), SessionNotice::Reset);
    let cleared = handle.state();
    let guard = cleared.read().await;
    assert!(guard.world().snapshot().is_none());
    assert!(!guard.is_ended());
}

#[tokio::test]
async fn explain_agent_falls_back_locally_when_services_are_disabled() {
    let handle = spawn_session(Arc::new(ServiceSet::disabled()));
    let mut notices = handle.subscribe();
    handle.apply(decode(INIT)).await;
    notices.recv().await.unwrap();

    let explanation = handle.explain_agent(&AgentId::from("a1")).await.unwrap();
    assert!(explanation.why.contains("Avery"));
    assert!(explanation.memory_refs.is_empty());

    let unknown = handle.explain_agent(&AgentId::from("zz")).await;
    assert!(unknown.is_none());
}

#[tokio::test]
async fn similar_memories_is_empty_when_embedding_is_disabled() {
    let handle = spawn_session(Arc::new(ServiceSet::disabled()));
    let neighbors = handle.similar_memories("shelter routing", 3).await.unwrap();
    assert!(neighbors.is_empty());
}
