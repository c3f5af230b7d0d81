//! Producer feed intake: decoding, the single-writer worker, and the
//! cloneable live handle.
//!
//! One worker task owns the only write path to the shared
//! [`SessionState`]. Every producer message and reset travels the same
//! command channel, so applications are strictly ordered no matter how
//! many handle clones exist. Each applied message is echoed to live
//! subscribers as a [`SessionNotice`] over a broadcast channel.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast, mpsc};
use tracing::{debug, warn};

use clarion_services::{
    AgentExplanation, ExplainRequest, MemoryRecord, Neighbor, ServiceError, ServiceSet,
};
use clarion_types::{AgentId, FeedMessage, MemoryId};

use crate::session::{FinalReport, SessionNotice, SessionState};

/// Capacity of the notice broadcast channel.
///
/// Subscribers that fall more than this many notices behind receive
/// `Lagged` and skip ahead rather than stalling the worker.
pub const BROADCAST_CAPACITY: usize = 256;

/// Capacity of the command channel feeding the worker.
///
/// A full channel applies backpressure to the intake instead of
/// dropping messages.
pub const COMMAND_CAPACITY: usize = 256;

/// Timeline messages included in an explanation request, newest first.
const RECENT_EVENTS: usize = 5;

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode one raw feed line.
///
/// Corrupt or unrecognized payloads come back as `None` with a debug
/// log; one bad producer line must never take the intake down.
pub fn decode_feed_message(raw: &str) -> Option<FeedMessage> {
    serde_json::from_str(raw).map_or_else(
        |error| {
            debug!(error = %error, "dropping undecodable feed message");
            None
        },
        Some,
    )
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One unit of work for the session worker.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Apply one producer message to the stores.
    Apply(FeedMessage),
    /// Clear the stores and mint a new run id.
    Reset,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cloneable handle to a running session worker.
///
/// Clones share one worker, one state, and one notice channel. The
/// worker exits once every handle clone has been dropped.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    notices: broadcast::Sender<SessionNotice>,
    state: Arc<RwLock<SessionState>>,
    services: Arc<ServiceSet>,
}

impl SessionHandle {
    /// Subscribe to per-message notices.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotice> {
        self.notices.subscribe()
    }

    /// Shared session state for direct reads.
    pub fn state(&self) -> Arc<RwLock<SessionState>> {
        Arc::clone(&self.state)
    }

    /// Queue one producer message for application.
    pub async fn apply(&self, message: FeedMessage) {
        self.send(SessionCommand::Apply(message)).await;
    }

    /// Queue a session reset.
    pub async fn reset(&self) {
        self.send(SessionCommand::Reset).await;
    }

    async fn send(&self, command: SessionCommand) {
        if let Err(error) = self.commands.send(command).await {
            warn!(error = %error, "session worker is gone, dropping command");
        }
    }

    /// Explain one agent's current behavior.
    ///
    /// Returns `None` when no snapshot has arrived yet or the agent is
    /// unknown. Degrades to the local templated explanation when the
    /// reasoning service is unavailable, so a known agent always gets an
    /// answer.
    pub async fn explain_agent(&self, agent_id: &AgentId) -> Option<AgentExplanation> {
        let guard = self.state.read().await;
        let agent = guard.world().snapshot()?.agents.get(agent_id)?.clone();
        let recent_events: Vec<String> = guard
            .timeline()
            .iter()
            .filter(|event| event.actors.contains(agent_id))
            .filter_map(|event| event.message.clone())
            .take(RECENT_EVENTS)
            .collect();
        let request = ExplainRequest {
            agent_id: agent_id.clone(),
            recent_events,
            tick: guard.world().tick(),
        };
        drop(guard);
        Some(
            self.services
                .reasoning
                .explain_or_fallback(&request, &agent)
                .await,
        )
    }

    /// Nearest stored memories for a free-text query.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] when the embedding backend
    /// call fails. A disabled embedding service yields an empty list.
    pub async fn similar_memories(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<Neighbor>, ServiceError> {
        self.services.embedding.neighbors(text, k).await
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Spawn the single-writer session worker and return its handle.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_session(services: Arc<ServiceSet>) -> SessionHandle {
    let (commands, receiver) = mpsc::channel(COMMAND_CAPACITY);
    let (notices, _) = broadcast::channel(BROADCAST_CAPACITY);
    let state = Arc::new(RwLock::new(SessionState::new()));

    tokio::spawn(run_worker(
        receiver,
        Arc::clone(&state),
        notices.clone(),
        Arc::clone(&services),
    ));

    SessionHandle {
        commands,
        notices,
        state,
        services,
    }
}

async fn run_worker(
    mut commands: mpsc::Receiver<SessionCommand>,
    state: Arc<RwLock<SessionState>>,
    notices: broadcast::Sender<SessionNotice>,
    services: Arc<ServiceSet>,
) {
    while let Some(command) = commands.recv().await {
        let notice = match command {
            SessionCommand::Apply(message) => state.write().await.apply(message),
            SessionCommand::Reset => state.write().await.reset(),
        };
        if notice == SessionNotice::RunEnded {
            store_run_memory(&state, &services).await;
        }
        // A send error just means nobody is subscribed right now.
        notices.send(notice).unwrap_or(0);
    }
    debug!("session command channel closed, worker exiting");
}

/// Push the sealed report to the memory sink as one durable record.
async fn store_run_memory(state: &RwLock<SessionState>, services: &Arc<ServiceSet>) {
    let record = state.read().await.report().map(run_memory);
    if let Some(record) = record {
        services.store_detached(record);
    }
}

/// Compose the durable outcome record for a sealed report.
fn run_memory(report: &FinalReport) -> MemoryRecord {
    let summary = &report.summary;
    let mut lines = vec![format!(
        "Run ended at tick {} ({}) with score {}, grade {}.",
        summary.tick,
        summary.end_reason.label(),
        report.outcome.score,
        report.outcome.grade
    )];
    lines.extend(report.insight.highlights.iter().cloned());
    if let Some(diagnosis) = &report.outcome.diagnosis {
        lines.push(diagnosis.description.clone());
    }
    lines.push(report.insight.hint.text.clone());
    MemoryRecord {
        id: MemoryId::new(format!("run-{}", summary.run_id)),
        agent_id: None,
        title: format!("Run outcome: grade {}", report.outcome.grade),
        text: lines.join(" "),
        tick: summary.tick,
        created_at: report.ended_at,
        embedding: None,
    }
}
