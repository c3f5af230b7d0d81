//! Timeline event payloads.

use serde::{Deserialize, Serialize};

use crate::enums::EventCategory;
use crate::ids::AgentId;

/// A single timeline entry streamed by the producer.
///
/// Events are immutable once stored. The producer may emit duplicate IDs
/// (for example when replaying a phase); the log keeps them all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Producer-assigned event identifier.
    pub id: String,
    /// Tick the event occurred at.
    pub tick: u64,
    /// Category tag used for filtering and counting.
    pub category: EventCategory,
    /// Human-readable message text, when the event carries one.
    #[serde(default)]
    pub message: Option<String>,
    /// Agents involved in the event.
    #[serde(default)]
    pub actors: Vec<AgentId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_deserializes_with_sparse_fields() {
        let parsed: Result<TimelineEvent, _> = serde_json::from_str(
            r#"{"id": "ev-1", "tick": 4, "category": "check-in"}"#,
        );
        let event = parsed.ok();
        assert_eq!(
            event.as_ref().map(|e| e.category),
            Some(EventCategory::CheckIn)
        );
        assert_eq!(event.map(|e| e.actors.len()), Some(0));
    }
}
