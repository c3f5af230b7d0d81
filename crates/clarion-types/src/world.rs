//! World snapshot and diff payloads.
//!
//! Entity records are carried as opaque JSON objects: the core merges them
//! field by field without interpreting producer schema, so upstream schema
//! changes never break the merge path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{AgentId, BuildingId};

// ---------------------------------------------------------------------------
// Entity Records
// ---------------------------------------------------------------------------

/// An opaque entity payload streamed by the producer.
///
/// The only field the core ever reads by name is `"id"`, which decides
/// whether a patch for an unknown key may stand alone as a new entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(pub Map<String, Value>);

impl EntityRecord {
    /// Build a record from raw JSON object fields.
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Look up a single field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Look up a string field by name.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Look up a numeric field by name.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this record can stand alone as a brand-new entity stored
    /// under `key`: it must carry an `"id"` string field equal to that key.
    pub fn stands_alone(&self, key: &str) -> bool {
        self.get_str("id") == Some(key)
    }

    /// Shallow field-level merge: every field in `patch` overwrites the
    /// same-named field here; fields the patch does not mention survive.
    pub fn merge(&mut self, patch: &Self) {
        for (field, value) in &patch.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot and Diff
// ---------------------------------------------------------------------------

/// Complete producer-owned world state at a single tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    /// Tick this snapshot describes.
    pub tick: u64,
    /// All known agents, keyed by producer-assigned ID.
    #[serde(default)]
    pub agents: BTreeMap<AgentId, EntityRecord>,
    /// All known buildings, keyed by producer-assigned ID.
    #[serde(default)]
    pub buildings: BTreeMap<BuildingId, EntityRecord>,
}

/// A tick-scoped set of field-level patches for a subset of entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDiff {
    /// Tick the patched state belongs to. Adopted verbatim by the store.
    pub tick: u64,
    /// Field patches for agents, keyed by agent ID.
    #[serde(default)]
    pub agent_patches: BTreeMap<AgentId, EntityRecord>,
    /// Field patches for buildings, keyed by building ID.
    #[serde(default)]
    pub building_patches: BTreeMap<BuildingId, EntityRecord>,
}
