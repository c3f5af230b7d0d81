//! Entity merge store: the single merged world snapshot.
//!
//! The producer streams one full snapshot at run start and field-level
//! diffs afterwards. This store owns the merged result. Malformed or
//! unmatched patches are absorbed, never errors; the producer's output is
//! best-effort by contract.

use std::collections::BTreeMap;

use tracing::debug;

use clarion_types::{EntityRecord, WorldDiff, WorldSnapshot};

/// Counts of what one diff did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffReport {
    /// Whether the diff was applied at all (`false` before the first
    /// snapshot).
    pub applied: bool,
    /// Existing entities that received field patches.
    pub patched: usize,
    /// Brand-new entities inserted from stand-alone patches.
    pub inserted: usize,
    /// Patches dropped because the entity is unknown and incomplete.
    pub dropped: usize,
}

/// Owner of the merged world snapshot.
///
/// Diffs are merged into a clone which then replaces the current snapshot
/// in one move, so a reader holding the previous snapshot never observes a
/// half-merged collection.
#[derive(Debug, Clone, Default)]
pub struct WorldStore {
    current: Option<WorldSnapshot>,
}

impl WorldStore {
    /// Create an empty store (no snapshot yet).
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Replace the entire world state with a full snapshot.
    pub fn apply_full(&mut self, snapshot: WorldSnapshot) {
        debug!(
            tick = snapshot.tick,
            agents = snapshot.agents.len(),
            buildings = snapshot.buildings.len(),
            "applying full snapshot"
        );
        self.current = Some(snapshot);
    }

    /// Merge a tick-scoped diff into the current snapshot.
    ///
    /// A silent no-op before the first full snapshot. Per patched entity:
    /// known entities merge field-wise (patch wins, unmentioned fields
    /// survive); unknown entities are inserted only when the patch stands
    /// alone, and dropped otherwise. The store tick is then set to the diff
    /// tick verbatim.
    pub fn apply_diff(&mut self, diff: &WorldDiff) -> DiffReport {
        let Some(current) = self.current.as_ref() else {
            debug!(tick = diff.tick, "diff before first snapshot, ignoring");
            return DiffReport::default();
        };

        let mut next = current.clone();
        let mut report = DiffReport {
            applied: true,
            ..DiffReport::default()
        };

        merge_collection(&mut next.agents, &diff.agent_patches, &mut report);
        merge_collection(&mut next.buildings, &diff.building_patches, &mut report);
        next.tick = diff.tick;

        self.current = Some(next);
        report
    }

    /// Current snapshot, once an init message has arrived.
    pub const fn snapshot(&self) -> Option<&WorldSnapshot> {
        self.current.as_ref()
    }

    /// Current tick; zero before the first snapshot.
    pub fn tick(&self) -> u64 {
        self.current.as_ref().map_or(0, |s| s.tick)
    }

    /// Drop all world state.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// Merge one patch collection into its snapshot collection.
fn merge_collection<K>(
    entities: &mut BTreeMap<K, EntityRecord>,
    patches: &BTreeMap<K, EntityRecord>,
    report: &mut DiffReport,
) where
    K: Ord + Clone + AsRef<str> + core::fmt::Display,
{
    for (key, patch) in patches {
        if let Some(existing) = entities.get_mut(key) {
            existing.merge(patch);
            report.patched = report.patched.saturating_add(1);
        } else if patch.stands_alone(key.as_ref()) {
            entities.insert(key.clone(), patch.clone());
            report.inserted = report.inserted.saturating_add(1);
        } else {
            debug!(entity = %key, "dropping patch for unknown incomplete entity");
            report.dropped = report.dropped.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarion_types::AgentId;
    use serde_json::{Value, json};

    fn record(value: Value) -> EntityRecord {
        match value {
            Value::Object(map) => EntityRecord::new(map),
            _ => EntityRecord::default(),
        }
    }

    fn seeded_store() -> WorldStore {
        let mut agents = BTreeMap::new();
        agents.insert(
            AgentId::new("a1"),
            record(json!({"id": "a1", "stress": 10, "location": "shelter"})),
        );
        agents.insert(
            AgentId::new("a2"),
            record(json!({"id": "a2", "stress": 20})),
        );
        let mut store = WorldStore::new();
        store.apply_full(WorldSnapshot {
            tick: 0,
            agents,
            buildings: BTreeMap::new(),
        });
        store
    }

    #[test]
    fn diff_before_snapshot_is_a_no_op() {
        let mut store = WorldStore::new();
        let mut diff = WorldDiff {
            tick: 5,
            ..WorldDiff::default()
        };
        diff.agent_patches
            .insert(AgentId::new("a1"), record(json!({"stress": 40})));

        let report = store.apply_diff(&diff);
        assert!(!report.applied);
        assert!(store.snapshot().is_none());
        assert_eq!(store.tick(), 0);
    }

    #[test]
    fn patch_merges_fields_and_leaves_others_untouched() {
        let mut store = seeded_store();
        let mut diff = WorldDiff {
            tick: 1,
            ..WorldDiff::default()
        };
        diff.agent_patches
            .insert(AgentId::new("a1"), record(json!({"stress": 40})));

        let report = store.apply_diff(&diff);
        assert_eq!(report.patched, 1);

        let snapshot = store.snapshot();
        let a1 = snapshot.and_then(|s| s.agents.get(&AgentId::new("a1")));
        assert_eq!(a1.and_then(|a| a.get_f64("stress")), Some(40.0));
        assert_eq!(a1.and_then(|a| a.get_str("location")), Some("shelter"));

        // Untouched entity is byte-for-byte identical.
        let a2 = snapshot.and_then(|s| s.agents.get(&AgentId::new("a2")));
        assert_eq!(a2.and_then(|a| a.get_f64("stress")), Some(20.0));
    }

    #[test]
    fn stand_alone_patch_inserts_new_entity() {
        let mut store = seeded_store();
        let mut diff = WorldDiff {
            tick: 2,
            ..WorldDiff::default()
        };
        diff.agent_patches.insert(
            AgentId::new("a9"),
            record(json!({"id": "a9", "name": "Dana"})),
        );

        let report = store.apply_diff(&diff);
        assert_eq!(report.inserted, 1);
        assert!(
            store
                .snapshot()
                .is_some_and(|s| s.agents.contains_key(&AgentId::new("a9")))
        );
    }

    #[test]
    fn incomplete_patch_for_unknown_entity_is_dropped() {
        let mut store = seeded_store();
        let mut diff = WorldDiff {
            tick: 2,
            ..WorldDiff::default()
        };
        diff.agent_patches
            .insert(AgentId::new("ghost"), record(json!({"stress": 99})));

        let report = store.apply_diff(&diff);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.inserted, 0);
        assert!(
            store
                .snapshot()
                .is_some_and(|s| !s.agents.contains_key(&AgentId::new("ghost")))
        );
        // The drop still advances the tick: the diff itself was valid.
        assert_eq!(store.tick(), 2);
    }

    #[test]
    fn tick_is_adopted_verbatim_even_backwards() {
        let mut store = seeded_store();
        let forward = WorldDiff {
            tick: 7,
            ..WorldDiff::default()
        };
        store.apply_diff(&forward);
        assert_eq!(store.tick(), 7);

        // The producer guarantees monotonic ticks; the store does not
        // second-guess a violation.
        let backward = WorldDiff {
            tick: 3,
            ..WorldDiff::default()
        };
        store.apply_diff(&backward);
        assert_eq!(store.tick(), 3);
    }

    #[test]
    fn applying_the_same_diff_twice_is_idempotent() {
        let mut store = seeded_store();
        let mut diff = WorldDiff {
            tick: 1,
            ..WorldDiff::default()
        };
        diff.agent_patches
            .insert(AgentId::new("a1"), record(json!({"stress": 40})));

        store.apply_diff(&diff);
        let once = store.snapshot().cloned();
        store.apply_diff(&diff);
        assert_eq!(store.snapshot().cloned(), once);
    }

    #[test]
    fn reset_drops_everything() {
        let mut store = seeded_store();
        store.reset();
        assert!(store.snapshot().is_none());
        assert_eq!(store.tick(), 0);
    }
}
