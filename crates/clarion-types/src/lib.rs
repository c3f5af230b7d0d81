//! Shared type definitions for the Clarion companion core.
//!
//! This crate is the single source of truth for every payload that crosses
//! a boundary in the Clarion workspace: producer feed messages, merged
//! world state, health gauges, analytic bundles, and the derived run
//! summary handed to the presentation layer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for producer-assigned string keys
//! - [`enums`] -- Enumeration types (categories, moods, statuses, gauges)
//! - [`world`] -- Opaque entity records, world snapshots, and diffs
//! - [`timeline`] -- Timeline event payloads
//! - [`metrics`] -- Health gauges and the composite stability score
//! - [`analytics`] -- Conversation threads and cluster summaries
//! - [`messages`] -- The tagged producer feed message envelope
//! - [`outcome`] -- The derived end-of-run summary

pub mod analytics;
pub mod enums;
pub mod ids;
pub mod messages;
pub mod metrics;
pub mod outcome;
pub mod timeline;
pub mod world;

// Re-export all public types at crate root for convenience.
pub use analytics::{AnalyticBundle, ClusterSummary, ConversationThread, TickWindow};
pub use enums::{BundleStatus, EndReason, EventCategory, Gauge, Grade, MessageKind, ThreadMood};
pub use ids::{AgentId, BuildingId, ClusterId, MemoryId, RunId, ThreadId};
pub use messages::{FeedMessage, PopulationBreakdown, RunSummary};
pub use metrics::{HealthMetrics, MetricsSample, Peak};
pub use outcome::OutcomeSummary;
pub use timeline::TimelineEvent;
pub use world::{EntityRecord, WorldDiff, WorldSnapshot};
