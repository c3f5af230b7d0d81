//! In-memory run state for the Clarion companion core.
//!
//! This crate owns the three bounded stores the session mutates as feed
//! messages arrive: the merged world snapshot, the timeline ring buffer,
//! and the metrics series. All operations are synchronous and total; the
//! single-writer discipline lives one level up, in the session.
//!
//! # Modules
//!
//! - [`world`] -- Entity merge store: full snapshots plus field-level diffs.
//! - [`timeline`] -- Bounded event log, newest first, with running
//!   per-category counts.
//! - [`series`] -- Bounded gauge history with per-gauge peak tracking.

pub mod series;
pub mod timeline;
pub mod world;

pub use series::{METRICS_CAPACITY, MetricsSeries};
pub use timeline::{TIMELINE_CAPACITY, TimelineLog};
pub use world::{DiffReport, WorldStore};
