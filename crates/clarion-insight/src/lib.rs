//! End-of-run interpretation for the Clarion companion core.
//!
//! Two pure entry points turn a completed run into human-facing output:
//! [`evaluate`] scores the run against fixed health targets and names the
//! dominant failure pattern, and [`classify`] turns the analytic bundle
//! into ranked narrative lists plus a single action hint. Both are total
//! over their inputs; degraded or missing analytics produce degraded
//! reports, never errors.
//!
//! # Modules
//!
//! - [`targets`] -- Threshold table: the nine health targets, their gap
//!   groups, and the tuning constants.
//! - [`outcome`] -- Score, grade, target checks, and failure diagnosis.
//! - [`classifier`] -- Concern/resolution/highlight lists and the hint
//!   chain.

pub mod classifier;
pub mod outcome;
pub mod targets;

pub use classifier::{ActionHint, HintKind, InsightReport, NA_SENTINEL, classify};
pub use outcome::{CheckResult, Diagnosis, GapScore, OutcomeReport, evaluate};
pub use targets::{CHECKS, CheckDirection, CheckSpec, GapGroup};
