//! Enumeration types shared across the Clarion workspace.
//!
//! Wire spellings follow the producer's feed contract: event categories and
//! end reasons are kebab-case, thread moods and message kinds are upper
//! snake case, bundle statuses are lowercase.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event Categories
// ---------------------------------------------------------------------------

/// Category tag carried by every timeline event.
///
/// The set is fixed by the feed contract; filtering and per-category
/// counting key off this tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    /// Official broadcast from town authorities.
    Official,
    /// Rumor propagation between residents.
    Rumor,
    /// A resident checking in on another.
    CheckIn,
    /// Emergency alert push.
    Alert,
    /// Ordinary resident conversation.
    Conversation,
    /// A resident moving between buildings.
    Movement,
    /// Producer housekeeping (phase changes, scripted beats).
    System,
}

impl EventCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Official,
        Self::Rumor,
        Self::CheckIn,
        Self::Alert,
        Self::Conversation,
        Self::Movement,
        Self::System,
    ];

    /// Wire spelling of the category.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Rumor => "rumor",
            Self::CheckIn => "check-in",
            Self::Alert => "alert",
            Self::Conversation => "conversation",
            Self::Movement => "movement",
            Self::System => "system",
        }
    }
}

// ---------------------------------------------------------------------------
// Thread Analysis
// ---------------------------------------------------------------------------

/// Mood classification of a conversation thread over its window.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadMood {
    /// Tension rising across the window.
    Escalating,
    /// Tension falling; the thread is calming down.
    Stabilizing,
    /// No clear direction.
    #[default]
    Neutral,
}

/// Dominant message kind tags attached to an analyzed thread.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// Rumor content.
    Rumor,
    /// Official-channel content.
    Official,
    /// Welfare check-in content.
    CheckIn,
    /// Emergency alert content.
    Alert,
    /// Everything else.
    Chat,
}

/// Delivery status of the end-of-run analytic bundle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BundleStatus {
    /// The pipeline has not finished yet.
    #[default]
    Pending,
    /// Complete bundle delivered.
    Ready,
    /// Analysis was switched off for this run.
    Disabled,
    /// The pipeline was unreachable.
    Unavailable,
    /// The pipeline failed mid-flight.
    Error,
}

// ---------------------------------------------------------------------------
// Run Lifecycle
// ---------------------------------------------------------------------------

/// Why a run ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// The town reached a stable information state before the clock ran out.
    Stabilized,
    /// Panic or misinformation crossed the producer's abort thresholds.
    Escalated,
    /// The scenario clock expired.
    TimeLimit,
}

impl EndReason {
    /// Wire spelling of the reason.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stabilized => "stabilized",
            Self::Escalated => "escalated",
            Self::TimeLimit => "time-limit",
        }
    }
}

/// Letter grade for a completed run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Grade {
    /// Exceptional: score 85 or above.
    S,
    /// Strong: score 70 to 84.
    A,
    /// Adequate: score 55 to 69.
    B,
    /// Poor: score below 55.
    C,
}

impl Grade {
    /// Map a stability score to a grade.
    ///
    /// Thresholds are a step function, total over the full score range.
    pub const fn for_score(score: u8) -> Self {
        if score >= 85 {
            Self::S
        } else if score >= 70 {
            Self::A
        } else if score >= 55 {
            Self::B
        } else {
            Self::C
        }
    }
}

impl core::fmt::Display for Grade {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let letter = match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        write!(f, "{letter}")
    }
}

// ---------------------------------------------------------------------------
// Gauges
// ---------------------------------------------------------------------------

/// Names of the tracked health gauges, including the overall stability
/// score. Used as the key for peak tracking and threshold checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Gauge {
    /// Share of residents reached by official messaging.
    OfficialReach,
    /// Share of vulnerable residents reached.
    VulnerableReach,
    /// Share of residents holding contradictory beliefs.
    Confusion,
    /// Penetration of active rumors.
    RumorSpread,
    /// Population-wide panic level.
    PanicIndex,
    /// Trust in official channels.
    TrustIndex,
    /// Share of residents believing misinformation.
    MisinfoBelief,
    /// Misdirected relief effort.
    ResourceMisallocation,
    /// Overall stability score.
    StabilityScore,
}

impl Gauge {
    /// All gauges, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::OfficialReach,
        Self::VulnerableReach,
        Self::Confusion,
        Self::RumorSpread,
        Self::PanicIndex,
        Self::TrustIndex,
        Self::MisinfoBelief,
        Self::ResourceMisallocation,
        Self::StabilityScore,
    ];

    /// Wire spelling of the gauge.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OfficialReach => "officialReach",
            Self::VulnerableReach => "vulnerableReach",
            Self::Confusion => "confusion",
            Self::RumorSpread => "rumorSpread",
            Self::PanicIndex => "panicIndex",
            Self::TrustIndex => "trustIndex",
            Self::MisinfoBelief => "misinfoBelief",
            Self::ResourceMisallocation => "resourceMisallocation",
            Self::StabilityScore => "stabilityScore",
        }
    }
}

impl core::fmt::Display for Gauge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.label())
    }
}
