//! External collaborator clients for the Clarion companion core.
//!
//! The core treats its collaborators as black boxes over HTTP: a
//! reasoning backend that explains agent behavior, an embedding backend
//! that vectorizes text and answers neighbor queries, and a durable sink
//! for derived records. Every client is an enum over `Disabled` and a
//! remote variant; absent configuration disables a service, it never
//! errors. Degradation (rate limits, cooldowns) resolves to quiet `None`
//! or empty results, and only hard failures surface as [`ServiceError`].
//!
//! # Modules
//!
//! - [`config`] -- `CLARION_*` environment loading.
//! - [`error`] -- The shared error type.
//! - [`reasoning`] -- Explain-agent client with a pure local fallback.
//! - [`embedding`] -- Embed and neighbor queries behind a cooldown gate.
//! - [`memory`] -- Keyed upsert sink for derived records.
//! - [`set`] -- The composed three-client set.

pub mod config;
pub mod embedding;
pub mod error;
pub mod memory;
pub mod reasoning;
pub mod set;

pub use config::{EmbeddingConfig, MemoryConfig, ReasoningConfig, ServicesConfig};
pub use embedding::{CooldownGate, EmbeddingService, Neighbor, RemoteEmbedder};
pub use error::ServiceError;
pub use memory::{HttpSink, MemoryRecord, MemorySink};
pub use reasoning::{
    AgentExplanation, ExplainRequest, MemoryRef, ReasoningService, RemoteReasoner,
    fallback_explanation,
};
pub use set::ServiceSet;
