//! The composed collaborator set.
//!
//! One struct owning all three clients, built from one configuration.
//! Shared behind an `Arc` by the session layer; every client method takes
//! `&self`, so no locking is needed above this crate.

use std::sync::Arc;

use tracing::debug;

use crate::config::ServicesConfig;
use crate::embedding::EmbeddingService;
use crate::error::ServiceError;
use crate::memory::{MemoryRecord, MemorySink};
use crate::reasoning::ReasoningService;

/// All three collaborator clients.
pub struct ServiceSet {
    /// Reasoning backend.
    pub reasoning: ReasoningService,
    /// Embedding backend.
    pub embedding: EmbeddingService,
    /// Durable record sink.
    pub memory: MemorySink,
}

impl ServiceSet {
    /// Build the set from a loaded configuration.
    pub fn from_config(config: &ServicesConfig) -> Self {
        Self {
            reasoning: ReasoningService::from_config(config.reasoning.as_ref()),
            embedding: EmbeddingService::from_config(config.embedding.as_ref()),
            memory: MemorySink::from_config(config.memory.as_ref()),
        }
    }

    /// Build the set straight from `CLARION_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] when a present variable is
    /// malformed; absent blocks simply disable their service.
    pub fn from_env() -> Result<Self, ServiceError> {
        Ok(Self::from_config(&ServicesConfig::from_env()?))
    }

    /// A set with every service disabled.
    pub fn disabled() -> Self {
        Self::from_config(&ServicesConfig::disabled())
    }

    /// Embed and persist a derived record off the hot path.
    ///
    /// Fire and forget: the work runs on a detached task, failures are
    /// logged at `debug` and never surface to the caller. A disabled sink
    /// skips the spawn entirely, so this is safe to call outside a
    /// runtime when storage is not configured.
    pub fn store_detached(self: &Arc<Self>, mut record: MemoryRecord) {
        if !self.memory.is_enabled() {
            debug!(id = %record.id, "memory sink disabled, dropping record");
            return;
        }
        let services = Arc::clone(self);
        tokio::spawn(async move {
            if record.embedding.is_none() {
                record.embedding = services
                    .embedding
                    .embed(&record.text)
                    .await
                    .unwrap_or_else(|error| {
                        debug!(error = %error, "embedding for stored record failed");
                        None
                    });
            }
            if let Err(error) = services.memory.upsert(&record).await {
                debug!(error = %error, id = %record.id, "memory upsert failed");
            }
        });
    }
}
