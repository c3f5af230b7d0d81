//! Configuration for the collaborator clients.
//!
//! All configuration is loaded from `CLARION_*` environment variables.
//! Every service block is optional: a missing URL disables that service,
//! it never raises. Only a present-but-malformed value is a config error.

use std::time::Duration;

use crate::error::ServiceError;

/// Default reasoning request deadline in milliseconds.
const REASONING_TIMEOUT_DEFAULT_MS: u64 = 7000;

/// Default embedding cooldown after a rate-limit response, in milliseconds.
const EMBED_COOLDOWN_DEFAULT_MS: u64 = 60_000;

/// Complete collaborator configuration loaded from the environment.
#[derive(Debug, Clone, Default)]
pub struct ServicesConfig {
    /// Reasoning service block, absent when disabled.
    pub reasoning: Option<ReasoningConfig>,
    /// Embedding service block, absent when disabled.
    pub embedding: Option<EmbeddingConfig>,
    /// Memory sink block, absent when disabled.
    pub memory: Option<MemoryConfig>,
}

/// Configuration for the reasoning service.
#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    /// Base URL of the reasoning endpoint.
    pub url: String,
    /// API key, when the endpoint requires one.
    pub api_key: Option<String>,
    /// Request deadline.
    pub timeout: Duration,
}

/// Configuration for the embedding service.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding endpoint.
    pub url: String,
    /// API key, when the endpoint requires one.
    pub api_key: Option<String>,
    /// How long to skip calls after a rate-limit response.
    pub cooldown: Duration,
}

/// Configuration for the memory sink.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Base URL of the sink endpoint.
    pub url: String,
}

impl ServicesConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables:
    /// - `CLARION_REASONING_URL` -- reasoning endpoint (absent: disabled)
    /// - `CLARION_REASONING_API_KEY` -- optional reasoning API key
    /// - `CLARION_REASONING_TIMEOUT_MS` -- request deadline (default 7000)
    /// - `CLARION_EMBED_URL` -- embedding endpoint (absent: disabled)
    /// - `CLARION_EMBED_API_KEY` -- optional embedding API key
    /// - `CLARION_EMBED_COOLDOWN_MS` -- rate-limit cooldown (default 60000)
    /// - `CLARION_MEMORY_URL` -- memory sink endpoint (absent: disabled)
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] only when a present variable fails
    /// to parse; absent blocks are not errors.
    pub fn from_env() -> Result<Self, ServiceError> {
        let reasoning = optional_env("CLARION_REASONING_URL")
            .map(|url| {
                Ok::<_, ServiceError>(ReasoningConfig {
                    url,
                    api_key: optional_env("CLARION_REASONING_API_KEY"),
                    timeout: duration_ms(
                        "CLARION_REASONING_TIMEOUT_MS",
                        REASONING_TIMEOUT_DEFAULT_MS,
                    )?,
                })
            })
            .transpose()?;

        let embedding = optional_env("CLARION_EMBED_URL")
            .map(|url| {
                Ok::<_, ServiceError>(EmbeddingConfig {
                    url,
                    api_key: optional_env("CLARION_EMBED_API_KEY"),
                    cooldown: duration_ms(
                        "CLARION_EMBED_COOLDOWN_MS",
                        EMBED_COOLDOWN_DEFAULT_MS,
                    )?,
                })
            })
            .transpose()?;

        let memory = optional_env("CLARION_MEMORY_URL").map(|url| MemoryConfig { url });

        Ok(Self {
            reasoning,
            embedding,
            memory,
        })
    }

    /// Configuration with every service disabled.
    pub const fn disabled() -> Self {
        Self {
            reasoning: None,
            embedding: None,
            memory: None,
        }
    }
}

/// Read an optional environment variable, treating empty values as absent.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read an optional duration variable in milliseconds.
fn duration_ms(name: &str, default_ms: u64) -> Result<Duration, ServiceError> {
    let Some(raw) = optional_env(name) else {
        return Ok(Duration::from_millis(default_ms));
    };
    let ms: u64 = raw
        .parse()
        .map_err(|e| ServiceError::Config(format!("invalid {name}: {e}")))?;
    Ok(Duration::from_millis(ms))
}
