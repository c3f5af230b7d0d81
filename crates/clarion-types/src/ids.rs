//! Type-safe wrappers for producer-assigned entity keys.
//!
//! The simulation producer assigns stable string keys to everything it
//! streams (`"a1"`, `"clinic"`, `"th-04"`). Wrapping them in distinct
//! newtypes prevents accidental mixing of agent, building, thread, and
//! cluster keys at compile time. The one locally-minted identifier is
//! [`RunId`], which uses UUID v7 (time-ordered) so runs sort
//! chronologically.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a producer-assigned string key.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a producer-assigned key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// View the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner key.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }
    };
}

define_key! {
    /// Key of an agent (a simulated resident) in the producer's world.
    AgentId
}

define_key! {
    /// Key of a building (shelter, clinic, town hall) in the producer's world.
    BuildingId
}

define_key! {
    /// Key of an analyzed conversation thread in the analytic bundle.
    ThreadId
}

define_key! {
    /// Key of a message cluster in the analytic bundle.
    ClusterId
}

define_key! {
    /// Key of a stored memory record in the external memory service.
    MemoryId
}

/// Unique identifier for one observed run of the simulation.
///
/// Minted locally when a session starts, not assigned by the producer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Mint a new run identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<RunId> for Uuid {
    fn from(id: RunId) -> Self {
        id.0
    }
}
