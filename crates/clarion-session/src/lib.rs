//! Single-writer session loop for the Clarion companion core.
//!
//! One spawned worker owns the write path to a shared [`SessionState`]:
//! producer messages and resets are queued as commands, applied strictly
//! in arrival order, and echoed to live subscribers as notices. The
//! handle also answers on-demand questions (agent explanations, similar
//! memories) against the current state through the collaborator
//! services.
//!
//! # Modules
//!
//! - [`session`] -- Session state, message application, and the sealed
//!   final report.
//! - [`feed`] -- Feed decoding, the worker task, and the cloneable
//!   handle.

pub mod feed;
pub mod session;

pub use feed::{
    BROADCAST_CAPACITY, COMMAND_CAPACITY, SessionCommand, SessionHandle, decode_feed_message,
    spawn_session,
};
pub use session::{FinalReport, SessionNotice, SessionState};
