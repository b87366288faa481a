//! The action pipeline for the banter client core.
//!
//! This crate drives remote post operations and feeds their outcomes to a
//! `banter_store::Store` as transition records. The transport, the user
//! directory, preference persistence, and session teardown are capability
//! traits implemented by the embedding client; the pipeline owns only the
//! orchestration: request lifecycle records, author prefetching, session
//! expiry handling, and push event translation.

pub mod actions;
pub mod error;
pub mod push;
pub mod transport;

pub use actions::{PostActions, SyncConfig};
pub use error::{Result, TransportError};
pub use push::{PushEvent, deliver};
pub use transport::{PostTransport, PreferenceService, SessionHooks, UserDirectory};
