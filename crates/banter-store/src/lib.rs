//! Normalized client state for banter and the reducer that maintains it.
//!
//! The flow is one-directional: producers (the sync pipeline, push event
//! translation, caller intents) submit [`Action`] records to a [`Store`],
//! the pure [`reduce`] function folds each record into [`ClientState`], and
//! observers watch the store for states that actually changed.

pub mod action;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::{Action, LoggedError, PostOp, RequestPhase};
pub use reducer::reduce;
pub use state::{
    ClientState, ErrorLogState, PostsState, RequestState, RequestStatus, RequestsState,
};
pub use store::{Dispatch, Store};
