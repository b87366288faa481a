//! The store: serialized folding plus change notification.

use tokio::sync::watch;
use tracing::debug;

use crate::action::Action;
use crate::reducer::reduce;
use crate::state::ClientState;

/// Record sink handed to producers.
///
/// Producers only ever submit records; giving them this trait instead of the
/// whole [`Store`] keeps them decoupled from state access and lets tests
/// observe record traffic directly.
pub trait Dispatch: Send + Sync {
    /// Fold one record.
    fn dispatch(&self, action: Action);

    /// Fold an ordered batch of records as one atomic step. Observers never
    /// see a state between two records of the same batch.
    fn dispatch_batch(&self, actions: Vec<Action>);
}

/// Holds the current [`ClientState`] and folds records into it.
///
/// Folds run inside the watch channel's send path, which serializes
/// concurrent submitters; each fold observes the previous fold's result.
/// Subscribers wake only when a fold actually moved the state, decided by
/// root identity rather than structural comparison.
#[derive(Debug)]
pub struct Store {
    tx: watch::Sender<ClientState>,
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ClientState::default());
        Self { tx }
    }

    /// Cheap snapshot of the current state. The snapshot shares structure
    /// with the live state and stays coherent while later folds land.
    pub fn state(&self) -> ClientState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every effective fold. Use
    /// `borrow_and_update` after `changed` to read the freshest state.
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.tx.subscribe()
    }

    fn fold(&self, actions: &[Action]) {
        self.tx.send_if_modified(|state| {
            let mut next = state.clone();
            for action in actions {
                next = reduce(&next, action);
            }
            let changed = !next.ptr_eq(state);
            if changed {
                *state = next;
            }
            debug!(records = actions.len(), changed, "folded transition records");
            changed
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, action: Action) {
        self.fold(std::slice::from_ref(&action));
    }

    fn dispatch_batch(&self, actions: Vec<Action>) {
        self.fold(&actions);
    }
}
