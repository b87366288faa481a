//! Push-event boundary.
//!
//! Socket handling, reconnects, and JSON decoding live outside this core;
//! what arrives here is an already-decoded event. Each event maps onto the
//! same records the REST pipeline dispatches, so pushed and fetched data
//! flow through one consistency model and the reducer cannot tell them
//! apart.

use banter_model::Post;
use banter_store::{Action, Dispatch};

/// A decoded server push event this core consumes.
///
/// Event kinds the decoder does not recognize never construct this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// A post appeared in some channel, authored by anyone.
    Posted { post: Post },
    /// An existing post's content changed.
    PostEdited { post: Post },
    /// A post was deleted at the server; its placeholder should remain.
    PostDeleted { post: Post },
}

impl From<PushEvent> for Action {
    fn from(event: PushEvent) -> Self {
        match event {
            // A pushed post goes through the batch path: pushes arrive for
            // every channel the user can see, often out of order relative
            // to local history, and the batch fold re-sorts.
            PushEvent::Posted { post } => Action::PostsReceived {
                channel_id: post.channel_id.clone(),
                list: post.into(),
            },
            // Edits keep their position, so the singular path fits.
            PushEvent::PostEdited { post } => Action::PostReceived { post },
            PushEvent::PostDeleted { post } => Action::PostDeleted { post },
        }
    }
}

/// Fold one push event into the store.
pub fn deliver(dispatcher: &dyn Dispatch, event: PushEvent) {
    dispatcher.dispatch(event.into());
}
