//! Client state.
//!
//! All collections are persistent (`im`), so a clone is a handle to the same
//! tree and an untouched slice keeps its root pointer across folds. Observers
//! lean on that: `ptr_eq` answers "did anything change" in O(1) without
//! walking the data, which is what keeps fold-time change detection and
//! per-slice memoization cheap.

use banter_model::{ApiError, ChannelId, Post, PostId};

use crate::action::{LoggedError, PostOp};

/// Normalized post replica.
///
/// `posts` is the single source of truth for post content; `posts_by_channel`
/// only holds ids. Every id in a channel order resolves in `posts`, and no id
/// appears twice in one order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsState {
    /// Every cached post by id. Carries no ordering semantics.
    pub posts: im::HashMap<PostId, Post>,
    /// Per-channel display order, most recent first by `create_at`.
    pub posts_by_channel: im::HashMap<ChannelId, im::Vector<PostId>>,
    /// Post the caller currently has selected, if any.
    pub selected_post_id: Option<PostId>,
    /// Post reached through permalink navigation, if any.
    pub current_focused_post_id: Option<PostId>,
}

impl PostsState {
    /// Look up one cached post.
    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.get(id)
    }

    /// Display order for one channel, if the channel has been seen.
    pub fn channel_order(&self, channel_id: &ChannelId) -> Option<&im::Vector<PostId>> {
        self.posts_by_channel.get(channel_id)
    }

    /// O(1) identity check across all four fields. True means no fold has
    /// touched this slice since the other handle was taken.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.posts.ptr_eq(&other.posts)
            && self.posts_by_channel.ptr_eq(&other.posts_by_channel)
            && self.selected_post_id == other.selected_post_id
            && self.current_focused_post_id == other.current_focused_post_id
    }
}

/// Status of one remote operation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// Never attempted this session.
    #[default]
    NotStarted,
    /// A call is in flight.
    InProgress,
    /// The last call succeeded.
    Success,
    /// The last call failed; the error is kept alongside.
    Failure,
}

/// Lifecycle snapshot of one operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub status: RequestStatus,
    /// Error body of the last failure. Cleared when the operation starts
    /// again.
    pub error: Option<ApiError>,
}

/// Request bookkeeping, one entry per operation kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestsState {
    by_op: im::HashMap<PostOp, RequestState>,
}

impl RequestsState {
    /// Status of the given operation; `NotStarted` when never attempted.
    pub fn status(&self, op: PostOp) -> RequestStatus {
        self.by_op.get(&op).map(|entry| entry.status).unwrap_or_default()
    }

    /// Error body of the given operation's last failure, if it is failed.
    pub fn error(&self, op: PostOp) -> Option<&ApiError> {
        self.by_op.get(&op).and_then(|entry| entry.error.as_ref())
    }

    /// O(1) identity check.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.by_op.ptr_eq(&other.by_op)
    }

    pub(crate) fn with_entry(&self, op: PostOp, entry: RequestState) -> Self {
        let mut next = self.clone();
        next.by_op.insert(op, entry);
        next
    }
}

/// Append-only log of failed operations, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLogState {
    entries: im::Vector<LoggedError>,
}

impl ErrorLogState {
    /// All recorded failures in arrival order.
    pub fn entries(&self) -> &im::Vector<LoggedError> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// O(1) identity check.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.entries.ptr_eq(&other.entries)
    }

    pub(crate) fn with_entry(&self, entry: LoggedError) -> Self {
        let mut next = self.clone();
        next.entries.push_back(entry);
        next
    }
}

/// Root state: the post replica plus request and diagnostic bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub posts: PostsState,
    pub requests: RequestsState,
    pub errors: ErrorLogState,
}

impl ClientState {
    /// True when no slice was touched relative to `other`. The store skips
    /// subscriber wakeups on folds where this holds.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.posts.ptr_eq(&other.posts)
            && self.requests.ptr_eq(&other.requests)
            && self.errors.ptr_eq(&other.errors)
    }
}

#[cfg(test)]
mod tests {
    use banter_model::Post;

    use super::*;

    #[test]
    fn clone_shares_every_root() {
        let mut state = PostsState::default();
        let post = Post {
            id: PostId::from("p1"),
            channel_id: ChannelId::from("c1"),
            ..Post::default()
        };
        state.posts.insert(post.id.clone(), post);

        let copy = state.clone();
        assert!(state.ptr_eq(&copy));
    }

    #[test]
    fn insert_detaches_the_touched_root_only() {
        let mut state = ClientState::default();
        state.posts.posts.insert(PostId::from("p1"), Post::default());

        let mut next = state.clone();
        next.posts.posts.insert(PostId::from("p2"), Post::default());

        assert!(!next.posts.ptr_eq(&state.posts));
        assert!(next.requests.ptr_eq(&state.requests));
        assert!(next.errors.ptr_eq(&state.errors));
    }

    #[test]
    fn request_accessors_default_when_absent() {
        let requests = RequestsState::default();
        assert_eq!(requests.status(PostOp::GetPosts), RequestStatus::NotStarted);
        assert!(requests.error(PostOp::GetPosts).is_none());
    }

    #[test]
    fn with_entry_replaces_in_place() {
        let requests = RequestsState::default().with_entry(
            PostOp::CreatePost,
            RequestState { status: RequestStatus::InProgress, error: None },
        );
        assert_eq!(requests.status(PostOp::CreatePost), RequestStatus::InProgress);

        let requests = requests.with_entry(
            PostOp::CreatePost,
            RequestState { status: RequestStatus::Success, error: None },
        );
        assert_eq!(requests.status(PostOp::CreatePost), RequestStatus::Success);
        assert!(requests.error(PostOp::CreatePost).is_none());
    }
}
