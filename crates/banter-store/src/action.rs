//! Transition records.
//!
//! A record is inert data describing something that already happened: a
//! server reply decoded, a push event translated, a caller intent noted.
//! Producers never touch state directly; they hand records to the store and
//! the reducer folds them in. Consumers match on the variants they care
//! about and ignore the rest, so new variants never break existing folds.

use banter_model::{ApiError, ChannelId, Post, PostId, PostList};

/// Remote operation kinds tracked by the request slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostOp {
    CreatePost,
    EditPost,
    DeletePost,
    GetPosts,
    GetPostsSince,
    GetPostsBefore,
    GetPostsAfter,
    GetPostThread,
}

impl PostOp {
    /// Stable snake_case name, used as a structured log field.
    pub fn as_str(self) -> &'static str {
        match self {
            PostOp::CreatePost => "create_post",
            PostOp::EditPost => "edit_post",
            PostOp::DeletePost => "delete_post",
            PostOp::GetPosts => "get_posts",
            PostOp::GetPostsSince => "get_posts_since",
            PostOp::GetPostsBefore => "get_posts_before",
            PostOp::GetPostsAfter => "get_posts_after",
            PostOp::GetPostThread => "get_post_thread",
        }
    }
}

/// Lifecycle step of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPhase {
    /// The call is in flight.
    Started,
    /// The call finished and its data records were dispatched with this one.
    Succeeded,
    /// The call failed with the given error body.
    Failed(ApiError),
}

/// A failed operation kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedError {
    /// The error body the operation failed with.
    pub error: ApiError,
    /// Epoch milliseconds at which the failure was recorded.
    pub logged_at: i64,
}

/// Everything the reducer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// One post arrived: a creation or edit result, or an edit push event.
    /// Folding this never re-sorts the channel order.
    PostReceived { post: Post },

    /// A page of posts arrived for `channel_id`. Folding this re-sorts the
    /// whole channel order, so it also repairs any drift left behind by
    /// earlier singular receives.
    PostsReceived { channel_id: ChannelId, list: PostList },

    /// A post was deleted at the server; it stays cached as a placeholder
    /// until something evicts it.
    PostDeleted { post: Post },

    /// A post and its same-channel comments should be evicted locally.
    PostRemoved { post: Post },

    /// The caller selected a post, or cleared the selection with `None`.
    PostSelected { post_id: Option<PostId> },

    /// Permalink navigation landed on a post, or left it with `None`.
    PostFocused { post_id: Option<PostId> },

    /// A remote operation moved through its lifecycle.
    Request { op: PostOp, phase: RequestPhase },

    /// A failed operation was recorded for diagnostics.
    ErrorLogged { entry: LoggedError },

    /// The session ended; every slice resets to its initial value.
    LoggedOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_names_are_snake_case() {
        let ops = [
            PostOp::CreatePost,
            PostOp::EditPost,
            PostOp::DeletePost,
            PostOp::GetPosts,
            PostOp::GetPostsSince,
            PostOp::GetPostsBefore,
            PostOp::GetPostsAfter,
            PostOp::GetPostThread,
        ];
        for op in ops {
            let name = op.as_str();
            assert!(!name.is_empty());
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
