//! The action pipeline: remote post operations in, transition records out.
//!
//! Every operation follows the same skeleton. Dispatch a started record,
//! await the transport, then dispatch one batch holding the data records and
//! the success record so observers see the outcome atomically. Failures
//! never bubble out of the pipeline: they become failure records plus a
//! diagnostic entry, and the operation returns `None`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use banter_model::{ChannelId, POST_CHUNK_SIZE, Post, PostId, PostList, Preference, UserId};
use banter_store::{Action, Dispatch, LoggedError, PostOp, RequestPhase};
use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::transport::{PostTransport, PreferenceService, SessionHooks, UserDirectory};

/// Pipeline tunables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Page size for history fetches that do not specify one.
    pub per_page: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { per_page: POST_CHUNK_SIZE }
    }
}

/// Drives remote post operations and feeds their outcomes to the store.
///
/// Holds no post state of its own; everything observable lands in the store
/// through the dispatcher. Cheap to share behind an `Arc` and safe to drive
/// from concurrent tasks, since the store serializes folds.
pub struct PostActions {
    transport: Arc<dyn PostTransport>,
    users: Arc<dyn UserDirectory>,
    preferences: Arc<dyn PreferenceService>,
    session: Arc<dyn SessionHooks>,
    dispatcher: Arc<dyn Dispatch>,
    config: SyncConfig,
}

impl PostActions {
    pub fn new(
        transport: Arc<dyn PostTransport>,
        users: Arc<dyn UserDirectory>,
        preferences: Arc<dyn PreferenceService>,
        session: Arc<dyn SessionHooks>,
        dispatcher: Arc<dyn Dispatch>,
    ) -> Self {
        Self::with_config(
            transport,
            users,
            preferences,
            session,
            dispatcher,
            SyncConfig::default(),
        )
    }

    pub fn with_config(
        transport: Arc<dyn PostTransport>,
        users: Arc<dyn UserDirectory>,
        preferences: Arc<dyn PreferenceService>,
        session: Arc<dyn SessionHooks>,
        dispatcher: Arc<dyn Dispatch>,
        config: SyncConfig,
    ) -> Self {
        Self { transport, users, preferences, session, dispatcher, config }
    }

    /// Publish a new post. On success the server's copy (with its assigned
    /// id and stamps) is folded into the store and returned.
    pub async fn create_post(&self, draft: &Post) -> Option<Post> {
        self.execute(PostOp::CreatePost, self.transport.create_post(draft), |created| {
            vec![Action::PostReceived { post: created.clone() }]
        })
        .await
    }

    /// Replace a post's content. The server's copy wins over the draft.
    pub async fn edit_post(&self, post: &Post) -> Option<Post> {
        self.execute(PostOp::EditPost, self.transport.update_post(post), |updated| {
            vec![Action::PostReceived { post: updated.clone() }]
        })
        .await
    }

    /// Delete a post at the server, then fold the placeholder conversion.
    pub async fn delete_post(&self, post: &Post) -> Option<()> {
        self.execute(PostOp::DeletePost, self.transport.delete_post(&post.id), |_| {
            vec![Action::PostDeleted { post: post.clone() }]
        })
        .await
    }

    /// One page of a channel's history.
    pub async fn get_posts(
        &self,
        channel_id: &ChannelId,
        page: u64,
        per_page: u64,
    ) -> Option<PostList> {
        self.fetch_posts(
            PostOp::GetPosts,
            channel_id.clone(),
            self.transport.get_posts(channel_id, page, per_page),
        )
        .await
    }

    /// First page of a channel's history at the configured page size.
    pub async fn get_latest_posts(&self, channel_id: &ChannelId) -> Option<PostList> {
        self.get_posts(channel_id, 0, self.config.per_page).await
    }

    /// Every post changed after `since` (epoch milliseconds), including
    /// server-deleted ones the fold then skips.
    pub async fn get_posts_since(&self, channel_id: &ChannelId, since: i64) -> Option<PostList> {
        self.fetch_posts(
            PostOp::GetPostsSince,
            channel_id.clone(),
            self.transport.get_posts_since(channel_id, since),
        )
        .await
    }

    /// A page of posts older than `post_id`.
    pub async fn get_posts_before(
        &self,
        channel_id: &ChannelId,
        post_id: &PostId,
        page: u64,
        per_page: u64,
    ) -> Option<PostList> {
        self.fetch_posts(
            PostOp::GetPostsBefore,
            channel_id.clone(),
            self.transport.get_posts_before(channel_id, post_id, page, per_page),
        )
        .await
    }

    /// A page of posts newer than `post_id`.
    pub async fn get_posts_after(
        &self,
        channel_id: &ChannelId,
        post_id: &PostId,
        page: u64,
        per_page: u64,
    ) -> Option<PostList> {
        self.fetch_posts(
            PostOp::GetPostsAfter,
            channel_id.clone(),
            self.transport.get_posts_after(channel_id, post_id, page, per_page),
        )
        .await
    }

    /// A thread by its root post id. The batch is keyed by the root's
    /// channel, which every reply shares.
    pub async fn get_post_thread(&self, post_id: &PostId) -> Option<PostList> {
        let op = PostOp::GetPostThread;
        debug!(op = op.as_str(), post_id = post_id.as_str(), "post operation started");
        self.dispatcher
            .dispatch(Action::Request { op, phase: RequestPhase::Started });

        let list = match self.transport.get_post_thread(post_id).await {
            Ok(list) => list,
            Err(error) => {
                self.fail(op, &error).await;
                return None;
            }
        };

        let Some(channel_id) = list.get(post_id).map(|root| root.channel_id.clone())
        else {
            let error = TransportError::Protocol(format!(
                "thread for {post_id} is missing its root post"
            ));
            self.fail(op, &error).await;
            return None;
        };

        self.finish_fetch(op, channel_id, list).await
    }

    /// Evict a post and its same-channel comments from the replica. Local
    /// only; the server is not involved.
    pub fn remove_post(&self, post: &Post) {
        self.dispatcher.dispatch(Action::PostRemoved { post: post.clone() });
    }

    /// Mark a post as the caller's current selection.
    pub fn select_post(&self, post_id: &PostId) {
        self.dispatcher
            .dispatch(Action::PostSelected { post_id: Some(post_id.clone()) });
    }

    /// Clear the current selection.
    pub fn deselect_post(&self) {
        self.dispatcher.dispatch(Action::PostSelected { post_id: None });
    }

    /// Mark the post permalink navigation landed on.
    pub fn focus_post(&self, post_id: &PostId) {
        self.dispatcher
            .dispatch(Action::PostFocused { post_id: Some(post_id.clone()) });
    }

    /// Leave the focused post.
    pub fn unfocus_post(&self) {
        self.dispatcher.dispatch(Action::PostFocused { post_id: None });
    }

    /// Flag a post for the user. Post state is untouched; flags live in the
    /// preference store.
    pub async fn flag_post(&self, user_id: &UserId, post_id: &PostId) -> Option<()> {
        let preference = Preference::flagged_post(user_id, post_id);
        let outcome = self.preferences.save_preferences(user_id, vec![preference]).await;
        self.finish_preference_write("flag post", post_id, outcome).await
    }

    /// Remove a post's flag for the user.
    pub async fn unflag_post(&self, user_id: &UserId, post_id: &PostId) -> Option<()> {
        let preference = Preference::flagged_post(user_id, post_id);
        let outcome = self.preferences.delete_preferences(user_id, vec![preference]).await;
        self.finish_preference_write("unflag post", post_id, outcome).await
    }

    async fn finish_preference_write(
        &self,
        what: &str,
        post_id: &PostId,
        outcome: Result<()>,
    ) -> Option<()> {
        match outcome {
            Ok(()) => Some(()),
            Err(error) => {
                warn!(post_id = post_id.as_str(), error = %error, "{what} failed");
                self.handle_session_expiry(&error).await;
                None
            }
        }
    }

    /// Shared skeleton for the single-post operations.
    async fn execute<T, F>(
        &self,
        op: PostOp,
        call: F,
        records: impl FnOnce(&T) -> Vec<Action>,
    ) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        debug!(op = op.as_str(), "post operation started");
        self.dispatcher
            .dispatch(Action::Request { op, phase: RequestPhase::Started });

        match call.await {
            Ok(payload) => {
                let mut batch = records(&payload);
                batch.push(Action::Request { op, phase: RequestPhase::Succeeded });
                self.dispatcher.dispatch_batch(batch);
                Some(payload)
            }
            Err(error) => {
                self.fail(op, &error).await;
                None
            }
        }
    }

    /// Shared skeleton for the page fetches: call, prefetch authors, fold.
    async fn fetch_posts<F>(
        &self,
        op: PostOp,
        channel_id: ChannelId,
        call: F,
    ) -> Option<PostList>
    where
        F: Future<Output = Result<PostList>>,
    {
        debug!(op = op.as_str(), channel_id = channel_id.as_str(), "post operation started");
        self.dispatcher
            .dispatch(Action::Request { op, phase: RequestPhase::Started });

        match call.await {
            Ok(list) => self.finish_fetch(op, channel_id, list).await,
            Err(error) => {
                self.fail(op, &error).await;
                None
            }
        }
    }

    async fn finish_fetch(
        &self,
        op: PostOp,
        channel_id: ChannelId,
        list: PostList,
    ) -> Option<PostList> {
        self.prefetch_authors(&list).await;

        self.dispatcher.dispatch_batch(vec![
            Action::PostsReceived { channel_id, list: list.clone() },
            Action::Request { op, phase: RequestPhase::Succeeded },
        ]);
        Some(list)
    }

    /// Warm the profile and presence caches for every distinct author in
    /// the page. Failures are logged and swallowed; the posts already
    /// arrived and still have to land.
    async fn prefetch_authors(&self, list: &PostList) {
        let mut missing_profiles: Vec<UserId> = Vec::new();
        let mut missing_statuses: Vec<UserId> = Vec::new();
        for post in list.posts.values() {
            if !self.users.has_profile(&post.user_id)
                && !missing_profiles.contains(&post.user_id)
            {
                missing_profiles.push(post.user_id.clone());
            }
            if !self.users.has_status(&post.user_id)
                && !missing_statuses.contains(&post.user_id)
            {
                missing_statuses.push(post.user_id.clone());
            }
        }

        if !missing_profiles.is_empty()
            && let Err(error) = self.users.fetch_profiles_by_ids(missing_profiles).await
        {
            warn!(error = %error, "profile prefetch failed");
        }
        if !missing_statuses.is_empty()
            && let Err(error) = self.users.fetch_statuses_by_ids(missing_statuses).await
        {
            warn!(error = %error, "status prefetch failed");
        }
    }

    /// Turn a failure into records: failed phase plus a diagnostic entry,
    /// preceded by a session reset when the server revoked us.
    async fn fail(&self, op: PostOp, error: &TransportError) {
        warn!(op = op.as_str(), error = %error, "post operation failed");
        self.handle_session_expiry(error).await;

        let api_error = error.to_api_error();
        self.dispatcher.dispatch_batch(vec![
            Action::Request { op, phase: RequestPhase::Failed(api_error.clone()) },
            Action::ErrorLogged {
                entry: LoggedError { error: api_error, logged_at: now_ms() },
            },
        ]);
    }

    async fn handle_session_expiry(&self, error: &TransportError) {
        if !error.is_session_expired() {
            return;
        }
        warn!("session expired, forcing logout");
        self.session.force_logout().await;
        self.dispatcher.dispatch(Action::LoggedOut);
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
