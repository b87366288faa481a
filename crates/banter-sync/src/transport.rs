//! Capability boundaries the pipeline drives.
//!
//! Implementations own the wire: HTTP clients, auth headers, URL layout,
//! retries if any. The pipeline only sees typed results, so every trait here
//! is mockable in tests and swappable per deployment.

use async_trait::async_trait;
use banter_model::{ChannelId, Post, PostId, PostList, Preference, UserId};

use crate::error::Result;

/// Remote post operations.
#[async_trait]
pub trait PostTransport: Send + Sync {
    /// Publish a new post; the result carries the server-assigned id and
    /// stamps.
    async fn create_post(&self, post: &Post) -> Result<Post>;

    /// Replace an existing post's content; the result is the server's copy.
    async fn update_post(&self, post: &Post) -> Result<Post>;

    /// Delete a post at the server.
    async fn delete_post(&self, post_id: &PostId) -> Result<()>;

    /// One page of a channel's history, newest page first.
    async fn get_posts(&self, channel_id: &ChannelId, page: u64, per_page: u64)
    -> Result<PostList>;

    /// Every post in the channel changed after `since` (epoch milliseconds).
    async fn get_posts_since(&self, channel_id: &ChannelId, since: i64) -> Result<PostList>;

    /// A page of posts older than `post_id`.
    async fn get_posts_before(
        &self,
        channel_id: &ChannelId,
        post_id: &PostId,
        page: u64,
        per_page: u64,
    ) -> Result<PostList>;

    /// A page of posts newer than `post_id`.
    async fn get_posts_after(
        &self,
        channel_id: &ChannelId,
        post_id: &PostId,
        page: u64,
        per_page: u64,
    ) -> Result<PostList>;

    /// A thread: the root post plus its comments.
    async fn get_post_thread(&self, post_id: &PostId) -> Result<PostList>;
}

/// Profile and presence caches owned elsewhere in the client.
///
/// The pipeline only checks membership and asks for missing entries; it
/// never reads profile data itself.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether the profile cache already holds this user.
    fn has_profile(&self, user_id: &UserId) -> bool;

    /// Whether the presence cache already holds this user.
    fn has_status(&self, user_id: &UserId) -> bool;

    /// Fetch and cache the given profiles.
    async fn fetch_profiles_by_ids(&self, user_ids: Vec<UserId>) -> Result<()>;

    /// Fetch and cache the given presence statuses.
    async fn fetch_statuses_by_ids(&self, user_ids: Vec<UserId>) -> Result<()>;
}

/// Preference persistence behind flagging.
#[async_trait]
pub trait PreferenceService: Send + Sync {
    /// Persist the given preferences for the user.
    async fn save_preferences(&self, user_id: &UserId, preferences: Vec<Preference>)
    -> Result<()>;

    /// Remove the given preferences for the user.
    async fn delete_preferences(
        &self,
        user_id: &UserId,
        preferences: Vec<Preference>,
    ) -> Result<()>;
}

/// Session side effects that live outside this core.
#[async_trait]
pub trait SessionHooks: Send + Sync {
    /// Called when a call failed because the session expired, before the
    /// failure records go out. Token teardown and navigation happen here.
    async fn force_logout(&self);
}
