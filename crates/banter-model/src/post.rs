//! Post records and the multi-post wire shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, PostId, UserId};

/// Default page size for paged post fetches.
pub const POST_CHUNK_SIZE: u64 = 60;

/// Client-visible lifecycle of a post.
///
/// A soft-deleted post keeps its slot in the store as a placeholder until an
/// explicit removal; the flag is what UI layers key the placeholder off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostLifecycle {
    #[default]
    #[serde(rename = "")]
    Active,
    #[serde(rename = "DELETED")]
    Deleted,
}

/// A single chat message.
///
/// Timestamps are epoch milliseconds as the server reports them;
/// `delete_at == 0` means the post has not been deleted server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub user_id: UserId,
    pub channel_id: ChannelId,
    /// Post this one comments on; empty for top-level posts.
    #[serde(default)]
    pub root_id: PostId,
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub update_at: i64,
    #[serde(default)]
    pub delete_at: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub has_reactions: bool,
    #[serde(default)]
    pub state: PostLifecycle,
}

impl Post {
    /// True when this post is a comment on another post.
    pub fn is_reply(&self) -> bool {
        !self.root_id.is_empty()
    }

    /// True when the server has marked the post deleted.
    pub fn is_server_deleted(&self) -> bool {
        self.delete_at > 0
    }
}

/// Wire shape of every multi-post response: a map of posts plus the server's
/// page order.
///
/// The map can hold posts that are not in `order` (thread parents delivered
/// alongside a page of comments), so consumers that want everything iterate
/// the map; `order` only describes the requested window. Insertion order of
/// the map is the delivery order and is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostList {
    pub posts: IndexMap<PostId, Post>,
    pub order: Vec<PostId>,
}

impl PostList {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.get(id)
    }
}

/// A single-post page, the shape push delivery hands over.
impl From<Post> for PostList {
    fn from(post: Post) -> Self {
        let order = vec![post.id.clone()];
        let mut posts = IndexMap::new();
        posts.insert(post.id.clone(), post);
        Self { posts, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_deserializes_server_shape() -> Result<(), serde_json::Error> {
        let raw = r#"{
            "id": "p1",
            "user_id": "u1",
            "channel_id": "c1",
            "root_id": "",
            "create_at": 1500,
            "update_at": 1600,
            "delete_at": 0,
            "message": "hello there",
            "file_ids": ["f1"],
            "has_reactions": false,
            "state": ""
        }"#;

        let post: Post = serde_json::from_str(raw)?;
        assert_eq!(post.id, PostId::from("p1"));
        assert_eq!(post.state, PostLifecycle::Active);
        assert!(!post.is_reply());
        assert!(!post.is_server_deleted());
        Ok(())
    }

    #[test]
    fn missing_optional_fields_default() -> Result<(), serde_json::Error> {
        let raw = r#"{"id": "p2", "channel_id": "c1"}"#;
        let post: Post = serde_json::from_str(raw)?;
        assert_eq!(post.create_at, 0);
        assert!(post.file_ids.is_empty());
        assert_eq!(post.state, PostLifecycle::Active);
        Ok(())
    }

    #[test]
    fn deleted_lifecycle_round_trips() -> Result<(), serde_json::Error> {
        let mut post = Post {
            id: PostId::from("p3"),
            channel_id: ChannelId::from("c1"),
            ..Post::default()
        };
        post.state = PostLifecycle::Deleted;

        let json = serde_json::to_string(&post)?;
        assert!(json.contains("\"state\":\"DELETED\""));

        let back: Post = serde_json::from_str(&json)?;
        assert_eq!(back.state, PostLifecycle::Deleted);
        Ok(())
    }

    #[test]
    fn post_list_preserves_delivery_order() -> Result<(), serde_json::Error> {
        let raw = r#"{
            "posts": {
                "p2": {"id": "p2", "channel_id": "c1", "create_at": 200},
                "p1": {"id": "p1", "channel_id": "c1", "create_at": 100}
            },
            "order": ["p2", "p1"]
        }"#;

        let list: PostList = serde_json::from_str(raw)?;
        let ids: Vec<&PostId> = list.posts.keys().collect();
        assert_eq!(ids, [&PostId::from("p2"), &PostId::from("p1")]);
        assert_eq!(list.order.len(), 2);
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
        assert_eq!(list.get(&PostId::from("p1")).map(|p| p.create_at), Some(100));
        assert!(list.get(&PostId::from("ghost")).is_none());
        Ok(())
    }
}
