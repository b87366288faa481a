//! Wire and data model for the banter client core.
//!
//! Everything here mirrors the chat server's JSON shapes: snake_case fields,
//! epoch-millisecond timestamps, empty strings for absent references. The
//! store and sync crates both build on these types; neither defines wire
//! shapes of its own.

pub mod error;
pub mod ids;
pub mod post;
pub mod preference;

pub use error::ApiError;
pub use ids::{ChannelId, PostId, UserId};
pub use post::{POST_CHUNK_SIZE, Post, PostLifecycle, PostList};
pub use preference::{CATEGORY_FLAGGED_POST, Preference};
