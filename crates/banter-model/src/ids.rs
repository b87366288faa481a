//! Newtype identifiers for server-assigned entity keys.
//!
//! The server hands out opaque string ids; the newtypes keep a post id from
//! being passed where a channel id belongs. An empty id means "no reference"
//! on the wire (e.g. `root_id` of a top-level post).

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for the wire's "no reference" value.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id! {
    /// Identifier of a single post.
    PostId
}

string_id! {
    /// Identifier of the channel (conversation) owning a set of posts.
    ChannelId
}

string_id! {
    /// Identifier of a user account.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_transparently() -> Result<(), serde_json::Error> {
        let id = PostId::from("abc123");
        let json = serde_json::to_string(&id)?;
        assert_eq!(json, "\"abc123\"");

        let back: PostId = serde_json::from_str(&json)?;
        assert_eq!(back, id);
        Ok(())
    }

    #[test]
    fn default_id_is_empty() {
        assert!(PostId::default().is_empty());
        assert!(!ChannelId::from("town-square").is_empty());
    }
}
