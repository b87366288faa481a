//! User preference records.
//!
//! The sync engine only writes one preference category itself (flagged
//! posts); the type is the server's generic preference shape so the
//! preference collaborator can reuse it.

use serde::{Deserialize, Serialize};

use crate::ids::{PostId, UserId};

/// Preference category marking a post as flagged/saved by the user.
pub const CATEGORY_FLAGGED_POST: &str = "flagged_post";

/// A single user preference entry, keyed by (user, category, name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub user_id: UserId,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Preference {
    /// The flag marker for a post. Deleting the same record clears the flag;
    /// the server keys preferences by (user, category, name) and ignores the
    /// value on delete.
    pub fn flagged_post(user_id: &UserId, post_id: &PostId) -> Self {
        Self {
            user_id: user_id.clone(),
            category: CATEGORY_FLAGGED_POST.to_string(),
            name: post_id.to_string(),
            value: "true".to_string(),
        }
    }
}
