use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - attached to a blog, optionally replying to another
/// comment. `parent_id = None` marks a top-level comment that owns a
/// reply thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub author_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment with generated ID.
    pub fn new(author_id: Uuid, blog_id: Uuid, content: String, parent_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            blog_id,
            author_id,
            parent_id,
            content,
            is_edited: false,
            created_at: now,
            updated_at: now,
        }
    }
}
