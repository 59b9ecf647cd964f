use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Blog publication state. Both transitions of `draft ⇄ published` are
/// always available to the owner or an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
        }
    }

    /// Parse a status from its wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(BlogStatus::Draft),
            "published" => Some(BlogStatus::Published),
            _ => None,
        }
    }
}

/// Blog entity - a user-authored post with a draft/published lifecycle.
///
/// `likes_count` mirrors the number of rows in the likers set and
/// `comments_count` the number of comments referencing this blog; the
/// repositories maintain both inside the mutating transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub status: BlogStatus,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new blog with generated ID and zeroed counters.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            excerpt: None,
            categories: Vec::new(),
            tags: Vec::new(),
            featured_image: None,
            status: BlogStatus::Draft,
            likes_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_exactly_two_values() {
        assert_eq!(BlogStatus::parse("draft"), Some(BlogStatus::Draft));
        assert_eq!(BlogStatus::parse("published"), Some(BlogStatus::Published));
        assert_eq!(BlogStatus::parse("archived"), None);
    }

    #[test]
    fn new_blog_starts_as_unliked_draft() {
        let blog = Blog::new(Uuid::new_v4(), "Title".to_owned(), "Body".to_owned());
        assert_eq!(blog.status, BlogStatus::Draft);
        assert_eq!(blog.likes_count, 0);
        assert_eq!(blog.comments_count, 0);
    }
}
