//! Domain entities - the core business objects.

mod blog;

mod comment;

mod user;

pub use blog::{Blog, BlogStatus};
pub use comment::Comment;
pub use user::{Role, User};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resolved author identity attached to blogs and comments.
///
/// `email` is only populated on admin-facing queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

/// Minimal identity of a user who liked something.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikerRef {
    pub id: Uuid,
    pub username: String,
}
