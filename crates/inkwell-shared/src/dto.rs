//! Data Transfer Objects - request/response types for the API.
//!
//! Wire field names are camelCase to match what the browser client sends
//! and expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::domain::{AuthorRef, Blog, LikerRef, User};
use inkwell_core::ports::{CommentNode, CommentThread, LikeOutcome, PagedResult};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public record; never carries the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_owned(),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
        }
    }
}

/// Response to register/login: a bearer token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Self-service profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Resolved author identity embedded in blog and comment responses.
/// `email` is only present on admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl AuthorDto {
    /// Public shape: no email, whatever the query resolved.
    pub fn public(author: &AuthorRef) -> Self {
        Self {
            id: author.id,
            username: author.username.clone(),
            email: None,
            avatar_url: author.avatar_url.clone(),
        }
    }

    /// Admin shape: email included.
    pub fn admin(author: &AuthorRef) -> Self {
        Self {
            id: author.id,
            username: author.username.clone(),
            email: author.email.clone(),
            avatar_url: author.avatar_url.clone(),
        }
    }
}

/// Identity of a user who liked a blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikerDto {
    pub id: Uuid,
    pub username: String,
}

impl From<&LikerRef> for LikerDto {
    fn from(liker: &LikerRef) -> Self {
        Self {
            id: liker.id,
            username: liker.username.clone(),
        }
    }
}

/// Request to create a blog. Status defaults to draft.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub status: Option<String>,
}

/// Partial blog update. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub status: Option<String>,
}

/// A blog as the API returns it. `likes` is only resolved on single-blog
/// fetches; list endpoints omit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub author: Option<AuthorDto>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<Vec<LikerDto>>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogResponse {
    pub fn new(blog: &Blog, author: Option<&AuthorRef>, admin_view: bool) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            content: blog.content.clone(),
            excerpt: blog.excerpt.clone(),
            author: author.map(|a| {
                if admin_view {
                    AuthorDto::admin(a)
                } else {
                    AuthorDto::public(a)
                }
            }),
            categories: blog.categories.clone(),
            tags: blog.tags.clone(),
            featured_image: blog.featured_image.clone(),
            status: blog.status.as_str().to_owned(),
            likes: None,
            likes_count: blog.likes_count,
            comments_count: blog.comments_count,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }

    pub fn with_likes(mut self, likers: &[LikerRef]) -> Self {
        self.likes = Some(likers.iter().map(LikerDto::from).collect());
        self
    }
}

/// Pagination envelope: `{items, totalPages, currentPage, total}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

impl<T> PageResponse<T> {
    pub fn new<S>(page: PagedResult<S>, map: impl Fn(&S) -> T) -> Self {
        Self {
            total_pages: page.total_pages(),
            current_page: page.page,
            total: page.total,
            items: page.items.iter().map(map).collect(),
        }
    }
}

/// Response to a like toggle on a blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes: Vec<Uuid>,
    pub likes_count: u64,
    pub has_liked: bool,
}

impl From<LikeOutcome> for LikeResponse {
    fn from(outcome: LikeOutcome) -> Self {
        Self {
            likes: outcome.likes,
            likes_count: outcome.likes_count,
            has_liked: outcome.now_liked,
        }
    }
}

/// Request to create a comment. `blog` is the target blog id;
/// `parent_comment` marks a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub blog: Option<Uuid>,
    #[serde(default)]
    pub content: String,
    pub parent_comment: Option<Uuid>,
}

/// Author-only comment edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: String,
}

/// A comment as the API returns it. Top-level comments carry their
/// direct replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub blog: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment: Option<Uuid>,
    pub content: String,
    pub author: Option<AuthorDto>,
    pub likes: Vec<Uuid>,
    pub likes_count: u64,
    pub is_edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn from_node(node: &CommentNode) -> Self {
        let comment = &node.comment;
        Self {
            id: comment.id,
            blog: comment.blog_id,
            parent_comment: comment.parent_id,
            content: comment.content.clone(),
            author: node.author.as_ref().map(AuthorDto::public),
            likes: node.likes.clone(),
            likes_count: node.likes.len() as u64,
            is_edited: comment.is_edited,
            replies: None,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }

    pub fn from_thread(thread: &CommentThread) -> Self {
        let mut top = Self::from_node(&thread.node);
        top.replies = Some(thread.replies.iter().map(Self::from_node).collect());
        top
    }
}

/// Admin role override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub role: String,
}

/// Admin status override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_blogs: u64,
    pub total_comments: u64,
    pub published_blogs: u64,
    pub draft_blogs: u64,
}

/// Admin dashboard payload: counters plus recent activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stats: DashboardStats,
    pub recent_blogs: Vec<BlogResponse>,
    pub recent_users: Vec<UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::domain::BlogStatus;

    #[test]
    fn blog_response_uses_camel_case_wire_names() {
        let mut blog = Blog::new(Uuid::new_v4(), "A".to_owned(), "B".to_owned());
        blog.status = BlogStatus::Published;
        let json = serde_json::to_value(BlogResponse::new(&blog, None, false)).unwrap();

        assert_eq!(json["status"], "published");
        assert!(json.get("likesCount").is_some());
        assert!(json.get("commentsCount").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("likes_count").is_none());
        // likes omitted unless resolved
        assert!(json.get("likes").is_none());
    }

    #[test]
    fn user_response_never_carries_the_hash() {
        let user = User::new("a".to_owned(), "a@b.c".to_owned(), "secret-hash".to_owned());
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn page_response_reports_envelope_fields() {
        let page = PagedResult {
            items: vec![1, 2, 3],
            total: 25,
            page: 2,
            limit: 10,
        };
        let resp = PageResponse::new(page, |n| *n);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["total"], 25);
        assert_eq!(json["items"].as_array().unwrap().len(), 3);
    }
}
