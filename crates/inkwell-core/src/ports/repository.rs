//! Repository ports for users, blogs and comments.
//!
//! Multi-step mutations (like toggles, counter maintenance, cascading
//! deletes) are part of the repository contract so every backend can make
//! them atomic with the means it has.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthorRef, Blog, BlogStatus, Comment, LikerRef, Role, User};
use crate::error::RepoError;

/// A page request, 1-based.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 100),
        }
    }

    /// Number of rows preceding this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One page of results plus the totals callers need for the envelope.
#[derive(Debug, Clone)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> PagedResult<T> {
    /// `ceil(total / limit)`.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}

/// Whitelisted sort keys for blog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSort {
    #[default]
    CreatedAt,
    Title,
    Likes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter for the public blog listing. `search` is a case-insensitive
/// substring match over title, content and tags; `category` is exact
/// membership in the categories set.
#[derive(Debug, Clone, Default)]
pub struct BlogQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: BlogSort,
    pub order: SortOrder,
}

/// Partial update for a blog. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub status: Option<BlogStatus>,
}

/// Partial update for a user profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Result of a like toggle.
#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub likes: Vec<Uuid>,
    pub likes_count: u64,
    pub now_liked: bool,
}

/// Aggregate blog counts for the admin dashboard.
#[derive(Debug, Clone, Copy)]
pub struct BlogCounts {
    pub total: u64,
    pub published: u64,
    pub drafts: u64,
}

/// A comment with its author resolved and its liker set.
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub comment: Comment,
    pub author: Option<AuthorRef>,
    pub likes: Vec<Uuid>,
}

/// A top-level comment with its direct replies in insertion order.
#[derive(Debug, Clone)]
pub struct CommentThread {
    pub node: CommentNode,
    pub replies: Vec<CommentNode>,
}

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn insert(&self, user: User) -> Result<User, RepoError>;

    /// Self-service profile update. Fails `NotFound` if the user is gone.
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, RepoError>;

    /// All users, newest first.
    async fn list_all(&self) -> Result<Vec<User>, RepoError>;

    /// The `limit` most recently created users.
    async fn recent(&self, limit: u64) -> Result<Vec<User>, RepoError>;

    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, RepoError>;

    /// Delete the user, the user's blogs (with their comments) and the
    /// user's comments elsewhere, atomically. Blogs that lose comments
    /// this way get their `comments_count` repaired.
    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}

/// Blog repository.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Published blogs only, filtered and paginated.
    async fn list_published(
        &self,
        query: &BlogQuery,
        page: PageRequest,
    ) -> Result<PagedResult<(Blog, Option<AuthorRef>)>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<(Blog, Option<AuthorRef>)>, RepoError>;

    /// Identities of everyone who liked the blog.
    async fn likers(&self, id: Uuid) -> Result<Vec<LikerRef>, RepoError>;

    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError>;

    /// Merge the provided fields and bump `updated_at`.
    async fn update(&self, id: Uuid, changes: BlogChanges) -> Result<Blog, RepoError>;

    /// Delete the blog and every comment referencing it, atomically.
    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError>;

    /// Idempotent like toggle; the liker set and `likes_count` move in the
    /// same transaction and can never diverge.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError>;

    /// Published blogs by one author, newest first.
    async fn list_by_author(
        &self,
        author_id: Uuid,
    ) -> Result<Vec<(Blog, Option<AuthorRef>)>, RepoError>;

    /// Every blog regardless of status, newest first (admin listing).
    async fn list_all(
        &self,
        page: PageRequest,
    ) -> Result<PagedResult<(Blog, Option<AuthorRef>)>, RepoError>;

    async fn set_status(&self, id: Uuid, status: BlogStatus) -> Result<Blog, RepoError>;

    /// The `limit` most recently created blogs (admin dashboard).
    async fn recent(&self, limit: u64) -> Result<Vec<(Blog, Option<AuthorRef>)>, RepoError>;

    async fn counts(&self) -> Result<BlogCounts, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Top-level comments newest first, each with its direct replies in
    /// insertion order.
    async fn list_for_blog(&self, blog_id: Uuid) -> Result<Vec<CommentThread>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    /// Persist the comment and increment the blog's `comments_count` in
    /// the same transaction. The caller validates blog and parent first.
    async fn insert(&self, comment: Comment) -> Result<CommentNode, RepoError>;

    /// Author-only content edit; sets `is_edited`.
    async fn update_content(&self, id: Uuid, content: String) -> Result<CommentNode, RepoError>;

    /// Delete the comment and its reply subtree, restoring the blog's
    /// `comments_count` to the surviving row count, atomically.
    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError>;

    /// Idempotent like toggle; the count is the liker set size.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}
