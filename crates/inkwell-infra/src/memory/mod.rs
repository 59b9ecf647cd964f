//! In-memory repositories.
//!
//! Backing store for two situations: running the server without a
//! `DATABASE_URL` (development mode) and exercising handlers in tests.
//! The same invariants hold as in the SQL adapters: like sets and
//! counters move together, cascades are applied atomically under one
//! write lock.

mod blogs;
mod comments;
mod users;

pub use blogs::MemoryBlogRepository;
pub use comments::MemoryCommentRepository;
pub use users::MemoryUserRepository;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{AuthorRef, Blog, Comment, User};

/// Shared state behind the in-memory repositories. Cascading deletes
/// span entity kinds, so the three repositories share one store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
pub(crate) struct StoreInner {
    pub users: HashMap<Uuid, User>,
    pub blogs: HashMap<Uuid, Blog>,
    pub comments: HashMap<Uuid, Comment>,
    /// Liker ids per blog, in insertion order.
    pub blog_likes: HashMap<Uuid, Vec<Uuid>>,
    /// Liker ids per comment, in insertion order.
    pub comment_likes: HashMap<Uuid, Vec<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(&self) -> MemoryUserRepository {
        MemoryUserRepository::new(self.clone())
    }

    pub fn blog_repo(&self) -> MemoryBlogRepository {
        MemoryBlogRepository::new(self.clone())
    }

    pub fn comment_repo(&self) -> MemoryCommentRepository {
        MemoryCommentRepository::new(self.clone())
    }

    pub(crate) fn inner(&self) -> &RwLock<StoreInner> {
        &self.inner
    }
}

impl StoreInner {
    /// Tolerates dangling author references left by user deletion.
    pub(crate) fn author_ref(&self, author_id: Uuid) -> Option<AuthorRef> {
        self.users.get(&author_id).map(|u| AuthorRef {
            id: u.id,
            username: u.username.clone(),
            email: Some(u.email.clone()),
            avatar_url: u.avatar_url.clone(),
        })
    }

    /// Remove a comment and its reply subtree; returns removed ids.
    pub(crate) fn remove_comment_tree(&mut self, id: Uuid) -> Vec<Uuid> {
        let mut removed = Vec::new();
        let mut queue = vec![id];
        while let Some(current) = queue.pop() {
            if self.comments.remove(&current).is_some() {
                self.comment_likes.remove(&current);
                removed.push(current);
                queue.extend(
                    self.comments
                        .values()
                        .filter(|c| c.parent_id == Some(current))
                        .map(|c| c.id)
                        .collect::<Vec<_>>(),
                );
            }
        }
        removed
    }

    /// Recompute a blog's comments_count from surviving rows.
    pub(crate) fn repair_comment_count(&mut self, blog_id: Uuid) {
        let count = self
            .comments
            .values()
            .filter(|c| c.blog_id == blog_id)
            .count() as i64;
        if let Some(blog) = self.blogs.get_mut(&blog_id) {
            blog.comments_count = count;
        }
    }
}
