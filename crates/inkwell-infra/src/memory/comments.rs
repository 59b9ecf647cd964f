//! In-memory comment repository.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use inkwell_core::domain::Comment;
use inkwell_core::error::RepoError;
use inkwell_core::ports::{CommentNode, CommentRepository, CommentThread, LikeOutcome};

use super::{MemoryStore, StoreInner};

pub struct MemoryCommentRepository {
    store: MemoryStore,
}

impl MemoryCommentRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    fn node_for(inner: &StoreInner, comment: Comment) -> CommentNode {
        let author = inner.author_ref(comment.author_id);
        let likes = inner
            .comment_likes
            .get(&comment.id)
            .cloned()
            .unwrap_or_default();
        CommentNode {
            comment,
            author,
            likes,
        }
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn list_for_blog(&self, blog_id: Uuid) -> Result<Vec<CommentThread>, RepoError> {
        let inner = self.store.inner().read().await;

        let mut top_level: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.blog_id == blog_id && c.parent_id.is_none())
            .cloned()
            .collect();
        top_level.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(top_level
            .into_iter()
            .map(|comment| {
                let mut replies: Vec<Comment> = inner
                    .comments
                    .values()
                    .filter(|c| c.parent_id == Some(comment.id))
                    .cloned()
                    .collect();
                replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                CommentThread {
                    node: Self::node_for(&inner, comment),
                    replies: replies
                        .into_iter()
                        .map(|r| Self::node_for(&inner, r))
                        .collect(),
                }
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let inner = self.store.inner().read().await;
        Ok(inner.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<CommentNode, RepoError> {
        let mut inner = self.store.inner().write().await;
        if !inner.blogs.contains_key(&comment.blog_id) {
            return Err(RepoError::NotFound);
        }

        inner.comments.insert(comment.id, comment.clone());
        let blog_id = comment.blog_id;
        if let Some(blog) = inner.blogs.get_mut(&blog_id) {
            blog.comments_count += 1;
        }

        Ok(Self::node_for(&inner, comment))
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<CommentNode, RepoError> {
        let mut inner = self.store.inner().write().await;
        let comment = inner.comments.get_mut(&id).ok_or(RepoError::NotFound)?;
        comment.content = content;
        comment.is_edited = true;
        comment.updated_at = Utc::now();
        let updated = comment.clone();
        Ok(Self::node_for(&inner, updated))
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.store.inner().write().await;
        let blog_id = inner
            .comments
            .get(&id)
            .map(|c| c.blog_id)
            .ok_or(RepoError::NotFound)?;

        inner.remove_comment_tree(id);
        inner.repair_comment_count(blog_id);
        Ok(())
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let mut inner = self.store.inner().write().await;
        if !inner.comments.contains_key(&id) {
            return Err(RepoError::NotFound);
        }

        let likers = inner.comment_likes.entry(id).or_default();
        let now_liked = if likers.contains(&user_id) {
            likers.retain(|liker| *liker != user_id);
            false
        } else {
            likers.push(user_id);
            true
        };
        let likes = likers.clone();

        Ok(LikeOutcome {
            likes_count: likes.len() as u64,
            likes,
            now_liked,
        })
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let inner = self.store.inner().read().await;
        Ok(inner.comments.len() as u64)
    }
}
