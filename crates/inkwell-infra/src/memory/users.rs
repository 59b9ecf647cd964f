//! In-memory user repository.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use inkwell_core::domain::{Role, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{ProfileChanges, UserRepository};

use super::MemoryStore;

pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let inner = self.store.inner().read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let inner = self.store.inner().read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let inner = self.store.inner().read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut inner = self.store.inner().write().await;
        if inner
            .users
            .values()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, RepoError> {
        let mut inner = self.store.inner().write().await;
        let user = inner.users.get_mut(&id).ok_or(RepoError::NotFound)?;

        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(avatar_url) = changes.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let inner = self.store.inner().read().await;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>, RepoError> {
        let mut users = self.list_all().await?;
        users.truncate(limit as usize);
        Ok(users)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, RepoError> {
        let mut inner = self.store.inner().write().await;
        let user = inner.users.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.store.inner().write().await;
        if !inner.users.contains_key(&id) {
            return Err(RepoError::NotFound);
        }

        // Blogs the user authored, with everything hanging off them.
        let owned: Vec<Uuid> = inner
            .blogs
            .values()
            .filter(|b| b.author_id == id)
            .map(|b| b.id)
            .collect();
        for blog_id in owned {
            inner.blogs.remove(&blog_id);
            inner.blog_likes.remove(&blog_id);
            let attached: Vec<Uuid> = inner
                .comments
                .values()
                .filter(|c| c.blog_id == blog_id)
                .map(|c| c.id)
                .collect();
            for comment_id in attached {
                inner.comments.remove(&comment_id);
                inner.comment_likes.remove(&comment_id);
            }
        }

        // The user's comments elsewhere, replies included; repair the
        // affected blogs' counters.
        let authored: Vec<(Uuid, Uuid)> = inner
            .comments
            .values()
            .filter(|c| c.author_id == id)
            .map(|c| (c.id, c.blog_id))
            .collect();
        for (comment_id, blog_id) in &authored {
            inner.remove_comment_tree(*comment_id);
            inner.repair_comment_count(*blog_id);
        }

        // Likes the user placed on surviving blogs and comments; the
        // blog counters follow the shrunken sets.
        for likers in inner.blog_likes.values_mut() {
            likers.retain(|liker| *liker != id);
        }
        for likers in inner.comment_likes.values_mut() {
            likers.retain(|liker| *liker != id);
        }
        let counts: Vec<(Uuid, i64)> = inner
            .blog_likes
            .iter()
            .map(|(blog_id, likers)| (*blog_id, likers.len() as i64))
            .collect();
        for (blog_id, count) in counts {
            if let Some(blog) = inner.blogs.get_mut(&blog_id) {
                blog.likes_count = count;
            }
        }

        inner.users.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let inner = self.store.inner().read().await;
        Ok(inner.users.len() as u64)
    }
}
