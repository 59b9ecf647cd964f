//! In-memory blog repository.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use inkwell_core::domain::{AuthorRef, Blog, BlogStatus, LikerRef};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BlogChanges, BlogCounts, BlogQuery, BlogRepository, BlogSort, LikeOutcome, PageRequest,
    PagedResult, SortOrder,
};

use super::{MemoryStore, StoreInner};

pub struct MemoryBlogRepository {
    store: MemoryStore,
}

impl MemoryBlogRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    fn matches(blog: &Blog, query: &BlogQuery) -> bool {
        if blog.status != BlogStatus::Published {
            return false;
        }
        if let Some(category) = &query.category {
            if !blog.categories.iter().any(|c| c == category) {
                return false;
            }
        }
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            let hit = blog.title.to_lowercase().contains(&needle)
                || blog.content.to_lowercase().contains(&needle)
                || blog
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    fn sort(blogs: &mut [Blog], query: &BlogQuery) {
        blogs.sort_by(|a, b| {
            let ordering = match query.sort {
                BlogSort::CreatedAt => a.created_at.cmp(&b.created_at),
                BlogSort::Title => a.title.cmp(&b.title),
                BlogSort::Likes => a.likes_count.cmp(&b.likes_count),
            };
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    fn with_author(inner: &StoreInner, blog: Blog) -> (Blog, Option<AuthorRef>) {
        let author = inner.author_ref(blog.author_id);
        (blog, author)
    }

    fn paginate(
        inner: &StoreInner,
        mut blogs: Vec<Blog>,
        page: PageRequest,
    ) -> PagedResult<(Blog, Option<AuthorRef>)> {
        let total = blogs.len() as u64;
        let start = (page.offset() as usize).min(blogs.len());
        let end = (start + page.limit as usize).min(blogs.len());
        let items = blogs
            .drain(start..end)
            .map(|b| Self::with_author(inner, b))
            .collect();
        PagedResult {
            items,
            total,
            page: page.page,
            limit: page.limit,
        }
    }
}

#[async_trait]
impl BlogRepository for MemoryBlogRepository {
    async fn list_published(
        &self,
        query: &BlogQuery,
        page: PageRequest,
    ) -> Result<PagedResult<(Blog, Option<AuthorRef>)>, RepoError> {
        let inner = self.store.inner().read().await;
        let mut blogs: Vec<Blog> = inner
            .blogs
            .values()
            .filter(|b| Self::matches(b, query))
            .cloned()
            .collect();
        Self::sort(&mut blogs, query);
        Ok(Self::paginate(&inner, blogs, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<(Blog, Option<AuthorRef>)>, RepoError> {
        let inner = self.store.inner().read().await;
        Ok(inner
            .blogs
            .get(&id)
            .cloned()
            .map(|b| Self::with_author(&inner, b)))
    }

    async fn likers(&self, id: Uuid) -> Result<Vec<LikerRef>, RepoError> {
        let inner = self.store.inner().read().await;
        let likers = inner.blog_likes.get(&id).cloned().unwrap_or_default();
        Ok(likers
            .into_iter()
            .filter_map(|user_id| {
                inner.users.get(&user_id).map(|u| LikerRef {
                    id: u.id,
                    username: u.username.clone(),
                })
            })
            .collect())
    }

    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut inner = self.store.inner().write().await;
        inner.blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn update(&self, id: Uuid, changes: BlogChanges) -> Result<Blog, RepoError> {
        let mut inner = self.store.inner().write().await;
        let blog = inner.blogs.get_mut(&id).ok_or(RepoError::NotFound)?;

        if let Some(title) = changes.title {
            blog.title = title;
        }
        if let Some(content) = changes.content {
            blog.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            blog.excerpt = Some(excerpt);
        }
        if let Some(categories) = changes.categories {
            blog.categories = categories;
        }
        if let Some(tags) = changes.tags {
            blog.tags = tags;
        }
        if let Some(featured_image) = changes.featured_image {
            blog.featured_image = Some(featured_image);
        }
        if let Some(status) = changes.status {
            blog.status = status;
        }
        blog.updated_at = Utc::now();

        Ok(blog.clone())
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.store.inner().write().await;
        if inner.blogs.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        inner.blog_likes.remove(&id);
        let attached: Vec<Uuid> = inner
            .comments
            .values()
            .filter(|c| c.blog_id == id)
            .map(|c| c.id)
            .collect();
        for comment_id in attached {
            inner.comments.remove(&comment_id);
            inner.comment_likes.remove(&comment_id);
        }
        Ok(())
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let mut inner = self.store.inner().write().await;
        if !inner.blogs.contains_key(&id) {
            return Err(RepoError::NotFound);
        }

        let likers = inner.blog_likes.entry(id).or_default();
        let now_liked = if likers.contains(&user_id) {
            likers.retain(|liker| *liker != user_id);
            false
        } else {
            likers.push(user_id);
            true
        };
        let likes = likers.clone();

        // Counter and set move under the same lock.
        if let Some(blog) = inner.blogs.get_mut(&id) {
            blog.likes_count = likes.len() as i64;
        }

        Ok(LikeOutcome {
            likes_count: likes.len() as u64,
            likes,
            now_liked,
        })
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
    ) -> Result<Vec<(Blog, Option<AuthorRef>)>, RepoError> {
        let inner = self.store.inner().read().await;
        let mut blogs: Vec<Blog> = inner
            .blogs
            .values()
            .filter(|b| b.author_id == author_id && b.status == BlogStatus::Published)
            .cloned()
            .collect();
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(blogs
            .into_iter()
            .map(|b| Self::with_author(&inner, b))
            .collect())
    }

    async fn list_all(
        &self,
        page: PageRequest,
    ) -> Result<PagedResult<(Blog, Option<AuthorRef>)>, RepoError> {
        let inner = self.store.inner().read().await;
        let mut blogs: Vec<Blog> = inner.blogs.values().cloned().collect();
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Self::paginate(&inner, blogs, page))
    }

    async fn set_status(&self, id: Uuid, status: BlogStatus) -> Result<Blog, RepoError> {
        let mut inner = self.store.inner().write().await;
        let blog = inner.blogs.get_mut(&id).ok_or(RepoError::NotFound)?;
        blog.status = status;
        blog.updated_at = Utc::now();
        Ok(blog.clone())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<(Blog, Option<AuthorRef>)>, RepoError> {
        let inner = self.store.inner().read().await;
        let mut blogs: Vec<Blog> = inner.blogs.values().cloned().collect();
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        blogs.truncate(limit as usize);
        Ok(blogs
            .into_iter()
            .map(|b| Self::with_author(&inner, b))
            .collect())
    }

    async fn counts(&self) -> Result<BlogCounts, RepoError> {
        let inner = self.store.inner().read().await;
        let total = inner.blogs.len() as u64;
        let published = inner
            .blogs
            .values()
            .filter(|b| b.status == BlogStatus::Published)
            .count() as u64;
        Ok(BlogCounts {
            total,
            published,
            drafts: total - published,
        })
    }
}
