//! Blog repository on PostgreSQL.
//!
//! Like toggles run inside one transaction that moves the `blog_likes`
//! row and the `likes_count` column together. Cascading deletes lean on
//! the schema's `ON DELETE CASCADE` foreign keys, so a blog delete is a
//! single atomic statement.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use inkwell_core::domain::{AuthorRef, Blog, BlogStatus, LikerRef};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BlogChanges, BlogCounts, BlogQuery, BlogRepository, BlogSort, LikeOutcome, PageRequest,
    PagedResult, SortOrder,
};

use super::map_db_err;
use crate::database::entity::{blog, blog_like, user};

/// PostgreSQL blog repository.
pub struct PgBlogRepository {
    db: DbConn,
}

// Search terms match literally, so LIKE metacharacters in user input
// must be escaped before building the pattern.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl PgBlogRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn published_condition(query: &BlogQuery) -> Condition {
        use sea_orm::sea_query::extension::postgres::PgExpr;

        let mut cond =
            Condition::all().add(blog::Column::Status.eq(BlogStatus::Published.as_str()));

        if let Some(category) = &query.category {
            cond = cond.add(Expr::cust_with_values(
                "? = ANY(categories)",
                [category.clone()],
            ));
        }

        if let Some(search) = &query.search {
            let pattern = format!("%{}%", escape_like(search));
            cond = cond.add(
                Condition::any()
                    .add(Expr::col((blog::Entity, blog::Column::Title)).ilike(pattern.as_str()))
                    .add(Expr::col((blog::Entity, blog::Column::Content)).ilike(pattern.as_str()))
                    .add(Expr::cust_with_values(
                        "array_to_string(tags, ' ') ILIKE ?",
                        [pattern.clone()],
                    )),
            );
        }

        cond
    }

    fn sort_key(query: &BlogQuery) -> (blog::Column, Order) {
        let column = match query.sort {
            BlogSort::CreatedAt => blog::Column::CreatedAt,
            BlogSort::Title => blog::Column::Title,
            BlogSort::Likes => blog::Column::LikesCount,
        };
        let order = match query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        (column, order)
    }

    async fn fetch_page(
        &self,
        condition: Condition,
        column: blog::Column,
        order: Order,
        page: PageRequest,
    ) -> Result<PagedResult<(Blog, Option<AuthorRef>)>, RepoError> {
        let select = blog::Entity::find()
            .filter(condition)
            .order_by(column, order)
            .find_also_related(user::Entity);

        let paginator = select.paginate(&self.db, page.limit);
        let total = paginator.num_items().await.map_err(map_db_err)?;
        let rows = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(PagedResult {
            items: rows
                .into_iter()
                .map(|(b, a)| (b.into(), a.as_ref().map(AuthorRef::from)))
                .collect(),
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn list_published(
        &self,
        query: &BlogQuery,
        page: PageRequest,
    ) -> Result<PagedResult<(Blog, Option<AuthorRef>)>, RepoError> {
        let (column, order) = Self::sort_key(query);
        self.fetch_page(Self::published_condition(query), column, order, page)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<(Blog, Option<AuthorRef>)>, RepoError> {
        let row = blog::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(|(b, a)| (b.into(), a.as_ref().map(AuthorRef::from))))
    }

    async fn likers(&self, id: Uuid) -> Result<Vec<LikerRef>, RepoError> {
        let rows = blog_like::Entity::find()
            .filter(blog_like::Column::BlogId.eq(id))
            .order_by_asc(blog_like::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(like, liker)| {
                liker.map(|u| LikerRef {
                    id: like.user_id,
                    username: u.username,
                })
            })
            .collect())
    }

    async fn insert(&self, entity: Blog) -> Result<Blog, RepoError> {
        let active: blog::ActiveModel = entity.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, id: Uuid, changes: BlogChanges) -> Result<Blog, RepoError> {
        let mut active = blog::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = changes.excerpt {
            active.excerpt = Set(Some(excerpt));
        }
        if let Some(categories) = changes.categories {
            active.categories = Set(categories);
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(tags);
        }
        if let Some(featured_image) = changes.featured_image {
            active.featured_image = Set(Some(featured_image));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_owned());
        }

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError> {
        // Comments, replies and like rows go with the blog through the
        // ON DELETE CASCADE foreign keys, in one statement.
        let result = blog::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let exists = blog::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if exists.is_none() {
            return Err(RepoError::NotFound);
        }

        let removed = blog_like::Entity::delete_many()
            .filter(blog_like::Column::BlogId.eq(id))
            .filter(blog_like::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let now_liked = removed.rows_affected == 0;
        let delta: i64 = if now_liked {
            blog_like::ActiveModel {
                blog_id: Set(id),
                user_id: Set(user_id),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
            1
        } else {
            -1
        };

        blog::Entity::update_many()
            .col_expr(
                blog::Column::LikesCount,
                Expr::col(blog::Column::LikesCount).add(delta),
            )
            .filter(blog::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let likes: Vec<Uuid> = blog_like::Entity::find()
            .filter(blog_like::Column::BlogId.eq(id))
            .order_by_asc(blog_like::Column::CreatedAt)
            .select_only()
            .column(blog_like::Column::UserId)
            .into_tuple()
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

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
        let rows = blog::Entity::find()
            .filter(blog::Column::AuthorId.eq(author_id))
            .filter(blog::Column::Status.eq(BlogStatus::Published.as_str()))
            .order_by_desc(blog::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(b, a)| (b.into(), a.as_ref().map(AuthorRef::from)))
            .collect())
    }

    async fn list_all(
        &self,
        page: PageRequest,
    ) -> Result<PagedResult<(Blog, Option<AuthorRef>)>, RepoError> {
        self.fetch_page(
            Condition::all(),
            blog::Column::CreatedAt,
            Order::Desc,
            page,
        )
        .await
    }

    async fn set_status(&self, id: Uuid, status: BlogStatus) -> Result<Blog, RepoError> {
        let active = blog::ActiveModel {
            id: Set(id),
            status: Set(status.as_str().to_owned()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<(Blog, Option<AuthorRef>)>, RepoError> {
        let rows = blog::Entity::find()
            .order_by_desc(blog::Column::CreatedAt)
            .limit(limit)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(b, a)| (b.into(), a.as_ref().map(AuthorRef::from)))
            .collect())
    }

    async fn counts(&self) -> Result<BlogCounts, RepoError> {
        let total = blog::Entity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        let published = blog::Entity::find()
            .filter(blog::Column::Status.eq(BlogStatus::Published.as_str()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(BlogCounts {
            total,
            published,
            drafts: total - published,
        })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), r"100\%");
        assert_eq!(escape_like("a_b"), r"a\_b");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
    }

    #[test]
    fn search_terms_reach_the_query_escaped() {
        let query = BlogQuery {
            search: Some("100%_done".to_owned()),
            ..Default::default()
        };

        let sql = blog::Entity::find()
            .filter(PgBlogRepository::published_condition(&query))
            .build(DbBackend::Postgres)
            .to_string();

        // The raw pattern must never reach the query; the escaped
        // metacharacters must.
        assert!(!sql.contains("%100%_done%"), "got: {sql}");
        assert!(sql.contains(r"\%") && sql.contains(r"\_"), "got: {sql}");
    }
}
