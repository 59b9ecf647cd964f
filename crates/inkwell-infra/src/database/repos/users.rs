//! User repository on PostgreSQL.
//!
//! `delete_cascading` is the admin moderation path: it removes the
//! user's blogs (their comments and like rows follow through foreign
//! keys), the user's comments on other blogs, and the user row itself,
//! all in one transaction. Counters on blogs touched by those deletes
//! are recomputed from the surviving rows.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use inkwell_core::domain::{Role, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{ProfileChanges, UserRepository};

use super::map_db_err;
use crate::database::entity::{blog, blog_like, comment, user};

/// PostgreSQL user repository.
pub struct PgUserRepository {
    db: DbConn,
}

impl PgUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = entity.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, RepoError> {
        let mut active = user::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(avatar_url) = changes.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let models = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>, RepoError> {
        let models = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, RepoError> {
        let active = user::ActiveModel {
            id: Set(id),
            role: Set(role.as_str().to_owned()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let exists = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if exists.is_none() {
            return Err(RepoError::NotFound);
        }

        // Blogs the user authored; their comments and likes follow by FK.
        blog::Entity::delete_many()
            .filter(blog::Column::AuthorId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        // The user's comments on surviving blogs. Remember which blogs
        // lose rows so their counters can be repaired.
        let commented_blogs: Vec<Uuid> = comment::Entity::find()
            .filter(comment::Column::AuthorId.eq(id))
            .select_only()
            .column(comment::Column::BlogId)
            .distinct()
            .into_tuple()
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        comment::Entity::delete_many()
            .filter(comment::Column::AuthorId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        // Blogs the user had liked lose a like row when the user goes;
        // their likes_count needs the same repair.
        let liked_blogs: Vec<Uuid> = blog_like::Entity::find()
            .filter(blog_like::Column::UserId.eq(id))
            .select_only()
            .column(blog_like::Column::BlogId)
            .distinct()
            .into_tuple()
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        for blog_id in commented_blogs {
            let remaining = comment::Entity::find()
                .filter(comment::Column::BlogId.eq(blog_id))
                .count(&txn)
                .await
                .map_err(map_db_err)?;
            blog::Entity::update_many()
                .col_expr(blog::Column::CommentsCount, Expr::value(remaining as i64))
                .filter(blog::Column::Id.eq(blog_id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        for blog_id in liked_blogs {
            let remaining = blog_like::Entity::find()
                .filter(blog_like::Column::BlogId.eq(blog_id))
                .count(&txn)
                .await
                .map_err(map_db_err)?;
            blog::Entity::update_many()
                .col_expr(blog::Column::LikesCount, Expr::value(remaining as i64))
                .filter(blog::Column::Id.eq(blog_id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        user::Entity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}
