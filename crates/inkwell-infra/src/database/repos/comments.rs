//! Comment repository on PostgreSQL.
//!
//! Creating a comment bumps the blog's `comments_count` in the same
//! transaction. Deleting one removes its reply subtree through the
//! self-referential cascade and recomputes the counter from the rows
//! that survived, so the two can never drift apart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use inkwell_core::domain::{AuthorRef, Comment};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{CommentNode, CommentRepository, CommentThread, LikeOutcome};

use super::map_db_err;
use crate::database::entity::{blog, comment, comment_like, user};

/// PostgreSQL comment repository.
pub struct PgCommentRepository {
    db: DbConn,
}

impl PgCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn node_for(&self, model: comment::Model) -> Result<CommentNode, RepoError> {
        let author = user::Entity::find_by_id(model.author_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        let likes: Vec<Uuid> = comment_like::Entity::find()
            .filter(comment_like::Column::CommentId.eq(model.id))
            .order_by_asc(comment_like::Column::CreatedAt)
            .select_only()
            .column(comment_like::Column::UserId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(CommentNode {
            comment: model.into(),
            author: author.as_ref().map(AuthorRef::from),
            likes,
        })
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list_for_blog(&self, blog_id: Uuid) -> Result<Vec<CommentThread>, RepoError> {
        let rows = comment::Entity::find()
            .filter(comment::Column::BlogId.eq(blog_id))
            .order_by_asc(comment::Column::CreatedAt)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let ids: Vec<Uuid> = rows.iter().map(|(c, _)| c.id).collect();
        let mut likes_by_comment: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if !ids.is_empty() {
            let like_rows = comment_like::Entity::find()
                .filter(comment_like::Column::CommentId.is_in(ids))
                .order_by_asc(comment_like::Column::CreatedAt)
                .all(&self.db)
                .await
                .map_err(map_db_err)?;
            for like in like_rows {
                likes_by_comment
                    .entry(like.comment_id)
                    .or_default()
                    .push(like.user_id);
            }
        }

        let mut nodes: Vec<CommentNode> = rows
            .into_iter()
            .map(|(model, author)| {
                let likes = likes_by_comment.remove(&model.id).unwrap_or_default();
                CommentNode {
                    author: author.as_ref().map(AuthorRef::from),
                    likes,
                    comment: model.into(),
                }
            })
            .collect();

        // Rows arrive in insertion order; group direct replies under their
        // top-level parent, newest thread first.
        let mut replies_by_parent: HashMap<Uuid, Vec<CommentNode>> = HashMap::new();
        let mut top_level = Vec::new();
        for node in nodes.drain(..) {
            match node.comment.parent_id {
                Some(parent) => replies_by_parent.entry(parent).or_default().push(node),
                None => top_level.push(node),
            }
        }
        top_level.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));

        Ok(top_level
            .into_iter()
            .map(|node| {
                let replies = replies_by_parent.remove(&node.comment.id).unwrap_or_default();
                CommentThread { node, replies }
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let model = comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }

    async fn insert(&self, entity: Comment) -> Result<CommentNode, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let blog_id = entity.blog_id;
        let active: comment::ActiveModel = entity.into();
        let model = active.insert(&txn).await.map_err(map_db_err)?;

        let bumped = blog::Entity::update_many()
            .col_expr(
                blog::Column::CommentsCount,
                Expr::col(blog::Column::CommentsCount).add(1),
            )
            .filter(blog::Column::Id.eq(blog_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if bumped.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;

        self.node_for(model).await
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<CommentNode, RepoError> {
        let active = comment::ActiveModel {
            id: Set(id),
            content: Set(content),
            is_edited: Set(true),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        self.node_for(model).await
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = comment::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        // The parent_id cascade takes the reply subtree with it.
        comment::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let remaining = comment::Entity::find()
            .filter(comment::Column::BlogId.eq(model.blog_id))
            .count(&txn)
            .await
            .map_err(map_db_err)?;

        blog::Entity::update_many()
            .col_expr(
                blog::Column::CommentsCount,
                Expr::value(remaining as i64),
            )
            .filter(blog::Column::Id.eq(model.blog_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let exists = comment::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if exists.is_none() {
            return Err(RepoError::NotFound);
        }

        let removed = comment_like::Entity::delete_many()
            .filter(comment_like::Column::CommentId.eq(id))
            .filter(comment_like::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let now_liked = removed.rows_affected == 0;
        if now_liked {
            comment_like::ActiveModel {
                comment_id: Set(id),
                user_id: Set(user_id),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        }

        let likes: Vec<Uuid> = comment_like::Entity::find()
            .filter(comment_like::Column::CommentId.eq(id))
            .order_by_asc(comment_like::Column::CreatedAt)
            .select_only()
            .column(comment_like::Column::UserId)
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

    async fn count(&self) -> Result<u64, RepoError> {
        comment::Entity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}
