//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::Comment;
use inkwell_shared::{
    CommentResponse, CreateCommentRequest, FieldError, LikeResponse, MessageResponse,
    UpdateCommentRequest,
};

use super::blogs::visible_to;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/comments/blog/{blog_id}
///
/// Comments on a draft blog are as invisible as the draft itself.
pub async fn list_for_blog(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog_id = path.into_inner();

    let (blog, _) = state
        .blogs
        .find_by_id(blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    if !visible_to(&blog, identity.0.as_ref()) {
        return Err(AppError::not_found("Blog"));
    }

    let threads = state.comments.list_for_blog(blog_id).await?;
    let body: Vec<CommentResponse> = threads.iter().map(CommentResponse::from_thread).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    if req.content.trim().is_empty() {
        errors.push(FieldError::new("content", "Content is required"));
    }
    let blog_id = match req.blog {
        Some(id) => id,
        None => {
            errors.push(FieldError::new("blog", "Blog is required"));
            return Err(AppError::Validation(errors));
        }
    };
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let (blog, _) = state
        .blogs
        .find_by_id(blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    if !visible_to(&blog, Some(&identity)) {
        return Err(AppError::not_found("Blog"));
    }

    // A reply parent must exist and sit on the same blog.
    if let Some(parent_id) = req.parent_comment {
        let parent = state.comments.find_by_id(parent_id).await?;
        match parent {
            Some(parent) if parent.blog_id == blog_id => {}
            _ => return Err(AppError::not_found("Parent comment")),
        }
    }

    let comment = Comment::new(identity.user_id, blog_id, req.content, req.parent_comment);
    let node = state.comments.insert(comment).await?;

    Ok(HttpResponse::Created().json(CommentResponse::from_node(&node)))
}

/// PUT /api/comments/{id}
///
/// Edits are author-only; admins have no override here.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    if req.content.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "content",
            "Content is required",
        )]));
    }

    let comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment"))?;

    if comment.author_id != identity.user_id {
        return Err(AppError::access_denied());
    }

    let node = state.comments.update_content(id, req.content).await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from_node(&node)))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment"))?;

    if comment.author_id != identity.user_id && !identity.is_admin() {
        return Err(AppError::access_denied());
    }

    state.comments.delete_cascading(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted successfully")))
}

/// POST /api/comments/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if state.comments.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("Comment"));
    }

    let outcome = state.comments.toggle_like(id, identity.user_id).await?;

    Ok(HttpResponse::Ok().json(LikeResponse::from(outcome)))
}
