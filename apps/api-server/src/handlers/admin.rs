//! Admin handlers. Every route here requires the admin role.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use inkwell_core::domain::{BlogStatus, Role};
use inkwell_core::ports::PageRequest;
use inkwell_shared::{
    BlogResponse, DashboardStats, MessageResponse, PageResponse, StatsResponse, UpdateRoleRequest,
    UpdateStatusRequest, UserResponse,
};

use crate::middleware::auth::Admin;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const RECENT_LIMIT: u64 = 5;

/// GET /api/admin/stats
pub async fn stats(state: web::Data<AppState>, _admin: Admin) -> AppResult<HttpResponse> {
    let total_users = state.users.count().await?;
    let blog_counts = state.blogs.counts().await?;
    let total_comments = state.comments.count().await?;

    let recent_blogs = state.blogs.recent(RECENT_LIMIT).await?;
    let recent_users = state.users.recent(RECENT_LIMIT).await?;

    let body = StatsResponse {
        stats: DashboardStats {
            total_users,
            total_blogs: blog_counts.total,
            total_comments,
            published_blogs: blog_counts.published,
            draft_blogs: blog_counts.drafts,
        },
        recent_blogs: recent_blogs
            .iter()
            .map(|(blog, author)| BlogResponse::new(blog, author.as_ref(), true))
            .collect(),
        recent_users: recent_users.iter().map(UserResponse::from).collect(),
    };

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/admin/users
pub async fn list_users(state: web::Data<AppState>, _admin: Admin) -> AppResult<HttpResponse> {
    let users = state.users.list_all().await?;
    let body: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Query string for the admin blog listing.
#[derive(Debug, Deserialize)]
pub struct ListAllBlogsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// GET /api/admin/blogs
pub async fn list_blogs(
    state: web::Data<AppState>,
    _admin: Admin,
    query: web::Query<ListAllBlogsQuery>,
) -> AppResult<HttpResponse> {
    let q = query.into_inner();
    let page = PageRequest::new(q.page.unwrap_or(1), q.limit.unwrap_or(10));

    let result = state.blogs.list_all(page).await?;
    let body = PageResponse::new(result, |(blog, author)| {
        BlogResponse::new(blog, author.as_ref(), true)
    });

    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/admin/users/{id}/role
pub async fn set_user_role(
    state: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRoleRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let role = Role::parse(&body.role)
        .ok_or_else(|| AppError::BadRequest("Invalid role".to_string()))?;

    if state.users.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("User"));
    }

    let updated = state.users.set_role(id, role).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if state.users.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("User"));
    }

    state.users.delete_cascading(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

/// PUT /api/admin/blogs/{id}/status
pub async fn set_blog_status(
    state: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let status = BlogStatus::parse(&body.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?;

    let (_, author) = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;

    let updated = state.blogs.set_status(id, status).await?;

    Ok(HttpResponse::Ok().json(BlogResponse::new(&updated, author.as_ref(), true)))
}

/// DELETE /api/admin/blogs/{id}
pub async fn delete_blog(
    state: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if state.blogs.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("Blog"));
    }

    state.blogs.delete_cascading(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Blog deleted successfully")))
}
