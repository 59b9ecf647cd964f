//! Blog handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use inkwell_core::domain::{Blog, BlogStatus};
use inkwell_core::ports::{BlogChanges, BlogQuery, BlogSort, PageRequest, SortOrder};
use inkwell_shared::{
    BlogResponse, CreateBlogRequest, FieldError, LikeResponse, MessageResponse, PageResponse,
    UpdateBlogRequest,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Query string for the public listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlogsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Drafts behave like missing blogs for anyone but their owner or an
/// admin, on every route that takes a blog id.
pub(super) fn visible_to(blog: &Blog, identity: Option<&Identity>) -> bool {
    blog.status != BlogStatus::Draft
        || identity.is_some_and(|i| i.user_id == blog.author_id || i.is_admin())
}

// Unknown sort keys fall back to newest-first rather than erroring.
fn parse_sort(key: Option<&str>, order: Option<&str>) -> (BlogSort, SortOrder) {
    let sort = match key {
        Some("title") => BlogSort::Title,
        Some("likes") | Some("likesCount") => BlogSort::Likes,
        _ => BlogSort::CreatedAt,
    };
    let order = match order {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    };
    (sort, order)
}

/// GET /api/blogs
pub async fn list_published(
    state: web::Data<AppState>,
    query: web::Query<ListBlogsQuery>,
) -> AppResult<HttpResponse> {
    let q = query.into_inner();
    let page = PageRequest::new(q.page.unwrap_or(1), q.limit.unwrap_or(10));
    let (sort, order) = parse_sort(q.sort_by.as_deref(), q.sort_order.as_deref());

    let filter = BlogQuery {
        category: q.category.filter(|c| !c.is_empty()),
        search: q.search.filter(|s| !s.is_empty()),
        sort,
        order,
    };

    let result = state.blogs.list_published(&filter, page).await?;
    let body = PageResponse::new(result, |(blog, author)| {
        BlogResponse::new(blog, author.as_ref(), false)
    });

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/blogs/{id}
///
/// Drafts are visible to their owner and admins only; everyone else
/// gets the same 404 as a missing blog.
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (blog, author) = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;

    if !visible_to(&blog, identity.0.as_ref()) {
        return Err(AppError::not_found("Blog"));
    }

    let likers = state.blogs.likers(id).await?;
    let body = BlogResponse::new(&blog, author.as_ref(), false).with_likes(&likers);

    Ok(HttpResponse::Ok().json(body))
}

fn validate_blog_fields(title: &str, content: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if content.trim().is_empty() {
        errors.push(FieldError::new("content", "Content is required"));
    }
    errors
}

/// POST /api/blogs
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = validate_blog_fields(&req.title, &req.content);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let status = match req.status.as_deref() {
        None => BlogStatus::Draft,
        Some(value) => BlogStatus::parse(value)
            .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?,
    };

    let mut blog = Blog::new(identity.user_id, req.title, req.content);
    blog.excerpt = req.excerpt;
    blog.categories = req.categories.unwrap_or_default();
    blog.tags = req.tags.unwrap_or_default();
    blog.featured_image = req.featured_image;
    blog.status = status;

    let saved = state.blogs.insert(blog).await?;
    let (blog, author) = state
        .blogs
        .find_by_id(saved.id)
        .await?
        .ok_or_else(|| AppError::Internal("Blog vanished after insert".to_string()))?;

    Ok(HttpResponse::Created().json(BlogResponse::new(&blog, author.as_ref(), false)))
}

/// PUT /api/blogs/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let (blog, author) = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;

    if blog.author_id != identity.user_id && !identity.is_admin() {
        return Err(AppError::access_denied());
    }

    let status = match req.status.as_deref() {
        None => None,
        Some(value) => Some(
            BlogStatus::parse(value)
                .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?,
        ),
    };

    let changes = BlogChanges {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        categories: req.categories,
        tags: req.tags,
        featured_image: req.featured_image,
        status,
    };

    let updated = state.blogs.update(id, changes).await?;

    Ok(HttpResponse::Ok().json(BlogResponse::new(&updated, author.as_ref(), false)))
}

/// DELETE /api/blogs/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let (blog, _) = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;

    if blog.author_id != identity.user_id && !identity.is_admin() {
        return Err(AppError::access_denied());
    }

    state.blogs.delete_cascading(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Blog deleted successfully")))
}

/// POST /api/blogs/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let (blog, _) = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog"))?;
    if !visible_to(&blog, Some(&identity)) {
        return Err(AppError::not_found("Blog"));
    }

    let outcome = state.blogs.toggle_like(id, identity.user_id).await?;

    Ok(HttpResponse::Ok().json(LikeResponse::from(outcome)))
}

/// GET /api/blogs/user/{user_id}
pub async fn list_by_author(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let author_id = path.into_inner();
    let blogs = state.blogs.list_by_author(author_id).await?;

    let body: Vec<BlogResponse> = blogs
        .iter()
        .map(|(blog, author)| BlogResponse::new(blog, author.as_ref(), false))
        .collect();

    Ok(HttpResponse::Ok().json(body))
}
