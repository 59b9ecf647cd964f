//! User profile handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::ports::ProfileChanges;
use inkwell_shared::{UpdateProfileRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// PUT /api/users/{id}
///
/// Self-service only; even admins edit their own profile through here.
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    if id != identity.user_id {
        return Err(AppError::access_denied());
    }

    if state.users.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("User"));
    }

    // A username change must not collide with another account.
    if let Some(username) = req.username.as_deref() {
        if let Some(existing) = state.users.find_by_username(username).await? {
            if existing.id != id {
                return Err(AppError::BadRequest("User already exists".to_string()));
            }
        }
    }

    let changes = ProfileChanges {
        username: req.username,
        bio: req.bio,
        avatar_url: req.avatar_url,
    };

    let updated = state.users.update_profile(id, changes).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}
