//! PostgreSQL repository implementations.

mod blogs;
mod comments;
mod users;

pub use blogs::PgBlogRepository;
pub use comments::PgCommentRepository;
pub use users::PgUserRepository;

use inkwell_core::error::RepoError;

/// Map a SeaORM error onto the repository error taxonomy.
pub(crate) fn map_db_err(err: sea_orm::DbErr) -> RepoError {
    if matches!(err, sea_orm::DbErr::RecordNotUpdated) {
        return RepoError::NotFound;
    }
    let msg = err.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(msg)
    }
}
