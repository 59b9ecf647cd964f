//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{BlogRepository, CommentRepository, UserRepository};
use inkwell_infra::database::{self, DatabaseConfig};
use inkwell_infra::{MemoryStore, PgBlogRepository, PgCommentRepository, PgUserRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub blogs: Arc<dyn BlogRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Falls back to the in-memory store when no database is configured
    /// or the connection fails.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        if let Some(config) = db_config {
            match database::connect(config).await {
                Ok(conn) => {
                    return Self {
                        users: Arc::new(PgUserRepository::new(conn.clone())),
                        blogs: Arc::new(PgBlogRepository::new(conn.clone())),
                        comments: Arc::new(PgCommentRepository::new(conn)),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        Self::in_memory()
    }

    /// State backed by the in-memory store. Also used by API tests.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.user_repo()),
            blogs: Arc::new(store.blog_repo()),
            comments: Arc::new(store.comment_repo()),
        }
    }
}
