//! Database connection management and SeaORM repositories.

mod connections;
pub mod entity;
mod repos;

pub use connections::{DatabaseConfig, connect};
pub use repos::{PgBlogRepository, PgCommentRepository, PgUserRepository};
