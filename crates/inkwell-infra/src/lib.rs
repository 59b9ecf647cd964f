//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`:
//! SeaORM/Postgres repositories, JWT + Argon2 authentication, and
//! in-memory repositories used as the no-database fallback and as the
//! test double for API tests.

pub mod auth;
pub mod database;
pub mod memory;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, PgBlogRepository, PgCommentRepository, PgUserRepository};
pub use memory::{MemoryBlogRepository, MemoryCommentRepository, MemoryStore, MemoryUserRepository};
