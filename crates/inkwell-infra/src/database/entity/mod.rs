//! SeaORM entities and their conversions to/from domain types.

pub mod blog;
pub mod blog_like;
pub mod comment;
pub mod comment_like;
pub mod user;
