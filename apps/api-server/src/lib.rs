//! # Inkwell API Server
//!
//! Library surface of the actix-web server so integration tests can
//! assemble the same app the binary runs.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
