//! # Inkwell Shared
//!
//! Wire types shared between the API server and its clients.

pub mod dto;
pub mod response;

pub use dto::{
    AuthResponse, AuthorDto, BlogResponse, CommentResponse, CreateBlogRequest,
    CreateCommentRequest, DashboardStats, LikeResponse, LikerDto, LoginRequest, PageResponse,
    RegisterRequest, StatsResponse, UpdateBlogRequest, UpdateCommentRequest, UpdateProfileRequest,
    UpdateRoleRequest, UpdateStatusRequest, UserResponse,
};
pub use response::{ErrorResponse, FieldError, MessageResponse, ValidationErrorResponse};
