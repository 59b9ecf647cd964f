//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod blogs;
mod comments;
mod health;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Blog routes
            .service(
                web::scope("/blogs")
                    .route("", web::get().to(blogs::list_published))
                    .route("", web::post().to(blogs::create))
                    .route("/user/{user_id}", web::get().to(blogs::list_by_author))
                    .route("/{id}", web::get().to(blogs::get))
                    .route("/{id}", web::put().to(blogs::update))
                    .route("/{id}", web::delete().to(blogs::delete))
                    .route("/{id}/like", web::post().to(blogs::toggle_like)),
            )
            // Comment routes
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create))
                    .route("/blog/{blog_id}", web::get().to(comments::list_for_blog))
                    .route("/{id}", web::put().to(comments::update))
                    .route("/{id}", web::delete().to(comments::delete))
                    .route("/{id}/like", web::post().to(comments::toggle_like)),
            )
            // Profile routes
            .service(
                web::scope("/users").route("/{id}", web::put().to(users::update_profile)),
            )
            // Admin routes
            .service(
                web::scope("/admin")
                    .route("/stats", web::get().to(admin::stats))
                    .route("/users", web::get().to(admin::list_users))
                    .route("/users/{id}/role", web::put().to(admin::set_user_role))
                    .route("/users/{id}", web::delete().to(admin::delete_user))
                    .route("/blogs", web::get().to(admin::list_blogs))
                    .route("/blogs/{id}/status", web::put().to(admin::set_blog_status))
                    .route("/blogs/{id}", web::delete().to(admin::delete_blog)),
            ),
    );
}
