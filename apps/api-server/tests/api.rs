//! Handler-level tests against the in-memory repositories.
//!
//! Each test assembles the same app the binary runs, minus the database.

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use inkwell_api::state::AppState;
use inkwell_core::domain::Role;
use inkwell_core::ports::{PasswordService, TokenService};
use inkwell_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

fn services() -> (AppState, Arc<dyn TokenService>, Arc<dyn PasswordService>) {
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret-key".to_string(),
        expiration_hours: 1,
        issuer: "test-issuer".to_string(),
    }));
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    (AppState::in_memory(), tokens, passwords)
}

macro_rules! test_app {
    ($state:expr, $tokens:expr, $passwords:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new($tokens.clone()))
                .app_data(web::Data::new($passwords.clone()))
                .configure(inkwell_api::handlers::configure_routes),
        )
        .await
    };
}

macro_rules! register {
    ($app:expr, $username:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": $username,
                "email": $email,
                "password": "password123",
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }};
}

macro_rules! create_blog {
    ($app:expr, $token:expr, $title:expr, $status:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json(json!({
                "title": $title,
                "content": "Some body text",
                "categories": ["tech"],
                "tags": ["rust"],
                "status": $status,
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["id"].as_str().unwrap().to_string()
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn register_login_me_round_trip() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);

    let (token, user_id) = register!(app, "alice", "alice@example.com");

    // me resolves the token back to the stored record
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"].as_str().unwrap(), user_id);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());

    // login with the same credentials
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "alice@example.com", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_web::test]
async fn register_rejects_invalid_fields_with_field_errors() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": " ", "email": "nope", "password": "abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e["field"] == "username"));
    assert!(errors.iter().any(|e| e["field"] == "email"));
    assert!(errors.iter().any(|e| e["field"] == "password"));
}

#[actix_web::test]
async fn register_rejects_duplicate_email_and_username() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let _ = register!(app, "alice", "alice@example.com");

    for payload in [
        json!({"username": "alice", "email": "other@example.com", "password": "password123"}),
        json!({"username": "other", "email": "alice@example.com", "password": "password123"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User already exists");
    }
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let _ = register!(app, "alice", "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "alice@example.com", "password": "wrong-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[actix_web::test]
async fn blog_create_requires_authentication() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn blog_create_rejects_missing_title_and_content() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (token, _) = register!(app, "alice", "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token))
        .set_json(json!({"title": "", "content": "  "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn drafts_stay_hidden_until_published() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (owner, _) = register!(app, "alice", "alice@example.com");
    let (other, _) = register!(app, "bob", "bob@example.com");

    let blog_id = create_blog!(app, owner, "Hidden draft", "draft");

    // not in the public listing
    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());

    // anonymous and other users get 404, the owner sees it
    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .insert_header(bearer(&other))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // publish, then everyone sees it
    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{blog_id}"))
        .insert_header(bearer(&owner))
        .set_json(json!({"status": "published"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["items"][0]["title"], "Hidden draft");
}

#[actix_web::test]
async fn drafts_stay_hidden_on_comment_and_like_routes() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (owner, _) = register!(app, "alice", "alice@example.com");
    let (other, _) = register!(app, "bob", "bob@example.com");

    let blog_id = create_blog!(app, owner, "Hidden draft", "draft");

    // listing the draft's comments confirms nothing, even anonymously
    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/blog/{blog_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // other users can neither comment on it nor like it
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&other))
        .set_json(json!({"blog": blog_id, "content": "First!"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/{blog_id}/like"))
        .insert_header(bearer(&other))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // the owner still can
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&owner))
        .set_json(json!({"blog": blog_id, "content": "Note to self"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/blog/{blog_id}"))
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn like_toggle_is_idempotent_and_counts_distinct_users() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, _) = register!(app, "alice", "alice@example.com");
    let (bob, _) = register!(app, "bob", "bob@example.com");
    let blog_id = create_blog!(app, alice, "Likeable", "published");

    // two distinct users -> 2
    for token in [&alice, &bob] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/blogs/{blog_id}/like"))
            .insert_header(bearer(token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["likesCount"], 2);
    assert_eq!(body["likes"].as_array().unwrap().len(), 2);

    // second toggle by bob removes the like again
    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/{blog_id}/like"))
        .insert_header(bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["hasLiked"], false);
    assert_eq!(body["likesCount"], 1);
    assert_eq!(body["likes"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn non_owner_cannot_mutate_a_blog() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, _) = register!(app, "alice", "alice@example.com");
    let (bob, _) = register!(app, "bob", "bob@example.com");
    let blog_id = create_blog!(app, alice, "Mine", "published");

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{blog_id}"))
        .insert_header(bearer(&bob))
        .set_json(json!({"title": "Stolen"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Access denied");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{blog_id}"))
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // state unchanged
    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Mine");
}

#[actix_web::test]
async fn comment_lifecycle_keeps_the_blog_counter_in_step() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, _) = register!(app, "alice", "alice@example.com");
    let (bob, _) = register!(app, "bob", "bob@example.com");
    let blog_id = create_blog!(app, alice, "Discussed", "published");

    // top-level comment
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&bob))
        .set_json(json!({"blog": blog_id, "content": "First!"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let top: Value = test::read_body_json(resp).await;
    let top_id = top["id"].as_str().unwrap().to_string();

    // reply from the author
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&alice))
        .set_json(json!({"blog": blog_id, "content": "Thanks", "parentComment": top_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["commentsCount"], 2);

    // listing nests the reply under its parent
    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/blog/{blog_id}"))
        .to_request();
    let threads: Value = test::call_and_read_body_json(&app, req).await;
    let threads = threads.as_array().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["replies"].as_array().unwrap().len(), 1);
    assert_eq!(threads[0]["replies"][0]["content"], "Thanks");

    // deleting the top-level comment takes the reply with it
    let req = test::TestRequest::delete()
        .uri(&format!("/api/comments/{top_id}"))
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["commentsCount"], 0);
}

#[actix_web::test]
async fn comment_rejects_missing_blog_and_foreign_parent() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, _) = register!(app, "alice", "alice@example.com");
    let blog_a = create_blog!(app, alice, "A", "published");
    let blog_b = create_blog!(app, alice, "B", "published");

    // missing blog
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&alice))
        .set_json(json!({
            "blog": uuid::Uuid::new_v4(),
            "content": "Hello",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // parent on a different blog
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&alice))
        .set_json(json!({"blog": blog_a, "content": "On A"}))
        .to_request();
    let parent: Value = test::call_and_read_body_json(&app, req).await;
    let parent_id = parent["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&alice))
        .set_json(json!({"blog": blog_b, "content": "Cross-reply", "parentComment": parent_id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Parent comment not found");
}

#[actix_web::test]
async fn comment_edits_are_author_only() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, _) = register!(app, "alice", "alice@example.com");
    let (bob, _) = register!(app, "bob", "bob@example.com");
    let blog_id = create_blog!(app, alice, "Post", "published");

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&bob))
        .set_json(json!({"blog": blog_id, "content": "Original"}))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let comment_id = comment["id"].as_str().unwrap().to_string();
    assert_eq!(comment["isEdited"], false);

    // the blog owner still cannot edit someone else's comment
    let req = test::TestRequest::put()
        .uri(&format!("/api/comments/{comment_id}"))
        .insert_header(bearer(&alice))
        .set_json(json!({"content": "Defaced"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/comments/{comment_id}"))
        .insert_header(bearer(&bob))
        .set_json(json!({"content": "Amended"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["content"], "Amended");
    assert_eq!(body["isEdited"], true);
}

#[actix_web::test]
async fn admin_routes_reject_ordinary_users() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (user, _) = register!(app, "alice", "alice@example.com");

    let req = test::TestRequest::get().uri("/api/admin/stats").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .insert_header(bearer(&user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Access denied");
}

#[actix_web::test]
async fn admin_stats_and_role_management() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, alice_id) = register!(app, "alice", "alice@example.com");
    let (_, bob_id) = register!(app, "bob", "bob@example.com");
    let _ = create_blog!(app, alice, "Published one", "published");
    let _ = create_blog!(app, alice, "Draft one", "draft");

    // tokens are stateless, so an admin-role token stands on its own
    let admin = tokens
        .generate_token(alice_id.parse().unwrap(), "alice", Role::Admin)
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["stats"]["totalUsers"], 2);
    assert_eq!(body["stats"]["totalBlogs"], 2);
    assert_eq!(body["stats"]["publishedBlogs"], 1);
    assert_eq!(body["stats"]["draftBlogs"], 1);
    assert_eq!(body["stats"]["totalComments"], 0);
    assert_eq!(body["recentBlogs"].as_array().unwrap().len(), 2);
    assert_eq!(body["recentUsers"].as_array().unwrap().len(), 2);

    // invalid role is rejected without touching the record
    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{bob_id}/role"))
        .insert_header(bearer(&admin))
        .set_json(json!({"role": "moderator"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid role");

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{bob_id}/role"))
        .insert_header(bearer(&admin))
        .set_json(json!({"role": "admin"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "admin");
}

#[actix_web::test]
async fn admin_user_delete_cascades_to_their_content() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, alice_id) = register!(app, "alice", "alice@example.com");
    let (bob, bob_id) = register!(app, "bob", "bob@example.com");
    let blog_id = create_blog!(app, bob, "Bob's blog", "published");

    // alice comments on bob's blog, then gets deleted
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&alice))
        .set_json(json!({"blog": blog_id, "content": "Nice"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let admin = tokens
        .generate_token(bob_id.parse().unwrap(), "bob", Role::Admin)
        .unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{alice_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // bob's blog survives with its counter repaired
    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{blog_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["commentsCount"], 0);

    // alice's account is gone
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn profile_update_is_self_service_only() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, alice_id) = register!(app, "alice", "alice@example.com");
    let (bob, _) = register!(app, "bob", "bob@example.com");

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{alice_id}"))
        .insert_header(bearer(&bob))
        .set_json(json!({"bio": "Hijacked"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{alice_id}"))
        .insert_header(bearer(&alice))
        .set_json(json!({"bio": "Writer", "avatarUrl": "https://example.com/a.png"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bio"], "Writer");
    assert_eq!(body["avatarUrl"], "https://example.com/a.png");

    // taking another account's username is rejected
    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{alice_id}"))
        .insert_header(bearer(&alice))
        .set_json(json!({"username": "bob"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn public_listing_filters_and_paginates() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);
    let (alice, _) = register!(app, "alice", "alice@example.com");

    for i in 0..12 {
        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(bearer(&alice))
            .set_json(json!({
                "title": format!("Post {i}"),
                "content": "Body",
                "categories": if i % 2 == 0 { ["tech"] } else { ["life"] },
                "status": "published",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // page math
    let req = test::TestRequest::get()
        .uri("/api/blogs?page=2&limit=5")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 12);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);

    // category filter
    let req = test::TestRequest::get()
        .uri("/api/blogs?category=tech&limit=20")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 6);

    // substring search over titles
    let req = test::TestRequest::get()
        .uri("/api/blogs?search=post%201&limit=20")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    // "Post 1", "Post 10", "Post 11"
    assert_eq!(body["total"], 3);
}

#[actix_web::test]
async fn health_endpoint_reports_ok() {
    let (state, tokens, passwords) = services();
    let app = test_app!(state, tokens, passwords);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "inkwell-api");
}
