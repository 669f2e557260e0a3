mod common;
mod http_helpers;

use axum::http::StatusCode;
use axum::Router;
use common::read_json;
use http_helpers::{authed_json_request, authed_request, json_request};
use std::sync::Arc;
use std::time::Duration;
use tastytales::app::{build_router, AppState};
use tastytales::auth::AuthVerifier;
use tastytales::service::RecipeService;
use tastytales::store::memory::InMemoryStore;
use tastytales::store::RecipeStore;
use tastytales::upload::LocalDiskUploader;
use tastytales_cache::{CacheStore, MemoryCache};
use tower::ServiceExt;

fn test_app(media_dir: &std::path::Path) -> Router {
    let store: Arc<dyn RecipeStore> = Arc::new(InMemoryStore::new());
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
    let uploader = Arc::new(LocalDiskUploader::new(media_dir.to_path_buf(), "/media"));
    let verifier = Arc::new(AuthVerifier::new(
        "test-secret",
        Duration::from_secs(3600),
        cache.clone(),
    ));
    let service = Arc::new(RecipeService::new(
        store.clone(),
        cache,
        uploader,
        Duration::from_secs(180),
    ));
    build_router(AppState {
        service,
        store,
        verifier,
        api_version: "v1".to_string(),
        cache_backend: "memory",
        media_dir: media_dir.to_path_buf(),
    })
}

async fn signup_and_login(app: &Router, first_name: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({
                "firstName": first_name,
                "email": email,
                "password": "hunter2"
            }),
        ))
        .await
        .expect("signup");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "userName": email, "password": "hunter2" }),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    payload["token"].as_str().expect("token").to_string()
}

async fn create_recipe(app: &Router, token: &str, title: &str, minutes: u32) -> String {
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/recipes",
            token,
            serde_json::json!({
                "title": title,
                "ingredients": ["water", "salt"],
                "steps": ["boil", "season"],
                "preparationTime": minutes
            }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json(response).await;
    payload["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn recipe_crud_and_search_smoke() {
    let media = tempfile::tempdir().expect("tempdir");
    let app = test_app(media.path());
    let token = signup_and_login(&app, "Alice", "alice@example.com").await;

    let recipe_id = create_recipe(&app, &token, "Soup", 20).await;

    // Case-insensitive substring title match finds the recipe.
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/recipes?title=soup", &token))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["pagination"]["total"].as_u64(), Some(1));
    assert_eq!(payload["data"][0]["id"].as_str(), Some(recipe_id.as_str()));
    assert_eq!(payload["data"][0]["averageStars"].as_f64(), Some(0.0));
    assert_eq!(
        payload["data"][0]["owner"]["email"].as_str(),
        Some("alice@example.com")
    );

    // A tighter preparation-time bound excludes it.
    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            "/api/recipes?maxPreparationTime=10",
            &token,
        ))
        .await
        .expect("list");
    let payload = read_json(response).await;
    assert_eq!(payload["pagination"]["total"].as_u64(), Some(0));
    assert_eq!(payload["data"].as_array().map(Vec::len), Some(0));

    // Single read expands the owner.
    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/{recipe_id}"),
            &token,
        ))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["title"].as_str(), Some("Soup"));
    assert_eq!(payload["owner"]["firstName"].as_str(), Some("Alice"));

    // Update, then read again: the cached copy must not survive the update.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/recipes/{recipe_id}"),
            &token,
            serde_json::json!({
                "title": "Winter Soup",
                "ingredients": ["water", "salt", "leek"],
                "steps": ["boil", "season"],
                "preparationTime": 25
            }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/{recipe_id}"),
            &token,
        ))
        .await
        .expect("get after update");
    let payload = read_json(response).await;
    assert_eq!(payload["title"].as_str(), Some("Winter Soup"));
    assert_eq!(payload["preparationTime"].as_u64(), Some(25));

    // Delete, then the recipe is gone.
    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/recipes/{recipe_id}"),
            &token,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/{recipe_id}"),
            &token,
        ))
        .await
        .expect("get after delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feedback_rating_conflict_and_comment_idempotence() {
    let media = tempfile::tempdir().expect("tempdir");
    let app = test_app(media.path());
    let owner_token = signup_and_login(&app, "Alice", "alice@example.com").await;
    let rater_token = signup_and_login(&app, "Bob", "bob@example.com").await;
    let recipe_id = create_recipe(&app, &owner_token, "Cake", 90).await;

    // First rating lands.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/recipes/rating/{recipe_id}"),
            &rater_token,
            serde_json::json!({ "rating": 5 }),
        ))
        .await
        .expect("rating");
    assert_eq!(response.status(), StatusCode::OK);

    // Second rating from the same user conflicts and changes nothing.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/recipes/rating/{recipe_id}"),
            &rater_token,
            serde_json::json!({ "rating": 2 }),
        ))
        .await
        .expect("duplicate rating");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert_eq!(payload["code"].as_str(), Some("already_rated"));

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/{recipe_id}"),
            &rater_token,
        ))
        .await
        .expect("detail");
    let payload = read_json(response).await;
    assert_eq!(payload["starsCount"].as_u64(), Some(1));
    assert_eq!(payload["averageStars"].as_f64(), Some(5.0));
    assert_eq!(payload["stars"][0]["rating"].as_u64(), Some(5));

    // Out-of-range ratings are rejected before the facade runs.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/recipes/rating/{recipe_id}"),
            &owner_token,
            serde_json::json!({ "rating": 6 }),
        ))
        .await
        .expect("bad rating");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Commenting twice leaves exactly one comment with the latest text.
    for text in ["first thoughts", "final thoughts"] {
        let response = app
            .clone()
            .oneshot(authed_json_request(
                "PUT",
                &format!("/api/recipes/comment/{recipe_id}"),
                &rater_token,
                serde_json::json!({ "comment": text }),
            ))
            .await
            .expect("comment");
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/{recipe_id}"),
            &rater_token,
        ))
        .await
        .expect("detail");
    let payload = read_json(response).await;
    let comments = payload["comments"].as_array().expect("comments");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"].as_str(), Some("final thoughts"));

    // The feedback probe reflects both.
    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/user-feedback/{recipe_id}"),
            &rater_token,
        ))
        .await
        .expect("feedback");
    let payload = read_json(response).await;
    assert_eq!(payload["userRated"].as_bool(), Some(true));
    assert_eq!(payload["userCommented"].as_bool(), Some(true));
    assert_eq!(payload["rating"]["rating"].as_u64(), Some(5));

    // The owner has left no feedback.
    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/user-feedback/{recipe_id}"),
            &owner_token,
        ))
        .await
        .expect("feedback");
    let payload = read_json(response).await;
    assert_eq!(payload["userRated"].as_bool(), Some(false));
    assert_eq!(payload["userCommented"].as_bool(), Some(false));
}

#[tokio::test]
async fn ownership_isolation_hides_other_users_recipes() {
    let media = tempfile::tempdir().expect("tempdir");
    let app = test_app(media.path());
    let owner_token = signup_and_login(&app, "Alice", "alice@example.com").await;
    let other_token = signup_and_login(&app, "Mallory", "mallory@example.com").await;
    let recipe_id = create_recipe(&app, &owner_token, "Secret Sauce", 5).await;

    // A non-owner's update or delete is indistinguishable from a missing
    // recipe.
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/recipes/{recipe_id}"),
            &other_token,
            serde_json::json!({
                "title": "Stolen Sauce",
                "ingredients": ["vinegar"],
                "steps": ["shake"]
            }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/api/recipes/{recipe_id}"),
            &other_token,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Reading is open to any authenticated user, and the recipe is intact.
    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/api/recipes/{recipe_id}"),
            &other_token,
        ))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["title"].as_str(), Some("Secret Sauce"));
}

#[tokio::test]
async fn auth_gates_and_logout_blacklist() {
    let media = tempfile::tempdir().expect("tempdir");
    let app = test_app(media.path());

    // No token, no recipes.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/recipes",
            serde_json::json!({
                "title": "Toast",
                "ingredients": ["bread"],
                "steps": ["toast"]
            }),
        ))
        .await
        .expect("unauthenticated create");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = signup_and_login(&app, "Alice", "alice@example.com").await;
    create_recipe(&app, &token, "Toast", 5).await;

    // Duplicate signup conflicts regardless of email casing.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({
                "firstName": "Imposter",
                "email": "ALICE@example.com",
                "password": "hunter2"
            }),
        ))
        .await
        .expect("duplicate signup");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Wrong password is rejected without leaking account existence.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "userName": "alice@example.com", "password": "wrong" }),
        ))
        .await
        .expect("bad login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logout blacklists the token for its remaining lifetime.
    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/auth/logout", &token))
        .await
        .expect("logout");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/recipes", &token))
        .await
        .expect("blacklisted list");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = read_json(response).await;
    assert!(payload["message"]
        .as_str()
        .expect("message")
        .contains("blacklisted"));
}

#[tokio::test]
async fn validation_rejects_malformed_payloads() {
    let media = tempfile::tempdir().expect("tempdir");
    let app = test_app(media.path());
    let token = signup_and_login(&app, "Alice", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/recipes",
            &token,
            serde_json::json!({
                "title": "   ",
                "ingredients": [],
                "steps": ["boil"]
            }),
        ))
        .await
        .expect("invalid create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"].as_str(), Some("validation_error"));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            serde_json::json!({
                "firstName": "Alice",
                "email": "not-an-email",
                "password": "hunter2"
            }),
        ))
        .await
        .expect("invalid signup");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_upload_roundtrip() {
    let media = tempfile::tempdir().expect("tempdir");
    let app = test_app(media.path());
    let token = signup_and_login(&app, "Alice", "alice@example.com").await;

    let boundary = "tastytales-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"image\"; filename=\"soup.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(b"fake png bytes");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/recipes/upload-image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::from(body))
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("upload");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    let url = payload["url"].as_str().expect("url");
    assert!(url.starts_with("/media/"));
    assert!(url.ends_with(".png"));

    let file_name = url.rsplit('/').next().expect("file name");
    let written = std::fs::read(media.path().join(file_name)).expect("file on disk");
    assert_eq!(written, b"fake png bytes");

    // A multipart body without an `image` field is a 400.
    let empty = format!("--{boundary}--\r\n");
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/recipes/upload-image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::from(empty))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn system_endpoints_report_backends() {
    let media = tempfile::tempdir().expect("tempdir");
    let app = test_app(media.path());

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .uri("/v1/system/health")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["status"].as_str(), Some("ok"));

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .uri("/v1/system/info")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("info");
    let payload = read_json(response).await;
    assert_eq!(payload["storeBackend"].as_str(), Some("memory"));
    assert_eq!(payload["cacheBackend"].as_str(), Some("memory"));
}
