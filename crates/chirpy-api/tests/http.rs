use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use chirpy_api::routes;
use chirpy_api::state::AppStateInner;
use chirpy_db::Database;

const SECRET: &str = "test-secret";

fn app() -> Router {
    app_with_platform("dev")
}

fn app_with_platform(platform: &str) -> Router {
    let db = Database::open_in_memory().unwrap();
    let state = AppStateInner::new(db, SECRET.into(), platform.into());
    routes::router(state)
}

async fn send(app: &Router, method: &str, path: &str, body: Option<String>) -> (StatusCode, Value, String) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    do_send(app, request).await
}

async fn send_authed(
    app: &Router,
    method: &str,
    path: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value, String) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();

    do_send(app, request).await
}

async fn do_send(app: &Router, request: Request<Body>) -> (StatusCode, Value, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value, text)
}

async fn register(app: &Router, email: &str, password: &str) -> Value {
    let (status, body, _) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({"username": "a", "email": email, "password": password}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn login(app: &Router, email: &str, password: &str) -> Value {
    let (status, body, _) = send(
        app,
        "POST",
        "/api/login",
        Some(json!({"email": email, "password": password}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn create_user_returns_201_without_password() {
    let app = app();
    let body = register(&app, "a@x.com", "p").await;

    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("password").is_none());
    assert!(body["id"].as_str().is_some());
    assert!(body["created_at"].as_str().is_some());
    assert!(body["updated_at"].as_str().is_some());
}

#[tokio::test]
async fn create_user_with_missing_field_is_400() {
    let app = app();
    let (status, body, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"email": "a@x.com", "password": "p"}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn create_user_with_empty_field_is_400() {
    let app = app();
    let (status, _, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"username": "a", "email": "", "password": "p"}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_body_is_400() {
    let app = app();
    let (status, body, _) = send(&app, "POST", "/api/users", Some("{not json".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn login_returns_token() {
    let app = app();
    register(&app, "a@x.com", "p").await;

    let body = login(&app, "a@x.com", "p").await;
    assert_eq!(body["email"], "a@x.com");
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body.get("refresh_token").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = app();
    register(&app, "a@x.com", "p").await;

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"email": "a@x.com", "password": "wrong"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_unknown_email_is_401() {
    let app = app();
    let (status, _, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"email": "ghost@x.com", "password": "p"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_expiry_is_clamped_to_an_hour() {
    use jsonwebtoken::{DecodingKey, Validation, decode};

    let app = app();
    register(&app, "a@x.com", "p").await;

    for requested in [json!(0), json!(999_999), json!(-30)] {
        let (status, body, _) = send(
            &app,
            "POST",
            "/api/login",
            Some(
                json!({"email": "a@x.com", "password": "p", "expires_in_seconds": requested})
                    .to_string(),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let token = body["token"].as_str().unwrap();
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<chirpy_auth::token::Claims>(
            token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }
}

#[tokio::test]
async fn chirp_without_token_is_401() {
    let app = app();
    let (status, _, _) = send(
        &app,
        "POST",
        "/api/chirps",
        Some(json!({"body": "hello"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chirp_with_bogus_token_is_401() {
    let app = app();
    let (status, _, _) = send_authed(
        &app,
        "POST",
        "/api/chirps",
        "invalid.token.string",
        json!({"body": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn overlong_chirp_is_400() {
    let app = app();
    register(&app, "a@x.com", "p").await;
    let token = login(&app, "a@x.com", "p").await["token"]
        .as_str()
        .unwrap()
        .to_owned();

    let (status, _, _) = send_authed(
        &app,
        "POST",
        "/api/chirps",
        &token,
        json!({"body": "a".repeat(141)}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send_authed(
        &app,
        "POST",
        "/api/chirps",
        &token,
        json!({"body": "a".repeat(140)}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn chirp_profanity_is_masked_and_stored() {
    let app = app();
    let user = register(&app, "a@x.com", "p").await;
    let token = login(&app, "a@x.com", "p").await["token"]
        .as_str()
        .unwrap()
        .to_owned();

    let (status, created, _) = send_authed(
        &app,
        "POST",
        "/api/chirps",
        &token,
        json!({"body": "this is kerfuffle"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["body"], "this is ****");
    assert_eq!(created["user_id"], user["id"]);

    let (status, listed, _) = send(&app, "GET", "/api/chirps", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["body"], "this is ****");

    let id = created["id"].as_str().unwrap();
    let (status, fetched, _) = send(&app, "GET", &format!("/api/chirps/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["body"], "this is ****");
}

#[tokio::test]
async fn unknown_chirp_id_is_404() {
    let app = app();
    let (status, _, _) = send(
        &app,
        "GET",
        "/api/chirps/00000000-0000-0000-0000-000000000999",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validate_chirp_cleans_without_storing() {
    let app = app();
    let (status, body, _) = send(
        &app,
        "POST",
        "/api/validate_chirp",
        Some(json!({"body": "this is sharbert"}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["cleaned_body"], "this is ****");

    let (_, listed, _) = send(&app, "GET", "/api/chirps", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reset_outside_dev_is_403_and_leaves_state() {
    let app = app_with_platform("production");
    register(&app, "a@x.com", "p").await;

    let (status, _, _) = send(&app, "POST", "/admin/reset", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // user data untouched
    login(&app, "a@x.com", "p").await;
}

#[tokio::test]
async fn reset_in_dev_wipes_users() {
    let app = app();
    register(&app, "a@x.com", "p").await;

    let (status, _, text) = send(&app, "POST", "/admin/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("reset successfully"));

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"email": "a@x.com", "password": "p"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn healthz_is_plain_ok() {
    let app = app();
    let (status, _, text) = send(&app, "GET", "/admin/healthz", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");
}

#[tokio::test]
async fn metrics_reports_the_counter() {
    let app = app();
    let (status, _, text) = send(&app, "GET", "/admin/metrics", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("Welcome, Chirpy Admin"));
    assert!(text.contains("visited 0 times"));
}
