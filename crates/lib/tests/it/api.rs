use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::routing::get;
use image_randomizer::api::{AppState, panic_response, router};
use image_randomizer::service::Credentials;
use image_randomizer::token::TokenKind;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

use crate::helpers::*;

async fn test_app() -> Router {
    let ctx = test_context().await;
    router(AppState::new(ctx.service, Duration::from_secs(30)))
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Register `username` and return its access and refresh tokens.
async fn register(app: &Router, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/register",
            None,
            json!({"username": username, "password": "secret"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["data"]["access_token"].as_str().unwrap().to_string(),
        body["data"]["refresh_token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn full_flow() {
    let base = serve_images().await;
    let app = test_app().await;

    let (access, refresh) = register(&app, "Alice").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            None,
            json!({"username": "alice", "password": "secret"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "ok");
    assert!(body["data"]["access_token"].is_string());

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/images",
            Some(&access),
            json!({"image": format!("{base}/img/first")}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "created");
    let id = body["data"]["id"].as_i64().unwrap();
    let owner = body["data"]["user_id"].as_i64().unwrap();

    let (status, body) = send(&app, bare_request(Method::GET, "/images", Some(&access))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["image"], format!("{base}/img/first"));

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/images/{id}"),
            Some(&access),
            json!({"image": format!("{base}/img/second")}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["image"], format!("{base}/img/second"));

    let response = app
        .clone()
        .oneshot(bare_request(Method::GET, "/user/alice/image.jpg", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/jpeg");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"second");

    let (status, body) = send(&app, bare_request(Method::POST, "/token/refresh", Some(&refresh))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["refresh_token"], refresh.as_str());
    let fresh = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, bare_request(Method::POST, "/token/check", Some(&fresh))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "user_id": owner }));

    let (status, body) = send(
        &app,
        bare_request(Method::DELETE, &format!("/images/{id}"), Some(&access)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);

    let (status, body) = send(&app, bare_request(Method::GET, "/user/alice/image.jpg", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "image not found");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = test_app().await;

    let (status, body) = send(&app, bare_request(Method::GET, "/images", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert_eq!(body["message"], "required token");
    assert_eq!(body["data"], Value::Null);

    let (status, body) = send(&app, bare_request(Method::GET, "/images", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid token or already expired");
}

#[tokio::test]
async fn token_from_query_or_cookie() {
    let app = test_app().await;
    let (access, _) = register(&app, "alice").await;

    let (status, _) = send(
        &app,
        bare_request(Method::GET, &format!("/images?jwt={access}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/images")
        .header(COOKIE, format!("jwt={access}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    // The header wins even when it is wrong
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/images?jwt={access}"))
        .header(AUTHORIZATION, "Bearer garbage")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_cannot_authorize_requests() {
    let app = test_app().await;
    let (access, refresh) = register(&app, "alice").await;

    let (status, _) = send(&app, bare_request(Method::POST, "/token/check", Some(&refresh))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, bare_request(Method::POST, "/token/refresh", Some(&access))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_access_token_stops_working() {
    let app = test_app().await;
    let (access, _) = register(&app, "alice").await;

    let (status, _) = send(&app, bare_request(Method::POST, "/token/revoke", Some(&access))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, bare_request(Method::POST, "/token/check", Some(&access))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid token or already expired");
}

#[tokio::test]
async fn malformed_input_is_an_invalid_request() {
    let app = test_app().await;
    let (access, _) = register(&app, "alice").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request format");

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/images/abc",
            Some(&access),
            json!({"image": "http://example.com/a.jpg"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request format");

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/images", Some(&access), json!({"image": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "field image must be in url format");
}

#[tokio::test]
async fn duplicate_registration_and_bad_login() {
    let app = test_app().await;
    register(&app, "alice").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/register",
            None,
            json!({"username": "ALICE", "password": "x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "duplicate username");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            None,
            json!({"username": "alice", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "wrong username/password");

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/login", None, json!({"username": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "required field password");
}

#[tokio::test]
async fn other_users_images_are_not_found() {
    let app = test_app().await;
    let (alice, _) = register(&app, "alice").await;
    let (bob, _) = register(&app, "bob").await;

    let (_, body) = send(
        &app,
        json_request(
            Method::POST,
            "/images",
            Some(&alice),
            json!({"image": "http://example.com/a.jpg"}),
        ),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        bare_request(Method::DELETE, &format!("/images/{id}"), Some(&bob)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "image not found");

    let (status, body) = send(&app, bare_request(Method::GET, "/user/carol/image.jpg", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");
}

#[tokio::test]
async fn unknown_route_is_a_404_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, bare_request(Method::GET, "/nowhere", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "not found");
}

#[tokio::test]
async fn ping_and_health() {
    let app = test_app().await;

    let (status, body) = send(&app, bare_request(Method::GET, "/ping", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "pong");

    let (status, body) = send(&app, bare_request(Method::GET, "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn slow_request_times_out() {
    let base = serve_images().await;
    let ctx = test_context().await;

    // Set up outside the router so password hashing is not on the clock
    let pair = ctx
        .service
        .register(Credentials::new("alice", "secret"))
        .await
        .unwrap();
    let claim = ctx
        .service
        .validate_token(TokenKind::Access, &pair.access_token)
        .await
        .unwrap();
    ctx.service
        .create_image(&claim, &format!("{base}/slow"))
        .await
        .unwrap();

    let app = router(AppState::new(ctx.service, Duration::from_millis(200)));
    let (status, body) = send(&app, bare_request(Method::GET, "/user/alice/image.jpg", None)).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["status"], 408);
    assert_eq!(body["message"], "request timeout");
}

#[tokio::test]
async fn panics_become_500_envelopes() {
    let app: Router = Router::new()
        .route(
            "/boom",
            get(|| async {
                if true {
                    panic!("boom");
                }
                "unreachable"
            }),
        )
        .layer(CatchPanicLayer::custom(panic_response));

    let (status, body) = send(&app, bare_request(Method::GET, "/boom", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert_eq!(body["message"], "internal server error");
}
