use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use reqwest::header::HeaderName;
use serde_json::json;

use super::*;
use crate::test_support::{Recorded, anonymous_client, authed_client, dead_base_url, serve};

fn echo_router(recorded: Recorded) -> Router {
    Router::new().route(
        "/echo",
        post(move |headers: HeaderMap, body: String| {
            let recorded = recorded.clone();
            async move {
                recorded.push("/echo", &headers, &body);
                Json(json!({ "ok": true }))
            }
        }),
    )
}

// =============================================================================
// HEADERS
// =============================================================================

#[tokio::test]
async fn sends_json_content_type_and_bearer_token() {
    let recorded = Recorded::default();
    let base = serve(echo_router(recorded.clone())).await;
    let (api, _) = authed_client(&base, "tok-123");

    let request = ApiRequest::post("/echo").json(&json!({ "a": 1 })).unwrap();
    api.execute(request).await.unwrap();

    let seen = recorded.last();
    assert_eq!(seen.headers["content-type"], "application/json");
    assert_eq!(seen.headers["authorization"], "Bearer tok-123");
    assert_eq!(serde_json::from_str::<Value>(&seen.body).unwrap(), json!({ "a": 1 }));
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let recorded = Recorded::default();
    let base = serve(echo_router(recorded.clone())).await;
    let (api, _) = anonymous_client(&base);

    api.execute(ApiRequest::post("/echo")).await.unwrap();

    assert!(recorded.last().headers.get("authorization").is_none());
}

#[tokio::test]
async fn header_overrides_replace_defaults() {
    let recorded = Recorded::default();
    let base = serve(echo_router(recorded.clone())).await;
    let (api, _) = authed_client(&base, "tok");

    let request = ApiRequest::post("/echo")
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer other"))
        .header(HeaderName::from_static("x-trace"), HeaderValue::from_static("t1"));
    api.execute(request).await.unwrap();

    let seen = recorded.last();
    assert_eq!(seen.headers["authorization"], "Bearer other");
    assert_eq!(seen.headers["x-trace"], "t1");
}

// =============================================================================
// SUCCESS PATH
// =============================================================================

#[tokio::test]
async fn created_and_no_content_are_empty_regardless_of_body() {
    let router = Router::new()
        .route("/created", post(|| async { (StatusCode::CREATED, Json(json!({ "id": "x" }))) }))
        .route("/gone", post(|| async { StatusCode::NO_CONTENT }));
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    assert_eq!(api.send(ApiRequest::post("/created")).await.unwrap(), Payload::Empty);
    assert_eq!(api.send(ApiRequest::post("/gone")).await.unwrap(), Payload::Empty);
}

#[tokio::test]
async fn keep_created_body_decodes_201() {
    let router = Router::new().route("/created", post(|| async { (StatusCode::CREATED, Json(json!({ "id": "x" }))) }));
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    let payload = api.send(ApiRequest::post("/created").keep_created_body()).await.unwrap();
    assert_eq!(payload, Payload::Json(json!({ "id": "x" })));
}

#[tokio::test]
async fn non_json_success_body_is_empty() {
    let router = Router::new().route("/text", get(|| async { "plain text" }));
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    assert_eq!(api.send(ApiRequest::get("/text")).await.unwrap(), Payload::Empty);
    let users: Vec<types::User> = api.request(ApiRequest::get("/text")).await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn mismatched_shape_decodes_to_default() {
    let router = Router::new().route("/odd", get(|| async { Json(json!({ "unexpected": true })) }));
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    let user: types::User = api.request(ApiRequest::get("/odd")).await.unwrap();
    assert_eq!(user, types::User::default());
}

#[tokio::test]
async fn one_invalid_record_empties_a_listing() {
    let router = Router::new().route(
        "/reviews/s1",
        get(|| async {
            Json(json!([
                { "id": "r1", "authorName": "A", "rating": 5, "text": "ok" },
                { "id": "r2", "authorName": "B", "rating": 9, "text": "bad rating" }
            ]))
        }),
    );
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    let reviews: Vec<types::Review> = api.request(ApiRequest::get("/reviews/s1")).await.unwrap();
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn request_decodes_typed_body() {
    let router = Router::new().route(
        "/auth/me",
        get(|| async { Json(json!({ "id": "u1", "name": "Ada", "email": "ada@example.com" })) }),
    );
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    let user: types::User = api.request(ApiRequest::get("/auth/me")).await.unwrap();
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
}

// =============================================================================
// FAILURE PATH
// =============================================================================

#[tokio::test]
async fn error_message_taken_from_json_body() {
    let router = Router::new().route(
        "/auth/login",
        post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))) }),
    );
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    let err = api.execute(ApiRequest::post("/auth/login")).await.unwrap_err();
    assert_eq!(err.message, "Invalid credentials");
    assert_eq!(err.status, 401);
    assert!(err.is_auth_rejection());
}

#[tokio::test]
async fn empty_error_body_uses_status_message() {
    let router = Router::new().route("/boom", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    let err = api.execute(ApiRequest::get("/boom")).await.unwrap_err();
    assert_eq!(err.message, "HTTP 503");
    assert_eq!(err.status, 503);
    assert_eq!(err.kind(), ApiErrorKind::Http);
}

#[tokio::test]
async fn text_error_body_used_verbatim() {
    let router = Router::new().route(
        "/auth/signup",
        post(|| async { (StatusCode::BAD_REQUEST, "Email is already taken!") }),
    );
    let base = serve(router).await;
    let (api, _) = anonymous_client(&base);

    let err = api.execute(ApiRequest::post("/auth/signup")).await.unwrap_err();
    assert_eq!(err.message, "Email is already taken!");
    assert_eq!(err.status, 400);
}

#[tokio::test]
async fn unknown_route_is_http_404() {
    let base = serve(Router::new()).await;
    let (api, _) = anonymous_client(&base);

    let err = api.execute(ApiRequest::get("/missing")).await.unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.message, "HTTP 404");
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let base = dead_base_url().await;
    let (api, _) = anonymous_client(&base);

    let err = api.execute(ApiRequest::get("/spaces")).await.unwrap_err();
    assert_eq!(err.status, 0);
    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.message, error::NETWORK_ERROR_MESSAGE);
    assert!(err.details.unwrap().get("originalError").is_some());
}

#[tokio::test]
async fn timeout_is_network_error() {
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!([]))
        }),
    );
    let base = serve(router).await;
    let config = ClientConfig {
        base_url: base,
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientConfig::default()
    };
    let api = ApiClient::new(&config, Arc::new(crate::session::MemorySessionStore::new())).unwrap();

    let err = api.execute(ApiRequest::get("/slow")).await.unwrap_err();
    assert_eq!(err.status, 0);
    assert_eq!(err.kind(), ApiErrorKind::Network);
    assert_eq!(err.message, error::NETWORK_ERROR_MESSAGE);
}

#[tokio::test]
async fn unbuildable_request_is_unexpected_error() {
    let (api, _) = anonymous_client("http://bad host/api");

    let err = api.execute(ApiRequest::get("/spaces")).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(err.kind(), ApiErrorKind::Unexpected);
    assert_eq!(err.message, error::UNEXPECTED_ERROR_MESSAGE);
    let details = err.details.unwrap();
    assert!(details["originalError"].as_str().is_some_and(|cause| !cause.is_empty()));
}

#[test]
fn url_for_joins_base_and_path() {
    let config = ClientConfig { base_url: "http://localhost:8080/api/".to_owned(), ..ClientConfig::default() };
    let api = ApiClient::new(&config, Arc::new(crate::session::MemorySessionStore::new())).unwrap();
    assert_eq!(api.url_for("/spaces/abc"), "http://localhost:8080/api/spaces/abc");
}
