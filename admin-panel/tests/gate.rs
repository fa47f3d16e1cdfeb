use admin_panel::config::ContentApiSettings;
use admin_panel::services::content_client::ContentClient;
use admin_panel::startup::build_router;
use admin_panel::AppState;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use gate_core::identity::HttpIdentityProvider;
use gate_core::session::SessionCookieSettings;
use gate_core::verdict::GatePolicy;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app() -> Router {
    let provider = Arc::new(HttpIdentityProvider::new("http://127.0.0.1:1".to_string()));
    let content = Arc::new(ContentClient::new(ContentApiSettings {
        url: "http://127.0.0.1:1".to_string(),
        api_key: None,
    }));
    let state = AppState::new(
        provider,
        content,
        GatePolicy::default(),
        SessionCookieSettings { secure: false },
    );
    build_router(state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn protected_request_without_session_redirects_to_sign_in() {
    let response = app().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/signin");
}

#[tokio::test]
async fn sign_in_page_with_session_redirects_home() {
    // Edge verdict is independent of whether the identity behind the
    // cookie is still valid: the cookie alone decides.
    let response = app()
        .oneshot(get("/auth/signin", Some("__session=tok_stale")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn sign_in_page_renders_without_session() {
    let response = app().oneshot(get("/auth/signin", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_renders_with_session() {
    let response = app()
        .oneshot(get("/", Some("__session=tok_abc")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_check_is_outside_the_matcher() {
    use http_body_util::BodyExt;

    let response = app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn session_issue_round_trips_the_token() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"token":"tok_abc"}"#))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("__session=tok_abc"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=432000"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn malformed_session_payload_sets_no_cookie() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"not_a_token": 1}"#))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn session_revoke_is_idempotent() {
    for _ in 0..2 {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/auth/session")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("removal cookie emitted")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("__session="));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}

#[tokio::test]
async fn sign_out_redirect_follows_the_configured_sign_in_path() {
    let provider = Arc::new(HttpIdentityProvider::new("http://127.0.0.1:1".to_string()));
    let content = Arc::new(ContentClient::new(ContentApiSettings {
        url: "http://127.0.0.1:1".to_string(),
        api_key: None,
    }));
    let mut policy = GatePolicy::default();
    policy.sign_in_path = "/auth/login".to_string();
    let state = AppState::new(
        provider,
        content,
        policy,
        SessionCookieSettings { secure: false },
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/signout")
        .body(Body::empty())
        .unwrap();
    let response = build_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn unknown_content_resource_is_not_proxied() {
    let response = app()
        .oneshot(get("/api/content/secrets", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
