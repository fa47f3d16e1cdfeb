use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use consumer_site::config::ContentApiSettings;
use consumer_site::services::listing_client::ListingClient;
use consumer_site::startup::build_router;
use consumer_site::AppState;
use gate_core::identity::HttpIdentityProvider;
use gate_core::session::SessionCookieSettings;
use gate_core::verdict::GatePolicy;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app() -> Router {
    let provider = Arc::new(HttpIdentityProvider::new("http://127.0.0.1:1".to_string()));
    let listings = Arc::new(ListingClient::new(ContentApiSettings {
        url: "http://127.0.0.1:1".to_string(),
    }));
    let mut policy = GatePolicy::default();
    policy.public_prefixes = vec![
        "/posts".to_string(),
        "/videos".to_string(),
        "/models".to_string(),
    ];
    let state = AppState::new(
        provider,
        listings,
        policy,
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

fn post(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
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
async fn unconsented_visitor_only_sees_the_age_prompt() {
    let response = app().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/age-verification");
}

#[tokio::test]
async fn age_gate_outranks_an_existing_session() {
    // Consent is a harder precondition than authentication.
    let response = app()
        .oneshot(get("/", Some("__session=tok_abc")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/age-verification");
}

#[tokio::test]
async fn age_prompt_renders_without_any_cookies() {
    use http_body_util::BodyExt;

    let response = app().oneshot(get("/age-verification", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("adult website"));
}

#[tokio::test]
async fn affirming_sets_the_year_long_flag_and_boots() {
    let response = app().oneshot(post("/api/age/affirm", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("consent cookie set")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("age-verified=true"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Max-Age=31536000"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn declining_clears_the_flag_and_lands_on_the_restricted_view() {
    let response = app()
        .oneshot(post("/api/age/decline", Some("age-verified=true")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/age-restriction");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("removal cookie emitted")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("age-verified="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn restricted_view_offers_the_way_back() {
    use http_body_util::BodyExt;

    let response = app().oneshot(get("/age-restriction", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("/age-verification"));
}
