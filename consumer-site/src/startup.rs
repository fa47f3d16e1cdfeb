use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use gate_core::middleware::{
    age_gate_middleware, edge_gate_middleware, metrics_middleware, request_id_middleware,
};
use gate_core::session;

use crate::handlers::{
    age::{affirm, age_restriction_page, age_verification_page, decline},
    app::{health_check, index},
    auth::{
        forgot_password_handler, forgot_password_page, sign_in_handler, sign_in_page,
        sign_out_handler, sign_up_handler, sign_up_page,
    },
    content,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/age-verification", get(age_verification_page))
        .route("/age-restriction", get(age_restriction_page))
        .route("/api/age/affirm", post(affirm))
        .route("/api/age/decline", post(decline))
        .route("/auth/signin", get(sign_in_page).post(sign_in_handler))
        .route("/auth/signup", get(sign_up_page).post(sign_up_handler))
        .route(
            "/auth/forgot-password",
            get(forgot_password_page).post(forgot_password_handler),
        )
        .route("/auth/signout", post(sign_out_handler))
        .route(
            "/api/auth/session",
            post(session::issue).delete(session::revoke),
        )
        .route("/posts", get(content::posts))
        .route("/posts/:id", get(content::post))
        .route("/videos", get(content::videos))
        .route("/videos/:id", get(content::video))
        .route("/models", get(content::models))
        .route("/models/:id", get(content::model))
        .nest_service("/static", ServeDir::new("consumer-site/static"))
        // Layer order matters: the age gate is added after the edge gate so
        // it wraps it. Consent is checked before anything identity-shaped
        // runs.
        .layer(from_fn_with_state(state.clone(), edge_gate_middleware))
        .layer(from_fn_with_state(state.clone(), age_gate_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
