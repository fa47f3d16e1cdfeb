use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use gate_core::middleware::{edge_gate_middleware, metrics_middleware, request_id_middleware};
use gate_core::session;

use crate::handlers::{
    app::{health_check, index},
    auth::{sign_in_handler, sign_in_page, sign_out_handler},
    content,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/auth/signin", get(sign_in_page).post(sign_in_handler))
        .route("/auth/signout", post(sign_out_handler))
        .route(
            "/api/auth/session",
            post(session::issue).delete(session::revoke),
        )
        .route(
            "/api/content/:resource",
            get(content::list).post(content::create),
        )
        .route(
            "/api/content/:resource/:id",
            get(content::fetch)
                .put(content::update)
                .delete(content::remove),
        )
        .nest_service("/static", ServeDir::new("admin-panel/static"))
        // Edge gate runs before any route code; /api, /static, /health and
        // /metrics are outside its matcher.
        .layer(from_fn_with_state(state.clone(), edge_gate_middleware))
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
