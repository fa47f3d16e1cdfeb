use axum::response::IntoResponse;

pub async fn metrics() -> impl IntoResponse {
    gate_core::metrics::get_metrics()
}
