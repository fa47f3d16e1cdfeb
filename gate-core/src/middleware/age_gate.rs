use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::metrics::record_verdict;
use crate::session;
use crate::verdict::{GatePolicy, GateVerdict};

/// Age-consent gate. Mounted outermost on the consumer site. While the
/// consent flag is absent nothing past the verification prompt runs, the
/// identity subscription included. Age consent is a harder precondition
/// than authentication.
pub async fn age_gate_middleware(
    State(policy): State<Arc<GatePolicy>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    let exempt = policy.is_exempt(path)
        || path == policy.age_gate_path
        || path == policy.restricted_path;

    if exempt || session::age_verified(&jar) {
        return next.run(request).await;
    }

    record_verdict("age", GateVerdict::RedirectToAgeGate);
    Redirect::to(&policy.age_gate_path).into_response()
}
