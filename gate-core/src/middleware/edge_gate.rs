use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::metrics::record_verdict;
use crate::session;
use crate::verdict::{self, GatePolicy, GateVerdict};

/// Edge gate: runs before any route code, per request, with only the
/// session cookie available. Stateless across requests, so concurrent
/// execution needs no locking.
pub async fn edge_gate_middleware(
    State(policy): State<Arc<GatePolicy>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let verdict = verdict::edge(&policy, path, session::has_session(&jar));
    record_verdict("edge", verdict);

    match verdict {
        GateVerdict::Allow => next.run(request).await,
        GateVerdict::RedirectToSignIn => {
            tracing::debug!(path = %path, "No session, redirecting to sign-in");
            Redirect::to(&policy.sign_in_path).into_response()
        }
        GateVerdict::RedirectToHome => Redirect::to(&policy.home_path).into_response(),
        GateVerdict::RedirectToAgeGate => Redirect::to(&policy.age_gate_path).into_response(),
    }
}
