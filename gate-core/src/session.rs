//! The session-issuance protocol and the age-consent flag.
//!
//! Both are cookies owned by the browsing agent and mirrored read-only by
//! the edge evaluator. The session token is an opaque bearer string issued
//! only after a successful authentication. This layer never validates it
//! cryptographically. It is a caching artifact the edge gate trusts for
//! at most [`SESSION_MAX_AGE`], which is the documented staleness window.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "__session";
pub const AGE_COOKIE: &str = "age-verified";

pub const SESSION_MAX_AGE: Duration = Duration::days(5);
pub const AGE_MAX_AGE: Duration = Duration::days(365);

/// Cookie attributes that differ per deployment. `secure` is true in
/// production, false for plain-HTTP local runs.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCookieSettings {
    pub secure: bool,
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(SESSION_MAX_AGE)
        .path("/")
        .build()
}

pub fn age_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((AGE_COOKIE, "true"))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(AGE_MAX_AGE)
        .path("/")
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

pub fn has_session(jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE).is_some()
}

pub fn age_verified(jar: &CookieJar) -> bool {
    jar.get(AGE_COOKIE).map(Cookie::value) == Some("true")
}

/// Clear the age-consent flag. Only ever called from the explicit
/// "return to age verification" action; the flag never expires early on
/// its own.
pub fn clear_age(jar: CookieJar) -> CookieJar {
    jar.remove(removal_cookie(AGE_COOKIE))
}

#[derive(Deserialize)]
pub struct SessionRequest {
    pub token: String,
}

/// POST /api/auth/session: set the session cookie.
///
/// Contract: the caller already holds a successfully authenticated
/// identity. A malformed body gets a generic failure and no cookie is
/// written; there is no partial application of attributes.
pub async fn issue(
    State(settings): State<SessionCookieSettings>,
    jar: CookieJar,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<serde_json::Value>), AppError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::error!("Rejected session issuance payload: {}", e);
        AppError::SessionIssuanceFailed
    })?;

    let jar = jar.add(session_cookie(payload.token, settings.secure));
    Ok((jar, Json(serde_json::json!({ "success": true }))))
}

/// DELETE /api/auth/session: drop the session cookie.
///
/// Unconditional and idempotent: succeeds whether or not a cookie exists.
pub async fn revoke(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(removal_cookie(SESSION_COOKIE));
    (jar, Json(serde_json::json!({ "success": true })))
}
