use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use gate_core::identity::{AuthContext, HttpIdentityProvider};
use gate_core::session::{self, SessionCookieSettings};
use gate_core::verdict::GatePolicy;

#[derive(Template)]
#[template(path = "signin.html")]
pub struct SignInTemplate {}

#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

pub async fn sign_in_page() -> impl IntoResponse {
    SignInTemplate {}
}

fn error_fragment(message: &str) -> Html<String> {
    // Provider messages are plain text; escape before inlining.
    let escaped = message
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    Html(format!("<p class='text-red-500 text-sm'>{}</p>", escaped))
}

/// Sign in and issue the session cookie in one round trip: the cookie is
/// only ever written from a just-authenticated identity.
pub async fn sign_in_handler(
    State(provider): State<Arc<HttpIdentityProvider>>,
    State(cookies): State<SessionCookieSettings>,
    jar: CookieJar,
    Form(payload): Form<SignInRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return (StatusCode::UNPROCESSABLE_ENTITY, error_fragment(&e.to_string()))
            .into_response();
    }

    let mut ctx = AuthContext::mount(provider);
    match ctx.sign_in(&payload.email, &payload.password).await {
        Ok(identity) => {
            tracing::info!(
                subject_id = %identity.record.subject_id,
                email = %identity.record.email,
                is_admin = identity.record.is_admin,
                "User signed in"
            );

            let jar = jar.add(session::session_cookie(identity.id_token, cookies.secure));
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => {
            // Provider message, rendered near the form.
            (StatusCode::UNPROCESSABLE_ENTITY, error_fragment(&e.to_string())).into_response()
        }
    }
}

/// Sign out: local identity flips to anonymous before the provider round
/// trip, and the session cookie is revoked unconditionally.
pub async fn sign_out_handler(
    State(provider): State<Arc<HttpIdentityProvider>>,
    State(policy): State<Arc<GatePolicy>>,
    jar: CookieJar,
) -> impl IntoResponse {
    let mut ctx = AuthContext::mount(provider);
    if let Err(e) = ctx.sign_out().await {
        tracing::error!("Provider sign-out failed, session revoked anyway: {}", e);
    }

    let (jar, _) = session::revoke(jar).await;
    (jar, Redirect::to(&policy.sign_in_path)).into_response()
}
