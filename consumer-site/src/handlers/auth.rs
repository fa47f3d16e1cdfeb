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

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignUpTemplate {}

#[derive(Template)]
#[template(path = "forgot_password.html")]
pub struct ForgotPasswordTemplate {}

#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

pub async fn sign_in_page() -> impl IntoResponse {
    SignInTemplate {}
}

pub async fn sign_up_page() -> impl IntoResponse {
    SignUpTemplate {}
}

pub async fn forgot_password_page() -> impl IntoResponse {
    ForgotPasswordTemplate {}
}

fn error_fragment(message: &str) -> Html<String> {
    let escaped = message
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    Html(format!("<p class='text-red-500 text-sm'>{}</p>", escaped))
}

pub async fn sign_in_handler(
    State(provider): State<Arc<HttpIdentityProvider>>,
    State(cookies): State<SessionCookieSettings>,
    jar: CookieJar,
    Form(payload): Form<CredentialsRequest>,
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
                "User signed in"
            );
            let jar = jar.add(session::session_cookie(identity.id_token, cookies.secure));
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_fragment(&e.to_string())).into_response()
        }
    }
}

/// Sign up, then send the verification email. A failed send does not roll
/// back the account: the identity is live, the mail can be re-requested.
pub async fn sign_up_handler(
    State(provider): State<Arc<HttpIdentityProvider>>,
    State(cookies): State<SessionCookieSettings>,
    jar: CookieJar,
    Form(payload): Form<CredentialsRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return (StatusCode::UNPROCESSABLE_ENTITY, error_fragment(&e.to_string()))
            .into_response();
    }

    let mut ctx = AuthContext::mount(provider);
    match ctx.sign_up(&payload.email, &payload.password).await {
        Ok(identity) => {
            if let Err(e) = ctx.send_verification_email(&identity.id_token).await {
                tracing::error!("Verification email send failed: {}", e);
            }

            tracing::info!(
                subject_id = %identity.record.subject_id,
                email = %identity.record.email,
                "User signed up"
            );
            let jar = jar.add(session::session_cookie(identity.id_token, cookies.secure));
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_fragment(&e.to_string())).into_response()
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

/// Trigger the provider's password-reset mail. Confirmation of the reset
/// happens on the provider's own pages.
pub async fn forgot_password_handler(
    State(provider): State<Arc<HttpIdentityProvider>>,
    Form(payload): Form<PasswordResetRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return (StatusCode::UNPROCESSABLE_ENTITY, error_fragment(&e.to_string()))
            .into_response();
    }

    let mut ctx = AuthContext::mount(provider);
    match ctx.send_password_reset(&payload.email).await {
        Ok(()) => {
            tracing::info!(email = %payload.email, "Password reset email requested");
            (
                StatusCode::OK,
                Html(
                    "<p class='text-emerald-500 text-sm'>Password reset email sent! Check your inbox.</p>"
                        .to_string(),
                ),
            )
                .into_response()
        }
        Err(e) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_fragment(&e.to_string())).into_response()
        }
    }
}

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
