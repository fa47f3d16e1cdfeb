use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use gate_core::session::{self, SessionCookieSettings};

#[derive(Template)]
#[template(path = "age_verification.html")]
pub struct AgeVerificationTemplate {}

#[derive(Template)]
#[template(path = "age_restriction.html")]
pub struct AgeRestrictionTemplate {}

pub async fn age_verification_page() -> impl IntoResponse {
    AgeVerificationTemplate {}
}

/// Terminal view for visitors who declined. Its only action leads back to
/// the verification prompt.
pub async fn age_restriction_page() -> impl IntoResponse {
    AgeRestrictionTemplate {}
}

/// The visitor affirmed they are 18 or older: set the year-long consent
/// flag and proceed to normal boot.
pub async fn affirm(
    State(cookies): State<SessionCookieSettings>,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = jar.add(session::age_cookie(cookies.secure));
    (jar, Redirect::to("/"))
}

/// The visitor declined: clear the flag if present and land on the
/// restricted view.
pub async fn decline(jar: CookieJar) -> impl IntoResponse {
    let jar = session::clear_age(jar);
    (jar, Redirect::to("/age-restriction"))
}
