use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::handlers::pages::{LOGIN_PAGE, REGISTER_PAGE};
use crate::middleware::session::{self, LOGIN_PATH};
use crate::{GatehouseError, router::GatehouseState};

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Body of both the login and registration forms.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// GET / -> redirect to /login.
pub async fn index() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub async fn register_page() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

/// POST /login -> sets the session and continues to the dashboard.
/// Unknown users and wrong passwords get the same plaintext response.
pub async fn login(
    State(state): State<GatehouseState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, GatehouseError> {
    if !state.auth.login(&form.username, &form.password).await? {
        return Ok((StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS).into_response());
    }

    let jar = session::start_session(jar, &state.session, &form.username)?;
    Ok((jar, Redirect::to(DASHBOARD_PATH)).into_response())
}

/// POST /register -> stores the credential and sends the user to log in.
pub async fn register(
    State(state): State<GatehouseState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect, GatehouseError> {
    state.auth.register(&form.username, &form.password).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

/// GET /logout -> clears the session.
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (session::end_session(jar), Redirect::to(LOGIN_PATH))
}
