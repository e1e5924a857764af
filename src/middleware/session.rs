use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::debug;

use crate::error::GatehouseError;

pub const SESSION_COOKIE: &str = "gatehouse_session";

/// Where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Cookie lifetime and transport settings, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl: Duration,
    pub secure: bool,
}

/// Encrypted cookie contents. `expires_at` is unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub user: String,
    pub expires_at: i64,
}

impl SessionPayload {
    pub fn new(user: impl Into<String>, ttl: Duration) -> Self {
        Self {
            user: user.into(),
            expires_at: Utc::now().timestamp().saturating_add(ttl.whole_seconds()),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Mark `user` as logged in.
pub fn start_session(
    jar: PrivateCookieJar,
    settings: &SessionSettings,
    user: &str,
) -> Result<PrivateCookieJar, GatehouseError> {
    let payload = SessionPayload::new(user, settings.ttl);
    let value = serde_json::to_string(&payload)?;
    Ok(jar.add(build_cookie(value, settings)))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie())
}

/// Logged-in username, if the cookie decrypts, parses and has not expired.
pub fn read_session(jar: &PrivateCookieJar) -> Option<String> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let payload: SessionPayload = match serde_json::from_str(cookie.value()) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "discarding unparseable session payload");
            return None;
        }
    };
    if payload.is_expired_at(Utc::now().timestamp()) {
        debug!(user = %payload.user, "session expired");
        return None;
    }
    Some(payload.user)
}

fn build_cookie(value: String, settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .max_age(settings.ttl)
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Extractor for routes that require a login. Anonymous requests are
/// redirected to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        read_session(&jar)
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn settings() -> SessionSettings {
        SessionSettings {
            ttl: Duration::hours(1),
            secure: true,
        }
    }

    #[test]
    fn started_session_reads_back_user() {
        let jar = PrivateCookieJar::new(Key::generate());
        let jar = start_session(jar, &settings(), "alice").expect("start session");
        assert_eq!(read_session(&jar).as_deref(), Some("alice"));
    }

    #[test]
    fn ended_session_reads_as_anonymous() {
        let jar = PrivateCookieJar::new(Key::generate());
        let jar = start_session(jar, &settings(), "alice").expect("start session");
        let jar = end_session(jar);
        assert_eq!(read_session(&jar), None);
    }

    #[test]
    fn expired_payload_is_ignored() {
        let payload = SessionPayload {
            user: "alice".to_string(),
            expires_at: Utc::now().timestamp() - 1,
        };
        let value = serde_json::to_string(&payload).expect("serialize");
        let jar = PrivateCookieJar::new(Key::generate()).add(Cookie::new(SESSION_COOKIE, value));
        assert_eq!(read_session(&jar), None);
    }

    #[test]
    fn non_json_payload_is_ignored() {
        let jar =
            PrivateCookieJar::new(Key::generate()).add(Cookie::new(SESSION_COOKIE, "alice"));
        assert_eq!(read_session(&jar), None);
    }

    #[test]
    fn tampered_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("gatehouse_session=bm90LWVuY3J5cHRlZA"),
        );
        let jar = PrivateCookieJar::from_headers(&headers, Key::generate());
        assert_eq!(read_session(&jar), None);
    }

    #[test]
    fn cookie_attributes_follow_settings() {
        let cookie = build_cookie("v".to_string(), &settings());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::hours(1)));

        let insecure = SessionSettings {
            secure: false,
            ..settings()
        };
        assert_eq!(build_cookie("v".to_string(), &insecure).secure(), Some(false));
    }

    #[test]
    fn payload_expiry_boundary() {
        let payload = SessionPayload {
            user: "u".to_string(),
            expires_at: 100,
        };
        assert!(!payload.is_expired_at(99));
        assert!(payload.is_expired_at(100));
    }
}
