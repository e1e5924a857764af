use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::db::CredentialStore;
use crate::error::GatehouseError;
use crate::handlers::auth::{index, login, login_page, logout, register, register_page};
use crate::handlers::dashboard::dashboard;
use crate::middleware::session::SessionSettings;
use crate::service::AuthService;

/// Shared request context: the auth service (and its store), cookie key and
/// session settings.
#[derive(Clone)]
pub struct GatehouseState {
    pub auth: AuthService,
    pub session: SessionSettings,
    key: Key,
}

impl GatehouseState {
    pub fn new(auth: AuthService, key: Key, session: SessionSettings) -> Self {
        Self { auth, session, key }
    }

    /// Open the store, make sure the table exists, and derive the cookie key.
    pub async fn from_config(cfg: &Config) -> Result<Self, GatehouseError> {
        let store = CredentialStore::connect(&cfg.database_url, cfg.db_max_connections).await?;
        store.ensure_schema().await?;

        let session = SessionSettings {
            ttl: cfg.session_ttl(),
            secure: !cfg.insecure_cookie,
        };
        Ok(Self::new(AuthService::new(store), cfg.cookie_key()?, session))
    }
}

impl FromRef<GatehouseState> for Key {
    fn from_ref(state: &GatehouseState) -> Self {
        state.key.clone()
    }
}

pub fn gatehouse_router(state: GatehouseState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/dashboard", get(dashboard))
        .route("/logout", get(logout))
        .with_state(state)
}
