//! Startup configuration.
//!
//! Values come from built-in defaults overridden by `GATEHOUSE_*` environment
//! variables. The resulting [`Config`] is passed explicitly into the router.

use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GatehouseError;

pub const ENV_PREFIX: &str = "GATEHOUSE_";

/// Cookie keys are derived from the secret; shorter input is rejected.
pub const MIN_SECRET_LEN: usize = 64;

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_secret: Option<String>,
    pub session_ttl_secs: u64,
    pub insecure_cookie: bool,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
            database_url: "sqlite:database.db".to_string(),
            db_max_connections: 4,
            session_secret: None,
            session_ttl_secs: 24 * 60 * 60,
            insecure_cookie: false,
            loglevel: "info".to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("database_url", &self.database_url)
            .field("db_max_connections", &self.db_max_connections)
            .field(
                "session_secret",
                &self.session_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("insecure_cookie", &self.insecure_cookie)
            .field("loglevel", &self.loglevel)
            .finish()
    }
}

impl Config {
    /// Load defaults merged with `GATEHOUSE_*` environment variables.
    pub fn load() -> Result<Self, GatehouseError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, GatehouseError> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), GatehouseError> {
        if let Some(secret) = self.session_secret.as_ref()
            && secret.len() < MIN_SECRET_LEN
        {
            return Err(GatehouseError::InvalidConfig(format!(
                "session_secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            )));
        }
        if self.session_ttl_secs == 0 {
            return Err(GatehouseError::InvalidConfig(
                "session_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.db_max_connections == 0 {
            return Err(GatehouseError::InvalidConfig(
                "db_max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Key used to encrypt and sign the session cookie.
    /// Without a configured secret a random key is generated, so sessions
    /// do not survive a restart.
    pub fn cookie_key(&self) -> Result<Key, GatehouseError> {
        match self.session_secret.as_ref() {
            Some(secret) => Key::try_from(secret.as_bytes())
                .map_err(|e| GatehouseError::InvalidConfig(format!("session_secret: {e}"))),
            None => {
                warn!("GATEHOUSE_SESSION_SECRET not set; generating an ephemeral cookie key");
                Ok(Key::generate())
            }
        }
    }

    pub fn session_ttl(&self) -> time::Duration {
        time::Duration::seconds(i64::try_from(self.session_ttl_secs).unwrap_or(i64::MAX))
    }
}
