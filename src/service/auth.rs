use tracing::{info, warn};

use crate::db::CredentialStore;
use crate::error::GatehouseError;
use crate::service::password::{hash_password, verify_password};

/// Registers credentials and checks logins against the store.
#[derive(Clone)]
pub struct AuthService {
    store: CredentialStore,
}

impl AuthService {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Hash `password` and append a row. Empty or already-taken usernames are accepted.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), GatehouseError> {
        let password = password.to_owned();
        // Argon2 is CPU-bound; keep it off the async workers.
        let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
        self.store.insert(username, &hash).await?;
        info!(username = ?username, "registered credential");
        Ok(())
    }

    /// True only when a row exists for `username` and `password` verifies against it.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, GatehouseError> {
        let Some(stored) = self.store.find_by_username(username).await? else {
            warn!(username = ?username, reason = "unknown username", "login rejected");
            return Ok(false);
        };

        let password = password.to_owned();
        let ok = tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?;
        if ok {
            info!(username = ?username, "login accepted");
        } else {
            warn!(username = ?username, reason = "password mismatch", "login rejected");
        }
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("log buffer poisoned").clone())
                .expect("logs were not utf-8")
        }
    }

    async fn service() -> AuthService {
        let store = CredentialStore::connect("sqlite::memory:", 1)
            .await
            .expect("failed to open in-memory sqlite");
        store.ensure_schema().await.expect("schema init failed");
        AuthService::new(store)
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let auth = service().await;
        auth.register("alice", "wonderland").await.expect("register");
        assert!(auth.login("alice", "wonderland").await.expect("login"));
    }

    #[tokio::test]
    async fn stored_value_is_not_the_plaintext() {
        let auth = service().await;
        auth.register("alice", "wonderland").await.expect("register");
        let stored = auth
            .store()
            .find_by_username("alice")
            .await
            .expect("query")
            .expect("row should exist");
        assert_ne!(stored, "wonderland");
        assert!(!stored.contains("wonderland"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_both_fail() {
        let auth = service().await;
        auth.register("alice", "wonderland").await.expect("register");
        assert!(!auth.login("alice", "looking-glass").await.expect("login"));
        assert!(!auth.login("mallory", "wonderland").await.expect("login"));
    }

    #[tokio::test]
    async fn login_checks_earliest_duplicate_row() {
        let auth = service().await;
        auth.register("bob", "first").await.expect("register");
        auth.register("bob", "second").await.expect("register");

        assert_eq!(auth.store().count_by_username("bob").await.expect("count"), 2);
        assert!(auth.login("bob", "first").await.expect("login"));
        assert!(!auth.login("bob", "second").await.expect("login"));
    }

    #[tokio::test]
    async fn empty_username_registers() {
        let auth = service().await;
        auth.register("", "pw").await.expect("register");
        assert!(auth.login("", "pw").await.expect("login"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn control_characters_in_usernames_are_escaped_in_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let auth = service().await;
        let forged = "eve\nINFO login accepted username=\"admin\"";
        auth.register(forged, "pw").await.expect("register");
        assert!(auth.login(forged, "pw").await.expect("login"));
        assert!(!auth.login(forged, "wrong").await.expect("login"));

        let out = logs.contents();
        assert!(out.contains(r#"eve\nINFO login accepted"#));
        assert!(
            out.lines().all(|line| !line.starts_with("INFO login accepted")),
            "username started a new log line: {out}"
        );
        assert_eq!(
            out.lines()
                .filter(|line| line.contains(r#"eve\nINFO"#))
                .count(),
            3
        );
    }
}
