use crate::db::models::DbCredential;
use crate::db::schema::SQLITE_INIT;
use crate::error::GatehouseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Handle over the `users` table. Cheap to clone; carried in router state.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database at `database_url`, creating the file if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, GatehouseError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_opts)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the table if absent. Safe to call repeatedly.
    pub async fn ensure_schema(&self) -> Result<(), GatehouseError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Append a credential row. Existing rows for the same username are left alone.
    pub async fn insert(&self, username: &str, password_hash: &str) -> Result<(), GatehouseError> {
        sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Hash of the earliest row for `username`, if any.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<String>, GatehouseError> {
        let row: Option<DbCredential> = sqlx::query_as(
            r#"SELECT username, password FROM users
               WHERE username = ? ORDER BY rowid LIMIT 1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.password_hash))
    }

    pub async fn count_by_username(&self, username: &str) -> Result<i64, GatehouseError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}
