use sqlx::FromRow;

/// A stored credential row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbCredential {
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}
