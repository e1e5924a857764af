//! SQL DDL for the credential table.

/// One row per registration. Usernames are not unique; lookups take the
/// earliest row by `rowid`.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT,
    password TEXT -- Argon2 PHC string
);
"#;
