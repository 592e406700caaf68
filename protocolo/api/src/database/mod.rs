mod protocolo;
mod session;
mod user;

pub use protocolo::*;
pub use session::*;
pub use user::*;

/// Brings the schema up at startup. Statements are idempotent so this can run
/// on every boot.
pub async fn migrate(db: &sqlx::SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )"#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users (id),
            expires_at TEXT NOT NULL,
            last_used_at TEXT NOT NULL
        )"#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS protocolos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users (id),
            nome TEXT NOT NULL,
            assunto TEXT NOT NULL,
            created_at TEXT NOT NULL
        )"#,
    )
    .execute(db)
    .await?;

    Ok(())
}
