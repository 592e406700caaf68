use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// The session token, a ULID carried by the `session` cookie.
    pub id: String,
    /// Foreign key to the user table.
    pub user_id: i64,
    /// The time the session stops being valid.
    pub expires_at: DateTime<Utc>,
    /// The time the session was last used.
    pub last_used_at: DateTime<Utc>,
}

impl Session {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }

    pub async fn create(db: &SqlitePool, user_id: i64, validity: Duration) -> sqlx::Result<Self> {
        let now = Utc::now();

        sqlx::query_as("INSERT INTO sessions (id, user_id, expires_at, last_used_at) VALUES ($1, $2, $3, $4) RETURNING *")
            .bind(ulid::Ulid::new().to_string())
            .bind(user_id)
            .bind(now + validity)
            .bind(now)
            .fetch_one(db)
            .await
    }

    pub async fn by_id(db: &SqlitePool, id: &str) -> sqlx::Result<Option<Self>> {
        sqlx::query_as("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn touch(db: &SqlitePool, id: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE sessions SET last_used_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1").bind(id).execute(db).await?;

        Ok(result.rows_affected())
    }

    /// Sweeps out sessions past their expiry so the table cannot grow without
    /// bound. Run on every login.
    pub async fn purge_expired(db: &SqlitePool) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }
}
