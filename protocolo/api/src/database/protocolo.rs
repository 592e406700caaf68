use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Protocolo {
    /// The unique identifier for the record. Assigned by the database,
    /// strictly increasing.
    pub id: i64,
    /// The account that registered the record.
    #[serde(skip_serializing)]
    pub user_id: i64,
    /// Who the record was registered for.
    pub nome: String,
    /// What the record is about.
    pub assunto: String,
    /// When the record was registered.
    pub created_at: DateTime<Utc>,
}

impl Protocolo {
    pub async fn create(db: &SqlitePool, user_id: i64, nome: &str, assunto: &str) -> sqlx::Result<Self> {
        sqlx::query_as("INSERT INTO protocolos (user_id, nome, assunto, created_at) VALUES ($1, $2, $3, $4) RETURNING *")
            .bind(user_id)
            .bind(nome)
            .bind(assunto)
            .bind(Utc::now())
            .fetch_one(db)
            .await
    }

    pub async fn list_for_user(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as("SELECT * FROM protocolos WHERE user_id = $1 ORDER BY id ASC")
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn get(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Self>> {
        sqlx::query_as("SELECT * FROM protocolos WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Returns the number of rows removed. Zero when the record does not
    /// exist or belongs to someone else.
    pub async fn delete(db: &SqlitePool, id: i64, user_id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM protocolos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }

    /// Timestamp the way it is printed on the label.
    pub fn formatted_timestamp(&self) -> String {
        self.created_at.format("%d/%m/%Y %H:%M:%S").to_string()
    }
}
