use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i64,
    /// The username of the user, stored lowercased.
    pub username: String,
    /// The hashed password of the user. (argon2)
    pub password_hash: String,
    /// The time the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn create(db: &SqlitePool, username: &str, password_hash: &str) -> sqlx::Result<Self> {
        sqlx::query_as("INSERT INTO users (username, password_hash, created_at) VALUES ($1, $2, $3) RETURNING *")
            .bind(username)
            .bind(password_hash)
            .bind(Utc::now())
            .fetch_one(db)
            .await
    }

    pub async fn by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<Self>> {
        sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(db)
            .await
    }

    pub async fn by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Self>> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Uses argon2 to verify the password hash against the provided password.
    pub fn verify_password(&self, password: &str) -> bool {
        let hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!("failed to parse password hash: {}", err);
                return false;
            }
        };

        Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
    }

    pub fn hash_password(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("failed to hash password");

        hash.to_string()
    }

    /// Validates a username.
    pub fn validate_username(username: &str) -> Result<(), &'static str> {
        if username.is_empty() {
            return Err("Informe o usuário");
        }

        if username.len() > 100 {
            return Err("Usuário deve ter no máximo 100 caracteres");
        }

        if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
            return Err("Usuário deve conter apenas letras, números, '_' ou '.'");
        }

        Ok(())
    }

    /// Validates a password.
    pub fn validate_password(password: &str) -> Result<(), &'static str> {
        if password.is_empty() {
            return Err("Informe a senha");
        }

        if password.len() > 100 {
            return Err("Senha deve ter no máximo 100 caracteres");
        }

        Ok(())
    }
}
