use common::http::RouteError;

use super::auth::AuthError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

// Render and dispatch failures never surface here; the print handlers catch
// them and answer with a flash redirect instead.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("failed to query database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to read http body: {0}")]
    ReadHttpBody(#[from] hyper::Error),
    #[error("failed to parse form body: {0}")]
    ParseForm(#[from] serde_urlencoded::de::Error),
    #[error("auth failure: {0}")]
    Auth(#[from] AuthError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
