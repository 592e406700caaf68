use std::sync::Arc;

use common::http::RouteError;
use hyper::StatusCode;

use super::error::ApiError;
use crate::database::{Session, User};
use crate::global::ApiGlobal;

#[derive(thiserror::Error, Debug, Clone)]
pub enum AuthError {
    #[error("session expired")]
    SessionExpired,
    #[error("failed to fetch session")]
    FetchSession,
    #[error("failed to fetch user")]
    FetchUser,
    #[error("user not found")]
    UserNotFound,
}

impl From<AuthError> for RouteError<ApiError> {
    fn from(value: AuthError) -> Self {
        RouteError::from(match &value {
            AuthError::SessionExpired => (StatusCode::UNAUTHORIZED, "session expired"),
            AuthError::FetchSession => (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch session"),
            AuthError::FetchUser => (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"),
            AuthError::UserNotFound => (StatusCode::INTERNAL_SERVER_ERROR, "user not found"),
        })
        .with_source(Some(ApiError::Auth(value)))
    }
}

/// The resolved identity behind a request's session cookie.
#[derive(Clone, Debug)]
pub struct AuthData {
    pub session: Session,
    pub user: User,
}

impl AuthData {
    pub async fn from_session<G: ApiGlobal>(global: &Arc<G>, session: Session) -> Result<Self, AuthError> {
        let user = User::by_id(global.db(), session.user_id)
            .await
            .map_err(|_| AuthError::FetchUser)?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Self { session, user })
    }

    pub async fn from_session_id<G: ApiGlobal>(global: &Arc<G>, session_id: &str) -> Result<Self, AuthError> {
        let session = Session::by_id(global.db(), session_id)
            .await
            .map_err(|_| AuthError::FetchSession)?
            .and_then(|s| s.is_valid().then_some(s))
            .ok_or(AuthError::SessionExpired)?;

        Self::from_session(global, session).await
    }
}
