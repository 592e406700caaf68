use std::sync::Arc;

use tokio::sync::RwLock;

use super::auth::{AuthData, AuthError};

/// Per-request state filled in by the auth middleware and read by handlers.
#[derive(Default, Clone)]
pub struct RequestContext(Arc<RwLock<Option<AuthData>>>);

impl RequestContext {
    pub async fn set_auth(&self, data: AuthData) {
        *self.0.write().await = Some(data);
    }

    pub async fn auth(&self) -> Result<Option<AuthData>, AuthError> {
        match self.0.read().await.clone() {
            Some(auth) if auth.session.is_valid() => Ok(Some(auth)),
            Some(_) => Err(AuthError::SessionExpired),
            None => Ok(None),
        }
    }
}
