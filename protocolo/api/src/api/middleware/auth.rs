use std::sync::Arc;

use common::http::ext::{RequestGlobalExt, ResultExt};
use common::http::router::ext::RequestExt;
use common::http::router::middleware::Middleware;
use common::http::RouteError;
use hyper::StatusCode;

use crate::api::auth::{AuthData, AuthError};
use crate::api::cookies;
use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::database::Session;
use crate::global::ApiGlobal;

/// Resolves the session cookie into [`AuthData`] on the request context.
///
/// Requests without a usable cookie pass through unauthenticated; handlers
/// decide whether that matters.
pub fn auth_middleware<G: ApiGlobal>(_: &Arc<G>) -> Middleware<RouteError<ApiError>> {
    Middleware::pre(|mut req| async move {
        let context = RequestContext::default();
        req.provide(context.clone());

        let Some(token) = cookies::parse(&req, cookies::SESSION_COOKIE) else {
            return Ok(req);
        };

        let global = req.get_global::<G>()?;

        let data = match AuthData::from_session_id(&global, &token).await {
            Ok(data) => data,
            Err(err @ AuthError::SessionExpired) => {
                // A stale cookie is the same as no cookie.
                tracing::debug!(error = %err, "ignoring invalid session cookie");
                return Ok(req);
            }
            Err(err) => return Err(err.into()),
        };

        Session::touch(global.db(), &data.session.id)
            .await
            .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to touch session"))?;

        context.set_auth(data).await;

        Ok(req)
    })
}
