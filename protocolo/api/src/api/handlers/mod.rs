use bytes::Bytes;
use common::http::ext::{OptionExt, ResultExt};
use common::http::router::ext::RequestExt;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::{header, StatusCode};
use serde::de::DeserializeOwned;

use super::auth::{AuthData, AuthError};
use super::cookies;
use super::error::Result;
use super::request_context::RequestContext;
use super::Body;

pub mod auth;
pub mod health;
pub mod records;

/// A 303 redirect, optionally carrying a flash message for the next page load.
pub fn redirect(location: &str, flash: Option<&str>) -> hyper::Response<Body> {
    let mut builder = hyper::Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, location);

    if let Some(message) = flash {
        builder = builder.header(header::SET_COOKIE, cookies::flash(message));
    }

    builder.body(Body::new(Bytes::new())).expect("failed to build response")
}

pub fn set_cookie(response: &mut hyper::Response<Body>, value: &str) {
    if let Ok(value) = header::HeaderValue::from_str(value) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

/// Clears the flash cookie once its message has been rendered into a
/// response.
pub fn clear_flash(response: &mut hyper::Response<Body>) {
    set_cookie(response, &cookies::clear(cookies::FLASH_COOKIE));
}

/// Resolves the request's auth data or redirects to the login form.
///
/// A session that expired after the middleware ran is treated the same as no
/// session.
pub async fn require_auth<B>(req: &hyper::Request<B>) -> Result<AuthData> {
    let context = req
        .data::<RequestContext>()
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "request context missing"))?
        .clone();

    match context.auth().await {
        Ok(Some(auth)) => Ok(auth),
        Ok(None) | Err(AuthError::SessionExpired) => Err(redirect("/login", None).into()),
        Err(err) => Err(err.into()),
    }
}

pub async fn parse_form<T: DeserializeOwned>(req: hyper::Request<Incoming>) -> Result<T> {
    let body = req
        .into_body()
        .collect()
        .await
        .map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?
        .to_bytes();

    serde_urlencoded::from_bytes(&body).map_err_route((StatusCode::BAD_REQUEST, "failed to parse form body"))
}

pub fn param_id(req: &hyper::Request<Incoming>) -> Result<i64> {
    req.param("id")
        .and_then(|id| id.parse().ok())
        .map_err_route((StatusCode::BAD_REQUEST, "invalid record id"))
}
