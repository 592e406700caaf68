use common::make_response;
use hyper::body::Incoming;
use hyper::StatusCode;
use serde_json::json;

use crate::api::error::Result;
use crate::api::Body;

pub async fn check(_: hyper::Request<Incoming>) -> Result<hyper::Response<Body>> {
    Ok(make_response!(StatusCode::OK, json!({ "status": "ok" })))
}
