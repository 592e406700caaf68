use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use common::context::Handler;
use common::prelude::FutureTimeout;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use super::global::mock_global_state;
use crate::config::AppConfig;
use crate::global::{GlobalConfig, GlobalState};

/// A real server on an ephemeral port plus a cookie-keeping client.
pub struct TestHarness {
    pub global: Arc<GlobalState>,
    handler: Handler,
    addr: SocketAddr,
    cookies: HashMap<String, String>,
    _output_dir: tempfile::TempDir,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let output_dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = AppConfig::default();
        let port = portpicker::pick_unused_port().expect("no free ports");
        config.api.bind_address = SocketAddr::from(([127, 0, 0, 1], port));
        config.label.output_dir = output_dir.path().to_path_buf();
        config.label.poll_interval_ms = 10;
        tweak(&mut config);

        let (global, handler) = mock_global_state(config).await;

        tokio::spawn(crate::api::run(global.clone()));

        let addr = global.config().api.bind_address;

        // The accept loop comes up asynchronously.
        for _ in 0..50 {
            if TcpStream::connect(addr).await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            global,
            handler,
            addr,
            cookies: HashMap::new(),
            _output_dir: output_dir,
        }
    }

    pub async fn get(&mut self, path: &str) -> Response<Incoming> {
        let req = self
            .request(Method::GET, path)
            .body(Full::new(Bytes::new()))
            .expect("failed to build request");

        self.send(req).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Response<Incoming> {
        let body = serde_urlencoded::to_string(fields).expect("failed to encode form");
        let req = self
            .request(Method::POST, path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from(body)))
            .expect("failed to build request");

        self.send(req).await
    }

    pub async fn register_and_login(&mut self, username: &str, password: &str) {
        let response = self.post_form("/register", &[("username", username), ("password", password)]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = self.post_form("/login", &[("username", username), ("password", password)]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(self.has_session());

        // Start each scenario without the registration flash pending.
        self.cookies.remove("flash");
    }

    pub fn has_session(&self) -> bool {
        self.cookies.contains_key("session")
    }

    pub async fn body_bytes(response: Response<Incoming>) -> Bytes {
        response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes()
    }

    pub async fn body_json(response: Response<Incoming>) -> serde_json::Value {
        serde_json::from_slice(&Self::body_bytes(response).await).expect("body was not json")
    }

    /// Reads the flash message the way a browser would see it on `/`.
    pub async fn flash_message(&mut self) -> serde_json::Value {
        let response = self.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let mut body = Self::body_json(response).await;
        body["message"].take()
    }

    pub async fn teardown(self) {
        drop(self.global);
        self.handler.cancel().timeout(Duration::from_secs(5)).await.ok();
    }

    fn request(&self, method: Method, path: &str) -> hyper::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path).header(header::HOST, "localhost");

        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie_header);
        }

        builder
    }

    async fn send(&mut self, req: Request<Full<Bytes>>) -> Response<Incoming> {
        let stream = TcpStream::connect(self.addr).await.expect("failed to connect");
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .expect("handshake failed");
        tokio::spawn(conn);

        let response = sender.send_request(req).await.expect("request failed");
        self.store_cookies(&response);
        response
    }

    fn store_cookies(&mut self, response: &Response<Incoming>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            // Values are kept percent-encoded and echoed back verbatim.
            let Ok(cookie) = cookie::Cookie::parse(value.to_owned()) else {
                continue;
            };

            if cookie.max_age() == Some(cookie::time::Duration::ZERO) || cookie.value().is_empty() {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies.insert(cookie.name().to_owned(), cookie.value().to_owned());
            }
        }
    }
}
