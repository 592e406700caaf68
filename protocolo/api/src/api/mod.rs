use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use bytes::Bytes;
use common::http::router::Router;
use common::http::RouteError;
use common::make_response;
use common::prelude::FutureTimeout;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::ApiError;
use crate::global::ApiGlobal;

mod auth;
mod cookies;
mod error;
mod handlers;
mod middleware;
mod request_context;

type Body = Full<Bytes>;

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router<Incoming, Body, RouteError<ApiError>> {
    let weak = Arc::downgrade(global);
    Router::builder()
        .data(weak)
        // The auth middleware resolves the session cookie into per-request
        // auth data. It does not reject unauthenticated requests; handlers
        // decide what requires a login.
        .middleware(middleware::auth::auth_middleware(global))
        .get("/", handlers::records::index::<G>)
        .post("/add", handlers::records::add::<G>)
        .get("/delete/:id", handlers::records::delete::<G>)
        .get("/print/pdf/:id", handlers::records::print_pdf::<G>)
        .get("/print/direct/:id", handlers::records::print_direct::<G>)
        .get("/register", handlers::auth::register_form)
        .post("/register", handlers::auth::register::<G>)
        .get("/login", handlers::auth::login_form)
        .post("/login", handlers::auth::login::<G>)
        .get("/logout", handlers::auth::logout::<G>)
        .get("/health", handlers::health::check)
        .error_handler(common::http::error_handler::<ApiError>)
        .not_found(|_| async move {
            Ok(make_response!(
                hyper::StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                })
            ))
        })
        .build()
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
    let config = &global.config().api;

    tracing::info!("listening on {}", config.bind_address);
    let socket = if config.bind_address.is_ipv6() {
        TcpSocket::new_v6()?
    } else {
        TcpSocket::new_v4()?
    };

    socket.set_reuseaddr(true)?;
    socket.set_reuseport(true)?;
    socket.bind(config.bind_address)?;
    let listener = socket.listen(1024)?;

    let tls_acceptor = if let Some(tls) = &config.tls {
        tracing::info!("tls enabled");
        let cert = tokio::fs::read(&tls.cert).await.context("failed to read ssl cert")?;
        let key = tokio::fs::read(&tls.key).await.context("failed to read ssl private key")?;

        let key = rustls_pemfile::pkcs8_private_keys(&mut io::BufReader::new(io::Cursor::new(key)))
            .next()
            .ok_or_else(|| anyhow::anyhow!("failed to find private key in key file"))??
            .into();

        let certs = rustls_pemfile::certs(&mut io::BufReader::new(io::Cursor::new(cert))).collect::<Result<Vec<_>, _>>()?;

        Some(Arc::new(tokio_rustls::TlsAcceptor::from(Arc::new(
            rustls::ServerConfig::builder()
                .with_no_client_auth()
                .with_single_cert(certs, key)?,
        ))))
    } else {
        None
    };

    // The router holds a Weak reference to the global state so open
    // keep-alive connections cannot hold up shutdown.
    let router = Arc::new(routes(&global));
    let service = service_fn(move |req| {
        let this = router.clone();
        async move { this.handle(req).await }
    });

    loop {
        select! {
            _ = global.ctx().done() => {
                return Ok(());
            },
            r = listener.accept() => {
                let (socket, addr) = r?;

                let service = service.clone();
                let tls_acceptor = tls_acceptor.clone();

                tracing::debug!("accepted connection from {}", addr);

                tokio::spawn(async move {
                    let http = http1::Builder::new();

                    if let Some(tls_acceptor) = tls_acceptor {
                        let Ok(Ok(socket)) = tls_acceptor.accept(socket).timeout(Duration::from_secs(5)).await else {
                            return;
                        };
                        tracing::debug!("tls handshake complete");
                        http.serve_connection(TokioIo::new(socket), service).await.ok();
                    } else {
                        http.serve_connection(TokioIo::new(socket), service).await.ok();
                    }
                });
            },
        }
    }
}
