use std::fmt::{Debug, Formatter};

use super::types::{BoxFunction, BoxFuture};

pub struct PreMiddlewareHandler<E>(
    pub(crate) BoxFunction<hyper::Request<()>, BoxFuture<Result<hyper::Request<()>, E>>>,
);

impl<E> Debug for PreMiddlewareHandler<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PreMiddlewareHandler(..)")
    }
}

pub enum Middleware<E> {
    Pre(PreMiddlewareHandler<E>),
}

impl<E: 'static> Middleware<E> {
    /// Runs before the route handler against the request head. Returning an
    /// error short-circuits into the router's error handler.
    pub fn pre<F: std::future::Future<Output = Result<hyper::Request<()>, E>> + Send + 'static>(
        handler: impl Fn(hyper::Request<()>) -> F + Send + Sync + 'static,
    ) -> Self {
        Self::Pre(PreMiddlewareHandler(Box::new(move |req| Box::pin(handler(req)))))
    }
}
