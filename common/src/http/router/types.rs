use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
pub type BoxFunction<I, O> = Box<dyn Fn(I) -> O + Send + Sync>;

/// Path parameters captured by the route match, available to handlers via
/// request extensions.
#[derive(Debug, Clone, Default)]
pub struct RouteParams(pub Vec<(String, String)>);

#[derive(Debug, Clone)]
pub(crate) struct RouteInfo {
    pub route: usize,
    pub pre_middleware: Vec<usize>,
}

pub(crate) struct RouteHandler<I, O, E>(
    pub(crate) BoxFunction<hyper::Request<I>, BoxFuture<Result<hyper::Response<O>, E>>>,
);

pub(crate) struct ErrorHandler<O, E>(
    pub(crate) BoxFunction<(hyper::Request<()>, E), BoxFuture<hyper::Response<O>>>,
);
