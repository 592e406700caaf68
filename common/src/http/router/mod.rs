use std::fmt::{Debug, Formatter};

use error::RouterError;
use types::{ErrorHandler, RouteHandler, RouteInfo, RouteParams};

use self::builder::RouterBuilder;
use self::middleware::PreMiddlewareHandler;

pub mod builder;
pub mod error;
pub mod ext;
pub mod middleware;
pub mod types;

/// A method-aware path router.
///
/// Routes are stored in a single `path_tree` keyed by `/METHOD/path`, so a
/// lookup is one tree walk. Pre-middlewares run against the request head only
/// (the body is reattached afterwards), which lets them be applied uniformly
/// regardless of the request body type.
pub struct Router<I, O, E> {
    routes: Vec<RouteHandler<I, O, E>>,
    pre_middlewares: Vec<PreMiddlewareHandler<E>>,
    error_handler: Option<ErrorHandler<O, E>>,
    not_found: Option<RouteHandler<I, O, E>>,
    tree: path_tree::PathTree<RouteInfo>,
}

impl<I: 'static, O: 'static, E: 'static> Router<I, O, E> {
    pub fn builder() -> RouterBuilder<I, O, E> {
        RouterBuilder::new()
    }

    pub async fn handle(&self, req: hyper::Request<I>) -> Result<hyper::Response<O>, RouterError<E>> {
        let path = format!("/{}{}", req.method().as_str(), req.uri().path());

        let Some((info, matched)) = self.tree.find(&path) else {
            return match &self.not_found {
                Some(handler) => self.run_route(req, handler, &[]).await,
                None => Err(RouterError::NotFound),
            };
        };

        let params = RouteParams(
            matched
                .params_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        );

        let mut req = req;
        req.extensions_mut().insert(params);

        let route = &self.routes[info.route];
        let pre_middleware = info.pre_middleware.clone();
        self.run_route(req, route, &pre_middleware).await
    }

    async fn run_route(
        &self,
        mut req: hyper::Request<I>,
        route: &RouteHandler<I, O, E>,
        pre_middleware: &[usize],
    ) -> Result<hyper::Response<O>, RouterError<E>> {
        for idx in pre_middleware.iter().copied() {
            let (parts, body) = req.into_parts();
            req = match self.pre_middlewares[idx].0(hyper::Request::from_parts(parts.clone(), ())).await {
                Ok(req) => {
                    let (parts, _) = req.into_parts();
                    hyper::Request::from_parts(parts, body)
                }
                Err(err) => {
                    return match &self.error_handler {
                        Some(handler) => Ok(handler.0((hyper::Request::from_parts(parts, ()), err)).await),
                        None => Err(RouterError::Unhandled(err)),
                    };
                }
            };
        }

        let (parts, body) = req.into_parts();
        let head = hyper::Request::from_parts(parts.clone(), ());

        match route.0(hyper::Request::from_parts(parts, body)).await {
            Ok(res) => Ok(res),
            Err(err) => match &self.error_handler {
                Some(handler) => Ok(handler.0((head, err)).await),
                None => Err(RouterError::Unhandled(err)),
            },
        }
    }
}

impl<I, O, E> Debug for Router<I, O, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .field("pre_middlewares", &self.pre_middlewares.len())
            .field("tree", &self.tree)
            .finish()
    }
}
