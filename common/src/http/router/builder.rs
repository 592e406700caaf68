use std::fmt::{Debug, Formatter};

use super::middleware::{Middleware, PreMiddlewareHandler};
use super::types::{ErrorHandler, RouteHandler, RouteInfo};
use super::Router;

enum RouterItem<I, O, E> {
    Route(hyper::Method, RouteHandler<I, O, E>),
    Scope(RouterBuilder<I, O, E>),
}

pub struct RouterBuilder<I, O, E> {
    tree: Vec<(&'static str, RouterItem<I, O, E>)>,
    pre_middleware: Vec<PreMiddlewareHandler<E>>,
    error_handler: Option<ErrorHandler<O, E>>,
    not_found: Option<RouteHandler<I, O, E>>,
}

impl<I, O, E> Debug for RouterBuilder<I, O, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("tree", &self.tree.len())
            .field("pre_middleware", &self.pre_middleware.len())
            .finish()
    }
}

impl<I: 'static, O: 'static, E: 'static> Default for RouterBuilder<I, O, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: 'static, O: 'static, E: 'static> RouterBuilder<I, O, E> {
    pub fn new() -> Self {
        Self {
            tree: Vec::new(),
            pre_middleware: Vec::new(),
            error_handler: None,
            not_found: None,
        }
    }

    pub fn middleware(mut self, middleware: Middleware<E>) -> Self {
        match middleware {
            Middleware::Pre(handler) => self.pre_middleware.push(handler),
        }

        self
    }

    /// Makes `data` available to every request via extensions.
    pub fn data<T: Clone + Send + Sync + 'static>(self, data: T) -> Self {
        self.middleware(Middleware::pre(move |mut req| {
            req.extensions_mut().insert(data.clone());
            async move { Ok(req) }
        }))
    }

    pub fn error_handler<F: std::future::Future<Output = hyper::Response<O>> + Send + 'static>(
        mut self,
        handler: impl Fn(hyper::Request<()>, E) -> F + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Some(ErrorHandler(Box::new(move |(req, err)| Box::pin(handler(req, err)))));
        self
    }

    pub fn get<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
        self,
        path: &'static str,
        handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
    ) -> Self {
        self.add_route(hyper::Method::GET, path, handler)
    }

    pub fn post<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
        self,
        path: &'static str,
        handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
    ) -> Self {
        self.add_route(hyper::Method::POST, path, handler)
    }

    pub fn delete<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
        self,
        path: &'static str,
        handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
    ) -> Self {
        self.add_route(hyper::Method::DELETE, path, handler)
    }

    pub fn add_route<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
        mut self,
        method: hyper::Method,
        path: &'static str,
        handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
    ) -> Self {
        self.tree.push((
            path,
            RouterItem::Route(method, RouteHandler(Box::new(move |req| Box::pin(handler(req))))),
        ));
        self
    }

    pub fn scope(mut self, path: &'static str, router: RouterBuilder<I, O, E>) -> Self {
        self.tree.push((path, RouterItem::Scope(router)));
        self
    }

    /// Fallback when no route matches. Root middleware does not run for it.
    pub fn not_found<F: std::future::Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
        mut self,
        handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
    ) -> Self {
        self.not_found = Some(RouteHandler(Box::new(move |req| Box::pin(handler(req)))));
        self
    }

    fn build_scoped(mut self, parent_path: &str, target: &mut Router<I, O, E>, pre_middlewares: &[usize]) {
        if let Some(error_handler) = self.error_handler.take() {
            target.error_handler = Some(error_handler);
        }

        if let Some(not_found) = self.not_found.take() {
            target.not_found = Some(not_found);
        }

        let pre_middleware_idxs = pre_middlewares
            .iter()
            .copied()
            .chain(self.pre_middleware.into_iter().map(|handler| {
                target.pre_middlewares.push(handler);
                target.pre_middlewares.len() - 1
            }))
            .collect::<Vec<_>>();

        for (path, item) in self.tree {
            let parent_path = parent_path.trim_matches('/');
            let path = path.trim_matches('/');
            let joined = format!(
                "{parent_path}{}{path}",
                if parent_path.is_empty() { "" } else { "/" }
            );

            match item {
                RouterItem::Route(method, handler) => {
                    target.routes.push(handler);

                    let info = RouteInfo {
                        route: target.routes.len() - 1,
                        pre_middleware: pre_middleware_idxs.clone(),
                    };

                    let full_path = format!("/{}/{joined}", method.as_str());

                    tracing::debug!(full_path, "adding route");

                    let _ = target.tree.insert(&full_path, info);
                }
                RouterItem::Scope(router) => {
                    router.build_scoped(&joined, target, &pre_middleware_idxs);
                }
            }
        }
    }

    pub fn build(self) -> Router<I, O, E> {
        let mut router = Router {
            routes: Vec::new(),
            pre_middlewares: Vec::new(),
            error_handler: None,
            not_found: None,
            tree: path_tree::PathTree::new(),
        };

        self.build_scoped("", &mut router, &[]);

        router
    }
}
