//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path registered only
//! under other methods answers `405` with an `allow` header; anything else
//! unmatched answers `404`.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::error::ApiError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and are read back through
    /// [`Request::param`] or [`Extract::path`](crate::Extract::path).
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or conflicts with an existing route;
    /// routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    /// Routes one fully-buffered request and produces its response.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        let method = match parts.method.as_str().parse::<Method>() {
            Ok(method) => method,
            Err(()) => {
                return ApiError::MethodNotAllowed { allow: self.allowed(&path) }.into_response();
            }
        };

        match self.lookup(method, &path) {
            Some((handler, params)) => handler.call(Request::new(method, parts, body, params)).await,
            None => {
                let allow = self.allowed(&path);
                if allow.is_empty() {
                    debug!(%method, %path, "no route");
                    ApiError::NotFound("Not Found".to_owned()).into_response()
                } else {
                    ApiError::MethodNotAllowed { allow }.into_response()
                }
            }
        }
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Methods with a route matching `path`, in wire-name order.
    fn allowed(&self, path: &str) -> Vec<Method> {
        let mut allow: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| *method)
            .collect();
        allow.sort_by_key(|m| m.as_str());
        allow
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
