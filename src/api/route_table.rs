//! Immutable `(method, path) -> handler` registrations.
//!
//! Routes are collected and validated first (duplicates are a startup error),
//! then compiled into an `axum::Router`. Nothing is registered after startup.

use std::fmt;

use axum::{
    Router,
    handler::Handler,
    http::Method,
    routing::{MethodFilter, MethodRouter, on},
};
use thiserror::Error;

use crate::error::AppError;
use crate::middleware;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires a verified bearer token before the handler runs.
    Protected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {method} {path} registered twice")]
    Duplicate { method: Method, path: &'static str },
    #[error("route path must start with '/': {0:?}")]
    InvalidPath(&'static str),
    #[error("unsupported route method: {0}")]
    UnsupportedMethod(Method),
}

struct Route {
    method: Method,
    path: &'static str,
    access: Access,
    handler: MethodRouter<AppState>,
}

#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.routes
                    .iter()
                    .map(|r| format!("{} {} ({:?})", r.method, r.path, r.access)),
            )
            .finish()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H, T>(
        &mut self,
        method: Method,
        path: &'static str,
        handler: H,
        access: Access,
    ) -> Result<&mut Self, RouteError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath(path));
        }
        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.path == path)
        {
            return Err(RouteError::Duplicate { method, path });
        }
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| RouteError::UnsupportedMethod(method.clone()))?;

        self.routes.push(Route {
            method,
            path,
            access,
            handler: on(filter, handler),
        });

        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn access(&self, method: &Method, path: &str) -> Option<Access> {
        self.routes
            .iter()
            .find(|r| r.method == *method && r.path == path)
            .map(|r| r.access)
    }

    /// Compile into a Router. Unknown paths and unknown methods on known paths
    /// both get the same 404.
    pub fn into_router(self, state: AppState) -> Router {
        let mut router = Router::new();

        for route in self.routes {
            tracing::debug!(method = %route.method, path = route.path, access = ?route.access, "route");

            let handler = match route.access {
                Access::Public => route.handler,
                Access::Protected => middleware::auth::protect(route.handler, state.clone()),
            };
            // Same path with another method merges into the existing entry.
            router = router.route(route.path, handler);
        }

        router
            .fallback(route_not_found)
            .method_not_allowed_fallback(route_not_found)
            .with_state(state)
    }
}

async fn route_not_found() -> AppError {
    AppError::route_not_found()
}
