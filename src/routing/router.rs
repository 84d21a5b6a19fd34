//! Router builder and the public registration surface.
//!
//! # Responsibilities
//! - Accept route and middleware registrations (directly or through groups)
//! - Hold the replaceable terminal handlers (not found, method not allowed, recover)
//! - Freeze everything into a [`Dispatcher`]
//!
//! # Design Decisions
//! - `build_handler` consumes the router: no registration is possible after the freeze
//! - Registration never fails except for verb tokens that are not valid HTTP methods
//! - `Router` and [`Group`] share one [`Registrar`] trait so their surfaces cannot drift

use std::sync::Arc;

use axum::http::Method;
use thiserror::Error;

use crate::config::DispatchConfig;
use crate::dispatch::recovery::{default_recover, Fault, RecoverHandler};
use crate::dispatch::{terminal, Context, Dispatcher};
use crate::routing::group::Group;
use crate::routing::handler::{Handler, Verb};
use crate::routing::table::RouteTable;

/// Errors raised while registering routes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid method token {0:?}")]
    InvalidMethod(String),
}

/// Registration surface shared by [`Router`] and [`Group`].
///
/// Paths given to a registrar are relative to its [`prefix`](Registrar::prefix).
pub trait Registrar {
    /// Prefix prepended to every path registered through this registrar.
    fn prefix(&self) -> &str;

    /// Mutable access to the root router.
    fn router_mut(&mut self) -> &mut Router;

    /// Bind `handler` to `verb` at `path`.
    fn route<F>(&mut self, path: &str, verb: Verb, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        let full = format!("{}{}", self.prefix(), path);
        self.router_mut().table.register(&full, verb, Arc::new(handler));
        self
    }

    fn get<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Exact(Method::GET), handler)
    }

    fn post<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Exact(Method::POST), handler)
    }

    fn put<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Exact(Method::PUT), handler)
    }

    fn patch<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Exact(Method::PATCH), handler)
    }

    fn delete<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Exact(Method::DELETE), handler)
    }

    fn head<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Exact(Method::HEAD), handler)
    }

    fn options<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Exact(Method::OPTIONS), handler)
    }

    /// Bind `handler` to every method at `path`.
    fn any<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        self.route(path, Verb::Any, handler)
    }

    /// Bind `handler` to an arbitrary verb token (`"*"` for any method).
    fn method<F>(&mut self, path: &str, verb: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        let verb = Verb::parse(verb).ok_or_else(|| RouteError::InvalidMethod(verb.to_string()))?;
        Ok(self.route(path, verb, handler))
    }

    /// Register middleware scoped to this registrar's prefix.
    fn use_middleware<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
        Self: Sized,
    {
        let scope = self.prefix().to_string();
        self.router_mut()
            .table
            .register_middleware(&scope, Arc::new(handler));
        self
    }

    /// A view that registers under `self.prefix() + prefix`.
    fn group(&mut self, prefix: &str) -> Group<'_>
    where
        Self: Sized,
    {
        let prefix = format!("{}{}", self.prefix(), prefix);
        Group::new(prefix, self.router_mut())
    }
}

/// The root router. Mutable during setup only.
pub struct Router {
    table: RouteTable,
    not_found: Handler,
    method_not_allowed: Handler,
    recover: RecoverHandler,
    config: DispatchConfig,
}

impl Router {
    /// Create a router with default dispatch settings.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Create a router with explicit dispatch settings.
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            table: RouteTable::new(),
            not_found: Arc::new(terminal::not_found),
            method_not_allowed: Arc::new(terminal::method_not_allowed),
            recover: Arc::new(default_recover),
            config,
        }
    }

    /// Replace the handler invoked when no route exists for the path.
    pub fn not_found<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.not_found = Arc::new(handler);
        self
    }

    /// Replace the handler invoked when a route exists but no verb matches.
    pub fn method_not_allowed<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.method_not_allowed = Arc::new(handler);
        self
    }

    /// Replace the handler invoked after a handler panicked.
    pub fn on_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut Context, &Fault) + Send + Sync + 'static,
    {
        self.recover = Arc::new(handler);
        self
    }

    /// Number of routes registered so far.
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    /// Freeze the table and return the dispatch entry point.
    pub fn build_handler(self) -> Dispatcher {
        tracing::info!(
            routes = self.table.len(),
            middleware_scopes = self.table.middleware().scope_count(),
            "Route table frozen"
        );
        Dispatcher::new(
            self.table,
            self.not_found,
            self.method_not_allowed,
            self.recover,
            &self.config,
        )
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Registrar for Router {
    fn prefix(&self) -> &str {
        ""
    }

    fn router_mut(&mut self) -> &mut Router {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_rejects_invalid_token() {
        let mut router = Router::new();
        let err = router.method("/x", "BAD VERB", |_| {}).err();
        assert_eq!(err, Some(RouteError::InvalidMethod("BAD VERB".into())));

        let err = router.method("/x", "", |_| {}).err();
        assert_eq!(err, Some(RouteError::InvalidMethod(String::new())));
        assert_eq!(router.route_count(), 0);
    }

    #[test]
    fn test_method_accepts_extension_verbs() {
        let mut router = Router::new();
        assert!(router.method("/cache", "PURGE", |_| {}).is_ok());
        assert!(router.method("/cache", "*", |_| {}).is_ok());
        assert_eq!(router.route_count(), 1);
    }

    #[test]
    fn test_chained_registration() {
        let mut router = Router::new();
        router
            .use_middleware(|_| {})
            .get("/a", |_| {})
            .post("/a", |_| {})
            .any("/b", |_| {});
        assert_eq!(router.route_count(), 2);
    }
}
