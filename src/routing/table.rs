//! Route table construction.
//!
//! # Responsibilities
//! - Own one handler chain per exact path
//! - Seed new routes with their resolved middleware
//! - Splice late middleware into routes that already exist
//!
//! # Design Decisions
//! - A route keeps its middleware segment apart from its verb-bound entries, so a
//!   late middleware lands in ancestor-first position instead of after the handlers
//! - Duplicate (path, verb) registrations accumulate; nothing is replaced
//! - Splicing is O(existing routes); it only ever runs during setup

use std::collections::HashMap;

use crate::routing::handler::{Handler, HandlerEntry, Verb};
use crate::routing::matcher::is_under;
use crate::routing::middleware::MiddlewareRegistry;

/// The handler chain bound to one exact path.
pub struct Route {
    path: String,
    middleware: Vec<Handler>,
    endpoints: Vec<HandlerEntry>,
}

impl Route {
    fn new(path: &str, middleware: Vec<Handler>) -> Self {
        Self {
            path: path.to_string(),
            middleware,
            endpoints: Vec::new(),
        }
    }

    /// The exact path this route answers.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The full chain in execution order: middleware first, then endpoints.
    pub fn entries(&self) -> Vec<HandlerEntry> {
        self.middleware
            .iter()
            .cloned()
            .map(HandlerEntry::Unconditional)
            .chain(self.endpoints.iter().cloned())
            .collect()
    }
}

/// Mutable route table used during setup.
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
    middleware: MiddlewareRegistry,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` bound to `verb` to the route at `path`.
    ///
    /// The route is created on first use, seeded with the middleware that
    /// currently applies to `path`.
    pub fn register(&mut self, path: &str, verb: Verb, handler: Handler) {
        let middleware = &self.middleware;
        let route = self
            .routes
            .entry(path.to_string())
            .or_insert_with(|| Route::new(path, middleware.resolve(path)));
        route.endpoints.push(HandlerEntry::BoundToVerb(verb, handler));
    }

    /// Register middleware at `scope` and splice it into every existing route under it.
    pub fn register_middleware(&mut self, scope: &str, handler: Handler) {
        self.middleware.add(scope, handler);

        let mut spliced = 0usize;
        for route in self.routes.values_mut() {
            if is_under(&route.path, scope) {
                route.middleware = self.middleware.resolve(&route.path);
                spliced += 1;
            }
        }
        if spliced > 0 {
            tracing::debug!(scope = %scope, routes = spliced, "Middleware spliced into existing routes");
        }
    }

    /// Look up a route by exact path.
    pub fn get(&self, path: &str) -> Option<&Route> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn middleware(&self) -> &MiddlewareRegistry {
        &self.middleware
    }

    /// Consume the table, yielding its routes. Middleware registrations are dropped.
    pub fn into_routes(self) -> impl Iterator<Item = Route> {
        self.routes.into_values()
    }
}
