//! Middleware registrations and resolution.
//!
//! # Responsibilities
//! - Store middleware keyed by the scope path it was registered at
//! - Compute the ordered middleware list that applies to a route path
//!
//! # Design Decisions
//! - Resolution walks the path left to right, so shorter (ancestor) scopes come first
//! - Within a scope, registration order is kept
//! - Never depends on `HashMap` iteration order

use std::collections::HashMap;

use crate::routing::handler::Handler;

/// Middleware registered per scope path. The empty scope is global.
#[derive(Default)]
pub struct MiddlewareRegistry {
    scopes: HashMap<String, Vec<Handler>>,
}

impl MiddlewareRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the scope at `scope`.
    pub fn add(&mut self, scope: &str, handler: Handler) {
        self.scopes.entry(scope.to_string()).or_default().push(handler);
    }

    /// Middleware registered exactly at `scope`.
    pub fn at(&self, scope: &str) -> &[Handler] {
        self.scopes.get(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of scopes holding at least one middleware.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Resolve the middleware chain for `path`.
    ///
    /// Order: global scope, then the scope at every `/` boundary of `path`
    /// from left to right, then the scope at `path` itself.
    pub fn resolve(&self, path: &str) -> Vec<Handler> {
        let mut chain = Vec::new();
        chain.extend_from_slice(self.at(""));

        // index 0 would name the global scope again
        for (i, byte) in path.bytes().enumerate().skip(1) {
            if byte == b'/' {
                chain.extend_from_slice(self.at(&path[..i]));
            }
        }

        if !path.is_empty() {
            chain.extend_from_slice(self.at(path));
        }
        chain
    }
}
