//! The frozen request dispatcher.
//!
//! # Responsibilities
//! - Resolve the chain for an exact (method, path)
//! - Run it in order, stopping as soon as a handler aborts
//! - Fall back to the not-found / method-not-allowed handlers
//! - Contain handler panics and always return the context to the pool
//!
//! # Design Decisions
//! - Middleware entries always run; verb-bound entries run only on a matching method
//! - A route resolves only through a verb-bound entry; middleware that already ran
//!   before a method mismatch is not undone
//! - Chain memoization lives in a per-route `DashMap`, written only for resolving
//!   methods and bounded per route, so concurrent dispatch never races on it

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use dashmap::DashMap;

use crate::config::DispatchConfig;
use crate::dispatch::pool::ContextPool;
use crate::dispatch::recovery::{self, RecoverHandler};
use crate::dispatch::Context;
use crate::http::Exchange;
use crate::observability::metrics;
use crate::routing::handler::{Handler, HandlerEntry};
use crate::routing::table::RouteTable;

/// How a single dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// At least one verb-bound handler matched and the chain ran to completion.
    Resolved,
    /// No route exists for the path.
    NotFound,
    /// The route exists but no verb-bound entry matched the method.
    MethodNotAllowed,
    /// A handler aborted the chain.
    Aborted,
    /// A handler panicked and the recover handler ran.
    Recovered,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Resolved => "resolved",
            DispatchOutcome::NotFound => "not_found",
            DispatchOutcome::MethodNotAllowed => "method_not_allowed",
            DispatchOutcome::Aborted => "aborted",
            DispatchOutcome::Recovered => "recovered",
        }
    }
}

struct FrozenRoute {
    entries: Vec<HandlerEntry>,
    resolved: DashMap<Method, Arc<[Handler]>>,
}

impl FrozenRoute {
    fn cached(&self, method: &Method) -> Option<Arc<[Handler]>> {
        // clone out so no shard guard is held while handlers run
        self.resolved.get(method).map(|chain| Arc::clone(chain.value()))
    }

    fn remember(&self, method: &Method, capacity: usize) {
        if self.resolved.len() >= capacity {
            return;
        }
        let chain: Arc<[Handler]> = self
            .entries
            .iter()
            .filter_map(|e| e.eligible(method))
            .cloned()
            .collect();
        self.resolved.insert(method.clone(), chain);
    }
}

/// The single entry point the transport calls once per request.
///
/// Built by [`Router::build_handler`](crate::Router::build_handler); immutable
/// apart from its context pool and chain cache, both safe for concurrent use.
pub struct Dispatcher {
    routes: HashMap<String, FrozenRoute>,
    not_found: Handler,
    method_not_allowed: Handler,
    recover: RecoverHandler,
    pool: ContextPool,
    cache_chains: bool,
    max_cached_methods: usize,
}

impl Dispatcher {
    pub(crate) fn new(
        table: RouteTable,
        not_found: Handler,
        method_not_allowed: Handler,
        recover: RecoverHandler,
        config: &DispatchConfig,
    ) -> Self {
        let routes = table
            .into_routes()
            .map(|route| {
                let frozen = FrozenRoute {
                    entries: route.entries(),
                    resolved: DashMap::new(),
                };
                (route.path().to_string(), frozen)
            })
            .collect();

        Self {
            routes,
            not_found,
            method_not_allowed,
            recover,
            pool: ContextPool::new(config.pool_max_idle, config.pool_prewarm),
            cache_chains: config.cache_chains,
            max_cached_methods: config.max_cached_methods,
        }
    }

    /// Dispatch one request and hand back the exchange with its response written.
    pub fn dispatch(&self, exchange: Exchange) -> Exchange {
        self.dispatch_outcome(exchange).0
    }

    /// Like [`dispatch`](Self::dispatch), also reporting how the request ended.
    pub fn dispatch_outcome(&self, exchange: Exchange) -> (Exchange, DispatchOutcome) {
        let started = Instant::now();
        let mut ctx = self.pool.acquire(exchange);

        let outcome = match recovery::guard(|| self.execute(&mut ctx)) {
            Ok(outcome) => outcome,
            Err(fault) => {
                metrics::record_recovered_fault();
                recovery::run_recover(&self.recover, &mut ctx, &fault);
                DispatchOutcome::Recovered
            }
        };

        tracing::debug!(
            method = %ctx.method(),
            path = %ctx.path(),
            status = ctx.status().as_u16(),
            outcome = outcome.as_str(),
            "Request dispatched"
        );
        metrics::record_dispatch(outcome.as_str(), started);

        (ctx.finish(), outcome)
    }

    fn execute(&self, ctx: &mut Context) -> DispatchOutcome {
        let Some(route) = self.routes.get(ctx.path()) else {
            (self.not_found)(ctx);
            return DispatchOutcome::NotFound;
        };
        let method = ctx.method().clone();

        if let Some(chain) = route.cached(&method) {
            return if run_chain(ctx, chain.iter()) {
                DispatchOutcome::Aborted
            } else {
                DispatchOutcome::Resolved
            };
        }

        let resolves = route.entries.iter().any(|e| e.resolves(&method));
        if resolves && self.cache_chains {
            route.remember(&method, self.max_cached_methods);
        }

        let eligible = route.entries.iter().filter_map(|e| e.eligible(&method));
        if run_chain(ctx, eligible) {
            return DispatchOutcome::Aborted;
        }
        if resolves {
            DispatchOutcome::Resolved
        } else {
            (self.method_not_allowed)(ctx);
            DispatchOutcome::MethodNotAllowed
        }
    }

    /// The context pool, for inspection.
    pub fn pool(&self) -> &ContextPool {
        &self.pool
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn has_route(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    /// Number of memoized (method, path) chains.
    pub fn cached_chains(&self) -> usize {
        self.routes.values().map(|r| r.resolved.len()).sum()
    }
}

/// Run handlers in order. Returns true if one of them aborted.
fn run_chain<'a>(ctx: &mut Context, chain: impl Iterator<Item = &'a Handler>) -> bool {
    for handler in chain {
        handler(&mut *ctx);
        if ctx.is_aborted() {
            return true;
        }
    }
    false
}
