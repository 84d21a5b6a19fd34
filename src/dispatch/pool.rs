//! Context pooling.
//!
//! # Responsibilities
//! - Hand out a [`Context`] per request without blocking
//! - Take contexts back when the request finishes, on every exit path
//!
//! # Design Decisions
//! - Acquisition builds a new context when the pool is empty (grows on demand)
//! - Release is tied to a guard's `Drop`, so it runs even after a contained panic
//! - Idle contexts beyond `max_idle` are dropped instead of kept

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::dispatch::Context;
use crate::http::Exchange;
use crate::observability::metrics;

/// A pool of reusable request contexts.
#[derive(Debug)]
pub struct ContextPool {
    idle: Mutex<Vec<Context>>,
    created: AtomicUsize,
    max_idle: usize,
}

impl ContextPool {
    /// Create a pool holding at most `max_idle` idle contexts, `prewarm` of them built up front.
    pub fn new(max_idle: usize, prewarm: usize) -> Self {
        let prewarm = prewarm.min(max_idle);
        let idle: Vec<Context> = (0..prewarm).map(|_| Context::default()).collect();
        Self {
            idle: Mutex::new(idle),
            created: AtomicUsize::new(prewarm),
            max_idle,
        }
    }

    /// Take a context bound to `exchange`, with all per-request state reset.
    pub fn acquire(&self, exchange: Exchange) -> PooledContext<'_> {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let mut ctx = match reused {
            Some(ctx) => ctx,
            None => {
                let total = self.created.fetch_add(1, Ordering::Relaxed) + 1;
                metrics::record_pool_created(total);
                Context::default()
            }
        };
        ctx.reset(exchange);
        PooledContext { pool: self, ctx }
    }

    fn release(&self, mut ctx: Context) {
        ctx.recycle();
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(ctx);
        }
    }

    /// Total contexts ever constructed by this pool.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    /// Contexts currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// A context on loan from a [`ContextPool`]. Returned to the pool on drop.
#[derive(Debug)]
pub struct PooledContext<'p> {
    pool: &'p ContextPool,
    ctx: Context,
}

impl PooledContext<'_> {
    /// Detach the exchange (with its written response); the context goes back on drop.
    pub fn finish(mut self) -> Exchange {
        self.ctx.take_exchange()
    }
}

impl Deref for PooledContext<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.ctx
    }
}

impl DerefMut for PooledContext<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

impl Drop for PooledContext<'_> {
    fn drop(&mut self) {
        let ctx = std::mem::take(&mut self.ctx);
        self.pool.release(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Uri};

    fn exchange(path: &'static str) -> Exchange {
        Exchange::new(Method::GET, Uri::from_static(path))
    }

    #[test]
    fn test_acquire_grows_on_demand() {
        let pool = ContextPool::new(8, 0);
        assert_eq!(pool.created(), 0);

        let a = pool.acquire(exchange("/a"));
        let b = pool.acquire(exchange("/b"));
        assert_eq!(pool.created(), 2);
        assert_eq!(a.path(), "/a");
        assert_eq!(b.path(), "/b");

        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_release_reuses_context() {
        let pool = ContextPool::new(8, 0);
        for _ in 0..100 {
            let ctx = pool.acquire(exchange("/"));
            drop(ctx);
        }
        assert_eq!(pool.created(), 1);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_state_does_not_leak_between_requests() {
        let pool = ContextPool::new(8, 0);
        {
            let mut ctx = pool.acquire(exchange("/first"));
            ctx.abort();
            ctx.set_data("secret", 1u32);
        }
        let ctx = pool.acquire(exchange("/second"));
        assert!(!ctx.is_aborted());
        assert!(!ctx.has_data("secret"));
        assert_eq!(ctx.path(), "/second");
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn test_finish_returns_exchange_and_context() {
        let pool = ContextPool::new(8, 0);
        let mut ctx = pool.acquire(exchange("/x"));
        ctx.set_body("done");
        let exchange = ctx.finish();

        assert_eq!(exchange.response_body(), b"done");
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_max_idle_caps_pool() {
        let pool = ContextPool::new(1, 0);
        let a = pool.acquire(exchange("/"));
        let b = pool.acquire(exchange("/"));
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_prewarm() {
        let pool = ContextPool::new(4, 16);
        assert_eq!(pool.idle(), 4);
        assert_eq!(pool.created(), 4);

        let _ctx = pool.acquire(exchange("/"));
        assert_eq!(pool.created(), 4);
    }
}
