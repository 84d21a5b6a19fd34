//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Exchange (from transport)
//!     → pool.rs (acquire context, reset per-request state)
//!     → recovery.rs (single fault boundary around the chain)
//!     → engine.rs (exact path lookup → verb filter → run chain, honour abort)
//!     → terminal.rs (not found / method not allowed fallbacks)
//!     → pool.rs (release context, on every exit path)
//! Exchange (with response) → transport
//! ```
//!
//! # Design Decisions
//! - The route table is read-only once the dispatcher exists
//! - Handlers run synchronously on the calling thread
//! - Abort is a request-local flag, checked after every handler
//! - Resolved chains may be memoized per route in a concurrent map

pub mod context;
pub mod engine;
pub mod pool;
pub mod recovery;
pub mod terminal;

pub use context::Context;
pub use engine::{DispatchOutcome, Dispatcher};
pub use pool::{ContextPool, PooledContext};
pub use recovery::{Fault, RecoverHandler};
