//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Setup (single-threaded):
//!     Router / Group registration calls
//!     → table.rs (per-path handler chains)
//!     → middleware.rs (resolve ancestor middleware for a path)
//!     → matcher.rs (prefix boundary rule)
//!
//! Freeze:
//!     Router::build_handler()
//!     → consumes the Router
//!     → Dispatcher (immutable route table + terminal handlers)
//! ```
//!
//! # Design Decisions
//! - Exact full-path matching only; no patterns, no regex, no trie
//! - Middleware scope is a path prefix on `/` boundaries
//! - Middleware order is ancestor-first, then registration order, independent of map iteration
//! - Late middleware is spliced into already-registered routes
//! - The builder is consumed by the freeze step, so registration after freeze cannot compile

pub mod group;
pub mod handler;
pub mod matcher;
pub mod middleware;
pub mod router;
pub mod table;

pub use group::Group;
pub use handler::{Handler, HandlerEntry, Verb};
pub use router::{Registrar, RouteError, Router};
