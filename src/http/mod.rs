//! HTTP transport adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum + tower-http layers: request id, trace, timeout)
//!     → fallback handler buffers the body into an Exchange
//!     → Dispatcher::dispatch on the blocking pool
//!     → exchange.rs (Exchange → axum Response)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - axum only supplies the wire: no axum routes, everything falls through to one dispatcher
//! - Handlers are synchronous, so dispatch runs under `spawn_blocking`
//! - Request bodies are buffered up to a configured limit before dispatch

pub mod exchange;
pub mod server;

pub use exchange::Exchange;
pub use server::HttpServer;
