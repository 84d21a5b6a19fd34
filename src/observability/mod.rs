//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router / Dispatcher / HttpServer produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Metrics macros are no-ops until a recorder is installed, so tests pay nothing
//! - Log filter comes from `RUST_LOG` first, then config

pub mod logging;
pub mod metrics;
