//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build router → Freeze → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Routes are frozen before the listener binds: no traffic reaches a half-built table
//! - One broadcast channel fans the shutdown out to every server task

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
