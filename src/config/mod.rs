//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → server settings to HttpServer, dispatch settings to Router
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the route table it feeds is frozen anyway
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::DispatchConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
