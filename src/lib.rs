//! Static request router with hierarchical middleware.
//!
//! Routes are exact paths. Middleware is scoped to path prefixes on `/`
//! boundaries and always runs ancestor-first, ahead of the route's own
//! handlers. The router is configured once, then frozen into a
//! [`Dispatcher`] that any number of worker threads may call concurrently.
//!
//! ```rust
//! use axum::http::{HeaderValue, Method, StatusCode, Uri};
//! use static_router::{Exchange, Registrar, Router};
//!
//! let mut router = Router::new();
//! router.use_middleware(|ctx| ctx.set_header("x", HeaderValue::from_static("1")));
//! router
//!     .group("/api")
//!     .use_middleware(|ctx| ctx.set_content_type("application/json"))
//!     .get("/v1", |ctx| ctx.set_body(r#""Hello world""#));
//!
//! let dispatcher = router.build_handler();
//! let done = dispatcher.dispatch(Exchange::new(Method::GET, Uri::from_static("/api/v1")));
//! assert_eq!(done.status(), StatusCode::OK);
//! assert_eq!(done.response_body(), br#""Hello world""#);
//! ```

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use dispatch::{Context, DispatchOutcome, Dispatcher, Fault};
pub use http::{Exchange, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{Group, Registrar, RouteError, Router};
