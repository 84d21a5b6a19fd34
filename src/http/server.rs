//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the axum service wrapping the dispatcher
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind to a listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::http::Exchange;
use crate::lifecycle::shutdown;

/// State injected into the fallback handler.
#[derive(Clone)]
struct ServerState {
    dispatcher: Arc<Dispatcher>,
    max_body_size: usize,
}

/// HTTP front end for a frozen [`Dispatcher`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server owning `dispatcher`.
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        Self::with_shared(config, Arc::new(dispatcher))
    }

    /// Create a server over a dispatcher that is shared elsewhere.
    pub fn with_shared(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = ServerState {
            dispatcher,
            max_body_size: config.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the axum service with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: ServerState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.request_timeout_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The axum service, for in-process testing or embedding.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every request lands here: buffer, dispatch, convert back.
async fn dispatch_handler(State(state): State<ServerState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let exchange = Exchange::from_parts(parts, body);
    let dispatcher = Arc::clone(&state.dispatcher);
    match tokio::task::spawn_blocking(move || dispatcher.dispatch(exchange)).await {
        Ok(exchange) => exchange.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
