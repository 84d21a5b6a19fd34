//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{Method, Uri};
use static_router::config::ServerConfig;
use static_router::{Context, Dispatcher, Exchange, HttpServer, Shutdown};

/// Build a request exchange with an empty body.
pub fn request(method: Method, path: &'static str) -> Exchange {
    Exchange::new(method, Uri::from_static(path))
}

/// Response body as UTF-8.
pub fn body(exchange: &Exchange) -> String {
    String::from_utf8(exchange.response_body().to_vec()).unwrap()
}

/// Records which handlers ran, in order.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that appends `name` to the log.
    pub fn mark(&self, name: &'static str) -> impl Fn(&mut Context) + Send + Sync + 'static {
        let log = self.log.clone();
        move |_ctx: &mut Context| log.lock().unwrap().push(name)
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }
}

/// Serve `dispatcher` on an ephemeral local port.
pub async fn start_server(dispatcher: Dispatcher, config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
