//! static-router demo server.
//!
//! Wires a small route table onto the HTTP adapter:
//!
//! ```text
//! GET|POST /api/v1.0/   → "Hello world"   (JSON content type, X-API-Version: 1.0)
//! GET      /health      → {"status":"ok"}
//! ```

use std::path::PathBuf;

use axum::http::{HeaderValue, StatusCode};
use clap::Parser;
use tokio::net::TcpListener;

use static_router::config::{load_config, AppConfig, DispatchConfig};
use static_router::lifecycle::signals;
use static_router::observability::{logging, metrics};
use static_router::{Dispatcher, HttpServer, Registrar, Router, Shutdown};

#[derive(Parser)]
#[command(name = "static-router")]
#[command(about = "Exact-path HTTP router with hierarchical middleware", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("static-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        request_timeout_secs = config.server.request_timeout_secs,
        cache_chains = config.dispatch.cache_chains,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let dispatcher = build_routes(config.dispatch.clone());

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let shutdown = Shutdown::new();
    signals::spawn_ctrl_c(shutdown.clone());

    let server = HttpServer::new(config.server, dispatcher);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_routes(config: DispatchConfig) -> Dispatcher {
    let mut router = Router::with_config(config);

    router.get("/health", |ctx| {
        if let Err(e) = ctx.json(&serde_json::json!({ "status": "ok" })) {
            tracing::error!(error = %e, "Failed to encode health body");
            ctx.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        }
    });

    let mut api = router.group("/api");
    api.use_middleware(|ctx| {
        ctx.set_content_type("application/json;charset=utf-8");
        if ctx.header("x-deny").is_some() {
            ctx.set_status(StatusCode::UNAUTHORIZED);
            ctx.abort();
        }
    });

    let mut v1 = api.group("/v1.0");
    v1.use_middleware(|ctx| ctx.set_header("x-api-version", HeaderValue::from_static("1.0")));
    v1.get("/", |ctx| ctx.set_body(r#""Hello world""#));
    v1.post("/", |ctx| ctx.set_body(r#""Hello world""#));

    router.not_found(|ctx| {
        ctx.set_status(StatusCode::NOT_FOUND);
        ctx.set_body("Not Found");
    });

    router.build_handler()
}
