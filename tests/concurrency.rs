//! Concurrent dispatch against a single frozen router.

use std::sync::Arc;
use std::thread;

use axum::http::{HeaderValue, Method, StatusCode, Uri};
use static_router::config::DispatchConfig;
use static_router::{Dispatcher, Exchange, Registrar, Router};

mod common;
use common::body;

const THREADS: usize = 8;
const REQUESTS_PER_THREAD: usize = 200;

fn build(config: DispatchConfig) -> Dispatcher {
    let mut router = Router::with_config(config);
    router.use_middleware(|ctx| {
        let id = ctx.header("x-id").unwrap_or("").to_string();
        ctx.set_data("id", id);
    });
    router.get("/echo", |ctx| {
        let id = ctx.get_data::<String>("id").cloned().unwrap_or_default();
        ctx.set_body(id);
    });
    router.post("/echo", |ctx| {
        let echoed = ctx.body().clone();
        ctx.set_body(echoed);
    });
    router.get("/panic", |_| panic!("worker fault"));
    router.build_handler()
}

fn tagged(method: Method, path: &'static str, id: &str) -> Exchange {
    let value = HeaderValue::from_str(id).unwrap();
    Exchange::new(method, Uri::from_static(path)).with_header("x-id", value)
}

#[test]
fn test_parallel_dispatch_keeps_requests_isolated() {
    let dispatcher = Arc::new(build(DispatchConfig::default()));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..REQUESTS_PER_THREAD {
                    let id = format!("{t}-{i}");
                    let ex = dispatcher.dispatch(tagged(Method::GET, "/echo", &id));
                    assert_eq!(ex.status(), StatusCode::OK);
                    assert_eq!(body(&ex), id);

                    let ex = dispatcher.dispatch(
                        Exchange::new(Method::POST, Uri::from_static("/echo"))
                            .with_body(id.clone()),
                    );
                    assert_eq!(body(&ex), id);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    // contexts are bounded by peak concurrency, not by request count
    assert!(dispatcher.pool().created() <= THREADS);
    assert_eq!(dispatcher.pool().idle(), dispatcher.pool().created());
    assert_eq!(dispatcher.cached_chains(), 2);
}

#[test]
fn test_parallel_faults_do_not_leak_contexts() {
    let dispatcher = Arc::new(build(DispatchConfig::default()));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..50 {
                    let ex = dispatcher.dispatch(tagged(Method::GET, "/panic", "x"));
                    assert_eq!(ex.status(), StatusCode::INTERNAL_SERVER_ERROR);

                    let id = format!("{t}-{i}");
                    let ex = dispatcher.dispatch(tagged(Method::GET, "/echo", &id));
                    assert_eq!(body(&ex), id);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert!(dispatcher.pool().created() <= THREADS);
    assert_eq!(dispatcher.pool().idle(), dispatcher.pool().created());
}

#[test]
fn test_idle_contexts_capped_under_load() {
    let config = DispatchConfig {
        pool_max_idle: 2,
        ..DispatchConfig::default()
    };
    let dispatcher = Arc::new(build(config));

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for _ in 0..REQUESTS_PER_THREAD {
                    dispatcher.dispatch(tagged(Method::GET, "/echo", "same"));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert!(dispatcher.pool().idle() <= 2);
}
