//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use regex_router::config::{HandlerConfig, RouteConfig, RouterConfig};
use regex_router::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Build a config bound to `addr` with the given routes.
pub fn config(addr: SocketAddr, routes: Vec<(&str, HandlerConfig)>) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.listener.bind_address = addr.to_string();
    config.routes = routes
        .into_iter()
        .map(|(pattern, handler)| RouteConfig {
            pattern: pattern.into(),
            handler,
        })
        .collect();
    config
}

/// A running router plus the handles needed to steer it.
pub struct TestRouter {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<RouterConfig>,
}

/// Start a router serving `config` and wait until it accepts connections.
pub async fn start_router(config: RouterConfig) -> TestRouter {
    let addr: SocketAddr = config.listener.bind_address.parse().unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestRouter {
        addr,
        shutdown,
        updates,
    }
}

/// HTTP client without connection pooling or proxies.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
