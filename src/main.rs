//! Regex router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ axum server ─▶ request id ─▶ trace ─▶ timeout  │
//!                           │                                     │            │
//!                           │                                     ▼            │
//!                           │                             ┌──────────────┐     │
//!                           │   config watcher ──swap──▶  │ RegexSwitch  │     │
//!                           │                             │ rank ▸ try ▸ │     │
//!                           │                             │ fall back    │     │
//!                           │                             └──────┬───────┘     │
//!     Client Response       │                                    ▼             │
//!     ◀─────────────────────┼──────────────── Recorder ◀── route handler       │
//!                           └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use regex_router::config::{load_config, watcher::ConfigWatcher};
use regex_router::handlers::build_switch;
use regex_router::lifecycle::signals::wait_for_signal;
use regex_router::observability::{logging, metrics};
use regex_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "regex-router")]
#[command(about = "HTTP router dispatching on regular-expression path patterns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured routes
    Serve {
        #[arg(short, long, default_value = "router.toml")]
        config: PathBuf,

        /// Reload routes when the config file changes
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        watch: bool,
    },
    /// Validate a config file and list its routes
    Check {
        #[arg(short, long, default_value = "router.toml")]
        config: PathBuf,
    },
    /// Show which routes match a path, in precedence order
    Explain {
        #[arg(short, long, default_value = "router.toml")]
        config: PathBuf,

        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, watch } => serve(config, watch).await,
        Commands::Check { config } => check(config),
        Commands::Explain { config, path } => explain(config, &path),
    }
}

async fn serve(path: PathBuf, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&path)?;
    logging::init(&config.observability.log_level);

    tracing::info!("regex-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.limits.request_timeout_secs,
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

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = if watch {
        let (watcher, updates) = ConfigWatcher::new(&path);
        (updates, Some(watcher.run()?))
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (updates, None)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&path)?;
    println!("{}: ok", path.display());
    for route in &config.routes {
        println!("  {:<40} {:?}", route.pattern, route.handler);
    }
    Ok(())
}

fn explain(path: PathBuf, request_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&path)?;
    let switch = build_switch(&config.routes)?;
    let ranked = switch.rank(request_path);

    if ranked.is_empty() {
        println!("{request_path}: no route matches (404)");
        return Ok(());
    }

    println!("{request_path}: {} matching route(s), most specific first", ranked.len());
    for (rank, m) in ranked.iter().enumerate() {
        let vars = serde_json::to_string(&m.vars())?;
        println!("  #{rank} {:<40} span={} vars={vars}", m.rule().pattern(), m.span_len());
    }
    Ok(())
}
