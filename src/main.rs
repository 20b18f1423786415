//! CMS router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::middleware ──▶ routing::Resolver
//!                                          │                    │
//!                                          │          site → alias → page/post
//!                                          │                    → archive → rewrite
//!                                          ▼
//!                        redirect │ sitemap │ rewritten URI
//!                                          │
//!                                          ▼
//!     Client Response ◀── http::handler (cache negotiation, render)
//!
//!     Cross-cutting: config (TOML + hot reload), observability, lifecycle
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use cms_router::config::{load_config, watcher::ConfigWatcher, RouterConfig};
use cms_router::lifecycle::{spawn_signal_handler, Shutdown};
use cms_router::observability::{logging, metrics};
use cms_router::store::{Api, MemoryStore};
use cms_router::HttpServer;

#[derive(Parser)]
#[command(name = "cms-router")]
#[command(about = "URL routing, cache negotiation and sitemaps for a multi-site CMS", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "cms-router.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_exists = cli.config.exists();
    let config = if config_exists {
        load_config(&cli.config)?
    } else {
        RouterConfig::default()
    };

    logging::init_logging(&config.observability);
    tracing::info!("cms-router v{} starting", env!("CARGO_PKG_VERSION"));
    if !config_exists {
        tracing::warn!(path = ?cli.config, "Config file not found, using defaults");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        seed_path = %config.content.seed_path,
        request_timeout_secs = config.timeouts.request_secs,
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

    let store = Arc::new(MemoryStore::load_from_file(Path::new(&config.content.seed_path))?);
    let api = Api::from_store(store);

    // The watcher must stay alive for updates to keep flowing
    let (watcher, config_updates) = ConfigWatcher::new(&cli.config);
    let _watcher = if config_exists {
        match watcher.run() {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(error = %e, "Config hot reload disabled");
                None
            }
        }
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config, api);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
