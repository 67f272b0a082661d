//! Service entry point.

use std::path::Path;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use site_backend::config::load_config;
use site_backend::db::Store;
use site_backend::lifecycle::{wait_for_signal, Shutdown};
use site_backend::mail::Mailer;
use site_backend::observability::metrics;
use site_backend::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("site-backend v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = load_config(config_path.as_deref().map(Path::new))?;

    tracing::info!(
        bind_address = %config.server.bind_address,
        trust_proxy = config.server.trust_proxy,
        allowed_origins = config.cors.origins.len(),
        static_dir = ?config.server.static_dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Store::connect(&config.database)?;

    let mailer = if config.mail.enabled {
        Some(Mailer::from_config(&config.mail)?)
    } else {
        tracing::info!("Mail dispatch disabled");
        None
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(&config, store, mailer);
    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
