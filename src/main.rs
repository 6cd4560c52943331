use std::net::SocketAddr;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pubsub_relay::config::Config;
use pubsub_relay::services::Supervisor;
use pubsub_relay::startup;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pubsub_relay=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        "Loaded configuration for environment: {}",
        config.environment
    );

    let state = startup::build_state(config.clone());

    // Start the relay supervisor; a missing endpoint degrades to idle and
    // the status listener keeps running.
    if let Some(supervisor) = Supervisor::from_config(&config) {
        tokio::spawn(supervisor.run());
    }

    // Start the status server
    let app = startup::build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting status server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGTERM or SIGINT.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        },
    }
}
