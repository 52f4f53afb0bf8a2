use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ride_pricing::{config::Config, model::PricingModel, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_pricing=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // The service never runs without a model
    let model = PricingModel::load(&config.model_path)
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;
    tracing::info!(path = %config.model_path.display(), "Model loaded");

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("Invalid server address")?;

    let app = routes::create_router(AppState::new(model, config));

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
