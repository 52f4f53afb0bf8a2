//! Train the ride pricing model on the generated dataset.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ride_pricing::config::{project_path, DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH};
use ride_pricing::model::ForestParams;
use ride_pricing::training;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_pricing=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let params = ForestParams::default();
    training::run(
        &project_path(DEFAULT_DATASET_PATH),
        &project_path(DEFAULT_MODEL_PATH),
        &params,
    )
    .context("Training failed")?;

    Ok(())
}
