//! Generate the synthetic ride pricing dataset (seeded, reproducible).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ride_pricing::config::{project_path, DEFAULT_DATASET_PATH, DEFAULT_SEED};
use ride_pricing::generator::{generate, write_csv};

#[derive(Parser, Debug)]
#[command(about = "Generate synthetic ride pricing data (seeded, reproducible).")]
struct Args {
    /// Number of samples to generate
    #[arg(long, default_value_t = 1200)]
    samples: usize,

    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output CSV path (default: data/generated_rides.csv under the crate root)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_pricing=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let out = args
        .out
        .unwrap_or_else(|| project_path(DEFAULT_DATASET_PATH));

    let rows = generate(args.samples, args.seed);
    write_csv(&rows, &out).with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "Generated {} samples -> {} (seed={}) at {}",
        rows.len(),
        out.display(),
        args.seed,
        chrono::Local::now()
    );

    Ok(())
}
