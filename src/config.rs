use std::env;
use std::path::{Path, PathBuf};

/// Dataset written by the generator and read by the trainer.
pub const DEFAULT_DATASET_PATH: &str = "data/generated_rides.csv";
/// Fitted pipeline written by the trainer and loaded by the service.
pub const DEFAULT_MODEL_PATH: &str = "models/price_model.json";
pub const DEFAULT_SEED: u64 = 42;

/// Resolve `relative` against the crate root, where `data/` and `models/` live.
pub fn project_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub model_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(8000),
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| project_path(DEFAULT_MODEL_PATH)),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            model_path: project_path(DEFAULT_MODEL_PATH),
        }
    }
}
