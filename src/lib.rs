pub mod config;
pub mod entities;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod training;
pub mod utils;

use std::sync::Arc;

use model::PricingModel;

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared, read-only service state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<PricingModel>,
    pub config: Config,
}

impl AppState {
    pub fn new(model: PricingModel, config: Config) -> Self {
        Self {
            model: Arc::new(model),
            config,
        }
    }
}
