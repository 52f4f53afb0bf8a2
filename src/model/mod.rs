//! Ride pricing model.
//!
//! A two-step pipeline: depart and destination are one-hot encoded, distance,
//! hour and seats pass through unchanged, and a random forest regresses the
//! price from the resulting row.

pub mod encoder;
pub mod forest;
pub mod metrics;
pub mod tree;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{RideFeatures, RideRecord};

pub use encoder::OneHotEncoder;
pub use forest::{ForestParams, RandomForestRegressor};
pub use metrics::Metrics;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("model has not been fitted")]
    NotFitted,

    #[error("cannot fit a model on an empty dataset")]
    EmptyDataset,

    #[error("expected {expected} features, got {found}")]
    FeatureWidth { expected: usize, found: usize },

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid model file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Fitted encoder + forest, persisted as a single JSON document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingModel {
    encoder: OneHotEncoder,
    forest: RandomForestRegressor,
}

impl PricingModel {
    pub fn fit(records: &[RideRecord], params: &ForestParams) -> Result<Self, ModelError> {
        if records.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let encoder = OneHotEncoder::fit(
            records
                .iter()
                .map(|r| [r.depart.as_str(), r.destination.as_str()]),
        );

        let mut model = Self {
            encoder,
            forest: RandomForestRegressor::new(params.clone()),
        };

        let x: Vec<Vec<f64>> = records.iter().map(|r| model.encode(&r.features())).collect();
        let y: Vec<f64> = records.iter().map(|r| r.price).collect();
        model.forest.fit(&x, &y);

        tracing::info!(
            rows = records.len(),
            features = model.forest.n_features(),
            trees = model.forest.n_trees(),
            "pricing model fitted"
        );

        Ok(model)
    }

    /// Feature row: one-hot(depart), one-hot(destination), distance, hour, seats
    fn encode(&self, features: &RideFeatures) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.encoder.width() + 3);
        self.encoder.transform_into(
            &[features.depart.as_str(), features.destination.as_str()],
            &mut row,
        );
        row.push(features.distance_km);
        row.push(f64::from(features.departure_hour));
        row.push(f64::from(features.available_seats));
        row
    }

    pub fn predict(&self, features: &RideFeatures) -> Result<f64, ModelError> {
        if !self.forest.is_fitted() {
            return Err(ModelError::NotFitted);
        }

        let row = self.encode(features);
        if row.len() != self.forest.n_features() {
            return Err(ModelError::FeatureWidth {
                expected: self.forest.n_features(),
                found: row.len(),
            });
        }

        let prediction = self.forest.predict(&row).ok_or(ModelError::NotFitted)?;
        if !prediction.is_finite() {
            return Err(ModelError::NonFinite(prediction));
        }
        Ok(prediction)
    }

    pub fn predict_batch(&self, rows: &[RideFeatures]) -> Result<Vec<f64>, ModelError> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    pub fn is_fitted(&self) -> bool {
        self.forest.is_fitted()
    }

    /// Serialize to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use tempfile::tempdir;

    fn small_params() -> ForestParams {
        ForestParams {
            n_trees: 10,
            min_samples_leaf: 2,
            seed: 42,
        }
    }

    fn ride(depart: &str, destination: &str, distance_km: f64) -> RideFeatures {
        RideFeatures {
            depart: depart.to_string(),
            destination: destination.to_string(),
            distance_km,
            departure_hour: 10,
            available_seats: 3,
        }
    }

    #[test]
    fn test_fit_and_predict() {
        let records = generate(300, 42);
        let model = PricingModel::fit(&records, &small_params()).unwrap();

        let price = model.predict(&ride("Tunis", "Sousse", 116.4)).unwrap();
        assert!(price > 0.0 && price < 60.0, "price {price}");
    }

    #[test]
    fn test_unknown_city_is_tolerated() {
        let model = PricingModel::fit(&generate(200, 1), &small_params()).unwrap();
        assert!(model.predict(&ride("Atlantis", "Tunis", 50.0)).is_ok());
    }

    #[test]
    fn test_unfitted_model_errors() {
        let model = PricingModel::default();
        assert!(matches!(
            model.predict(&ride("Tunis", "Sousse", 116.4)),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert!(matches!(
            PricingModel::fit(&[], &small_params()),
            Err(ModelError::EmptyDataset)
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("price_model.json");
        let model = PricingModel::fit(&generate(100, 3), &small_params()).unwrap();

        model.save(&path).unwrap();
        let loaded = PricingModel::load(&path).unwrap();

        let sample = ride("Sfax", "Gabes", 128.0);
        let before = model.predict(&sample).unwrap();
        let after = loaded.predict(&sample).unwrap();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = PricingModel::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
        assert!(err.to_string().contains("nope.json"));
    }
}
