//! Offline training: dataset loading, splitting, fitting and evaluation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::entities::ride::DATASET_COLUMNS;
use crate::entities::RideRecord;
use crate::model::{ForestParams, Metrics, ModelError, PricingModel};

pub const TEST_SIZE: f64 = 0.15;
pub const VAL_SIZE: f64 = 0.15;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("Missing columns {missing:?}. Expected: {expected:?}, found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type TrainingResult<T> = Result<T, TrainingError>;

/// Read the ride dataset, checking its header before parsing any row.
pub fn load_dataset(path: &Path) -> TrainingResult<Vec<RideRecord>> {
    if !path.exists() {
        return Err(TrainingError::DatasetNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let present: BTreeSet<&str> = found.iter().map(String::as_str).collect();

    let missing: Vec<String> = DATASET_COLUMNS
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TrainingError::MissingColumns {
            missing,
            expected: DATASET_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }

    let records = reader
        .deserialize()
        .collect::<Result<Vec<RideRecord>, _>>()?;

    tracing::info!(rows = records.len(), path = %path.display(), "dataset loaded");
    Ok(records)
}

/// Shuffle `rows` with `seed` and cut off `ceil(n * test_size)` rows as the
/// test set. Returns `(train, test)`.
pub fn train_test_split<T: Clone>(rows: &[T], test_size: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((rows.len() as f64 * test_size).ceil() as usize).min(rows.len());
    let (test_idx, train_idx) = indices.split_at(n_test);

    let train = train_idx.iter().map(|&i| rows[i].clone()).collect();
    let test = test_idx.iter().map(|&i| rows[i].clone()).collect();
    (train, test)
}

#[derive(Clone, Debug)]
pub struct DatasetSplits {
    pub train: Vec<RideRecord>,
    pub val: Vec<RideRecord>,
    pub test: Vec<RideRecord>,
}

/// Hold out 15% for test, then 15% of the remainder for validation.
pub fn split_dataset(rows: &[RideRecord], seed: u64) -> DatasetSplits {
    let (rest, test) = train_test_split(rows, TEST_SIZE, seed);
    let (train, val) = train_test_split(&rest, VAL_SIZE, seed);
    DatasetSplits { train, val, test }
}

#[derive(Clone, Debug)]
pub struct SplitReport {
    pub split: &'static str,
    pub rows: usize,
    pub metrics: Metrics,
}

#[derive(Clone, Debug)]
pub struct TrainingReport {
    pub splits: Vec<SplitReport>,
    pub model_path: PathBuf,
}

pub fn evaluate(
    model: &PricingModel,
    rows: &[RideRecord],
    split: &'static str,
) -> TrainingResult<SplitReport> {
    let features: Vec<_> = rows.iter().map(RideRecord::features).collect();
    let predictions = model.predict_batch(&features)?;
    let targets: Vec<f64> = rows.iter().map(|r| r.price).collect();

    let metrics = Metrics::evaluate(&targets, &predictions);
    tracing::info!(
        split,
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "evaluation"
    );
    println!("[{split}] {metrics}");

    Ok(SplitReport {
        split,
        rows: rows.len(),
        metrics,
    })
}

/// Load, split, fit, evaluate and save the pricing model.
pub fn run(data_path: &Path, model_path: &Path, params: &ForestParams) -> TrainingResult<TrainingReport> {
    let records = load_dataset(data_path)?;
    let splits = split_dataset(&records, params.seed);
    tracing::info!(
        train = splits.train.len(),
        val = splits.val.len(),
        test = splits.test.len(),
        "dataset split"
    );

    let model = PricingModel::fit(&splits.train, params)?;

    let reports = vec![
        evaluate(&model, &splits.train, "train")?,
        evaluate(&model, &splits.val, "val")?,
        evaluate(&model, &splits.test, "test")?,
    ];

    model.save(model_path)?;
    tracing::info!(path = %model_path.display(), "model saved");
    println!("Model saved -> {}", model_path.display());

    Ok(TrainingReport {
        splits: reports,
        model_path: model_path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate, write_csv};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_split_sizes_and_coverage() {
        let rows: Vec<usize> = (0..100).collect();
        let (train, test) = train_test_split(&rows, 0.15, 42);
        assert_eq!(test.len(), 15);
        assert_eq!(train.len(), 85);

        let mut all: Vec<usize> = train.into_iter().chain(test).collect();
        all.sort_unstable();
        assert_eq!(all, rows);
    }

    #[test]
    fn test_split_is_seeded() {
        let rows: Vec<usize> = (0..50).collect();
        assert_eq!(train_test_split(&rows, 0.2, 9), train_test_split(&rows, 0.2, 9));
        assert_ne!(train_test_split(&rows, 0.2, 9), train_test_split(&rows, 0.2, 10));
    }

    #[test]
    fn test_split_dataset_proportions() {
        let splits = split_dataset(&generate(1200, 42), 42);
        assert_eq!(splits.test.len(), 180);
        assert_eq!(splits.val.len(), 153);
        assert_eq!(splits.train.len(), 867);
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempdir().unwrap();
        let err = load_dataset(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, TrainingError::DatasetNotFound(_)));
    }

    #[test]
    fn test_missing_price_column_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rides.csv");
        fs::write(
            &path,
            "depart,destination,distance_km,heure_depart,places_disponibles\n\
             Tunis,Sousse,116.42,8,2\n",
        )
        .unwrap();

        let err = load_dataset(&path).unwrap_err();
        match &err {
            TrainingError::MissingColumns { missing, .. } => assert_eq!(missing, &["prix"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("prix"));
    }

    #[test]
    fn test_run_writes_model() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data").join("rides.csv");
        let model_path = dir.path().join("models").join("price_model.json");
        write_csv(&generate(200, 42), &data).unwrap();

        let params = ForestParams {
            n_trees: 5,
            min_samples_leaf: 2,
            seed: 42,
        };
        let report = run(&data, &model_path, &params).unwrap();

        assert_eq!(report.splits.len(), 3);
        assert!(model_path.exists());
        assert!(PricingModel::load(&model_path).unwrap().is_fitted());
    }
}
