//! Holdout evaluation of a built-in dataset
//!
//! Load, split, fit an RBF one-vs-one SVM on the training part, predict the
//! test part and report predictions next to the true labels.

use crate::api::{success_ratio, SVM};
use crate::core::{ClassLabel, Classifier, Dataset, OptimizerConfig, Result, SVMError};
use crate::data::{train_test_split, BuiltinDataset, SplitSize};
use log::info;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Parameters of one holdout run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub dataset: BuiltinDataset,
    pub split: SplitSize,
    pub c: f64,
    pub gamma: f64,
    /// Shuffle seed; a random one is drawn when `None`
    pub seed: Option<u64>,
    pub epsilon: f64,
    pub max_iterations: usize,
    /// Kernel cache size in bytes
    pub cache_size: usize,
}

impl PipelineConfig {
    /// Demonstration defaults: 10% test data, gamma 0.001, C 100
    pub fn for_dataset(dataset: BuiltinDataset) -> Self {
        let defaults = OptimizerConfig::default();
        Self {
            dataset,
            split: SplitSize::default(),
            c: 100.0,
            gamma: 0.001,
            seed: None,
            epsilon: defaults.epsilon,
            max_iterations: defaults.max_iterations,
            cache_size: defaults.cache_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "gamma must be positive and finite, got {}",
                self.gamma
            )));
        }
        if let SplitSize::Fraction(f) = self.split {
            if !(f > 0.0 && f < 1.0) {
                return Err(SVMError::InvalidParameter(format!(
                    "Test fraction must be in (0, 1), got {f}"
                )));
            }
        }
        self.optimizer_config().validate()
    }

    fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            c: self.c,
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
            cache_size: self.cache_size,
        }
    }
}

/// Outcome of a holdout run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub dataset: BuiltinDataset,
    pub kernel: String,
    pub c: f64,
    pub seed: u64,
    pub n_samples: usize,
    pub n_features: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub classes: Vec<ClassLabel>,
    /// Predicted labels of the test rows
    pub predicted: Vec<ClassLabel>,
    /// True labels of the test rows
    pub actual: Vec<ClassLabel>,
    pub success_ratio: f64,
    pub n_support_vectors: usize,
    pub generated_at: String,
}

impl PipelineReport {
    /// Number of correctly predicted test rows
    pub fn n_correct(&self) -> usize {
        self.predicted
            .iter()
            .zip(self.actual.iter())
            .filter(|(p, a)| p == a)
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "yhat: {}", format_labels(&self.predicted))?;
        writeln!(f, "y:    {}", format_labels(&self.actual))?;
        write!(f, "success ratio: {:?}", self.success_ratio)
    }
}

fn format_labels(labels: &[ClassLabel]) -> String {
    let joined: Vec<String> = labels.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join(" "))
}

/// Run one holdout evaluation
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);

    let dataset = config.dataset.load()?;
    info!(
        "loaded {}: {} samples, {} features",
        config.dataset,
        dataset.len(),
        dataset.dim()
    );

    let split = train_test_split(&dataset, config.split, seed)?;
    info!(
        "split with seed {seed}: {} train, {} test",
        split.train.len(),
        split.test.len()
    );

    let optimizer = config.optimizer_config();
    let model = SVM::rbf(config.gamma)?
        .with_c(optimizer.c)
        .with_epsilon(optimizer.epsilon)
        .with_max_iterations(optimizer.max_iterations)
        .with_cache_size(optimizer.cache_size)
        .train(&split.train)?;

    let model_info = model.info();
    info!(
        "trained {} pair models, {} support vectors",
        model_info.n_pairs, model_info.n_support_vectors
    );

    let predicted = model.predict_dataset(&split.test)?;
    let actual = split.test.targets();
    let ratio = success_ratio(&predicted, &actual)?;
    info!("success ratio {ratio:.4}");

    Ok(PipelineReport {
        dataset: config.dataset,
        kernel: model_info.kernel,
        c: config.c,
        seed,
        n_samples: dataset.len(),
        n_features: dataset.dim(),
        n_train: split.train.len(),
        n_test: split.test.len(),
        classes: model.inner().classes().to_vec(),
        predicted,
        actual,
        success_ratio: ratio,
        n_support_vectors: model_info.n_support_vectors,
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}
