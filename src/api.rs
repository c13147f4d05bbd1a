//! High-level API for multiclass SVM classification
//!
//! This module wraps the one-vs-one trainer in a builder, adds dataset-level
//! prediction and scoring, and computes evaluation metrics.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use svm_holdout::api::SVM;
//! use svm_holdout::data::{load_iris, train_test_split, SplitSize};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let iris = load_iris()?;
//! let split = train_test_split(&iris, SplitSize::Fraction(0.1), 42)?;
//!
//! let model = SVM::rbf(0.001)?.with_c(100.0).train(&split.train)?;
//!
//! let predictions = model.predict_dataset(&split.test)?;
//! println!("yhat: {predictions:?}");
//! println!("success ratio: {}", model.score(&split.test)?);
//! # Ok(())
//! # }
//! ```

use crate::core::{
    ClassLabel, Classifier, Dataset, OptimizerConfig, Result, SVMError, SparseVector,
};
use crate::kernel::{Kernel, LinearKernel, RBFKernel};
use crate::multiclass::{OneVsOne, OneVsOneModel};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// High-level SVM interface with builder pattern
pub struct SVM<K: Kernel = LinearKernel> {
    kernel: K,
    config: OptimizerConfig,
}

impl SVM<LinearKernel> {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self::with_kernel(LinearKernel::new())
    }
}

impl Default for SVM<LinearKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl SVM<RBFKernel> {
    /// Create an SVM with an RBF kernel of the given width
    pub fn rbf(gamma: f64) -> Result<Self> {
        Ok(Self::with_kernel(RBFKernel::try_new(gamma)?))
    }
}

impl<K: Kernel> SVM<K> {
    /// Create SVM with custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            config: OptimizerConfig::default(),
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set maximum number of iterations per pair model
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set kernel cache size in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.config.cache_size = cache_size;
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Train on a dataset
    pub fn train<D: Dataset>(self, dataset: &D) -> Result<TrainedModel<K>> {
        let kernel_name = self.kernel.name();
        let model = OneVsOne::new(self.kernel, self.config).fit(dataset)?;
        Ok(TrainedModel {
            model,
            n_features: dataset.dim(),
            kernel_name,
        })
    }
}

/// Trained multiclass model with dataset-level helpers
pub struct TrainedModel<K: Kernel> {
    model: OneVsOneModel<K>,
    n_features: usize,
    kernel_name: String,
}

impl<K: Kernel> TrainedModel<K> {
    /// Predict the class of one feature vector
    pub fn predict(&self, features: &SparseVector) -> ClassLabel {
        self.model.predict(features)
    }

    /// Predict every row of a dataset, in row order
    pub fn predict_dataset<D: Dataset>(&self, dataset: &D) -> Result<Vec<ClassLabel>> {
        if dataset.dim() != self.n_features {
            return Err(SVMError::DimensionMismatch {
                expected: self.n_features,
                actual: dataset.dim(),
            });
        }
        Ok((0..dataset.len())
            .map(|i| self.model.predict(dataset.features(i)))
            .collect())
    }

    /// Fraction of rows classified correctly
    pub fn score<D: Dataset>(&self, dataset: &D) -> Result<f64> {
        let predictions = self.predict_dataset(dataset)?;
        success_ratio(&predictions, &dataset.targets())
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed<D: Dataset>(&self, dataset: &D) -> Result<EvaluationMetrics> {
        let predictions = self.predict_dataset(dataset)?;
        EvaluationMetrics::from_predictions(&predictions, &dataset.targets())
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            kernel: self.kernel_name.clone(),
            n_features: self.n_features,
            classes: self.model.classes().to_vec(),
            n_pairs: self.model.n_pairs(),
            n_support_vectors: self.model.n_support_vectors(),
        }
    }

    /// Get the underlying one-vs-one model
    pub fn inner(&self) -> &OneVsOneModel<K> {
        &self.model
    }
}

/// Fraction of positions where prediction and truth agree
///
/// Returns 0.0 for empty input.
pub fn success_ratio(predicted: &[ClassLabel], actual: &[ClassLabel]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(SVMError::DimensionMismatch {
            expected: actual.len(),
            actual: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Ok(0.0);
    }

    let correct = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();

    Ok(correct as f64 / actual.len() as f64)
}

/// Multiclass confusion matrix
///
/// Rows are actual classes, columns predicted classes, both ordered like
/// [`EvaluationMetrics::classes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    classes: Vec<ClassLabel>,
    matrix: Vec<Vec<usize>>,
}

impl EvaluationMetrics {
    /// Build the matrix over every class seen in either slice
    pub fn from_predictions(predicted: &[ClassLabel], actual: &[ClassLabel]) -> Result<Self> {
        if predicted.len() != actual.len() {
            return Err(SVMError::DimensionMismatch {
                expected: actual.len(),
                actual: predicted.len(),
            });
        }

        let classes: Vec<ClassLabel> = predicted
            .iter()
            .chain(actual.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut matrix = vec![vec![0; classes.len()]; classes.len()];
        for (p, a) in predicted.iter().zip(actual.iter()) {
            // both labels are in `classes` by construction
            if let (Ok(row), Ok(col)) = (classes.binary_search(a), classes.binary_search(p)) {
                matrix[row][col] += 1;
            }
        }

        Ok(Self { classes, matrix })
    }

    pub fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    /// Count of rows with actual class `actual` predicted as `predicted`
    pub fn count(&self, actual: ClassLabel, predicted: ClassLabel) -> usize {
        match (self.position(actual), self.position(predicted)) {
            (Some(row), Some(col)) => self.matrix[row][col],
            _ => 0,
        }
    }

    /// Number of evaluated rows
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    /// Correct predictions over all predictions
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.classes.len()).map(|i| self.matrix[i][i]).sum();
        correct as f64 / total as f64
    }

    /// TP / (TP + FP) for one class
    pub fn precision(&self, class: ClassLabel) -> f64 {
        let Some(col) = self.position(class) else {
            return 0.0;
        };
        let predicted: usize = self.matrix.iter().map(|row| row[col]).sum();
        ratio(self.matrix[col][col], predicted)
    }

    /// TP / (TP + FN) for one class
    pub fn recall(&self, class: ClassLabel) -> f64 {
        let Some(row) = self.position(class) else {
            return 0.0;
        };
        ratio(self.matrix[row][row], self.support(class))
    }

    /// Harmonic mean of precision and recall for one class
    pub fn f1_score(&self, class: ClassLabel) -> f64 {
        let p = self.precision(class);
        let r = self.recall(class);
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Number of rows whose actual class is `class`
    pub fn support(&self, class: ClassLabel) -> usize {
        self.position(class)
            .map_or(0, |row| self.matrix[row].iter().sum())
    }

    fn position(&self, class: ClassLabel) -> Option<usize> {
        self.classes.binary_search(&class).ok()
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>8} {:>10} {:>10} {:>10} {:>8}",
            "class", "precision", "recall", "f1", "support"
        )?;
        for &class in &self.classes {
            writeln!(
                f,
                "{:>8} {:>10.3} {:>10.3} {:>10.3} {:>8}",
                class,
                self.precision(class),
                self.recall(class),
                self.f1_score(class),
                self.support(class)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "confusion matrix (rows: actual, columns: predicted)")?;
        for row in &self.matrix {
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>4}")).collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        write!(f, "accuracy: {:.4}", self.accuracy())
    }
}

/// Model information
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kernel: String,
    pub n_features: usize,
    pub classes: Vec<ClassLabel>,
    pub n_pairs: usize,
    pub n_support_vectors: usize,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use crate::data::{train_test_split, LabeledDataset, SplitSize};

    /// Train an RBF SVM on a seeded holdout split and return its test score
    pub fn holdout_score(
        dataset: &LabeledDataset,
        size: SplitSize,
        seed: u64,
        c: f64,
        gamma: f64,
    ) -> Result<f64> {
        let split = train_test_split(dataset, size, seed)?;
        let model = SVM::rbf(gamma)?.with_c(c).train(&split.train)?;
        model.score(&split.test)
    }
}
