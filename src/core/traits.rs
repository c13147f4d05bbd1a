//! Core traits for the SVM pipeline

use crate::core::{ClassLabel, Prediction, Sample, SparseVector};

/// Labeled multiclass dataset abstraction
pub trait Dataset: Send + Sync {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Feature vector of a single sample
    ///
    /// # Panics
    /// Panics if index >= len()
    fn features(&self, i: usize) -> &SparseVector;

    /// Class label of a single sample
    ///
    /// # Panics
    /// Panics if index >= len()
    fn target(&self, i: usize) -> ClassLabel;

    /// All labels in sample order
    fn targets(&self) -> Vec<ClassLabel> {
        (0..self.len()).map(|i| self.target(i)).collect()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trained binary SVM model
pub trait SVMModel: Send + Sync {
    /// Predict a single sample
    fn predict(&self, sample: &Sample) -> Prediction;

    /// Predict multiple samples
    fn predict_batch(&self, samples: &[Sample]) -> Vec<Prediction> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// Get the number of support vectors
    fn n_support_vectors(&self) -> usize;

    /// Get the bias term
    fn bias(&self) -> f64;
}

/// Trained multiclass classifier
pub trait Classifier: Send + Sync {
    /// Predict the class of a single feature vector
    fn predict(&self, features: &SparseVector) -> ClassLabel;

    /// Predict a batch of feature vectors, preserving order
    fn predict_batch(&self, batch: &[&SparseVector]) -> Vec<ClassLabel> {
        batch.iter().map(|x| self.predict(x)).collect()
    }

    /// Classes known to the model, in ascending order
    fn classes(&self) -> &[ClassLabel];
}
