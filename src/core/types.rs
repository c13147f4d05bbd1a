//! Core type definitions for the SVM pipeline

use crate::core::{Result, SVMError};

/// Integer class identifier of a multiclass sample
pub type ClassLabel = usize;

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Sparse vector representation with sorted indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, ensuring indices are sorted
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Build a sparse vector from a dense row, dropping exact zeros
    pub fn from_dense(row: &[f64]) -> Self {
        let (indices, values): (Vec<usize>, Vec<f64>) = row
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .unzip();
        Self { indices, values }
    }

    /// Create an empty sparse vector
    pub fn empty() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Get the value at a specific index (0 if not present)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Expand into a dense row of length `dim`
    pub fn to_dense(&self, dim: usize) -> Vec<f64> {
        let mut row = vec![0.0; dim];
        for (&idx, &value) in self.indices.iter().zip(self.values.iter()) {
            if idx < dim {
                row[idx] = value;
            }
        }
        row
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// Compute L2 norm
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Largest stored index plus one, or 0 for an empty vector
    pub fn min_dim(&self) -> usize {
        self.indices.last().map_or(0, |&idx| idx + 1)
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Binary training sample with features and a ±1 label
#[derive(Clone, Debug)]
pub struct Sample {
    /// Feature vector (sparse representation)
    pub features: SparseVector,
    /// Class label (+1 or -1 for binary classification)
    pub label: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: SparseVector, label: f64) -> Self {
        Self { features, label }
    }
}

/// Result of optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values)
    pub alpha: Vec<f64>,
    /// Bias term (b)
    pub b: f64,
    /// Indices of support vectors (where alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final dual objective value
    pub objective_value: f64,
    /// Whether the stopping tolerance was met before the iteration cap
    pub converged: bool,
}

/// Configuration for optimizer
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Tolerance on the maximal KKT violation
    pub epsilon: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Kernel cache size in bytes
    pub cache_size: usize,
}

impl OptimizerConfig {
    /// Check that every parameter is usable by the solver
    pub fn validate(&self) -> Result<()> {
        if !self.c.is_finite() || self.c <= 0.0 {
            return Err(SVMError::InvalidParameter(format!(
                "C must be a positive finite number, got: {}",
                self.c
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SVMError::InvalidParameter(format!(
                "Epsilon must be a positive finite number, got: {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(SVMError::InvalidParameter(
                "Maximum iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.001,
            max_iterations: 100_000,
            cache_size: 100_000_000, // 100MB
        }
    }
}
