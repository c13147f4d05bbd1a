//! Binary SVM training
//!
//! Couples a kernel and an [`OptimizerConfig`] with the SMO solver and turns
//! the optimization result into a model that keeps only its support vectors.

use crate::core::{
    OptimizationResult, OptimizerConfig, Prediction, Result, SVMModel, Sample, SparseVector,
};
use crate::kernel::Kernel;
use crate::solver::SMOSolver;
use std::sync::Arc;

/// High-level SVM optimizer that integrates kernel functions and solving algorithms
pub struct SVMOptimizer<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

impl<K: Kernel> SVMOptimizer<K> {
    /// Create a new SVM optimizer with the given kernel and configuration
    pub fn new(kernel: K, config: OptimizerConfig) -> Self {
        Self::with_shared_kernel(Arc::new(kernel), config)
    }

    /// Create an optimizer around a kernel shared with other models
    pub fn with_shared_kernel(kernel: Arc<K>, config: OptimizerConfig) -> Self {
        Self { kernel, config }
    }

    /// Create a new SVM optimizer with default configuration
    pub fn with_kernel(kernel: K) -> Self {
        Self::new(kernel, OptimizerConfig::default())
    }

    /// Train a binary SVM on ±1 labeled samples
    pub fn train_samples(&self, samples: &[Sample]) -> Result<TrainedSVM<K>> {
        self.config.validate()?;

        let solver = SMOSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let result = solver.solve(samples)?;

        Ok(TrainedSVM::new(Arc::clone(&self.kernel), samples, result))
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Get the kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

/// A trained binary SVM model
pub struct TrainedSVM<K: Kernel> {
    kernel: Arc<K>,
    support_vectors: Vec<Sample>,
    alpha: Vec<f64>,
    bias: f64,
    support_indices: Vec<usize>,
    iterations: usize,
    converged: bool,
}

impl<K: Kernel> TrainedSVM<K> {
    pub(crate) fn new(
        kernel: Arc<K>,
        training_samples: &[Sample],
        optimization_result: OptimizationResult,
    ) -> Self {
        let (support_vectors, alpha): (Vec<Sample>, Vec<f64>) = optimization_result
            .support_vectors
            .iter()
            .map(|&sv_idx| {
                (
                    training_samples[sv_idx].clone(),
                    optimization_result.alpha[sv_idx],
                )
            })
            .unzip();

        Self {
            kernel,
            support_vectors,
            alpha,
            bias: optimization_result.b,
            support_indices: optimization_result.support_vectors,
            iterations: optimization_result.iterations,
            converged: optimization_result.converged,
        }
    }

    /// Decision function f(x) = Σ αᵢ yᵢ K(xᵢ, x) + b
    pub fn decision_function(&self, features: &SparseVector) -> f64 {
        self.support_vectors
            .iter()
            .zip(self.alpha.iter())
            .map(|(sv, &alpha)| alpha * sv.label * self.kernel.compute(&sv.features, features))
            .sum::<f64>()
            + self.bias
    }

    /// Get the support vectors
    pub fn support_vectors(&self) -> &[Sample] {
        &self.support_vectors
    }

    /// Get the alpha values for support vectors
    pub fn alpha_values(&self) -> &[f64] {
        &self.alpha
    }

    /// Indices of the support vectors in the training slice
    pub fn support_vector_indices(&self) -> &[usize] {
        &self.support_indices
    }

    /// Solver iterations spent on this model
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the solver met its tolerance
    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl<K: Kernel> SVMModel for TrainedSVM<K> {
    fn predict(&self, sample: &Sample) -> Prediction {
        let decision_value = self.decision_function(&sample.features);
        let label = if decision_value > 0.0 { 1.0 } else { -1.0 };
        Prediction::new(label, decision_value)
    }

    fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    fn bias(&self) -> f64 {
        self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SVMError;
    use crate::kernel::LinearKernel;

    fn sample(value: f64, label: f64) -> Sample {
        Sample::new(SparseVector::new(vec![0], vec![value]), label)
    }

    #[test]
    fn test_svm_optimizer_creation() {
        let config = OptimizerConfig {
            c: 100.0,
            ..OptimizerConfig::default()
        };
        let optimizer = SVMOptimizer::new(LinearKernel::new(), config);

        assert_eq!(optimizer.config().c, 100.0);
        assert_eq!(optimizer.kernel().name(), "linear");
    }

    #[test]
    fn test_svm_training_simple_case() {
        let optimizer = SVMOptimizer::with_kernel(LinearKernel::new());
        let samples = vec![
            sample(2.0, 1.0),
            sample(-2.0, -1.0),
            sample(1.5, 1.0),
            sample(-1.5, -1.0),
        ];

        let model = optimizer
            .train_samples(&samples)
            .expect("Training should succeed");

        assert!(model.n_support_vectors() > 0);
        assert_eq!(model.alpha_values().len(), model.support_vectors().len());
        assert!(model.converged());

        for s in &samples {
            assert_eq!(model.predict(s).label, s.label);
        }
    }

    #[test]
    fn test_train_rejects_invalid_config() {
        let config = OptimizerConfig {
            c: -1.0,
            ..OptimizerConfig::default()
        };
        let optimizer = SVMOptimizer::new(LinearKernel::new(), config);
        let samples = vec![sample(1.0, 1.0), sample(-1.0, -1.0)];

        assert!(matches!(
            optimizer.train_samples(&samples),
            Err(SVMError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_decision_function_orders_samples() {
        let optimizer = SVMOptimizer::with_kernel(LinearKernel::new());
        let samples = vec![sample(1.0, 1.0), sample(-1.0, -1.0)];
        let model = optimizer
            .train_samples(&samples)
            .expect("Training should succeed");

        let positive = model.decision_function(&SparseVector::new(vec![0], vec![0.5]));
        let negative = model.decision_function(&SparseVector::new(vec![0], vec![-0.5]));
        assert!(positive > 0.0 && negative < 0.0);

        let batch = model.predict_batch(&[sample(0.7, 1.0), sample(-0.7, -1.0)]);
        assert_eq!(batch[0].label, 1.0);
        assert_eq!(batch[1].label, -1.0);
    }

    #[test]
    fn test_support_vector_access() {
        let optimizer = SVMOptimizer::with_kernel(LinearKernel::new());
        let samples = vec![sample(2.0, 1.0), sample(-2.0, -1.0), sample(1.0, 1.0)];

        let model = optimizer
            .train_samples(&samples)
            .expect("Training should succeed");

        assert_eq!(
            model.support_vectors().len(),
            model.support_vector_indices().len()
        );
        assert!(model.alpha_values().iter().all(|&a| a > 0.0));
        assert!(model
            .support_vector_indices()
            .iter()
            .all(|&idx| idx < samples.len()));
    }
}
