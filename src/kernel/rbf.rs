//! RBF (Radial Basis Function) kernel implementation
//!
//! K(x, y) = exp(-γ * ||x - y||²), where γ (gamma) controls the kernel width.

use crate::core::{Result, SVMError, SparseVector};
use crate::kernel::linear::dot_product_sparse;
use crate::kernel::Kernel;

/// RBF kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// Small gamma values make every training point influence a wide region,
/// large values make the decision surface follow individual points. On raw
/// 0..16 pixel intensities (64 features) γ = 0.001 keeps
/// γ·||x - y||² in a useful range.
#[derive(Debug, Clone, Copy)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma }
    }

    /// Fallible constructor for user-supplied gamma values
    pub fn try_new(gamma: f64) -> Result<Self> {
        if gamma.is_finite() && gamma > 0.0 {
            Ok(Self { gamma })
        } else {
            Err(SVMError::InvalidParameter(format!(
                "Gamma must be a positive finite number, got: {gamma}"
            )))
        }
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RBFKernel {
    /// Default RBF kernel with gamma = 1.0
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        (-self.gamma * squared_euclidean_distance(x, y)).exp()
    }

    fn compute_with_norms(
        &self,
        x: &SparseVector,
        y: &SparseVector,
        x_norm_sq: f64,
        y_norm_sq: f64,
    ) -> f64 {
        // ||x - y||² = ||x||² + ||y||² - 2*x^T*y, clamped against rounding
        let squared_distance = (x_norm_sq + y_norm_sq - 2.0 * dot_product_sparse(x, y)).max(0.0);
        (-self.gamma * squared_distance).exp()
    }

    fn name(&self) -> String {
        format!("rbf(gamma={})", self.gamma)
    }
}

/// Squared Euclidean distance between two sparse vectors
///
/// Indices present in only one of the vectors contribute their squared value.
fn squared_euclidean_distance(x: &SparseVector, y: &SparseVector) -> f64 {
    let mut distance_sq = 0.0;
    let (mut i, mut j) = (0, 0);

    while i < x.indices.len() && j < y.indices.len() {
        let (x_idx, y_idx) = (x.indices[i], y.indices[j]);

        if x_idx == y_idx {
            let diff = x.values[i] - y.values[j];
            distance_sq += diff * diff;
            i += 1;
            j += 1;
        } else if x_idx < y_idx {
            distance_sq += x.values[i] * x.values[i];
            i += 1;
        } else {
            distance_sq += y.values[j] * y.values[j];
            j += 1;
        }
    }

    distance_sq += x.values[i..].iter().map(|v| v * v).sum::<f64>();
    distance_sq += y.values[j..].iter().map(|v| v * v).sum::<f64>();

    distance_sq
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rbf_kernel_creation() {
        assert_eq!(RBFKernel::new(0.5).gamma(), 0.5);
        assert_eq!(RBFKernel::default().gamma(), 1.0);
        assert_eq!(RBFKernel::new(0.001).name(), "rbf(gamma=0.001)");
    }

    #[test]
    #[should_panic(expected = "Gamma must be positive")]
    fn test_rbf_kernel_zero_gamma() {
        RBFKernel::new(0.0);
    }

    #[test]
    fn test_rbf_kernel_try_new() {
        assert!(RBFKernel::try_new(0.001).is_ok());
        assert!(matches!(
            RBFKernel::try_new(-1.0),
            Err(SVMError::InvalidParameter(_))
        ));
        assert!(RBFKernel::try_new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rbf_kernel_identical_vectors() {
        let kernel = RBFKernel::new(1.0);
        let x = SparseVector::new(vec![0, 1, 2], vec![1.0, 2.0, 3.0]);

        assert_relative_eq!(kernel.compute(&x, &x), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_kernel_known_value() {
        let kernel = RBFKernel::new(0.001);
        let x = SparseVector::from_dense(&[0.0, 3.0, 16.0]);
        let y = SparseVector::from_dense(&[4.0, 3.0, 0.0]);

        // ||x - y||² = 16 + 0 + 256
        assert_relative_eq!(
            kernel.compute(&x, &y),
            (-0.001_f64 * 272.0).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rbf_kernel_symmetry() {
        let kernel = RBFKernel::new(0.5);
        let x = SparseVector::new(vec![0, 2, 4], vec![1.0, 2.0, 3.0]);
        let y = SparseVector::new(vec![1, 2, 3], vec![1.0, 2.0, 3.0]);

        assert_eq!(kernel.compute(&x, &y), kernel.compute(&y, &x));
    }

    #[test]
    fn test_rbf_kernel_with_norms() {
        let kernel = RBFKernel::new(2.0);
        let x = SparseVector::new(vec![0, 1], vec![3.0, 4.0]);
        let y = SparseVector::new(vec![0, 1], vec![1.0, 2.0]);

        let direct = kernel.compute(&x, &y);
        let with_norms = kernel.compute_with_norms(&x, &y, x.norm_squared(), y.norm_squared());

        assert_relative_eq!(direct, with_norms, epsilon = 1e-12);
    }

    #[test]
    fn test_squared_euclidean_distance() {
        let x = SparseVector::new(vec![0, 2, 5], vec![1.0, 3.0, 2.0]);
        let y = SparseVector::new(vec![2, 3, 5], vec![2.0, 1.0, 4.0]);

        // 1 (idx 0) + 1 (idx 2) + 1 (idx 3) + 4 (idx 5)
        assert_eq!(squared_euclidean_distance(&x, &y), 7.0);
        assert_eq!(squared_euclidean_distance(&x, &x), 0.0);
    }

    #[test]
    fn test_squared_euclidean_distance_tails() {
        let x = SparseVector::empty();
        let y = SparseVector::new(vec![0, 1], vec![1.0, 2.0]);

        assert_eq!(squared_euclidean_distance(&x, &y), 5.0);
        assert_eq!(squared_euclidean_distance(&y, &x), 5.0);
    }

    #[test]
    fn test_rbf_kernel_decreases_with_distance() {
        let kernel = RBFKernel::new(1.0);
        let origin = SparseVector::empty();
        let values: Vec<f64> = (1..=3)
            .map(|d| kernel.compute(&origin, &SparseVector::new(vec![0], vec![d as f64])))
            .collect();

        assert!(values[0] > values[1] && values[1] > values[2]);
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
