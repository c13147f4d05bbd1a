//! Kernel trait definition

use crate::core::SparseVector;

/// Kernel function trait
///
/// A kernel K(x, y) must be symmetric and satisfy Mercer's condition so the
/// dual problem stays convex.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64;

    /// Compute K(x, y) when both squared norms are already known
    ///
    /// Kernels that depend on distances (RBF) override this to skip the
    /// sparse merge over non-shared indices.
    fn compute_with_norms(
        &self,
        x: &SparseVector,
        y: &SparseVector,
        x_norm_sq: f64,
        y_norm_sq: f64,
    ) -> f64 {
        let _ = (x_norm_sq, y_norm_sq);
        self.compute(x, y)
    }

    /// Short identifier used in logs and reports
    fn name(&self) -> String;
}
