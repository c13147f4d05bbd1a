//! Linear kernel implementation

use crate::core::SparseVector;
use crate::kernel::Kernel;

/// Linear kernel: K(x, y) = x^T * y
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        dot_product_sparse(x, y)
    }

    fn name(&self) -> String {
        "linear".to_string()
    }
}

/// Dot product of two sparse vectors
///
/// Both index lists are sorted, so a single merge pass suffices:
/// O(nnz(x) + nnz(y)).
pub(crate) fn dot_product_sparse(x: &SparseVector, y: &SparseVector) -> f64 {
    let mut result = 0.0;
    let (mut i, mut j) = (0, 0);

    while i < x.indices.len() && j < y.indices.len() {
        match x.indices[i].cmp(&y.indices[j]) {
            std::cmp::Ordering::Equal => {
                result += x.values[i] * y.values[j];
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_kernel_basic() {
        let kernel = LinearKernel::new();

        let x = SparseVector::new(vec![0, 2, 4], vec![1.0, 2.0, 3.0]);
        let y = SparseVector::new(vec![1, 2, 3], vec![1.0, 2.0, 3.0]);

        // Only index 2 overlaps
        assert_eq!(kernel.compute(&x, &y), 4.0);
        assert_eq!(kernel.name(), "linear");
    }

    #[test]
    fn test_linear_kernel_matches_dense_dot() {
        let kernel = LinearKernel::new();
        let a = [0.0, 5.0, 13.0, 9.0, 1.0, 0.0, 0.0, 0.0];
        let b = [0.0, 0.0, 13.0, 15.0, 10.0, 15.0, 5.0, 0.0];

        let dense: f64 = a.iter().zip(b.iter()).map(|(p, q)| p * q).sum();
        let sparse = kernel.compute(&SparseVector::from_dense(&a), &SparseVector::from_dense(&b));

        assert_eq!(sparse, dense);
    }

    #[test]
    fn test_dot_product_empty() {
        let x = SparseVector::empty();
        let y = SparseVector::new(vec![0, 1], vec![1.0, 2.0]);

        assert_eq!(dot_product_sparse(&x, &y), 0.0);
        assert_eq!(dot_product_sparse(&y, &x), 0.0);
    }
}
