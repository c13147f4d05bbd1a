//! In-memory labeled dataset
//!
//! Rows are stored as sparse vectors next to a parallel vector of class
//! labels. Nothing is mutated after construction; subsets are copies.

use crate::core::{ClassLabel, Dataset, Result, SVMError, SparseVector};
use std::collections::BTreeSet;

/// Sample matrix plus label vector
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    rows: Vec<SparseVector>,
    targets: Vec<ClassLabel>,
    n_features: usize,
    feature_names: Vec<String>,
    class_names: Vec<String>,
}

impl LabeledDataset {
    /// Create a dataset from sparse rows and their labels
    ///
    /// Every row must fit into `n_features` columns and there must be exactly
    /// one label per row.
    pub fn new(
        rows: Vec<SparseVector>,
        targets: Vec<ClassLabel>,
        n_features: usize,
    ) -> Result<Self> {
        if rows.len() != targets.len() {
            return Err(SVMError::DimensionMismatch {
                expected: rows.len(),
                actual: targets.len(),
            });
        }

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.min_dim() > n_features)
        {
            return Err(SVMError::InvalidDataset(format!(
                "Row {i} uses feature index {} but the dataset has {n_features} features",
                row.min_dim() - 1
            )));
        }

        Ok(Self {
            rows,
            targets,
            n_features,
            feature_names: Vec::new(),
            class_names: Vec::new(),
        })
    }

    /// Create a dataset from dense rows of equal length
    pub fn from_dense(rows: &[Vec<f64>], targets: Vec<ClassLabel>) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);

        if let Some(row) = rows.iter().find(|row| row.len() != n_features) {
            return Err(SVMError::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }

        let sparse = rows
            .iter()
            .map(|row| SparseVector::from_dense(row))
            .collect();
        Self::new(sparse, targets, n_features)
    }

    /// Attach column names
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }

    /// Attach class names, indexed by class label
    pub fn with_class_names(mut self, names: Vec<String>) -> Self {
        self.class_names = names;
        self
    }

    /// Copy of the rows at `indices`, in the given order
    ///
    /// # Panics
    /// Panics if any index is out of bounds
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            n_features: self.n_features,
            feature_names: self.feature_names.clone(),
            class_names: self.class_names.clone(),
        }
    }

    /// Distinct labels in ascending order
    pub fn classes(&self) -> Vec<ClassLabel> {
        self.targets
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All rows
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Column names, empty when unknown
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Class names, empty when unknown
    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Name of a class label, if known
    pub fn class_name(&self, label: ClassLabel) -> Option<&str> {
        self.class_names.get(label).map(String::as_str)
    }
}

impl Dataset for LabeledDataset {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn dim(&self) -> usize {
        self.n_features
    }

    fn features(&self, i: usize) -> &SparseVector {
        &self.rows[i]
    }

    fn target(&self, i: usize) -> ClassLabel {
        self.targets[i]
    }

    fn targets(&self) -> Vec<ClassLabel> {
        self.targets.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> LabeledDataset {
        LabeledDataset::from_dense(
            &[
                vec![5.1, 3.5, 1.4, 0.2],
                vec![7.0, 3.2, 4.7, 1.4],
                vec![6.3, 3.3, 6.0, 2.5],
                vec![4.9, 3.0, 1.4, 0.2],
            ],
            vec![0, 1, 2, 0],
        )
        .expect("valid dataset")
    }

    #[test]
    fn test_from_dense() {
        let dataset = small();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.dim(), 4);
        assert_eq!(dataset.features(1).get(2), 4.7);
        assert_eq!(dataset.targets(), vec![0, 1, 2, 0]);
        assert_eq!(dataset.classes(), vec![0, 1, 2]);
    }

    #[test]
    fn test_label_count_mismatch() {
        let result = LabeledDataset::from_dense(&[vec![1.0], vec![2.0]], vec![0]);
        assert!(matches!(
            result,
            Err(SVMError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = LabeledDataset::from_dense(&[vec![1.0, 2.0], vec![2.0]], vec![0, 1]);
        assert!(matches!(result, Err(SVMError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_row_wider_than_dataset() {
        let rows = vec![SparseVector::new(vec![5], vec![1.0])];
        let result = LabeledDataset::new(rows, vec![0], 4);
        assert!(matches!(result, Err(SVMError::InvalidDataset(_))));
    }

    #[test]
    fn test_subset_keeps_order_and_metadata() {
        let dataset = small().with_class_names(vec![
            "setosa".to_string(),
            "versicolor".to_string(),
            "virginica".to_string(),
        ]);

        let subset = dataset.subset(&[2, 0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.targets(), vec![2, 0]);
        assert_eq!(subset.features(0), dataset.features(2));
        assert_eq!(subset.class_name(2), Some("virginica"));
        assert_eq!(subset.class_name(7), None);
    }
}
