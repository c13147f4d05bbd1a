//! Bundled demonstration datasets
//!
//! Iris and handwritten digits ship inside `smartcore`, so no files are read
//! at runtime.

use crate::core::{ClassLabel, Result, SVMError};
use crate::data::{ImageDataset, LabeledDataset};
use serde::Serialize;
use smartcore::dataset::{digits, iris};
use std::fmt;

const DIGIT_SHAPE: (usize, usize) = (8, 8);

/// Datasets available without any download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinDataset {
    Iris,
    Digits,
}

impl BuiltinDataset {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinDataset::Iris => "iris",
            BuiltinDataset::Digits => "digits",
        }
    }

    pub fn all() -> [BuiltinDataset; 2] {
        [BuiltinDataset::Digits, BuiltinDataset::Iris]
    }

    /// Load as a flat feature matrix; digit images are flattened row-major
    pub fn load(&self) -> Result<LabeledDataset> {
        match self {
            BuiltinDataset::Iris => load_iris(),
            BuiltinDataset::Digits => load_digits()?.flatten(),
        }
    }
}

impl fmt::Display for BuiltinDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fisher's iris measurements: 150 samples, 4 features, 3 species
pub fn load_iris() -> Result<LabeledDataset> {
    let raw = iris::load_dataset();

    let data: Vec<f64> = raw.data.iter().map(|&v| f64::from(v)).collect();
    let targets = to_class_labels(raw.target.iter().map(|&t| f64::from(t)))?;
    let rows = chunk_rows(&data, raw.num_features, raw.num_samples)?;

    Ok(LabeledDataset::from_dense(&rows, targets)?
        .with_feature_names(raw.feature_names)
        .with_class_names(raw.target_names))
}

/// Handwritten digits: 1797 grayscale 8x8 images, classes 0 to 9
pub fn load_digits() -> Result<ImageDataset> {
    let raw = digits::load_dataset();

    let (rows, cols) = DIGIT_SHAPE;
    if raw.num_features != rows * cols {
        return Err(SVMError::InvalidDataset(format!(
            "Expected {} pixels per digit, found {}",
            rows * cols,
            raw.num_features
        )));
    }

    let data: Vec<f64> = raw.data.iter().map(|&v| f64::from(v)).collect();
    let targets = to_class_labels(raw.target.iter().map(|&t| f64::from(t)))?;
    let class_names = (0..10).map(|d| d.to_string()).collect();

    Ok(ImageDataset::from_flat(&data, DIGIT_SHAPE, targets)?.with_class_names(class_names))
}

fn chunk_rows(data: &[f64], n_features: usize, n_samples: usize) -> Result<Vec<Vec<f64>>> {
    if n_features == 0 || data.len() != n_features * n_samples {
        return Err(SVMError::DimensionMismatch {
            expected: n_features * n_samples,
            actual: data.len(),
        });
    }
    Ok(data.chunks(n_features).map(<[f64]>::to_vec).collect())
}

/// Targets must be non-negative integers
fn to_class_labels(values: impl Iterator<Item = f64>) -> Result<Vec<ClassLabel>> {
    values
        .map(|v| {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                Ok(v as ClassLabel)
            } else {
                Err(SVMError::InvalidDataset(format!(
                    "Target {v} is not a class label"
                )))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Dataset;

    #[test]
    fn test_load_iris() {
        let dataset = load_iris().expect("iris loads");
        assert_eq!(dataset.len(), 150);
        assert_eq!(dataset.dim(), 4);
        assert_eq!(dataset.classes(), vec![0, 1, 2]);
        assert_eq!(dataset.class_name(0), Some("setosa"));
        assert_eq!(dataset.feature_names().len(), 4);
    }

    #[test]
    fn test_load_digits() {
        let images = load_digits().expect("digits load");
        assert_eq!(images.len(), 1797);
        assert_eq!(images.shape(), Some((8, 8)));

        let flat = images.flatten().expect("flatten");
        assert_eq!(flat.dim(), 64);
        assert_eq!(flat.classes(), (0..10).collect::<Vec<_>>());
        assert_eq!(flat.feature_names()[9], "pixel_1_1");
        assert_eq!(flat.class_name(7), Some("7"));
    }

    #[test]
    fn test_builtin_load_matches_loaders() {
        let digits = BuiltinDataset::Digits.load().expect("digits load");
        assert_eq!(digits.len(), 1797);
        assert_eq!(digits.dim(), 64);

        let iris = BuiltinDataset::Iris.load().expect("iris loads");
        assert_eq!(iris.len(), 150);
    }

    #[test]
    fn test_names() {
        assert_eq!(BuiltinDataset::Iris.to_string(), "iris");
        assert_eq!(BuiltinDataset::Digits.name(), "digits");
        assert_eq!(
            serde_json::to_string(&BuiltinDataset::Digits).expect("serialize"),
            "\"digits\""
        );
    }

    #[test]
    fn test_target_conversion() {
        assert_eq!(
            to_class_labels([0.0, 3.0, 9.0].into_iter()).expect("valid targets"),
            vec![0, 3, 9]
        );
        assert!(to_class_labels([1.5].into_iter()).is_err());
        assert!(to_class_labels([-1.0].into_iter()).is_err());
        assert!(to_class_labels([f64::NAN].into_iter()).is_err());
    }

    #[test]
    fn test_chunk_rows_checks_length() {
        assert!(chunk_rows(&[1.0, 2.0, 3.0], 2, 2).is_err());
        assert_eq!(
            chunk_rows(&[1.0, 2.0, 3.0, 4.0], 2, 2).expect("valid"),
            vec![vec![1.0, 2.0], vec![3.0, 4.0]]
        );
    }
}
