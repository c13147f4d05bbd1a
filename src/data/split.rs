//! Seeded train/test holdout split

use crate::core::{Dataset, Result, SVMError};
use crate::data::LabeledDataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Size of the test partition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitSize {
    /// Fraction of all samples, rounded up
    Fraction(f64),
    /// Exact number of samples
    Count(usize),
}

impl Default for SplitSize {
    fn default() -> Self {
        SplitSize::Fraction(0.1)
    }
}

impl SplitSize {
    /// Number of test samples for a dataset of `n` samples
    ///
    /// Both partitions must end up non-empty.
    pub fn test_count(&self, n: usize) -> Result<usize> {
        if n == 0 {
            return Err(SVMError::EmptyDataset);
        }

        let n_test = match *self {
            SplitSize::Fraction(f) => {
                if !(f > 0.0 && f < 1.0) {
                    return Err(SVMError::InvalidParameter(format!(
                        "Test fraction must be in (0, 1), got {f}"
                    )));
                }
                (f * n as f64).ceil() as usize
            }
            SplitSize::Count(k) => k,
        };

        if n_test == 0 || n_test >= n {
            return Err(SVMError::InvalidParameter(format!(
                "Split of {n} samples into {} train and {n_test} test leaves a side empty",
                n.saturating_sub(n_test)
            )));
        }

        Ok(n_test)
    }
}

/// Disjoint train and test partitions of one dataset
#[derive(Debug, Clone)]
pub struct HoldoutSplit {
    pub train: LabeledDataset,
    pub test: LabeledDataset,
    /// Rows of the source dataset, in training order
    pub train_indices: Vec<usize>,
    /// Rows of the source dataset, in test order
    pub test_indices: Vec<usize>,
}

/// Shuffle the rows with a seeded RNG and cut off the test partition
///
/// The first `n_test` permuted rows become the test set, the rest the
/// training set. The same seed always gives the same split.
pub fn train_test_split(
    dataset: &LabeledDataset,
    size: SplitSize,
    seed: u64,
) -> Result<HoldoutSplit> {
    let n = dataset.len();
    let n_test = size.test_count(n)?;

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train_indices = permutation.split_off(n_test);
    let test_indices = permutation;

    Ok(HoldoutSplit {
        train: dataset.subset(&train_indices),
        test: dataset.subset(&test_indices),
        train_indices,
        test_indices,
    })
}
