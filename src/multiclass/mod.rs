//! One-vs-one multiclass classification
//!
//! A binary SVM is trained for every pair of classes `(p, q)` with `p < q`,
//! using only the rows of those two classes. Class `p` is the positive side.
//! At prediction time every pair casts one vote; the class with the most
//! votes wins and ties go to the smallest class label.

use crate::core::{
    ClassLabel, Classifier, Dataset, OptimizerConfig, Result, SVMError, SVMModel, Sample,
    SparseVector,
};
use crate::kernel::Kernel;
use crate::optimizer::{SVMOptimizer, TrainedSVM};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Trainer for one-vs-one multiclass models
pub struct OneVsOne<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

impl<K: Kernel> OneVsOne<K> {
    pub fn new(kernel: K, config: OptimizerConfig) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Train one binary model per class pair
    pub fn fit<D: Dataset>(&self, dataset: &D) -> Result<OneVsOneModel<K>> {
        self.config.validate()?;

        if dataset.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        let mut rows_by_class: BTreeMap<ClassLabel, Vec<usize>> = BTreeMap::new();
        for i in 0..dataset.len() {
            rows_by_class.entry(dataset.target(i)).or_default().push(i);
        }

        let classes: Vec<ClassLabel> = rows_by_class.keys().copied().collect();
        if classes.len() < 2 {
            return Err(SVMError::InvalidDataset(format!(
                "At least two classes are needed, found {}",
                classes.len()
            )));
        }

        let optimizer =
            SVMOptimizer::with_shared_kernel(Arc::clone(&self.kernel), self.config.clone());
        let mut pairs = Vec::with_capacity(classes.len() * (classes.len() - 1) / 2);
        let mut support_rows = BTreeSet::new();

        for (pi, &positive) in classes.iter().enumerate() {
            for (qi, &negative) in classes.iter().enumerate().skip(pi + 1) {
                let rows: Vec<usize> = rows_by_class[&positive]
                    .iter()
                    .chain(rows_by_class[&negative].iter())
                    .copied()
                    .collect();

                let samples: Vec<Sample> = rows
                    .iter()
                    .map(|&row| {
                        let label = if dataset.target(row) == positive {
                            1.0
                        } else {
                            -1.0
                        };
                        Sample::new(dataset.features(row).clone(), label)
                    })
                    .collect();

                let model = optimizer.train_samples(&samples)?;

                let pair_rows: Vec<usize> = model
                    .support_vector_indices()
                    .iter()
                    .map(|&local| rows[local])
                    .collect();
                support_rows.extend(pair_rows.iter().copied());

                debug!(
                    "pair ({positive}, {negative}): {} samples, {} support vectors, {} iterations",
                    samples.len(),
                    model.n_support_vectors(),
                    model.iterations()
                );

                pairs.push(PairModel {
                    positive: pi,
                    negative: qi,
                    model,
                    support_rows: pair_rows,
                });
            }
        }

        Ok(OneVsOneModel {
            classes,
            pairs,
            support_rows: support_rows.into_iter().collect(),
        })
    }
}

/// Binary model for one class pair
pub struct PairModel<K: Kernel> {
    positive: usize,
    negative: usize,
    model: TrainedSVM<K>,
    support_rows: Vec<usize>,
}

impl<K: Kernel> PairModel<K> {
    pub fn model(&self) -> &TrainedSVM<K> {
        &self.model
    }

    /// Training rows that became support vectors for this pair
    pub fn support_rows(&self) -> &[usize] {
        &self.support_rows
    }
}

/// Trained one-vs-one classifier
pub struct OneVsOneModel<K: Kernel> {
    classes: Vec<ClassLabel>,
    pairs: Vec<PairModel<K>>,
    support_rows: Vec<usize>,
}

impl<K: Kernel> OneVsOneModel<K> {
    /// Number of pair models, k(k-1)/2 for k classes
    pub fn n_pairs(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[PairModel<K>] {
        &self.pairs
    }

    /// Class labels `(positive, negative)` of a pair model
    pub fn pair_classes(&self, pair: &PairModel<K>) -> (ClassLabel, ClassLabel) {
        (self.classes[pair.positive], self.classes[pair.negative])
    }

    /// Distinct training rows used as support vectors by any pair
    pub fn n_support_vectors(&self) -> usize {
        self.support_rows.len()
    }

    /// Sorted training rows used as support vectors by any pair
    pub fn support_rows(&self) -> &[usize] {
        &self.support_rows
    }

    /// Decision values of all pair models, in pair order
    pub fn decision_values(&self, features: &SparseVector) -> Vec<f64> {
        self.pairs
            .iter()
            .map(|pair| pair.model.decision_function(features))
            .collect()
    }

    /// Votes per class, indexed like [`Classifier::classes`]
    pub fn votes(&self, features: &SparseVector) -> Vec<usize> {
        let mut votes = vec![0; self.classes.len()];
        for pair in &self.pairs {
            if pair.model.decision_function(features) > 0.0 {
                votes[pair.positive] += 1;
            } else {
                votes[pair.negative] += 1;
            }
        }
        votes
    }
}

impl<K: Kernel> Classifier for OneVsOneModel<K> {
    fn predict(&self, features: &SparseVector) -> ClassLabel {
        self.classes[winner(&self.votes(features))]
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }
}

/// First position holding the maximum vote count
fn winner(votes: &[usize]) -> usize {
    let mut best = 0;
    for (i, &count) in votes.iter().enumerate() {
        if count > votes[best] {
            best = i;
        }
    }
    best
}
