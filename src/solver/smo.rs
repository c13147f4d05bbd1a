//! Sequential Minimal Optimization (SMO) solver for binary C-SVC
//!
//! Solves the dual problem
//!
//! ```text
//! min_α  ½ αᵀQα - eᵀα    s.t.  yᵀα = 0,  0 <= αᵢ <= C,   Qᵢⱼ = yᵢyⱼK(xᵢ, xⱼ)
//! ```
//!
//! by repeatedly optimizing a pair of multipliers. The pair is chosen with
//! second-order information (Fan, Chen & Lin, 2005): `i` is the maximal
//! violator in `I_up`, `j` the index in `I_low` giving the largest decrease
//! of the objective. The gradient `G = Qα - e` is maintained incrementally,
//! so every step needs only the kernel rows of `i` and `j`.

use crate::cache::KernelCache;
use crate::core::{OptimizationResult, OptimizerConfig, Result, SVMError, Sample};
use crate::kernel::Kernel;
use log::{debug, warn};
use std::sync::Arc;

/// Substitute for a non-positive curvature along the working-set direction
const TAU: f64 = 1e-12;

/// SMO solver for SVM optimization
pub struct SMOSolver<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

/// Per-problem state shared by the selection and update steps
struct Problem<'a> {
    samples: &'a [Sample],
    norms: Vec<f64>,
    diag: Vec<f64>,
}

impl<K: Kernel> SMOSolver<K> {
    /// Create a new SMO solver with the given kernel and configuration
    pub fn new(kernel: Arc<K>, config: OptimizerConfig) -> Self {
        Self { kernel, config }
    }

    /// Solver configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Solve the SVM optimization problem
    ///
    /// Takes a set of ±1 labeled training samples and returns the optimized
    /// alpha values, bias term, and other optimization results.
    pub fn solve(&self, samples: &[Sample]) -> Result<OptimizationResult> {
        let mut cache = KernelCache::with_memory_limit(self.config.cache_size, samples.len());
        self.solve_with_cache(samples, &mut cache)
    }

    /// Solve with an externally managed kernel row cache
    ///
    /// Rows are keyed by position in `samples`, so a cache must only be
    /// reused for the same sample slice.
    pub fn solve_with_cache(
        &self,
        samples: &[Sample],
        cache: &mut KernelCache,
    ) -> Result<OptimizationResult> {
        Self::validate_samples(samples)?;

        let n = samples.len();
        let c = self.config.c;

        let norms: Vec<f64> = samples.iter().map(|s| s.features.norm_squared()).collect();
        let diag: Vec<f64> = samples
            .iter()
            .zip(norms.iter())
            .map(|(s, &norm)| {
                self.kernel
                    .compute_with_norms(&s.features, &s.features, norm, norm)
            })
            .collect();
        let problem = Problem {
            samples,
            norms,
            diag,
        };

        let mut alpha = vec![0.0; n];
        // G = Qα - e, and α starts at zero
        let mut gradient = vec![-1.0; n];

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let Some((i, j)) = self.select_working_set(&problem, &alpha, &gradient, cache) else {
                converged = true;
                break;
            };

            self.update_pair(&problem, i, j, &mut alpha, &mut gradient, cache);
            iterations += 1;
        }

        if !converged {
            warn!(
                "SMO reached the iteration limit ({}) before meeting tolerance {}",
                self.config.max_iterations, self.config.epsilon
            );
        }

        let rho = Self::calculate_rho(samples, &alpha, &gradient, c);

        let support_vectors: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a > 0.0)
            .map(|(i, _)| i)
            .collect();

        // Dual objective Σα - ½αᵀQα, using Qα = G + e
        let objective_value = -0.5
            * alpha
                .iter()
                .zip(gradient.iter())
                .map(|(&a, &g)| a * (g - 1.0))
                .sum::<f64>();

        debug!(
            "SMO finished: n={}, iterations={}, support vectors={}, cache hit rate={:.2}",
            n,
            iterations,
            support_vectors.len(),
            cache.hit_rate()
        );

        Ok(OptimizationResult {
            alpha,
            b: -rho,
            support_vectors,
            iterations,
            objective_value,
            converged,
        })
    }

    fn validate_samples(samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        for sample in samples {
            if sample.label != 1.0 && sample.label != -1.0 {
                return Err(SVMError::InvalidLabel(sample.label));
            }
        }

        let positives = samples.iter().filter(|s| s.label > 0.0).count();
        if positives == 0 || positives == samples.len() {
            return Err(SVMError::InvalidDataset(
                "Binary problem needs samples of both classes".to_string(),
            ));
        }

        Ok(())
    }

    /// Kernel row K(i, ·), computed on first use
    fn kernel_row(
        &self,
        problem: &Problem<'_>,
        cache: &mut KernelCache,
        i: usize,
    ) -> Arc<[f64]> {
        let kernel = &self.kernel;
        cache.get_or_insert_with(i, || {
            let x_i = &problem.samples[i].features;
            let norm_i = problem.norms[i];
            problem
                .samples
                .iter()
                .zip(problem.norms.iter())
                .map(|(s, &norm)| kernel.compute_with_norms(x_i, &s.features, norm_i, norm))
                .collect()
        })
    }

    /// Select the working pair, or `None` once the maximal violation is below epsilon
    fn select_working_set(
        &self,
        problem: &Problem<'_>,
        alpha: &[f64],
        gradient: &[f64],
        cache: &mut KernelCache,
    ) -> Option<(usize, usize)> {
        let c = self.config.c;
        let samples = problem.samples;

        // i = argmax { -yₜGₜ : t ∈ I_up }
        let mut gmax = f64::NEG_INFINITY;
        let mut gmax_idx = None;
        for (t, sample) in samples.iter().enumerate() {
            if in_up_set(sample.label, alpha[t], c) {
                let value = -sample.label * gradient[t];
                if value >= gmax {
                    gmax = value;
                    gmax_idx = Some(t);
                }
            }
        }
        let i = gmax_idx?;
        let row_i = self.kernel_row(problem, cache, i);

        // j = argmin of the objective decrease over I_low
        let mut gmax2 = f64::NEG_INFINITY;
        let mut obj_diff_min = f64::INFINITY;
        let mut best_j = None;
        for (t, sample) in samples.iter().enumerate() {
            if !in_low_set(sample.label, alpha[t], c) {
                continue;
            }

            let y_grad = sample.label * gradient[t];
            gmax2 = gmax2.max(y_grad);

            let grad_diff = gmax + y_grad;
            if grad_diff > 0.0 {
                let quad_coef = problem.diag[i] + problem.diag[t] - 2.0 * row_i[t];
                let quad_coef = if quad_coef > 0.0 { quad_coef } else { TAU };
                let obj_diff = -(grad_diff * grad_diff) / quad_coef;

                if obj_diff <= obj_diff_min {
                    obj_diff_min = obj_diff;
                    best_j = Some(t);
                }
            }
        }

        if gmax + gmax2 < self.config.epsilon {
            return None;
        }

        best_j.map(|j| (i, j))
    }

    /// Analytic two-variable update followed by the gradient refresh
    fn update_pair(
        &self,
        problem: &Problem<'_>,
        i: usize,
        j: usize,
        alpha: &mut [f64],
        gradient: &mut [f64],
        cache: &mut KernelCache,
    ) {
        let c = self.config.c;
        let samples = problem.samples;
        let (y_i, y_j) = (samples[i].label, samples[j].label);

        let row_i = self.kernel_row(problem, cache, i);
        let row_j = self.kernel_row(problem, cache, j);

        let (alpha_i_old, alpha_j_old) = (alpha[i], alpha[j]);

        let quad_coef = problem.diag[i] + problem.diag[j] - 2.0 * row_i[j];
        let quad_coef = if quad_coef > 0.0 { quad_coef } else { TAU };

        if y_i != y_j {
            let delta = (-gradient[i] - gradient[j]) / quad_coef;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;

            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else {
                if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = -diff;
                }
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = c + diff;
                }
            }
        } else {
            let delta = (gradient[i] - gradient[j]) / quad_coef;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;

            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = sum;
                }
                if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = sum;
                }
            }
        }

        let delta_i = alpha[i] - alpha_i_old;
        let delta_j = alpha[j] - alpha_j_old;

        // Gₖ += Qᵢₖ Δαᵢ + Qⱼₖ Δαⱼ
        for (k, sample) in samples.iter().enumerate() {
            gradient[k] += sample.label * (y_i * row_i[k] * delta_i + y_j * row_j[k] * delta_j);
        }
    }

    /// Offset ρ of the decision function f(x) = Σ αᵢyᵢK(xᵢ, x) - ρ
    ///
    /// Averages yᵢGᵢ over free multipliers; without any, takes the midpoint of
    /// the interval allowed by the bounded ones.
    fn calculate_rho(samples: &[Sample], alpha: &[f64], gradient: &[f64], c: f64) -> f64 {
        let mut n_free = 0;
        let mut sum_free = 0.0;
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;

        for (t, sample) in samples.iter().enumerate() {
            let y_grad = sample.label * gradient[t];
            let positive = sample.label > 0.0;

            if alpha[t] >= c {
                if positive {
                    lower = lower.max(y_grad);
                } else {
                    upper = upper.min(y_grad);
                }
            } else if alpha[t] <= 0.0 {
                if positive {
                    upper = upper.min(y_grad);
                } else {
                    lower = lower.max(y_grad);
                }
            } else {
                n_free += 1;
                sum_free += y_grad;
            }
        }

        if n_free > 0 {
            sum_free / n_free as f64
        } else {
            (upper + lower) / 2.0
        }
    }
}

/// αₜ can move in the direction that increases yₜαₜ
fn in_up_set(label: f64, alpha: f64, c: f64) -> bool {
    (label > 0.0 && alpha < c) || (label < 0.0 && alpha > 0.0)
}

/// αₜ can move in the direction that decreases yₜαₜ
fn in_low_set(label: f64, alpha: f64, c: f64) -> bool {
    (label > 0.0 && alpha > 0.0) || (label < 0.0 && alpha < c)
}
