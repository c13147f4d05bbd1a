//! Multiclass Support Vector Machine classification with holdout evaluation
//!
//! Binary C-SVC problems are solved by Sequential Minimal Optimization and
//! combined one-vs-one into a multiclass classifier. Built-in iris and digits
//! datasets can be split, fitted and scored in a single [`pipeline::run`].

pub mod api;
pub mod cache;
pub mod core;
pub mod data;
pub mod kernel;
pub mod multiclass;
pub mod optimizer;
pub mod pipeline;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{success_ratio, EvaluationMetrics, ModelInfo, TrainedModel, SVM};
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{
    load_digits, load_iris, train_test_split, BuiltinDataset, HoldoutSplit, ImageDataset,
    LabeledDataset, SplitSize,
};
pub use crate::kernel::{Kernel, LinearKernel, RBFKernel};
pub use crate::multiclass::{OneVsOne, OneVsOneModel};
pub use crate::optimizer::{SVMOptimizer, TrainedSVM};
pub use crate::pipeline::{PipelineConfig, PipelineReport};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
