//! SVM solver implementations
//!
//! Binary C-SVC is solved with Sequential Minimal Optimization using
//! second-order working set selection.

pub mod smo;

pub use self::smo::*;
