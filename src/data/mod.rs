//! Datasets and how they are prepared for training
//!
//! Labeled feature matrices, image collections that flatten into them,
//! the bundled demonstration datasets and the seeded holdout split.

pub mod builtin;
pub mod image;
pub mod labeled;
pub mod split;

pub use self::builtin::*;
pub use self::image::*;
pub use self::labeled::*;
pub use self::split::*;
