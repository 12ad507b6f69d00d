//! Filter operations
//!
//! This module provides the batched 3x3 box blur: the per-batch kernel and the
//! operation that partitions an image, runs one batch per worker and joins them.

/// Per-batch work units and the 3x3 averaging kernel.
mod batch;
pub use batch::*;

/// Box blur operations
mod ops;
pub use ops::*;
