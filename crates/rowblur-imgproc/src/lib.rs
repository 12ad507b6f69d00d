#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image filtering module.
pub mod filter;

/// module containing row partitioning and parallelization utilities.
pub mod parallel;
